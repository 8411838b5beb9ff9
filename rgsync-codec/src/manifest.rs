//! The export digest: a fixed-width positional manifest of script entries.
//!
//! One line per entry — id left-justified to 12 columns, label to 45, then
//! the derived filename (or `EMPTY`), newline terminated, no header, no
//! escaping. Reading slices the same byte columns back out, so over-width
//! content truncates silently; the format is deliberately preserved
//! bit-for-bit and isolated behind this module so a self-describing format
//! could replace it without touching callers.

use rgsync_core::types::{ManifestRecord, ScriptEntry, EMPTY_SENTINEL};

use crate::error::CodecError;

/// Name of the digest file inside the scripts directory.
pub const DIGEST_FILE: &str = "digest.txt";

const ID_WIDTH: usize = 12;
const LABEL_WIDTH: usize = 45;

/// Ordered literal substitutions applied to a label when deriving its
/// filename. Longer patterns come first so `" - "` collapses to a single
/// underscore instead of three.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (" - ", "_"),
    (" ", "_"),
    ("-", "_"),
    (":", "_"),
    ("/", "_"),
    ("\\", "_"),
    ("*", "_"),
    ("|", "_"),
    ("<", "_"),
    (">", "_"),
    ("?", "_"),
];

/// Derive the export filename for a script label.
///
/// Entries with empty content map to the `EMPTY` sentinel and get no
/// backing file. Distinct labels may collide to the same filename; the
/// format does not detect this (last write wins).
pub fn derive_filename(label: &str, empty: bool) -> String {
    if empty {
        return EMPTY_SENTINEL.to_string();
    }
    let mut name = label.to_string();
    for (pattern, replacement) in SUBSTITUTIONS {
        name = name.replace(pattern, replacement);
    }
    format!("{name}.rb")
}

/// Build the digest records for an ordered list of script entries.
pub fn records_for(entries: &[ScriptEntry]) -> Vec<ManifestRecord> {
    entries
        .iter()
        .map(|entry| ManifestRecord {
            id: entry.id,
            label: entry.label.clone(),
            filename: derive_filename(&entry.label, entry.content.is_empty()),
        })
        .collect()
}

/// Serialize records to digest text.
pub fn write(records: &[ManifestRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{:<id_w$}{:<label_w$}{}\n",
            record.id,
            record.label,
            record.filename,
            id_w = ID_WIDTH,
            label_w = LABEL_WIDTH,
        ));
    }
    out
}

/// Parse digest text back into ordered records.
///
/// Columns are positional, not delimited: each line is sliced at the same
/// byte offsets [`write`] padded to, and each column is right-trimmed.
pub fn read(text: &str) -> Result<Vec<ManifestRecord>, CodecError> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let bytes = line.as_bytes();
        let id_col = column(bytes, 0, ID_WIDTH);
        let label_col = column(bytes, ID_WIDTH, LABEL_WIDTH);
        let file_col = column(bytes, ID_WIDTH + LABEL_WIDTH, usize::MAX);

        let id = id_col.parse::<i64>().map_err(|_| CodecError::Manifest {
            line: index + 1,
            message: format!("id column is not numeric: {id_col:?}"),
        })?;
        records.push(ManifestRecord {
            id,
            label: label_col,
            filename: file_col,
        });
    }
    Ok(records)
}

fn column(bytes: &[u8], start: usize, width: usize) -> String {
    let start = start.min(bytes.len());
    let end = start.saturating_add(width).min(bytes.len());
    String::from_utf8_lossy(&bytes[start..end])
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, label: &str, filename: &str) -> ManifestRecord {
        ManifestRecord {
            id,
            label: label.to_string(),
            filename: filename.to_string(),
        }
    }

    #[test]
    fn lines_are_fixed_width() {
        let text = write(&[record(0, "Main Script", "Main_Script.rb")]);
        assert_eq!(
            text,
            "0           Main Script                                  Main_Script.rb\n"
        );
    }

    #[test]
    fn roundtrip_preserves_records() {
        let records = vec![
            record(0, "Main Script", "Main_Script.rb"),
            record(57, "Window_Base", "Window_Base.rb"),
            record(58, "placeholder", "EMPTY"),
        ];
        let parsed = read(&write(&records)).expect("read");
        assert_eq!(parsed, records);
    }

    #[test]
    fn non_numeric_id_reports_line() {
        let mut text = write(&[record(0, "ok", "ok.rb")]);
        text.push_str("oops        broken line\n");
        match read(&text) {
            Err(CodecError::Manifest { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected manifest error, got {other:?}"),
        }
    }

    #[test]
    fn overlong_label_truncates_on_read() {
        // Known lossy edge case of the positional format, preserved as-is.
        let long_label = "L".repeat(LABEL_WIDTH + 10);
        let text = write(&[record(1, &long_label, "file.rb")]);
        let parsed = read(&text).expect("read");
        assert_eq!(parsed[0].label.len(), LABEL_WIDTH);
        assert_ne!(parsed[0].filename, "file.rb");
    }

    #[test]
    fn filename_substitutions_apply_in_order() {
        assert_eq!(derive_filename("Main Script", false), "Main_Script.rb");
        // " - " collapses once; it must not be hit again by " " and "-".
        assert_eq!(derive_filename("Scene - Title", false), "Scene_Title.rb");
        assert_eq!(derive_filename("a:b/c\\d*e|f<g>h?i", false), "a_b_c_d_e_f_g_h_i.rb");
    }

    #[test]
    fn filename_derivation_is_idempotent_on_sanitized_labels() {
        let once = derive_filename("Scene - Title", false);
        let stem = once.trim_end_matches(".rb");
        assert_eq!(derive_filename(stem, false), once);
    }

    #[test]
    fn empty_content_maps_to_sentinel() {
        assert_eq!(derive_filename("anything", true), "EMPTY");
    }
}

//! Split/join for the script container and whole-file access for generic
//! data containers.
//!
//! The script container is an ordered dump of `[id, label, compressed]`
//! triples; each entry's content is an independent zlib stream. Generic
//! data containers expose no internal structure to the pipeline — only the
//! single root value matters.

use rgsync_core::{ScriptEntry, Value};

use crate::compress;
use crate::error::CodecError;
use crate::marshal;

/// Split a script container into its ordered entries, decompressing each
/// entry's content.
pub fn split_scripts(bytes: &[u8]) -> Result<Vec<ScriptEntry>, CodecError> {
    let root = marshal::read(bytes)?;
    let Value::Array(items) = root else {
        return Err(CodecError::Shape {
            expected: "an array of script entries",
        });
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Array(fields) = item else {
            return Err(CodecError::Shape {
                expected: "an [id, label, content] entry",
            });
        };
        let mut fields = fields.into_iter();
        let (Some(id), Some(label), Some(content)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(CodecError::Shape {
                expected: "an [id, label, content] entry",
            });
        };

        let Value::Int(id) = id else {
            return Err(CodecError::Shape {
                expected: "a numeric entry id",
            });
        };
        entries.push(ScriptEntry {
            id,
            label: text_of(label)?,
            content: compress::decompress(&bytes_of(content)?)?,
        });
    }
    Ok(entries)
}

/// Reassemble a script container from its entries, recompressing each
/// entry's current content.
pub fn join_scripts(entries: &[ScriptEntry]) -> Result<Vec<u8>, CodecError> {
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        items.push(Value::Array(vec![
            Value::Int(entry.id),
            Value::Str(entry.label.clone()),
            Value::Bytes(compress::compress(&entry.content)?),
        ]));
    }
    marshal::write(&Value::Array(items))
}

/// Read a generic data container's single root value.
pub fn read_root(bytes: &[u8]) -> Result<Value, CodecError> {
    marshal::read(bytes)
}

/// Write a generic data container from its root value.
pub fn write_root(value: &Value) -> Result<Vec<u8>, CodecError> {
    marshal::write(value)
}

/// Labels are stored as strings but old containers carry them without an
/// encoding flag; accept both and decode bytes leniently.
fn text_of(value: Value) -> Result<String, CodecError> {
    match value {
        Value::Str(s) => Ok(s),
        Value::Bytes(b) => Ok(String::from_utf8_lossy(&b).into_owned()),
        _ => Err(CodecError::Shape {
            expected: "a string entry label",
        }),
    }
}

fn bytes_of(value: Value) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::Bytes(b) => Ok(b),
        Value::Str(s) => Ok(s.into_bytes()),
        _ => Err(CodecError::Shape {
            expected: "a compressed content payload",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, label: &str, content: &[u8]) -> ScriptEntry {
        ScriptEntry {
            id,
            label: label.to_string(),
            content: content.to_vec(),
        }
    }

    #[test]
    fn split_join_roundtrip_on_decompressed_content() {
        let entries = vec![
            entry(0, "Main Script", b"puts 1\n"),
            entry(1, "placeholder", b""),
            entry(2, "Window_Base", b"class Window_Base\nend\n"),
        ];
        let binary = join_scripts(&entries).expect("join");
        assert_eq!(split_scripts(&binary).expect("split"), entries);
    }

    #[test]
    fn entries_preserve_order_and_ids() {
        let entries = vec![entry(9, "b", b"x"), entry(3, "a", b"y")];
        let parsed = split_scripts(&join_scripts(&entries).expect("join")).expect("split");
        assert_eq!(parsed[0].id, 9);
        assert_eq!(parsed[1].id, 3);
    }

    #[test]
    fn malformed_entry_is_a_shape_error() {
        let binary = marshal::write(&Value::Array(vec![Value::Int(1)])).expect("write");
        assert!(matches!(
            split_scripts(&binary),
            Err(CodecError::Shape { .. })
        ));
    }

    #[test]
    fn non_array_root_is_a_shape_error() {
        let binary = marshal::write(&Value::Int(5)).expect("write");
        assert!(matches!(
            split_scripts(&binary),
            Err(CodecError::Shape { .. })
        ));
    }

    #[test]
    fn data_container_root_roundtrips() {
        let root = Value::Map(vec![
            (Value::Symbol("magic_number".into()), Value::Int(77)),
            (Value::Int(1), Value::Str("Town".into())),
        ]);
        let bytes = write_root(&root).expect("write");
        assert_eq!(read_root(&bytes).expect("read"), root);
    }
}

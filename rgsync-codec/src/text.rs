//! Deterministic YAML serialization for [`Value`] trees.
//!
//! The one load-bearing invariant: every mapping's keys are emitted in a
//! fully sorted order, recursively, regardless of insertion order. Text
//! exports are therefore stable under re-export, which is what keeps diffs
//! minimal under version control.
//!
//! Raw byte payloads travel as `!binary` base64 scalars and symbols as
//! `!sym` scalars, so parse-then-reserialize is idempotent.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_yaml::value::{Tag, TaggedValue};

use rgsync_core::Value;

use crate::error::CodecError;

/// Top-level key wrapping a data container's single root value.
/// Reserved for forward compatibility with sibling metadata keys.
pub const ROOT_KEY: &str = "root";

/// Serialize a value to YAML text with fully sorted mapping keys.
pub fn to_string(value: &Value) -> Result<String, CodecError> {
    Ok(serde_yaml::to_string(&to_yaml(value))?)
}

/// Parse YAML text back into a value tree.
pub fn from_str(text: &str) -> Result<Value, CodecError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    from_yaml(&yaml)
}

/// Wrap a container's root value as `{ root: value }` for the text side.
pub fn wrap_root(value: Value) -> Value {
    Value::Map(vec![(Value::Str(ROOT_KEY.to_string()), value)])
}

/// Unwrap the `root` key written by [`wrap_root`].
pub fn unwrap_root(value: Value) -> Result<Value, CodecError> {
    let Value::Map(mut pairs) = value else {
        return Err(CodecError::Shape {
            expected: "a mapping with a `root` key",
        });
    };
    let idx = pairs
        .iter()
        .position(|(k, _)| matches!(k, Value::Str(s) if s == ROOT_KEY))
        .ok_or(CodecError::Shape {
            expected: "a mapping with a `root` key",
        })?;
    Ok(pairs.swap_remove(idx).1)
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Nil => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(n) => serde_yaml::Value::Number((*n).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::Str(s) => serde_yaml::Value::String(s.clone()),
        Value::Bytes(b) => serde_yaml::Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new("binary"),
            value: serde_yaml::Value::String(BASE64.encode(b)),
        })),
        Value::Symbol(s) => serde_yaml::Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new("sym"),
            value: serde_yaml::Value::String(s.clone()),
        })),
        Value::Array(items) => {
            serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect())
        }
        Value::Map(pairs) => {
            let mut sorted: Vec<&(Value, Value)> = pairs.iter().collect();
            sorted.sort_by(|(ka, _), (kb, _)| ka.total_cmp(kb));
            let mut mapping = serde_yaml::Mapping::with_capacity(sorted.len());
            for (key, val) in sorted {
                mapping.insert(to_yaml(key), to_yaml(val));
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, CodecError> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Nil,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(s) => Value::Str(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(from_yaml(item)?);
            }
            Value::Array(out)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut pairs = Vec::with_capacity(mapping.len());
            for (key, val) in mapping {
                pairs.push((from_yaml(key)?, from_yaml(val)?));
            }
            Value::Map(pairs)
        }
        serde_yaml::Value::Tagged(tagged) => from_tagged(tagged)?,
    })
}

fn from_tagged(tagged: &TaggedValue) -> Result<Value, CodecError> {
    let scalar = tagged.value.as_str().ok_or(CodecError::Shape {
        expected: "a string scalar under a !binary or !sym tag",
    })?;
    if tagged.tag == "binary" {
        Ok(Value::Bytes(BASE64.decode(scalar)?))
    } else if tagged.tag == "sym" {
        Ok(Value::Symbol(scalar.to_string()))
    } else {
        Err(CodecError::Shape {
            expected: "a !binary or !sym tag",
        })
    }
}

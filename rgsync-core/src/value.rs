//! Structured value tree stored inside binary data containers.
//!
//! Containers hold arbitrary structured records; this enum covers the
//! plain-data subset the sync pipeline round-trips (the payload's class-level
//! object model is out of scope). A total order over values backs the
//! deterministic map-key sorting that makes text exports diff-stable.

use std::cmp::Ordering;

/// A structured value read from or written to a container.
///
/// `Map` preserves insertion order in memory; ordering is applied only when
/// serializing to text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// UTF-8 text.
    Str(String),
    /// Raw bytes (non-UTF-8 payloads, compressed blobs).
    Bytes(Vec<u8>),
    Symbol(String),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Rank used as the first key of the total order, so values of
    /// different kinds compare consistently.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Str(_) => 4,
            Value::Bytes(_) => 5,
            Value::Symbol(_) => 6,
            Value::Array(_) => 7,
            Value::Map(_) => 8,
        }
    }

    /// Total order over values: type rank first, then payload. Floats use
    /// IEEE `total_cmp` so the order is total even with NaN present.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Nil, Value::Nil) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => cmp_seq(a, b),
            (Value::Map(a), Value::Map(b)) => cmp_pairs(a, b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    /// Look up a map field by name, matching either a string or a symbol key.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let Value::Map(pairs) = self else { return None };
        pairs
            .iter()
            .find(|(k, _)| key_matches(k, name))
            .map(|(_, v)| v)
    }

    /// Set a map field by name, replacing an existing string or symbol key
    /// or appending a string key. No-op on non-map values.
    pub fn set_field(&mut self, name: &str, value: Value) {
        let Value::Map(pairs) = self else { return };
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| key_matches(k, name)) {
            slot.1 = value;
        } else {
            pairs.push((Value::Str(name.to_string()), value));
        }
    }
}

fn key_matches(key: &Value, name: &str) -> bool {
    matches!(key, Value::Str(s) | Value::Symbol(s) if s == name)
}

fn cmp_seq(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn cmp_pairs(a: &[(Value, Value)], b: &[(Value, Value)]) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        match ka.total_cmp(kb).then_with(|| va.total_cmp(vb)) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_total_across_kinds() {
        let values = [
            Value::Nil,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::Str("a".into()),
            Value::Symbol("a".into()),
        ];
        for window in values.windows(2) {
            assert_eq!(window[0].total_cmp(&window[1]), Ordering::Less);
        }
    }

    #[test]
    fn int_and_string_keys_sort_within_kind() {
        assert_eq!(Value::Int(2).total_cmp(&Value::Int(10)), Ordering::Less);
        assert_eq!(
            Value::Str("b".into()).total_cmp(&Value::Str("a".into())),
            Ordering::Greater
        );
    }

    #[test]
    fn nan_compares_consistently() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.total_cmp(&nan), Ordering::Equal);
        assert_eq!(Value::Float(1.0).total_cmp(&nan), Ordering::Less);
    }

    #[test]
    fn field_lookup_matches_string_and_symbol_keys() {
        let map = Value::Map(vec![
            (Value::Symbol("magic_number".into()), Value::Int(7)),
            (Value::Str("edit_map_id".into()), Value::Int(1)),
        ]);
        assert_eq!(map.field("magic_number"), Some(&Value::Int(7)));
        assert_eq!(map.field("edit_map_id"), Some(&Value::Int(1)));
        assert_eq!(map.field("absent"), None);
    }

    #[test]
    fn set_field_replaces_in_place_and_appends_when_missing() {
        let mut map = Value::Map(vec![(Value::Symbol("magic_number".into()), Value::Int(7))]);
        map.set_field("magic_number", Value::Int(42));
        assert_eq!(map.field("magic_number"), Some(&Value::Int(42)));

        map.set_field("edit_map_id", Value::Int(3));
        assert_eq!(map.field("edit_map_id"), Some(&Value::Int(3)));
        if let Value::Map(pairs) = &map {
            assert_eq!(pairs.len(), 2);
        }
    }
}

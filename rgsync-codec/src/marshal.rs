//! Reader/writer for the container's structured-dump wire format
//! (Marshal 4.8), restricted to the plain-data subset of [`Value`].
//!
//! The container format is externally owned: this codec fully parses and
//! fully rewrites a dump, never patches one. Class-level objects in the
//! payload are out of scope; encountering an unsupported token fails with
//! the byte offset.
//!
//! Read side keeps the format's two link tables: symbols (`;` links) and
//! objects (`@` links, resolved to clones — cyclic payloads are not
//! supported). The write side emits symbol links but never object links,
//! which is a valid, slightly larger encoding.

use rgsync_core::Value;

use crate::error::{dump_err, CodecError};

const HEADER: [u8; 2] = [0x04, 0x08];

/// Parse one structured value from a container dump.
pub fn read(bytes: &[u8]) -> Result<Value, CodecError> {
    let mut reader = Reader {
        buf: bytes,
        pos: 0,
        symbols: Vec::new(),
        objects: Vec::new(),
    };
    reader.expect_header()?;
    reader.read_value()
}

/// Serialize one structured value as a container dump.
pub fn write(value: &Value) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer {
        out: HEADER.to_vec(),
        symbols: Vec::new(),
    };
    writer.write_value(value)?;
    Ok(writer.out)
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    symbols: Vec<String>,
    objects: Vec<Value>,
}

impl<'a> Reader<'a> {
    fn expect_header(&mut self) -> Result<(), CodecError> {
        if self.buf.len() < 2 || self.buf[..2] != HEADER {
            return Err(dump_err(0, "missing 4.8 dump header"));
        }
        self.pos = 2;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, CodecError> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| dump_err(self.pos, "unexpected end of dump"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| dump_err(self.pos, "unexpected end of dump"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Packed integer, exactly as the dump format defines it.
    fn read_long(&mut self) -> Result<i64, CodecError> {
        let c = self.read_byte()? as i8;
        Ok(match c {
            0 => 0,
            1..=4 => {
                let mut x: i64 = 0;
                for i in 0..c as usize {
                    x |= (self.read_byte()? as i64) << (8 * i);
                }
                x
            }
            -4..=-1 => {
                let mut x: i64 = -1;
                for i in 0..(-c) as usize {
                    x &= !(0xff_i64 << (8 * i));
                    x |= (self.read_byte()? as i64) << (8 * i);
                }
                x
            }
            5..=127 => (c as i64) - 5,
            _ => (c as i64) + 5,
        })
    }

    fn read_len(&mut self) -> Result<usize, CodecError> {
        let n = self.read_long()?;
        usize::try_from(n).map_err(|_| dump_err(self.pos, "negative length"))
    }

    /// Reserve an object-table slot before reading a container's children,
    /// so `@` link indices line up with the writer that produced the dump.
    fn reserve(&mut self) -> usize {
        self.objects.push(Value::Nil);
        self.objects.len() - 1
    }

    fn register(&mut self, value: Value) -> Value {
        self.objects.push(value.clone());
        value
    }

    fn read_symbol_name(&mut self) -> Result<String, CodecError> {
        let token = self.read_byte()?;
        match token {
            b':' => {
                let len = self.read_len()?;
                let name = String::from_utf8(self.read_bytes(len)?.to_vec())
                    .map_err(|_| dump_err(self.pos, "symbol is not UTF-8"))?;
                self.symbols.push(name.clone());
                Ok(name)
            }
            b';' => {
                let idx = self.read_len()?;
                self.symbols
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| dump_err(self.pos, "symbol link out of range"))
            }
            other => Err(dump_err(
                self.pos - 1,
                format!("expected symbol, found token 0x{other:02x}"),
            )),
        }
    }

    fn read_value(&mut self) -> Result<Value, CodecError> {
        let token_pos = self.pos;
        let token = self.read_byte()?;
        match token {
            b'0' => Ok(Value::Nil),
            b'T' => Ok(Value::Bool(true)),
            b'F' => Ok(Value::Bool(false)),
            b'i' => Ok(Value::Int(self.read_long()?)),
            b'f' => {
                let len = self.read_len()?;
                let text = String::from_utf8_lossy(self.read_bytes(len)?).into_owned();
                let float = match text.as_str() {
                    "inf" => f64::INFINITY,
                    "-inf" => f64::NEG_INFINITY,
                    "nan" => f64::NAN,
                    repr => repr
                        .parse::<f64>()
                        .map_err(|_| dump_err(token_pos, format!("bad float literal {repr:?}")))?,
                };
                Ok(self.register(Value::Float(float)))
            }
            b':' | b';' => {
                self.pos = token_pos;
                Ok(Value::Symbol(self.read_symbol_name()?))
            }
            b'"' => {
                let len = self.read_len()?;
                let bytes = self.read_bytes(len)?.to_vec();
                Ok(self.register(Value::Bytes(bytes)))
            }
            b'I' => self.read_ivar_string(token_pos),
            b'[' => {
                let slot = self.reserve();
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_value()?);
                }
                let value = Value::Array(items);
                self.objects[slot] = value.clone();
                Ok(value)
            }
            b'{' => {
                let slot = self.reserve();
                let len = self.read_len()?;
                let mut pairs = Vec::with_capacity(len);
                for _ in 0..len {
                    let key = self.read_value()?;
                    let val = self.read_value()?;
                    pairs.push((key, val));
                }
                let value = Value::Map(pairs);
                self.objects[slot] = value.clone();
                Ok(value)
            }
            b'@' => {
                let idx = self.read_len()?;
                self.objects
                    .get(idx)
                    .cloned()
                    .ok_or_else(|| dump_err(token_pos, "object link out of range"))
            }
            other => Err(dump_err(
                token_pos,
                format!("unsupported type token 0x{other:02x}"),
            )),
        }
    }

    /// `I"..."` — a string carrying instance variables. The only variable
    /// this codec interprets is the `E => true` encoding flag marking UTF-8;
    /// anything else leaves the payload as raw bytes.
    fn read_ivar_string(&mut self, token_pos: usize) -> Result<Value, CodecError> {
        let inner = self.read_byte()?;
        if inner != b'"' {
            return Err(dump_err(
                token_pos,
                format!("unsupported ivar wrapper around token 0x{inner:02x}"),
            ));
        }
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?.to_vec();
        let slot = self.reserve();

        let mut utf8 = false;
        let ivar_count = self.read_len()?;
        for _ in 0..ivar_count {
            let name = self.read_symbol_name()?;
            let value = self.read_value()?;
            if name == "E" && value == Value::Bool(true) {
                utf8 = true;
            }
        }

        let value = if utf8 {
            let text = String::from_utf8(bytes)
                .map_err(|_| dump_err(token_pos, "UTF-8 flagged string with invalid UTF-8"))?;
            Value::Str(text)
        } else {
            Value::Bytes(bytes)
        };
        self.objects[slot] = value.clone();
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

struct Writer {
    out: Vec<u8>,
    symbols: Vec<String>,
}

impl Writer {
    fn write_long(&mut self, x: i64) -> Result<(), CodecError> {
        if x == 0 {
            self.out.push(0);
            return Ok(());
        }
        if (1..123).contains(&x) {
            self.out.push((x + 5) as u8);
            return Ok(());
        }
        if (-123..0).contains(&x) {
            self.out.push(((x - 5) & 0xff) as u8);
            return Ok(());
        }
        // Multi-byte form covers the 32-bit range; larger magnitudes would
        // need the big-integer token, which the plain-data subset excludes.
        if x > i32::MAX as i64 || x < i32::MIN as i64 {
            return Err(dump_err(
                self.out.len(),
                format!("integer {x} exceeds the dump format's fixnum range"),
            ));
        }
        let mut buf = [0u8; 5];
        let mut v = x;
        let mut i = 1;
        loop {
            buf[i] = (v & 0xff) as u8;
            v >>= 8;
            if v == 0 {
                buf[0] = i as u8;
                break;
            }
            if v == -1 {
                buf[0] = (-(i as i64) & 0xff) as u8;
                break;
            }
            i += 1;
        }
        self.out.extend_from_slice(&buf[..=i]);
        Ok(())
    }

    fn write_symbol(&mut self, name: &str) -> Result<(), CodecError> {
        if let Some(idx) = self.symbols.iter().position(|s| s == name) {
            self.out.push(b';');
            self.write_long(idx as i64)
        } else {
            self.symbols.push(name.to_string());
            self.out.push(b':');
            self.write_long(name.len() as i64)?;
            self.out.extend_from_slice(name.as_bytes());
            Ok(())
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<(), CodecError> {
        match value {
            Value::Nil => self.out.push(b'0'),
            Value::Bool(true) => self.out.push(b'T'),
            Value::Bool(false) => self.out.push(b'F'),
            Value::Int(n) => {
                self.out.push(b'i');
                self.write_long(*n)?;
            }
            Value::Float(f) => {
                let repr = if f.is_nan() {
                    "nan".to_string()
                } else if f.is_infinite() {
                    if *f > 0.0 { "inf" } else { "-inf" }.to_string()
                } else {
                    format!("{f}")
                };
                self.out.push(b'f');
                self.write_long(repr.len() as i64)?;
                self.out.extend_from_slice(repr.as_bytes());
            }
            Value::Symbol(name) => self.write_symbol(name)?,
            Value::Str(text) => {
                // UTF-8 string: ivar-wrapped with the E => true flag.
                self.out.push(b'I');
                self.out.push(b'"');
                self.write_long(text.len() as i64)?;
                self.out.extend_from_slice(text.as_bytes());
                self.write_long(1)?;
                self.write_symbol("E")?;
                self.out.push(b'T');
            }
            Value::Bytes(bytes) => {
                self.out.push(b'"');
                self.write_long(bytes.len() as i64)?;
                self.out.extend_from_slice(bytes);
            }
            Value::Array(items) => {
                self.out.push(b'[');
                self.write_long(items.len() as i64)?;
                for item in items {
                    self.write_value(item)?;
                }
            }
            Value::Map(pairs) => {
                self.out.push(b'{');
                self.write_long(pairs.len() as i64)?;
                for (key, val) in pairs {
                    self.write_value(key)?;
                    self.write_value(val)?;
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: Value) -> Value {
        let bytes = write(&value).expect("write");
        read(&bytes).expect("read")
    }

    #[test]
    fn header_is_checked() {
        assert!(read(b"").is_err());
        assert!(read(&[0x04, 0x09, b'0']).is_err());
    }

    #[test]
    fn packed_integer_wire_forms() {
        // Known encodings of the packed-long scheme.
        assert_eq!(write(&Value::Int(0)).unwrap(), vec![0x04, 0x08, b'i', 0x00]);
        assert_eq!(write(&Value::Int(6)).unwrap(), vec![0x04, 0x08, b'i', 0x0b]);
        assert_eq!(
            write(&Value::Int(-1)).unwrap(),
            vec![0x04, 0x08, b'i', 0xfa]
        );
        assert_eq!(
            write(&Value::Int(1000)).unwrap(),
            vec![0x04, 0x08, b'i', 0x02, 0xe8, 0x03]
        );
    }

    #[test]
    fn integers_roundtrip_across_the_range() {
        for n in [
            0,
            1,
            122,
            123,
            255,
            256,
            65_536,
            i32::MAX as i64,
            -1,
            -123,
            -124,
            -129,
            -65_536,
            i32::MIN as i64,
        ] {
            assert_eq!(roundtrip(Value::Int(n)), Value::Int(n), "n = {n}");
        }
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        assert!(write(&Value::Int(i32::MAX as i64 + 1)).is_err());
    }

    #[test]
    fn scalars_roundtrip() {
        assert_eq!(roundtrip(Value::Nil), Value::Nil);
        assert_eq!(roundtrip(Value::Bool(true)), Value::Bool(true));
        assert_eq!(roundtrip(Value::Bool(false)), Value::Bool(false));
        assert_eq!(roundtrip(Value::Float(3.25)), Value::Float(3.25));
        assert_eq!(
            roundtrip(Value::Float(f64::NEG_INFINITY)),
            Value::Float(f64::NEG_INFINITY)
        );
        assert_eq!(
            roundtrip(Value::Str("Main Script".into())),
            Value::Str("Main Script".into())
        );
        assert_eq!(
            roundtrip(Value::Bytes(vec![0x00, 0xff, 0x7f])),
            Value::Bytes(vec![0x00, 0xff, 0x7f])
        );
    }

    #[test]
    fn utf8_string_carries_encoding_ivar() {
        let bytes = write(&Value::Str("ab".into())).unwrap();
        // I " <len> a b <ivars=1> : <len=1> E T
        assert_eq!(
            bytes,
            vec![0x04, 0x08, b'I', b'"', 0x07, b'a', b'b', 0x06, b':', 0x06, b'E', b'T']
        );
    }

    #[test]
    fn repeated_symbols_use_links() {
        let value = Value::Array(vec![Value::Symbol("id".into()), Value::Symbol("id".into())]);
        let bytes = write(&value).unwrap();
        assert!(bytes.windows(2).any(|w| w == [b';', 0x00]));
        assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn nested_structures_roundtrip() {
        let value = Value::Map(vec![
            (Value::Symbol("magic_number".into()), Value::Int(42)),
            (
                Value::Str("maps".into()),
                Value::Array(vec![Value::Int(1), Value::Nil, Value::Float(0.5)]),
            ),
            (Value::Int(7), Value::Bytes(vec![1, 2, 3])),
        ]);
        assert_eq!(roundtrip(value.clone()), value);
    }

    #[test]
    fn object_links_resolve_to_clones() {
        // [ "x", @0-link-to-"x" ] written by a linking producer.
        let dump = [
            0x04, 0x08, b'[', 0x07, // array, 2 items
            b'"', 0x06, b'x', // raw string "x" -> object index 1 (array is 0)
            b'@', 0x06, // link to object index 1
        ];
        let value = read(&dump).expect("read");
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Bytes(vec![b'x']),
                Value::Bytes(vec![b'x'])
            ])
        );
    }

    #[test]
    fn unsupported_token_reports_offset() {
        let dump = [0x04, 0x08, b'o'];
        match read(&dump) {
            Err(CodecError::Dump { offset, message }) => {
                assert_eq!(offset, 2);
                assert!(message.contains("0x6f"));
            }
            other => panic!("expected dump error, got {other:?}"),
        }
    }
}

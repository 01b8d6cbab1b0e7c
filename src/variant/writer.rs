use super::{Variant, VariantTag};
use crate::vlq::{write_signed, write_unsigned};

impl Variant {
    /// Encodes the variant into a fresh buffer
    ///
    /// ```
    /// use sbon::Variant;
    ///
    /// assert_eq!(Variant::Int(-1).encode(), vec![0x04, 0x01]);
    /// assert_eq!(Variant::from("").encode(), vec![0x05, 0x00]);
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }

    /// Appends the encoded variant to the buffer
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.tag().value());
        match self {
            Variant::Null => {}
            Variant::Double(x) => out.extend_from_slice(&x.to_be_bytes()),
            Variant::Bool(x) => out.push(u8::from(*x)),
            Variant::Int(x) => write_signed(out, *x),
            Variant::String(x) => write_str(out, x),
            Variant::List(values) => {
                write_unsigned(out, values.len() as u64);
                for value in values {
                    value.write_to(out);
                }
            }
            Variant::Map(map) => {
                write_unsigned(out, map.len() as u64);
                for (key, value) in map.iter() {
                    write_str(out, key);
                    value.write_to(out);
                }
            }
        }
    }
}

/// Appends a length prefixed string
#[inline]
pub(crate) fn write_str(out: &mut Vec<u8>, s: &str) {
    write_unsigned(out, s.len() as u64);
    out.extend_from_slice(s.as_bytes());
}

// Tags fit within a single VLQ byte, so they are pushed directly
const _: () = assert!((VariantTag::Map as u8) < 0x80);

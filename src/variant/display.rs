use super::Variant;
use std::fmt::{self, Write};

/// Writes a compact, JSON-like rendering of the tree. Doubles always carry a
/// decimal point so they can be told apart from integers.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => f.write_str("null"),
            Variant::Double(x) => write_f64(f, *x),
            Variant::Bool(x) => f.write_str(if *x { "true" } else { "false" }),
            Variant::Int(x) => write_i64(f, *x),
            Variant::String(x) => write_quoted(f, x),
            Variant::List(values) => {
                f.write_char('[')?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        f.write_char(',')?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                f.write_char(']')
            }
            Variant::Map(map) => {
                f.write_char('{')?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i != 0 {
                        f.write_char(',')?;
                    }
                    write_quoted(f, key)?;
                    f.write_char(':')?;
                    fmt::Display::fmt(value, f)?;
                }
                f.write_char('}')
            }
        }
    }
}

#[cfg(feature = "faster_writer")]
#[inline]
fn write_i64(f: &mut fmt::Formatter<'_>, x: i64) -> fmt::Result {
    let mut buffer = itoa::Buffer::new();
    f.write_str(buffer.format(x))
}

#[cfg(not(feature = "faster_writer"))]
#[inline]
fn write_i64(f: &mut fmt::Formatter<'_>, x: i64) -> fmt::Result {
    write!(f, "{}", x)
}

fn write_f64(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() {
        // Debug keeps the trailing ".0" on whole numbers
        write!(f, "{:?}", x)
    } else if x.is_nan() {
        f.write_str("NaN")
    } else if x > 0.0 {
        f.write_str("Infinity")
    } else {
        f.write_str("-Infinity")
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

//! The recursive, self describing value used throughout save files
//!
//! Every variant is a tag (an unsigned VLQ) followed by a tag specific
//! payload:
//!
//! | tag | kind   | payload                                      |
//! |-----|--------|----------------------------------------------|
//! | 1   | null   | none                                         |
//! | 2   | double | 8 bytes, big endian IEEE-754                 |
//! | 3   | bool   | 1 byte, nonzero is true                      |
//! | 4   | int    | signed VLQ                                   |
//! | 5   | string | VLQ byte length then UTF-8                   |
//! | 6   | list   | VLQ count then that many variants            |
//! | 7   | map    | VLQ count then (string key, variant) pairs   |
//!
//! ```
//! use sbon::{Variant, VariantMap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stats = VariantMap::new();
//! stats.insert("hp", 100.0);
//! stats.insert("tags", vec![Variant::from("brave"), Variant::Null]);
//! let value = Variant::Map(stats);
//!
//! let data = value.encode();
//! assert_eq!(Variant::from_slice(&data)?, value);
//! # Ok(())
//! # }
//! ```

mod display;
mod map;
mod reader;
#[cfg(feature = "serde")]
mod serde_impl;
mod value;
mod writer;

pub use self::map::VariantMap;
pub use self::reader::{DecodeOptions, DEFAULT_MAX_DEPTH};
pub(crate) use self::reader::read_variant;
pub use self::value::{Variant, VariantTag};
pub(crate) use self::writer::write_str;

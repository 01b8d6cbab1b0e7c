//! Conversion of variant trees to and from JSON
//!
//! Save files are commonly inspected and hand edited as JSON. Doubles and
//! integers stay distinct through a round trip as long as doubles are written
//! with a decimal point, which `serde_json` does for whole numbers.
//!
//! ```
//! use sbon::{Variant, VariantMap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stats: VariantMap = [("hp", Variant::Double(100.0)), ("level", Variant::Int(3))]
//!     .into_iter()
//!     .collect();
//! let json = Variant::Map(stats).to_json()?;
//! assert_eq!(json, r#"{"hp":100.0,"level":3}"#);
//!
//! let back = Variant::from_json(&json)?;
//! assert_eq!(back.get("hp"), Some(&Variant::Double(100.0)));
//! assert_eq!(back.get("level"), Some(&Variant::Int(3)));
//! # Ok(())
//! # }
//! ```

use crate::Variant;
use std::io::Write;

impl Variant {
    /// Serializes the tree as minified JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the tree as indented JSON
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the tree as JSON to a writer
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<(), serde_json::Error> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)
        } else {
            serde_json::to_writer(writer, self)
        }
    }

    /// Parses a tree from JSON. Objects keep their key order.
    pub fn from_json(data: &str) -> Result<Variant, serde_json::Error> {
        serde_json::from_str(data)
    }
}

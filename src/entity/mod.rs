//! Versioned entity saves
//!
//! Player saves, their metadata, and other entity files share one framing:
//!
//! ```text
//! magic(6) | name (VLQ string) | version (i32 BE) | subversion (VLQ) | root variant | tail
//! ```
//!
//! The tail is whatever follows the root variant. Its structure is unknown,
//! so it is carried through a decode and encode cycle byte for byte.
//!
//! ```
//! use sbon::{entity::EntityRecord, Variant, VariantMap};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root: VariantMap = [("hp", 100.0)].into_iter().collect();
//! let mut record = EntityRecord::new("PlayerEntity", 1, Variant::Map(root));
//! record.tail = vec![0xca, 0xfe];
//!
//! let data = record.to_bytes();
//! assert!(data.starts_with(b"SBVJ01"));
//!
//! let mut decoded = EntityRecord::from_slice(&data)?;
//! assert_eq!(decoded, record);
//!
//! *decoded.root.pointer_mut("/hp").unwrap() = Variant::Double(250.0);
//! let edited = decoded.to_bytes();
//! assert!(edited.ends_with(&[0xca, 0xfe]));
//! # Ok(())
//! # }
//! ```

mod record;

pub use self::record::{EntityOptions, EntityRecord, SBVJ01_MAGIC};

//! Packed asset archives
//!
//! An archive is a header, the raw file payloads, and an index that maps each
//! asset path to the byte range holding it:
//!
//! ```text
//! "SBAsset6" | index offset (i64 BE)
//! ...payloads...
//! "INDEX" | metadata count (VLQ) | metadata | file count (VLQ) | records
//! record: path length (u8) | path | offset (i64 BE) | length (i64 BE)
//! ```
//!
//! Only the index is read when an archive is opened. Payloads are fetched on
//! demand from a reader the caller hands in.
//!
//! ```
//! use sbon::archive::{ArchiveIndex, ArchiveWriter};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = ArchiveWriter::new();
//! writer.file("/player.config", b"{\"hp\":100}".to_vec())?;
//! let data = writer.finish()?;
//!
//! let mut reader = Cursor::new(data);
//! let index = ArchiveIndex::open(&mut reader)?;
//! assert!(index.lookup("/missing").is_none());
//!
//! let config = index.read_entry(&mut reader, "/player.config")?;
//! assert_eq!(config.as_deref(), Some(&b"{\"hp\":100}"[..]));
//! # Ok(())
//! # }
//! ```

mod index;
mod metadata;
mod stream;
mod writer;

pub use self::index::{
    ArchiveEntry, ArchiveIndex, ArchiveOptions, RecordBound, INDEX_MAGIC, SBASSET6_MAGIC,
};
pub use self::metadata::{ArchiveMetadata, MetadataValue, RAW_BYTE_TAG};
pub use self::writer::ArchiveWriter;

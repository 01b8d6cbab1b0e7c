use super::{
    index::{ArchiveOptions, INDEX_MAGIC},
    metadata::MetadataValue,
};
use crate::{variant::write_str, vlq::write_unsigned, Error, ErrorKind};
use std::io::Write;

/// Packs files into an `SBAsset6` archive.
///
/// File payloads are laid out in insertion order directly after the header
/// and the index follows the last payload. Every file count is followed by
/// exactly that many records.
///
/// ```
/// use sbon::archive::{ArchiveIndex, ArchiveWriter, MetadataValue};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut writer = ArchiveWriter::new();
/// writer.metadata("priority", MetadataValue::Byte(9));
/// writer.file("/items/sword.item", b"{}".to_vec())?;
/// let data = writer.finish()?;
///
/// let index = ArchiveIndex::from_slice(&data)?;
/// let entry = index.lookup("/items/sword.item").unwrap();
/// assert_eq!(entry.length, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveWriter {
    options: ArchiveOptions,
    metadata: Vec<(String, MetadataValue)>,
    files: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    pub fn new() -> Self {
        ArchiveWriter::default()
    }

    /// Writes with the magic and raw byte tag of the given options
    pub fn with_options(options: ArchiveOptions) -> Self {
        ArchiveWriter {
            options,
            ..ArchiveWriter::default()
        }
    }

    /// Adds a metadata entry. A later entry with the same key replaces the
    /// earlier one.
    pub fn metadata<K: Into<String>>(&mut self, key: K, value: MetadataValue) -> &mut Self {
        let key = key.into();
        match self.metadata.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.metadata.push((key, value)),
        }
        self
    }

    /// Adds a file. Paths are limited to 255 bytes. A later file with the
    /// same path replaces the earlier one.
    pub fn file<K: Into<String>>(&mut self, path: K, data: Vec<u8>) -> Result<&mut Self, Error> {
        let path = path.into();
        if path.len() > usize::from(u8::MAX) {
            return Err(ErrorKind::PathTooLong { path }.into());
        }

        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = data,
            None => self.files.push((path, data)),
        }
        Ok(self)
    }

    /// Number of files added so far
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Lays out the archive in memory
    pub fn finish(&self) -> Result<Vec<u8>, Error> {
        let raw_byte_tag = self.options.raw_byte_tag();
        let payload_len: usize = self.files.iter().map(|(_, data)| data.len()).sum();
        let mut out = Vec::with_capacity(16 + payload_len + self.files.len() * 32);
        out.extend_from_slice(&self.options.magic());
        out.extend_from_slice(&[0u8; 8]);

        let mut records = Vec::with_capacity(self.files.len());
        for (path, data) in &self.files {
            records.push((path, out.len() as u64, data.len() as u64));
            out.extend_from_slice(data);
        }

        let index_offset = out.len() as u64;
        out.extend_from_slice(&INDEX_MAGIC);
        write_unsigned(&mut out, self.metadata.len() as u64);
        for (key, value) in &self.metadata {
            write_str(&mut out, key);
            match value {
                MetadataValue::Byte(x) => {
                    out.push(raw_byte_tag);
                    out.push(*x);
                }
                MetadataValue::Bytes { tag, .. } if *tag == raw_byte_tag => {
                    return Err(ErrorKind::ReservedMetadataTag {
                        key: key.clone(),
                        tag: *tag,
                    }
                    .into());
                }
                MetadataValue::Bytes { tag, data } => {
                    out.push(*tag);
                    write_unsigned(&mut out, data.len() as u64);
                    out.extend_from_slice(data);
                }
            }
        }

        write_unsigned(&mut out, records.len() as u64);
        for (path, offset, length) in records {
            out.push(path.len() as u8);
            out.extend_from_slice(path.as_bytes());
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&length.to_be_bytes());
        }

        out[8..16].copy_from_slice(&index_offset.to_be_bytes());
        tracing::debug!(
            files = self.files.len(),
            metadata = self.metadata.len(),
            index_offset,
            "packed archive"
        );
        Ok(out)
    }

    /// Lays out the archive and writes it to a writer
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let data = self.finish()?;
        writer.write_all(&data)?;
        Ok(())
    }
}

use super::{
    metadata::{read_metadata, ArchiveMetadata, RAW_BYTE_TAG},
    stream::StreamDecoder,
};
use crate::{Error, ErrorKind};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::ops::Range;

/// Magic of packed asset archives
pub const SBASSET6_MAGIC: [u8; 8] = *b"SBAsset6";

/// Magic that starts the index block
pub const INDEX_MAGIC: [u8; 5] = *b"INDEX";

/// How many file records follow the file count.
///
/// Archives produced by the game store exactly as many uniform records as
/// the count states. Some older tooling read one record fewer; that reading
/// is kept available for comparing against such tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordBound {
    /// Read `count` records
    #[default]
    Exact,

    /// Read `count - 1` records, ignoring the final one
    SkipLast,
}

impl RecordBound {
    /// The number of records to read for a stated file count
    pub fn records(&self, file_count: u64) -> u64 {
        match self {
            RecordBound::Exact => file_count,
            RecordBound::SkipLast => file_count.saturating_sub(1),
        }
    }
}

/// Customizes how an archive index is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    magic: [u8; 8],
    record_bound: RecordBound,
    raw_byte_tag: u8,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        ArchiveOptions {
            magic: SBASSET6_MAGIC,
            record_bound: RecordBound::Exact,
            raw_byte_tag: RAW_BYTE_TAG,
        }
    }
}

impl ArchiveOptions {
    /// Creates the structure with default options
    pub fn new() -> Self {
        ArchiveOptions::default()
    }

    /// Sets the magic the archive must start with
    pub fn with_magic(mut self, magic: [u8; 8]) -> ArchiveOptions {
        self.magic = magic;
        self
    }

    /// Sets how many file records are read for the stated count
    pub fn with_record_bound(mut self, record_bound: RecordBound) -> ArchiveOptions {
        self.record_bound = record_bound;
        self
    }

    /// Sets the metadata type tag that denotes a single byte value
    pub fn with_raw_byte_tag(mut self, raw_byte_tag: u8) -> ArchiveOptions {
        self.raw_byte_tag = raw_byte_tag;
        self
    }

    pub fn magic(&self) -> [u8; 8] {
        self.magic
    }

    pub fn record_bound(&self) -> RecordBound {
        self.record_bound
    }

    pub fn raw_byte_tag(&self) -> u8 {
        self.raw_byte_tag
    }
}

/// The location of a file within the archive's backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveEntry {
    pub offset: u64,
    pub length: u64,
}

impl ArchiveEntry {
    /// The byte range of the entry within the backing store
    pub fn range(&self) -> Range<u64> {
        self.offset..self.offset.saturating_add(self.length)
    }

    /// Reads the entry's bytes from the backing store
    pub fn read_from<R>(&self, mut reader: R) -> Result<Vec<u8>, Error>
    where
        R: Read + Seek,
    {
        let io_error = |source| ErrorKind::Io {
            offset: Some(self.offset),
            source,
        };
        reader.seek(SeekFrom::Start(self.offset)).map_err(io_error)?;
        let mut out = Vec::with_capacity(self.length.min(1024 * 1024) as usize);
        let read = reader
            .take(self.length)
            .read_to_end(&mut out)
            .map_err(io_error)?;
        if (read as u64) < self.length {
            return Err(ErrorKind::Eof {
                offset: self.offset + read as u64,
            }
            .into());
        }
        Ok(out)
    }
}

impl From<ArchiveEntry> for (u64, u64) {
    fn from(entry: ArchiveEntry) -> Self {
        (entry.offset, entry.length)
    }
}

/// The file index of a packed archive: every asset path and the byte range
/// that holds it.
///
/// The index holds no reference to the stream it was read from. Asset bytes
/// are fetched by handing a reader to [`ArchiveIndex::read_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveIndex {
    index_offset: u64,
    metadata: ArchiveMetadata,
    files: HashMap<String, ArchiveEntry>,
}

impl ArchiveIndex {
    /// Reads the index of an `SBAsset6` archive
    pub fn open<R>(reader: R) -> Result<ArchiveIndex, Error>
    where
        R: Read + Seek,
    {
        ArchiveIndex::open_with(reader, &ArchiveOptions::default())
    }

    /// Reads the index of an archive held in memory
    pub fn from_slice(data: &[u8]) -> Result<ArchiveIndex, Error> {
        ArchiveIndex::open(Cursor::new(data))
    }

    /// Reads the index with custom options.
    ///
    /// The stream is read from its start. The header magic is verified before
    /// any seek past the header is performed.
    pub fn open_with<R>(reader: R, options: &ArchiveOptions) -> Result<ArchiveIndex, Error>
    where
        R: Read + Seek,
    {
        let mut stream = StreamDecoder::new(reader);
        stream.seek_to(0)?;

        check_magic(&mut stream, options.magic)?;

        let index_offset = stream.read_range_value()?;
        stream.seek_to(index_offset)?;

        let found = stream.read_bytes::<5>()?;
        if found != INDEX_MAGIC {
            return Err(ErrorKind::BadIndexMagic {
                found,
                offset: index_offset,
            }
            .into());
        }

        let metadata = read_metadata(&mut stream, options.raw_byte_tag)?;
        let file_count = stream.read_unsigned()?;
        let records = options.record_bound.records(file_count);

        tracing::debug!(
            index_offset,
            metadata = metadata.len(),
            file_count,
            records,
            "reading archive index"
        );

        // every record spans at least 17 bytes
        let mut files = HashMap::with_capacity(records.min(64 * 1024) as usize);
        for _ in 0..records {
            let path_len = stream.read_u8()?;
            let path = stream.read_string(u64::from(path_len))?;
            let offset = stream.read_range_value()?;
            let length = stream.read_range_value()?;
            let entry = ArchiveEntry { offset, length };
            tracing::trace!(path = %path, offset, length, "archive record");
            if let Some(previous) = files.insert(path, entry) {
                tracing::warn!(
                    ?previous,
                    ?entry,
                    "duplicate archive path, keeping the later record"
                );
            }
        }

        tracing::debug!(
            files = files.len(),
            index_end = stream.position(),
            "read archive index"
        );

        Ok(ArchiveIndex {
            index_offset,
            metadata,
            files,
        })
    }

    /// Returns the byte range of a file, if present
    pub fn lookup(&self, key: &str) -> Option<ArchiveEntry> {
        self.files.get(key).copied()
    }

    /// Returns true if the archive holds the path
    pub fn contains(&self, key: &str) -> bool {
        self.files.contains_key(key)
    }

    /// Iterate over every path in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.keys().map(String::as_str)
    }

    /// Iterate over every path and range in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, ArchiveEntry)> + '_ {
        self.files.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of files in the index
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The opaque metadata stored ahead of the file records
    pub fn metadata(&self) -> &ArchiveMetadata {
        &self.metadata
    }

    /// Where the index block starts within the archive
    pub fn index_offset(&self) -> u64 {
        self.index_offset
    }

    /// Reads the bytes of a file from the archive's backing store. Returns
    /// `None` when the path is not in the index.
    pub fn read_entry<R>(&self, reader: R, key: &str) -> Result<Option<Vec<u8>>, Error>
    where
        R: Read + Seek,
    {
        match self.lookup(key) {
            Some(entry) => entry.read_from(reader).map(Some),
            None => Ok(None),
        }
    }
}

/// A stream shorter than the magic is only truncated when what it holds is
/// the start of the magic. Anything else is a different kind of file.
fn check_magic<R>(stream: &mut StreamDecoder<R>, expected: [u8; 8]) -> Result<(), Error>
where
    R: Read + Seek,
{
    let (found, filled) = stream.read_prefix::<8>()?;
    if found == expected {
        Ok(())
    } else if filled < expected.len() && expected.starts_with(&found[..filled]) {
        Err(stream.eof_error())
    } else {
        Err(ErrorKind::BadArchiveMagic { found }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn archive_with_records(file_count: u8, records: &[(&str, i64, i64)]) -> Vec<u8> {
        let mut data = SBASSET6_MAGIC.to_vec();
        data.extend_from_slice(&16i64.to_be_bytes());
        data.extend_from_slice(&INDEX_MAGIC);
        data.push(0x00);
        data.push(file_count);
        for (path, offset, length) in records {
            data.push(path.len() as u8);
            data.extend_from_slice(path.as_bytes());
            data.extend_from_slice(&offset.to_be_bytes());
            data.extend_from_slice(&length.to_be_bytes());
        }
        data
    }

    #[rstest]
    #[case(RecordBound::Exact, 3, 3)]
    #[case(RecordBound::Exact, 0, 0)]
    #[case(RecordBound::SkipLast, 3, 2)]
    #[case(RecordBound::SkipLast, 0, 0)]
    fn test_record_bound(#[case] bound: RecordBound, #[case] count: u64, #[case] expected: u64) {
        assert_eq!(bound.records(count), expected);
    }

    #[test]
    fn test_open_minimal() {
        let data = archive_with_records(1, &[("foo.txt", 100, 5)]);
        let index = ArchiveIndex::from_slice(&data).unwrap();
        assert_eq!(
            index.lookup("foo.txt"),
            Some(ArchiveEntry {
                offset: 100,
                length: 5
            })
        );
        assert_eq!(index.lookup("missing"), None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.index_offset(), 16);
        assert!(index.metadata().is_empty());
    }

    #[test]
    fn test_skip_last_ignores_final_record() {
        let data = archive_with_records(2, &[("a", 0, 1), ("b", 1, 1)]);
        let options = ArchiveOptions::new().with_record_bound(RecordBound::SkipLast);
        let index = ArchiveIndex::open_with(Cursor::new(&data), &options).unwrap();
        assert!(index.contains("a"));
        assert!(!index.contains("b"));
    }

    #[test]
    fn test_negative_length_rejected() {
        let data = archive_with_records(1, &[("a", 0, -5)]);
        let err = ArchiveIndex::from_slice(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidRange { value: -5, offset: 33 }
        ));
    }

    #[test]
    fn test_negative_index_offset_rejected() {
        let mut data = SBASSET6_MAGIC.to_vec();
        data.extend_from_slice(&(-16i64).to_be_bytes());
        let err = ArchiveIndex::from_slice(&data).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidRange { value: -16, offset: 8 }
        ));
    }

    #[test]
    fn test_count_larger_than_records() {
        let data = archive_with_records(3, &[("a", 0, 1)]);
        let err = ArchiveIndex::from_slice(&data).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { .. }));
    }

    #[test]
    fn test_duplicate_paths_keep_last() {
        let data = archive_with_records(2, &[("a", 0, 1), ("a", 7, 2)]);
        let index = ArchiveIndex::from_slice(&data).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("a").map(<(u64, u64)>::from), Some((7, 2)));
    }

    #[rstest]
    #[case(b"", 0)]
    #[case(b"SB", 2)]
    #[case(b"SBAsset", 7)]
    fn test_truncated_magic_is_eof(#[case] data: &[u8], #[case] offset: u64) {
        let err = ArchiveIndex::from_slice(data).unwrap_err();
        assert_eq!(err.offset(), Some(offset));
        assert!(matches!(err.kind(), ErrorKind::Eof { .. }));
        assert!(!err.is_incompatible_file());
    }

    #[rstest]
    #[case(b"PK\x03\x04", *b"PK\x03\x04\0\0\0\0")]
    #[case(b"SBVJ01", *b"SBVJ01\0\0")]
    #[case(b"SBAsset5\0\0", *b"SBAsset5")]
    fn test_foreign_magic_is_incompatible(#[case] data: &[u8], #[case] expected: [u8; 8]) {
        let err = ArchiveIndex::from_slice(data).unwrap_err();
        assert!(err.is_incompatible_file());
        match err.kind() {
            ErrorKind::BadArchiveMagic { found } => assert_eq!(*found, expected),
            x => panic!("unexpected error: {:?}", x),
        }
    }

    #[test]
    fn test_entry_range() {
        let entry = ArchiveEntry {
            offset: 10,
            length: 4,
        };
        assert_eq!(entry.range(), 10..14);
    }

    #[test]
    fn test_read_entry_past_end() {
        let data = archive_with_records(1, &[("a", 40, 1000)]);
        let index = ArchiveIndex::from_slice(&data).unwrap();
        let err = index.read_entry(Cursor::new(&data), "a").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { .. }));
        assert!(index.read_entry(Cursor::new(&data), "b").unwrap().is_none());
    }
}

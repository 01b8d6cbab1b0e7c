use crate::{
    decoder::Decoder,
    variant::{read_variant, write_str},
    vlq::write_unsigned,
    DecodeOptions, Error, ErrorKind, Variant,
};
use std::io::{Read, Write};

/// Magic of versioned entity saves (`.player`, `.metadata`, ...)
pub const SBVJ01_MAGIC: [u8; 6] = *b"SBVJ01";

/// Customizes how entity records are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityOptions {
    magic: [u8; 6],
    decode: DecodeOptions,
}

impl Default for EntityOptions {
    fn default() -> Self {
        EntityOptions {
            magic: SBVJ01_MAGIC,
            decode: DecodeOptions::default(),
        }
    }
}

impl EntityOptions {
    /// Creates the structure with default options
    pub fn new() -> Self {
        EntityOptions::default()
    }

    /// Sets the magic a record must start with
    pub fn with_magic(mut self, magic: [u8; 6]) -> EntityOptions {
        self.magic = magic;
        self
    }

    /// Sets the options used to decode the root variant
    pub fn with_decode_options(mut self, decode: DecodeOptions) -> EntityOptions {
        self.decode = decode;
        self
    }

    pub fn magic(&self) -> [u8; 6] {
        self.magic
    }

    pub fn decode_options(&self) -> DecodeOptions {
        self.decode
    }
}

/// A complete entity save: header fields, the root variant, and whatever
/// bytes followed the root variant
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Format revision the record was read with
    pub magic: [u8; 6],

    /// The entity type, eg: `PlayerEntity`
    pub name: String,

    pub version: i32,

    pub subversion: u64,

    /// The entity's field tree, almost always a map
    pub root: Variant,

    /// Bytes after the root variant. Never interpreted, written back as is.
    pub tail: Vec<u8>,
}

impl EntityRecord {
    /// Creates an `SBVJ01` record without any trailing bytes
    pub fn new<S: Into<String>>(name: S, version: i32, root: Variant) -> Self {
        EntityRecord {
            magic: SBVJ01_MAGIC,
            name: name.into(),
            version,
            subversion: 0,
            root,
            tail: Vec::new(),
        }
    }

    /// Decodes an `SBVJ01` record
    pub fn from_slice(data: &[u8]) -> Result<EntityRecord, Error> {
        EntityRecord::from_slice_with(data, &EntityOptions::default())
    }

    /// Decodes a record with custom options.
    ///
    /// The magic is verified before anything else is read, so a file of a
    /// different revision is rejected rather than decoded into garbage.
    pub fn from_slice_with(data: &[u8], options: &EntityOptions) -> Result<EntityRecord, Error> {
        let magic = check_magic(data, options.magic)?;
        let mut decoder = Decoder::at(data, magic.len());
        let name = decoder.read_str()?.to_owned();
        let version = decoder.read_i32()?;
        let subversion = decoder.read_unsigned()?;
        let root_offset = decoder.position();
        let root = read_variant(&mut decoder, &options.decode)?;
        let tail = decoder.take_rest().to_vec();

        tracing::debug!(
            entity = %name,
            version,
            subversion,
            root_offset,
            tail_len = tail.len(),
            "decoded entity record"
        );

        Ok(EntityRecord {
            magic,
            name,
            version,
            subversion,
            root,
            tail,
        })
    }

    /// Reads the rest of a stream and decodes it as an `SBVJ01` record
    pub fn from_reader<R: Read>(reader: R) -> Result<EntityRecord, Error> {
        EntityRecord::from_reader_with(reader, &EntityOptions::default())
    }

    pub fn from_reader_with<R: Read>(
        mut reader: R,
        options: &EntityOptions,
    ) -> Result<EntityRecord, Error> {
        let mut data = Vec::new();
        if let Err(source) = reader.read_to_end(&mut data) {
            return Err(ErrorKind::Io {
                offset: Some(data.len() as u64),
                source,
            }
            .into());
        }
        EntityRecord::from_slice_with(&data, options)
    }

    /// Encodes the record, including the untouched tail
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.magic.len() + self.name.len() + 16 + self.tail.len());
        out.extend_from_slice(&self.magic);
        write_str(&mut out, &self.name);
        out.extend_from_slice(&self.version.to_be_bytes());
        write_unsigned(&mut out, self.subversion);
        self.root.write_to(&mut out);
        out.extend_from_slice(&self.tail);
        out
    }

    /// Writes the encoded record to a writer
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}

fn check_magic(data: &[u8], expected: [u8; 6]) -> Result<[u8; 6], Error> {
    match data.first_chunk::<6>() {
        Some(found) if *found == expected => Ok(*found),
        Some(found) => Err(ErrorKind::WrongFormatVersion {
            found: *found,
            expected,
        }
        .into()),
        None if expected.starts_with(data) => Err(ErrorKind::Eof {
            offset: data.len() as u64,
        }
        .into()),
        None => {
            let mut found = [0u8; 6];
            found[..data.len()].copy_from_slice(data);
            Err(ErrorKind::WrongFormatVersion { found, expected }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariantMap;

    fn sample() -> EntityRecord {
        let root: VariantMap = [("hp", 100.0)].into_iter().collect();
        EntityRecord::new("test", 1, Variant::Map(root))
    }

    #[test]
    fn test_encode_layout() {
        let data = sample().to_bytes();
        let mut expected = b"SBVJ01".to_vec();
        expected.extend_from_slice(&[0x04, b't', b'e', b's', b't']);
        expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        expected.push(0x00);
        expected.extend_from_slice(&[0x07, 0x01, 0x02, b'h', b'p']);
        expected.extend_from_slice(&[0x02, 0x40, 0x59, 0, 0, 0, 0, 0, 0]);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_tail_is_kept() {
        let mut record = sample();
        record.tail = vec![0xde, 0xad, 0xbe, 0xef];
        let data = record.to_bytes();
        let actual = EntityRecord::from_slice(&data).unwrap();
        assert_eq!(actual.tail, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(actual.to_bytes(), data);
    }

    #[test]
    fn test_wrong_magic_rejected_before_parsing() {
        let mut data = sample().to_bytes();
        data[5] = b'2';
        let err = EntityRecord::from_slice(&data).unwrap_err();
        assert!(err.is_incompatible_file());
        match err.kind() {
            ErrorKind::WrongFormatVersion { found, expected } => {
                assert_eq!(found, b"SBVJ02");
                assert_eq!(expected, b"SBVJ01");
            }
            x => panic!("unexpected error: {:?}", x),
        }
    }

    #[test]
    fn test_short_input() {
        let err = EntityRecord::from_slice(b"SBV").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 3 }));

        let err = EntityRecord::from_slice(b"PK").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::WrongFormatVersion { .. }));

        let err = EntityRecord::from_slice(b"").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 0 }));
    }

    #[test]
    fn test_custom_magic() {
        let mut record = sample();
        record.magic = *b"SBVJ02";
        let data = record.to_bytes();

        assert!(EntityRecord::from_slice(&data).is_err());
        let options = EntityOptions::new().with_magic(*b"SBVJ02");
        let actual = EntityRecord::from_slice_with(&data, &options).unwrap();
        assert_eq!(actual, record);
    }

    #[test]
    fn test_truncated_root_reports_offset() {
        let data = sample().to_bytes();
        let truncated = &data[..data.len() - 3];
        let err = EntityRecord::from_slice(truncated).unwrap_err();
        // the double payload starts right after its tag
        let double_start = data.len() - 8;
        assert!(matches!(err.kind(), ErrorKind::Eof { offset } if *offset == double_start as u64));
    }

    struct Denied;

    impl Read for Denied {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_from_reader_io_error_offset() {
        let err = EntityRecord::from_reader((&b"SBV"[..]).chain(Denied)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io { offset: Some(3), .. }));
    }

    #[test]
    fn test_from_reader() {
        let data = sample().to_bytes();
        let actual = EntityRecord::from_reader(&data[..]).unwrap();
        assert_eq!(actual, sample());

        let mut out = Vec::new();
        actual.write(&mut out).unwrap();
        assert_eq!(out, data);
    }
}

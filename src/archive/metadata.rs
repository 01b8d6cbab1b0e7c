use super::stream::StreamDecoder;
use crate::Error;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// The type tag whose metadata values are a single raw byte. Every other tag
/// is followed by a VLQ length prefixed byte string.
pub const RAW_BYTE_TAG: u8 = 3;

/// An uninterpreted metadata value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataValue {
    /// A value stored under the raw byte tag
    Byte(u8),

    /// A length prefixed value and the type tag it was stored under
    Bytes { tag: u8, data: Vec<u8> },
}

impl MetadataValue {
    /// Returns the bytes of the value
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MetadataValue::Byte(x) => std::slice::from_ref(x),
            MetadataValue::Bytes { data, .. } => data.as_slice(),
        }
    }

    /// Returns the type tag the value was stored under
    pub fn tag(&self, raw_byte_tag: u8) -> u8 {
        match self {
            MetadataValue::Byte(_) => raw_byte_tag,
            MetadataValue::Bytes { tag, .. } => *tag,
        }
    }
}

/// Key value pairs stored ahead of the file index. Values are kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveMetadata {
    entries: HashMap<String, MetadataValue>,
}

impl ArchiveMetadata {
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the metadata in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

pub(crate) fn read_metadata<R>(
    stream: &mut StreamDecoder<R>,
    raw_byte_tag: u8,
) -> Result<ArchiveMetadata, Error>
where
    R: Read + Seek,
{
    let count = stream.read_unsigned()?;
    let mut entries = HashMap::with_capacity(count.min(256) as usize);
    for _ in 0..count {
        let key = stream.read_vlq_string()?;
        let tag = stream.read_u8()?;
        let value = if tag == raw_byte_tag {
            MetadataValue::Byte(stream.read_u8()?)
        } else {
            let len = stream.read_unsigned()?;
            let data = stream.read_vec(len)?;
            MetadataValue::Bytes { tag, data }
        };
        entries.insert(key, value);
    }

    Ok(ArchiveMetadata { entries })
}

use std::fmt;

/// An error that can occur when decoding or encoding data
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Consume the error and return the specific type of error
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    /// Returns the byte offset that the error occurs (if available)
    pub fn offset(&self) -> Option<u64> {
        self.0.offset()
    }

    /// Returns true when the input is not the kind of file that was expected
    /// (wrong save revision or not an archive), as opposed to a compatible
    /// file that is corrupt.
    pub fn is_incompatible_file(&self) -> bool {
        matches!(
            *self.0,
            ErrorKind::WrongFormatVersion { .. }
                | ErrorKind::BadArchiveMagic { .. }
                | ErrorKind::BadIndexMagic { .. }
        )
    }
}

/// Specific type of error
#[derive(Debug)]
pub enum ErrorKind {
    /// Unexpected end of input while in the middle of a field
    Eof { offset: u64 },

    /// A variable length integer used more than 70 bits or overflowed 64 bits
    MalformedInteger { offset: u64 },

    /// A variant tag outside of 1 through 7 was encountered
    UnknownVariantTag { tag: u64, offset: u64 },

    /// A string payload was not valid UTF-8
    InvalidUtf8 {
        offset: u64,
        source: std::str::Utf8Error,
    },

    /// Variants were nested deeper than the configured limit
    MaxDepthExceeded { max_depth: usize, offset: u64 },

    /// An entity record did not start with the expected magic
    WrongFormatVersion { found: [u8; 6], expected: [u8; 6] },

    /// An archive did not start with the expected magic
    BadArchiveMagic { found: [u8; 8] },

    /// The archive index offset did not point to an index block
    BadIndexMagic { found: [u8; 5], offset: u64 },

    /// Input remained after a value that was expected to span the whole input
    TrailingData { offset: u64 },

    /// An offset or length in an archive was negative
    InvalidRange { value: i64, offset: u64 },

    /// An archive path does not fit in a one byte length prefix
    PathTooLong { path: String },

    /// A length prefixed metadata value was given the tag reserved for raw bytes
    ReservedMetadataTag { key: String, tag: u8 },

    /// IO error while reading from or writing to a stream. The offset is
    /// known when the error occurred while decoding an archive stream.
    Io {
        offset: Option<u64>,
        source: std::io::Error,
    },
}

impl ErrorKind {
    pub fn offset(&self) -> Option<u64> {
        match *self {
            ErrorKind::Eof { offset } => Some(offset),
            ErrorKind::MalformedInteger { offset } => Some(offset),
            ErrorKind::UnknownVariantTag { offset, .. } => Some(offset),
            ErrorKind::InvalidUtf8 { offset, .. } => Some(offset),
            ErrorKind::MaxDepthExceeded { offset, .. } => Some(offset),
            ErrorKind::WrongFormatVersion { .. } => Some(0),
            ErrorKind::BadArchiveMagic { .. } => Some(0),
            ErrorKind::BadIndexMagic { offset, .. } => Some(offset),
            ErrorKind::TrailingData { offset } => Some(offset),
            ErrorKind::InvalidRange { offset, .. } => Some(offset),
            ErrorKind::PathTooLong { .. }
            | ErrorKind::ReservedMetadataTag { .. } => None,
            ErrorKind::Io { offset, .. } => offset,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::InvalidUtf8 { ref source, .. } => Some(source),
            ErrorKind::Io { ref source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Eof { offset } => {
                write!(f, "unexpected end of input (offset: {})", offset)
            }
            ErrorKind::MalformedInteger { offset } => {
                write!(f, "malformed variable length integer (offset: {})", offset)
            }
            ErrorKind::UnknownVariantTag { tag, offset } => write!(
                f,
                "unknown variant tag encountered (tag: {}, offset: {})",
                tag, offset
            ),
            ErrorKind::InvalidUtf8 { offset, .. } => {
                write!(f, "string is not valid utf-8 (offset: {})", offset)
            }
            ErrorKind::MaxDepthExceeded { max_depth, offset } => write!(
                f,
                "variants nested deeper than {} levels (offset: {})",
                max_depth, offset
            ),
            ErrorKind::WrongFormatVersion { found, expected } => write!(
                f,
                "not a compatible save file: expected {} magic but found {}",
                String::from_utf8_lossy(&expected),
                String::from_utf8_lossy(&found)
            ),
            ErrorKind::BadArchiveMagic { found } => write!(
                f,
                "not a compatible archive: unrecognized magic {}",
                String::from_utf8_lossy(&found)
            ),
            ErrorKind::BadIndexMagic { found, offset } => write!(
                f,
                "not a compatible archive: expected INDEX but found {} (offset: {})",
                String::from_utf8_lossy(&found),
                offset
            ),
            ErrorKind::TrailingData { offset } => {
                write!(f, "unexpected data after value (offset: {})", offset)
            }
            ErrorKind::InvalidRange { value, offset } => {
                write!(f, "negative archive range {} (offset: {})", value, offset)
            }
            ErrorKind::PathTooLong { ref path } => {
                write!(f, "archive path is longer than 255 bytes: {}", path)
            }
            ErrorKind::ReservedMetadataTag { ref key, tag } => write!(
                f,
                "metadata {} uses tag {} which is reserved for single byte values",
                key, tag
            ),
            ErrorKind::Io {
                offset: Some(offset),
                ref source,
            } => write!(f, "io error: {} (offset: {})", source, offset),
            ErrorKind::Io {
                offset: None,
                ref source,
            } => write!(f, "io error: {}", source),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::new(ErrorKind::Io {
            offset: None,
            source: error,
        })
    }
}

use crate::{util::be_i64, vlq, Error, ErrorKind};
use std::io::{self, Read, Seek, SeekFrom};

/// Wraps a caller supplied stream and tracks the absolute position so that
/// errors point at the offending byte of the archive.
pub(crate) struct StreamDecoder<R> {
    reader: R,
    position: u64,
}

impl<R> StreamDecoder<R>
where
    R: Read + Seek,
{
    pub fn new(reader: R) -> Self {
        StreamDecoder {
            reader,
            position: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn seek_to(&mut self, position: u64) -> Result<(), Error> {
        let result = self.reader.seek(SeekFrom::Start(position));
        self.position = result.map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> Error {
        ErrorKind::Io {
            offset: Some(self.position),
            source,
        }
        .into()
    }

    fn eof_or_io(&self, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            self.eof_error()
        } else {
            self.io_error(err)
        }
    }

    /// Reads up to `N` bytes, stopping early only at the end of the stream.
    /// Returns the buffer and how many bytes were filled.
    pub fn read_prefix<const N: usize>(&mut self) -> Result<([u8; N], usize), Error> {
        let mut buf = [0u8; N];
        let mut filled = 0;
        while filled < N {
            let result = self.reader.read(&mut buf[filled..]);
            match result {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.position += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.io_error(e)),
            }
        }
        Ok((buf, filled))
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        let result = self.reader.read_exact(&mut buf);
        result.map_err(|e| self.eof_or_io(e))?;
        self.position += N as u64;
        Ok(buf)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let [byte] = self.read_bytes::<1>()?;
        Ok(byte)
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_bytes::<8>().map(be_i64)
    }

    /// Reads a big endian i64 that must not be negative
    pub fn read_range_value(&mut self) -> Result<u64, Error> {
        let offset = self.position;
        let value = self.read_i64()?;
        u64::try_from(value).map_err(|_| ErrorKind::InvalidRange { value, offset }.into())
    }

    pub fn read_unsigned(&mut self) -> Result<u64, Error> {
        let start = self.position;
        let (value, len) = vlq::read_unsigned(&mut self.reader).map_err(|e| {
            match e.into_kind() {
                ErrorKind::Eof { offset } => ErrorKind::Eof {
                    offset: start + offset,
                },
                ErrorKind::MalformedInteger { .. } => {
                    ErrorKind::MalformedInteger { offset: start }
                }
                ErrorKind::Io { offset, source } => ErrorKind::Io {
                    offset: Some(start + offset.unwrap_or(0)),
                    source,
                },
                x => x,
            }
        })?;
        self.position += len as u64;
        Ok(value)
    }

    /// Reads exactly `len` bytes without trusting `len` for allocation
    pub fn read_vec(&mut self, len: u64) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(len.min(64 * 1024) as usize);
        let result = (&mut self.reader).take(len).read_to_end(&mut out);
        let read = result.map_err(|e| self.eof_or_io(e))?;
        self.position += read as u64;
        if (read as u64) < len {
            return Err(self.eof_error());
        }
        Ok(out)
    }

    pub fn read_string(&mut self, len: u64) -> Result<String, Error> {
        let offset = self.position;
        let data = self.read_vec(len)?;
        String::from_utf8(data).map_err(|e| {
            ErrorKind::InvalidUtf8 {
                offset,
                source: e.utf8_error(),
            }
            .into()
        })
    }

    /// Reads a VLQ length prefixed UTF-8 string
    pub fn read_vlq_string(&mut self) -> Result<String, Error> {
        let offset = self.position;
        let len = self.read_unsigned()?;
        self.read_string(len).map_err(|e| match e.into_kind() {
            ErrorKind::InvalidUtf8 { source, .. } => ErrorKind::InvalidUtf8 { offset, source }.into(),
            x => x.into(),
        })
    }

    #[inline]
    pub fn eof_error(&self) -> Error {
        ErrorKind::Eof {
            offset: self.position,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_positions_follow_reads() {
        let mut data = vec![0x81, 0x00];
        data.extend_from_slice(&(-1i64).to_be_bytes());
        let mut stream = StreamDecoder::new(Cursor::new(data));
        assert_eq!(stream.read_unsigned().unwrap(), 128);
        assert_eq!(stream.position(), 2);

        let err = stream.read_range_value().unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidRange {
                value: -1,
                offset: 2
            }
        ));
        assert_eq!(stream.position(), 10);
    }

    #[test]
    fn test_truncated_vlq_offset() {
        let mut stream = StreamDecoder::new(Cursor::new(vec![0x00, 0x81]));
        stream.read_u8().unwrap();
        let err = stream.read_unsigned().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 2 }));
    }

    #[test]
    fn test_read_vec_short() {
        let mut stream = StreamDecoder::new(Cursor::new(vec![1, 2, 3]));
        let err = stream.read_vec(u64::MAX).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Eof { offset: 3 }));
    }

    #[test]
    fn test_read_vlq_string_utf8_offset() {
        let mut stream = StreamDecoder::new(Cursor::new(vec![0x00, 0x02, 0xff, 0xff]));
        stream.read_u8().unwrap();
        let err = stream.read_vlq_string().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidUtf8 { offset: 1, .. }));
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    impl Seek for Broken {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Ok(4)
        }
    }

    #[test]
    fn test_io_errors_carry_position() {
        let mut stream = StreamDecoder::new(Broken);
        stream.seek_to(4).unwrap();
        let err = stream.read_u8().unwrap_err();
        assert_eq!(err.offset(), Some(4));
        assert!(matches!(
            err.kind(),
            ErrorKind::Io { offset: Some(4), source } if source.kind() == io::ErrorKind::PermissionDenied
        ));

        let err = stream.read_unsigned().unwrap_err();
        assert_eq!(err.offset(), Some(4));

        let err = stream.read_prefix::<8>().unwrap_err();
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_read_prefix_stops_at_end() {
        let mut stream = StreamDecoder::new(Cursor::new(b"PK\x03\x04".to_vec()));
        let (buf, filled) = stream.read_prefix::<8>().unwrap();
        assert_eq!(filled, 4);
        assert_eq!(&buf, b"PK\x03\x04\0\0\0\0");
        assert_eq!(stream.position(), 4);
    }

    #[test]
    fn test_seek_to() {
        let mut stream = StreamDecoder::new(Cursor::new(vec![0, 0, 0, 7]));
        stream.seek_to(3).unwrap();
        assert_eq!(stream.read_u8().unwrap(), 7);
        assert_eq!(stream.position(), 4);
    }
}

use crate::{
    util::{be_f64, be_i32, get_split},
    vlq::{self, read_unsigned_slice},
    Error, ErrorKind,
};

/// A forward only cursor over a byte slice that tracks the absolute position
/// of every read so errors can point at the offending byte.
#[derive(Debug, Clone)]
pub(crate) struct Decoder<'a> {
    data: &'a [u8],
    original_length: usize,
    base: usize,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Start decoding at `pos` within `data`. Positions reported by the
    /// decoder are relative to the start of `data`.
    #[inline]
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        let data_rest = data.get(pos..).unwrap_or_default();
        Self {
            data: data_rest,
            original_length: data_rest.len(),
            base: pos,
        }
    }

    #[inline]
    pub fn remainder(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.consumed()
    }

    /// Number of bytes consumed since the decoder was created
    #[inline]
    pub fn consumed(&self) -> usize {
        self.original_length - self.data.len()
    }

    #[inline]
    pub fn eof_error(&self) -> Error {
        ErrorKind::Eof {
            offset: self.position() as u64,
        }
        .into()
    }

    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let (head, rest) = get_split::<N>(self.data).ok_or_else(|| self.eof_error())?;
        self.data = rest;
        Ok(head)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let [byte] = self.read_bytes::<1>()?;
        Ok(byte)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.read_u8().map(|x| x != 0)
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_bytes::<4>().map(be_i32)
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.read_bytes::<8>().map(be_f64)
    }

    #[inline]
    pub fn read_unsigned(&mut self) -> Result<u64, Error> {
        let (value, len) =
            read_unsigned_slice(self.data).map_err(|e| e.at(self.position() as u64))?;
        self.data = &self.data[len..];
        Ok(value)
    }

    #[inline]
    pub fn read_signed(&mut self) -> Result<i64, Error> {
        self.read_unsigned().map(vlq::unzigzag)
    }

    /// Reads an unsigned quantity that must fit within the remaining input
    /// when treated as a byte length.
    #[inline]
    pub fn read_len(&mut self) -> Result<usize, Error> {
        let start = self.position();
        let len = self.read_unsigned()?;
        match usize::try_from(len) {
            Ok(len) if len <= self.data.len() => Ok(len),
            _ => Err(ErrorKind::Eof {
                offset: start as u64,
            }
            .into()),
        }
    }

    #[inline]
    pub fn read_slice(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_len()?;
        let (head, rest) = self.data.split_at(len);
        self.data = rest;
        Ok(head)
    }

    #[inline]
    pub fn read_str(&mut self) -> Result<&'a str, Error> {
        let offset = self.position() as u64;
        let data = self.read_slice()?;
        std::str::from_utf8(data).map_err(|source| ErrorKind::InvalidUtf8 { offset, source }.into())
    }

    /// Consume and return everything that has not been read
    #[inline]
    pub fn take_rest(&mut self) -> &'a [u8] {
        std::mem::take(&mut self.data)
    }
}

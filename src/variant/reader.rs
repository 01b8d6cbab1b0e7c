use super::{Variant, VariantMap, VariantTag};
use crate::{decoder::Decoder, Error, ErrorKind};
use std::collections::HashMap;

/// The deepest a list or map may be nested before decoding is aborted
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Customizes how variants are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    /// Creates the structure with default options
    pub fn new() -> Self {
        DecodeOptions::default()
    }

    /// Sets how many lists and maps may be nested within each other. A value
    /// of zero only allows scalars.
    pub fn with_max_depth(mut self, max_depth: usize) -> DecodeOptions {
        self.max_depth = max_depth;
        self
    }

    /// Returns the configured nesting limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Variant {
    /// Decodes a single variant that starts at `pos` within `data`.
    ///
    /// Returns the variant and the number of bytes consumed. Bytes after the
    /// variant are ignored.
    ///
    /// ```
    /// use sbon::Variant;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let data = [0xff, 0x05, 0x02, b'h', b'i'];
    /// let (value, consumed) = Variant::decode(&data, 1)?;
    /// assert_eq!(value, Variant::from("hi"));
    /// assert_eq!(consumed, 4);
    /// # Ok(())
    /// # }
    /// ```
    pub fn decode(data: &[u8], pos: usize) -> Result<(Variant, usize), Error> {
        Variant::decode_with(data, pos, &DecodeOptions::default())
    }

    /// Decodes a single variant with custom options
    pub fn decode_with(
        data: &[u8],
        pos: usize,
        options: &DecodeOptions,
    ) -> Result<(Variant, usize), Error> {
        let mut decoder = Decoder::at(data, pos);
        let value = read_variant(&mut decoder, options)?;
        Ok((value, decoder.consumed()))
    }

    /// Decodes a variant that must span the entire input
    pub fn from_slice(data: &[u8]) -> Result<Variant, Error> {
        let mut decoder = Decoder::new(data);
        let value = read_variant(&mut decoder, &DecodeOptions::default())?;
        if decoder.remainder().is_empty() {
            Ok(value)
        } else {
            Err(ErrorKind::TrailingData {
                offset: decoder.position() as u64,
            }
            .into())
        }
    }
}

pub(crate) fn read_variant(
    decoder: &mut Decoder,
    options: &DecodeOptions,
) -> Result<Variant, Error> {
    read_nested(decoder, options, 0)
}

fn read_nested(
    decoder: &mut Decoder,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Variant, Error> {
    let tag_offset = decoder.position();
    let tag = decoder.read_unsigned()?;
    let kind = VariantTag::from_u64(tag).ok_or(ErrorKind::UnknownVariantTag {
        tag,
        offset: tag_offset as u64,
    })?;

    match kind {
        VariantTag::Null => Ok(Variant::Null),
        VariantTag::Double => decoder.read_f64().map(Variant::Double),
        VariantTag::Bool => decoder.read_bool().map(Variant::Bool),
        VariantTag::Int => decoder.read_signed().map(Variant::Int),
        VariantTag::String => decoder.read_str().map(|s| Variant::String(s.to_owned())),
        VariantTag::List => {
            let depth = enter(options, depth, tag_offset)?;
            let count = decoder.read_unsigned()?;

            // every element occupies at least one byte
            let mut values = Vec::with_capacity(capacity_hint(count, decoder));
            for _ in 0..count {
                values.push(read_nested(decoder, options, depth)?);
            }
            Ok(Variant::List(values))
        }
        VariantTag::Map => {
            let depth = enter(options, depth, tag_offset)?;
            let count = decoder.read_unsigned()?;

            // every entry occupies at least two bytes
            let hint = capacity_hint(count, decoder) / 2;
            let mut map = VariantMap::with_capacity(hint);
            let mut seen: HashMap<&str, usize> = HashMap::with_capacity(hint);
            for _ in 0..count {
                let key = decoder.read_str()?;
                let value = read_nested(decoder, options, depth)?;
                match seen.get(key) {
                    Some(&idx) => map.replace_at(idx, value),
                    None => {
                        seen.insert(key, map.len());
                        map.push_unchecked(key.to_owned(), value);
                    }
                }
            }
            Ok(Variant::Map(map))
        }
    }
}

#[inline]
fn enter(options: &DecodeOptions, depth: usize, offset: usize) -> Result<usize, Error> {
    if depth >= options.max_depth {
        Err(ErrorKind::MaxDepthExceeded {
            max_depth: options.max_depth,
            offset: offset as u64,
        }
        .into())
    } else {
        Ok(depth + 1)
    }
}

#[inline]
fn capacity_hint(count: u64, decoder: &Decoder) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(decoder.remainder().len())
}

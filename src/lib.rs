/*!

Codecs for the binary formats of [Starbound](https://playstarbound.com/) save
files and asset archives.

The library covers three layers:

- [`Variant`]: the dynamically typed value tree (null, double, bool,
  integer, string, list, map) that every save is built from
- [`EntityRecord`]: the versioned `SBVJ01` framing around a variant tree
  used by `.player`, `.metadata` and other entity files
- [`ArchiveIndex`]: the file index of `SBAsset6` packed asset archives

## Quick Start

Decode a player save, edit a field, and write it back. Bytes that follow
the root variant are preserved untouched.

```rust
use sbon::{EntityRecord, Variant, VariantMap};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
# let save = {
#     let identity: VariantMap = [("name", "Nova")].into_iter().collect();
#     let root: VariantMap = [("identity", Variant::Map(identity))].into_iter().collect();
#     EntityRecord::new("PlayerEntity", 30, Variant::Map(root)).to_bytes()
# };
let mut record = EntityRecord::from_slice(&save)?;
assert_eq!(record.name, "PlayerEntity");

let name = record.root.pointer_mut("/identity/name").unwrap();
*name = Variant::from("Orion");

let edited = record.to_bytes();
let reread = EntityRecord::from_slice(&edited)?;
assert_eq!(reread.root.pointer("/identity/name"), Some(&Variant::from("Orion")));
# Ok(())
# }
```

## Variants

Variants can be decoded from any position within a buffer. The number of
bytes consumed is returned alongside the value.

```rust
use sbon::Variant;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let data = [0xaa, 0x06, 0x02, 0x04, 0x54, 0x05, 0x02, b'h', b'i'];
let (value, consumed) = Variant::decode(&data, 1)?;
assert_eq!(value, Variant::List(vec![Variant::Int(42), Variant::from("hi")]));
assert_eq!(consumed, data.len() - 1);
assert_eq!(value.encode(), &data[1..]);
# Ok(())
# }
```

## Archives

Opening an archive reads only its index. Files are located by path and
read on demand.

```rust
use sbon::archive::{ArchiveIndex, ArchiveWriter};
use std::io::Cursor;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let mut writer = ArchiveWriter::new();
writer.file("/universe_server.config", b"{}".to_vec())?;
let mut archive = Cursor::new(writer.finish()?);

let index = ArchiveIndex::open(&mut archive)?;
let entry = index.lookup("/universe_server.config").unwrap();
assert_eq!((entry.offset, entry.length), (16, 2));
# Ok(())
# }
```

## Caveats

Callers are responsible for:

- Choosing the right entry point for a file (entity record or archive)
- Locating files on disk
- Interpreting the meaning of fields within a variant tree

*/

mod decoder;
mod errors;
pub(crate) mod util;

pub mod archive;
pub mod entity;
pub mod variant;
pub mod vlq;

#[cfg(feature = "json")]
mod json;

pub use self::archive::ArchiveIndex;
pub use self::entity::EntityRecord;
pub use self::errors::*;
pub use self::variant::{DecodeOptions, Variant, VariantMap, VariantTag};

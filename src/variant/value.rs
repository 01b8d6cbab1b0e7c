use super::VariantMap;

/// The wire tag that precedes every variant payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VariantTag {
    /// No payload
    Null = 1,

    /// Big endian IEEE-754 double
    Double = 2,

    /// Single byte, nonzero is true
    Bool = 3,

    /// Signed variable length quantity
    Int = 4,

    /// Length prefixed UTF-8
    String = 5,

    /// Count prefixed sequence of variants
    List = 6,

    /// Count prefixed sequence of string keys and variant values
    Map = 7,
}

impl VariantTag {
    /// Maps a decoded tag to a known kind. Tag 0 is reserved and, like any
    /// tag above 7, has no kind.
    #[inline]
    pub fn from_u64(tag: u64) -> Option<VariantTag> {
        match tag {
            1 => Some(VariantTag::Null),
            2 => Some(VariantTag::Double),
            3 => Some(VariantTag::Bool),
            4 => Some(VariantTag::Int),
            5 => Some(VariantTag::String),
            6 => Some(VariantTag::List),
            7 => Some(VariantTag::Map),
            _ => None,
        }
    }

    /// Returns the numeric value written on the wire
    #[inline]
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

/// A self describing value that makes up the body of save files and the
/// metadata of archives
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    #[default]
    Null,
    Double(f64),
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<Variant>),
    Map(VariantMap),
}

impl Variant {
    /// Returns the wire tag of the value
    pub fn tag(&self) -> VariantTag {
        match self {
            Variant::Null => VariantTag::Null,
            Variant::Double(_) => VariantTag::Double,
            Variant::Bool(_) => VariantTag::Bool,
            Variant::Int(_) => VariantTag::Int,
            Variant::String(_) => VariantTag::String,
            Variant::List(_) => VariantTag::List,
            Variant::Map(_) => VariantTag::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Variant::Double(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Variant::Bool(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Variant::Int(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(x) => Some(x.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Variant]> {
        match self {
            Variant::List(x) => Some(x.as_slice()),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Variant>> {
        match self {
            Variant::List(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&VariantMap> {
        match self {
            Variant::Map(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut VariantMap> {
        match self {
            Variant::Map(x) => Some(x),
            _ => None,
        }
    }

    /// Index into a map by key. Returns `None` for non-maps.
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Look up a nested value with a JSON pointer (RFC 6901) style path
    ///
    /// ```
    /// use sbon::{Variant, VariantMap};
    ///
    /// let identity: VariantMap = [("name", "Tess")].into_iter().collect();
    /// let root: VariantMap = [
    ///     ("identity", Variant::Map(identity)),
    ///     ("tags", Variant::List(vec!["a".into(), "b".into()])),
    /// ]
    /// .into_iter()
    /// .collect();
    /// let root = Variant::Map(root);
    ///
    /// assert_eq!(root.pointer("/identity/name"), Some(&Variant::from("Tess")));
    /// assert_eq!(root.pointer("/tags/1"), Some(&Variant::from("b")));
    /// assert_eq!(root.pointer("/tags/2"), None);
    /// assert_eq!(root.pointer(""), Some(&root));
    /// ```
    pub fn pointer(&self, pointer: &str) -> Option<&Variant> {
        if pointer.is_empty() {
            return Some(self);
        }

        let path = pointer.strip_prefix('/')?;
        path.split('/').try_fold(self, |target, token| {
            let token = unescape_token(token);
            match target {
                Variant::Map(map) => map.get(&token),
                Variant::List(list) => parse_index(&token).and_then(|i| list.get(i)),
                _ => None,
            }
        })
    }

    /// Mutable counterpart of [`Variant::pointer`]
    pub fn pointer_mut(&mut self, pointer: &str) -> Option<&mut Variant> {
        if pointer.is_empty() {
            return Some(self);
        }

        let path = pointer.strip_prefix('/')?;
        path.split('/').try_fold(self, |target, token| {
            let token = unescape_token(token);
            match target {
                Variant::Map(map) => map.get_mut(&token),
                Variant::List(list) => parse_index(&token).and_then(move |i| list.get_mut(i)),
                _ => None,
            }
        })
    }
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn parse_index(token: &str) -> Option<usize> {
    if token.starts_with('+') || (token.starts_with('0') && token.len() > 1) {
        return None;
    }
    token.parse().ok()
}

impl From<f64> for Variant {
    fn from(x: f64) -> Self {
        Variant::Double(x)
    }
}

impl From<bool> for Variant {
    fn from(x: bool) -> Self {
        Variant::Bool(x)
    }
}

impl From<i64> for Variant {
    fn from(x: i64) -> Self {
        Variant::Int(x)
    }
}

impl From<i32> for Variant {
    fn from(x: i32) -> Self {
        Variant::Int(i64::from(x))
    }
}

impl From<String> for Variant {
    fn from(x: String) -> Self {
        Variant::String(x)
    }
}

impl From<&str> for Variant {
    fn from(x: &str) -> Self {
        Variant::String(x.to_owned())
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(x: Vec<Variant>) -> Self {
        Variant::List(x)
    }
}

impl From<VariantMap> for Variant {
    fn from(x: VariantMap) -> Self {
        Variant::Map(x)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(x: Option<T>) -> Self {
        x.map_or(Variant::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(VariantTag::Null))]
    #[case(4, Some(VariantTag::Int))]
    #[case(7, Some(VariantTag::Map))]
    #[case(8, None)]
    #[case(u64::MAX, None)]
    fn test_tag_from_u64(#[case] tag: u64, #[case] expected: Option<VariantTag>) {
        assert_eq!(VariantTag::from_u64(tag), expected);
        if let Some(kind) = expected {
            assert_eq!(u64::from(kind.value()), tag);
        }
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Variant::from(1.5).as_f64(), Some(1.5));
        assert_eq!(Variant::from(true).as_bool(), Some(true));
        assert_eq!(Variant::from(-3).as_i64(), Some(-3));
        assert_eq!(Variant::from("a").as_str(), Some("a"));
        assert_eq!(Variant::from("a").as_i64(), None);
        assert!(Variant::from(None::<i64>).is_null());
        assert_eq!(Variant::from(Some(2)).tag(), VariantTag::Int);
    }

    #[test]
    fn test_pointer_escapes() {
        let map: VariantMap = [("a/b", 1i64), ("m~n", 2)].into_iter().collect();
        let root = Variant::Map(map);
        assert_eq!(root.pointer("/a~1b"), Some(&Variant::Int(1)));
        assert_eq!(root.pointer("/m~0n"), Some(&Variant::Int(2)));
        assert_eq!(root.pointer("a~1b"), None);
    }

    #[test]
    fn test_pointer_rejects_odd_indices() {
        let root = Variant::List(vec![Variant::Null, Variant::Bool(true)]);
        assert_eq!(root.pointer("/1"), Some(&Variant::Bool(true)));
        assert_eq!(root.pointer("/01"), None);
        assert_eq!(root.pointer("/+1"), None);
        assert_eq!(root.pointer("/-1"), None);
        assert_eq!(root.pointer("/1/x"), None);
    }

    #[test]
    fn test_pointer_mut() {
        let inventory: VariantMap = [("money", 100i64)].into_iter().collect();
        let root: VariantMap = [("inventory", inventory)].into_iter().collect();
        let mut root = Variant::Map(root);

        *root.pointer_mut("/inventory/money").unwrap() = Variant::Int(9999);
        assert_eq!(root.pointer("/inventory/money"), Some(&Variant::Int(9999)));
    }
}

use super::Variant;

/// An insertion ordered map of string keys to variants.
///
/// Key order is retained so that a decoded map is written back in the order
/// it was read. Inserting an existing key replaces the value in place, which
/// matches how duplicate keys in a decoded map are resolved: the last value
/// wins while the key keeps its original position.
///
/// Lookups are linear, as the maps found in save files are small.
/// Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct VariantMap {
    entries: Vec<(String, Variant)>,
}

impl VariantMap {
    /// Creates an empty map
    pub fn new() -> Self {
        VariantMap::default()
    }

    /// Creates an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        VariantMap {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Inserts a value, returning the previous value if the key was present
    pub fn insert<K: Into<String>, V: Into<Variant>>(&mut self, key: K, value: V) -> Option<Variant> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Replaces the value at an index known to hold a key. Used by the
    /// decoder, which tracks key positions itself.
    pub(crate) fn replace_at(&mut self, idx: usize, value: Variant) {
        self.entries[idx].1 = value;
    }

    /// Appends an entry without checking for an existing key
    pub(crate) fn push_unchecked(&mut self, key: String, value: Variant) {
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Variant> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Removes a key, keeping the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<Variant> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variant)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Variant)> + '_ {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Variant> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for VariantMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| ov == v))
    }
}

impl<K: Into<String>, V: Into<Variant>> FromIterator<(K, V)> for VariantMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = VariantMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<Variant>> Extend<(K, V)> for VariantMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for VariantMap {
    type Item = (String, Variant);
    type IntoIter = std::vec::IntoIter<(String, Variant)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::ops::Index<&str> for VariantMap {
    type Output = Variant;

    /// Panics if the key is not present
    fn index(&self, key: &str) -> &Variant {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found in variant map: {}", key),
        }
    }
}

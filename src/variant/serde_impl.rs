use super::{Variant, VariantMap};
use serde::{
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

impl Serialize for Variant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Null => serializer.serialize_unit(),
            Variant::Double(x) => serializer.serialize_f64(*x),
            Variant::Bool(x) => serializer.serialize_bool(*x),
            Variant::Int(x) => serializer.serialize_i64(*x),
            Variant::String(x) => serializer.serialize_str(x),
            Variant::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Variant::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for VariantMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct VariantVisitor;

impl<'de> Visitor<'de> for VariantVisitor {
    type Value = Variant;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a null, number, boolean, string, sequence, or map")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Variant, E> {
        Ok(Variant::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Variant, E> {
        Ok(Variant::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Variant, D::Error>
    where
        D: Deserializer<'de>,
    {
        Variant::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Variant, E> {
        Ok(Variant::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Variant, E> {
        Ok(Variant::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Variant, E> {
        // integers beyond i64 can only be represented as doubles
        Ok(i64::try_from(v).map_or(Variant::Double(v as f64), Variant::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Variant, E> {
        Ok(Variant::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Variant, E> {
        Ok(Variant::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Variant, E> {
        Ok(Variant::String(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Variant, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(Variant::List(values))
    }

    fn visit_map<A>(self, access: A) -> Result<Variant, A::Error>
    where
        A: MapAccess<'de>,
    {
        VariantMapVisitor.visit_map(access).map(Variant::Map)
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VariantVisitor)
    }
}

struct VariantMapVisitor;

impl<'de> Visitor<'de> for VariantMapVisitor {
    type Value = VariantMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<VariantMap, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = VariantMap::with_capacity(access.size_hint().unwrap_or(0).min(4096));
        while let Some((key, value)) = access.next_entry::<String, Variant>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for VariantMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(VariantMapVisitor)
    }
}

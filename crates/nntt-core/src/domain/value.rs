//! Parameter values stored in a configuration document.
//!
//! A configuration document is a tree of [`ParamValue`]s.  In practice the
//! tree is at most two levels deep: top-level parameters are either scalars
//! or *groups* (sub-mappings of scalars), but nothing here enforces that.
//!
//! # Why an explicit value type? (for beginners)
//!
//! A YAML document can hold strings, numbers, booleans, nulls, lists, and
//! mappings.  Rather than tie the domain to one parser's value type (such as
//! `serde_yaml::Value`), we define our own closed enum and let `serde`
//! convert to and from any format.  Serialization is `#[serde(untagged)]`, so
//! `ParamValue::Float(0.01)` is written as a bare `0.01`.  Deserialization
//! goes through a hand-written visitor: it reports the parser's own error
//! (with its line and column) instead of a generic "no variant matched", and
//! it accepts scalar mapping keys such as `0: cat` by storing them as
//! strings.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A named collection of parameters, ordered by key.
pub type ParamGroup = BTreeMap<String, ParamValue>;

/// Returned by `Index` when a key is missing, so `value["missing"]` is `Null`
/// rather than a panic.
static NULL: ParamValue = ParamValue::Null;

/// A single configuration value.
///
/// Integral numbers that fit in `i64` deserialize as `Int`; every other
/// number is a `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum ParamValue {
    /// An explicit `null` (`~` in YAML).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    /// A nested mapping of sub-parameters.
    Group(ParamGroup),
}

/// The kind of a [`ParamValue`], used when validating overrides against
/// defaults.
///
/// Integers and floats share the [`ValueKind::Number`] kind: an override of
/// `lr: 1` is accepted for a default of `lr: 0.01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    List,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl ParamValue {
    /// Creates an empty group.
    pub fn empty_group() -> Self {
        ParamValue::Group(ParamGroup::new())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            ParamValue::Null => ValueKind::Null,
            ParamValue::Bool(_) => ValueKind::Boolean,
            ParamValue::Int(_) | ParamValue::Float(_) => ValueKind::Number,
            ParamValue::Str(_) => ValueKind::String,
            ParamValue::List(_) => ValueKind::List,
            ParamValue::Group(_) => ValueKind::Mapping,
        }
    }

    /// Returns `true` if this value is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, ParamValue::Group(_))
    }

    pub fn as_group(&self) -> Option<&ParamGroup> {
        match self {
            ParamValue::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut ParamGroup> {
        match self {
            ParamValue::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a group.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.as_group().and_then(|group| group.get(key))
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<&str> for ParamValue {
    type Output = ParamValue;

    /// Returns the sub-value at `key`, or `Null` when the key is missing or
    /// this value is not a group.
    fn index(&self, key: &str) -> &ParamValue {
        self.get(key).unwrap_or(&NULL)
    }
}

impl IndexMut<&str> for ParamValue {
    /// Returns a mutable reference to the sub-value at `key`, inserting `Null`
    /// if the key is missing.  A `Null` value is first turned into an empty
    /// group, so `store.get("train")["lr"] = 0.01.into()` works on a fresh
    /// store.
    ///
    /// # Panics
    ///
    /// Panics if the value is neither a group nor `Null`.
    fn index_mut(&mut self, key: &str) -> &mut ParamValue {
        if let ParamValue::Null = self {
            *self = ParamValue::empty_group();
        }
        match self {
            ParamValue::Group(group) => group.entry(key.to_string()).or_default(),
            other => panic!("cannot index a {} value with key {key:?}", other.kind()),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<ParamGroup> for ParamValue {
    fn from(value: ParamGroup) -> Self {
        ParamValue::Group(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

// ── Deserialization ───────────────────────────────────────────────────────────

/// Key the TOML deserializer uses to smuggle datetimes through `visit_map`.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ParamValueVisitor)
    }
}

struct ParamValueVisitor;

impl<'de> Visitor<'de> for ParamValueVisitor {
    type Value = ParamValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a null, boolean, number, string, list or mapping")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParamValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParamValue::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ParamValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ParamValue::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(i64::try_from(v).map_or(ParamValue::Float(v as f64), ParamValue::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ParamValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ParamValue::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ParamValue::Str(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(ParamValue::List(items))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut group = ParamGroup::new();
        while let Some(MapKey(key)) = map.next_key()? {
            let value: ParamValue = map.next_value()?;
            group.insert(key, value);
        }
        if group.len() == 1 {
            if let Some(ParamValue::Str(datetime)) = group.get(TOML_DATETIME_KEY) {
                return Ok(ParamValue::Str(datetime.clone()));
            }
        }
        Ok(ParamValue::Group(group))
    }
}

/// A mapping key.  Scalar keys are stored in their display form, so the YAML
/// key `0` becomes `"0"` and `true` becomes `"true"`.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MapKeyVisitor).map(MapKey)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean or null mapping key")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParamValue::Null.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ParamValue::Float(v).to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(v)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => f.write_str("null"),
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x:?}"),
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            ParamValue::Group(group) => {
                f.write_str("{")?;
                for (i, (key, value)) in group.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

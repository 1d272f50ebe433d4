//! Structured key/value attachments for log records
//!
//! A value is a string, a stringifiable object, a nested map, or a list.
//! Values are owned trees, so reference cycles cannot be built.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Metadata attached to a log record, keyed by unique string keys
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A single metadata value
#[derive(Clone)]
pub enum MetadataValue {
    /// Plain text
    String(String),
    /// Any value rendered through its `Display` implementation
    Stringifiable(Arc<dyn fmt::Display + Send + Sync>),
    /// Nested key/value mapping
    Map(Metadata),
    /// Ordered list of values
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    /// Wrap a displayable value, rendering it only when the record is emitted
    pub fn stringifiable<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        MetadataValue::Stringifiable(Arc::new(value))
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => f.write_str(s),
            MetadataValue::Stringifiable(v) => write!(f, "{}", v),
            MetadataValue::Map(map) => fmt_map(map, f),
            MetadataValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Debug for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => f.debug_tuple("String").field(s).finish(),
            MetadataValue::Stringifiable(v) => {
                f.debug_tuple("Stringifiable").field(&v.to_string()).finish()
            }
            MetadataValue::Map(map) => f.debug_tuple("Map").field(map).finish(),
            MetadataValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl PartialEq for MetadataValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MetadataValue::Map(a), MetadataValue::Map(b)) => a == b,
            (MetadataValue::List(a), MetadataValue::List(b)) => a == b,
            (MetadataValue::Map(_), _) | (MetadataValue::List(_), _) => false,
            (_, MetadataValue::Map(_)) | (_, MetadataValue::List(_)) => false,
            // Strings and stringifiables compare by rendered text
            (a, b) => a.to_string() == b.to_string(),
        }
    }
}

impl Serialize for MetadataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetadataValue::String(s) => serializer.serialize_str(s),
            MetadataValue::Stringifiable(v) => serializer.collect_str(v),
            MetadataValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            MetadataValue::List(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<Metadata> for MetadataValue {
    fn from(map: Metadata) -> Self {
        MetadataValue::Map(map)
    }
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(items: Vec<T>) -> Self {
        MetadataValue::List(items.into_iter().map(Into::into).collect())
    }
}

fn fmt_map(map: &Metadata, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", key, value)?;
    }
    f.write_str("]")
}

/// Build a [`Metadata`] map from `key => value` pairs
///
/// ```
/// let md = rotalog::metadata! { "messageType" => "Test", "error" => "Error" };
/// assert_eq!(md.len(), 2);
/// ```
#[macro_export]
macro_rules! metadata {
    () => { $crate::Metadata::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Metadata::new();
        $( map.insert(::std::string::String::from($key), $crate::MetadataValue::from($value)); )+
        map
    }};
}

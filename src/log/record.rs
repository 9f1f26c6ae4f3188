//! Log record definitions
//!
//! Defines the structure of a single line in the log file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FigmentError, Result};

/// A single record in the log file
///
/// `value: None` is a tombstone and is written without a `value` field.
/// A present `"value": null` decodes to `Some(..)`, so a stored `()` or
/// `Option::None` is never mistaken for a deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound(deserialize = "T: Deserialize<'de>"))]
pub struct Record<T> {
    /// The key this record applies to
    pub key: String,

    /// The new value, or `None` for a tombstone
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<T>,
}

/// Borrowed form used on the write path so values are encoded without a clone
#[derive(Serialize)]
struct RecordRef<'a, T> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a T>,
}

/// Any value that is present in the object is live, including `null`
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<T> Record<T> {
    /// Create a record carrying a live value
    pub fn put(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value: Some(value),
        }
    }

    /// Create a tombstone record
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.value.is_none()
    }
}

impl<T: Serialize> Record<T> {
    /// Encode as one line of JSON, without the line separator
    pub fn encode(&self) -> Result<String> {
        encode_line(&self.key, self.value.as_ref())
    }
}

impl<T: DeserializeOwned> Record<T> {
    /// Decode one line. `line_no` is only used for error reporting.
    pub fn decode(line: &str, line_no: usize) -> Result<Self> {
        serde_json::from_str(line).map_err(|source| FigmentError::Parse {
            line: line_no,
            source,
        })
    }
}

/// Encode a record from borrowed parts
pub fn encode_line<T: Serialize>(key: &str, value: Option<&T>) -> Result<String> {
    serde_json::to_string(&RecordRef { key, value }).map_err(FigmentError::Serialization)
}

//! Schema-flexible documents as exchanged with a [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::DocumentStore

use std::fmt;

use serde::{Serialize, de::DeserializeOwned, ser::Error as _};
use serde_json::Value;

use crate::StoreError;

/// Top-level fields of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// Logical collections known to sitekit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Accounts keyed by their external auth identifier.
    Users,
    /// Sites keyed by generated identifiers.
    Sites,
    /// Site routes keyed by generated identifiers.
    Routes,
}

impl Collection {
    /// Every collection, in declaration order.
    pub const ALL: [Self; 3] = [Self::Users, Self::Sites, Self::Routes];

    /// Storage name of the collection.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Sites => "sites",
            Self::Routes => "routes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored document together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Key of the document within its collection.
    pub id: String,
    /// Document body.
    pub fields: Fields,
}

impl Document {
    /// Build a document from its key and body.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Deserialize the body into a typed value.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields))
    }
}

/// Serialize a value into document fields.
///
/// Fails when the value does not serialize to a JSON object.
pub fn to_fields<T: Serialize + ?Sized>(value: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {other}"
        ))),
    }
}

/// Equality filter over a single top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name; ASCII letters, digits and underscores only.
    pub field: String,
    /// Scalar the field must equal.
    pub value: Value,
}

impl FieldFilter {
    /// Match documents whose `field` equals `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitekit_core::FieldFilter;
    ///
    /// let filter = FieldFilter::equals("user_id", "u1");
    /// assert_eq!(filter.field, "user_id");
    /// ```
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Check the filter can be evaluated by every adapter.
    pub fn validate(&self) -> Result<(), StoreError> {
        let plain = !self.field.is_empty()
            && self
                .field
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !plain {
            return Err(StoreError::InvalidField {
                field: self.field.clone(),
            });
        }
        if matches!(self.value, Value::Array(_) | Value::Object(_)) {
            return Err(StoreError::UnsupportedFilter {
                field: self.field.clone(),
            });
        }
        Ok(())
    }

    /// Whether a document body satisfies the filter.
    ///
    /// A missing field only matches a `null` filter value.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field).unwrap_or(&Value::Null) == &self.value
    }
}

//! Newtype IDs for type-safe entity references.
//!
//! Catalog identifiers arrive from the remote API as either JSON strings or
//! JSON numbers. Both normalize to their string form, so `1` and `"1"` name
//! the same entity and comparisons are always string comparisons.

use serde_json::Value;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `from_json()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use greenroot_core::define_id;
/// define_id!(OrchardId);
/// define_id!(SaplingId);
///
/// let orchard = OrchardId::new("7");
/// let sapling = SaplingId::new("7");
///
/// // These are different types, so this won't compile:
/// // let _: OrchardId = sapling;
/// assert_eq!(orchard.as_str(), sapling.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Build an ID from a raw JSON scalar.
            ///
            /// Strings are taken verbatim, numbers and booleans use their
            /// textual form. Objects, arrays and `null` yield `None`.
            #[must_use]
            pub fn from_json(value: &::serde_json::Value) -> Option<Self> {
                $crate::types::id::scalar_text(value).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

/// Render a JSON scalar as text.
///
/// Returns `None` for `null`, arrays and objects.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

define_id!(CategoryId);
define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_normalize_equal() {
        let from_number = ProductId::from_json(&json!(42));
        let from_string = ProductId::from_json(&json!("42"));
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_non_scalar_ids_are_absent() {
        assert_eq!(CategoryId::from_json(&json!(null)), None);
        assert_eq!(CategoryId::from_json(&json!({"id": 1})), None);
        assert_eq!(CategoryId::from_json(&json!([1])), None);
    }

    #[test]
    fn test_display_and_str_comparison() {
        let id = ProductId::new("t1");
        assert_eq!(id.to_string(), "t1");
        assert!(id == *"t1");
    }

    #[test]
    fn test_serde_transparent() {
        let id = CategoryId::new("3");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"3\""));
    }
}

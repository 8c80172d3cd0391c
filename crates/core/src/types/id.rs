//! Newtype IDs for type-safe entity references.
//!
//! Catalog data arrives with opaque string identifiers. Use the `define_id!`
//! macro to wrap them so a product ID can never be passed where a
//! notification ID is expected.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use threadline_core::define_id;
/// define_id!(ShirtId);
/// define_id!(MugId);
///
/// let shirt = ShirtId::new("classic-tee");
/// let mug = MugId::new("classic-tee");
///
/// assert_eq!(shirt.as_str(), mug.as_str());
/// // These are different types, so this won't compile:
/// // let _: ShirtId = mug;
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
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(NotificationId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_as_str() {
        let id = ProductId::new("classic-tee");
        assert_eq!(id.as_str(), "classic-tee");
        assert_eq!(id.to_string(), "classic-tee");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = ProductId::from("A");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A\"");

        let parsed: ProductId = serde_json::from_str("\"A\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_equality_is_exact() {
        assert_ne!(ProductId::new("a"), ProductId::new("A"));
    }
}

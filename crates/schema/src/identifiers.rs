//! Newtype identifiers for engine objects.
//!
//! Containers, networks and images are all addressed by strings on the wire,
//! but a container ID must never be passed where a network ID is expected.
//! Each identifier is a distinct newtype that can only be constructed from a
//! non-blank value.
//!
//! ## Validation
//!
//! Construction trims surrounding whitespace and rejects the empty result. The
//! engine client relies on this to refuse a request locally, before any
//! connection is made, when a caller passes `""` or `"   "`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped identifiers.
// Generates: struct, KIND, new() returning Option<Self>, as_str(), AsRef, Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident => $kind:literal
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Object kind used in validation messages (e.g. `"container"`).
            pub const KIND: &'static str = $kind;

            /// Creates a new identifier from the trimmed value, returning
            /// `None` if nothing but whitespace remains.
            pub fn new(value: impl AsRef<str>) -> Option<Self> {
                let v = value.as_ref().trim();
                if v.is_empty() { None } else { Some(Self(v.to_owned())) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a container by full ID, unique ID prefix, or name.
    ContainerId => "container"
}

string_id! {
    /// Identifies a network by ID or name.
    NetworkId => "network"
}

string_id! {
    /// An image reference: ID, `name`, or `name:tag` (e.g. `"alpine:3.20"`).
    ///
    /// The reference is not parsed; the engine resolves it.
    ImageRef => "image"
}

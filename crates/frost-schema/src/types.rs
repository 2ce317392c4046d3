//! Newtype wrappers for string identifiers, providing compile-time type safety.
//!
//! All newtypes serialize/deserialize as plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
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

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_newtype!(
    /// Canonical package key: lowercase, with runs of `-`, `_` and `.` folded
    /// to a single `-`. Two spellings of the same project compare equal.
    PackageName
);

string_newtype!(
    /// Exact installed version string, as recorded in distribution metadata.
    ProjectVersion
);

impl PackageName {
    /// Canonicalize a raw project name into a lookup key.
    pub fn canonical(raw: &str) -> Self {
        Self(crate::normalize::canonical_name(raw))
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::canonical(s)
    }
}

impl ProjectVersion {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ProjectVersion {
    fn from(s: &str) -> Self {
        Self(s.trim().to_owned())
    }
}

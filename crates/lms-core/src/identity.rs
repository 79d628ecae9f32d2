//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers. A `GroupId` cannot be
//! passed where a `PartitionId` is expected, and textual identifiers are
//! validated once at construction (including on deserialization).
//!
//! Partition and group ids are numeric. They serialize transparently, so a
//! map keyed by `PartitionId` becomes an object with stringified integer
//! keys in JSON and an integer-keyed mapping in YAML; both parse back into
//! the same numeric id.

use serde::{Deserialize, Serialize};

use crate::error::LmsError;

/// Identifier of a user partition (a grouping axis such as a cohort or an
/// experiment dimension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(pub u64);

/// Identifier of a group within a user partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl PartitionId {
    /// Access the inner numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl GroupId {
    /// Access the inner numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PartitionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for GroupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declares a validated, string-backed identifier.
macro_rules! text_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal, allow_whitespace = $ws:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Construct a validated identifier.
            ///
            /// # Errors
            ///
            /// Returns [`LmsError::InvalidIdentifier`] if the value is empty
            /// (or contains whitespace, for identifiers that forbid it).
            pub fn new(value: impl Into<String>) -> Result<Self, LmsError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(LmsError::InvalidIdentifier {
                        kind: $kind,
                        value,
                        reason: "must not be empty",
                    });
                }
                if !$ws && value.chars().any(char::is_whitespace) {
                    return Err(LmsError::InvalidIdentifier {
                        kind: $kind,
                        value,
                        reason: "must not contain whitespace",
                    });
                }
                Ok(Self(value))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = LmsError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = LmsError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = LmsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_identifier!(
    /// Usage key of a courseware block (e.g. `block-v1:edX+DemoX+2014+type@vertical+block@intro`).
    BlockId,
    "block id",
    allow_whitespace = false
);

text_identifier!(
    /// Course key (e.g. `edX/DemoX/2014T2`).
    CourseId,
    "course id",
    allow_whitespace = false
);

text_identifier!(
    /// Username of a learner or staff member.
    Username,
    "username",
    allow_whitespace = false
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn numeric_ids_display_as_numbers() {
        assert_eq!(PartitionId(7).to_string(), "7");
        assert_eq!(GroupId(42).to_string(), "42");
    }

    #[test]
    fn partition_keys_round_trip_through_json_object() {
        let mut map = BTreeMap::new();
        map.insert(PartitionId(1), "cohorts");
        map.insert(PartitionId(50), "experiment");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"1":"cohorts","50":"experiment"}"#);
        let parsed: BTreeMap<PartitionId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.get(&PartitionId(50)).map(String::as_str), Some("experiment"));
    }

    #[test]
    fn course_id_accepts_slash_and_colon_keys() {
        assert!(CourseId::new("edX/DemoX/2014T2").is_ok());
        assert!(CourseId::new("course-v1:edX+DemoX+2014").is_ok());
    }

    #[test]
    fn empty_identifiers_rejected() {
        assert!(CourseId::new("").is_err());
        assert!(BlockId::new("   ").is_err());
        assert!(Username::new("").is_err());
    }

    #[test]
    fn whitespace_rejected() {
        let err = Username::new("bob smith").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn text_ids_validate_on_deserialize() {
        let ok: Result<Username, _> = serde_json::from_str(r#""Bob""#);
        assert_eq!(ok.unwrap().as_str(), "Bob");
        let bad: Result<Username, _> = serde_json::from_str(r#""""#);
        assert!(bad.is_err());
    }

    #[test]
    fn text_ids_serialize_as_plain_strings() {
        let id = BlockId::new("chapter-1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""chapter-1""#);
    }
}

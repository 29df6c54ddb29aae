//! Release lifecycle status catalog.
//!
//! Each variant's discriminant matches the seed data order (1-based) in the
//! `release_statuses` lookup table. The label is the only form accepted or
//! produced at the API boundary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every status, in lifecycle order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Human-readable label used at the API boundary.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Map a database status ID back to its variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Release lifecycle status.
    ReleaseStatus {
        Created = 1 => "Created",
        InDevelopment = 2 => "In Development",
        OnDev = 3 => "On DEV",
        QaDoneOnDev = 4 => "QA Done on DEV",
        OnStaging = 5 => "On staging",
        QaDoneOnStaging = 6 => "QA done on STAGING",
        OnProd = 7 => "On PROD",
        Done = 8 => "Done",
    }
}

impl ReleaseStatus {
    /// Resolve a status label. Matching is exact and case-sensitive.
    pub fn resolve(label: &str) -> Result<Self, CoreError> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.label() == label)
            .ok_or_else(|| {
                tracing::warn!(label, "Unknown release status");
                CoreError::UnknownStatus(label.to_string())
            })
    }

    /// Whether this is the terminal `Done` status.
    pub fn is_done(self) -> bool {
        self == ReleaseStatus::Done
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReleaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl Serialize for ReleaseStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ReleaseStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::resolve(&label).map_err(serde::de::Error::custom)
    }
}

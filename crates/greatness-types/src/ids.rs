//! Type-safe string identifiers for content-defined entities.
//!
//! Every entity in the simulation is referenced by the stable string id
//! declared in the content tables. Wrapping those strings in distinct
//! newtypes prevents passing a country id where an institution id is
//! expected. Each id borrows as `str`, so keyed maps can be queried with
//! plain string slices.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
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
    };
}

define_id! {
    /// Identifier of a repeatable or one-time upgrade.
    UpgradeId
}

define_id! {
    /// Identifier of a domestic institution (phase 2).
    InstitutionId
}

define_id! {
    /// Identifier of a foreign country (phase 3).
    CountryId
}

define_id! {
    /// Identifier of a ship class buildable at the shipyard.
    ShipClassId
}

define_id! {
    /// Identifier of a space or cosmic building, tier, or research item.
    TierId
}

define_id! {
    /// Identifier of a random event definition.
    EventId
}

define_id! {
    /// Identifier of a permanent prestige upgrade.
    PrestigeUpgradeId
}

define_id! {
    /// Identifier of an achievement.
    AchievementId
}

define_id! {
    /// Identifier of a tariff line.
    TariffId
}

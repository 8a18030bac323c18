//! The closed set of named numeric resources.
//!
//! Events name the resources their conditions read and their effects
//! write. Content tables spell them in `snake_case`; any name the engine
//! does not know deserializes to [`Resource::Unknown`], which reads as
//! absent and ignores writes. The dispatch onto [`GameState`] fields lives
//! in [`GameState::resource`] and [`GameState::resource_mut`].
//!
//! [`GameState`]: crate::state::GameState
//! [`GameState::resource`]: crate::state::GameState::resource
//! [`GameState::resource_mut`]: crate::state::GameState::resource_mut

use serde::{Deserialize, Serialize};

/// A named numeric quantity in the state aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Primary progress currency.
    Greatness,
    /// Last computed production rate.
    GreatnessPerSecond,
    /// Spendable money.
    Cash,
    /// Earned by clicking.
    Attention,
    /// Soft power.
    Influence,
    /// Generated by captured institutions.
    Loyalty,
    /// Number of controlled institutions.
    Control,
    /// Regime stability, 0 to 100.
    Legitimacy,
    /// Domestic surveillance reach.
    Surveillance,
    /// Diplomatic leverage.
    TreatyPower,
    /// Sanctions pressure.
    Sanctions,
    /// Annexation progress points.
    AnnexationPoints,
    /// Military output.
    WarOutput,
    /// Accumulated peace-prize score.
    NobelScore,
    /// Score needed for the next prize.
    NobelThreshold,
    /// Global fear.
    Fear,
    /// Accumulated launch capacity.
    RocketMass,
    /// Orbital manufacturing.
    OrbitalIndustry,
    /// Asteroid mining output.
    MiningOutput,
    /// Off-world population.
    Colonists,
    /// Terraforming progress, 0 to 100.
    TerraformProgress,
    /// Converted stellar matter.
    Computronium,
    /// Cosmic currency.
    GreatnessUnits,
    /// Reality drift meter.
    RealityDrift,
    /// Stars converted so far.
    StarsConverted,
    /// Self-replicating probes in flight.
    ProbesLaunched,
    /// Attention granted per click.
    AttentionPerClick,
    /// Seconds of simulated play.
    TotalPlayTime,
    /// Number of clicks. Read-only.
    ClickCount,
    /// Peace prizes won. Read-only.
    NobelPrizesWon,
    /// Contradiction meta-currency. Read-only.
    DoublethinkTokens,
    /// Completed prestige cycles. Read-only.
    PrestigeLevel,
    /// Any name the engine does not recognize.
    #[serde(other)]
    Unknown,
}

impl Resource {
    /// Upper bound of a percentage-like resource, if it has one.
    ///
    /// Drift is capped by a state-dependent limit and is clamped by the
    /// engine instead.
    #[must_use]
    pub const fn upper_bound(self) -> Option<f64> {
        match self {
            Self::Legitimacy | Self::TerraformProgress => Some(100.0),
            _ => None,
        }
    }

    /// Whether the resource may never go below zero.
    #[must_use]
    pub const fn is_non_negative(self) -> bool {
        matches!(
            self,
            Self::Legitimacy
                | Self::TerraformProgress
                | Self::RealityDrift
                | Self::Fear
                | Self::NobelScore
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn unknown_names_deserialize_to_unknown() {
        let parsed: Resource = serde_json::from_str("\"vibes\"").unwrap();
        assert_eq!(parsed, Resource::Unknown);
        let parsed: Resource = serde_json::from_str("\"war_output\"").unwrap();
        assert_eq!(parsed, Resource::WarOutput);
    }
}

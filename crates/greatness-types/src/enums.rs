//! Enumeration types for the Greatness progression engine.
//!
//! Closed sets of states and kinds. Anything the engine branches on is an
//! enum here; anything the content tables merely name is a string id (see
//! [`crate::ids`]).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// One of the five sequential progression stages.
///
/// Serialized as the numbers `1` through `5`, which is how content tables
/// and snapshots refer to phases.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Phase {
    /// Domestic attention economy.
    #[default]
    One,
    /// Institutional capture.
    Two,
    /// Foreign expansion.
    Three,
    /// Space industry.
    Four,
    /// Cosmic conversion. Terminal.
    Five,
}

impl Phase {
    /// All phases in ascending order.
    pub const ALL: [Self; 5] = [Self::One, Self::Two, Self::Three, Self::Four, Self::Five];

    /// The phase that follows this one, or `None` for the terminal phase.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Four),
            Self::Four => Some(Self::Five),
            Self::Five => None,
        }
    }

    /// The phase number, 1 through 5.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
        }
    }
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Error returned when a number does not name a phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid phase number: {0}")]
pub struct InvalidPhase(pub u8);

impl TryFrom<u8> for Phase {
    type Error = InvalidPhase;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            other => Err(InvalidPhase(other)),
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

// ---------------------------------------------------------------------------
// Institutions
// ---------------------------------------------------------------------------

/// Capture status of a domestic institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionStatus {
    /// Not under control.
    Independent,
    /// A co-opt action is in progress.
    CoOpting,
    /// A replace action is in progress.
    Replacing,
    /// A purge action is in progress.
    Purging,
    /// Under control.
    Captured,
    /// Under control and running itself.
    Automated,
}

impl InstitutionStatus {
    /// Whether a timed capture action is currently running.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::CoOpting | Self::Replacing | Self::Purging)
    }

    /// Whether the institution counts as controlled.
    #[must_use]
    pub const fn is_controlled(self) -> bool {
        matches!(self, Self::Captured | Self::Automated)
    }
}

/// An action that can be taken against an institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionAction {
    /// Slow, cheap, gentle capture.
    CoOpt,
    /// Swap the leadership.
    Replace,
    /// Fast and brutal.
    Purge,
    /// Repaint a captured institution.
    Rebrand,
    /// Let a captured institution run itself.
    Automate,
    /// Sell a captured institution back to the market.
    Privatize,
    /// Demand a show of loyalty.
    LoyaltyTest,
}

impl InstitutionAction {
    /// The in-progress status a timed action puts the institution into,
    /// or `None` for instant actions.
    #[must_use]
    pub const fn in_progress_status(self) -> Option<InstitutionStatus> {
        match self {
            Self::CoOpt => Some(InstitutionStatus::CoOpting),
            Self::Replace => Some(InstitutionStatus::Replacing),
            Self::Purge => Some(InstitutionStatus::Purging),
            Self::Rebrand | Self::Automate | Self::Privatize | Self::LoyaltyTest => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Countries
// ---------------------------------------------------------------------------

/// Geopolitical status of a foreign country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryStatus {
    /// Untouched.
    Independent,
    /// Under economic pressure.
    Sanctioned,
    /// Penetrated by friendly media and foundations.
    Infiltrated,
    /// Unstable enough for regime change.
    CoupTarget,
    /// Resistance broken; awaiting annexation.
    Occupied,
    /// Fully absorbed.
    Annexed,
    /// The one non-conquest partner.
    Allied,
}

impl CountryStatus {
    /// Whether the country counts toward expansion completion.
    #[must_use]
    pub const fn is_secured(self) -> bool {
        matches!(self, Self::Annexed | Self::Allied)
    }

    /// Whether the country counts as an active war for legitimacy decay.
    #[must_use]
    pub const fn is_active_war(self) -> bool {
        matches!(self, Self::Occupied | Self::CoupTarget)
    }
}

/// A foreign-policy tactic applied to a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticType {
    /// Friendly cooperation.
    Partnership,
    /// Economic arm-twisting.
    TradeLeverage,
    /// Place friendly voices in local media.
    MediaInfiltration,
    /// Fund civil society with strings attached.
    FreedomFoundation,
    /// Sponsor a change of government.
    CoupSponsorship,
    /// Open military operation.
    FreedomOperation,
    /// Quietly remove inconvenient people.
    ExtraordinaryRendition,
    /// Formal absorption of an occupied country.
    Annexation,
    /// Rebuild what the operation broke.
    PostWarRebuilding,
    /// Direct migration flows as pressure.
    ImmigrationWeaponization,
    /// Offer to buy the country outright.
    PurchaseOffer,
    /// Deepen economic dependency.
    TradeIntegration,
    /// Ask the population to join.
    AbsorptionReferendum,
    /// Encircle with a shared defense pact.
    JointDefense,
    /// Coordinated sanctions.
    SanctionsCampaign,
    /// Fund the right kind of democracy.
    DemocracyFund,
    /// Push back against the ally's leverage.
    KompromatResist,
    /// Cut aid to the ally.
    AidReduction,
    /// Turn the ally's leverage around.
    LeverageReversal,
    /// Absorb the ally.
    FullAbsorption,
}

impl TacticType {
    /// Whether completing this tactic annexes the country outright.
    #[must_use]
    pub const fn annexes(self) -> bool {
        matches!(
            self,
            Self::Annexation | Self::AbsorptionReferendum | Self::FullAbsorption
        )
    }
}

// ---------------------------------------------------------------------------
// Contradictions
// ---------------------------------------------------------------------------

/// One of the six dual-axis contradiction meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKey {
    /// Activity pressure against its inverse (phase 1).
    AttentionCredibility,
    /// Capture ratio against legitimacy (phase 2).
    ControlLegitimacy,
    /// War and fear against peace score (phase 3).
    WarNobel,
    /// Expansion ratio against foreign stability (phase 3).
    ExpansionStability,
    /// Long-term projects against short-term payoffs (phase 4).
    LongtermShortterm,
    /// Cosmic output against meaning (phase 5).
    GreatnessMeaning,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Category of a random event, which fixes its selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Good news with a price.
    Opportunity,
    /// Something leaked.
    Scandal,
    /// Something absurd happened.
    Absurd,
    /// Two policies collide.
    Contradiction,
    /// Something is on fire.
    Crisis,
    /// Peace prize business.
    Nobel,
    /// Reality briefly stops cooperating.
    RealityGlitch,
}

/// How an effect combines its amount with the current resource value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// `value + amount`.
    Add,
    /// `value * amount`.
    Multiply,
    /// `amount`.
    Set,
}

/// Comparison operator of an event condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    /// Strictly greater.
    #[serde(rename = ">")]
    Greater,
    /// Strictly less.
    #[serde(rename = "<")]
    Less,
    /// Greater or equal.
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// Less or equal.
    #[serde(rename = "<=")]
    LessOrEqual,
    /// Exactly equal.
    #[serde(rename = "==")]
    Equal,
}

impl Comparison {
    /// Evaluate `lhs <op> rhs`.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Greater => lhs > rhs,
            Self::Less => lhs < rhs,
            Self::GreaterOrEqual => lhs >= rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::Equal => lhs == rhs,
        }
    }
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// The resource an upgrade's price is paid in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostResource {
    /// Paid in attention.
    Attention,
    /// Paid in cash.
    Cash,
    /// Paid in greatness.
    Greatness,
}

/// Launch infrastructure tier, in ascending order of capability.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LaunchTier {
    /// Nothing built yet.
    #[default]
    None,
    /// A single launchpad.
    Launchpad,
    /// A commercial spaceport.
    Spaceport,
    /// An orbital elevator.
    OrbitalElevator,
    /// An electromagnetic mass driver.
    MassDriver,
}

impl LaunchTier {
    /// The next tier up, or `None` at the top.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::None => Some(Self::Launchpad),
            Self::Launchpad => Some(Self::Spaceport),
            Self::Spaceport => Some(Self::OrbitalElevator),
            Self::OrbitalElevator => Some(Self::MassDriver),
            Self::MassDriver => None,
        }
    }
}

/// Coarse band of the legitimacy meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegitimacyStatus {
    /// Above 80.
    Strong,
    /// 50 to 80.
    Stable,
    /// 25 to 50.
    Weakening,
    /// 10 to 25.
    Critical,
    /// Below 10. The regime is failing.
    Collapse,
}

impl LegitimacyStatus {
    /// Band for a legitimacy value.
    #[must_use]
    pub fn from_value(legitimacy: f64) -> Self {
        if legitimacy > 80.0 {
            Self::Strong
        } else if legitimacy >= 50.0 {
            Self::Stable
        } else if legitimacy >= 25.0 {
            Self::Weakening
        } else if legitimacy >= 10.0 {
            Self::Critical
        } else {
            Self::Collapse
        }
    }
}

/// Named band of the reality-drift meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftLevel {
    /// Below 20.
    Stable,
    /// 20 to 40.
    Flickering,
    /// 40 to 60.
    Unstable,
    /// 60 to 80.
    Dissolving,
    /// 80 and above.
    TotalDissociation,
}

impl DriftLevel {
    /// Band for a drift value.
    #[must_use]
    pub fn from_value(drift: f64) -> Self {
        if drift >= 80.0 {
            Self::TotalDissociation
        } else if drift >= 60.0 {
            Self::Dissolving
        } else if drift >= 40.0 {
            Self::Unstable
        } else if drift >= 20.0 {
            Self::Flickering
        } else {
            Self::Stable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_round_trips_through_numbers() {
        for phase in Phase::ALL {
            assert_eq!(Phase::try_from(phase.number()), Ok(phase));
        }
        assert_eq!(Phase::try_from(6), Err(InvalidPhase(6)));
        assert_eq!(Phase::Five.next(), None);
    }

    #[test]
    fn legitimacy_bands() {
        assert_eq!(LegitimacyStatus::from_value(81.0), LegitimacyStatus::Strong);
        assert_eq!(LegitimacyStatus::from_value(80.0), LegitimacyStatus::Stable);
        assert_eq!(LegitimacyStatus::from_value(25.0), LegitimacyStatus::Weakening);
        assert_eq!(LegitimacyStatus::from_value(9.9), LegitimacyStatus::Collapse);
    }

    #[test]
    fn launch_tiers_are_ordered() {
        assert!(LaunchTier::MassDriver > LaunchTier::Spaceport);
        assert_eq!(LaunchTier::None.next(), Some(LaunchTier::Launchpad));
    }
}

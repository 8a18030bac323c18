//! Content record definitions.
//!
//! One struct per table. Optional numeric fields default to zero so the
//! YAML only spells out what a record actually does.

use greatness_types::{
    AchievementId, CostResource, CountryId, InstitutionAction, InstitutionId, LaunchTier, Phase,
    PrestigeUpgradeId, Resource, ShipClassId, TacticType, TariffId, TierId, UpgradeId,
};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Phase rules
// ---------------------------------------------------------------------------

/// Content-defined parameters of the phase transition guards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhaseRules {
    /// One-time upgrade whose purchase opens phase 2.
    pub gateway_upgrade: UpgradeId,
    /// Asteroid tier counted by the phase 5 guard.
    pub required_rig_tier: TierId,
    /// Units of that tier the phase 5 guard requires.
    pub required_rigs: u32,
    /// Orbital industry the phase 5 guard requires.
    pub required_orbital_industry: f64,
}

// ---------------------------------------------------------------------------
// Upgrades
// ---------------------------------------------------------------------------

/// Resource threshold that marks an upgrade as unlocked.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnlockCondition {
    /// Resource read.
    pub resource: Resource,
    /// Minimum value.
    pub threshold: f64,
}

/// A passive effect of an owned upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Adds to attention per click on purchase.
    AttentionPerClick {
        /// Amount added.
        value: f64,
    },
    /// Cash per second per owned unit.
    CashPerSecond {
        /// Cash per second.
        value: f64,
    },
    /// Multiplies the production rate once while the upgrade is owned.
    RateMultiplier {
        /// Factor.
        value: f64,
    },
}

/// An upgrade definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpgradeDef {
    /// Unique id.
    pub id: UpgradeId,
    /// Display name.
    pub name: String,
    /// Grouping tree.
    #[serde(default)]
    pub tree: String,
    /// Phase from which the upgrade can be bought.
    pub phase: Phase,
    /// Price of the first unit.
    pub base_cost: f64,
    /// Resource the price is paid in.
    pub cost_resource: CostResource,
    /// Greatness per second per owned unit.
    #[serde(default)]
    pub production: f64,
    /// Maximum units; 1 for one-time upgrades.
    pub max_count: u32,
    /// Passive effects.
    #[serde(default)]
    pub effects: Vec<UpgradeEffect>,
    /// Upgrade that must be purchased first.
    #[serde(default)]
    pub prerequisite: Option<UpgradeId>,
    /// Condition that marks the upgrade unlocked.
    #[serde(default)]
    pub unlock_at: Option<UnlockCondition>,
}

// ---------------------------------------------------------------------------
// Institutions
// ---------------------------------------------------------------------------

/// A domestic institution.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstitutionDef {
    /// Unique id.
    pub id: InstitutionId,
    /// Display name.
    pub name: String,
    /// Grouping category.
    #[serde(default)]
    pub category: String,
    /// Starting resistance.
    pub resistance: f64,
    /// Greatness per second once controlled.
    pub greatness_output: f64,
    /// Loyalty per second once controlled.
    pub loyalty_generation: f64,
}

/// Parameters of one institution action type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstitutionActionDef {
    /// Action described.
    pub action: InstitutionAction,
    /// Duration in seconds; zero for instant actions.
    #[serde(default)]
    pub duration_secs: f64,
    /// Cash cost.
    #[serde(default)]
    pub cost_cash: f64,
    /// Loyalty cost.
    #[serde(default)]
    pub cost_loyalty: f64,
    /// Resistance removed.
    #[serde(default)]
    pub resistance_reduction: f64,
    /// Legitimacy change applied at start.
    #[serde(default)]
    pub legitimacy_impact: f64,
    /// Whether the institution must already be captured.
    #[serde(default)]
    pub requires_captured: bool,
}

// ---------------------------------------------------------------------------
// Countries
// ---------------------------------------------------------------------------

/// A foreign country.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryDef {
    /// Unique id.
    pub id: CountryId,
    /// Display name.
    pub name: String,
    /// Region name.
    #[serde(default)]
    pub region: String,
    /// Starting resistance.
    pub resistance: f64,
    /// Starting stability.
    pub stability: f64,
    /// Greatness per second once annexed.
    pub greatness_potential: f64,
    /// Whether this is the single allied partner.
    #[serde(default)]
    pub allied: bool,
    /// Starting leverage over us (allied partner only).
    #[serde(default)]
    pub kompromat_level: f64,
}

/// Parameters of one country tactic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TacticDef {
    /// Tactic described.
    pub tactic: TacticType,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Cash cost.
    #[serde(default)]
    pub cost_cash: f64,
    /// Loyalty cost.
    #[serde(default)]
    pub cost_loyalty: f64,
    /// War output cost.
    #[serde(default)]
    pub cost_war_output: f64,
    /// Resistance removed on completion.
    #[serde(default)]
    pub resistance_reduction: f64,
    /// Stability change on completion.
    #[serde(default)]
    pub stability_impact: f64,
    /// Legitimacy change at start.
    #[serde(default)]
    pub legitimacy_impact: f64,
    /// Peace score change on completion.
    #[serde(default)]
    pub nobel_impact: f64,
    /// Fear generated on completion.
    #[serde(default)]
    pub fear_generated: f64,
    /// Countries the tactic is restricted to; `None` means all.
    #[serde(default)]
    pub available_for: Option<Vec<CountryId>>,
}

impl TacticDef {
    /// Whether the tactic may target the given country.
    #[must_use]
    pub fn is_available_for(&self, country: &str) -> bool {
        self.available_for
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id.as_str() == country))
    }
}

/// A buildable ship class.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShipClassDef {
    /// Unique id.
    pub id: ShipClassId,
    /// Display name.
    pub name: String,
    /// Cash per ship.
    pub cost: f64,
    /// War output per ship.
    pub war_output: f64,
    /// Fear per ship.
    pub fear: f64,
    /// Minimum shipyard level.
    pub shipyard_level: u32,
}

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

/// A launch infrastructure tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LaunchTierDef {
    /// Tier described.
    pub tier: LaunchTier,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Rocket mass per second while this is the current tier.
    pub rocket_mass_per_second: f64,
}

/// A lunar building.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LunarBuildingDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Rocket mass cost.
    pub rocket_mass_cost: f64,
    /// Building that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
    /// Orbital industry per second.
    #[serde(default)]
    pub orbital_industry_per_second: f64,
    /// Mining output per second.
    #[serde(default)]
    pub mining_per_second: f64,
    /// Legitimacy per second.
    #[serde(default)]
    pub legitimacy_per_second: f64,
}

/// A Mars upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarsUpgradeDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Rocket mass cost.
    pub rocket_mass_cost: f64,
    /// Mining output cost.
    #[serde(default)]
    pub mining_cost: f64,
    /// Upgrade that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
    /// Greatness per second.
    #[serde(default)]
    pub greatness_per_second: f64,
    /// Colonists per second.
    #[serde(default)]
    pub colonists_per_second: f64,
    /// Terraform progress per second.
    #[serde(default)]
    pub terraform_per_second: f64,
}

/// An asteroid mining tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AsteroidTierDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash per unit.
    pub cost: f64,
    /// Rocket mass per unit.
    pub rocket_mass_cost: f64,
    /// Mining output per unit per second.
    pub mining_per_unit: f64,
    /// Maximum units.
    pub max_count: u32,
    /// Tier of which at least one unit must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// The propaganda satellite.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SatelliteDef {
    /// Cash per satellite.
    pub cost: f64,
    /// Orbital industry per satellite.
    pub orbital_industry_cost: f64,
    /// Maximum satellites.
    pub max_count: u32,
    /// Legitimacy per second per satellite.
    pub legitimacy_per_unit: f64,
    /// Attention per second per satellite.
    pub attention_per_unit: f64,
    /// Drift per second per satellite.
    pub drift_per_unit: f64,
}

/// The dyson swarm prototype that opens phase 5.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DysonPrototypeDef {
    /// Cash cost.
    pub cost: f64,
    /// Orbital industry consumed.
    pub orbital_industry_cost: f64,
    /// Launch tier required.
    pub required_tier: LaunchTier,
    /// Orbital industry required.
    pub required_orbital_industry: f64,
}

/// An orbital weapon.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpaceWeaponDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// War output added.
    pub war_output: f64,
    /// Fear added.
    pub fear: f64,
    /// Legitimacy change.
    pub legitimacy_impact: f64,
    /// Launch tier required.
    pub required_tier: LaunchTier,
}

/// A mechanical effect of a long-term thinking upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEffect {
    /// Multiplies rocket mass research speed.
    SpaceResearchSpeed {
        /// Factor.
        value: f64,
    },
    /// Multiplies the cash cost of space builds.
    SpaceCostMultiplier {
        /// Factor.
        value: f64,
    },
}

/// A long-term thinking upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeUpgradeDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost_cash: f64,
    /// Loyalty cost.
    #[serde(default)]
    pub cost_loyalty: f64,
    /// Upgrade that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
    /// Mechanical effect, if any.
    #[serde(default)]
    pub effect: Option<BridgeEffect>,
}

/// All phase 4 tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpaceTables {
    /// Launch tiers in ascending order.
    pub launch_tiers: Vec<LaunchTierDef>,
    /// Lunar buildings.
    pub lunar_buildings: Vec<LunarBuildingDef>,
    /// Mars upgrades.
    pub mars_upgrades: Vec<MarsUpgradeDef>,
    /// Asteroid tiers.
    pub asteroid_tiers: Vec<AsteroidTierDef>,
    /// The propaganda satellite.
    pub satellite: SatelliteDef,
    /// The dyson prototype.
    pub dyson_prototype: DysonPrototypeDef,
    /// Orbital weapons.
    pub weapons: Vec<SpaceWeaponDef>,
    /// Long-term thinking upgrades.
    pub bridge_upgrades: Vec<BridgeUpgradeDef>,
}

// ---------------------------------------------------------------------------
// Cosmic
// ---------------------------------------------------------------------------

/// A probe upgrade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeUpgradeDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Computronium cost.
    #[serde(default)]
    pub computronium_cost: f64,
    /// Probes produced per second.
    #[serde(default)]
    pub probe_production: f64,
    /// Added self-replication rate.
    #[serde(default)]
    pub replication_rate: f64,
    /// Star conversion efficiency factor.
    #[serde(default)]
    pub conversion_multiplier: Option<f64>,
    /// Upgrade that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// A dyson swarm tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DysonTierDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Orbital industry cost.
    pub orbital_industry_cost: f64,
    /// Computronium cost.
    pub computronium_cost: f64,
    /// Greatness units per second.
    pub units_per_second: f64,
    /// Tier that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// A star branding tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StarBrandingDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Computronium cost.
    #[serde(default)]
    pub computronium_cost: f64,
    /// Stars converted per second.
    #[serde(default)]
    pub conversion_rate: f64,
    /// Tier that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// A black hole project.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlackHoleDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Cash cost.
    pub cost: f64,
    /// Computronium cost.
    pub computronium_cost: f64,
    /// Greatness units per second.
    #[serde(default)]
    pub units_per_second: f64,
    /// Legitimacy per second.
    #[serde(default)]
    pub legitimacy_per_second: f64,
    /// Drift removed per second.
    #[serde(default)]
    pub drift_reduction: f64,
    /// Project that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// A narrative research item, paid in greatness units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NarrativeResearchDef {
    /// Unique id.
    pub id: TierId,
    /// Display name.
    pub name: String,
    /// Greatness unit cost.
    pub cost_units: f64,
    /// Factor on greatness unit production.
    #[serde(default)]
    pub units_multiplier: Option<f64>,
    /// Flat greatness units per second.
    #[serde(default)]
    pub production_bonus: f64,
    /// Drift removed per second.
    #[serde(default)]
    pub drift_reduction: f64,
    /// Minimum legitimacy while owned.
    #[serde(default)]
    pub legitimacy_floor: Option<f64>,
    /// Research that must exist first.
    #[serde(default)]
    pub prerequisite: Option<TierId>,
}

/// All phase 5 tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CosmicTables {
    /// Probe upgrades.
    pub probe_upgrades: Vec<ProbeUpgradeDef>,
    /// Dyson swarm tiers.
    pub dyson_tiers: Vec<DysonTierDef>,
    /// Star branding tiers.
    pub star_branding: Vec<StarBrandingDef>,
    /// Black hole projects.
    pub black_holes: Vec<BlackHoleDef>,
    /// Narrative research.
    pub narrative_research: Vec<NarrativeResearchDef>,
}

// ---------------------------------------------------------------------------
// Prestige, tariffs, achievements
// ---------------------------------------------------------------------------

/// The permanent modifier a prestige upgrade grants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrestigeEffect {
    /// Multiplies starting attention per click.
    ClickPower {
        /// Factor.
        value: f64,
    },
    /// Fractional discount on upgrade prices.
    ResearchDiscount {
        /// Fraction removed.
        value: f64,
    },
    /// Fractional reduction of legitimacy decay.
    LegitimacyDecay {
        /// Fraction removed.
        value: f64,
    },
    /// Legitimacy floor; also cuts decay to a tenth.
    LegitimacyFloor {
        /// Floor value.
        value: f64,
    },
    /// Lowers the drift cap.
    DriftCap {
        /// Amount removed from the cap.
        value: f64,
    },
    /// Fraction of production earned while away.
    OfflineRate {
        /// Fraction earned.
        value: f64,
    },
    /// Multiplies the production rate.
    RateMultiplier {
        /// Factor.
        value: f64,
    },
    /// Stretches the event interval.
    EventCooldown {
        /// Fraction added to the interval.
        value: f64,
    },
    /// Speeds up institution actions.
    InstitutionSpeed {
        /// Fraction added to action speed.
        value: f64,
    },
    /// Lowers starting country resistance.
    CountryResistance {
        /// Fraction removed.
        value: f64,
    },
}

/// A permanent upgrade bought with prestige points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PrestigeUpgradeDef {
    /// Unique id.
    pub id: PrestigeUpgradeId,
    /// Display name.
    pub name: String,
    /// Point cost.
    pub cost: u64,
    /// Effect granted.
    pub effect: PrestigeEffect,
    /// Upgrades that must be owned first.
    #[serde(default)]
    pub prerequisites: Vec<PrestigeUpgradeId>,
}

/// A tariff line with per-level yields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TariffDef {
    /// Unique id.
    pub id: TariffId,
    /// Display name.
    pub name: String,
    /// Cash per minute at levels 0 through 3.
    pub cash_per_minute: [f64; 4],
    /// Legitimacy change per second at levels 0 through 3.
    pub legitimacy_per_second: [f64; 4],
}

impl TariffDef {
    /// Highest valid level.
    pub const MAX_LEVEL: u8 = 3;
}

/// The predicate an achievement checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementCondition {
    /// A resource is at least a value.
    ResourceAtLeast {
        /// Resource read.
        resource: Resource,
        /// Minimum.
        value: f64,
    },
    /// A resource is below a value from a given phase on.
    ResourceBelow {
        /// Resource read.
        resource: Resource,
        /// Exclusive maximum.
        value: f64,
        /// Earliest phase the check applies in.
        min_phase: Phase,
    },
    /// Any upgrade purchased.
    AnyUpgrade,
    /// A specific upgrade purchased.
    Upgrade {
        /// Upgrade required.
        upgrade: UpgradeId,
    },
    /// At least this many institutions controlled.
    InstitutionsControlled {
        /// Minimum count.
        count: usize,
    },
    /// At least this many countries annexed.
    CountriesAnnexed {
        /// Minimum count.
        count: usize,
    },
    /// A ship class owned.
    ShipOwned {
        /// Ship class required.
        ship: ShipClassId,
    },
    /// Total ships owned.
    FleetSize {
        /// Minimum count.
        count: u32,
    },
    /// A lunar building built.
    LunarBuilding {
        /// Building required.
        building: TierId,
    },
    /// Mars renamed.
    MarsRenamed,
    /// An orbital weapon purchased.
    SpaceWeapon {
        /// Weapon required.
        weapon: TierId,
    },
    /// Any dyson tier owned.
    AnyDysonTier,
    /// Universe conversion percentage reached.
    UniverseConverted {
        /// Minimum percentage.
        percent: f64,
    },
    /// Narrative research completed.
    NarrativeResearch {
        /// Research required.
        research: TierId,
    },
    /// Prestige level reached.
    PrestigeLevel {
        /// Minimum level.
        level: u32,
    },
}

/// An achievement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AchievementDef {
    /// Unique id.
    pub id: AchievementId,
    /// Display name.
    pub name: String,
    /// Predicate.
    pub condition: AchievementCondition,
}

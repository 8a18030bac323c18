//! The state aggregate and its nested records.
//!
//! [`GameState`] is the single source of truth for a run. Every subsystem
//! reads and mutates slices of it; nothing else holds simulation state.
//! All timestamps are milliseconds since the Unix epoch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::{
    ContradictionKey, CountryStatus, InstitutionStatus, LaunchTier, Phase, TacticType,
};
use crate::events::GameEvent;
use crate::ids::{
    AchievementId, CountryId, EventId, InstitutionId, PrestigeUpgradeId, ShipClassId, TariffId,
    TierId, UpgradeId,
};
use crate::resource::Resource;

/// Ownership record of one upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState {
    /// Bought at least once.
    pub purchased: bool,
    /// Times bought, bounded by the definition's `max_count`.
    pub count: u32,
    /// Unlock condition met at some point.
    pub unlocked: bool,
}

/// Capture record of one institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionState {
    /// Current status.
    pub status: InstitutionStatus,
    /// Remaining resistance, 0 to 100.
    pub resistance: f64,
    /// Progress of the running action, 0 to 100.
    pub progress: f64,
    /// Start of the running timed action.
    pub action_started_at: Option<i64>,
    /// Whether the institution has been rebranded.
    pub rebranded: bool,
}

impl InstitutionState {
    /// A fresh, independent institution.
    #[must_use]
    pub const fn independent(resistance: f64) -> Self {
        Self {
            status: InstitutionStatus::Independent,
            resistance,
            progress: 0.0,
            action_started_at: None,
            rebranded: false,
        }
    }
}

/// A tactic running against a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveOperation {
    /// Tactic applied.
    pub tactic: TacticType,
    /// Start time.
    pub started_at: i64,
    /// Duration in seconds, copied from the definition at start.
    pub duration_secs: f64,
}

/// Geopolitical record of one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryState {
    /// Current status.
    pub status: CountryStatus,
    /// Remaining resistance, 0 to 100.
    pub resistance: f64,
    /// Internal stability, 0 to 100.
    pub stability: f64,
    /// Running tactics, at most two.
    pub active_operations: Vec<ActiveOperation>,
    /// Military encirclement, 0 to 100.
    pub encirclement: f64,
    /// Economic dependency, 0 to 100.
    pub trade_dependency: f64,
    /// Purchase offers made so far.
    pub purchase_offers: u32,
    /// Leverage the country holds over us, 0 to 100.
    pub kompromat_level: f64,
}

impl CountryState {
    /// A fresh country record.
    #[must_use]
    pub const fn new(status: CountryStatus, resistance: f64, stability: f64) -> Self {
        Self {
            status,
            resistance,
            stability,
            active_operations: Vec::new(),
            encirclement: 0.0,
            trade_dependency: 0.0,
            purchase_offers: 0,
            kompromat_level: 0.0,
        }
    }
}

/// The single shipyard build order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipyardOrder {
    /// Ship class being built.
    pub ship: ShipClassId,
    /// Ships ordered.
    pub quantity: u32,
    /// Ships delivered so far.
    pub built_so_far: u32,
    /// Time the last consumed build interval ended.
    pub last_build_at: i64,
}

impl ShipyardOrder {
    /// Ships still to deliver.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.quantity.saturating_sub(self.built_so_far)
    }
}

/// One dual-axis contradiction meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionState {
    /// First side, 0 to 100.
    pub side_a: f64,
    /// Second side, 0 to 100.
    pub side_b: f64,
    /// Seconds spent balanced without interruption.
    pub balanced_time: f64,
    /// Whether the meter is running.
    pub active: bool,
}

impl ContradictionState {
    /// An active meter with both sides at the given values.
    #[must_use]
    pub const fn activated(side_a: f64, side_b: f64) -> Self {
        Self {
            side_a,
            side_b,
            balanced_time: 0.0,
            active: true,
        }
    }
}

/// Budget allocation, each line a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// Healthcare spending.
    pub healthcare: f64,
    /// Education spending.
    pub education: f64,
    /// Social benefits spending.
    pub social_benefits: f64,
    /// Military spending.
    pub military: f64,
    /// Data center spending.
    pub data_centers: f64,
    /// Infrastructure spending.
    pub infrastructure: f64,
    /// Propaganda bureau spending.
    pub propaganda_bureau: f64,
    /// Space program spending.
    pub space_program: f64,
}

impl Default for BudgetAllocation {
    fn default() -> Self {
        Self {
            healthcare: 20.0,
            education: 20.0,
            social_benefits: 15.0,
            military: 10.0,
            data_centers: 5.0,
            infrastructure: 15.0,
            propaganda_bureau: 10.0,
            space_program: 5.0,
        }
    }
}

/// A partial budget update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    /// New healthcare spending.
    pub healthcare: Option<f64>,
    /// New education spending.
    pub education: Option<f64>,
    /// New social benefits spending.
    pub social_benefits: Option<f64>,
    /// New military spending.
    pub military: Option<f64>,
    /// New data center spending.
    pub data_centers: Option<f64>,
    /// New infrastructure spending.
    pub infrastructure: Option<f64>,
    /// New propaganda bureau spending.
    pub propaganda_bureau: Option<f64>,
    /// New space program spending.
    pub space_program: Option<f64>,
}

/// Space industry record (phase 4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceState {
    /// Launch infrastructure built.
    pub launch_tier: LaunchTier,
    /// Lunar buildings built.
    pub lunar_buildings: BTreeSet<TierId>,
    /// Mars upgrades built.
    pub mars_upgrades: BTreeSet<TierId>,
    /// Asteroid mining units per tier.
    pub asteroid_units: BTreeMap<TierId, u32>,
    /// Propaganda satellites in orbit.
    pub propaganda_satellites: u32,
    /// Dyson swarm structures (prototype and cosmic upgrades).
    pub dyson_swarms: u32,
    /// Orbital weapons purchased.
    pub space_weapons: BTreeSet<TierId>,
    /// Long-term thinking upgrades purchased.
    pub bridge_upgrades: BTreeSet<TierId>,
    /// Whether Mars has been renamed.
    pub mars_renamed: bool,
}

/// Cosmic conversion record (phase 5).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniverseState {
    /// Probe upgrades owned.
    pub probe_upgrades: BTreeSet<TierId>,
    /// Dyson tiers owned.
    pub dyson_upgrades: BTreeSet<TierId>,
    /// Star branding tiers owned.
    pub star_branding: BTreeSet<TierId>,
    /// Black hole projects owned.
    pub black_holes: BTreeSet<TierId>,
    /// Narrative research completed.
    pub narrative_research: BTreeSet<TierId>,
    /// Percentage of reachable stars converted, 0 to 100.
    pub universe_converted: f64,
    /// Set once conversion reaches 100%.
    pub ending_triggered: bool,
    /// Set once the ending has been played out.
    pub ending_complete: bool,
}

/// A phase change waiting for its finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransition {
    /// Phase being left.
    pub from: Phase,
    /// Phase being entered.
    pub to: Phase,
}

/// Player settings, preserved through prestige.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Music volume, 0 to 1.
    pub music_volume: f64,
    /// Effects volume, 0 to 1.
    pub sfx_volume: f64,
    /// Whether notifications are shown.
    pub notifications: bool,
    /// Visual theme name.
    pub theme: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            sfx_volume: 0.7,
            notifications: true,
            theme: String::from("default"),
        }
    }
}

/// A partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    /// New music volume.
    pub music_volume: Option<f64>,
    /// New effects volume.
    pub sfx_volume: Option<f64>,
    /// New notification toggle.
    pub notifications: Option<bool>,
    /// New theme.
    pub theme: Option<String>,
}

/// The complete state of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    // --- Meta ---
    /// Current phase.
    pub phase: Phase,
    /// Start of this run.
    pub started_at: i64,
    /// Time of the last tick or clock resync.
    pub last_tick_at: i64,
    /// Time of the last successful save.
    pub last_save_at: i64,
    /// Seconds of simulated play.
    pub total_play_time: f64,
    /// Completed prestige cycles.
    pub prestige_level: u32,
    /// Unspent prestige points.
    pub prestige_points: u64,

    // --- Core resources ---
    /// Primary progress currency.
    pub greatness: f64,
    /// Production rate at the last tick.
    pub greatness_per_second: f64,
    /// Spendable money.
    pub cash: f64,
    /// Earned by clicking.
    pub attention: f64,
    /// Soft power.
    pub influence: f64,

    // --- Phase 2 ---
    /// Generated by controlled institutions.
    pub loyalty: f64,
    /// Number of controlled institutions.
    pub control: f64,
    /// Regime stability, 0 to 100.
    pub legitimacy: f64,
    /// Domestic surveillance reach.
    pub surveillance: f64,
    /// Budget allocation.
    pub budget: BudgetAllocation,
    /// Tariff level per line, 0 to 3.
    pub tariffs: BTreeMap<TariffId, u8>,
    /// Capture records, created at phase 2.
    pub institutions: BTreeMap<InstitutionId, InstitutionState>,

    // --- Phase 3 ---
    /// Diplomatic leverage.
    pub treaty_power: f64,
    /// Sanctions pressure.
    pub sanctions: f64,
    /// Annexation progress points.
    pub annexation_points: f64,
    /// Military output.
    pub war_output: f64,
    /// Accumulated peace-prize score.
    pub nobel_score: f64,
    /// Peace prizes won.
    pub nobel_prizes_won: u32,
    /// Score needed for the next prize.
    pub nobel_threshold: f64,
    /// Global fear.
    pub fear: f64,
    /// Country records, created at phase 3.
    pub countries: BTreeMap<CountryId, CountryState>,
    /// Ships owned per class.
    pub fleet: BTreeMap<ShipClassId, u32>,
    /// Shipyard level; zero until phase 3.
    pub shipyard_level: u32,
    /// Running build order.
    pub shipyard_queue: Option<ShipyardOrder>,

    // --- Phase 4 ---
    /// Accumulated launch capacity.
    pub rocket_mass: f64,
    /// Orbital manufacturing.
    pub orbital_industry: f64,
    /// Asteroid mining output.
    pub mining_output: f64,
    /// Off-world population.
    pub colonists: f64,
    /// Terraforming progress, 0 to 100.
    pub terraform_progress: f64,
    /// Space industry record.
    pub space: SpaceState,

    // --- Phase 5 ---
    /// Converted stellar matter.
    pub computronium: f64,
    /// Cosmic currency.
    pub greatness_units: f64,
    /// Reality drift meter.
    pub reality_drift: f64,
    /// Stars converted so far.
    pub stars_converted: f64,
    /// Self-replicating probes in flight.
    pub probes_launched: f64,
    /// Cosmic conversion record.
    pub universe: UniverseState,

    // --- Contradictions ---
    /// Meters, present once activated.
    pub contradictions: BTreeMap<ContradictionKey, ContradictionState>,
    /// Contradiction meta-currency.
    pub doublethink_tokens: u64,

    // --- Clicking ---
    /// Number of clicks this run.
    pub click_count: u64,
    /// Attention granted per click.
    pub attention_per_click: f64,
    /// Attention at the previous valid tick.
    pub attention_watermark: f64,

    // --- Upgrades ---
    /// Upgrade ownership.
    pub upgrades: BTreeMap<UpgradeId, UpgradeState>,

    // --- Events ---
    /// Ids of resolved events, in order.
    pub event_history: Vec<EventId>,
    /// Event waiting for a choice.
    pub active_event: Option<GameEvent>,
    /// Earliest time the next event may fire.
    pub next_event_at: i64,

    // --- Permanent ---
    /// Achievements earned, across runs.
    pub achievements: BTreeSet<AchievementId>,
    /// Prestige upgrades owned, across runs.
    pub prestige_upgrades: BTreeSet<PrestigeUpgradeId>,

    // --- Transitions ---
    /// Phase change waiting for its finalizer.
    pub pending_transition: Option<PendingTransition>,

    /// Player settings.
    pub settings: GameSettings,
}

/// Delay before the first event of a run, in milliseconds.
pub const FIRST_EVENT_DELAY_MS: i64 = 120_000;

impl GameState {
    /// A fresh run starting at `now`.
    #[must_use]
    pub fn new(now: i64) -> Self {
        let mut contradictions = BTreeMap::new();
        contradictions.insert(
            ContradictionKey::AttentionCredibility,
            ContradictionState::activated(50.0, 50.0),
        );

        Self {
            phase: Phase::One,
            started_at: now,
            last_tick_at: now,
            last_save_at: now,
            total_play_time: 0.0,
            prestige_level: 0,
            prestige_points: 0,
            greatness: 0.0,
            greatness_per_second: 0.0,
            cash: 0.0,
            attention: 0.0,
            influence: 0.0,
            loyalty: 0.0,
            control: 0.0,
            legitimacy: 100.0,
            surveillance: 0.0,
            budget: BudgetAllocation::default(),
            tariffs: BTreeMap::new(),
            institutions: BTreeMap::new(),
            treaty_power: 0.0,
            sanctions: 0.0,
            annexation_points: 0.0,
            war_output: 0.0,
            nobel_score: 0.0,
            nobel_prizes_won: 0,
            nobel_threshold: 100.0,
            fear: 0.0,
            countries: BTreeMap::new(),
            fleet: BTreeMap::new(),
            shipyard_level: 0,
            shipyard_queue: None,
            rocket_mass: 0.0,
            orbital_industry: 0.0,
            mining_output: 0.0,
            colonists: 0.0,
            terraform_progress: 0.0,
            space: SpaceState::default(),
            computronium: 0.0,
            greatness_units: 0.0,
            reality_drift: 0.0,
            stars_converted: 0.0,
            probes_launched: 0.0,
            universe: UniverseState::default(),
            contradictions,
            doublethink_tokens: 0,
            click_count: 0,
            attention_per_click: 1.0,
            attention_watermark: 0.0,
            upgrades: BTreeMap::new(),
            event_history: Vec::new(),
            active_event: None,
            next_event_at: now.saturating_add(FIRST_EVENT_DELAY_MS),
            achievements: BTreeSet::new(),
            prestige_upgrades: BTreeSet::new(),
            pending_transition: None,
            settings: GameSettings::default(),
        }
    }

    /// Read a named resource. `None` for [`Resource::Unknown`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn resource(&self, resource: Resource) -> Option<f64> {
        let value = match resource {
            Resource::ClickCount => self.click_count as f64,
            Resource::NobelPrizesWon => f64::from(self.nobel_prizes_won),
            Resource::DoublethinkTokens => self.doublethink_tokens as f64,
            Resource::PrestigeLevel => f64::from(self.prestige_level),
            Resource::Unknown => return None,
            writable => return self.writable(writable).copied(),
        };
        Some(value)
    }

    /// Mutable access to a writable resource. `None` for read-only
    /// counters and [`Resource::Unknown`].
    pub const fn resource_mut(&mut self, resource: Resource) -> Option<&mut f64> {
        Some(match resource {
            Resource::Greatness => &mut self.greatness,
            Resource::GreatnessPerSecond => &mut self.greatness_per_second,
            Resource::Cash => &mut self.cash,
            Resource::Attention => &mut self.attention,
            Resource::Influence => &mut self.influence,
            Resource::Loyalty => &mut self.loyalty,
            Resource::Control => &mut self.control,
            Resource::Legitimacy => &mut self.legitimacy,
            Resource::Surveillance => &mut self.surveillance,
            Resource::TreatyPower => &mut self.treaty_power,
            Resource::Sanctions => &mut self.sanctions,
            Resource::AnnexationPoints => &mut self.annexation_points,
            Resource::WarOutput => &mut self.war_output,
            Resource::NobelScore => &mut self.nobel_score,
            Resource::NobelThreshold => &mut self.nobel_threshold,
            Resource::Fear => &mut self.fear,
            Resource::RocketMass => &mut self.rocket_mass,
            Resource::OrbitalIndustry => &mut self.orbital_industry,
            Resource::MiningOutput => &mut self.mining_output,
            Resource::Colonists => &mut self.colonists,
            Resource::TerraformProgress => &mut self.terraform_progress,
            Resource::Computronium => &mut self.computronium,
            Resource::GreatnessUnits => &mut self.greatness_units,
            Resource::RealityDrift => &mut self.reality_drift,
            Resource::StarsConverted => &mut self.stars_converted,
            Resource::ProbesLaunched => &mut self.probes_launched,
            Resource::AttentionPerClick => &mut self.attention_per_click,
            Resource::TotalPlayTime => &mut self.total_play_time,
            Resource::ClickCount
            | Resource::NobelPrizesWon
            | Resource::DoublethinkTokens
            | Resource::PrestigeLevel
            | Resource::Unknown => return None,
        })
    }

    fn writable(&self, resource: Resource) -> Option<&f64> {
        Some(match resource {
            Resource::Greatness => &self.greatness,
            Resource::GreatnessPerSecond => &self.greatness_per_second,
            Resource::Cash => &self.cash,
            Resource::Attention => &self.attention,
            Resource::Influence => &self.influence,
            Resource::Loyalty => &self.loyalty,
            Resource::Control => &self.control,
            Resource::Legitimacy => &self.legitimacy,
            Resource::Surveillance => &self.surveillance,
            Resource::TreatyPower => &self.treaty_power,
            Resource::Sanctions => &self.sanctions,
            Resource::AnnexationPoints => &self.annexation_points,
            Resource::WarOutput => &self.war_output,
            Resource::NobelScore => &self.nobel_score,
            Resource::NobelThreshold => &self.nobel_threshold,
            Resource::Fear => &self.fear,
            Resource::RocketMass => &self.rocket_mass,
            Resource::OrbitalIndustry => &self.orbital_industry,
            Resource::MiningOutput => &self.mining_output,
            Resource::Colonists => &self.colonists,
            Resource::TerraformProgress => &self.terraform_progress,
            Resource::Computronium => &self.computronium,
            Resource::GreatnessUnits => &self.greatness_units,
            Resource::RealityDrift => &self.reality_drift,
            Resource::StarsConverted => &self.stars_converted,
            Resource::ProbesLaunched => &self.probes_launched,
            Resource::AttentionPerClick => &self.attention_per_click,
            Resource::TotalPlayTime => &self.total_play_time,
            Resource::ClickCount
            | Resource::NobelPrizesWon
            | Resource::DoublethinkTokens
            | Resource::PrestigeLevel
            | Resource::Unknown => return None,
        })
    }

    /// Number of institutions that are captured or automated.
    #[must_use]
    pub fn controlled_institutions(&self) -> usize {
        self.institutions
            .values()
            .filter(|inst| inst.status.is_controlled())
            .count()
    }

    /// Number of countries that are occupied or coup targets.
    #[must_use]
    pub fn active_wars(&self) -> usize {
        self.countries
            .values()
            .filter(|country| country.status.is_active_war())
            .count()
    }

    /// Whether the given upgrade has been purchased.
    #[must_use]
    pub fn has_upgrade(&self, id: &str) -> bool {
        self.upgrades.get(id).is_some_and(|u| u.purchased)
    }
}

//! Shared type definitions for the Greatness progression engine.
//!
//! This crate is the single source of truth for the state aggregate and
//! the vocabulary every other crate in the workspace speaks.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string identifiers for content-defined entities
//! - [`enums`] -- Phases, statuses, action and tactic kinds, bands
//! - [`resource`] -- The closed set of named numeric resources
//! - [`events`] -- Random event definitions, choices, effects, conditions
//! - [`state`] -- The state aggregate and its nested records

pub mod enums;
pub mod events;
pub mod ids;
pub mod resource;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use enums::{
    Comparison, ContradictionKey, CostResource, CountryStatus, DriftLevel, EffectKind,
    EventCategory, InstitutionAction, InstitutionStatus, InvalidPhase, LaunchTier,
    LegitimacyStatus, Phase, TacticType,
};
pub use events::{Effect, EventChoice, EventCondition, GameEvent};
pub use ids::{
    AchievementId, CountryId, EventId, InstitutionId, PrestigeUpgradeId, ShipClassId, TariffId,
    TierId, UpgradeId,
};
pub use resource::Resource;
pub use state::{
    ActiveOperation, BudgetAllocation, BudgetPatch, ContradictionState, CountryState,
    FIRST_EVENT_DELAY_MS, GameSettings, GameState, InstitutionState, PendingTransition,
    SettingsPatch, ShipyardOrder, SpaceState, UniverseState, UpgradeState,
};

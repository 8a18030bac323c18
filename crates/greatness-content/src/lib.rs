//! Content tables for the Greatness progression engine.
//!
//! The engine treats every upgrade, event, institution, country, ship,
//! space and cosmic tier, prestige upgrade, tariff, and achievement as
//! read-only configuration. This crate defines those records, loads them
//! from YAML, and indexes them by id into a [`Catalog`].
//!
//! A complete default table ships inside the crate; [`default_catalog`]
//! parses it.

pub mod catalog;
pub mod defs;
pub mod error;

pub use catalog::{Catalog, ContentTables};
pub use defs::{
    AchievementCondition, AchievementDef, AsteroidTierDef, BlackHoleDef, BridgeEffect,
    BridgeUpgradeDef, CosmicTables, CountryDef, DysonPrototypeDef, DysonTierDef,
    InstitutionActionDef, InstitutionDef, LaunchTierDef, LunarBuildingDef, MarsUpgradeDef,
    NarrativeResearchDef, PhaseRules, PrestigeEffect, PrestigeUpgradeDef, ProbeUpgradeDef,
    SatelliteDef, ShipClassDef, SpaceTables, SpaceWeaponDef, StarBrandingDef, TacticDef,
    TariffDef, UnlockCondition, UpgradeDef, UpgradeEffect,
};
pub use error::ContentError;

/// The bundled default content document.
pub const DEFAULT_CONTENT: &str = include_str!("../content/default.yaml");

/// Parse and index the bundled default content.
///
/// # Errors
///
/// Returns a [`ContentError`] if the bundled document fails to parse or
/// validate.
pub fn default_catalog() -> Result<Catalog, ContentError> {
    Catalog::parse(DEFAULT_CONTENT)
}

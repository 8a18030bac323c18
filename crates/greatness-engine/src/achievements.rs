//! Achievement predicates, evaluated at the end of every tick.

use greatness_content::{AchievementCondition, Catalog};
use greatness_types::{AchievementId, CountryStatus, GameState};
use tracing::info;

/// Whether `condition` holds for `state`.
pub fn holds(condition: &AchievementCondition, state: &GameState) -> bool {
    match condition {
        AchievementCondition::ResourceAtLeast { resource, value } => state
            .resource(*resource)
            .is_some_and(|current| current >= *value),
        AchievementCondition::ResourceBelow {
            resource,
            value,
            min_phase,
        } => {
            state.phase >= *min_phase
                && state
                    .resource(*resource)
                    .is_some_and(|current| current < *value)
        }
        AchievementCondition::AnyUpgrade => state.upgrades.values().any(|owned| owned.purchased),
        AchievementCondition::Upgrade { upgrade } => state.has_upgrade(upgrade.as_str()),
        AchievementCondition::InstitutionsControlled { count } => {
            state.controlled_institutions() >= *count
        }
        AchievementCondition::CountriesAnnexed { count } => {
            state
                .countries
                .values()
                .filter(|country| country.status == CountryStatus::Annexed)
                .count()
                >= *count
        }
        AchievementCondition::ShipOwned { ship } => {
            state.fleet.get(ship).is_some_and(|owned| *owned > 0)
        }
        AchievementCondition::FleetSize { count } => {
            state
                .fleet
                .values()
                .fold(0_u32, |total, owned| total.saturating_add(*owned))
                >= *count
        }
        AchievementCondition::LunarBuilding { building } => {
            state.space.lunar_buildings.contains(building)
        }
        AchievementCondition::MarsRenamed => state.space.mars_renamed,
        AchievementCondition::SpaceWeapon { weapon } => state.space.space_weapons.contains(weapon),
        AchievementCondition::AnyDysonTier => !state.universe.dyson_upgrades.is_empty(),
        AchievementCondition::UniverseConverted { percent } => {
            state.universe.universe_converted >= *percent
        }
        AchievementCondition::NarrativeResearch { research } => {
            state.universe.narrative_research.contains(research)
        }
        AchievementCondition::PrestigeLevel { level } => state.prestige_level >= *level,
    }
}

/// Record every achievement whose predicate now holds. Returns the ids
/// earned by this call.
pub fn evaluate(state: &mut GameState, catalog: &Catalog) -> Vec<AchievementId> {
    let earned: Vec<AchievementId> = catalog
        .achievements
        .values()
        .filter(|def| !state.achievements.contains(&def.id) && holds(&def.condition, state))
        .map(|def| def.id.clone())
        .collect();
    for id in &earned {
        info!(achievement = %id, "Achievement earned");
        state.achievements.insert(id.clone());
    }
    earned
}

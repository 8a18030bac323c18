//! Prestige reset and the permanent upgrade shop.

use greatness_content::Catalog;
use greatness_types::{GameState, PrestigeUpgradeId};
use tracing::{debug, info};

use crate::formulas;
use crate::modifiers::Modifiers;
use crate::rejection::{self, ActionResult, Rejection};

/// Reset the run at `now`, converting greatness units into prestige points.
///
/// Everything returns to defaults except achievements, owned prestige
/// upgrades, the prestige level and points, and settings. The new run
/// starts with the click power of the owned upgrades. Returns the points
/// earned.
pub fn prestige(state: &mut GameState, catalog: &Catalog, now: i64) -> u64 {
    let earned = formulas::prestige_reward(state.greatness_units);
    let modifiers = Modifiers::collect(&state.prestige_upgrades, catalog);

    let mut fresh = GameState::new(now);
    fresh.achievements = std::mem::take(&mut state.achievements);
    fresh.prestige_upgrades = std::mem::take(&mut state.prestige_upgrades);
    fresh.prestige_level = state.prestige_level.saturating_add(1);
    fresh.prestige_points = state.prestige_points.saturating_add(earned);
    fresh.settings = std::mem::take(&mut state.settings);
    fresh.attention_per_click = modifiers.click_power;
    *state = fresh;

    info!(
        level = state.prestige_level,
        earned,
        points = state.prestige_points,
        "Prestige reset"
    );
    earned
}

/// Buy a permanent upgrade with prestige points.
pub fn purchase_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    let def = catalog
        .prestige_upgrades
        .get(id)
        .ok_or_else(|| rejection::unknown("prestige upgrade", id))?;
    if state.prestige_upgrades.contains(id) {
        return Err(Rejection::AtCapacity {
            what: "prestige upgrade",
        });
    }
    if state.prestige_points < def.cost {
        return Err(Rejection::InsufficientFunds {
            resource: "prestige points",
        });
    }
    if let Some(missing) = def
        .prerequisites
        .iter()
        .find(|required| !state.prestige_upgrades.contains(*required))
    {
        return Err(Rejection::PrerequisiteMissing {
            prerequisite: missing.to_string(),
        });
    }

    state.prestige_points = state.prestige_points.saturating_sub(def.cost);
    state.prestige_upgrades.insert(PrestigeUpgradeId::from(id));
    debug!(upgrade = id, cost = def.cost, "Prestige upgrade purchased");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_content::default_catalog;
    use greatness_types::{AchievementId, Phase};

    use super::*;

    #[test]
    fn reward_grows_with_the_log_of_units() {
        let catalog = default_catalog().unwrap();
        let mut state = GameState::new(0);
        state.greatness_units = 1_000_000.0;
        assert_eq!(prestige(&mut state, &catalog, 5_000), 6);

        let mut state = GameState::new(0);
        state.greatness_units = 0.0;
        assert_eq!(prestige(&mut state, &catalog, 5_000), 0);
        assert_eq!(state.prestige_level, 1);
    }

    #[test]
    fn reset_keeps_only_permanent_fields() {
        let catalog = default_catalog().unwrap();
        let mut state = GameState::new(0);
        state.phase = Phase::Four;
        state.greatness = 1e12;
        state.cash = 5e9;
        state.greatness_units = 1_000_000.0;
        state.prestige_points = 4;
        state.prestige_level = 2;
        state.achievements.insert(AchievementId::from("first_click"));
        state
            .prestige_upgrades
            .insert(PrestigeUpgradeId::from("muscle_memory"));
        state.settings.theme = String::from("gold");

        prestige(&mut state, &catalog, 9_000);

        let mut expected = GameState::new(9_000);
        expected.achievements = state.achievements.clone();
        expected.prestige_upgrades = state.prestige_upgrades.clone();
        expected.prestige_level = 3;
        expected.prestige_points = 10;
        expected.settings.theme = String::from("gold");
        expected.attention_per_click = 10.0;
        assert_eq!(state, expected);
    }

    #[test]
    fn shop_checks_points_ownership_and_prerequisites() {
        let catalog = default_catalog().unwrap();
        let mut state = GameState::new(0);
        state.prestige_points = 1_000;
        assert!(matches!(
            purchase_upgrade(&mut state, &catalog, "eternal_engine"),
            Err(Rejection::PrerequisiteMissing { .. })
        ));
        assert!(purchase_upgrade(&mut state, &catalog, "retained_knowledge").is_ok());
        assert_eq!(state.prestige_points, 975);
        assert_eq!(
            purchase_upgrade(&mut state, &catalog, "retained_knowledge"),
            Err(Rejection::AtCapacity {
                what: "prestige upgrade"
            })
        );
        assert!(purchase_upgrade(&mut state, &catalog, "eternal_engine").is_ok());

        state.prestige_points = 0;
        assert_eq!(
            purchase_upgrade(&mut state, &catalog, "muscle_memory"),
            Err(Rejection::InsufficientFunds {
                resource: "prestige points"
            })
        );
    }
}

//! Permanent modifiers granted by owned prestige upgrades.
//!
//! Collected once per tick or action from the owned set; every consumer
//! reads the folded values instead of scanning the table itself. With
//! nothing owned every field is neutral.

use std::collections::BTreeSet;

use greatness_content::{Catalog, PrestigeEffect};
use greatness_types::PrestigeUpgradeId;

/// Lowest possible drift cap, whatever the reductions.
pub const MIN_DRIFT_CAP: f64 = 50.0;

/// Drift cap with no reductions.
pub const BASE_DRIFT_CAP: f64 = 100.0;

/// Offline rate with no upgrade owned.
pub const BASE_OFFLINE_RATE: f64 = 0.1;

/// Decay factor applied while a legitimacy floor is owned.
const FLOOR_DECAY_FACTOR: f64 = 0.1;

/// Folded effect of the owned prestige upgrades.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifiers {
    /// Factor on starting attention per click.
    pub click_power: f64,
    /// Fractional upgrade discounts, applied in id order.
    pub research_discounts: Vec<f64>,
    /// Factor on legitimacy decay.
    pub legitimacy_decay: f64,
    /// Minimum legitimacy.
    pub legitimacy_floor: f64,
    /// Total amount removed from the drift cap.
    pub drift_cap_reduction: f64,
    /// Fraction of production earned while away, 0 to 1.
    pub offline_rate: f64,
    /// Factor on the production rate.
    pub rate_multiplier: f64,
    /// Factor on the delay between events.
    pub event_cooldown: f64,
    /// Factor on institution action speed.
    pub institution_speed: f64,
    /// Fraction removed from starting country resistance.
    pub country_resistance: f64,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            click_power: 1.0,
            research_discounts: Vec::new(),
            legitimacy_decay: 1.0,
            legitimacy_floor: 0.0,
            drift_cap_reduction: 0.0,
            offline_rate: BASE_OFFLINE_RATE,
            rate_multiplier: 1.0,
            event_cooldown: 1.0,
            institution_speed: 1.0,
            country_resistance: 0.0,
        }
    }
}

impl Modifiers {
    /// Fold the effects of every owned upgrade. Ids missing from the
    /// catalog contribute nothing.
    pub fn collect(owned: &BTreeSet<PrestigeUpgradeId>, catalog: &Catalog) -> Self {
        let mut modifiers = Self::default();
        let mut best_offline: Option<f64> = None;

        for def in owned.iter().filter_map(|id| catalog.prestige_upgrades.get(id)) {
            match def.effect {
                PrestigeEffect::ClickPower { value } => modifiers.click_power *= value,
                PrestigeEffect::ResearchDiscount { value } => {
                    modifiers.research_discounts.push(value);
                }
                PrestigeEffect::LegitimacyDecay { value } => {
                    modifiers.legitimacy_decay *= 1.0 - value;
                }
                PrestigeEffect::LegitimacyFloor { value } => {
                    modifiers.legitimacy_decay *= FLOOR_DECAY_FACTOR;
                    modifiers.legitimacy_floor = modifiers.legitimacy_floor.max(value);
                }
                PrestigeEffect::DriftCap { value } => modifiers.drift_cap_reduction += value,
                PrestigeEffect::OfflineRate { value } => {
                    best_offline = Some(best_offline.map_or(value, |best| best.max(value)));
                }
                PrestigeEffect::RateMultiplier { value } => modifiers.rate_multiplier *= value,
                PrestigeEffect::EventCooldown { value } => {
                    modifiers.event_cooldown *= 1.0 + value;
                }
                PrestigeEffect::InstitutionSpeed { value } => {
                    modifiers.institution_speed += value;
                }
                PrestigeEffect::CountryResistance { value } => {
                    modifiers.country_resistance += value;
                }
            }
        }

        if let Some(rate) = best_offline {
            modifiers.offline_rate = rate.min(1.0);
        }
        modifiers
    }

    /// Upper bound of reality drift.
    pub fn drift_cap(&self) -> f64 {
        (BASE_DRIFT_CAP - self.drift_cap_reduction).max(MIN_DRIFT_CAP)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_content::default_catalog;

    use super::*;

    fn owned(ids: &[&str]) -> BTreeSet<PrestigeUpgradeId> {
        ids.iter().map(|id| PrestigeUpgradeId::from(*id)).collect()
    }

    #[test]
    fn nothing_owned_is_neutral() {
        let catalog = default_catalog().unwrap();
        let modifiers = Modifiers::collect(&BTreeSet::new(), &catalog);
        assert_eq!(modifiers, Modifiers::default());
        assert!((modifiers.drift_cap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn multipliers_compound() {
        let catalog = default_catalog().unwrap();
        let modifiers = Modifiers::collect(
            &owned(&["media_dynasty", "recursive_greatness", "muscle_memory"]),
            &catalog,
        );
        assert!((modifiers.rate_multiplier - 10.0).abs() < 1e-9);
        assert!((modifiers.click_power - 10.0).abs() < 1e-9);
    }

    #[test]
    fn floor_cuts_decay_and_sets_minimum() {
        let catalog = default_catalog().unwrap();
        let modifiers = Modifiers::collect(
            &owned(&["institutional_inertia", "the_golden_constant"]),
            &catalog,
        );
        assert!((modifiers.legitimacy_decay - 0.05).abs() < 1e-9);
        assert!((modifiers.legitimacy_floor - 25.0).abs() < 1e-9);
    }

    #[test]
    fn offline_rate_takes_best_and_caps_at_one() {
        let catalog = default_catalog().unwrap();
        let modifiers = Modifiers::collect(&owned(&["eternal_engine"]), &catalog);
        assert!((modifiers.offline_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drift_cap_never_drops_below_minimum() {
        let modifiers = Modifiers {
            drift_cap_reduction: 80.0,
            ..Modifiers::default()
        };
        assert!((modifiers.drift_cap() - MIN_DRIFT_CAP).abs() < f64::EPSILON);
    }
}

//! Reality drift accumulator.
//!
//! Drift builds up from space propaganda and weapons in phase 4 and from
//! cosmic conversion in phase 5. Education spending pushes back. The meter
//! is always held inside `[0, cap]`, where the cap shrinks with owned
//! prestige upgrades but never below 50.

use greatness_content::Catalog;
use greatness_types::{DriftLevel, GameState, Phase};

use crate::formulas::{BudgetEffects, count_f64};
use crate::modifiers::Modifiers;

/// Drift per second per orbital weapon.
pub const DRIFT_PER_WEAPON: f64 = 0.002;

/// Drift per second while fear is above [`FEAR_DRIFT_THRESHOLD`].
pub const FEAR_DRIFT: f64 = 0.001;

/// Fear level above which fear itself feeds drift.
pub const FEAR_DRIFT_THRESHOLD: f64 = 50.0;

/// Drift per second per converted star.
pub const DRIFT_PER_STAR: f64 = 0.0005;

/// Drift per second per probe in flight.
pub const DRIFT_PER_PROBE: f64 = 0.000_02;

/// Most drift per second that greatness units can add.
pub const MAX_UNIT_DRIFT: f64 = 0.01;

/// Gross drift per second before education reduction.
pub fn rate(state: &GameState, catalog: &Catalog) -> f64 {
    if state.phase < Phase::Four {
        return 0.0;
    }
    let mut rate = f64::from(state.space.propaganda_satellites) * catalog.satellite.drift_per_unit
        + count_f64(state.space.space_weapons.len()) * DRIFT_PER_WEAPON;
    if state.fear > FEAR_DRIFT_THRESHOLD {
        rate += FEAR_DRIFT;
    }
    if state.phase >= Phase::Five {
        rate += state.stars_converted * DRIFT_PER_STAR
            + state.probes_launched * DRIFT_PER_PROBE
            + (state.greatness_units * 1e-6).min(MAX_UNIT_DRIFT);
    }
    rate
}

/// Net drift per second after education spending.
pub fn net_rate(state: &GameState, catalog: &Catalog) -> f64 {
    rate(state, catalog) - BudgetEffects::from_budget(&state.budget).drift_reduction()
}

/// Add `delta` to drift and clamp it into `[0, cap]`.
pub fn apply(state: &mut GameState, delta: f64, modifiers: &Modifiers) {
    state.reality_drift = (state.reality_drift + delta).clamp(0.0, modifiers.drift_cap());
}

/// Named band of the current drift.
pub fn level(state: &GameState) -> DriftLevel {
    DriftLevel::from_value(state.reality_drift)
}

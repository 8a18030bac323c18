//! Dual-axis contradiction meters and doublethink token minting.
//!
//! Each active meter derives its two sides from the state, then tracks how
//! long both sides have stayed at or above [`BALANCE_THRESHOLD`]. Every
//! [`TOKEN_INTERVAL_SECS`] of unbroken balance mints one token; leaving
//! balance resets the clock without taking tokens back.

use greatness_types::{ContradictionKey, ContradictionState, GameState, Phase};

use crate::formulas::{clamp_percent, count_f64, whole};

/// Both sides must be at least this for the meter to count as balanced.
pub const BALANCE_THRESHOLD: f64 = 40.0;

/// Seconds of continuous balance per doublethink token.
pub const TOKEN_INTERVAL_SECS: f64 = 10.0;

/// Largest activity pressure a single tick can apply.
const MAX_PRESSURE: f64 = 10.0;

/// Phase in which a meter starts deriving its sides.
pub const fn unlock_phase(key: ContradictionKey) -> Phase {
    match key {
        ContradictionKey::AttentionCredibility => Phase::One,
        ContradictionKey::ControlLegitimacy => Phase::Two,
        ContradictionKey::WarNobel | ContradictionKey::ExpansionStability => Phase::Three,
        ContradictionKey::LongtermShortterm => Phase::Four,
        ContradictionKey::GreatnessMeaning => Phase::Five,
    }
}

/// Activate (or reset) a meter at the given sides.
pub fn activate(state: &mut GameState, key: ContradictionKey, side_a: f64, side_b: f64) {
    state
        .contradictions
        .insert(key, ContradictionState::activated(side_a, side_b));
}

/// Advance every active meter by `dt` seconds. Returns tokens minted.
///
/// Also records the attention watermark the next tick measures activity
/// against.
pub fn update(state: &mut GameState, dt: f64) -> u64 {
    let keys: Vec<ContradictionKey> = state
        .contradictions
        .iter()
        .filter(|(key, meter)| meter.active && state.phase >= unlock_phase(**key))
        .map(|(key, _)| *key)
        .collect();

    let mut minted: u64 = 0;
    for key in keys {
        let Some(previous) = state.contradictions.get(&key) else {
            continue;
        };
        let (side_a, side_b) = derive_sides(state, key, previous, dt);
        if let Some(meter) = state.contradictions.get_mut(&key) {
            minted = minted.saturating_add(advance(meter, side_a, side_b, dt));
        }
    }

    state.doublethink_tokens = state.doublethink_tokens.saturating_add(minted);
    state.attention_watermark = state.attention;
    minted
}

/// Set a meter's sides and advance its balance clock.
/// Returns tokens minted.
pub fn advance(meter: &mut ContradictionState, side_a: f64, side_b: f64, dt: f64) -> u64 {
    meter.side_a = clamp_percent(side_a);
    meter.side_b = clamp_percent(side_b);

    if meter.side_a >= BALANCE_THRESHOLD && meter.side_b >= BALANCE_THRESHOLD {
        let before = meter.balanced_time;
        meter.balanced_time += dt;
        let earned = (meter.balanced_time / TOKEN_INTERVAL_SECS).floor()
            - (before / TOKEN_INTERVAL_SECS).floor();
        whole(earned)
    } else {
        meter.balanced_time = 0.0;
        0
    }
}

fn derive_sides(
    state: &GameState,
    key: ContradictionKey,
    previous: &ContradictionState,
    dt: f64,
) -> (f64, f64) {
    match key {
        ContradictionKey::AttentionCredibility => {
            let gained = (state.attention - state.attention_watermark).max(0.0);
            let pressure = (gained * 0.5).min(MAX_PRESSURE);
            let credibility_loss = if pressure > 0.0 { pressure * 0.7 } else { 0.0 };
            (
                previous.side_a + pressure - 2.0 * dt,
                previous.side_b - credibility_loss + 1.5 * dt,
            )
        }
        ContradictionKey::ControlLegitimacy => {
            let total = state.institutions.len();
            let ratio = if total == 0 {
                0.0
            } else {
                count_f64(state.controlled_institutions()) / count_f64(total) * 100.0
            };
            (ratio, state.legitimacy)
        }
        ContradictionKey::WarNobel => (
            state.fear + count_f64(state.active_wars()) * 10.0,
            state.nobel_score,
        ),
        ContradictionKey::ExpansionStability => expansion_sides(state),
        ContradictionKey::LongtermShortterm => (
            state.terraform_progress + state.orbital_industry * 0.5,
            (state.attention / 1000.0 + state.fear * 0.5 + state.war_output / 100.0).min(100.0),
        ),
        ContradictionKey::GreatnessMeaning => (
            (state.greatness_units * 0.001 + state.stars_converted * 0.1).min(100.0),
            100.0 - state.reality_drift,
        ),
    }
}

fn expansion_sides(state: &GameState) -> (f64, f64) {
    let total = state.countries.len();
    if total == 0 {
        return (0.0, 100.0);
    }
    let secured = state
        .countries
        .values()
        .filter(|country| country.status.is_secured())
        .count();
    let unsecured: Vec<f64> = state
        .countries
        .values()
        .filter(|country| !country.status.is_secured())
        .map(|country| country.stability)
        .collect();
    let stability = if unsecured.is_empty() {
        100.0
    } else {
        unsecured.iter().sum::<f64>() / count_f64(unsecured.len())
    };
    (count_f64(secured) / count_f64(total) * 100.0, stability)
}

#[cfg(test)]
mod tests {
    use greatness_types::InstitutionState;

    use super::*;

    #[test]
    fn balanced_meter_mints_one_token_per_interval() {
        let mut meter = ContradictionState::activated(50.0, 50.0);
        assert_eq!(advance(&mut meter, 50.0, 50.0, 31.0), 3);
        assert!((meter.balanced_time - 31.0).abs() < f64::EPSILON);
        // 31 -> 40 crosses one more boundary
        assert_eq!(advance(&mut meter, 50.0, 50.0, 9.0), 1);
    }

    #[test]
    fn imbalance_resets_clock_but_keeps_tokens() {
        let mut meter = ContradictionState::activated(50.0, 50.0);
        assert_eq!(advance(&mut meter, 60.0, 60.0, 25.0), 2);
        assert_eq!(advance(&mut meter, 39.0, 60.0, 1.0), 0);
        assert!(meter.balanced_time.abs() < f64::EPSILON);
        assert_eq!(advance(&mut meter, 45.0, 45.0, 5.0), 0);
    }

    #[test]
    fn sides_are_clamped() {
        let mut meter = ContradictionState::activated(50.0, 50.0);
        advance(&mut meter, 140.0, -3.0, 1.0);
        assert!((meter.side_a - 100.0).abs() < f64::EPSILON);
        assert!(meter.side_b.abs() < f64::EPSILON);
    }

    #[test]
    fn clicking_pushes_attention_against_credibility() {
        let mut state = GameState::new(0);
        state.attention = 40.0;
        update(&mut state, 1.0);
        let meter = state
            .contradictions
            .get(&ContradictionKey::AttentionCredibility)
            .cloned()
            .unwrap_or_else(|| ContradictionState::activated(0.0, 0.0));
        // pressure capped at 10: A = 50 + 10 - 2, B = 50 - 7 + 1.5
        assert!((meter.side_a - 58.0).abs() < 1e-9);
        assert!((meter.side_b - 44.5).abs() < 1e-9);
        assert!((state.attention_watermark - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn later_meters_wait_for_their_phase() {
        let mut state = GameState::new(0);
        activate(&mut state, ContradictionKey::ControlLegitimacy, 0.0, 100.0);
        state
            .institutions
            .insert("police".into(), InstitutionState::independent(50.0));
        update(&mut state, 1.0);
        let meter = state.contradictions.get(&ContradictionKey::ControlLegitimacy);
        assert_eq!(meter, Some(&ContradictionState::activated(0.0, 100.0)));

        state.phase = Phase::Two;
        state.legitimacy = 55.0;
        update(&mut state, 1.0);
        let side_b = state
            .contradictions
            .get(&ContradictionKey::ControlLegitimacy)
            .map_or(0.0, |meter| meter.side_b);
        assert!((side_b - 55.0).abs() < f64::EPSILON);
    }
}

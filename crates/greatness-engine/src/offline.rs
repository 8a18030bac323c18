//! Catch-up credit for time spent away.
//!
//! Only the primary currency is credited, at the production rate of the
//! last known state and a reduced offline rate. Timers, capture actions
//! and event scheduling are left where they were.

use greatness_content::Catalog;
use greatness_types::GameState;
use serde::Serialize;
use tracing::info;

use crate::formulas::{self, elapsed_secs};
use crate::modifiers::Modifiers;

/// Gaps shorter than this are ordinary tick territory.
pub const OFFLINE_THRESHOLD_SECS: f64 = 60.0;

/// What an offline catch-up credited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OfflineReport {
    /// Seconds away.
    pub elapsed_secs: f64,
    /// Greatness credited.
    pub greatness_gained: f64,
    /// Fraction of the production rate that was applied.
    pub offline_rate: f64,
}

/// The credit `state` would receive at `now`, or `None` below the threshold.
pub fn calculate(
    state: &GameState,
    catalog: &Catalog,
    modifiers: &Modifiers,
    now: i64,
) -> Option<OfflineReport> {
    let elapsed = elapsed_secs(now, state.last_tick_at);
    if elapsed < OFFLINE_THRESHOLD_SECS {
        return None;
    }
    let rate = formulas::production_rate(state, catalog, modifiers);
    Some(OfflineReport {
        elapsed_secs: elapsed,
        greatness_gained: rate * elapsed * modifiers.offline_rate,
        offline_rate: modifiers.offline_rate,
    })
}

/// Credit time away and resync the clock to `now`.
pub fn apply(
    state: &mut GameState,
    catalog: &Catalog,
    modifiers: &Modifiers,
    now: i64,
) -> Option<OfflineReport> {
    let report = calculate(state, catalog, modifiers, now);
    if let Some(report) = report {
        state.greatness += report.greatness_gained;
        info!(
            elapsed_secs = report.elapsed_secs,
            gained = report.greatness_gained,
            rate = report.offline_rate,
            "Offline progress applied"
        );
    }
    state.last_tick_at = now;
    report
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_content::default_catalog;
    use greatness_types::UpgradeState;

    use super::*;

    /// A state producing exactly 10 greatness per second.
    fn producing_ten() -> GameState {
        let mut state = GameState::new(0);
        state.legitimacy = 60.0;
        state.upgrades.insert(
            "social_post".into(),
            UpgradeState {
                purchased: true,
                count: 100,
                unlocked: true,
            },
        );
        state
    }

    #[test]
    fn an_hour_away_credits_a_tenth() {
        let catalog = default_catalog().unwrap();
        let mut state = producing_ten();
        let report = apply(&mut state, &catalog, &Modifiers::default(), 3_600_000).unwrap();
        assert!((report.elapsed_secs - 3_600.0).abs() < f64::EPSILON);
        assert!((state.greatness - 3_600.0).abs() < 1e-6);
        assert_eq!(state.last_tick_at, 3_600_000);
    }

    #[test]
    fn short_gaps_only_resync() {
        let catalog = default_catalog().unwrap();
        let mut state = producing_ten();
        assert_eq!(apply(&mut state, &catalog, &Modifiers::default(), 30_000), None);
        assert!(state.greatness.abs() < f64::EPSILON);
        assert_eq!(state.last_tick_at, 30_000);
    }

    #[test]
    fn full_offline_rate_credits_everything() {
        let catalog = default_catalog().unwrap();
        let state = producing_ten();
        let modifiers = Modifiers {
            offline_rate: 1.0,
            ..Modifiers::default()
        };
        let report = calculate(&state, &catalog, &modifiers, 120_000).unwrap();
        assert!((report.greatness_gained - 1_200.0).abs() < 1e-6);
    }
}

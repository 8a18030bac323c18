//! Tick cycle: the fixed-order loop that advances a run by one step.
//!
//! Each valid tick runs these stages in order:
//!
//! 1. **Integrate** -- recompute the production rate from the current
//!    state and credit greatness, cash and play time by `rate * dt`.
//!
//! 2. **Meters** -- advance the contradiction meters, minting doublethink
//!    tokens, then move legitimacy.
//!
//! 3. **Capture** -- institutions (phase 2+), then countries and the
//!    shipyard queue (phase 3+). Timed actions complete by recomputing
//!    elapsed time, so skipped ticks are harmless.
//!
//! 4. **Frontier** -- space (phase 4+), then the cosmos (phase 5).
//!
//! 5. **Checks** -- peace prize threshold, phase transition guard, event
//!    trigger, achievements and upgrade unlocks.
//!
//! A step of zero or negative length only resyncs the clock. A step
//! longer than [`MAX_TICK_SECS`] is not replayed and runs none of the
//! stages above. The tick hands it to the offline calculator, which
//! credits greatness for the gap and resyncs the clock; nothing else
//! moves.

use greatness_content::Catalog;
use greatness_types::{AchievementId, EventId, GameState, PendingTransition, Phase};
use rand::Rng;
use tracing::{debug, info};

use crate::formulas::{self, elapsed_secs};
use crate::modifiers::Modifiers;
use crate::offline::{self, OfflineReport};
use crate::{
    achievements, contradiction, cosmic, country, economy, events, institution, phase, shipyard,
    space,
};

/// Longest step the tick integrates directly.
pub const MAX_TICK_SECS: f64 = 60.0;

/// Factor the prize threshold grows by after each award.
pub const PRIZE_THRESHOLD_GROWTH: f64 = 1.5;

/// Legitimacy granted with a prize.
pub const PRIZE_LEGITIMACY: f64 = 15.0;

/// Greatness granted per point of the threshold that was crossed.
pub const PRIZE_GREATNESS_PER_POINT: f64 = 100.0;

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// Timestamp the tick advanced to.
    pub now: i64,
    /// Seconds integrated.
    pub dt: f64,
    /// Phase at the end of the tick.
    pub phase: Phase,
    /// Production rate used for the step.
    pub greatness_per_second: f64,
    /// Doublethink tokens minted this tick.
    pub tokens_minted: u64,
    /// Whether a peace prize was awarded.
    pub prize_awarded: bool,
    /// Transition recorded by this tick's guard.
    pub transition: Option<PendingTransition>,
    /// Event fired by this tick.
    pub event_triggered: Option<EventId>,
    /// Achievements earned this tick.
    pub achievements: Vec<AchievementId>,
    /// Whether the ending was reached this tick.
    pub ending_triggered: bool,
}

/// What a call to [`run_tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The step had no length; only the clock was resynced.
    Skipped,
    /// The step was too long and was credited as time away.
    Offline(Option<OfflineReport>),
    /// A normal step ran.
    Advanced(TickSummary),
}

/// Advance `state` to `now`.
///
/// Returns [`TickOutcome::Offline`] for a gap over [`MAX_TICK_SECS`],
/// after crediting it through [`offline::apply`].
pub fn run_tick<R: Rng + ?Sized>(
    state: &mut GameState,
    catalog: &Catalog,
    now: i64,
    rng: &mut R,
) -> TickOutcome {
    let dt = elapsed_secs(now, state.last_tick_at);
    let modifiers = Modifiers::collect(&state.prestige_upgrades, catalog);

    if dt <= 0.0 {
        state.last_tick_at = now;
        return TickOutcome::Skipped;
    }
    if dt > MAX_TICK_SECS {
        debug!(dt, "Step too long, routing to offline progress");
        return TickOutcome::Offline(offline::apply(state, catalog, &modifiers, now));
    }

    let rate = formulas::production_rate(state, catalog, &modifiers);
    economy::integrate(state, catalog, rate, dt);
    state.last_tick_at = now;

    let tokens_minted = contradiction::update(state, dt);
    economy::update_legitimacy(state, catalog, &modifiers, dt);

    if state.phase >= Phase::Two {
        institution::update(state, catalog, &modifiers, now, dt);
    }
    if state.phase >= Phase::Three {
        country::update(state, catalog, now, dt);
        shipyard::update(state, catalog, now);
    }
    let ending_before = state.universe.ending_triggered;
    if state.phase >= Phase::Four {
        space::update(state, catalog, &modifiers, dt);
    }
    if state.phase >= Phase::Five {
        cosmic::update(state, catalog, &modifiers, dt);
    }

    let prize_awarded = award_prize(state);
    let transition = phase::guard(state, catalog);
    let event_triggered = events::trigger(state, catalog, &modifiers, now, rng);
    let achievements = achievements::evaluate(state, catalog);
    economy::mark_unlocks(state, catalog);

    TickOutcome::Advanced(TickSummary {
        now,
        dt,
        phase: state.phase,
        greatness_per_second: rate,
        tokens_minted,
        prize_awarded,
        transition,
        event_triggered,
        achievements,
        ending_triggered: !ending_before && state.universe.ending_triggered,
    })
}

/// Award a peace prize once the score reaches the threshold.
fn award_prize(state: &mut GameState) -> bool {
    if state.phase < Phase::Three || state.nobel_score < state.nobel_threshold {
        return false;
    }
    let crossed = state.nobel_threshold;
    state.nobel_prizes_won = state.nobel_prizes_won.saturating_add(1);
    state.nobel_score = 0.0;
    state.nobel_threshold = (crossed * PRIZE_THRESHOLD_GROWTH).round();
    state.legitimacy = (state.legitimacy + PRIZE_LEGITIMACY).min(100.0);
    state.greatness += crossed * PRIZE_GREATNESS_PER_POINT;
    info!(
        prizes = state.nobel_prizes_won,
        next_threshold = state.nobel_threshold,
        "Peace prize awarded"
    );
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use greatness_content::default_catalog;
    use greatness_types::{ContradictionKey, UpgradeState};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn repeated_timestamp_is_skipped() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(0);
        state.attention = 40.0;

        assert!(matches!(
            run_tick(&mut state, &catalog, 100, &mut rng),
            TickOutcome::Advanced(_)
        ));
        let after_first = state.clone();
        assert_eq!(
            run_tick(&mut state, &catalog, 100, &mut rng),
            TickOutcome::Skipped
        );
        assert_eq!(state, after_first);
    }

    #[test]
    fn backwards_clock_only_resyncs() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(10_000);
        let mut expected = state.clone();
        expected.last_tick_at = 5_000;

        assert_eq!(
            run_tick(&mut state, &catalog, 5_000, &mut rng),
            TickOutcome::Skipped
        );
        assert_eq!(state, expected);
    }

    #[test]
    fn long_gap_is_credited_as_offline_time() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
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

        let outcome = run_tick(&mut state, &catalog, 3_600_000, &mut rng);
        let TickOutcome::Offline(Some(report)) = outcome else {
            panic!("expected offline credit, got {outcome:?}");
        };
        assert!((report.greatness_gained - 3_600.0).abs() < 1e-6);
        assert_eq!(state.last_tick_at, 3_600_000);
        assert_eq!(state.click_count, 0);
    }

    #[test]
    fn peace_prize_resets_score_and_raises_threshold() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(0);
        state.phase = Phase::Three;
        state.legitimacy = 90.0;
        state.nobel_score = 100.0;

        let TickOutcome::Advanced(summary) = run_tick(&mut state, &catalog, 100, &mut rng) else {
            panic!("expected a normal step");
        };
        assert!(summary.prize_awarded);
        assert_eq!(state.nobel_prizes_won, 1);
        assert!(state.nobel_score.abs() < f64::EPSILON);
        assert!((state.nobel_threshold - 150.0).abs() < f64::EPSILON);
        assert!((state.legitimacy - 100.0).abs() < f64::EPSILON);
        assert!(state.greatness >= 10_000.0);
    }

    #[test]
    fn prize_waits_for_phase_three() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(0);
        state.nobel_score = 500.0;
        run_tick(&mut state, &catalog, 100, &mut rng);
        assert_eq!(state.nobel_prizes_won, 0);
    }

    #[test]
    fn control_meter_stays_unbalanced_without_institutions() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(0);
        state.phase = Phase::Two;
        state.legitimacy = 60.0;
        state.institutions.clear();
        contradiction::activate(&mut state, ContradictionKey::ControlLegitimacy, 0.0, 100.0);
        let mut now = 0;
        for _ in 0..50 {
            now += 1_000;
            run_tick(&mut state, &catalog, now, &mut rng);
        }
        let meter = state
            .contradictions
            .get(&ContradictionKey::ControlLegitimacy)
            .unwrap();
        assert!(meter.balanced_time.abs() < f64::EPSILON);
    }

    #[test]
    fn gateway_purchase_records_a_pending_transition() {
        let catalog = default_catalog().unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = GameState::new(0);
        state.upgrades.insert(
            catalog.rules.gateway_upgrade.clone(),
            UpgradeState {
                purchased: true,
                count: 1,
                unlocked: true,
            },
        );
        let TickOutcome::Advanced(summary) = run_tick(&mut state, &catalog, 100, &mut rng) else {
            panic!("expected a normal step");
        };
        assert_eq!(
            summary.transition,
            Some(PendingTransition {
                from: Phase::One,
                to: Phase::Two
            })
        );
        assert_eq!(state.phase, Phase::One);
    }
}

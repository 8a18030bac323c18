//! Random event injection and resolution.
//!
//! An event fires when none is waiting and the scheduled time has passed.
//! The pick is a weighted draw over every eligible event, weighted by
//! category. Firing schedules the next check after a randomized delay that
//! shortens as the phase advances; finding nothing eligible schedules a
//! short retry instead.

use greatness_content::Catalog;
use greatness_types::{
    Effect, EffectKind, EventCategory, EventCondition, EventId, GameEvent, GameState, Phase,
    Resource,
};
use rand::Rng;
use tracing::{debug, info};

use crate::formulas::secs_to_millis;
use crate::modifiers::Modifiers;

/// Delay before re-checking when no event is eligible, in milliseconds.
pub const RETRY_DELAY_MS: i64 = 30_000;

/// Selection weight of a category.
pub const fn weight(category: EventCategory) -> f64 {
    match category {
        EventCategory::Opportunity => 3.0,
        EventCategory::Scandal | EventCategory::Absurd => 2.0,
        EventCategory::Contradiction => 1.5,
        EventCategory::Crisis => 1.0,
        EventCategory::Nobel | EventCategory::RealityGlitch => 0.5,
    }
}

/// Range of the delay between events in a phase, in seconds.
pub const fn delay_range(phase: Phase) -> (f64, f64) {
    match phase {
        Phase::One => (120.0, 180.0),
        Phase::Two => (60.0, 120.0),
        Phase::Three => (45.0, 90.0),
        Phase::Four => (30.0, 60.0),
        Phase::Five => (15.0, 30.0),
    }
}

/// Whether `event` may fire in `state`.
///
/// A condition on a resource the engine does not know never holds.
pub fn is_eligible(event: &GameEvent, state: &GameState) -> bool {
    event.phase <= state.phase
        && !(event.unique && state.event_history.contains(&event.id))
        && event
            .conditions
            .iter()
            .all(|condition| condition_holds(condition, state))
}

fn condition_holds(condition: &EventCondition, state: &GameState) -> bool {
    state
        .resource(condition.resource)
        .is_some_and(|value| condition.operator.holds(value, condition.value))
}

/// Weighted draw over the eligible events of `pool`.
pub fn select<'a, R: Rng + ?Sized>(
    state: &GameState,
    pool: &'a [GameEvent],
    rng: &mut R,
) -> Option<&'a GameEvent> {
    let eligible: Vec<&GameEvent> = pool
        .iter()
        .filter(|event| is_eligible(event, state))
        .collect();
    let last = eligible.last().copied()?;
    let total: f64 = eligible.iter().map(|event| weight(event.category)).sum();

    let mut roll = rng.random::<f64>() * total;
    for event in eligible {
        roll -= weight(event.category);
        if roll <= 0.0 {
            return Some(event);
        }
    }
    Some(last)
}

/// Randomized delay before the next event, in milliseconds.
pub fn next_delay_ms<R: Rng + ?Sized>(phase: Phase, modifiers: &Modifiers, rng: &mut R) -> i64 {
    let (min, max) = delay_range(phase);
    let secs = (min + rng.random::<f64>() * (max - min)) * modifiers.event_cooldown;
    secs_to_millis(secs)
}

/// Fire an event if one is due. Returns the id of the event fired.
pub fn trigger<R: Rng + ?Sized>(
    state: &mut GameState,
    catalog: &Catalog,
    modifiers: &Modifiers,
    now: i64,
    rng: &mut R,
) -> Option<EventId> {
    if state.active_event.is_some() || now < state.next_event_at {
        return None;
    }
    let Some(event) = select(state, &catalog.events, rng) else {
        state.next_event_at = now.saturating_add(RETRY_DELAY_MS);
        debug!(retry_ms = RETRY_DELAY_MS, "No eligible event");
        return None;
    };

    let id = event.id.clone();
    state.active_event = Some(event.clone());
    state.next_event_at = now.saturating_add(next_delay_ms(state.phase, modifiers, rng));
    info!(event = %id, category = ?event.category, "Event triggered");
    Some(id)
}

/// Apply the choice at `choice` of the active event.
///
/// Returns `false` without changing anything when no event is active or
/// the index is out of range.
pub fn resolve(state: &mut GameState, choice: usize, modifiers: &Modifiers) -> bool {
    let Some(event) = state.active_event.take() else {
        return false;
    };
    let Some(picked) = event.choices.get(choice) else {
        state.active_event = Some(event);
        return false;
    };

    for effect in &picked.effects {
        apply_effect(state, effect, modifiers);
    }
    debug!(event = %event.id, choice, "Event resolved");
    state.event_history.push(event.id);
    true
}

/// Clear the active event without applying a choice or recording it.
pub fn dismiss(state: &mut GameState) -> bool {
    state.active_event.take().is_some()
}

/// Apply one effect, then clamp the resource into its range. Read-only
/// and unknown resources are left alone.
pub fn apply_effect(state: &mut GameState, effect: &Effect, modifiers: &Modifiers) {
    let Some(value) = state.resource_mut(effect.resource) else {
        return;
    };
    let mut next = match effect.kind {
        EffectKind::Add => *value + effect.amount,
        EffectKind::Multiply => *value * effect.amount,
        EffectKind::Set => effect.amount,
    };
    if let Some(bound) = effect.resource.upper_bound() {
        next = next.min(bound);
    }
    if effect.resource == Resource::RealityDrift {
        next = next.min(modifiers.drift_cap());
    }
    if effect.resource.is_non_negative() {
        next = next.max(0.0);
    }
    *value = next;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_types::{Comparison, EventChoice};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn event(id: &str, phase: Phase, category: EventCategory) -> GameEvent {
        GameEvent {
            id: EventId::from(id),
            phase,
            category,
            headline: String::from(id),
            context: String::new(),
            choices: vec![EventChoice {
                label: String::from("Accept"),
                description: String::new(),
                effects: vec![
                    Effect {
                        resource: Resource::Cash,
                        amount: 100.0,
                        kind: EffectKind::Add,
                    },
                    Effect {
                        resource: Resource::Legitimacy,
                        amount: 30.0,
                        kind: EffectKind::Add,
                    },
                ],
            }],
            conditions: Vec::new(),
            cooldown: 0.0,
            unique: false,
        }
    }

    #[test]
    fn later_phase_and_spent_unique_events_are_ineligible() {
        let mut state = GameState::new(0);
        assert!(!is_eligible(
            &event("later", Phase::Two, EventCategory::Crisis),
            &state
        ));

        let mut once = event("once", Phase::One, EventCategory::Crisis);
        once.unique = true;
        assert!(is_eligible(&once, &state));
        state.event_history.push(once.id.clone());
        assert!(!is_eligible(&once, &state));
    }

    #[test]
    fn conditions_must_all_hold() {
        let mut state = GameState::new(0);
        let mut gated = event("gated", Phase::One, EventCategory::Scandal);
        gated.conditions.push(EventCondition {
            resource: Resource::Attention,
            operator: Comparison::GreaterOrEqual,
            value: 50.0,
        });
        assert!(!is_eligible(&gated, &state));
        state.attention = 50.0;
        assert!(is_eligible(&gated, &state));

        gated.conditions.push(EventCondition {
            resource: Resource::Unknown,
            operator: Comparison::GreaterOrEqual,
            value: 0.0,
        });
        assert!(!is_eligible(&gated, &state));
    }

    #[test]
    fn selection_is_reproducible_from_the_seed() {
        let state = GameState::new(0);
        let pool = vec![
            event("a", Phase::One, EventCategory::Opportunity),
            event("b", Phase::One, EventCategory::Nobel),
            event("c", Phase::One, EventCategory::Crisis),
        ];
        let picks = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20)
                .map(|_| select(&state, &pool, &mut rng).unwrap().id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
        assert!(select(&state, &[], &mut SmallRng::seed_from_u64(7)).is_none());
    }

    #[test]
    fn heavier_categories_win_more_often() {
        let state = GameState::new(0);
        let pool = vec![
            event("heavy", Phase::One, EventCategory::Opportunity),
            event("light", Phase::One, EventCategory::RealityGlitch),
        ];
        let mut rng = SmallRng::seed_from_u64(1);
        let heavy = (0..1_000)
            .filter(|_| select(&state, &pool, &mut rng).unwrap().id.as_str() == "heavy")
            .count();
        // expected share is 3 / 3.5
        assert!(heavy > 780, "heavy picked {heavy} times");
    }

    #[test]
    fn delay_shrinks_with_phase_and_stretches_with_fatigue() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let delay = next_delay_ms(Phase::Five, &Modifiers::default(), &mut rng);
            assert!((15_000..=30_000).contains(&delay));
        }
        let tired = Modifiers {
            event_cooldown: 2.0,
            ..Modifiers::default()
        };
        let delay = next_delay_ms(Phase::One, &tired, &mut rng);
        assert!((240_000..=360_000).contains(&delay));
    }

    #[test]
    fn trigger_respects_schedule_and_single_slot() {
        let mut catalog = greatness_content::default_catalog().unwrap();
        catalog.events = vec![event("only", Phase::One, EventCategory::Absurd)];
        let mut rng = SmallRng::seed_from_u64(9);
        let mut state = GameState::new(0);
        let modifiers = Modifiers::default();

        assert_eq!(
            trigger(&mut state, &catalog, &modifiers, 119_999, &mut rng),
            None
        );
        let fired = trigger(&mut state, &catalog, &modifiers, 120_000, &mut rng);
        assert_eq!(fired.as_ref().map(EventId::as_str), Some("only"));
        assert!((240_000..=300_000).contains(&state.next_event_at));

        let later = state.next_event_at;
        assert_eq!(
            trigger(&mut state, &catalog, &modifiers, later, &mut rng),
            None
        );
    }

    #[test]
    fn nothing_eligible_schedules_a_retry() {
        let mut catalog = greatness_content::default_catalog().unwrap();
        catalog.events = vec![event("later", Phase::Three, EventCategory::Absurd)];
        let mut rng = SmallRng::seed_from_u64(9);
        let mut state = GameState::new(0);
        let fired = trigger(&mut state, &catalog, &Modifiers::default(), 120_000, &mut rng);
        assert_eq!(fired, None);
        assert_eq!(state.next_event_at, 150_000);
    }

    #[test]
    fn resolve_applies_effects_and_records_history() {
        let mut state = GameState::new(0);
        state.legitimacy = 90.0;
        state.active_event = Some(event("deal", Phase::One, EventCategory::Opportunity));

        assert!(!resolve(&mut state, 3, &Modifiers::default()));
        assert!(state.active_event.is_some());

        assert!(resolve(&mut state, 0, &Modifiers::default()));
        assert!((state.cash - 100.0).abs() < f64::EPSILON);
        assert!((state.legitimacy - 100.0).abs() < f64::EPSILON);
        assert_eq!(state.event_history, vec![EventId::from("deal")]);
        assert!(state.active_event.is_none());
        assert!(!resolve(&mut state, 0, &Modifiers::default()));
    }

    #[test]
    fn dismiss_skips_history() {
        let mut state = GameState::new(0);
        state.active_event = Some(event("noise", Phase::One, EventCategory::Absurd));
        assert!(dismiss(&mut state));
        assert!(state.event_history.is_empty());
        assert!(!dismiss(&mut state));
    }

    #[test]
    fn effects_respect_bounds_and_ignore_read_only() {
        let mut state = GameState::new(0);
        let modifiers = Modifiers {
            drift_cap_reduction: 30.0,
            ..Modifiers::default()
        };
        let effects = [
            (Resource::Fear, -10.0, EffectKind::Add),
            (Resource::RealityDrift, 95.0, EffectKind::Set),
            (Resource::Greatness, 3.0, EffectKind::Set),
            (Resource::Greatness, 2.0, EffectKind::Multiply),
            (Resource::ClickCount, 10.0, EffectKind::Set),
            (Resource::Unknown, 10.0, EffectKind::Set),
        ];
        for (resource, amount, kind) in effects {
            apply_effect(
                &mut state,
                &Effect {
                    resource,
                    amount,
                    kind,
                },
                &modifiers,
            );
        }
        assert!(state.fear.abs() < f64::EPSILON);
        assert!((state.reality_drift - 70.0).abs() < f64::EPSILON);
        assert!((state.greatness - 6.0).abs() < f64::EPSILON);
        assert_eq!(state.click_count, 0);
    }
}

//! End-to-end scenarios for the `greatness-engine` simulation service.
//!
//! Each test drives a [`Simulation`] only through its public operations
//! and the tick, the way the runner does, and checks the resulting state.

#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::float_cmp,
    clippy::too_many_lines,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;

use greatness_content::{Catalog, default_catalog};
use greatness_engine::snapshot::{decode, encode};
use greatness_engine::{SaveFile, Simulation, TickOutcome};
use greatness_store::{FileStore, MemoryStore, SaveStore};
use greatness_types::{
    ContradictionKey, ContradictionState, GameState, InstitutionAction, InstitutionState,
    InstitutionStatus, PendingTransition, Phase, TacticType, UpgradeState,
};

fn catalog() -> Arc<Catalog> {
    Arc::new(default_catalog().unwrap())
}

fn with_state(state: GameState) -> Simulation {
    Simulation::with_state(state, catalog(), Box::new(MemoryStore::new()), 42)
}

/// Tick from the current time to `until` in steps of `step_ms`.
fn run_until(sim: &mut Simulation, until: i64, step_ms: i64) {
    let mut now = sim.now();
    while now < until {
        now = (now + step_ms).min(until);
        sim.tick(now);
    }
}

/// Every percentage-like field sits inside its documented range.
fn assert_bounded(state: &GameState, cap: f64) {
    assert!((0.0..=100.0).contains(&state.legitimacy), "legitimacy {}", state.legitimacy);
    assert!((0.0..=100.0).contains(&state.terraform_progress));
    assert!((0.0..=cap).contains(&state.reality_drift));
    assert!((0.0..=100.0).contains(&state.universe.universe_converted));
    assert!(state.fear >= 0.0);
    assert!(state.nobel_score >= 0.0);
    let budget = &state.budget;
    for line in [
        budget.healthcare,
        budget.education,
        budget.social_benefits,
        budget.military,
        budget.data_centers,
        budget.infrastructure,
        budget.propaganda_bureau,
        budget.space_program,
    ] {
        assert!((0.0..=100.0).contains(&line));
    }
    for meter in state.contradictions.values() {
        assert!((0.0..=100.0).contains(&meter.side_a));
        assert!((0.0..=100.0).contains(&meter.side_b));
        assert!(meter.balanced_time >= 0.0);
    }
    for institution in state.institutions.values() {
        assert!((0.0..=100.0).contains(&institution.resistance));
        assert!((0.0..=100.0).contains(&institution.progress));
    }
    for country in state.countries.values() {
        assert!(country.resistance >= 0.0);
        assert!((0.0..=100.0).contains(&country.stability));
        assert!((0.0..=100.0).contains(&country.encirclement));
        assert!((0.0..=100.0).contains(&country.trade_dependency));
        assert!(country.active_operations.len() <= 2);
    }
}

#[test]
fn five_clicks_from_a_fresh_run() {
    let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 1, 0);
    for _ in 0..5 {
        sim.click();
    }
    let state = sim.state();
    assert_eq!(state.attention, 5.0);
    assert_eq!(state.click_count, 5);
    assert!((state.greatness - 0.5).abs() < 1e-12);
}

#[test]
fn co_opt_captures_a_weakened_institution() {
    let catalog = catalog();
    let target = catalog.institutions.keys().next().unwrap().clone();

    let mut state = GameState::new(0);
    state.phase = Phase::Two;
    state.cash = 5_000.0;
    state.legitimacy = 80.0;
    state.institutions = catalog
        .institutions
        .iter()
        .map(|(id, def)| (id.clone(), InstitutionState::independent(def.resistance)))
        .collect();
    state.institutions.get_mut(&target).unwrap().resistance = 25.0;
    let mut sim = Simulation::with_state(state, catalog, Box::new(MemoryStore::new()), 1);

    assert!(sim.start_institution_action(target.as_str(), InstitutionAction::CoOpt));
    assert_eq!(sim.state().cash, 0.0);
    assert_eq!(
        sim.state().institutions.get(&target).unwrap().status,
        InstitutionStatus::CoOpting
    );
    // one timed action at a time
    assert!(!sim.start_institution_action(target.as_str(), InstitutionAction::CoOpt));

    run_until(&mut sim, 181_000, 1_000);
    let institution = sim.state().institutions.get(&target).unwrap();
    assert_eq!(institution.resistance, 0.0);
    assert_eq!(institution.status, InstitutionStatus::Captured);
    assert_eq!(institution.action_started_at, None);
}

#[test]
fn sustained_balance_mints_tokens() {
    let catalog = catalog();
    let mut state = GameState::new(0);
    state.phase = Phase::Two;
    state.legitimacy = 80.0;
    state.contradictions.clear();
    state.contradictions.insert(
        ContradictionKey::ControlLegitimacy,
        ContradictionState::activated(100.0, 80.0),
    );
    state.institutions = catalog
        .institutions
        .keys()
        .map(|id| {
            let mut institution = InstitutionState::independent(0.0);
            institution.status = InstitutionStatus::Captured;
            (id.clone(), institution)
        })
        .collect();
    let mut sim = Simulation::with_state(state, catalog, Box::new(MemoryStore::new()), 1);

    let TickOutcome::Advanced(summary) = sim.tick(31_000) else {
        panic!("expected a normal step");
    };
    assert_eq!(summary.tokens_minted, 3);
    assert_eq!(sim.state().doublethink_tokens, 3);
    let meter = sim
        .state()
        .contradictions
        .get(&ContradictionKey::ControlLegitimacy)
        .unwrap();
    assert!((meter.balanced_time - 31.0).abs() < 1e-9);

    // every institution is controlled, so phase 3 is now waiting
    assert_eq!(
        sim.pending_transition(),
        Some(PendingTransition {
            from: Phase::Two,
            to: Phase::Three
        })
    );
}

#[test]
fn peace_prize_on_the_next_tick() {
    let mut state = GameState::new(0);
    state.phase = Phase::Three;
    state.legitimacy = 95.0;
    state.nobel_score = 100.0;
    let mut sim = with_state(state);

    sim.tick(100);
    let state = sim.state();
    assert_eq!(state.nobel_prizes_won, 1);
    assert_eq!(state.nobel_score, 0.0);
    assert_eq!(state.nobel_threshold, 150.0);
    assert_eq!(state.legitimacy, 100.0);
}

#[test]
fn an_hour_offline_and_thirty_seconds_offline() {
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

    let mut sim = with_state(state.clone());
    let report = sim.apply_offline_progress(3_600_000).unwrap();
    assert!((report.offline_rate - 0.1).abs() < f64::EPSILON);
    assert!((sim.state().greatness - 3_600.0).abs() < 1e-6);

    let mut sim = with_state(state);
    assert_eq!(sim.apply_offline_progress(30_000), None);
    assert_eq!(sim.state().greatness, 0.0);
}

#[test]
fn prestige_resets_everything_but_the_permanent_record() {
    let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 1, 0);
    for _ in 0..3 {
        sim.click();
    }
    sim.tick(100);
    assert!(sim.state().achievements.contains("first_click"));

    let mut state = sim.state().clone();
    state.greatness_units = 1_000_000.0;
    state.phase = Phase::Five;
    state.cash = 1e12;
    let mut sim = with_state(state);

    assert_eq!(sim.prestige(), 6);
    let state = sim.state();
    assert_eq!(state.prestige_level, 1);
    assert_eq!(state.prestige_points, 6);
    assert_eq!(state.phase, Phase::One);
    assert_eq!(state.cash, 0.0);
    assert_eq!(state.click_count, 0);
    assert!(state.achievements.contains("first_click"));

    let mut expected = GameState::new(100);
    expected.achievements = state.achievements.clone();
    expected.prestige_level = 1;
    expected.prestige_points = 6;
    expected.last_save_at = state.last_save_at;
    assert_eq!(state, &expected);
}

#[test]
fn prestige_upgrade_carries_click_power_into_the_next_run() {
    let mut state = GameState::new(0);
    state.prestige_points = 10;
    let mut sim = with_state(state);
    assert!(sim.purchase_prestige_upgrade("muscle_memory"));
    assert!(!sim.purchase_prestige_upgrade("muscle_memory"));
    sim.prestige();
    assert_eq!(sim.state().attention_per_click, 10.0);
    sim.click();
    assert_eq!(sim.state().attention, 10.0);
}

#[test]
fn repeated_tick_is_idempotent() {
    let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 3, 0);
    sim.click();
    run_until(&mut sim, 5_000, 100);
    let before = sim.state().clone();
    assert_eq!(sim.tick(5_000), TickOutcome::Skipped);
    assert_eq!(sim.state(), &before);
}

#[test]
fn identical_seed_and_inputs_replay_identically() {
    let play = || {
        let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 99, 0);
        let mut now = 0;
        for step in 0..6_000_u32 {
            now += 100;
            if step % 3 == 0 {
                sim.click();
            }
            if step % 50 == 0 {
                sim.purchase_upgrade("social_post");
            }
            sim.tick(now);
            if sim.state().active_event.is_some() {
                sim.resolve_event(0);
            }
        }
        sim.state().clone()
    };

    let first = play();
    let second = play();
    assert!(!first.event_history.is_empty());
    assert_eq!(first, second);
}

#[test]
fn played_states_survive_encode_and_decode_exactly() {
    let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 17, 0);
    let mut now = 0;
    let mut sampled = 0;
    for step in 1..=3_000_u32 {
        now += 97;
        if step % 2 == 0 {
            sim.click();
        }
        if step % 40 == 0 {
            sim.purchase_upgrade("social_post");
            sim.purchase_upgrade("social_megaphone");
        }
        sim.tick(now);
        if sim.state().active_event.is_some() {
            sim.resolve_event(0);
        }

        if step % 100 == 0 {
            let save = SaveFile::new(sim.state().clone(), now);
            let restored = decode(&encode(&save).unwrap()).unwrap();
            assert_eq!(restored, save, "state diverged after {step} ticks");
            sampled += 1;
        }
    }
    assert_eq!(sampled, 30);
    assert!(sim.state().greatness.fract() != 0.0);
}

#[test]
fn percentages_stay_bounded_through_a_war() {
    let mut state = GameState::new(0);
    state.phase = Phase::Two;
    state.pending_transition = Some(PendingTransition {
        from: Phase::Two,
        to: Phase::Three,
    });
    state.cash = 1e9;
    state.loyalty = 10_000.0;
    state.war_output = 1_000.0;
    state.legitimacy = 60.0;
    let mut sim = with_state(state);
    assert_eq!(sim.complete_phase_transition(), Some(Phase::Three));
    let cap = sim.modifiers().drift_cap();

    assert!(sim.start_country_tactic("nordland", TacticType::FreedomOperation));
    assert!(sim.start_country_tactic("sand_republic", TacticType::CoupSponsorship));
    assert!(sim.start_country_tactic("eurovia", TacticType::MediaInfiltration));
    assert!(sim.start_country_tactic("tundra_republic", TacticType::JointDefense));
    assert!(sim.build_ship("patrol_boat", 5));

    let mut now = sim.now();
    for step in 0..6_000_u32 {
        now += 100;
        sim.tick(now);
        if sim.state().active_event.is_some() {
            sim.resolve_event(usize::try_from(step % 3).unwrap());
            sim.dismiss_event();
        }
        if step % 600 == 0 {
            sim.start_country_tactic("tundra_republic", TacticType::JointDefense);
            sim.start_country_tactic("copper_states", TacticType::FreedomOperation);
        }
        if step % 10 == 0 {
            assert_bounded(sim.state(), cap);
        }
    }
    assert_bounded(sim.state(), cap);
    assert!(sim.state().fleet.get("patrol_boat").is_some_and(|count| *count == 5));
}

#[test]
fn file_save_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("greatness-save.json");

    let mut sim = Simulation::new(catalog(), Box::new(FileStore::new(&path)), 5, 0);
    for _ in 0..12 {
        sim.click();
    }
    assert!(sim.purchase_upgrade("social_post"));
    run_until(&mut sim, 10_000, 100);
    assert!(sim.save());
    let saved = sim.state().clone();

    let mut restarted = Simulation::new(catalog(), Box::new(FileStore::new(&path)), 5, 20_000);
    assert!(restarted.load());
    assert_eq!(restarted.state(), &saved);
}

#[test]
fn version_one_save_is_migrated_on_load() {
    let mut state = GameState::new(0);
    state.attention = 321.0;
    state.attention_watermark = 0.0;
    let mut document = serde_json::json!({
        "version": 1,
        "saved_at": 0,
        "state": serde_json::to_value(&state).unwrap(),
    });
    document["state"]
        .as_object_mut()
        .unwrap()
        .remove("attention_watermark");

    let mut store = MemoryStore::new();
    store.write(&document.to_string()).unwrap();
    let mut sim = Simulation::new(catalog(), Box::new(store), 5, 0);
    assert!(sim.load());
    assert_eq!(sim.state().attention, 321.0);
    assert_eq!(sim.state().attention_watermark, 321.0);
}

#[test]
fn reset_restores_defaults_at_simulation_time() {
    let mut sim = Simulation::new(catalog(), Box::new(MemoryStore::new()), 5, 0);
    sim.click();
    run_until(&mut sim, 2_000, 100);
    sim.reset();
    assert_eq!(sim.state(), &GameState::new(2_000));
}

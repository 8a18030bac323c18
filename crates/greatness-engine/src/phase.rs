//! Phase transition state machine.
//!
//! ```text
//! One --gateway upgrade--> Two --all institutions controlled--> Three
//! Three --all countries secured--> Four --dyson + rigs + industry--> Five
//! ```
//!
//! A guard that fires only records a [`PendingTransition`]. Progress to the
//! next phase waits for [`finalize`], which advances the phase and builds
//! the records the new phase plays with.

use greatness_content::Catalog;
use greatness_types::{
    ContradictionKey, CountryState, CountryStatus, GameState, InstitutionState, PendingTransition,
    Phase, SpaceState, UniverseState,
};
use tracing::info;

use crate::contradiction;
use crate::modifiers::Modifiers;

/// The transition whose guard currently holds, if any.
pub fn check_transition(state: &GameState, catalog: &Catalog) -> Option<PendingTransition> {
    let ready = match state.phase {
        Phase::One => state.has_upgrade(catalog.rules.gateway_upgrade.as_str()),
        Phase::Two => {
            !state.institutions.is_empty()
                && state
                    .institutions
                    .values()
                    .all(|institution| institution.status.is_controlled())
        }
        Phase::Three => {
            !state.countries.is_empty()
                && state
                    .countries
                    .values()
                    .all(|country| country.status.is_secured())
        }
        Phase::Four => {
            let rigs = state
                .space
                .asteroid_units
                .get(&catalog.rules.required_rig_tier)
                .copied()
                .unwrap_or(0);
            state.space.dyson_swarms > 0
                && rigs >= catalog.rules.required_rigs
                && state.orbital_industry >= catalog.rules.required_orbital_industry
        }
        Phase::Five => false,
    };
    if !ready {
        return None;
    }
    state.phase.next().map(|to| PendingTransition {
        from: state.phase,
        to,
    })
}

/// Record the pending transition if its guard holds and none is waiting.
/// Returns the transition that was recorded.
pub fn guard(state: &mut GameState, catalog: &Catalog) -> Option<PendingTransition> {
    if state.pending_transition.is_some() {
        return None;
    }
    let transition = check_transition(state, catalog)?;
    state.pending_transition = Some(transition);
    info!(from = %transition.from, to = %transition.to, "Phase transition pending");
    Some(transition)
}

/// Enter the pending phase. Returns the phase entered, or `None` when
/// nothing was pending.
pub fn finalize(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers) -> Option<Phase> {
    let transition = state.pending_transition.take()?;
    state.phase = transition.to;

    match transition.to {
        Phase::Two => enter_institutions(state, catalog),
        Phase::Three => enter_expansion(state, catalog, modifiers),
        Phase::Four => enter_space(state),
        Phase::Five => enter_cosmos(state),
        Phase::One => {}
    }

    info!(from = %transition.from, to = %transition.to, "Phase transition complete");
    Some(transition.to)
}

fn enter_institutions(state: &mut GameState, catalog: &Catalog) {
    state.institutions = catalog
        .institutions
        .iter()
        .map(|(id, def)| (id.clone(), InstitutionState::independent(def.resistance)))
        .collect();
    contradiction::activate(state, ContradictionKey::ControlLegitimacy, 0.0, 100.0);
}

fn enter_expansion(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers) {
    let discount = 1.0 - modifiers.country_resistance;
    state.countries = catalog
        .countries
        .iter()
        .map(|(id, def)| {
            let country = if def.allied {
                CountryState {
                    kompromat_level: def.kompromat_level,
                    ..CountryState::new(CountryStatus::Allied, def.resistance, def.stability)
                }
            } else {
                CountryState::new(
                    CountryStatus::Independent,
                    (def.resistance * discount).max(0.0),
                    def.stability,
                )
            };
            (id.clone(), country)
        })
        .collect();
    state.shipyard_level = 1;
    contradiction::activate(state, ContradictionKey::WarNobel, 50.0, 50.0);
    contradiction::activate(state, ContradictionKey::ExpansionStability, 0.0, 100.0);
}

fn enter_space(state: &mut GameState) {
    state.space = SpaceState::default();
    state.rocket_mass = 0.0;
    state.orbital_industry = 0.0;
    state.mining_output = 0.0;
    state.colonists = 0.0;
    state.terraform_progress = 0.0;
    contradiction::activate(state, ContradictionKey::LongtermShortterm, 50.0, 50.0);
}

fn enter_cosmos(state: &mut GameState) {
    state.universe = UniverseState::default();
    state.computronium = 0.0;
    state.greatness_units = 0.0;
    contradiction::activate(state, ContradictionKey::GreatnessMeaning, 50.0, 50.0);
}

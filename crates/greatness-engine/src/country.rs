//! Country geopolitical state machine (phase 3).
//!
//! Tactics run as timed operations, at most two per country. Completed
//! operations are applied in reverse start order; each completion moves
//! resistance, stability, and the special counters, then re-derives the
//! status band. Annexed and allied countries never change status through
//! the bands.

use greatness_content::Catalog;
use greatness_types::{
    ActiveOperation, CountryId, CountryState, CountryStatus, GameState, Phase, TacticType,
};
use tracing::{debug, info};

use crate::formulas::{BudgetEffects, clamp_percent, elapsed_secs};
use crate::rejection::{self, ActionResult, Rejection};

/// Maximum concurrent operations per country.
pub const MAX_ACTIVE_OPERATIONS: usize = 2;

/// Fear lost per second.
pub const FEAR_DECAY_PER_SEC: f64 = 0.5;

/// Resistance below which a country counts as infiltrated.
const INFILTRATED_RESISTANCE: f64 = 30.0;
/// Stability below which a country is ripe for a coup.
const COUP_STABILITY: f64 = 20.0;
/// Stability below which a country counts as sanctioned.
const SANCTIONED_STABILITY: f64 = 50.0;

const ENCIRCLEMENT_PER_PACT: f64 = 15.0;
const TRADE_DEPENDENCY_PER_DEAL: f64 = 20.0;
const SOFT_CAPTURE_OFFERS: u32 = 5;

// Countries with a non-military path to capture.
const ENCIRCLED_COUNTRY: &str = "tundra_republic";
const TRADE_DEPENDENT_COUNTRY: &str = "maple_federation";
const PURCHASABLE_COUNTRY: &str = "frostheim";

// Operations in these countries push refugees into these neighbours.
const REFUGEE_SOURCES: [&str; 2] = ["sand_republic", "copper_states"];
const REFUGEE_TARGETS: [&str; 2] = ["eurovia", "nordland"];
const REFUGEE_STABILITY_HIT: f64 = 5.0;
const REFUGEE_RESISTANCE_HIT: f64 = 3.0;

/// Start a tactic against a country at time `now`.
pub fn start_tactic(
    state: &mut GameState,
    catalog: &Catalog,
    id: &str,
    tactic: TacticType,
    now: i64,
) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Three)?;
    let country = state
        .countries
        .get(id)
        .ok_or_else(|| rejection::unknown("country", id))?;
    let def = catalog.tactics.get(&tactic).ok_or(Rejection::NotAvailable {
        reason: "tactic has no parameters",
    })?;

    if country.status == CountryStatus::Annexed {
        return Err(Rejection::WrongStatus {
            reason: "country already annexed",
        });
    }
    let whitelisted = def
        .available_for
        .as_ref()
        .is_some_and(|ids| ids.iter().any(|allowed| allowed.as_str() == id));
    if country.status == CountryStatus::Allied && !whitelisted {
        return Err(Rejection::NotAvailable {
            reason: "allied partner only accepts its own tactics",
        });
    }
    if !def.is_available_for(id) {
        return Err(Rejection::NotAvailable {
            reason: "tactic not offered for this country",
        });
    }
    if tactic == TacticType::Annexation && country.resistance > 0.0 {
        return Err(Rejection::WrongStatus {
            reason: "annexation needs resistance at zero",
        });
    }
    if country.active_operations.len() >= MAX_ACTIVE_OPERATIONS {
        return Err(Rejection::AtCapacity {
            what: "country operations",
        });
    }
    rejection::require_funds(state.cash, def.cost_cash, "cash")?;
    rejection::require_funds(state.loyalty, def.cost_loyalty, "loyalty")?;
    rejection::require_funds(state.war_output, def.cost_war_output, "war output")?;

    state.cash -= def.cost_cash;
    state.loyalty -= def.cost_loyalty;
    state.war_output -= def.cost_war_output;
    state.legitimacy = clamp_percent(state.legitimacy + def.legitimacy_impact);
    if let Some(country) = state.countries.get_mut(id) {
        country.active_operations.push(ActiveOperation {
            tactic,
            started_at: now,
            duration_secs: def.duration_secs,
        });
    }

    debug!(country = id, tactic = ?tactic, "Country tactic started");
    Ok(())
}

/// Complete finished operations and advance fear, peace score, and war
/// output.
pub fn update(state: &mut GameState, catalog: &Catalog, now: i64, dt: f64) {
    let ids: Vec<CountryId> = state.countries.keys().cloned().collect();
    let mut fear_gained = 0.0;
    let mut nobel_delta = 0.0;

    for id in ids {
        let Some(country) = state.countries.get_mut(&id) else {
            continue;
        };
        let finished = take_finished(country, now);
        if finished.is_empty() {
            continue;
        }

        let mut refugee_waves = 0_u32;
        for tactic in finished {
            let Some(def) = catalog.tactics.get(&tactic) else {
                continue;
            };
            country.resistance = (country.resistance - def.resistance_reduction).max(0.0);
            country.stability = clamp_percent(country.stability + def.stability_impact);
            fear_gained += def.fear_generated;
            nobel_delta += def.nobel_impact;

            apply_special_counters(country, tactic);
            if tactic.annexes() {
                country.status = CountryStatus::Annexed;
                country.resistance = 0.0;
                info!(country = %id, tactic = ?tactic, "Country annexed");
            }
            apply_soft_capture(&id, country);
            refresh_status(&id, country);

            if matches!(
                tactic,
                TacticType::FreedomOperation | TacticType::CoupSponsorship
            ) && REFUGEE_SOURCES.contains(&id.as_str())
            {
                refugee_waves = refugee_waves.saturating_add(1);
            }
        }

        for _ in 0..refugee_waves {
            push_refugees(state);
        }
    }

    state.fear = (state.fear + fear_gained - FEAR_DECAY_PER_SEC * dt).max(0.0);
    state.nobel_score = (state.nobel_score + nobel_delta).max(0.0);
    state.war_output += BudgetEffects::from_budget(&state.budget).military * dt;
}

/// Remove completed operations, newest first.
fn take_finished(country: &mut CountryState, now: i64) -> Vec<TacticType> {
    let mut finished = Vec::new();
    let mut index = country.active_operations.len();
    while index > 0 {
        index -= 1;
        let done = country
            .active_operations
            .get(index)
            .is_some_and(|op| elapsed_secs(now, op.started_at) >= op.duration_secs);
        if done {
            finished.push(country.active_operations.remove(index).tactic);
        }
    }
    finished
}

fn apply_special_counters(country: &mut CountryState, tactic: TacticType) {
    match tactic {
        TacticType::JointDefense => {
            country.encirclement = (country.encirclement + ENCIRCLEMENT_PER_PACT).min(100.0);
        }
        TacticType::TradeIntegration => {
            country.trade_dependency =
                (country.trade_dependency + TRADE_DEPENDENCY_PER_DEAL).min(100.0);
        }
        TacticType::PurchaseOffer => {
            country.purchase_offers = country.purchase_offers.saturating_add(1);
        }
        TacticType::KompromatResist => reduce_kompromat(country, 15.0),
        TacticType::AidReduction => reduce_kompromat(country, 10.0),
        TacticType::LeverageReversal => reduce_kompromat(country, 40.0),
        _ => {}
    }
}

fn reduce_kompromat(country: &mut CountryState, amount: f64) {
    country.kompromat_level = (country.kompromat_level - amount).max(0.0);
}

fn apply_soft_capture(id: &CountryId, country: &mut CountryState) {
    let captured = match id.as_str() {
        ENCIRCLED_COUNTRY => country.encirclement >= 100.0,
        TRADE_DEPENDENT_COUNTRY => country.trade_dependency >= 100.0,
        PURCHASABLE_COUNTRY => country.purchase_offers >= SOFT_CAPTURE_OFFERS,
        _ => false,
    };
    if captured && country.resistance > 0.0 {
        country.resistance = 0.0;
        info!(country = %id, "Country resistance broken without a war");
    }
}

/// Re-derive the status band after a completion.
fn refresh_status(id: &CountryId, country: &mut CountryState) {
    if matches!(country.status, CountryStatus::Annexed | CountryStatus::Allied) {
        return;
    }
    let previous = country.status;
    if country.resistance <= 0.0 {
        country.status = CountryStatus::Occupied;
    } else if matches!(
        country.status,
        CountryStatus::Independent | CountryStatus::Sanctioned
    ) {
        if country.resistance < INFILTRATED_RESISTANCE {
            country.status = CountryStatus::Infiltrated;
        } else if country.stability < COUP_STABILITY {
            country.status = CountryStatus::CoupTarget;
        } else if country.stability < SANCTIONED_STABILITY {
            country.status = CountryStatus::Sanctioned;
        }
    }
    if country.status != previous {
        debug!(country = %id, from = ?previous, to = ?country.status, "Country status changed");
    }
}

fn push_refugees(state: &mut GameState) {
    for target in REFUGEE_TARGETS {
        if let Some(country) = state.countries.get_mut(target) {
            country.stability = (country.stability - REFUGEE_STABILITY_HIT).max(0.0);
            country.resistance = (country.resistance - REFUGEE_RESISTANCE_HIT).max(0.0);
        }
    }
    debug!("Refugee flows destabilized neighbours");
}

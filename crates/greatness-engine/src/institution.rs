//! Institution capture state machine (phase 2).
//!
//! ```text
//! independent --co_opt/replace/purge--> in progress --100%--> captured
//!                                            |                  |
//!                                            +--resistance left-+--> independent
//! captured --automate--> automated
//! captured --privatize--> independent (resistance 50)
//! ```
//!
//! Timed actions record their start time and are re-evaluated every tick
//! from elapsed wall time, so progress survives a save and reload.

use greatness_content::Catalog;
use greatness_types::{GameState, InstitutionAction, InstitutionStatus, Phase};
use tracing::{debug, info};

use crate::formulas::{clamp_percent, count_f64, elapsed_secs};
use crate::modifiers::Modifiers;
use crate::rejection::{self, ActionResult, Rejection};

/// Loyalty returned by a passed loyalty test.
pub const LOYALTY_TEST_REFUND: f64 = 5.0;

/// Cash per unit of output paid when an institution is privatized.
pub const PRIVATIZE_PAYOUT: f64 = 500.0;

/// Resistance of a freshly privatized institution.
pub const PRIVATIZED_RESISTANCE: f64 = 50.0;

/// The timed action an in-progress status stands for.
const fn running_action(status: InstitutionStatus) -> Option<InstitutionAction> {
    match status {
        InstitutionStatus::CoOpting => Some(InstitutionAction::CoOpt),
        InstitutionStatus::Replacing => Some(InstitutionAction::Replace),
        InstitutionStatus::Purging => Some(InstitutionAction::Purge),
        InstitutionStatus::Independent
        | InstitutionStatus::Captured
        | InstitutionStatus::Automated => None,
    }
}

/// Start an action against an institution at time `now`.
pub fn start_action(
    state: &mut GameState,
    catalog: &Catalog,
    id: &str,
    action: InstitutionAction,
    now: i64,
) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Two)?;
    let def = catalog
        .institutions
        .get(id)
        .ok_or_else(|| rejection::unknown("institution", id))?;
    let params = catalog
        .institution_actions
        .get(&action)
        .ok_or(Rejection::NotAvailable {
            reason: "action has no parameters",
        })?;
    let institution = state
        .institutions
        .get(id)
        .ok_or_else(|| rejection::unknown("institution", id))?;

    if institution.status.is_in_progress() {
        return Err(Rejection::Busy {
            what: "institution action",
        });
    }
    if action.in_progress_status().is_some() && institution.status != InstitutionStatus::Independent
    {
        return Err(Rejection::WrongStatus {
            reason: "timed actions need an independent institution",
        });
    }
    if params.requires_captured && institution.status != InstitutionStatus::Captured {
        return Err(Rejection::WrongStatus {
            reason: "institution must be captured",
        });
    }
    rejection::require_funds(state.cash, params.cost_cash, "cash")?;
    rejection::require_funds(state.loyalty, params.cost_loyalty, "loyalty")?;

    let output = def.greatness_output;
    state.cash -= params.cost_cash;
    state.loyalty -= params.cost_loyalty;
    state.legitimacy = clamp_percent(state.legitimacy + params.legitimacy_impact);

    let reduction = params.resistance_reduction;
    let Some(institution) = state.institutions.get_mut(id) else {
        return Err(rejection::unknown("institution", id));
    };
    if let Some(status) = action.in_progress_status() {
        institution.status = status;
        institution.progress = 0.0;
        institution.action_started_at = Some(now);
    } else {
        match action {
            InstitutionAction::LoyaltyTest => {
                institution.resistance = (institution.resistance - reduction).max(0.0);
                state.loyalty += LOYALTY_TEST_REFUND;
            }
            InstitutionAction::Rebrand => institution.rebranded = true,
            InstitutionAction::Automate => institution.status = InstitutionStatus::Automated,
            InstitutionAction::Privatize => {
                institution.status = InstitutionStatus::Independent;
                institution.resistance = PRIVATIZED_RESISTANCE;
                institution.progress = 0.0;
                institution.rebranded = false;
                state.cash += output * PRIVATIZE_PAYOUT;
            }
            InstitutionAction::CoOpt | InstitutionAction::Replace | InstitutionAction::Purge => {}
        }
    }

    debug!(institution = id, action = ?action, "Institution action started");
    Ok(())
}

/// Advance running actions, loyalty generation, and the control count.
pub fn update(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers, now: i64, dt: f64) {
    let speed = modifiers.institution_speed;

    for (id, institution) in &mut state.institutions {
        let Some(action) = running_action(institution.status) else {
            continue;
        };
        let Some(params) = catalog.institution_actions.get(&action) else {
            continue;
        };
        let elapsed = elapsed_secs(now, institution.action_started_at.unwrap_or(now));
        let progress = if params.duration_secs > 0.0 {
            (elapsed * speed / params.duration_secs * 100.0).min(100.0)
        } else {
            100.0
        };
        institution.progress = progress;
        if progress < 100.0 {
            continue;
        }

        institution.resistance = (institution.resistance - params.resistance_reduction).max(0.0);
        institution.action_started_at = None;
        if institution.resistance <= 0.0 {
            institution.status = InstitutionStatus::Captured;
            institution.progress = 100.0;
            info!(institution = %id, action = ?action, "Institution captured");
        } else {
            institution.status = InstitutionStatus::Independent;
            institution.progress = 0.0;
            debug!(
                institution = %id,
                resistance = institution.resistance,
                "Institution action completed, resistance remains"
            );
        }
    }

    let loyalty: f64 = state
        .institutions
        .iter()
        .filter(|(_, institution)| institution.status.is_controlled())
        .filter_map(|(id, _)| catalog.institutions.get(id))
        .map(|def| def.loyalty_generation)
        .sum();
    state.loyalty += loyalty * dt;
    state.control = count_f64(state.controlled_institutions());
}

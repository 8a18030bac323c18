//! Why a player action was refused.
//!
//! Every operation validates all of its preconditions before touching
//! state, so a refused action leaves the aggregate exactly as it was.
//! The public [`Simulation`](crate::simulation::Simulation) surface folds
//! these into a plain success flag; the reason is logged at `debug`.

use greatness_types::Phase;

/// A refused player action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// The referenced id is not in the content tables or the state.
    #[error("unknown {kind}: {id}")]
    UnknownId {
        /// Kind of record looked up.
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// The action belongs to a later phase.
    #[error("requires phase {required}")]
    PhaseLocked {
        /// Earliest phase that allows the action.
        required: Phase,
    },

    /// A cost cannot be paid.
    #[error("insufficient {resource}")]
    InsufficientFunds {
        /// Resource that fell short.
        resource: &'static str,
    },

    /// The target is in a status that does not allow the action.
    #[error("wrong status: {reason}")]
    WrongStatus {
        /// What the status check expected.
        reason: &'static str,
    },

    /// A count limit has been reached.
    #[error("at capacity: {what}")]
    AtCapacity {
        /// What is full.
        what: &'static str,
    },

    /// Something that must exist first does not.
    #[error("missing prerequisite: {prerequisite}")]
    PrerequisiteMissing {
        /// The missing prerequisite.
        prerequisite: String,
    },

    /// The target already has an action running.
    #[error("busy: {what}")]
    Busy {
        /// What is occupied.
        what: &'static str,
    },

    /// The action is not offered for this target.
    #[error("not available: {reason}")]
    NotAvailable {
        /// Why the action is not offered.
        reason: &'static str,
    },
}

/// Result of a validated player action.
pub type ActionResult = Result<(), Rejection>;

/// Refuse unless the run has reached `required`.
pub(crate) const fn require_phase(current: Phase, required: Phase) -> ActionResult {
    if current.number() < required.number() {
        return Err(Rejection::PhaseLocked { required });
    }
    Ok(())
}

/// Refuse unless `available` covers `cost`.
pub(crate) fn require_funds(available: f64, cost: f64, resource: &'static str) -> ActionResult {
    if available < cost {
        return Err(Rejection::InsufficientFunds { resource });
    }
    Ok(())
}

/// Refuse unless the prerequisite, if any, is satisfied.
pub(crate) fn require_prerequisite<T: ToString>(
    prerequisite: Option<&T>,
    satisfied: impl FnOnce(&T) -> bool,
) -> ActionResult {
    match prerequisite {
        Some(required) if !satisfied(required) => Err(Rejection::PrerequisiteMissing {
            prerequisite: required.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Lookup failure for `id` in a table of `kind`.
pub(crate) fn unknown(kind: &'static str, id: &str) -> Rejection {
    Rejection::UnknownId {
        kind,
        id: id.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_gate_compares_numbers() {
        assert!(require_phase(Phase::Three, Phase::Two).is_ok());
        assert_eq!(
            require_phase(Phase::One, Phase::Four),
            Err(Rejection::PhaseLocked {
                required: Phase::Four
            })
        );
    }

    #[test]
    fn funds_check_allows_exact_amount() {
        assert!(require_funds(100.0, 100.0, "cash").is_ok());
        assert!(require_funds(99.9, 100.0, "cash").is_err());
    }

    #[test]
    fn prerequisite_check_reports_missing_id() {
        let required = String::from("moon_base");
        let result = require_prerequisite(Some(&required), |_| false);
        assert_eq!(
            result,
            Err(Rejection::PrerequisiteMissing {
                prerequisite: "moon_base".to_owned()
            })
        );
        assert!(require_prerequisite::<String>(None, |_| false).is_ok());
    }
}

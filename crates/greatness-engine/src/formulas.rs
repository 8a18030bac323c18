//! Pure production and economy formulas.
//!
//! Nothing here mutates state. The tick and the offline calculator both
//! derive the production rate from [`production_rate`], so a run that is
//! simulated tick by tick and one that is credited in bulk agree on the
//! rate.

use greatness_content::{Catalog, UpgradeDef, UpgradeEffect};
use greatness_types::{
    BudgetAllocation, ContradictionKey, CountryStatus, GameState, InstitutionStatus, Phase,
};

use crate::modifiers::Modifiers;

/// Production multiplier per phase, indexed by phase number minus one.
pub const PHASE_MULTIPLIERS: [f64; 5] = [1.0, 10.0, 100.0, 10_000.0, 1_000_000.0];

/// Growth factor of repeatable upgrade prices.
pub const COST_GROWTH: f64 = 1.15;

/// Production bonus per prestige level.
pub const PRESTIGE_LEVEL_BONUS: f64 = 0.1;

/// Budget lines below this percentage count as defunded.
pub const DEFUNDED_THRESHOLD: f64 = 10.0;

/// Price of the first shipyard upgrade.
pub const SHIPYARD_BASE_COST: f64 = 100_000.0;

/// Growth factor of shipyard upgrade prices.
pub const SHIPYARD_COST_GROWTH: f64 = 3.0;

/// Production multiplier of the current phase.
pub const fn phase_multiplier(phase: Phase) -> f64 {
    match phase {
        Phase::One => PHASE_MULTIPLIERS[0],
        Phase::Two => PHASE_MULTIPLIERS[1],
        Phase::Three => PHASE_MULTIPLIERS[2],
        Phase::Four => PHASE_MULTIPLIERS[3],
        Phase::Five => PHASE_MULTIPLIERS[4],
    }
}

/// Production multiplier for a legitimacy value.
pub fn legitimacy_multiplier(legitimacy: f64) -> f64 {
    if legitimacy > 80.0 {
        1.2
    } else if legitimacy >= 50.0 {
        1.0
    } else if legitimacy >= 25.0 {
        0.7
    } else {
        0.4
    }
}

/// Unmultiplied greatness per second from every producing source.
pub fn base_production(state: &GameState, catalog: &Catalog) -> f64 {
    let mut base = 0.0;

    for (id, owned) in &state.upgrades {
        if let Some(def) = catalog.upgrades.get(id) {
            base += f64::from(owned.count) * def.production;
        }
    }

    for (id, institution) in &state.institutions {
        if !institution.status.is_controlled() {
            continue;
        }
        if let Some(def) = catalog.institutions.get(id) {
            let automation = if institution.status == InstitutionStatus::Automated {
                1.5
            } else {
                1.0
            };
            base += def.greatness_output * automation;
        }
    }

    for (id, country) in &state.countries {
        if country.status == CountryStatus::Annexed {
            if let Some(def) = catalog.countries.get(id) {
                base += def.greatness_potential;
            }
        }
    }

    if state.phase >= Phase::Four {
        base += state.orbital_industry * 10.0
            + state.colonists * 5.0
            + f64::from(state.space.propaganda_satellites) * 50.0;
        base += state
            .space
            .mars_upgrades
            .iter()
            .filter_map(|id| catalog.mars_upgrades.get(id))
            .map(|def| def.greatness_per_second)
            .sum::<f64>();
    }

    if state.phase >= Phase::Five {
        base += state.computronium * 20.0
            + state.greatness_units * 0.1
            + state.probes_launched * 0.5
            + state.stars_converted * 50.0;
    }

    base
}

/// Product of the rate multipliers of owned upgrades.
///
/// Each owned upgrade contributes its factor once, however many copies
/// have been bought.
pub fn upgrade_rate_multiplier(state: &GameState, catalog: &Catalog) -> f64 {
    let mut multiplier = 1.0;
    for (id, owned) in &state.upgrades {
        if !owned.purchased || owned.count == 0 {
            continue;
        }
        let Some(def) = catalog.upgrades.get(id) else {
            continue;
        };
        for effect in &def.effects {
            if let UpgradeEffect::RateMultiplier { value } = effect {
                multiplier *= *value;
            }
        }
    }
    multiplier
}

/// Greatness per second for the current state.
pub fn production_rate(state: &GameState, catalog: &Catalog, modifiers: &Modifiers) -> f64 {
    base_production(state, catalog)
        * upgrade_rate_multiplier(state, catalog)
        * legitimacy_multiplier(state.legitimacy)
        * phase_multiplier(state.phase)
        * (1.0 + PRESTIGE_LEVEL_BONUS * f64::from(state.prestige_level))
        * modifiers.rate_multiplier
}

/// Price of the next unit of an upgrade owned `count` times.
///
/// Each research discount is applied in turn and floored.
pub fn upgrade_cost(def: &UpgradeDef, count: u32, modifiers: &Modifiers) -> f64 {
    let mut cost = (def.base_cost * COST_GROWTH.powi(saturating_i32(count))).floor();
    for discount in &modifiers.research_discounts {
        cost = (cost * (1.0 - discount)).floor();
    }
    cost
}

/// Cash multiplier from how much the public still believes.
pub fn credibility_effect(state: &GameState) -> f64 {
    let credibility = state
        .contradictions
        .get(&ContradictionKey::AttentionCredibility)
        .map_or(100.0, |meter| meter.side_b);
    if credibility < 30.0 {
        0.3
    } else if credibility < 50.0 {
        0.7
    } else {
        1.0
    }
}

/// Cash per second from owned upgrades and tariffs.
pub fn cash_per_second(state: &GameState, catalog: &Catalog) -> f64 {
    let mut from_upgrades = 0.0;
    for (id, owned) in &state.upgrades {
        let Some(def) = catalog.upgrades.get(id) else {
            continue;
        };
        for effect in &def.effects {
            if let UpgradeEffect::CashPerSecond { value } = effect {
                from_upgrades += value * f64::from(owned.count);
            }
        }
    }

    let infrastructure = if state.phase >= Phase::Two {
        1.0 + BudgetEffects::from_budget(&state.budget).infrastructure
    } else {
        1.0
    };

    let tariffs: f64 = state
        .tariffs
        .iter()
        .filter_map(|(id, level)| {
            let def = catalog.tariffs.get(id)?;
            def.cash_per_minute.get(usize::from(*level)).copied()
        })
        .sum();

    from_upgrades * infrastructure * credibility_effect(state) + tariffs / 60.0
}

/// Legitimacy lost per second before recovery.
pub fn legitimacy_decay(state: &GameState, modifiers: &Modifiers) -> f64 {
    let controlled = count_f64(state.controlled_institutions());
    let wars = count_f64(state.active_wars());
    let budget = &state.budget;
    let defunded = [
        budget.healthcare,
        budget.education,
        budget.social_benefits,
    ]
    .iter()
    .filter(|line| **line < DEFUNDED_THRESHOLD)
    .count();

    let decay = 0.001
        + controlled * 0.0002
        + wars * 0.005
        + state.reality_drift * 0.000_01
        + count_f64(defunded) * 0.003;
    decay * modifiers.legitimacy_decay
}

/// Per-line effect of the budget allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetEffects {
    /// Legitimacy per second from healthcare.
    pub healthcare: f64,
    /// Drift suppression from education, before the drift scale.
    pub education: f64,
    /// Legitimacy per second from social benefits.
    pub social_benefits: f64,
    /// War output per second from the military.
    pub military: f64,
    /// Attention and surveillance reach of data centers. Display only.
    pub data_centers: f64,
    /// Fractional cash bonus from infrastructure.
    pub infrastructure: f64,
    /// Legitimacy per second from propaganda.
    pub propaganda: f64,
    /// Fractional space build speed bonus.
    pub space_program: f64,
}

impl BudgetEffects {
    /// Effects of an allocation.
    pub const fn from_budget(budget: &BudgetAllocation) -> Self {
        Self {
            healthcare: budget.healthcare * 0.003,
            education: budget.education * 0.001,
            social_benefits: budget.social_benefits * 0.002,
            military: budget.military * 0.01,
            data_centers: budget.data_centers * 0.005,
            infrastructure: budget.infrastructure * 0.003,
            propaganda: budget.propaganda_bureau * 0.004,
            space_program: budget.space_program * 0.002,
        }
    }

    /// Total legitimacy regained per second.
    pub const fn legitimacy_recovery(&self) -> f64 {
        self.healthcare + self.social_benefits + self.propaganda
    }

    /// Drift removed per second.
    pub const fn drift_reduction(&self) -> f64 {
        self.education * 0.1
    }
}

/// Legitimacy lost per second to fear, from phase 3 on.
pub fn fear_drain(state: &GameState) -> f64 {
    if state.phase >= Phase::Three {
        state.fear * 0.005
    } else {
        0.0
    }
}

/// Price of the next shipyard level.
pub fn shipyard_upgrade_cost(level: u32) -> f64 {
    (SHIPYARD_BASE_COST * SHIPYARD_COST_GROWTH.powi(saturating_i32(level))).floor()
}

/// Prestige points earned for a run that reached `greatness_units`.
pub fn prestige_reward(greatness_units: f64) -> u64 {
    whole(greatness_units.max(1.0).log10())
}

/// Clamp a percentage-like value into `[0, 100]`.
pub const fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Whole units in a non-negative quantity; anything else is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn whole(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Seconds from `since` to `now`, never negative.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn elapsed_secs(now: i64, since: i64) -> f64 {
    now.saturating_sub(since).max(0) as f64 / 1000.0
}

/// Whole milliseconds in a span of seconds, saturating at the `i64` range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn secs_to_millis(secs: f64) -> i64 {
    (secs * 1000.0).round() as i64
}

/// A count as a float operand.
pub(crate) fn count_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

//! Clicking, upgrades, budget, tariffs, and per-tick resource integration.

use greatness_content::{Catalog, TariffDef, UpgradeEffect};
use greatness_types::{
    BudgetPatch, CostResource, GameState, LegitimacyStatus, Phase, TariffId, UpgradeId,
};
use tracing::{debug, warn};

use crate::formulas::{self, BudgetEffects};
use crate::modifiers::Modifiers;
use crate::rejection::{self, ActionResult, Rejection};

/// Share of each click's attention credited as greatness.
pub const CLICK_GREATNESS_SHARE: f64 = 0.1;

/// Register one click.
pub fn click(state: &mut GameState) {
    let gain = state.attention_per_click;
    state.attention += gain;
    state.click_count = state.click_count.saturating_add(1);
    state.greatness += gain * CLICK_GREATNESS_SHARE;
}

/// Buy one unit of an upgrade.
pub fn purchase_upgrade(
    state: &mut GameState,
    catalog: &Catalog,
    modifiers: &Modifiers,
    id: &str,
) -> ActionResult {
    let def = catalog
        .upgrades
        .get(id)
        .ok_or_else(|| rejection::unknown("upgrade", id))?;
    rejection::require_phase(state.phase, def.phase)?;

    let count = state.upgrades.get(id).map_or(0, |owned| owned.count);
    if count >= def.max_count {
        return Err(Rejection::AtCapacity { what: "upgrade" });
    }
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        state.has_upgrade(required.as_str())
    })?;

    let cost = formulas::upgrade_cost(def, count, modifiers);
    let (balance, resource) = match def.cost_resource {
        CostResource::Attention => (&mut state.attention, "attention"),
        CostResource::Cash => (&mut state.cash, "cash"),
        CostResource::Greatness => (&mut state.greatness, "greatness"),
    };
    rejection::require_funds(*balance, cost, resource)?;
    *balance -= cost;

    let owned = state.upgrades.entry(UpgradeId::from(id)).or_default();
    owned.count = owned.count.saturating_add(1);
    owned.purchased = true;
    owned.unlocked = true;

    for effect in &def.effects {
        if let UpgradeEffect::AttentionPerClick { value } = effect {
            state.attention_per_click += value;
        }
    }
    debug!(upgrade = id, count = count.saturating_add(1), cost, "Upgrade purchased");
    Ok(())
}

/// Apply a partial budget update, clamping every line to `[0, 100]`.
pub fn set_budget(state: &mut GameState, patch: &BudgetPatch) {
    let budget = &mut state.budget;
    let lines = [
        (&mut budget.healthcare, patch.healthcare),
        (&mut budget.education, patch.education),
        (&mut budget.social_benefits, patch.social_benefits),
        (&mut budget.military, patch.military),
        (&mut budget.data_centers, patch.data_centers),
        (&mut budget.infrastructure, patch.infrastructure),
        (&mut budget.propaganda_bureau, patch.propaganda_bureau),
        (&mut budget.space_program, patch.space_program),
    ];
    for (line, update) in lines {
        if let Some(value) = update {
            *line = formulas::clamp_percent(value);
        }
    }
}

/// Set a tariff line to a level between 0 and 3.
pub fn set_tariff(state: &mut GameState, catalog: &Catalog, id: &str, level: u8) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Two)?;
    if !catalog.tariffs.contains_key(id) {
        return Err(rejection::unknown("tariff", id));
    }
    if level > TariffDef::MAX_LEVEL {
        return Err(Rejection::NotAvailable {
            reason: "tariff level above 3",
        });
    }
    state.tariffs.insert(TariffId::from(id), level);
    debug!(tariff = id, level, "Tariff set");
    Ok(())
}

/// Credit one tick of production, cash, and play time.
pub fn integrate(state: &mut GameState, catalog: &Catalog, rate: f64, dt: f64) {
    let cash_rate = formulas::cash_per_second(state, catalog);
    state.greatness += rate * dt;
    state.greatness_per_second = rate;
    state.cash += cash_rate * dt;
    state.total_play_time += dt;
}

/// Minimum legitimacy from prestige and narrative research.
pub fn legitimacy_floor(state: &GameState, catalog: &Catalog, modifiers: &Modifiers) -> f64 {
    state
        .universe
        .narrative_research
        .iter()
        .filter_map(|id| catalog.narrative_research.get(id))
        .filter_map(|def| def.legitimacy_floor)
        .fold(modifiers.legitimacy_floor, f64::max)
}

/// Legitimacy per second contributed by tariff lines (never positive).
pub fn tariff_legitimacy(state: &GameState, catalog: &Catalog) -> f64 {
    state
        .tariffs
        .iter()
        .filter_map(|(id, level)| {
            let def = catalog.tariffs.get(id)?;
            def.legitimacy_per_second.get(usize::from(*level)).copied()
        })
        .sum()
}

/// Advance legitimacy by one tick. No-op before phase 2.
pub fn update_legitimacy(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers, dt: f64) {
    if state.phase < Phase::Two {
        return;
    }
    let recovery = BudgetEffects::from_budget(&state.budget).legitimacy_recovery();
    let decay = formulas::legitimacy_decay(state, modifiers);
    let drain = formulas::fear_drain(state);
    let tariffs = tariff_legitimacy(state, catalog);
    let floor = legitimacy_floor(state, catalog, modifiers).min(100.0);

    let before = state.legitimacy;
    let after = (before + (recovery - decay - drain + tariffs) * dt).clamp(floor, 100.0);
    state.legitimacy = after;

    if LegitimacyStatus::from_value(before) != LegitimacyStatus::Collapse
        && LegitimacyStatus::from_value(after) == LegitimacyStatus::Collapse
    {
        warn!(legitimacy = after, "Legitimacy collapsed");
    }
}

/// Flag upgrades whose unlock condition currently holds.
pub fn mark_unlocks(state: &mut GameState, catalog: &Catalog) {
    for (id, def) in &catalog.upgrades {
        let Some(condition) = &def.unlock_at else {
            continue;
        };
        if state.upgrades.get(id).is_some_and(|owned| owned.unlocked) {
            continue;
        }
        if state
            .resource(condition.resource)
            .is_some_and(|value| value >= condition.threshold)
        {
            state.upgrades.entry(id.clone()).or_default().unlocked = true;
        }
    }
}

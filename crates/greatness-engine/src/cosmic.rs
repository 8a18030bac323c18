//! Cosmic conversion (phase 5).
//!
//! Probes spread and replicate, reach stars, and star branding converts
//! the reached stars into computronium. Greatness units are produced from
//! computronium and the owned megastructures, then depreciated by how many
//! units already exist:
//!
//! ```text
//! depreciation = 1 / (1 + log10(max(1, units) / 1000))
//! ```
//!
//! The factor scales the production rate, not the stock. Converting every
//! reachable star raises the ending flag.

use greatness_content::Catalog;
use greatness_types::{GameState, Phase, TierId};
use tracing::{debug, info};

use crate::formulas::clamp_percent;
use crate::modifiers::Modifiers;
use crate::rejection::{self, ActionResult, Rejection};

/// Stars within reach of the probe network.
pub const TOTAL_REACHABLE_STARS: f64 = 1_000.0;

/// Computronium gained per converted star.
pub const COMPUTRONIUM_PER_STAR: f64 = 100.0;

/// Greatness units per second per unit of computronium.
pub const UNITS_PER_COMPUTRONIUM: f64 = 0.1;

/// Self-replication per probe per second before upgrades.
pub const PROBE_REPLICATION_BASE: f64 = 0.001;

/// Share of probes in flight that have found a convertible star.
pub const STAR_DISCOVERY_SHARE: f64 = 0.1;

/// Drift per star converted in a tick.
pub const STAR_DRIFT_PER_CONVERSION: f64 = 0.1;

/// Drift per second per probe in flight.
pub const PROBE_DRIFT: f64 = 0.000_01;

/// Fraction of greatness units lost per second once the ending is complete.
pub const POST_ENDING_DECAY: f64 = 0.005;

/// Purchase a probe upgrade.
pub fn purchase_probe_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Five)?;
    let def = catalog
        .probe_upgrades
        .get(id)
        .ok_or_else(|| rejection::unknown("probe upgrade", id))?;
    let owned = &state.universe.probe_upgrades;
    require_new(owned.contains(id), "probe upgrade")?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        owned.contains(required)
    })?;
    rejection::require_funds(state.cash, def.cost, "cash")?;
    rejection::require_funds(state.computronium, def.computronium_cost, "computronium")?;

    state.cash -= def.cost;
    state.computronium -= def.computronium_cost;
    state.universe.probe_upgrades.insert(TierId::from(id));
    debug!(upgrade = id, "Probe upgrade purchased");
    Ok(())
}

/// Purchase a dyson tier. Each tier adds one swarm structure.
pub fn purchase_dyson_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Five)?;
    let def = catalog
        .dyson_tiers
        .get(id)
        .ok_or_else(|| rejection::unknown("dyson tier", id))?;
    let owned = &state.universe.dyson_upgrades;
    require_new(owned.contains(id), "dyson tier")?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        owned.contains(required)
    })?;
    rejection::require_funds(state.cash, def.cost, "cash")?;
    rejection::require_funds(
        state.orbital_industry,
        def.orbital_industry_cost,
        "orbital industry",
    )?;
    rejection::require_funds(state.computronium, def.computronium_cost, "computronium")?;

    state.cash -= def.cost;
    state.orbital_industry -= def.orbital_industry_cost;
    state.computronium -= def.computronium_cost;
    state.space.dyson_swarms = state.space.dyson_swarms.saturating_add(1);
    state.universe.dyson_upgrades.insert(TierId::from(id));
    info!(tier = id, swarms = state.space.dyson_swarms, "Dyson tier built");
    Ok(())
}

/// Purchase a star branding tier.
pub fn purchase_star_branding(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Five)?;
    let def = catalog
        .star_branding
        .get(id)
        .ok_or_else(|| rejection::unknown("star branding", id))?;
    let owned = &state.universe.star_branding;
    require_new(owned.contains(id), "star branding")?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        owned.contains(required)
    })?;
    rejection::require_funds(state.cash, def.cost, "cash")?;
    rejection::require_funds(state.computronium, def.computronium_cost, "computronium")?;

    state.cash -= def.cost;
    state.computronium -= def.computronium_cost;
    state.universe.star_branding.insert(TierId::from(id));
    debug!(tier = id, "Star branding purchased");
    Ok(())
}

/// Purchase a black hole project.
pub fn purchase_black_hole(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Five)?;
    let def = catalog
        .black_holes
        .get(id)
        .ok_or_else(|| rejection::unknown("black hole", id))?;
    let owned = &state.universe.black_holes;
    require_new(owned.contains(id), "black hole")?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        owned.contains(required)
    })?;
    rejection::require_funds(state.cash, def.cost, "cash")?;
    rejection::require_funds(state.computronium, def.computronium_cost, "computronium")?;

    state.cash -= def.cost;
    state.computronium -= def.computronium_cost;
    state.universe.black_holes.insert(TierId::from(id));
    debug!(project = id, "Black hole project purchased");
    Ok(())
}

/// Complete a narrative research project, paid in greatness units.
pub fn purchase_narrative_research(
    state: &mut GameState,
    catalog: &Catalog,
    id: &str,
) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Five)?;
    let def = catalog
        .narrative_research
        .get(id)
        .ok_or_else(|| rejection::unknown("narrative research", id))?;
    let owned = &state.universe.narrative_research;
    require_new(owned.contains(id), "narrative research")?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        owned.contains(required)
    })?;
    rejection::require_funds(state.greatness_units, def.cost_units, "greatness units")?;

    state.greatness_units -= def.cost_units;
    state.universe.narrative_research.insert(TierId::from(id));
    info!(research = id, "Narrative research completed");
    Ok(())
}

/// Mark the ending as played out once it has been triggered.
pub fn complete_ending(state: &mut GameState) -> ActionResult {
    if !state.universe.ending_triggered {
        return Err(Rejection::WrongStatus {
            reason: "ending not triggered",
        });
    }
    state.universe.ending_complete = true;
    info!("Ending complete");
    Ok(())
}

const fn require_new(owned: bool, what: &'static str) -> ActionResult {
    if owned {
        return Err(Rejection::AtCapacity { what });
    }
    Ok(())
}

/// Depreciation factor of greatness unit production at `units` held.
///
/// Falls back to 1 when the expression is not finite.
pub fn depreciation(units: f64) -> f64 {
    let factor = 1.0 / (1.0 + (units.max(1.0) / 1_000.0).log10());
    if factor.is_finite() { factor } else { 1.0 }
}

/// Advance probes, conversion, and greatness units by `dt` seconds.
pub fn update(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers, dt: f64) {
    let universe = &state.universe;

    let probes: Vec<_> = universe
        .probe_upgrades
        .iter()
        .filter_map(|id| catalog.probe_upgrades.get(id))
        .collect();
    let production: f64 = probes.iter().map(|def| def.probe_production).sum();
    let replication =
        PROBE_REPLICATION_BASE + probes.iter().map(|def| def.replication_rate).sum::<f64>();
    let conversion_multiplier: f64 = probes
        .iter()
        .filter_map(|def| def.conversion_multiplier)
        .product();

    let conversion_rate: f64 = universe
        .star_branding
        .iter()
        .filter_map(|id| catalog.star_branding.get(id))
        .map(|def| def.conversion_rate)
        .sum::<f64>()
        * conversion_multiplier;

    let black_holes: Vec<_> = universe
        .black_holes
        .iter()
        .filter_map(|id| catalog.black_holes.get(id))
        .collect();
    let narrative: Vec<_> = universe
        .narrative_research
        .iter()
        .filter_map(|id| catalog.narrative_research.get(id))
        .collect();
    let dyson_units: f64 = universe
        .dyson_upgrades
        .iter()
        .filter_map(|id| catalog.dyson_tiers.get(id))
        .map(|def| def.units_per_second)
        .sum();

    let previous_probes = state.probes_launched;
    let probes_now = previous_probes + (production + previous_probes * replication) * dt;

    let available = (probes_now * STAR_DISCOVERY_SHARE).floor();
    let convertible = (available.min(TOTAL_REACHABLE_STARS) - state.stars_converted).max(0.0);
    let converted = convertible.min(conversion_rate * dt);
    let computronium = state.computronium + converted * COMPUTRONIUM_PER_STAR;

    let unit_production = computronium * UNITS_PER_COMPUTRONIUM
        + dyson_units
        + black_holes.iter().map(|def| def.units_per_second).sum::<f64>()
        + narrative.iter().map(|def| def.production_bonus).sum::<f64>();
    let unit_multiplier: f64 = narrative
        .iter()
        .filter_map(|def| def.units_multiplier)
        .product();
    let decay = if universe.ending_complete {
        state.greatness_units * POST_ENDING_DECAY * dt
    } else {
        0.0
    };
    let gained = unit_production * unit_multiplier * depreciation(state.greatness_units) * dt;

    let legitimacy: f64 = black_holes.iter().map(|def| def.legitimacy_per_second).sum();
    let drift_reduction = narrative.iter().map(|def| def.drift_reduction).sum::<f64>()
        + black_holes.iter().map(|def| def.drift_reduction).sum::<f64>();
    let drift = (converted * STAR_DRIFT_PER_CONVERSION + previous_probes * PROBE_DRIFT
        - drift_reduction)
        * dt;

    state.probes_launched = probes_now;
    state.stars_converted += converted;
    state.computronium = computronium;
    state.greatness_units = (state.greatness_units + gained - decay).max(0.0);
    state.legitimacy = clamp_percent(state.legitimacy + legitimacy * dt);
    crate::drift::apply(state, drift, modifiers);

    let percent = (state.stars_converted / TOTAL_REACHABLE_STARS * 100.0).min(100.0);
    state.universe.universe_converted = percent;
    if percent >= 100.0 && !state.universe.ending_triggered {
        state.universe.ending_triggered = true;
        info!(
            stars = state.stars_converted,
            "Every reachable star converted, ending triggered"
        );
    }
}

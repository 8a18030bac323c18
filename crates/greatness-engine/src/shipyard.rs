//! Shipyard build queue (phase 3).
//!
//! One order at a time. Ships are delivered at a fixed interval that
//! shrinks with the shipyard level; the order remembers the end of the
//! last consumed interval so partial intervals carry over between ticks.

use greatness_content::Catalog;
use greatness_types::{GameState, Phase, ShipClassId, ShipyardOrder};
use tracing::{debug, info};

use crate::formulas::{self, elapsed_secs, whole};
use crate::rejection::{self, ActionResult, Rejection};

/// Seconds per ship at shipyard level 1.
pub const BASE_BUILD_INTERVAL_SECS: f64 = 10.0;

/// Share of the fleet's fear applied as a floor once an order completes.
pub const FLEET_FEAR_SHARE: f64 = 0.1;

/// Queue an order of `quantity` ships at time `now`.
pub fn build_ship(
    state: &mut GameState,
    catalog: &Catalog,
    id: &str,
    quantity: u32,
    now: i64,
) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Three)?;
    let def = catalog
        .ships
        .get(id)
        .ok_or_else(|| rejection::unknown("ship class", id))?;
    if quantity == 0 {
        return Err(Rejection::NotAvailable {
            reason: "order must contain at least one ship",
        });
    }
    if state.shipyard_level < def.shipyard_level {
        return Err(Rejection::WrongStatus {
            reason: "shipyard level too low",
        });
    }
    if state.shipyard_queue.is_some() {
        return Err(Rejection::Busy { what: "shipyard" });
    }
    let cost = def.cost * f64::from(quantity);
    rejection::require_funds(state.cash, cost, "cash")?;

    state.cash -= cost;
    state.shipyard_queue = Some(ShipyardOrder {
        ship: ShipClassId::from(id),
        quantity,
        built_so_far: 0,
        last_build_at: now,
    });
    debug!(ship = id, quantity, cost, "Ship order queued");
    Ok(())
}

/// Raise the shipyard one level.
pub fn upgrade_shipyard(state: &mut GameState) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Three)?;
    let cost = formulas::shipyard_upgrade_cost(state.shipyard_level);
    rejection::require_funds(state.cash, cost, "cash")?;
    state.cash -= cost;
    state.shipyard_level = state.shipyard_level.saturating_add(1);
    info!(level = state.shipyard_level, cost, "Shipyard upgraded");
    Ok(())
}

/// Deliver every ship whose build interval has elapsed by `now`.
pub fn update(state: &mut GameState, catalog: &Catalog, now: i64) {
    if state.shipyard_level == 0 {
        return;
    }
    let Some(order) = state.shipyard_queue.as_mut() else {
        return;
    };

    let interval = BASE_BUILD_INTERVAL_SECS / f64::from(state.shipyard_level);
    let due = whole(elapsed_secs(now, order.last_build_at) / interval);
    let built = u32::try_from(due)
        .unwrap_or(u32::MAX)
        .min(order.remaining());
    if built == 0 {
        return;
    }

    let owned = state.fleet.entry(order.ship.clone()).or_insert(0);
    *owned = owned.saturating_add(built);
    order.built_so_far = order.built_so_far.saturating_add(built);
    let ship = order.ship.clone();
    let complete = order.remaining() == 0;
    if complete {
        state.shipyard_queue = None;
    } else {
        let advance = formulas::secs_to_millis(interval * f64::from(built));
        order.last_build_at = order.last_build_at.saturating_add(advance);
    }

    let (war_output, fear) = fleet_totals(state, catalog);
    state.war_output = war_output;
    if complete {
        state.fear = state.fear.max(fear * FLEET_FEAR_SHARE);
        info!(ship = %ship, "Ship order complete");
    } else {
        debug!(ship = %ship, built, "Ships delivered");
    }
}

/// Aggregate war output and fear of the whole fleet.
pub fn fleet_totals(state: &GameState, catalog: &Catalog) -> (f64, f64) {
    state
        .fleet
        .iter()
        .filter_map(|(id, count)| catalog.ships.get(id).map(|def| (def, f64::from(*count))))
        .fold((0.0, 0.0), |(war, fear), (def, count)| {
            (war + def.war_output * count, fear + def.fear * count)
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_content::default_catalog;

    use super::*;

    fn phase_three() -> GameState {
        let mut state = GameState::new(0);
        state.phase = Phase::Three;
        state.shipyard_level = 1;
        state.cash = 1_000_000.0;
        state
    }

    #[test]
    fn order_delivers_at_fixed_interval() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_three();
        assert!(build_ship(&mut state, &catalog, "patrol_boat", 3, 0).is_ok());
        assert!((state.cash - 970_000.0).abs() < f64::EPSILON);

        update(&mut state, &catalog, 15_000);
        assert_eq!(state.fleet.get("patrol_boat"), Some(&1));
        let order = state.shipyard_queue.clone().unwrap();
        assert_eq!(order.built_so_far, 1);
        assert_eq!(order.last_build_at, 10_000);

        update(&mut state, &catalog, 60_000);
        assert_eq!(state.fleet.get("patrol_boat"), Some(&3));
        assert!(state.shipyard_queue.is_none());
        assert!((state.war_output - 15.0).abs() < f64::EPSILON);
        assert!((state.fear - 0.6).abs() < 1e-9);
    }

    #[test]
    fn queue_and_level_guards() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_three();
        assert!(matches!(
            build_ship(&mut state, &catalog, "destroyer", 1, 0),
            Err(Rejection::WrongStatus { .. })
        ));
        assert!(build_ship(&mut state, &catalog, "patrol_boat", 0, 0).is_err());
        assert!(build_ship(&mut state, &catalog, "patrol_boat", 1, 0).is_ok());
        assert_eq!(
            build_ship(&mut state, &catalog, "patrol_boat", 1, 0),
            Err(Rejection::Busy { what: "shipyard" })
        );
    }

    #[test]
    fn upgrade_cost_triples() {
        let mut state = phase_three();
        assert!(upgrade_shipyard(&mut state).is_ok());
        assert_eq!(state.shipyard_level, 2);
        assert!((state.cash - 700_000.0).abs() < f64::EPSILON);
        state.cash = 899_999.0;
        assert!(upgrade_shipyard(&mut state).is_err());
        assert_eq!(state.shipyard_level, 2);
    }

    #[test]
    fn higher_level_builds_faster() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_three();
        state.shipyard_level = 2;
        assert!(build_ship(&mut state, &catalog, "patrol_boat", 4, 0).is_ok());
        update(&mut state, &catalog, 10_000);
        assert_eq!(state.fleet.get("patrol_boat"), Some(&2));
    }
}

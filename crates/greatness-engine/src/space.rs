//! Space industry (phase 4).
//!
//! Builds are one-shot purchases gated by launch infrastructure and a
//! prerequisite chain. The tick turns what has been built into rocket
//! mass, orbital industry, mining output, colonists and terraforming.
//! Long-term thinking upgrades feed back as a research speed factor and a
//! discount on every space build except themselves.

use greatness_content::{BridgeEffect, Catalog};
use greatness_types::{GameState, LaunchTier, Phase, TierId};
use tracing::{debug, info};

use crate::drift;
use crate::formulas::{BudgetEffects, clamp_percent};
use crate::modifiers::Modifiers;
use crate::rejection::{self, ActionResult, Rejection};

/// Terraform progress at which Mars gets its new name.
pub const MARS_RENAME_THRESHOLD: f64 = 25.0;

/// Product of the cost multipliers of owned bridge upgrades.
pub fn cost_multiplier(state: &GameState, catalog: &Catalog) -> f64 {
    bridge_product(state, catalog, |effect| match effect {
        BridgeEffect::SpaceCostMultiplier { value } => Some(value),
        BridgeEffect::SpaceResearchSpeed { .. } => None,
    })
}

/// Product of the research speed factors of owned bridge upgrades.
pub fn research_speed(state: &GameState, catalog: &Catalog) -> f64 {
    bridge_product(state, catalog, |effect| match effect {
        BridgeEffect::SpaceResearchSpeed { value } => Some(value),
        BridgeEffect::SpaceCostMultiplier { .. } => None,
    })
}

fn bridge_product(
    state: &GameState,
    catalog: &Catalog,
    pick: impl Fn(BridgeEffect) -> Option<f64>,
) -> f64 {
    state
        .space
        .bridge_upgrades
        .iter()
        .filter_map(|id| catalog.bridge_upgrades.get(id))
        .filter_map(|def| def.effect)
        .filter_map(pick)
        .product()
}

fn require_launch_capability(state: &GameState) -> ActionResult {
    if state.space.launch_tier == LaunchTier::None {
        return Err(Rejection::PrerequisiteMissing {
            prerequisite: String::from("launch infrastructure"),
        });
    }
    Ok(())
}

/// Build the next launch tier.
pub fn upgrade_launch_tier(state: &mut GameState, catalog: &Catalog) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    let next = state
        .space
        .launch_tier
        .next()
        .ok_or(Rejection::AtCapacity {
            what: "launch tier",
        })?;
    let def = catalog.launch_tiers.get(&next).ok_or(Rejection::NotAvailable {
        reason: "launch tier has no definition",
    })?;
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;

    state.cash -= cost;
    state.space.launch_tier = next;
    info!(tier = ?next, cost, "Launch tier upgraded");
    Ok(())
}

/// Build a lunar building.
pub fn build_lunar_building(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    require_launch_capability(state)?;
    let def = catalog
        .lunar_buildings
        .get(id)
        .ok_or_else(|| rejection::unknown("lunar building", id))?;
    if state.space.lunar_buildings.contains(id) {
        return Err(Rejection::AtCapacity {
            what: "lunar building",
        });
    }
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        state.space.lunar_buildings.contains(required)
    })?;
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;
    rejection::require_funds(state.rocket_mass, def.rocket_mass_cost, "rocket mass")?;

    state.cash -= cost;
    state.rocket_mass -= def.rocket_mass_cost;
    state.space.lunar_buildings.insert(TierId::from(id));
    info!(building = id, cost, "Lunar building completed");
    Ok(())
}

/// Build a Mars upgrade.
pub fn build_mars_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    require_launch_capability(state)?;
    let def = catalog
        .mars_upgrades
        .get(id)
        .ok_or_else(|| rejection::unknown("mars upgrade", id))?;
    if state.space.mars_upgrades.contains(id) {
        return Err(Rejection::AtCapacity {
            what: "mars upgrade",
        });
    }
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        state.space.mars_upgrades.contains(required)
    })?;
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;
    rejection::require_funds(state.rocket_mass, def.rocket_mass_cost, "rocket mass")?;
    rejection::require_funds(state.mining_output, def.mining_cost, "mining output")?;

    state.cash -= cost;
    state.rocket_mass -= def.rocket_mass_cost;
    state.mining_output -= def.mining_cost;
    state.space.mars_upgrades.insert(TierId::from(id));
    info!(upgrade = id, cost, "Mars upgrade completed");
    Ok(())
}

/// Build up to `count` asteroid mining units of one tier.
///
/// The order is trimmed to the tier's remaining capacity and paid for
/// the units actually built.
pub fn build_asteroid_units(
    state: &mut GameState,
    catalog: &Catalog,
    id: &str,
    count: u32,
) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    require_launch_capability(state)?;
    let def = catalog
        .asteroid_tiers
        .get(id)
        .ok_or_else(|| rejection::unknown("asteroid tier", id))?;
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        state
            .space
            .asteroid_units
            .get(required)
            .is_some_and(|units| *units > 0)
    })?;
    let current = state.space.asteroid_units.get(id).copied().unwrap_or(0);
    let buildable = count.min(def.max_count.saturating_sub(current));
    if buildable == 0 {
        return Err(Rejection::AtCapacity {
            what: "asteroid tier",
        });
    }
    let units = f64::from(buildable);
    let cost = def.cost * units * cost_multiplier(state, catalog);
    let rocket_mass = def.rocket_mass_cost * units;
    rejection::require_funds(state.cash, cost, "cash")?;
    rejection::require_funds(state.rocket_mass, rocket_mass, "rocket mass")?;

    state.cash -= cost;
    state.rocket_mass -= rocket_mass;
    state
        .space
        .asteroid_units
        .insert(TierId::from(id), current.saturating_add(buildable));
    debug!(tier = id, built = buildable, cost, "Asteroid units built");
    Ok(())
}

/// Launch one propaganda satellite.
pub fn build_satellite(state: &mut GameState, catalog: &Catalog) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    require_launch_capability(state)?;
    let def = &catalog.satellite;
    if state.space.propaganda_satellites >= def.max_count {
        return Err(Rejection::AtCapacity { what: "satellites" });
    }
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;
    rejection::require_funds(
        state.orbital_industry,
        def.orbital_industry_cost,
        "orbital industry",
    )?;

    state.cash -= cost;
    state.orbital_industry -= def.orbital_industry_cost;
    state.space.propaganda_satellites = state.space.propaganda_satellites.saturating_add(1);
    debug!(
        satellites = state.space.propaganda_satellites,
        "Propaganda satellite launched"
    );
    Ok(())
}

/// Build the first dyson swarm structure.
pub fn build_dyson_prototype(state: &mut GameState, catalog: &Catalog) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    let def = &catalog.dyson_prototype;
    if state.space.dyson_swarms > 0 {
        return Err(Rejection::AtCapacity {
            what: "dyson prototype",
        });
    }
    if state.space.launch_tier < def.required_tier {
        return Err(Rejection::WrongStatus {
            reason: "launch tier too low",
        });
    }
    rejection::require_funds(
        state.orbital_industry,
        def.required_orbital_industry,
        "orbital industry",
    )?;
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;

    state.cash -= cost;
    state.orbital_industry -= def.orbital_industry_cost;
    state.space.dyson_swarms = 1;
    info!(cost, "Dyson prototype built");
    Ok(())
}

/// Purchase an orbital weapon.
pub fn purchase_space_weapon(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    rejection::require_phase(state.phase, Phase::Four)?;
    let def = catalog
        .space_weapons
        .get(id)
        .ok_or_else(|| rejection::unknown("space weapon", id))?;
    if state.space.space_weapons.contains(id) {
        return Err(Rejection::AtCapacity {
            what: "space weapon",
        });
    }
    if state.space.launch_tier < def.required_tier {
        return Err(Rejection::WrongStatus {
            reason: "launch tier too low",
        });
    }
    let cost = def.cost * cost_multiplier(state, catalog);
    rejection::require_funds(state.cash, cost, "cash")?;

    state.cash -= cost;
    state.war_output += def.war_output;
    state.fear += def.fear;
    state.legitimacy = clamp_percent(state.legitimacy + def.legitimacy_impact);
    state.space.space_weapons.insert(TierId::from(id));
    info!(weapon = id, cost, "Space weapon deployed");
    Ok(())
}

/// Purchase a long-term thinking upgrade. Not discounted by itself.
pub fn purchase_bridge_upgrade(state: &mut GameState, catalog: &Catalog, id: &str) -> ActionResult {
    let def = catalog
        .bridge_upgrades
        .get(id)
        .ok_or_else(|| rejection::unknown("bridge upgrade", id))?;
    if state.space.bridge_upgrades.contains(id) {
        return Err(Rejection::AtCapacity {
            what: "bridge upgrade",
        });
    }
    rejection::require_prerequisite(def.prerequisite.as_ref(), |required| {
        state.space.bridge_upgrades.contains(required)
    })?;
    rejection::require_funds(state.cash, def.cost_cash, "cash")?;
    rejection::require_funds(state.loyalty, def.cost_loyalty, "loyalty")?;

    state.cash -= def.cost_cash;
    state.loyalty -= def.cost_loyalty;
    state.space.bridge_upgrades.insert(TierId::from(id));
    debug!(upgrade = id, "Bridge upgrade purchased");
    Ok(())
}

/// Advance the space industry by `dt` seconds.
pub fn update(state: &mut GameState, catalog: &Catalog, modifiers: &Modifiers, dt: f64) {
    let speed = 1.0 + BudgetEffects::from_budget(&state.budget).space_program;
    let research = research_speed(state, catalog);

    let launch_rate = catalog
        .launch_tiers
        .get(&state.space.launch_tier)
        .map_or(0.0, |def| def.rocket_mass_per_second);
    state.rocket_mass += launch_rate * speed * research * dt;

    let lunar: Vec<_> = state
        .space
        .lunar_buildings
        .iter()
        .filter_map(|id| catalog.lunar_buildings.get(id))
        .collect();
    let lunar_orbital: f64 = lunar.iter().map(|def| def.orbital_industry_per_second).sum();
    let lunar_mining: f64 = lunar.iter().map(|def| def.mining_per_second).sum();
    let lunar_legitimacy: f64 = lunar.iter().map(|def| def.legitimacy_per_second).sum();

    let asteroid_mining: f64 = state
        .space
        .asteroid_units
        .iter()
        .filter_map(|(id, units)| {
            catalog
                .asteroid_tiers
                .get(id)
                .map(|def| def.mining_per_unit * f64::from(*units))
        })
        .sum();

    let mars: Vec<_> = state
        .space
        .mars_upgrades
        .iter()
        .filter_map(|id| catalog.mars_upgrades.get(id))
        .collect();
    let colonists: f64 = mars.iter().map(|def| def.colonists_per_second).sum();
    let terraform: f64 = mars.iter().map(|def| def.terraform_per_second).sum();

    state.orbital_industry += lunar_orbital * speed * dt;
    state.mining_output += (lunar_mining + asteroid_mining) * speed * dt;
    state.colonists += colonists * speed * dt;
    state.terraform_progress = (state.terraform_progress + terraform * speed * dt).min(100.0);
    if !state.space.mars_renamed && state.terraform_progress >= MARS_RENAME_THRESHOLD {
        state.space.mars_renamed = true;
        info!(
            terraform = state.terraform_progress,
            "Mars renamed after its benefactor"
        );
    }

    let satellites = f64::from(state.space.propaganda_satellites);
    state.attention += satellites * catalog.satellite.attention_per_unit * dt;
    state.legitimacy = clamp_percent(
        state.legitimacy
            + (lunar_legitimacy + satellites * catalog.satellite.legitimacy_per_unit) * dt,
    );

    let drift = drift::net_rate(state, catalog) * dt;
    drift::apply(state, drift, modifiers);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use greatness_content::default_catalog;

    use super::*;

    fn phase_four() -> GameState {
        let mut state = GameState::new(0);
        state.phase = Phase::Four;
        state.cash = 1e9;
        state.loyalty = 1_000.0;
        state.rocket_mass = 1_000.0;
        state
    }

    #[test]
    fn launch_tiers_climb_in_order() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        assert!(upgrade_launch_tier(&mut state, &catalog).is_ok());
        assert_eq!(state.space.launch_tier, LaunchTier::Launchpad);
        assert!((state.cash - (1e9 - 500_000.0)).abs() < 1e-3);
        for _ in 0..3 {
            assert!(upgrade_launch_tier(&mut state, &catalog).is_ok());
        }
        assert_eq!(state.space.launch_tier, LaunchTier::MassDriver);
        assert_eq!(
            upgrade_launch_tier(&mut state, &catalog),
            Err(Rejection::AtCapacity {
                what: "launch tier"
            })
        );
    }

    #[test]
    fn builds_need_launch_infrastructure_and_phase() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        assert!(matches!(
            build_lunar_building(&mut state, &catalog, "moon_base"),
            Err(Rejection::PrerequisiteMissing { .. })
        ));
        state.phase = Phase::Three;
        state.space.launch_tier = LaunchTier::Launchpad;
        assert_eq!(
            build_satellite(&mut state, &catalog),
            Err(Rejection::PhaseLocked {
                required: Phase::Four
            })
        );
    }

    #[test]
    fn lunar_chain_respects_prerequisites() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.space.launch_tier = LaunchTier::Launchpad;
        assert!(matches!(
            build_lunar_building(&mut state, &catalog, "he3_mining"),
            Err(Rejection::PrerequisiteMissing { .. })
        ));
        assert!(build_lunar_building(&mut state, &catalog, "moon_base").is_ok());
        assert!((state.rocket_mass - 950.0).abs() < f64::EPSILON);
        assert!(build_lunar_building(&mut state, &catalog, "moon_base").is_err());
        assert!(build_lunar_building(&mut state, &catalog, "he3_mining").is_ok());
    }

    #[test]
    fn asteroid_orders_are_trimmed_to_capacity() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.space.launch_tier = LaunchTier::Launchpad;
        state
            .space
            .asteroid_units
            .insert("prospector_drones".into(), 8);
        let cash = state.cash;
        assert!(build_asteroid_units(&mut state, &catalog, "prospector_drones", 5).is_ok());
        assert_eq!(state.space.asteroid_units.get("prospector_drones"), Some(&10));
        assert!((cash - state.cash - 2_000_000.0).abs() < 1e-3);
        assert!((state.rocket_mass - 960.0).abs() < f64::EPSILON);
        assert_eq!(
            build_asteroid_units(&mut state, &catalog, "prospector_drones", 1),
            Err(Rejection::AtCapacity {
                what: "asteroid tier"
            })
        );
    }

    #[test]
    fn reality_budgeting_discounts_builds_but_not_itself() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        for id in ["long_term_thinking", "science_rebranding", "reality_budgeting"] {
            assert!(purchase_bridge_upgrade(&mut state, &catalog, id).is_ok());
        }
        assert!((state.cash - (1e9 - 8_000_000.0)).abs() < 1e-3);
        assert!((cost_multiplier(&state, &catalog) - 0.7).abs() < 1e-12);
        assert!((research_speed(&state, &catalog) - 1.5).abs() < 1e-12);

        let cash = state.cash;
        assert!(upgrade_launch_tier(&mut state, &catalog).is_ok());
        assert!((cash - state.cash - 350_000.0).abs() < 1e-3);
    }

    #[test]
    fn patience_campaign_costs_loyalty() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.space.bridge_upgrades.insert("reality_budgeting".into());
        state.loyalty = 499.0;
        assert_eq!(
            purchase_bridge_upgrade(&mut state, &catalog, "patience_campaign"),
            Err(Rejection::InsufficientFunds {
                resource: "loyalty"
            })
        );
        state.loyalty = 500.0;
        assert!(purchase_bridge_upgrade(&mut state, &catalog, "patience_campaign").is_ok());
        assert!(state.loyalty.abs() < f64::EPSILON);
    }

    #[test]
    fn dyson_prototype_needs_mass_driver_and_industry() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.space.launch_tier = LaunchTier::OrbitalElevator;
        state.orbital_industry = 100.0;
        assert!(build_dyson_prototype(&mut state, &catalog).is_err());
        state.space.launch_tier = LaunchTier::MassDriver;
        state.orbital_industry = 79.0;
        assert!(build_dyson_prototype(&mut state, &catalog).is_err());
        state.orbital_industry = 100.0;
        assert!(build_dyson_prototype(&mut state, &catalog).is_ok());
        assert_eq!(state.space.dyson_swarms, 1);
        assert!((state.orbital_industry - 20.0).abs() < 1e-9);
        assert!(build_dyson_prototype(&mut state, &catalog).is_err());
    }

    #[test]
    fn weapons_raise_fear_and_cost_legitimacy() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.legitimacy = 5.0;
        state.space.launch_tier = LaunchTier::Launchpad;
        assert!(purchase_space_weapon(&mut state, &catalog, "orbital_peace_laser").is_err());
        state.space.launch_tier = LaunchTier::Spaceport;
        assert!(purchase_space_weapon(&mut state, &catalog, "orbital_peace_laser").is_ok());
        assert!((state.war_output - 2_000.0).abs() < f64::EPSILON);
        assert!((state.fear - 50.0).abs() < f64::EPSILON);
        assert!(state.legitimacy.abs() < f64::EPSILON);
    }

    #[test]
    fn tick_accrues_industry_and_renames_mars() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.rocket_mass = 0.0;
        state.legitimacy = 50.0;
        state.budget.space_program = 0.0;
        state.budget.education = 0.0;
        state.space.launch_tier = LaunchTier::Spaceport;
        state.space.lunar_buildings.insert("moon_base".into());
        state.space.lunar_buildings.insert("lunar_heritage".into());
        state.space.mars_upgrades.insert("atmosphere_processing".into());
        state.space.propaganda_satellites = 2;
        state.terraform_progress = 24.995;

        update(&mut state, &catalog, &Modifiers::default(), 1.0);

        assert!((state.rocket_mass - 2.0).abs() < 1e-9);
        assert!((state.orbital_industry - 1.0).abs() < 1e-9);
        assert!((state.terraform_progress - 25.005).abs() < 1e-9);
        assert!(state.space.mars_renamed);
        assert!((state.attention - 100.0).abs() < 1e-9);
        assert!((state.legitimacy - 50.04).abs() < 1e-9);
        assert!((state.reality_drift - 0.002).abs() < 1e-12);
    }

    #[test]
    fn terraform_is_capped() {
        let catalog = default_catalog().unwrap();
        let mut state = phase_four();
        state.space.mars_upgrades.insert("water_extraction".into());
        state.terraform_progress = 99.99;
        update(&mut state, &catalog, &Modifiers::default(), 10.0);
        assert!((state.terraform_progress - 100.0).abs() < f64::EPSILON);
    }
}

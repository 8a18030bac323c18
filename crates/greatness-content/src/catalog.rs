//! Pre-indexed content catalog.
//!
//! [`ContentTables`] mirrors the YAML document: plain lists in authoring
//! order. [`Catalog::from_tables`] turns those lists into id-keyed maps
//! once at startup and rejects duplicate ids and dangling prerequisite
//! references, so the engine never has to search a list or handle a
//! broken chain at runtime.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use greatness_types::{
    AchievementId, CountryId, GameEvent, InstitutionAction, InstitutionId, LaunchTier,
    PrestigeUpgradeId, ShipClassId, TacticType, TariffId, TierId, UpgradeId,
};
use serde::Deserialize;
use tracing::debug;

use crate::defs::{
    AchievementDef, AsteroidTierDef, BlackHoleDef, BridgeUpgradeDef, CosmicTables, CountryDef,
    DysonPrototypeDef, DysonTierDef, InstitutionActionDef, InstitutionDef, LaunchTierDef,
    LunarBuildingDef, MarsUpgradeDef, NarrativeResearchDef, PhaseRules, PrestigeUpgradeDef,
    ProbeUpgradeDef, SatelliteDef, ShipClassDef, SpaceTables, SpaceWeaponDef, StarBrandingDef,
    TacticDef, TariffDef, UpgradeDef,
};
use crate::error::ContentError;

/// Raw content document, as authored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentTables {
    /// Phase guard parameters.
    pub rules: PhaseRules,
    /// Upgrades.
    pub upgrades: Vec<UpgradeDef>,
    /// Random events.
    #[serde(default)]
    pub events: Vec<GameEvent>,
    /// Institutions.
    pub institutions: Vec<InstitutionDef>,
    /// Institution action parameters.
    pub institution_actions: Vec<InstitutionActionDef>,
    /// Countries, including the allied partner.
    pub countries: Vec<CountryDef>,
    /// Country tactic parameters.
    pub tactics: Vec<TacticDef>,
    /// Ship classes.
    pub ships: Vec<ShipClassDef>,
    /// Phase 4 tables.
    pub space: SpaceTables,
    /// Phase 5 tables.
    pub cosmic: CosmicTables,
    /// Prestige upgrades.
    #[serde(default)]
    pub prestige_upgrades: Vec<PrestigeUpgradeDef>,
    /// Tariff lines.
    #[serde(default)]
    pub tariffs: Vec<TariffDef>,
    /// Achievements.
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

/// Content indexed by id, validated and immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Phase guard parameters.
    pub rules: PhaseRules,
    /// Upgrades by id.
    pub upgrades: BTreeMap<UpgradeId, UpgradeDef>,
    /// Events in authoring order; selection order depends on it.
    pub events: Vec<GameEvent>,
    /// Institutions by id.
    pub institutions: BTreeMap<InstitutionId, InstitutionDef>,
    /// Institution action parameters by action.
    pub institution_actions: BTreeMap<InstitutionAction, InstitutionActionDef>,
    /// Countries by id.
    pub countries: BTreeMap<CountryId, CountryDef>,
    /// Tactic parameters by tactic.
    pub tactics: BTreeMap<TacticType, TacticDef>,
    /// Ship classes by id.
    pub ships: BTreeMap<ShipClassId, ShipClassDef>,
    /// Launch tiers by tier.
    pub launch_tiers: BTreeMap<LaunchTier, LaunchTierDef>,
    /// Lunar buildings by id.
    pub lunar_buildings: BTreeMap<TierId, LunarBuildingDef>,
    /// Mars upgrades by id.
    pub mars_upgrades: BTreeMap<TierId, MarsUpgradeDef>,
    /// Asteroid tiers by id.
    pub asteroid_tiers: BTreeMap<TierId, AsteroidTierDef>,
    /// The propaganda satellite.
    pub satellite: SatelliteDef,
    /// The dyson prototype.
    pub dyson_prototype: DysonPrototypeDef,
    /// Orbital weapons by id.
    pub space_weapons: BTreeMap<TierId, SpaceWeaponDef>,
    /// Long-term thinking upgrades by id.
    pub bridge_upgrades: BTreeMap<TierId, BridgeUpgradeDef>,
    /// Probe upgrades by id.
    pub probe_upgrades: BTreeMap<TierId, ProbeUpgradeDef>,
    /// Dyson tiers by id.
    pub dyson_tiers: BTreeMap<TierId, DysonTierDef>,
    /// Star branding tiers by id.
    pub star_branding: BTreeMap<TierId, StarBrandingDef>,
    /// Black hole projects by id.
    pub black_holes: BTreeMap<TierId, BlackHoleDef>,
    /// Narrative research by id.
    pub narrative_research: BTreeMap<TierId, NarrativeResearchDef>,
    /// Prestige upgrades by id.
    pub prestige_upgrades: BTreeMap<PrestigeUpgradeId, PrestigeUpgradeDef>,
    /// Tariff lines by id.
    pub tariffs: BTreeMap<TariffId, TariffDef>,
    /// Achievements by id.
    pub achievements: BTreeMap<AchievementId, AchievementDef>,
}

impl Catalog {
    /// Load and index content from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Io`] if the file cannot be read, and any
    /// error [`Catalog::parse`] can return.
    pub fn from_file(path: &Path) -> Result<Self, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and index content from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Yaml`] for malformed YAML and the
    /// validation errors of [`Catalog::from_tables`].
    pub fn parse(yaml: &str) -> Result<Self, ContentError> {
        let tables: ContentTables = serde_yml::from_str(yaml)?;
        Self::from_tables(tables)
    }

    /// Index raw tables by id and check referential integrity.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::DuplicateId`] when two records share an id,
    /// [`ContentError::DanglingReference`] when a prerequisite or
    /// whitelist names a missing record, and [`ContentError::Invalid`]
    /// for structural violations such as more than one allied country.
    pub fn from_tables(tables: ContentTables) -> Result<Self, ContentError> {
        let ContentTables {
            rules,
            upgrades,
            events,
            institutions,
            institution_actions,
            countries,
            tactics,
            ships,
            space,
            cosmic,
            prestige_upgrades,
            tariffs,
            achievements,
        } = tables;

        let catalog = Self {
            rules,
            upgrades: index("upgrade", upgrades, |u| u.id.clone())?,
            events: check_unique_events(events)?,
            institutions: index("institution", institutions, |i| i.id.clone())?,
            institution_actions: index("institution action", institution_actions, |a| {
                a.action
            })?,
            countries: index("country", countries, |c| c.id.clone())?,
            tactics: index("tactic", tactics, |t| t.tactic)?,
            ships: index("ship", ships, |s| s.id.clone())?,
            launch_tiers: index("launch tier", space.launch_tiers, |t| t.tier)?,
            lunar_buildings: index("lunar building", space.lunar_buildings, |b| b.id.clone())?,
            mars_upgrades: index("mars upgrade", space.mars_upgrades, |m| m.id.clone())?,
            asteroid_tiers: index("asteroid tier", space.asteroid_tiers, |a| a.id.clone())?,
            satellite: space.satellite,
            dyson_prototype: space.dyson_prototype,
            space_weapons: index("space weapon", space.weapons, |w| w.id.clone())?,
            bridge_upgrades: index("bridge upgrade", space.bridge_upgrades, |b| b.id.clone())?,
            probe_upgrades: index("probe upgrade", cosmic.probe_upgrades, |p| p.id.clone())?,
            dyson_tiers: index("dyson tier", cosmic.dyson_tiers, |d| d.id.clone())?,
            star_branding: index("star branding", cosmic.star_branding, |s| s.id.clone())?,
            black_holes: index("black hole", cosmic.black_holes, |b| b.id.clone())?,
            narrative_research: index("narrative research", cosmic.narrative_research, |n| {
                n.id.clone()
            })?,
            prestige_upgrades: index("prestige upgrade", prestige_upgrades, |p| p.id.clone())?,
            tariffs: index("tariff", tariffs, |t| t.id.clone())?,
            achievements: index("achievement", achievements, |a| a.id.clone())?,
        };

        catalog.validate()?;
        debug!(
            upgrades = catalog.upgrades.len(),
            events = catalog.events.len(),
            institutions = catalog.institutions.len(),
            countries = catalog.countries.len(),
            "Content catalog indexed"
        );
        Ok(catalog)
    }

    /// The single allied partner, if the content declares one.
    pub fn allied_country(&self) -> Option<&CountryDef> {
        self.countries.values().find(|c| c.allied)
    }

    fn validate(&self) -> Result<(), ContentError> {
        for def in self.upgrades.values() {
            check_ref("upgrade", &def.id, def.prerequisite.as_ref(), &self.upgrades)?;
        }
        check_ref(
            "rules",
            &"gateway_upgrade",
            Some(&self.rules.gateway_upgrade),
            &self.upgrades,
        )?;
        check_ref(
            "rules",
            &"required_rig_tier",
            Some(&self.rules.required_rig_tier),
            &self.asteroid_tiers,
        )?;

        for def in self.tactics.values() {
            for country in def.available_for.iter().flatten() {
                check_ref("tactic", &format!("{:?}", def.tactic), Some(country), &self.countries)?;
            }
        }

        let allied = self.countries.values().filter(|c| c.allied).count();
        if allied > 1 {
            return Err(ContentError::Invalid {
                message: format!("{allied} countries are marked allied; at most one may be"),
            });
        }

        for def in self.lunar_buildings.values() {
            check_ref("lunar building", &def.id, def.prerequisite.as_ref(), &self.lunar_buildings)?;
        }
        for def in self.mars_upgrades.values() {
            check_ref("mars upgrade", &def.id, def.prerequisite.as_ref(), &self.mars_upgrades)?;
        }
        for def in self.asteroid_tiers.values() {
            check_ref("asteroid tier", &def.id, def.prerequisite.as_ref(), &self.asteroid_tiers)?;
        }
        for def in self.bridge_upgrades.values() {
            check_ref("bridge upgrade", &def.id, def.prerequisite.as_ref(), &self.bridge_upgrades)?;
        }
        for def in self.probe_upgrades.values() {
            check_ref("probe upgrade", &def.id, def.prerequisite.as_ref(), &self.probe_upgrades)?;
        }
        for def in self.dyson_tiers.values() {
            check_ref("dyson tier", &def.id, def.prerequisite.as_ref(), &self.dyson_tiers)?;
        }
        for def in self.star_branding.values() {
            check_ref("star branding", &def.id, def.prerequisite.as_ref(), &self.star_branding)?;
        }
        for def in self.black_holes.values() {
            check_ref("black hole", &def.id, def.prerequisite.as_ref(), &self.black_holes)?;
        }
        for def in self.narrative_research.values() {
            check_ref(
                "narrative research",
                &def.id,
                def.prerequisite.as_ref(),
                &self.narrative_research,
            )?;
        }
        for def in self.prestige_upgrades.values() {
            for prereq in &def.prerequisites {
                check_ref("prestige upgrade", &def.id, Some(prereq), &self.prestige_upgrades)?;
            }
        }
        Ok(())
    }
}

/// Build an id-keyed map, rejecting duplicates.
fn index<K, V>(
    kind: &'static str,
    items: Vec<V>,
    key: impl Fn(&V) -> K,
) -> Result<BTreeMap<K, V>, ContentError>
where
    K: Ord + core::fmt::Debug,
{
    let mut map = BTreeMap::new();
    for item in items {
        let id = key(&item);
        if map.contains_key(&id) {
            return Err(ContentError::DuplicateId {
                kind,
                id: format!("{id:?}"),
            });
        }
        map.insert(id, item);
    }
    Ok(map)
}

fn check_unique_events(events: Vec<GameEvent>) -> Result<Vec<GameEvent>, ContentError> {
    let mut seen = std::collections::BTreeSet::new();
    for event in &events {
        if !seen.insert(event.id.as_str()) {
            return Err(ContentError::DuplicateId {
                kind: "event",
                id: event.id.to_string(),
            });
        }
    }
    Ok(events)
}

/// Check that an optional reference resolves in `map`.
fn check_ref<K, V>(
    kind: &'static str,
    owner: &dyn Display,
    target: Option<&K>,
    map: &BTreeMap<K, V>,
) -> Result<(), ContentError>
where
    K: Ord + Display,
{
    match target {
        Some(target) if !map.contains_key(target) => Err(ContentError::DanglingReference {
            kind,
            owner: owner.to_string(),
            target: target.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn bundled_content_indexes_cleanly() {
        let catalog = crate::default_catalog().unwrap();
        assert_eq!(catalog.institutions.len(), 13);
        assert_eq!(catalog.countries.len(), 15);
        assert_eq!(catalog.allied_country().map(|c| c.id.as_str()), Some("azure_state"));
        assert!(catalog.upgrades.contains_key("sci_neural_backup"));
        assert_eq!(catalog.prestige_upgrades.len(), 12);
        assert_eq!(catalog.launch_tiers.len(), 4);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = index("ship", vec![1_u32, 2, 1], |v| *v);
        assert!(matches!(result, Err(ContentError::DuplicateId { kind: "ship", .. })));
    }

    #[test]
    fn dangling_prerequisite_is_rejected() {
        let yaml = crate::DEFAULT_CONTENT.replace(
            "prerequisite: prospector_drones",
            "prerequisite: ghost_drones",
        );
        let result = Catalog::parse(&yaml);
        assert!(matches!(
            result,
            Err(ContentError::DanglingReference { kind: "asteroid tier", .. })
        ));
    }

    #[test]
    fn second_allied_country_is_rejected() {
        let yaml = crate::DEFAULT_CONTENT.replace(
            "id: frostheim\n    name: \"Frostheim\"",
            "id: frostheim\n    name: \"Frostheim\"\n    allied: true",
        );
        assert!(matches!(Catalog::parse(&yaml), Err(ContentError::Invalid { .. })));
    }
}

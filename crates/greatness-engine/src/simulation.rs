//! The simulation service: one owner for the state aggregate.
//!
//! [`Simulation`] holds the run, the content it plays against, the seeded
//! random source for events, and the save slot. Every player operation is
//! a synchronous validate-then-mutate call that reports success as a
//! `bool`; a refused action leaves the state untouched and is logged at
//! `debug`. Persistence problems are logged at `warn` and never stop play.

use std::sync::Arc;

use greatness_content::Catalog;
use greatness_store::{SaveStore, StoreError};
use greatness_types::{
    BudgetPatch, GameState, InstitutionAction, PendingTransition, Phase, SettingsPatch, TacticType,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::modifiers::Modifiers;
use crate::offline::{self, OfflineReport};
use crate::rejection::ActionResult;
use crate::snapshot::{self, SaveFile, SnapshotError};
use crate::tick::{self, TickOutcome};
use crate::{cosmic, country, economy, events, institution, phase, prestige, shipyard, space};

/// Errors that can occur while saving or loading a run.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The save slot failed.
    #[error("save slot error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The save document could not be encoded or decoded.
    #[error("save document error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: SnapshotError,
    },
}

/// A running game.
pub struct Simulation {
    state: GameState,
    catalog: Arc<Catalog>,
    rng: SmallRng,
    store: Box<dyn SaveStore>,
}

impl core::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulation")
            .field("phase", &self.state.phase)
            .field("last_tick_at", &self.state.last_tick_at)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Start a fresh run at `now`.
    ///
    /// `seed` drives event selection and scheduling; identical seeds and
    /// inputs replay identically.
    pub fn new(catalog: Arc<Catalog>, store: Box<dyn SaveStore>, seed: u64, now: i64) -> Self {
        Self {
            state: GameState::new(now),
            catalog,
            rng: SmallRng::seed_from_u64(seed),
            store,
        }
    }

    /// Start from an existing state instead of defaults.
    pub fn with_state(
        state: GameState,
        catalog: Arc<Catalog>,
        store: Box<dyn SaveStore>,
        seed: u64,
    ) -> Self {
        Self {
            state,
            catalog,
            rng: SmallRng::seed_from_u64(seed),
            store,
        }
    }

    /// The current state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The content tables.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Modifiers from the owned prestige upgrades.
    pub fn modifiers(&self) -> Modifiers {
        Modifiers::collect(&self.state.prestige_upgrades, &self.catalog)
    }

    /// Simulation time: the timestamp of the last tick.
    pub const fn now(&self) -> i64 {
        self.state.last_tick_at
    }

    // -----------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------

    /// Advance the run to `now`.
    ///
    /// A gap longer than [`tick::MAX_TICK_SECS`] is not simulated step by
    /// step. It credits offline progress exactly like
    /// [`Simulation::apply_offline_progress`] and returns
    /// [`TickOutcome::Offline`].
    pub fn tick(&mut self, now: i64) -> TickOutcome {
        tick::run_tick(&mut self.state, &self.catalog, now, &mut self.rng)
    }

    /// Credit time away since the last tick and resync to `now`.
    pub fn apply_offline_progress(&mut self, now: i64) -> Option<OfflineReport> {
        let modifiers = self.modifiers();
        offline::apply(&mut self.state, &self.catalog, &modifiers, now)
    }

    /// What [`Simulation::apply_offline_progress`] would credit at `now`.
    pub fn offline_preview(&self, now: i64) -> Option<OfflineReport> {
        offline::calculate(&self.state, &self.catalog, &self.modifiers(), now)
    }

    // -----------------------------------------------------------------
    // Economy
    // -----------------------------------------------------------------

    /// Spend one click.
    pub fn click(&mut self) {
        economy::click(&mut self.state);
    }

    /// Buy one unit of an upgrade.
    pub fn purchase_upgrade(&mut self, id: &str) -> bool {
        let modifiers = self.modifiers();
        let result = economy::purchase_upgrade(&mut self.state, &self.catalog, &modifiers, id);
        outcome("purchase_upgrade", result)
    }

    /// Apply a partial budget update.
    pub fn set_budget(&mut self, patch: &BudgetPatch) {
        economy::set_budget(&mut self.state, patch);
    }

    /// Set a tariff line's level.
    pub fn set_tariff(&mut self, id: &str, level: u8) -> bool {
        let result = economy::set_tariff(&mut self.state, &self.catalog, id, level);
        outcome("set_tariff", result)
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    /// Resolve the active event with the choice at `choice`.
    pub fn resolve_event(&mut self, choice: usize) -> bool {
        let modifiers = self.modifiers();
        events::resolve(&mut self.state, choice, &modifiers)
    }

    /// Dismiss the active event without choosing.
    pub fn dismiss_event(&mut self) -> bool {
        events::dismiss(&mut self.state)
    }

    // -----------------------------------------------------------------
    // Capture
    // -----------------------------------------------------------------

    /// Start an action against an institution.
    pub fn start_institution_action(&mut self, id: &str, action: InstitutionAction) -> bool {
        let now = self.now();
        let result = institution::start_action(&mut self.state, &self.catalog, id, action, now);
        outcome("start_institution_action", result)
    }

    /// Start a tactic against a country.
    pub fn start_country_tactic(&mut self, id: &str, tactic: TacticType) -> bool {
        let now = self.now();
        let result = country::start_tactic(&mut self.state, &self.catalog, id, tactic, now);
        outcome("start_country_tactic", result)
    }

    /// Queue `quantity` ships of one class.
    pub fn build_ship(&mut self, id: &str, quantity: u32) -> bool {
        let now = self.now();
        let result = shipyard::build_ship(&mut self.state, &self.catalog, id, quantity, now);
        outcome("build_ship", result)
    }

    /// Raise the shipyard level.
    pub fn upgrade_shipyard(&mut self) -> bool {
        outcome("upgrade_shipyard", shipyard::upgrade_shipyard(&mut self.state))
    }

    // -----------------------------------------------------------------
    // Space
    // -----------------------------------------------------------------

    /// Move to the next launch tier.
    pub fn upgrade_launch_tier(&mut self) -> bool {
        let result = space::upgrade_launch_tier(&mut self.state, &self.catalog);
        outcome("upgrade_launch_tier", result)
    }

    /// Build a lunar building.
    pub fn build_lunar_building(&mut self, id: &str) -> bool {
        let result = space::build_lunar_building(&mut self.state, &self.catalog, id);
        outcome("build_lunar_building", result)
    }

    /// Build a Mars upgrade.
    pub fn build_mars_upgrade(&mut self, id: &str) -> bool {
        let result = space::build_mars_upgrade(&mut self.state, &self.catalog, id);
        outcome("build_mars_upgrade", result)
    }

    /// Build asteroid units of one tier.
    pub fn build_asteroid_units(&mut self, id: &str, count: u32) -> bool {
        let result = space::build_asteroid_units(&mut self.state, &self.catalog, id, count);
        outcome("build_asteroid_units", result)
    }

    /// Launch a propaganda satellite.
    pub fn build_satellite(&mut self) -> bool {
        outcome(
            "build_satellite",
            space::build_satellite(&mut self.state, &self.catalog),
        )
    }

    /// Build the dyson prototype.
    pub fn build_dyson_prototype(&mut self) -> bool {
        outcome(
            "build_dyson_prototype",
            space::build_dyson_prototype(&mut self.state, &self.catalog),
        )
    }

    /// Buy an orbital weapon.
    pub fn purchase_space_weapon(&mut self, id: &str) -> bool {
        let result = space::purchase_space_weapon(&mut self.state, &self.catalog, id);
        outcome("purchase_space_weapon", result)
    }

    /// Buy a long-term thinking upgrade.
    pub fn purchase_bridge_upgrade(&mut self, id: &str) -> bool {
        let result = space::purchase_bridge_upgrade(&mut self.state, &self.catalog, id);
        outcome("purchase_bridge_upgrade", result)
    }

    // -----------------------------------------------------------------
    // Cosmos
    // -----------------------------------------------------------------

    /// Buy a probe upgrade.
    pub fn purchase_probe_upgrade(&mut self, id: &str) -> bool {
        let result = cosmic::purchase_probe_upgrade(&mut self.state, &self.catalog, id);
        outcome("purchase_probe_upgrade", result)
    }

    /// Buy a dyson tier.
    pub fn purchase_dyson_upgrade(&mut self, id: &str) -> bool {
        let result = cosmic::purchase_dyson_upgrade(&mut self.state, &self.catalog, id);
        outcome("purchase_dyson_upgrade", result)
    }

    /// Buy a star branding tier.
    pub fn purchase_star_branding(&mut self, id: &str) -> bool {
        let result = cosmic::purchase_star_branding(&mut self.state, &self.catalog, id);
        outcome("purchase_star_branding", result)
    }

    /// Buy a black hole project.
    pub fn purchase_black_hole(&mut self, id: &str) -> bool {
        let result = cosmic::purchase_black_hole(&mut self.state, &self.catalog, id);
        outcome("purchase_black_hole", result)
    }

    /// Buy narrative research with greatness units.
    pub fn purchase_narrative_research(&mut self, id: &str) -> bool {
        let result = cosmic::purchase_narrative_research(&mut self.state, &self.catalog, id);
        outcome("purchase_narrative_research", result)
    }

    /// Mark the triggered ending as seen.
    pub fn complete_ending(&mut self) -> bool {
        outcome("complete_ending", cosmic::complete_ending(&mut self.state))
    }

    // -----------------------------------------------------------------
    // Phases and prestige
    // -----------------------------------------------------------------

    /// The transition waiting to be finalized, if any.
    pub const fn pending_transition(&self) -> Option<PendingTransition> {
        self.state.pending_transition
    }

    /// Enter the pending phase and save. Does nothing when no transition
    /// is pending.
    pub fn complete_phase_transition(&mut self) -> Option<Phase> {
        let modifiers = self.modifiers();
        let entered = phase::finalize(&mut self.state, &self.catalog, &modifiers)?;
        self.save();
        Some(entered)
    }

    /// Reset the run for prestige points and save. Returns points earned.
    pub fn prestige(&mut self) -> u64 {
        let now = self.now();
        let earned = prestige::prestige(&mut self.state, &self.catalog, now);
        self.save();
        earned
    }

    /// Buy a permanent upgrade.
    pub fn purchase_prestige_upgrade(&mut self, id: &str) -> bool {
        let result = prestige::purchase_upgrade(&mut self.state, &self.catalog, id);
        outcome("purchase_prestige_upgrade", result)
    }

    // -----------------------------------------------------------------
    // Persistence and settings
    // -----------------------------------------------------------------

    /// Write the run to the save slot.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the document cannot be encoded or
    /// the slot cannot be written. `last_save_at` is only updated on
    /// success.
    pub fn try_save(&mut self) -> Result<(), PersistenceError> {
        let now = self.now();
        let mut state = self.state.clone();
        state.last_save_at = now;
        let document = snapshot::encode(&SaveFile::new(state, now))?;
        self.store.write(&document)?;
        self.state.last_save_at = now;
        debug!(saved_at = now, bytes = document.len(), "Run saved");
        Ok(())
    }

    /// Write the run to the save slot, logging any failure.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "Save failed, continuing in memory");
                false
            }
        }
    }

    /// Replace the run with the saved one.
    ///
    /// Returns `Ok(false)` when the slot is empty. Saved timestamps are
    /// kept, so offline progress can be credited afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the slot cannot be read or the
    /// document is invalid. The current run is left untouched.
    pub fn try_load(&mut self) -> Result<bool, PersistenceError> {
        let Some(document) = self.store.read()? else {
            return Ok(false);
        };
        let save = snapshot::decode(&document)?;
        self.state = save.state;
        info!(
            saved_at = save.saved_at,
            phase = %self.state.phase,
            "Run loaded"
        );
        Ok(true)
    }

    /// Replace the run with the saved one.
    ///
    /// An empty slot keeps the current run. A slot that cannot be read or
    /// decoded falls back to fresh defaults at the current simulation time.
    pub fn load(&mut self) -> bool {
        match self.try_load() {
            Ok(loaded) => loaded,
            Err(error) => {
                let now = self.now();
                self.state = GameState::new(now);
                warn!(%error, now, "Load failed, starting fresh");
                false
            }
        }
    }

    /// Restore every default at the current simulation time.
    pub fn reset(&mut self) {
        let now = self.now();
        self.state = GameState::new(now);
        info!(now, "Run reset");
    }

    /// Apply a partial settings update. Volumes are clamped to `[0, 1]`.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        let settings = &mut self.state.settings;
        if let Some(volume) = patch.music_volume {
            settings.music_volume = volume.clamp(0.0, 1.0);
        }
        if let Some(volume) = patch.sfx_volume {
            settings.sfx_volume = volume.clamp(0.0, 1.0);
        }
        if let Some(notifications) = patch.notifications {
            settings.notifications = notifications;
        }
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
    }
}

/// Fold a validated action into a success flag.
fn outcome(operation: &'static str, result: ActionResult) -> bool {
    match result {
        Ok(()) => true,
        Err(rejection) => {
            debug!(operation, %rejection, "Action rejected");
            false
        }
    }
}

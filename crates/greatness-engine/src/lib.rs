//! Progression simulation engine for Greatness.
//!
//! This crate advances one state aggregate through five escalating phases.
//! The [`Simulation`] service owns the aggregate and exposes every player
//! operation; [`tick::run_tick`] drives the subsystems in a fixed order.
//!
//! # Modules
//!
//! - [`config`] -- Run configuration loaded from `greatness-config.yaml`.
//! - [`formulas`] -- Pure production, cost, decay and budget formulas.
//! - [`modifiers`] -- Permanent prestige effects folded into lookups.
//! - [`rejection`] -- Why a player action was refused.
//! - [`economy`] -- Clicks, upgrades, budget, tariffs, legitimacy.
//! - [`contradiction`] -- Dual-axis meters and doublethink tokens.
//! - [`institution`] -- Institution capture state machine.
//! - [`country`] -- Country capture state machine and tactics.
//! - [`shipyard`] -- Single-order ship production queue.
//! - [`drift`] -- Reality drift accumulator.
//! - [`space`] -- Phase 4 builds and production.
//! - [`cosmic`] -- Phase 5 purchases, conversion and the ending.
//! - [`phase`] -- Phase transition guards and the finalizer.
//! - [`events`] -- Weighted event selection and resolution.
//! - [`offline`] -- Catch-up credit for time away.
//! - [`prestige`] -- Prestige reset and the permanent upgrade shop.
//! - [`achievements`] -- Achievement predicates.
//! - [`tick`] -- The fixed-order tick cycle.
//! - [`snapshot`] -- Versioned save documents and migrations.
//! - [`simulation`] -- The service that owns a run.

pub mod achievements;
pub mod config;
pub mod contradiction;
pub mod cosmic;
pub mod country;
pub mod drift;
pub mod economy;
pub mod events;
pub mod formulas;
pub mod institution;
pub mod modifiers;
pub mod offline;
pub mod phase;
pub mod prestige;
pub mod rejection;
pub mod shipyard;
pub mod simulation;
pub mod snapshot;
pub mod space;
pub mod tick;

pub use config::{ConfigError, EngineConfig};
pub use modifiers::Modifiers;
pub use offline::OfflineReport;
pub use rejection::{ActionResult, Rejection};
pub use simulation::{PersistenceError, Simulation};
pub use snapshot::{SaveFile, SnapshotError};
pub use tick::{TickOutcome, TickSummary};

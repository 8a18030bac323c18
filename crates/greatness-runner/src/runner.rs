//! Fixed-interval tick loop around a [`Simulation`].
//!
//! [`run_simulation`] drives the engine with the wall clock and adds the
//! control plane a headless run needs:
//!
//! - **Bounded run**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Clean shutdown**: stop flag raised by ctrl-c, checked before each tick
//! - **Autosave**: write the save slot every `autosave_interval_secs`
//! - **Auto-finalize**: enter pending phases and close a triggered ending,
//!   standing in for the presentation layer that would play them
//!
//! The final save is left to the caller.

use std::time::Duration;

use greatness_engine::{EngineConfig, Simulation, TickOutcome, TickSummary};
use greatness_types::GameState;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::control::{EndReason, RunControl};

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// Why the run ended.
    pub end_reason: EndReason,
    /// The last normal tick, if any ran.
    pub final_summary: Option<TickSummary>,
    /// Number of tick calls made.
    pub total_ticks: u64,
}

/// Callback invoked after each normal tick.
pub trait TickCallback: Send {
    /// Called after a tick advanced the run.
    fn on_tick(&mut self, summary: &TickSummary, state: &GameState);
}

/// A callback that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &GameState) {}
}

/// Run the tick loop until a limit is reached or a stop is requested.
pub async fn run_simulation(
    sim: &mut Simulation,
    clock: &dyn Clock,
    control: &RunControl,
    config: &EngineConfig,
    callback: &mut dyn TickCallback,
) -> RunResult {
    let interval_ms = config.world.tick_interval_ms;
    let autosave_ms = i64::try_from(config.persistence.autosave_interval_secs)
        .unwrap_or(i64::MAX)
        .saturating_mul(1_000);
    let auto_finalize = config.simulation.auto_finalize_transitions;

    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = control.max_ticks(),
        max_real_time_seconds = control.max_real_time_seconds(),
        tick_interval_ms = interval_ms,
        autosave_ms,
        "Simulation starting"
    );

    loop {
        if control.is_stop_requested() {
            info!("Stop requested");
            return finish(EndReason::StopRequested, last_summary, total_ticks);
        }
        if control.time_limit_reached() {
            info!(
                max_seconds = control.max_real_time_seconds(),
                elapsed = control.elapsed_seconds(),
                "Real-time limit reached"
            );
            return finish(EndReason::MaxRealTimeReached, last_summary, total_ticks);
        }

        let now = clock.now_millis();
        let outcome = sim.tick(now);
        total_ticks = total_ticks.saturating_add(1);

        match outcome {
            TickOutcome::Advanced(summary) => {
                if auto_finalize {
                    finalize_pending(sim, &summary);
                }
                callback.on_tick(&summary, sim.state());
                last_summary = Some(summary);
            }
            TickOutcome::Offline(report) => {
                info!(
                    gained = report.map(|r| r.greatness_gained),
                    "Long pause, credited as offline progress"
                );
            }
            TickOutcome::Skipped => debug!(now, "Tick skipped"),
        }

        if autosave_ms > 0 && now.saturating_sub(sim.state().last_save_at) >= autosave_ms {
            if sim.save() {
                debug!(now, "Autosaved");
            } else {
                warn!(now, "Autosave failed");
            }
        }

        if control.tick_limit_reached(total_ticks) {
            info!(
                total_ticks,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            return finish(EndReason::MaxTicksReached, last_summary, total_ticks);
        }

        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Play the parts a presentation layer would: enter a pending phase and
/// close a freshly triggered ending.
fn finalize_pending(sim: &mut Simulation, summary: &TickSummary) {
    if let Some(phase) = sim.complete_phase_transition() {
        info!(phase = %phase, "Phase entered");
    }
    if summary.ending_triggered && sim.complete_ending() {
        info!("Ending complete");
    }
}

const fn finish(
    end_reason: EndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> RunResult {
    RunResult {
        end_reason,
        final_summary,
        total_ticks,
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &RunResult, state: &GameState) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            phase = %state.phase,
            greatness = state.greatness,
            greatness_per_second = summary.greatness_per_second,
            doublethink_tokens = state.doublethink_tokens,
            achievements = state.achievements.len(),
            "Final run summary"
        );
    } else {
        warn!("Simulation ended with no normal ticks");
    }
}

//! Versioned save documents.
//!
//! A save is a JSON object `{ version, saved_at, state }`. Decoding reads
//! the raw document first, runs every migration from its version up to
//! [`CURRENT_VERSION`] on the untyped value, and only then deserializes
//! the state. Documents from a newer build are refused.

use greatness_types::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 2;

/// Errors that can occur when encoding or decoding a save.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or does not match the state shape.
    #[error("invalid save document: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },

    /// The document was written by a newer build.
    #[error("save version {found} is newer than supported version {current}")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Newest version this build reads.
        current: u32,
    },

    /// No migration step leads away from this version.
    #[error("no migration from save version {from}")]
    MissingMigration {
        /// Version that could not be upgraded.
        from: u32,
    },
}

/// A persisted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    /// Document format version.
    pub version: u32,
    /// Simulation time the save was taken at, in milliseconds.
    pub saved_at: i64,
    /// The full aggregate.
    pub state: GameState,
}

impl SaveFile {
    /// Wrap `state` for saving at `saved_at`.
    pub const fn new(state: GameState, saved_at: i64) -> Self {
        Self {
            version: CURRENT_VERSION,
            saved_at,
            state,
        }
    }
}

/// Serialize a save at the current version.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if the state cannot be serialized.
pub fn encode(save: &SaveFile) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(save)?)
}

/// Parse a save document of any supported version.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] for malformed documents,
/// [`SnapshotError::UnsupportedVersion`] for documents from a newer build
/// and [`SnapshotError::MissingMigration`] if a version has no upgrade step.
pub fn decode(document: &str) -> Result<SaveFile, SnapshotError> {
    let mut raw: Value = serde_json::from_str(document)?;
    let found = raw
        .get("version")
        .and_then(Value::as_u64)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(1);
    if found > CURRENT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found,
            current: CURRENT_VERSION,
        });
    }

    let mut version = found;
    while version < CURRENT_VERSION {
        version = migrate(&mut raw, version)?;
    }
    if found != version {
        info!(from = found, to = version, "Save document migrated");
    }
    if let Some(object) = raw.as_object_mut() {
        object.insert(String::from("version"), Value::from(version));
    }

    let save: SaveFile = serde_json::from_value(raw)?;
    debug!(version = save.version, saved_at = save.saved_at, "Save document decoded");
    Ok(save)
}

/// Run the single step that upgrades a document from `from`. Returns the
/// version reached.
fn migrate(raw: &mut Value, from: u32) -> Result<u32, SnapshotError> {
    match from {
        1 => {
            // activity pressure is measured against the attention seen last tick
            if let Some(state) = raw.get_mut("state").and_then(Value::as_object_mut) {
                let attention = state
                    .get("attention")
                    .cloned()
                    .unwrap_or_else(|| Value::from(0.0));
                state.entry("attention_watermark").or_insert(attention);
            }
            Ok(2)
        }
        other => Err(SnapshotError::MissingMigration { from: other }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn fractional_floats_keep_every_bit() {
        let mut state = GameState::new(0);
        state.greatness = 2.0_f64.sqrt() * 30.0;
        state.cash = 0.1 + 0.2;
        state.legitimacy = 100.0 / 3.0;
        let save = SaveFile::new(state, 1_000);

        let restored = decode(&encode(&save).unwrap()).unwrap();

        assert_eq!(restored.state.greatness.to_bits(), save.state.greatness.to_bits());
        assert_eq!(restored.state.cash.to_bits(), save.state.cash.to_bits());
        assert_eq!(restored.state.legitimacy.to_bits(), save.state.legitimacy.to_bits());
        assert_eq!(restored, save);
    }

    #[test]
    fn current_version_round_trips() {
        let mut state = GameState::new(1_000);
        state.attention = 12.5;
        state.click_count = 3;
        let save = SaveFile::new(state, 2_000);
        let decoded = decode(&encode(&save).unwrap()).unwrap();
        assert_eq!(decoded, save);
    }

    #[test]
    fn version_one_gains_a_watermark() {
        let mut state = GameState::new(0);
        state.attention = 77.0;
        let mut raw = serde_json::to_value(SaveFile::new(state, 0)).unwrap();
        raw["version"] = Value::from(1);
        raw["state"]
            .as_object_mut()
            .unwrap()
            .remove("attention_watermark");

        let save = decode(&raw.to_string()).unwrap();
        assert_eq!(save.version, CURRENT_VERSION);
        assert!((save.state.attention_watermark - 77.0).abs() < f64::EPSILON);
    }

    #[test]
    fn future_versions_are_refused() {
        let mut raw = serde_json::to_value(SaveFile::new(GameState::new(0), 0)).unwrap();
        raw["version"] = Value::from(3);
        assert!(matches!(
            decode(&raw.to_string()),
            Err(SnapshotError::UnsupportedVersion { found: 3, .. })
        ));
    }

    #[test]
    fn zero_has_no_migration() {
        let mut raw = serde_json::to_value(SaveFile::new(GameState::new(0), 0)).unwrap();
        raw["version"] = Value::from(0);
        assert!(matches!(
            decode(&raw.to_string()),
            Err(SnapshotError::MissingMigration { from: 0 })
        ));
    }

    #[test]
    fn garbage_is_a_json_error() {
        assert!(matches!(
            decode("not a save"),
            Err(SnapshotError::Json { .. })
        ));
    }
}

//! Random event definitions.
//!
//! Events are immutable content. The active event is copied into the
//! state aggregate while it waits for a choice, so a snapshot can restore
//! it without consulting the content tables.

use serde::{Deserialize, Serialize};

use crate::enums::{Comparison, EffectKind, EventCategory, Phase};
use crate::ids::EventId;
use crate::resource::Resource;

/// One change to a named resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Resource written.
    pub resource: Resource,
    /// Operand.
    pub amount: f64,
    /// How the operand combines with the current value.
    #[serde(rename = "type")]
    pub kind: EffectKind,
}

/// A numeric precondition for an event to be eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCondition {
    /// Resource read.
    pub resource: Resource,
    /// Comparison applied as `resource <operator> value`.
    pub operator: Comparison,
    /// Right-hand side.
    pub value: f64,
}

/// One way to answer an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    /// Button text.
    pub label: String,
    /// Hint shown under the button.
    #[serde(default)]
    pub description: String,
    /// Effects applied in order when chosen.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

/// A random event definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Unique id.
    pub id: EventId,
    /// Earliest phase in which the event may fire.
    pub phase: Phase,
    /// Category, which fixes the selection weight.
    pub category: EventCategory,
    /// Headline text.
    pub headline: String,
    /// Supporting text.
    #[serde(default)]
    pub context: String,
    /// Available answers.
    pub choices: Vec<EventChoice>,
    /// Preconditions, all of which must hold.
    #[serde(default)]
    pub conditions: Vec<EventCondition>,
    /// Nominal cooldown in seconds. Informational.
    #[serde(default)]
    pub cooldown: f64,
    /// Whether the event may fire at most once per run.
    #[serde(default)]
    pub unique: bool,
}

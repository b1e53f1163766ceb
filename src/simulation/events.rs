//! Deferred state changes for the simulation tick.
//!
//! Removals discovered while walking the active set are queued here and
//! applied in one batch at the end of the tick, so no collection is mutated
//! while it is being traversed.

use super::ecosystem::Ecosystem;
use super::fish::FishId;
use super::gating::DeviceId;
use super::school::DeathCause;

/// Events that modify simulation state.
///
/// Collected during the tick and applied serially afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    /// A fish reached the spawning grounds.
    FishSucceeded {
        /// Fish that arrived.
        fish: FishId,
    },
    /// A fish died and should leave the active set.
    FishDied {
        /// Fish that died.
        fish: FishId,
        /// Reason for the death.
        cause: DeathCause,
    },
    /// A fishing tower was disabled and should be removed.
    TowerDisabled {
        /// Device slot of the tower.
        device: DeviceId,
    },
}

/// Queue for collecting simulation events during a tick.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

/// Applies all queued events to the ecosystem state.
///
/// Events for fish that already left the active set are ignored, so a fish
/// that both reached the goal and ran dry in the same tick is resolved once.
///
/// # Returns
///
/// `true` if any fish changed sets.
pub fn apply_events(state: &mut Ecosystem, mut queue: EventQueue) -> bool {
    let mut population_changed = false;

    for event in queue.drain() {
        match event {
            SimulationEvent::FishSucceeded { fish } => {
                population_changed |= state.resolve_success(fish);
            }
            SimulationEvent::FishDied { fish, cause } => {
                population_changed |= state.resolve_death(fish, cause);
            }
            SimulationEvent::TowerDisabled { device } => {
                state.remove_device(device);
            }
        }
    }

    population_changed
}

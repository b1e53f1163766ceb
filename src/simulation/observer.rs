//! Typed game events and the subscription list that delivers them.
//!
//! Collaborators outside the core (viewers, UI, tests) subscribe with a
//! closure and keep the returned [`SubscriptionId`] so they can unsubscribe
//! when they go away.

use std::fmt;

use super::genome::Genome;
use super::lifecycle::{EndReason, Phase};

/// Events emitted by the lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The turn counter changed.
    TurnChanged(u32),
    /// Fish changed sets.
    PopulationChanged {
        /// Genomes of the active fish.
        active: Vec<Genome>,
        /// Genomes of the fish at the spawning grounds.
        successful: Vec<Genome>,
        /// Genomes of the dead fish.
        dead: Vec<Genome>,
    },
    /// A new generation is ready to spawn.
    NewGeneration {
        /// Parents it was bred from; `None` for the founding generation.
        parents: Option<Vec<Genome>>,
        /// Genomes of the new generation.
        offspring: Vec<Genome>,
    },
    /// A run began.
    RunStarted,
    /// A run finished.
    RunEnded,
    /// The game reached its terminal phase.
    GameEnded(EndReason),
    /// The lifecycle moved to another phase.
    PhaseChanged(Phase),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of event listeners.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it receives every event emitted afterwards.
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener.
    ///
    /// # Returns
    ///
    /// `false` if the handle was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers an event to every listener in subscription order.
    pub fn emit(&mut self, event: &GameEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

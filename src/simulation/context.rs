//! Single-instance slots owned by the simulation context.

use tracing::error;

/// Holds at most one instance of a collaborator.
///
/// The first registration wins. Later ones are dropped and logged.
#[derive(Debug, Clone)]
pub struct SingletonSlot<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T> SingletonSlot<T> {
    /// Creates an empty slot.
    pub fn new(name: &'static str) -> Self {
        Self { name, value: None }
    }

    /// Stores `value` unless the slot is already filled.
    ///
    /// # Returns
    ///
    /// `false` if an instance was already registered; the new value is dropped.
    pub fn register(&mut self, value: T) -> bool {
        if self.value.is_some() {
            error!(slot = self.name, "duplicate instance registered; keeping the first");
            return false;
        }
        self.value = Some(value);
        true
    }

    /// Returns true if the slot is filled.
    pub fn is_registered(&self) -> bool {
        self.value.is_some()
    }

    /// The registered instance.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The registered instance, mutably.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Empties the slot.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

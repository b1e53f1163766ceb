//! # Salmon Run - Fish Migration and Selection Simulation
//!
//! A turn-based ecological simulation. Each turn a generation of fish with a
//! two-locus diploid genome swims upstream along a navigation field toward the
//! spawning grounds. Dams and fishing towers remove fish with probabilities
//! that depend on their size phenotype, and the fish that arrive breed the
//! next generation.
//!
//! ## Features
//!
//! - Two-locus genome (sex, size) with Mendelian crossing
//! - Flow-field guided movement with an energy budget
//! - Dams, dam ladders, fishing towers and regulation towers
//! - Turn lifecycle with placement, run and summary phases
//! - Typed event subscriptions for viewers
//! - Save/load of navigation fields and parameters
//!
//! ## Core Modules
//!
//! - [`simulation::genome`] - Alleles, gene pairs and phenotypes
//! - [`simulation::reproduction`] - Founding and breeding generations
//! - [`simulation::field`] - Navigation field
//! - [`simulation::fish`] - Fish movement and energy
//! - [`simulation::gating`] - Dams and towers
//! - [`simulation::ecosystem`] - The simulation context and tick
//! - [`simulation::observer`] - Event subscriptions

/// Core simulation logic and data structures.
pub mod simulation {
    /// Single-instance slots for collaborators.
    pub mod context;
    /// The simulation context: lifecycle, tick and queries.
    pub mod ecosystem;
    /// Error type shared by the core.
    pub mod error;
    /// Ring buffer of recent events for display.
    pub mod event_log;
    /// Deferred state changes applied once per tick.
    pub mod events;
    /// Per-cell flow vectors and their persisted form.
    pub mod field;
    /// Individual fish.
    pub mod fish;
    /// Dams and towers.
    ///
    /// Every device implements [`gating::Gate`] and is stored as a
    /// [`gating::GatingDevice`] variant.
    pub mod gating;
    /// Two-locus genome and phenotypes.
    pub mod genome;
    /// Regions, distances and headings.
    pub mod geometric_utils;
    /// Phases, turn state and run summaries.
    pub mod lifecycle;
    /// Typed game events and subscriptions.
    pub mod observer;
    /// Simulation parameters.
    pub mod params;
    /// Placement sites and validity rules.
    pub mod placement;
    /// Founding and breeding of generations.
    pub mod reproduction;
    /// Population sets for one turn.
    pub mod school;
    /// KD-tree index for tower targeting.
    pub mod spatial;
    /// Wave spawning.
    pub mod spawner;
    /// Game speed.
    pub mod time;
}

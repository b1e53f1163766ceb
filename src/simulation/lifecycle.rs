//! Turn phases and per-turn generation state.

use serde::{Deserialize, Serialize};

use super::genome::{Genome, GenomeCensus};

/// Why the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The player quit.
    ManualQuit,
    /// No fish produced offspring.
    NoOffspring,
}

/// Phase of the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Before the first turn.
    Intro,
    /// The player places devices; nothing moves.
    Place,
    /// Fish are spawned and swim.
    Run,
    /// Results of the last run are on display.
    PostRunSummary,
    /// Terminal.
    End(EndReason),
}

impl Phase {
    /// Display name of the phase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro => "Intro",
            Self::Place => "Place",
            Self::Run => "Run",
            Self::PostRunSummary => "PostRunSummary",
            Self::End(_) => "End",
        }
    }

    /// Returns true if the lifecycle may move from `self` to `next`.
    ///
    /// `End` is reachable from every other phase and leads nowhere.
    pub fn can_transition_to(&self, next: &Phase) -> bool {
        match (self, next) {
            (Self::End(_), _) => false,
            (_, Self::End(_)) => true,
            (Self::Intro, Self::Place)
            | (Self::Place, Self::Run)
            | (Self::Run, Self::PostRunSummary | Self::Place)
            | (Self::PostRunSummary, Self::Place) => true,
            _ => false,
        }
    }

    /// Returns true for `End`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End(_))
    }
}

/// Turn counter and the generation waiting to spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnState {
    /// Current turn, starting at 1.
    pub turn: u32,
    /// Genomes the next run will spawn.
    pub pending: Vec<Genome>,
    /// Genomes `pending` was bred from; `None` for the founders.
    pub parents: Option<Vec<Genome>>,
    /// Current phase.
    pub phase: Phase,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            turn: 0,
            pending: Vec::new(),
            parents: None,
            phase: Phase::Intro,
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Turn the run belonged to.
    pub turn: u32,
    /// Phenotypes of the fish that reached the spawning grounds.
    pub parents: GenomeCensus,
    /// Phenotypes of the bred generation.
    pub offspring: GenomeCensus,
    /// Fish that reached the spawning grounds.
    pub survived: usize,
    /// Fish that died.
    pub died: usize,
    /// Fish removed by fishing towers.
    pub caught: usize,
    /// True if no offspring were produced.
    pub extinct: bool,
}

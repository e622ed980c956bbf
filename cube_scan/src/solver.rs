// THEORY:
// The solver is an external collaborator. This module only defines the seam:
// a trait that consumes a validated `SerializedState` and reports a move
// sequence, "already solved", or "unsolvable". The scanner never calls a solver
// with a state that failed hard validation; that gate lives in
// `ScanPipeline::handoff`.

use crate::core_modules::state_assembler::SerializedState;
use serde::{Deserialize, Serialize};

/// What a solver reports for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// Moves in standard notation, e.g. `["R", "U'", "F2"]`.
    Moves(Vec<String>),
    AlreadySolved,
    Unsolvable,
}

/// A move-solving algorithm.
pub trait CubeSolver {
    fn solve(&self, state: &SerializedState) -> SolveOutcome;
}

impl<F> CubeSolver for F
where
    F: Fn(&SerializedState) -> SolveOutcome,
{
    fn solve(&self, state: &SerializedState) -> SolveOutcome {
        self(state)
    }
}

//! Decoding oracle models back into piece placements

use crate::error::PuzzleError;
use crate::puzzle::{Board, Cell, Instance, Placement};
use crate::sat::{Assignment, VariableAllocator};
use serde::Serialize;

/// One solved board: for every piece, the placement the oracle chose, plus
/// the usable cells left visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    /// One placement per piece, indexed by piece.
    pub placements: Vec<Placement>,
    /// Index of the chosen placement within each piece's placement list.
    pub chosen: Vec<usize>,
    /// Usable cells covered by no piece, in row-major order.
    pub uncovered: Vec<Cell>,
}

impl Solution {
    /// Map a satisfying assignment back to placements.
    ///
    /// For each piece, the cells whose coverage propositions are true must
    /// exactly match one generated placement; any mismatch is a
    /// [`PuzzleError::DecodeInconsistency`] (unreachable for models of a
    /// correctly built theory, kept as a runtime assertion).
    pub fn decode(
        assignment: &Assignment,
        board: &Board,
        placements: &[Vec<Placement>],
        vars: &VariableAllocator,
    ) -> Result<Self, PuzzleError> {
        let truthy = |var: i32| assignment.get(&var).copied().unwrap_or(false);

        let mut decoded = Vec::with_capacity(placements.len());
        let mut chosen = Vec::with_capacity(placements.len());
        for (piece, piece_placements) in placements.iter().enumerate() {
            let covered: Vec<Cell> = board
                .all_cells()
                .filter(|&cell| truthy(vars.cover(piece, cell)))
                .collect();

            let index = piece_placements
                .iter()
                .position(|p| p.cells == covered)
                .ok_or_else(|| {
                    PuzzleError::DecodeInconsistency(format!(
                        "piece {} covers {} cell(s) matching no generated placement",
                        piece,
                        covered.len()
                    ))
                })?;
            decoded.push(piece_placements[index].clone());
            chosen.push(index);
        }

        let mut uncovered: Vec<Cell> = board.usable_cells();
        uncovered.retain(|&cell| decoded.iter().all(|p| !p.covers(cell)));

        Ok(Self {
            placements: decoded,
            chosen,
            uncovered,
        })
    }

    /// The piece covering a cell, if any.
    pub fn owner(&self, cell: Cell) -> Option<usize> {
        self.placements
            .iter()
            .position(|p| p.covers(cell))
    }

    /// Row-major owner map for rendering.
    pub fn owner_map(&self, board: &Board) -> Vec<Option<usize>> {
        board.all_cells().map(|c| self.owner(c)).collect()
    }

    /// Soundness assertions for a decoded model of the required theory:
    /// placements pairwise disjoint, exactly the target cells uncovered,
    /// every piece used exactly once (by construction of `placements`).
    pub fn validate(&self, board: &Board, instance: &Instance) -> Result<(), PuzzleError> {
        let covered: usize = self.placements.iter().map(|p| p.cells.len()).sum();
        let mut all_cells: Vec<Cell> = self
            .placements
            .iter()
            .flat_map(|p| p.cells.iter().copied())
            .collect();
        all_cells.sort();
        all_cells.dedup();
        if all_cells.len() != covered {
            return Err(PuzzleError::DecodeInconsistency(
                "placements overlap".into(),
            ));
        }
        if covered + instance.targets().len() != board.usable_count() {
            return Err(PuzzleError::DecodeInconsistency(format!(
                "{} cells covered, {} targets, {} usable",
                covered,
                instance.targets().len(),
                board.usable_count()
            )));
        }
        if self.uncovered != instance.targets() {
            return Err(PuzzleError::DecodeInconsistency(
                "uncovered cells differ from the instance targets".into(),
            ));
        }
        Ok(())
    }
}

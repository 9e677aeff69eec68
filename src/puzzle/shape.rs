//! Piece shapes in canonical orientation

use crate::error::PuzzleError;
use crate::puzzle::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A free polyomino: a named, connected set of unit cells in one canonical
/// orientation, normalized so the minimum row and column are zero.
///
/// Shapes are immutable once parsed. Rotations, reflections and
/// translations are handled downstream by the placement generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    name: String,
    cells: Vec<Cell>,
}

impl Shape {
    /// Validate and canonicalize a cell set: non-empty, duplicate-free,
    /// edge-connected; cells are shifted to the origin and sorted.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Result<Self, PuzzleError> {
        let name = name.into();
        if cells.is_empty() {
            return Err(PuzzleError::Instance(format!(
                "piece '{}' has no cells",
                name
            )));
        }

        let min_row = cells.iter().map(|c| c.row).min().unwrap_or(0);
        let min_col = cells.iter().map(|c| c.col).min().unwrap_or(0);
        let mut cells: Vec<Cell> = cells
            .into_iter()
            .map(|c| Cell::new(c.row - min_row, c.col - min_col))
            .collect();
        cells.sort();
        let before = cells.len();
        cells.dedup();
        if cells.len() != before {
            return Err(PuzzleError::Instance(format!(
                "piece '{}' lists the same cell twice",
                name
            )));
        }

        if !is_connected(&cells) {
            return Err(PuzzleError::Instance(format!(
                "piece '{}' is not edge-connected",
                name
            )));
        }

        Ok(Self { name, cells })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical cells, sorted row-major, anchored at the origin.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of unit cells in the piece.
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

/// Every cell reachable from any other via edge-adjacent cells of the set.
fn is_connected(cells: &[Cell]) -> bool {
    let set: HashSet<Cell> = cells.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut stack = vec![cells[0]];
    seen.insert(cells[0]);
    while let Some(cell) = stack.pop() {
        let mut neighbors = Vec::with_capacity(4);
        if cell.row > 0 {
            neighbors.push(Cell::new(cell.row - 1, cell.col));
        }
        if cell.col > 0 {
            neighbors.push(Cell::new(cell.row, cell.col - 1));
        }
        neighbors.push(Cell::new(cell.row + 1, cell.col));
        neighbors.push(Cell::new(cell.row, cell.col + 1));
        for n in neighbors {
            if set.contains(&n) && seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen.len() == cells.len()
}

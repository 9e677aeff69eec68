//! Board and instance representation

use crate::error::PuzzleError;
use crate::puzzle::Shape;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single board position, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The fixed playing field: an R×C rectangle where each cell is either
/// usable (and carries a label) or structurally blocked.
///
/// Boards are parsed once and never mutated; per-run data (the target
/// cells) lives in [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    /// Row-major cell contents; `None` marks a blocked cell.
    labels: Vec<Option<String>>,
}

impl Board {
    /// Build a board from row-major label data. `None` entries are blocked.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Result<Self, PuzzleError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(PuzzleError::Instance("board cannot be empty".into()));
        }
        let width = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PuzzleError::Instance(format!(
                    "board row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }
        let height = rows.len();
        let labels = rows.into_iter().flatten().collect();
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// True if the cell lies within the R×C bounds.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// True if the cell is in bounds and not structurally blocked.
    pub fn is_usable(&self, cell: Cell) -> bool {
        self.contains(cell) && self.labels[self.index(cell)].is_some()
    }

    /// The label shown in a usable cell, if any.
    pub fn label(&self, cell: Cell) -> Option<&str> {
        if !self.contains(cell) {
            return None;
        }
        self.labels[self.index(cell)].as_deref()
    }

    /// All cells of the rectangle in row-major order.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |r| (0..self.width).map(move |c| Cell::new(r, c)))
    }

    /// Usable cells in row-major order.
    pub fn usable_cells(&self) -> Vec<Cell> {
        self.all_cells().filter(|&c| self.is_usable(c)).collect()
    }

    /// Blocked cells in row-major order.
    pub fn blocked_cells(&self) -> Vec<Cell> {
        self.all_cells().filter(|&c| !self.is_usable(c)).collect()
    }

    pub fn usable_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Look up the unique cell carrying the given label, ignoring case.
    pub fn find_label(&self, label: &str) -> Option<Cell> {
        self.all_cells().find(|&c| {
            self.label(c)
                .is_some_and(|l| l.eq_ignore_ascii_case(label))
        })
    }
}

/// One concrete run of the puzzle: which usable cells must remain
/// uncovered once every piece is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    targets: Vec<Cell>,
}

impl Instance {
    /// Validate a target-cell set against the board and piece set.
    ///
    /// The instance contract: every target is usable, targets are distinct,
    /// and their number equals the usable area left over once all pieces
    /// are down (|usable| − Σ piece areas).
    pub fn new(board: &Board, shapes: &[Shape], mut targets: Vec<Cell>) -> Result<Self, PuzzleError> {
        for &t in &targets {
            if !board.is_usable(t) {
                return Err(PuzzleError::Instance(format!(
                    "target cell {} is outside the usable board area",
                    t
                )));
            }
        }
        targets.sort();
        targets.dedup();

        let covered: usize = shapes.iter().map(|s| s.area()).sum();
        let expected = board.usable_count().saturating_sub(covered);
        if board.usable_count() < covered || targets.len() != expected {
            return Err(PuzzleError::Configuration(format!(
                "{} target cell(s) supplied, but {} usable cells minus {} piece cells leaves {}",
                targets.len(),
                board.usable_count(),
                covered,
                board.usable_count() as isize - covered as isize,
            )));
        }
        Ok(Self { targets })
    }

    /// Resolve board labels (e.g. `SAT OCT 25`) into an instance.
    pub fn from_labels(board: &Board, shapes: &[Shape], labels: &[String]) -> Result<Self, PuzzleError> {
        let mut targets = Vec::with_capacity(labels.len());
        for label in labels {
            let cell = board.find_label(label).ok_or_else(|| {
                PuzzleError::Instance(format!("no board cell carries the label '{}'", label))
            })?;
            targets.push(cell);
        }
        Self::new(board, shapes, targets)
    }

    /// Target cells in canonical (row-major) order.
    pub fn targets(&self) -> &[Cell] {
        &self.targets
    }

    pub fn is_target(&self, cell: Cell) -> bool {
        self.targets.binary_search(&cell).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Shape;

    fn strip(width: usize) -> Board {
        let row = (0..width).map(|c| Some(format!("c{}", c))).collect();
        Board::from_rows(vec![row]).unwrap()
    }

    fn domino(name: &str) -> Shape {
        Shape::new(name, vec![Cell::new(0, 0), Cell::new(0, 1)]).unwrap()
    }

    #[test]
    fn test_board_construction() {
        let board = Board::from_rows(vec![
            vec![Some("A".into()), None],
            vec![Some("B".into()), Some("C".into())],
        ])
        .unwrap();
        assert_eq!(board.width, 2);
        assert_eq!(board.height, 2);
        assert_eq!(board.usable_count(), 3);
        assert!(board.is_usable(Cell::new(0, 0)));
        assert!(!board.is_usable(Cell::new(0, 1)));
        assert!(!board.is_usable(Cell::new(2, 0)));
        assert_eq!(board.blocked_cells(), vec![Cell::new(0, 1)]);
    }

    #[test]
    fn test_ragged_board_rejected() {
        let result = Board::from_rows(vec![
            vec![Some("A".into())],
            vec![Some("B".into()), Some("C".into())],
        ]);
        assert!(matches!(result, Err(PuzzleError::Instance(_))));
    }

    #[test]
    fn test_label_lookup_ignores_case() {
        let board = strip(3);
        assert_eq!(board.find_label("C1"), Some(Cell::new(0, 1)));
        assert_eq!(board.find_label("c1"), Some(Cell::new(0, 1)));
        assert_eq!(board.find_label("missing"), None);
    }

    #[test]
    fn test_instance_contract() {
        let board = strip(3);
        let shapes = vec![domino("d")];

        // 3 usable - 2 covered = exactly 1 target expected.
        let ok = Instance::new(&board, &shapes, vec![Cell::new(0, 2)]);
        assert!(ok.is_ok());

        let too_many = Instance::new(&board, &shapes, vec![Cell::new(0, 1), Cell::new(0, 2)]);
        assert!(matches!(too_many, Err(PuzzleError::Configuration(_))));

        let none = Instance::new(&board, &shapes, vec![]);
        assert!(matches!(none, Err(PuzzleError::Configuration(_))));
    }

    #[test]
    fn test_target_outside_usable_area() {
        let board = Board::from_rows(vec![vec![Some("A".into()), None, Some("B".into())]]).unwrap();
        let shapes = vec![Shape::new("u", vec![Cell::new(0, 0)]).unwrap()];
        let result = Instance::new(&board, &shapes, vec![Cell::new(0, 1)]);
        assert!(matches!(result, Err(PuzzleError::Instance(_))));
    }

    #[test]
    fn test_instance_from_labels() {
        let board = strip(4);
        let shapes = vec![domino("a")];
        let instance =
            Instance::from_labels(&board, &shapes, &["c3".into(), "c0".into()]).unwrap();
        assert_eq!(instance.targets(), &[Cell::new(0, 0), Cell::new(0, 3)]);
        assert!(instance.is_target(Cell::new(0, 3)));
        assert!(!instance.is_target(Cell::new(0, 1)));
    }
}

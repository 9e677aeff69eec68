//! Proposition numbering for the puzzle encoding

use crate::puzzle::{Board, Cell, Placement};

/// Bijects (piece, cell) and (piece, placement) pairs to dense, 1-based
/// proposition ids, stable for the lifetime of one run.
///
/// Coverage variables come first, piece-major, then row-major, then
/// column-major over the full R×C grid:
///
/// ```text
/// cover(k, r, c) = 1 + k·R·C + r·C + c
/// ```
///
/// Placement-selector variables follow the coverage block, piece-major
/// then in placement-generation order.
#[derive(Debug, Clone)]
pub struct VariableAllocator {
    width: usize,
    height: usize,
    pieces: usize,
    /// Per piece, the id of its first selector variable.
    selector_starts: Vec<i32>,
    total: usize,
}

impl VariableAllocator {
    pub fn new(board: &Board, placements: &[Vec<Placement>]) -> Self {
        let pieces = placements.len();
        let cover_count = pieces * board.cell_count();
        let mut selector_starts = Vec::with_capacity(pieces);
        let mut next = cover_count as i32 + 1;
        for piece_placements in placements {
            selector_starts.push(next);
            next += piece_placements.len() as i32;
        }
        Self {
            width: board.width,
            height: board.height,
            pieces,
            selector_starts,
            total: (next - 1) as usize,
        }
    }

    /// The proposition "piece `piece` covers `cell`".
    pub fn cover(&self, piece: usize, cell: Cell) -> i32 {
        debug_assert!(piece < self.pieces);
        debug_assert!(cell.row < self.height && cell.col < self.width);
        1 + (piece * self.height * self.width + cell.row * self.width + cell.col) as i32
    }

    /// The proposition "placement `index` is the one chosen for `piece`".
    pub fn selector(&self, piece: usize, index: usize) -> i32 {
        debug_assert!(piece < self.pieces);
        let var = self.selector_starts[piece] + index as i32;
        debug_assert!((var as usize) <= self.total);
        var
    }

    /// Number of coverage propositions (pieces × grid cells).
    pub fn cover_count(&self) -> usize {
        self.pieces * self.height * self.width
    }

    /// Total proposition count, selectors included.
    pub fn count(&self) -> usize {
        self.total
    }

    pub fn piece_count(&self) -> usize {
        self.pieces
    }

    /// Invert a coverage variable back to its (piece, cell) pair.
    pub fn decode_cover(&self, var: i32) -> Option<(usize, Cell)> {
        if var < 1 || var as usize > self.cover_count() {
            return None;
        }
        let idx = (var - 1) as usize;
        let per_piece = self.height * self.width;
        let piece = idx / per_piece;
        let rest = idx % per_piece;
        Some((piece, Cell::new(rest / self.width, rest % self.width)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{generate_placements, Board, Shape};

    fn setup() -> (Board, Vec<Vec<Placement>>) {
        let rows = (0..2)
            .map(|r| (0..3).map(|c| Some(format!("{}{}", r, c))).collect())
            .collect();
        let board = Board::from_rows(rows).unwrap();
        let shapes = vec![
            Shape::new("a", vec![Cell::new(0, 0), Cell::new(0, 1)]).unwrap(),
            Shape::new("b", vec![Cell::new(0, 0)]).unwrap(),
        ];
        let placements = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| generate_placements(i, s, &board))
            .collect();
        (board, placements)
    }

    #[test]
    fn test_cover_numbering_is_dense_and_one_based() {
        let (board, placements) = setup();
        let vars = VariableAllocator::new(&board, &placements);
        assert_eq!(vars.cover(0, Cell::new(0, 0)), 1);
        assert_eq!(vars.cover(0, Cell::new(0, 2)), 3);
        assert_eq!(vars.cover(0, Cell::new(1, 0)), 4);
        assert_eq!(vars.cover(1, Cell::new(0, 0)), 7);
        assert_eq!(vars.cover_count(), 12);
    }

    #[test]
    fn test_selectors_follow_cover_block() {
        let (board, placements) = setup();
        let vars = VariableAllocator::new(&board, &placements);
        assert_eq!(vars.selector(0, 0), 13);
        // A domino on a 2x3 board has 7 placements: 4 horizontal, 3 vertical.
        assert_eq!(placements[0].len(), 7);
        assert_eq!(vars.selector(1, 0), 13 + 7);
        assert_eq!(vars.count(), 12 + 7 + 6);
    }

    #[test]
    fn test_decode_cover_inverts_numbering() {
        let (board, placements) = setup();
        let vars = VariableAllocator::new(&board, &placements);
        for piece in 0..2 {
            for cell in board.all_cells() {
                let var = vars.cover(piece, cell);
                assert_eq!(vars.decode_cover(var), Some((piece, cell)));
            }
        }
        assert_eq!(vars.decode_cover(0), None);
        assert_eq!(vars.decode_cover(vars.cover_count() as i32 + 1), None);
    }
}

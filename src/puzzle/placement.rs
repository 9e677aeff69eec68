//! Placement generation: every legal way a piece can land on the board

use crate::puzzle::{Board, Cell, Shape};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One board-anchored occupancy of a piece: the result of applying one
/// symmetry transform and one translation to its canonical shape.
///
/// The cell set is sorted row-major and appears at most once in the
/// placement list of its piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub piece: usize,
    pub cells: Vec<Cell>,
}

impl Placement {
    pub fn covers(&self, cell: Cell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }
}

/// The distinct fixed variants of a free polyomino: its images under the
/// 8 symmetries of the dihedral group, normalized to the origin and
/// deduplicated (symmetric pieces have fewer than 8).
///
/// Transform order is fixed (identity, then quarter turns, then the same
/// for the reflected piece) so the surviving variants, and therefore all
/// downstream variable numbering, are reproducible.
pub fn fixed_variants(shape: &Shape) -> Vec<Vec<Cell>> {
    let base: Vec<(isize, isize)> = shape
        .cells()
        .iter()
        .map(|c| (c.row as isize, c.col as isize))
        .collect();
    // Reflection around the diagonal; together with the four rotations this
    // spans the whole symmetry group.
    let flipped: Vec<(isize, isize)> = base.iter().map(|&(r, c)| (c, r)).collect();

    let mut variants = Vec::new();
    let mut seen: HashSet<Vec<Cell>> = HashSet::new();
    for side in [&base, &flipped] {
        let mut cells = side.clone();
        for _ in 0..4 {
            let normalized = normalize(&cells);
            if seen.insert(normalized.clone()) {
                variants.push(normalized);
            }
            // Quarter turn: (r, c) -> (c, -r).
            cells = cells.iter().map(|&(r, c)| (c, -r)).collect();
        }
    }
    variants
}

fn normalize(cells: &[(isize, isize)]) -> Vec<Cell> {
    let min_r = cells.iter().map(|&(r, _)| r).min().unwrap_or(0);
    let min_c = cells.iter().map(|&(_, c)| c).min().unwrap_or(0);
    let mut out: Vec<Cell> = cells
        .iter()
        .map(|&(r, c)| Cell::new((r - min_r) as usize, (c - min_c) as usize))
        .collect();
    out.sort();
    out
}

/// Enumerate every distinct legal placement of `shape` on `board`.
///
/// Each fixed variant is slid across the grid row-major then column-major;
/// a translation survives only if every cell lands on a usable board cell.
/// Placements are deduplicated by exact cell-set equality.
pub fn generate_placements(piece: usize, shape: &Shape, board: &Board) -> Vec<Placement> {
    let variants = fixed_variants(shape);
    let mut placements = Vec::new();
    let mut seen: HashSet<Vec<Cell>> = HashSet::new();

    for variant in &variants {
        for dr in 0..board.height {
            for dc in 0..board.width {
                let translated: Vec<Cell> = variant
                    .iter()
                    .map(|c| Cell::new(c.row + dr, c.col + dc))
                    .collect();
                if translated.iter().all(|&c| board.is_usable(c)) && seen.insert(translated.clone())
                {
                    placements.push(Placement {
                        piece,
                        cells: translated,
                    });
                }
            }
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::io::{default_board, default_shapes};

    fn shape(name: &str, cells: &[(usize, usize)]) -> Shape {
        Shape::new(name, cells.iter().map(|&(r, c)| Cell::new(r, c)).collect()).unwrap()
    }

    fn open_board(height: usize, width: usize) -> Board {
        let rows = (0..height)
            .map(|r| (0..width).map(|c| Some(format!("{}:{}", r, c))).collect())
            .collect();
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn test_domino_has_two_variants() {
        let variants = fixed_variants(&shape("d", &[(0, 0), (0, 1)]));
        assert_eq!(variants.len(), 2); // horizontal and vertical
    }

    #[test]
    fn test_square_is_fully_symmetric() {
        let variants = fixed_variants(&shape("o", &[(0, 0), (0, 1), (1, 0), (1, 1)]));
        assert_eq!(variants.len(), 1);
    }

    #[test]
    fn test_l_tromino_has_four_variants() {
        let variants = fixed_variants(&shape("v", &[(0, 0), (1, 0), (1, 1)]));
        assert_eq!(variants.len(), 4);
    }

    #[test]
    fn test_default_piece_symmetry_profile() {
        // The standard 10-piece set collapses from 80 potential images to
        // 54 distinct fixed variants.
        let shapes = default_shapes().unwrap();
        let counts: Vec<(String, usize)> = shapes
            .iter()
            .map(|s| (s.name().to_string(), fixed_variants(s).len()))
            .collect();
        let expected = [
            ("L", 4),
            ("T", 4),
            ("Z", 4),
            ("R", 8),
            ("J", 8),
            ("P", 8),
            ("C", 4),
            ("r", 8),
            ("g", 4),
            ("i", 2),
        ];
        for ((name, count), (exp_name, exp_count)) in counts.iter().zip(expected.iter()) {
            assert_eq!(name, exp_name);
            assert_eq!(count, exp_count, "variant count for piece {}", name);
        }
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 54);
    }

    #[test]
    fn test_domino_on_row_of_four() {
        // The literal reference scenario: a 1x4 strip admits exactly the
        // translations {0,1}, {1,2}, {2,3}.
        let board = open_board(1, 4);
        let placements = generate_placements(0, &shape("d", &[(0, 0), (0, 1)]), &board);
        let cell_sets: Vec<Vec<(usize, usize)>> = placements
            .iter()
            .map(|p| p.cells.iter().map(|c| (c.row, c.col)).collect())
            .collect();
        assert_eq!(
            cell_sets,
            vec![
                vec![(0, 0), (0, 1)],
                vec![(0, 1), (0, 2)],
                vec![(0, 2), (0, 3)],
            ]
        );
    }

    #[test]
    fn test_placements_respect_blocked_cells() {
        let board = Board::from_rows(vec![vec![
            Some("a".into()),
            Some("b".into()),
            None,
            Some("c".into()),
        ]])
        .unwrap();
        let placements = generate_placements(0, &shape("d", &[(0, 0), (0, 1)]), &board);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].cells, vec![Cell::new(0, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn test_placement_properties_hold_on_default_puzzle() {
        let board = default_board().unwrap();
        let shapes = default_shapes().unwrap();
        for (idx, s) in shapes.iter().enumerate() {
            let placements = generate_placements(idx, s, &board);
            assert!(!placements.is_empty());
            for p in &placements {
                assert_eq!(p.cells.len(), s.area());
                assert!(p.cells.iter().all(|&c| board.is_usable(c)));
                // Congruence: the normalized cell set is one of the piece's
                // fixed variants.
                let normalized: Vec<Cell> = {
                    let min_r = p.cells.iter().map(|c| c.row).min().unwrap();
                    let min_c = p.cells.iter().map(|c| c.col).min().unwrap();
                    p.cells
                        .iter()
                        .map(|c| Cell::new(c.row - min_r, c.col - min_c))
                        .collect()
                };
                assert!(fixed_variants(s).contains(&normalized));
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let board = open_board(3, 3);
        let s = shape("v", &[(0, 0), (1, 0), (1, 1)]);
        let first = generate_placements(0, &s, &board);
        let second = generate_placements(0, &s, &board);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_placement_set_is_valid() {
        let board = open_board(1, 2);
        let placements = generate_placements(0, &shape("t", &[(0, 0), (0, 1), (0, 2)]), &board);
        assert!(placements.is_empty());
    }
}

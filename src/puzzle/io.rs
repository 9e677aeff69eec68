//! Text grammar for boards and piece sets

use crate::error::PuzzleError;
use crate::puzzle::{Board, Cell, Shape};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// The standard calendar board: 7×8 with 6 blocked corners, 50 labeled
/// cells (12 months, 31 day numbers, 7 weekdays).
pub const DEFAULT_BOARD: &str = "\
JAN FEB MAR APR MAY JUN X
JUL AUG SEP OCT NOV DEC X
1   2   3   4   5   6   7
8   9   10  11  12  13  14
15  16  17  18  19  20  21
22  23  24  25  26  27  28
29  30  31  SUN MON TUE WED
X   X   X   X   THU FRI SAT
";

/// The standard piece set: 7 pentominoes and 3 tetrominoes, 47 cells total.
pub const DEFAULT_PIECES: &str = "\
L
#..
#..
###

T
###
.#.
.#.

Z
##.
.#.
.##

R
##
#.
#.
#.

J
#.
##
.#
.#

P
##
##
#.

C
##
#.
##

r
##
#.
#.

g
#.
##
.#

i
#
#
#
#
";

/// Parse a board: one line per row, whitespace-separated label tokens,
/// `X` marking a structurally blocked cell. All rows must have the same
/// number of tokens.
pub fn parse_board(text: &str) -> Result<Board, PuzzleError> {
    let rows: Vec<Vec<Option<String>>> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|line| {
            line.split_whitespace()
                .map(|tok| {
                    if tok == "X" {
                        None
                    } else {
                        Some(tok.to_string())
                    }
                })
                .collect()
        })
        .collect();
    Board::from_rows(rows)
}

/// Parse a piece set: blocks separated by blank lines, each block a name
/// line followed by rows of `#` (cell) and `.` (gap). Names must be unique.
pub fn parse_shapes(text: &str) -> Result<Vec<Shape>, PuzzleError> {
    let mut shapes = Vec::new();
    let mut names = HashSet::new();

    for block in text.split("\n\n") {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        if lines.is_empty() {
            continue;
        }
        let name = lines[0].trim();
        if name.contains(char::is_whitespace) || name.chars().any(|c| c == '#' || c == '.') {
            return Err(PuzzleError::Instance(format!(
                "piece name '{}' is not a single plain token",
                name
            )));
        }
        if !names.insert(name.to_string()) {
            return Err(PuzzleError::Instance(format!(
                "duplicate piece name '{}'",
                name
            )));
        }
        if lines.len() < 2 {
            return Err(PuzzleError::Instance(format!(
                "piece '{}' has no cell rows",
                name
            )));
        }

        let mut cells = Vec::new();
        for (row, line) in lines[1..].iter().enumerate() {
            for (col, ch) in line.trim().chars().enumerate() {
                match ch {
                    '#' => cells.push(Cell::new(row, col)),
                    '.' => {}
                    other => {
                        return Err(PuzzleError::Instance(format!(
                            "piece '{}': unexpected character '{}' in row {}",
                            name, other, row
                        )))
                    }
                }
            }
        }
        shapes.push(Shape::new(name, cells)?);
    }

    if shapes.is_empty() {
        return Err(PuzzleError::Instance("piece set is empty".into()));
    }
    Ok(shapes)
}

/// The built-in calendar board.
pub fn default_board() -> Result<Board, PuzzleError> {
    parse_board(DEFAULT_BOARD)
}

/// The built-in 10-piece set.
pub fn default_shapes() -> Result<Vec<Shape>, PuzzleError> {
    parse_shapes(DEFAULT_PIECES)
}

/// Load a board description from a text file.
pub fn load_board_from_file<P: AsRef<Path>>(path: P) -> Result<Board> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read board file: {}", path.as_ref().display()))?;
    parse_board(&content)
        .with_context(|| format!("failed to parse board file: {}", path.as_ref().display()))
}

/// Load a piece set from a text file.
pub fn load_shapes_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Shape>> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read pieces file: {}", path.as_ref().display()))?;
    parse_shapes(&content)
        .with_context(|| format!("failed to parse pieces file: {}", path.as_ref().display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_board_shape() {
        let board = default_board().unwrap();
        assert_eq!(board.width, 7);
        assert_eq!(board.height, 8);
        assert_eq!(board.usable_count(), 50);
        assert_eq!(board.blocked_cells().len(), 6);
    }

    #[test]
    fn test_default_board_labels() {
        let board = default_board().unwrap();
        assert_eq!(board.find_label("JAN"), Some(Cell::new(0, 0)));
        assert_eq!(board.find_label("oct"), Some(Cell::new(1, 3)));
        assert_eq!(board.find_label("25"), Some(Cell::new(5, 3)));
        assert_eq!(board.find_label("SAT"), Some(Cell::new(7, 6)));
        assert_eq!(board.find_label("X"), None);
    }

    #[test]
    fn test_default_pieces() {
        let shapes = default_shapes().unwrap();
        assert_eq!(shapes.len(), 10);
        let total: usize = shapes.iter().map(|s| s.area()).sum();
        assert_eq!(total, 47);
        assert_eq!(shapes[0].name(), "L");
        assert_eq!(shapes[0].area(), 5);
        assert_eq!(shapes[9].name(), "i");
        assert_eq!(shapes[9].area(), 4);
    }

    #[test]
    fn test_parse_board_rejects_ragged_rows() {
        let result = parse_board("A B C\nD E\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_shapes_rejects_duplicates() {
        let result = parse_shapes("A\n##\n\nA\n#\n#\n");
        assert!(matches!(result, Err(PuzzleError::Instance(_))));
    }

    #[test]
    fn test_parse_shapes_rejects_garbage() {
        let result = parse_shapes("A\n#?\n");
        assert!(matches!(result, Err(PuzzleError::Instance(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let board_path = dir.path().join("board.txt");
        std::fs::write(&board_path, DEFAULT_BOARD).unwrap();
        let board = load_board_from_file(&board_path).unwrap();
        assert_eq!(board, default_board().unwrap());
    }
}

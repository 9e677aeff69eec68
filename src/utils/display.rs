//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::puzzle::{Board, Cell};
use crate::solve::Solution;
use anyhow::Result;
use std::path::Path;

/// Connector glyphs at grid crossings, indexed by a 4-bit mask of which
/// adjacent cell pairs around the crossing belong to the same region.
const CONNECTORS: [char; 16] = [
    '╋', '┣', '┻', '┗', '┫', '┃', '┛', '╹', '┳', '┏', '━', '╺', '┓', '╻', '╸', ' ',
];

/// Contiguous region a grid position belongs to when drawing borders.
/// Everything outside the board and every blocked cell merge into one
/// surrounding frame; each uncovered cell stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Frame,
    Piece(usize),
    Uncovered(usize, usize),
}

/// Draws a solved board as box-drawing art: pieces interlock as outlined
/// areas, uncovered cells keep their labels visible.
pub struct BoardRenderer<'a> {
    board: &'a Board,
    owners: Vec<Option<usize>>,
}

impl<'a> BoardRenderer<'a> {
    pub fn new(board: &'a Board, solution: &Solution) -> Self {
        Self {
            board,
            owners: solution.owner_map(board),
        }
    }

    fn region(&self, row: isize, col: isize) -> Region {
        if row < 0 || col < 0 || row >= self.board.height as isize || col >= self.board.width as isize
        {
            return Region::Frame;
        }
        let cell = Cell::new(row as usize, col as usize);
        if !self.board.is_usable(cell) {
            return Region::Frame;
        }
        match self.owners[row as usize * self.board.width + col as usize] {
            Some(piece) => Region::Piece(piece),
            None => Region::Uncovered(cell.row, cell.col),
        }
    }

    fn same_region(&self, a: (isize, isize), b: (isize, isize)) -> bool {
        self.region(a.0, a.1) == self.region(b.0, b.1)
    }

    /// The crossing at (i, j) touches four cells; each of the four adjacent
    /// pairs around it either joins (same region, no border) or separates.
    fn connector(&self, i: isize, j: isize) -> char {
        let pairs = [
            ((i, j - 1), (i - 1, j - 1)),
            ((i, j), (i, j - 1)),
            ((i - 1, j), (i, j)),
            ((i - 1, j - 1), (i - 1, j)),
        ];
        let mut index = 0;
        for (bit, (a, b)) in pairs.into_iter().enumerate() {
            if self.same_region(a, b) {
                index |= 1 << bit;
            }
        }
        CONNECTORS[index]
    }

    /// Cell interiors are blank except for uncovered cells, which show
    /// their board label right-aligned in the 3-column interior.
    fn cell_text(&self, row: usize, col: usize) -> String {
        let cell = Cell::new(row, col);
        if self.board.is_usable(cell) && self.owners[row * self.board.width + col].is_none() {
            format!("{:>3}", self.board.label(cell).unwrap_or(""))
        } else {
            "   ".to_string()
        }
    }

    pub fn render(&self) -> String {
        let height = self.board.height as isize;
        let width = self.board.width as isize;
        let mut out = String::new();

        for i in 0..=height {
            // Horizontal chrome: connectors and row borders.
            for j in 0..=width {
                out.push(self.connector(i, j));
                if j < width {
                    out.push_str(if self.same_region((i - 1, j), (i, j)) {
                        "   "
                    } else {
                        "━━━"
                    });
                }
            }
            out.push('\n');

            // Cell row: column borders and interiors.
            if i < height {
                for j in 0..=width {
                    out.push(if self.same_region((i, j - 1), (i, j)) {
                        ' '
                    } else {
                        '┃'
                    });
                    if j < width {
                        out.push_str(&self.cell_text(i as usize, j as usize));
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(board: &Board, solution: &Solution, index: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!("Solution #{}:\n", index));
        output.push_str(&BoardRenderer::new(board, solution).render());
        output
    }

    /// One line per piece: its name and the cells it covers.
    pub fn format_placements(
        board: &Board,
        piece_names: &[String],
        solution: &Solution,
    ) -> String {
        let mut output = String::new();
        for (piece, placement) in solution.placements.iter().enumerate() {
            let cells: Vec<String> = placement.cells.iter().map(Cell::to_string).collect();
            output.push_str(&format!("{}: {}\n", piece_names[piece], cells.join(" ")));
        }
        if !solution.uncovered.is_empty() {
            let holes: Vec<String> = solution
                .uncovered
                .iter()
                .map(|&c| board.label(c).unwrap_or("?").to_string())
                .collect();
            output.push_str(&format!("uncovered: {}\n", holes.join(" ")));
        }
        output
    }

    /// Save solutions to files based on output format
    pub fn save_solutions<P: AsRef<Path>>(
        board: &Board,
        solutions: &[Solution],
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                for (i, solution) in solutions.iter().enumerate() {
                    let filepath = output_dir.join(format!("solution_{:03}.txt", i + 1));
                    std::fs::write(filepath, Self::format_solution(board, solution, i + 1))?;
                }
            }
            OutputFormat::Json => {
                for (i, solution) in solutions.iter().enumerate() {
                    let filepath = output_dir.join(format!("solution_{:03}.json", i + 1));
                    std::fs::write(filepath, serde_json::to_string_pretty(solution)?)?;
                }
            }
        }
        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{generate_placements, Instance, Placement, Shape};

    fn labeled_board(rows: Vec<Vec<&str>>) -> Board {
        Board::from_rows(
            rows.into_iter()
                .map(|r| {
                    r.into_iter()
                        .map(|s| if s == "X" { None } else { Some(s.to_string()) })
                        .collect()
                })
                .collect(),
        )
        .unwrap()
    }

    fn solved(board: &Board, shapes: &[Shape]) -> Solution {
        let placements: Vec<Vec<Placement>> = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| generate_placements(i, s, board))
            .collect();
        // Every shape fits in exactly one way in these fixtures.
        Solution {
            placements: placements.iter().map(|ps| ps[0].clone()).collect(),
            chosen: vec![0; shapes.len()],
            uncovered: vec![],
        }
    }

    #[test]
    fn test_single_domino_outline() {
        let board = labeled_board(vec![vec!["a", "b"]]);
        let shape = Shape::new("d", vec![Cell::new(0, 0), Cell::new(0, 1)]).unwrap();
        let solution = solved(&board, std::slice::from_ref(&shape));

        let rendered = BoardRenderer::new(&board, &solution).render();
        assert_eq!(rendered, "┏━━━━━━━┓\n┃       ┃\n┗━━━━━━━┛\n");
    }

    #[test]
    fn test_adjacent_pieces_are_separated() {
        let board = labeled_board(vec![vec!["a", "b"]]);
        let shapes = vec![
            Shape::new("p", vec![Cell::new(0, 0)]).unwrap(),
            Shape::new("q", vec![Cell::new(0, 0)]).unwrap(),
        ];
        let placements: Vec<Vec<Placement>> = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| generate_placements(i, s, &board))
            .collect();
        let solution = Solution {
            placements: vec![placements[0][0].clone(), placements[1][1].clone()],
            chosen: vec![0, 1],
            uncovered: vec![],
        };

        let rendered = BoardRenderer::new(&board, &solution).render();
        assert_eq!(rendered, "┏━━━┳━━━┓\n┃   ┃   ┃\n┗━━━┻━━━┛\n");
    }

    #[test]
    fn test_uncovered_cell_shows_label() {
        let board = labeled_board(vec![vec!["25"]]);
        let solution = Solution {
            placements: vec![],
            chosen: vec![],
            uncovered: vec![Cell::new(0, 0)],
        };

        let rendered = BoardRenderer::new(&board, &solution).render();
        assert_eq!(rendered, "┏━━━┓\n┃ 25┃\n┗━━━┛\n");
    }

    #[test]
    fn test_blocked_cells_merge_with_frame() {
        // Blocked right cell joins the outside frame, so no border is
        // drawn between them.
        let board = labeled_board(vec![vec!["a", "X"]]);
        let shape = Shape::new("p", vec![Cell::new(0, 0)]).unwrap();
        let solution = solved(&board, std::slice::from_ref(&shape));

        let rendered = BoardRenderer::new(&board, &solution).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].trim_end(), "┏━━━┓");
        assert_eq!(lines[1].trim_end(), "┃   ┃");
        assert_eq!(lines[2].trim_end(), "┗━━━┛");
    }

    #[test]
    fn test_placement_listing() {
        let board = labeled_board(vec![vec!["a", "b", "c"]]);
        let shape = Shape::new("d", vec![Cell::new(0, 0), Cell::new(0, 1)]).unwrap();
        let shapes = vec![shape];
        let instance = Instance::new(&board, &shapes, vec![Cell::new(0, 2)]).unwrap();
        let solution = Solution {
            placements: vec![generate_placements(0, &shapes[0], &board)[0].clone()],
            chosen: vec![0],
            uncovered: instance.targets().to_vec(),
        };

        let listing =
            SolutionFormatter::format_placements(&board, &["d".to_string()], &solution);
        assert_eq!(listing, "d: (0,0) (0,1)\nuncovered: c\n");
    }

    #[test]
    fn test_save_solutions_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let board = labeled_board(vec![vec!["a", "b"]]);
        let shape = Shape::new("d", vec![Cell::new(0, 0), Cell::new(0, 1)]).unwrap();
        let solution = solved(&board, std::slice::from_ref(&shape));

        SolutionFormatter::save_solutions(&board, &[solution.clone()], dir.path(), &OutputFormat::Text)
            .unwrap();
        assert!(dir.path().join("solution_001.txt").exists());

        SolutionFormatter::save_solutions(&board, &[solution], dir.path(), &OutputFormat::Json)
            .unwrap();
        let json = std::fs::read_to_string(dir.path().join("solution_001.json")).unwrap();
        assert!(json.contains("placements"));
    }
}

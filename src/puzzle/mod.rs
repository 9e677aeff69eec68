//! Puzzle model: board, pieces, and placement generation

pub mod board;
pub mod io;
pub mod placement;
pub mod shape;

pub use board::{Board, Cell, Instance};
pub use io::{
    default_board, default_shapes, load_board_from_file, load_shapes_from_file, DEFAULT_BOARD,
    DEFAULT_PIECES,
};
pub use placement::{fixed_variants, generate_placements, Placement};
pub use shape::Shape;

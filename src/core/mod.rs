//! Simulation core: deterministic, frontend-agnostic

pub mod cue;
pub mod game;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use cue::{Cue, CueSink};
pub use game::Game;
pub use grid::Grid;
pub use pieces::Piece;

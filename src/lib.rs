//! Cubetris: a 4x4x12 falling-tetracube puzzle
//!
//! `core` is the deterministic simulation; `input` and `term` adapt it to a
//! crossterm terminal.

pub mod core;
pub mod input;
pub mod term;
pub mod types;

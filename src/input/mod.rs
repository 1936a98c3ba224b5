//! Keyboard adaptation for the terminal frontend

pub mod map;

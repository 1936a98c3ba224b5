//! Terminal rendering

pub mod view;

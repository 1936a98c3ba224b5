//! Core types shared across the application
//! This module contains pure data types with no external dependencies

/// Grid dimensions. `z` increases downward; `z < 0` is above the visible grid.
pub const GRID_WIDTH: usize = 4;
pub const GRID_DEPTH: usize = 4;
pub const GRID_HEIGHT: usize = 12;
pub const LAYER_CELLS: usize = GRID_WIDTH * GRID_DEPTH;
pub const GRID_CELLS: usize = LAYER_CELLS * GRID_HEIGHT;

/// Simulation rate the tick scheduler is calibrated against.
pub const FPS: f64 = 60.0;

/// Upcoming pieces shown to the player; the queue refills above this mark.
pub const NEXT_PIECE_COUNT: usize = 5;

/// Multiplier buffer tuning.
pub const MULT_BUFFER_SIZE: f64 = 0.4;
pub const MULT_BUFFER_DRAIN_COEFFICIENT: f64 = 0.014;
pub const MULT_DRAIN_COEFFICIENT: f64 = 1.8;

/// Plane clear awards, indexed by planes removed in one sweep.
pub const PLANE_SCORE_BONUSES: [f64; 5] = [0.0, 100.0, 250.0, 500.0, 1000.0];
pub const PLANE_MULT_BONUSES: [f64; 5] = [0.0, 0.15, 0.32, 0.5, 0.7];
/// Spin variants scale the table entries instead of using their own table.
pub const SPIN_SCORE_FACTOR: f64 = 3.0;
pub const SPIN_MULT_FACTOR: f64 = 2.0;

/// Selectable starting level range on the home screen.
pub const MIN_INITIAL_LEVEL: u32 = 1;
pub const MAX_INITIAL_LEVEL: u32 = 40;

/// Tetracube piece kinds. Y and the chiral pair are mirror forms that no
/// rotation maps onto each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    L,
    Z,
    T,
    Y,
    ChiralA,
    ChiralB,
}

impl PieceKind {
    pub const ALL: [PieceKind; 8] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::L,
        PieceKind::Z,
        PieceKind::T,
        PieceKind::Y,
        PieceKind::ChiralA,
        PieceKind::ChiralB,
    ];

    /// Grid cell code for a locked cube of this kind (1-based).
    pub fn code(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::Z => 4,
            PieceKind::T => 5,
            PieceKind::Y => 6,
            PieceKind::ChiralA => 7,
            PieceKind::ChiralB => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::L => "L",
            PieceKind::Z => "Z",
            PieceKind::T => "T",
            PieceKind::Y => "Y",
            PieceKind::ChiralA => "cA",
            PieceKind::ChiralB => "cB",
        }
    }
}

/// One grid cell. Secluded cells are unreachable pockets; they never block
/// movement and never complete a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Secluded,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// Top-level game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Home,
    Playing,
    Paused,
    Finished,
}

/// The seven repeating inputs, in hold-timer slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCode {
    MoveRight,
    MoveBack,
    MoveLeft,
    MoveFront,
    ViewCw,
    ViewCcw,
    Lower,
}

impl InputCode {
    pub const ALL: [InputCode; 7] = [
        InputCode::MoveRight,
        InputCode::MoveBack,
        InputCode::MoveLeft,
        InputCode::MoveFront,
        InputCode::ViewCw,
        InputCode::ViewCcw,
        InputCode::Lower,
    ];

    /// Hold-timer slot for this input.
    pub fn slot(self) -> usize {
        match self {
            InputCode::MoveRight => 0,
            InputCode::MoveBack => 1,
            InputCode::MoveLeft => 2,
            InputCode::MoveFront => 3,
            InputCode::ViewCw => 4,
            InputCode::ViewCcw => 5,
            InputCode::Lower => 6,
        }
    }
}

/// Abstract input alphabet consumed by the orchestrator. The frontend maps
/// raw key events onto these; tests feed them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(InputCode),
    Released(InputCode),
    ModifierPressed,
    ModifierReleased,
    Hold,
    PauseToggle,
}

//! Crossterm view: depth slices of the grid plus a status panel
//!
//! The grid is drawn as four vertical slices, nearest to the viewer first,
//! re-oriented whenever the view rotates. The active piece is `#`, its
//! ghost `+`, secluded pockets `.` and locked cubes keep their kind letter.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::core::game::Game;
use crate::core::grid::face_cell;
use crate::core::pieces::Piece;
use crate::types::{Cell, Mode, PieceKind, GRID_DEPTH, GRID_HEIGHT, GRID_WIDTH};

const PANEL_COLUMN: usize = 30;

fn kind_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::I => 'I',
        PieceKind::O => 'O',
        PieceKind::L => 'L',
        PieceKind::Z => 'Z',
        PieceKind::T => 'T',
        PieceKind::Y => 'Y',
        PieceKind::ChiralA => 'A',
        PieceKind::ChiralB => 'B',
    }
}

fn piece_covers(piece: &Piece, x: i32, y: i32, z: i32) -> bool {
    piece.contains_cube([x, y, z])
}

fn cell_char(game: &Game, x: i32, y: i32, z: i32) -> char {
    if game.mode() != Mode::Finished {
        if piece_covers(game.current_piece(), x, y, z) {
            return '#';
        }
        if piece_covers(game.ghost_piece(), x, y, z) {
            return '+';
        }
    }
    match game.grid().cell(x, y, z) {
        Some(Cell::Filled(kind)) => kind_char(kind),
        Some(Cell::Secluded) => '.',
        _ => ' ',
    }
}

/// One text line per grid layer, slices left to right from near to far.
pub fn render_grid_lines(game: &Game) -> Vec<String> {
    let rot = game.grid_rotation();
    let mut lines = Vec::with_capacity(GRID_HEIGHT + 1);
    let mut header = String::new();
    for b in 0..GRID_DEPTH {
        header.push_str(&format!("{:<4}  ", format!("d{b}")));
    }
    lines.push(header.trim_end().to_string());
    for z in 0..GRID_HEIGHT as i32 {
        let mut line = String::new();
        for b in 0..GRID_DEPTH as i32 {
            for a in 0..GRID_WIDTH as i32 {
                let (x, y) = face_cell(rot, a, b);
                line.push(cell_char(game, x, y, z));
            }
            line.push_str("  ");
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

fn panel_lines(game: &Game) -> Vec<String> {
    let p = game.progression();
    let stats = p.stats();
    let upcoming: Vec<&str> = game.upcoming().map(|k| k.as_str()).collect();
    let held = game
        .held_piece()
        .map(|piece| piece.kind.as_str())
        .unwrap_or("-");
    let mut lines = vec![
        format!("SCORE  {:>10}", p.score().floor() as i64),
        format!("LEVEL  {:>4}", p.level()),
        format!("MULT   x{:.2} (cap x{:.2})", p.multiplier(), p.multiplier_cap()),
        format!("BEST   x{:.2}", p.highest_multiplier()),
        String::new(),
        format!("NEXT   {}", upcoming.join(" ")),
        format!("HOLD   {held}"),
        format!("VIEW   {}", game.grid_rotation()),
        format!("POCKETS {}", game.secluded_count()),
        String::new(),
        format!(
            "PLANES {}  [{} {} {} {}]",
            stats.total_planes,
            stats.plane_clears[0],
            stats.plane_clears[1],
            stats.plane_clears[2],
            stats.plane_clears[3]
        ),
        format!(
            "SPINS  {}  [{} {} {}]",
            stats.total_spins,
            stats.spin_clears[0],
            stats.spin_clears[1],
            stats.spin_clears[2]
        ),
    ];
    match game.mode() {
        Mode::Paused => lines.push("** PAUSED (Esc resume, Shift+Esc menu) **".into()),
        Mode::Finished if !game.modifier_down() => {
            lines.push("** GAME OVER (Shift inspects, Esc menu) **".into())
        }
        _ => {}
    }
    lines
}

fn home_lines(game: &Game) -> Vec<String> {
    vec![
        "C U B E T R I S".into(),
        String::new(),
        format!("   starting level: {:>2}", game.initial_level()),
        String::new(),
        "   D/A  level +1/-1".into(),
        "   W/S  level +10/-10".into(),
        "   SPACE  start".into(),
        "   Q  quit".into(),
        String::new(),
        "   in game: WASD move, K/L turn view,".into(),
        "   Shift+move spin, Space drop, E hold".into(),
    ]
}

/// Full frame as text lines; pure so tests can look at it.
pub fn render_lines(game: &Game) -> Vec<String> {
    if game.mode() == Mode::Home {
        return home_lines(game);
    }
    let grid = render_grid_lines(game);
    let panel = panel_lines(game);
    let rows = grid.len().max(panel.len());
    let mut lines = Vec::with_capacity(rows);
    for n in 0..rows {
        let left = grid.get(n).map(String::as_str).unwrap_or("");
        let right = panel.get(n).map(String::as_str).unwrap_or("");
        if right.is_empty() {
            lines.push(left.to_string());
        } else {
            lines.push(format!("{left:<PANEL_COLUMN$}{right}"));
        }
    }
    lines
}

pub struct TerminalView {
    out: Stdout,
}

impl TerminalView {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(TerminalView { out })
    }

    pub fn exit(&mut self) -> io::Result<()> {
        execute!(self.out, Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }

    pub fn draw(&mut self, game: &Game) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        for (row, line) in render_lines(game).iter().enumerate() {
            queue!(self.out, MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush()
    }
}

//! Game state machine: modes, piece kinematics, tick scheduler, locking
//!
//! Everything here is deterministic. Given a seed and a sequence of input
//! events and ticks, two games produce bit-identical state, including the
//! f64 score and timers.

use crate::core::cue::{Cue, CueSink, NullCues};
use crate::core::grid::Grid;
use crate::core::pieces::{Cube, Piece};
use crate::core::rng::PieceQueue;
use crate::core::scoring::Progression;
use crate::types::{
    InputCode, InputEvent, Mode, PieceKind, FPS, GRID_DEPTH, GRID_HEIGHT, GRID_WIDTH,
    MAX_INITIAL_LEVEL, MIN_INITIAL_LEVEL, PLANE_MULT_BONUSES, PLANE_SCORE_BONUSES,
    SPIN_MULT_FACTOR, SPIN_SCORE_FACTOR,
};

/// (rotation axis, direction) per rotation input, after view remapping.
const ROTATION_AXES: [(usize, i32); 6] = [(1, -1), (0, -1), (1, 1), (0, 1), (2, 1), (2, -1)];

/// Horizontal steps per movement input, before view remapping.
const MOVE_DX: [i32; 4] = [1, 0, -1, 0];
const MOVE_DY: [i32; 4] = [0, 1, 0, -1];

/// Bias points ordering the exhaustive kick fallback. The tiny magnitudes
/// only break ties between otherwise equidistant displacements, nudging the
/// piece toward the side the rotation approached from.
const ROTATION_BIAS: [[f64; 2]; 4] = [
    [0.001, -0.0001],
    [0.0001, 0.001],
    [-0.001, 0.0001],
    [-0.0001, -0.001],
];

pub struct Game {
    grid: Grid,
    queue: PieceQueue,
    current: Piece,
    ghost: Piece,
    held: Option<Piece>,
    hold_used: bool,
    mode: Mode,
    grid_rotation: usize,
    modifier: bool,
    initial_level: u32,
    progress: Progression,
    secluded_spaces: u32,
    tick_time: f64,
    place_time: f64,
    tick_duration: f64,
    placement_leniency: f64,
    repeat_thresholds: [f64; 7],
    repeat_delay: f64,
    key_hold_times: [i32; 7],
    in_hard_drop: bool,
    /// Deepest primary-center depth this piece has reached (doubled scale).
    deepest_center_z: i32,
    /// Deepest depth at which a spin has already been awarded.
    deepest_spin_z: i32,
    spin_flag: bool,
    cues: Box<dyn CueSink>,
}

impl Game {
    pub fn new(seed: u32) -> Self {
        Self::with_cues(seed, Box::new(NullCues))
    }

    pub fn with_cues(seed: u32, cues: Box<dyn CueSink>) -> Self {
        let mut queue = PieceQueue::new(seed);
        let current = Piece::spawn(queue.draw());
        let ghost = current.clone();
        let mut game = Game {
            grid: Grid::new(),
            queue,
            current,
            ghost,
            held: None,
            hold_used: false,
            mode: Mode::Home,
            grid_rotation: 0,
            modifier: false,
            initial_level: MIN_INITIAL_LEVEL,
            progress: Progression::new(MIN_INITIAL_LEVEL),
            secluded_spaces: 0,
            tick_time: 0.0,
            place_time: 0.0,
            tick_duration: 0.0,
            placement_leniency: 0.0,
            repeat_thresholds: [0.0; 7],
            repeat_delay: FPS / 7.5,
            key_hold_times: [0; 7],
            in_hard_drop: false,
            deepest_center_z: 0,
            deepest_spin_z: 0,
            spin_flag: false,
            cues,
        };
        game.reset_piece_state();
        game.refresh_tick_speed();
        game
    }

    /// Start (or restart) a game at the selected initial level. The RNG
    /// sequence carries on; a fresh seed needs a fresh `Game`.
    pub fn init_game(&mut self) {
        self.grid = Grid::new();
        self.progress = Progression::new(self.initial_level);
        self.secluded_spaces = 0;
        self.queue.reset();
        self.held = None;
        self.hold_used = false;
        self.grid_rotation = 0;
        self.key_hold_times = [0; 7];
        self.next_piece();
        self.refresh_tick_speed();
        self.mode = Mode::Playing;
    }

    // ---- read access -----------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    pub fn ghost_piece(&self) -> &Piece {
        &self.ghost
    }

    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.upcoming()
    }

    pub fn grid_rotation(&self) -> usize {
        self.grid_rotation
    }

    pub fn modifier_down(&self) -> bool {
        self.modifier
    }

    pub fn initial_level(&self) -> u32 {
        self.initial_level
    }

    pub fn secluded_count(&self) -> u32 {
        self.secluded_spaces
    }

    pub fn progression(&self) -> &Progression {
        &self.progress
    }

    // ---- input routing ---------------------------------------------------

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pressed(code) => match self.mode {
                Mode::Playing => {
                    if self.modifier {
                        self.modified_input(code.slot());
                    } else {
                        self.basic_input(code.slot(), false);
                    }
                }
                // The final grid can still be inspected after a top-out.
                Mode::Finished
                    if self.modifier
                        && matches!(code, InputCode::ViewCw | InputCode::ViewCcw) =>
                {
                    self.basic_input(code.slot(), false);
                }
                Mode::Home => match code {
                    InputCode::Lower => self.init_game(),
                    InputCode::MoveRight => self.change_initial_level(1),
                    InputCode::MoveBack => self.change_initial_level(10),
                    InputCode::MoveLeft => self.change_initial_level(-1),
                    InputCode::MoveFront => self.change_initial_level(-10),
                    _ => {}
                },
                _ => {}
            },
            InputEvent::Released(code) => {
                self.key_hold_times[code.slot()] = 0;
            }
            InputEvent::ModifierPressed => {
                self.modifier = true;
            }
            InputEvent::ModifierReleased => {
                self.modifier = false;
                if self.mode == Mode::Playing && self.in_hard_drop {
                    self.drop_current(true);
                }
            }
            InputEvent::Hold => {
                if self.mode == Mode::Playing {
                    self.hold_piece();
                }
            }
            InputEvent::PauseToggle => self.toggle_pause(),
        }
    }

    fn change_initial_level(&mut self, delta: i32) {
        let level = self.initial_level as i32 + delta;
        self.initial_level =
            level.clamp(MIN_INITIAL_LEVEL as i32, MAX_INITIAL_LEVEL as i32) as u32;
    }

    fn toggle_pause(&mut self) {
        self.mode = match self.mode {
            Mode::Playing => Mode::Paused,
            Mode::Paused => {
                if self.modifier {
                    Mode::Home
                } else {
                    Mode::Playing
                }
            }
            Mode::Finished => Mode::Home,
            Mode::Home => Mode::Home,
        };
    }

    fn basic_input(&mut self, input: usize, repeat: bool) {
        match input {
            0..=3 => {
                self.move_current(input);
                self.key_hold_times[[2, 3, 0, 1][input]] = 0;
            }
            4 => {
                self.grid_rotation = (self.grid_rotation + 1) % 4;
                self.key_hold_times[5] = 0;
            }
            5 => {
                self.grid_rotation = (self.grid_rotation + 3) % 4;
                self.key_hold_times[4] = 0;
            }
            6 => {
                if !self.grounded(&self.current) {
                    self.lower_current(true, true);
                } else {
                    self.place_current(false);
                }
            }
            _ => {}
        }
        if input < 7 && !repeat {
            self.key_hold_times[input] = 1;
        }
    }

    fn modified_input(&mut self, input: usize) {
        match input {
            0..=5 => {
                self.rotate_current(input);
                self.key_hold_times[[2, 3, 0, 1, 5, 4][input]] = 0;
            }
            6 => {
                if !self.grounded(&self.current) {
                    self.drop_current(false);
                    self.in_hard_drop = true;
                    self.cues.emit(Cue::SonicDrop);
                } else {
                    self.place_current(true);
                }
            }
            _ => {}
        }
        if input < 7 {
            self.key_hold_times[input] = 1;
        }
    }

    // ---- tick scheduler --------------------------------------------------

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.mode != Mode::Playing {
            return;
        }
        for n in 0..7 {
            if self.key_hold_times[n] > 0 {
                self.key_hold_times[n] += 1;
            }
            if self.key_hold_times[n] as f64 >= self.repeat_thresholds[n] + self.repeat_delay {
                self.key_hold_times[n] =
                    (self.key_hold_times[n] as f64 - self.repeat_thresholds[n]) as i32;
                if !self.modifier {
                    self.basic_input(n, true);
                } else if n != 6 {
                    self.modified_input(n);
                }
            }
        }
        self.progress.decay_tick();

        if !self.grounded(&self.current) {
            self.tick_time += 1.0;
        } else {
            self.place_time += 1.0;
        }
        while self.tick_time >= self.tick_duration && !self.grounded(&self.current) {
            self.lower_current(true, false);
        }
        if self.place_time >= self.tick_duration + self.placement_leniency
            && self.grounded(&self.current)
        {
            self.place_current(false);
        }
        if self.in_hard_drop {
            self.drop_current(false);
        }
    }

    fn refresh_tick_speed(&mut self) {
        let level = self.progress.level() as f64;
        let base = FPS / (1.5 * ((2.0 + level) / 3.0).powf(1.25));
        self.tick_duration = base * (1.0 + self.secluded_spaces as f64 / 25.0);
        self.placement_leniency = base * level.powf(0.75);
        let move_threshold = (FPS / 7.5).min(self.placement_leniency / 4.0);
        let lower_threshold = (FPS / 20.0).min(self.tick_duration / 2.0);
        self.repeat_thresholds = [move_threshold; 7];
        self.repeat_thresholds[6] = lower_threshold;
    }

    // ---- piece lifecycle -------------------------------------------------

    fn next_piece(&mut self) {
        let kind = self.queue.draw();
        self.current = Piece::spawn(kind);
        self.hold_used = false;
        self.secluded_spaces = self.grid.compute_secluded_spaces();
        self.reset_piece_state();
    }

    fn reset_piece_state(&mut self) {
        self.tick_time = 0.0;
        self.place_time = 0.0;
        self.in_hard_drop = false;
        self.deepest_center_z = self.current.center_depth();
        self.deepest_spin_z = self.current.center_depth();
        self.spin_flag = false;
        self.project_ghost();
    }

    fn hold_piece(&mut self) {
        if self.hold_used {
            return;
        }
        self.hold_used = true;
        let stowed_kind = self.current.kind;
        self.current = match self.held.take() {
            Some(piece) => piece,
            None => Piece::spawn(self.queue.draw()),
        };
        // The stowed piece always goes back to its catalog spawn state.
        self.held = Some(Piece::spawn(stowed_kind));
        self.reset_piece_state();
        self.cues.emit(Cue::Hold);
    }

    // ---- kinematics ------------------------------------------------------

    fn placeable(&self, cube: Cube, dx: i32, dy: i32, dz: i32) -> bool {
        !self.grid.blocked(cube[0] + dx, cube[1] + dy, cube[2] + dz)
    }

    fn grounded(&self, piece: &Piece) -> bool {
        piece.cubes.iter().any(|c| {
            c[2] >= GRID_HEIGHT as i32 - 1 || self.grid.blocked(c[0], c[1], c[2] + 1)
        })
    }

    /// Every cube rests on the floor, a filled cell, or another cube of the
    /// same piece.
    fn fully_grounded(&self, piece: &Piece) -> bool {
        piece.cubes.iter().all(|c| {
            c[2] >= GRID_HEIGHT as i32 - 1
                || self.grid.blocked(c[0], c[1], c[2] + 1)
                || piece.contains_cube([c[0], c[1], c[2] + 1])
        })
    }

    fn held_by_overhang(&self, piece: &Piece) -> bool {
        piece
            .cubes
            .iter()
            .any(|c| self.grid.blocked(c[0], c[1], c[2] - 1))
    }

    fn move_current(&mut self, input: usize) -> bool {
        self.spin_flag = false;
        let dir = (input + self.grid_rotation) % 4;
        let (dx, dy) = (MOVE_DX[dir], MOVE_DY[dir]);
        if !self
            .current
            .cubes
            .iter()
            .all(|&c| self.placeable(c, dx, dy, 0))
        {
            return false;
        }
        self.current.translate(dx, dy, 0);
        self.project_ghost();
        let gold = self.fully_grounded(&self.ghost);
        self.cues.emit(if gold { Cue::MoveGold } else { Cue::Move });
        true
    }

    fn lower_current(&mut self, tick_accounting: bool, manual: bool) {
        self.spin_flag = false;
        self.current.translate(0, 0, 1);
        if tick_accounting {
            if self.tick_time < self.tick_duration * 0.75
                && self.current.center_depth() > self.deepest_center_z
            {
                self.progress.increase_score(1.0);
            }
            self.tick_time -= self.tick_duration;
            if self.tick_time < 0.0 {
                self.tick_time = 0.0;
            }
        }
        if manual {
            self.cues.emit(Cue::Lower);
        }
        self.check_piece_elevation();
    }

    /// A new deepest center resets the lock timer.
    fn check_piece_elevation(&mut self) {
        if self.current.center_depth() > self.deepest_center_z {
            self.deepest_center_z = self.current.center_depth();
            self.place_time = 0.0;
        }
    }

    fn drop_current(&mut self, instant_placement: bool) {
        loop {
            if self.grounded(&self.current) {
                if instant_placement {
                    self.place_current(true);
                }
                return;
            }
            self.lower_current(true, false);
        }
    }

    fn project_ghost(&mut self) {
        self.ghost = self.current.clone();
        while !self.grounded(&self.ghost) {
            // A gravity step through the projection clears the spin flag the
            // same way a real one does; a post-spin piece is grounded, so
            // its flag survives.
            self.spin_flag = false;
            self.ghost.translate(0, 0, 1);
        }
    }

    // ---- rotation --------------------------------------------------------

    fn rotate_current(&mut self, input: usize) {
        self.spin_flag = false;
        let input = if input < 4 {
            (input + self.grid_rotation) % 4
        } else {
            input
        };
        let (axis, rot) = ROTATION_AXES[input];
        let (m0, m1) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };

        // Two-center pieces pivot on the deeper center; on a depth tie,
        // tilts pivot on the center nearer the approach side. The reorder
        // sticks even when the rotation fails.
        if self.current.centers.len() > 1 {
            let centers = &mut self.current.centers;
            if centers[0][2] != centers[1][2] {
                if centers[0][2] < centers[1][2] {
                    centers.swap(0, 1);
                }
            } else if input < 4 {
                let k = input % 2;
                let sign = if input < 2 { -1 } else { 1 };
                if centers[0][k] * sign > centers[1][k] * sign {
                    centers.swap(0, 1);
                }
            }
        }

        let mut cand = self.current.clone();
        let c0 = cand.centers[0];
        for cube in &mut cand.cubes {
            let a = 2 * cube[m0] - c0[m0];
            let b = 2 * cube[m1] - c0[m1];
            debug_assert_eq!((rot * b + c0[m0]).rem_euclid(2), 0);
            cube[m0] = (rot * b + c0[m0]).div_euclid(2);
            cube[m1] = (-rot * a + c0[m1]).div_euclid(2);
        }
        for n in 1..cand.centers.len() {
            let a = cand.centers[n][m0] - c0[m0];
            let b = cand.centers[n][m1] - c0[m1];
            cand.centers[n][m0] = rot * b + c0[m0];
            cand.centers[n][m1] = -rot * a + c0[m1];
        }

        // Bounded boundary correction, one wall at a time.
        while cand.cubes.iter().any(|c| c[0] < 0) {
            cand.translate(1, 0, 0);
        }
        while cand.cubes.iter().any(|c| c[1] < 0) {
            cand.translate(0, 1, 0);
        }
        while cand.cubes.iter().any(|c| c[0] > GRID_WIDTH as i32 - 1) {
            cand.translate(-1, 0, 0);
        }
        while cand.cubes.iter().any(|c| c[1] > GRID_DEPTH as i32 - 1) {
            cand.translate(0, -1, 0);
        }

        let extents = cand.extents();

        // Kick search. A piece pinched under an overhang gets no kicks and
        // goes straight to the exhaustive fallback.
        if !self.held_by_overhang(&self.current) {
            for rz in [0, 1, -1] {
                let mut horizontal: Vec<[i32; 2]> = vec![[0, 0]];
                if input < 4 && rz > 0 {
                    horizontal = vec![[0, 0], [0, 0], [0, 0]];
                    horizontal[1][m0] = -rot;
                    horizontal[2][m0] = rot;
                }
                for [rx, ry] in horizontal {
                    let c = cand.centers[0];
                    let mut upward_case: i32 =
                        if c[0] % 2 == 0 && c[1] % 2 == 0 && c[2] % 2 == 0 {
                            if self.grid.blocked(c[0] / 2, c[1] / 2, c[2] / 2 + 1) {
                                0
                            } else {
                                -1
                            }
                        } else {
                            -1
                        };
                    let mut placed = 0;
                    for cube in cand.cubes {
                        if self.placeable(cube, rx, ry, rz) {
                            placed += 1;
                        } else if rz == -1 {
                            let spread = (2 * cube[0] - c[0]).abs()
                                + (2 * cube[1] - c[1]).abs()
                                + (2 * cube[2] - c[2]);
                            if spread >= 4 && upward_case >= 0 {
                                upward_case = 1;
                            } else {
                                upward_case = -1;
                            }
                        }
                    }
                    if placed == 4 {
                        cand.translate(rx, ry, rz);
                        self.commit_rotation(cand, axis);
                        return;
                    } else if upward_case == 1
                        && cand
                            .cubes
                            .iter()
                            .all(|&cube| self.placeable(cube, rx, ry, rz - 1))
                    {
                        cand.translate(rx, ry, rz - 1);
                        self.commit_rotation(cand, axis);
                        return;
                    }
                }
            }
        }

        // Exhaustive fallback across the piece's bounding extents.
        let bias = ROTATION_BIAS[if input < 4 {
            input
        } else {
            (self.grid_rotation + 1) % 4
        }];
        let mut displacements: Vec<[i32; 2]> = Vec::new();
        for ry in -extents[1]..=extents[1] {
            for rx in -extents[0]..=extents[0] {
                displacements.push([rx, ry]);
            }
        }
        let distance = |d: &[i32; 2]| {
            let dx = d[0] as f64 - bias[0];
            let dy = d[1] as f64 - bias[1];
            dx * dx + dy * dy
        };
        displacements.sort_by(|a, b| distance(a).total_cmp(&distance(b)));

        for rz in (-extents[2]..=extents[2]).rev() {
            for &[rx, ry] in &displacements {
                if !cand
                    .cubes
                    .iter()
                    .all(|&cube| self.placeable(cube, rx, ry, rz))
                {
                    continue;
                }
                // The landing spot must stay in contact with where the piece
                // was: some cube within one step of an original cube.
                let touches = cand.cubes.iter().any(|&cube| {
                    let moved = [cube[0] + rx, cube[1] + ry, cube[2] + rz];
                    self.current.cubes.iter().any(|&orig| {
                        (moved[0] - orig[0]).abs()
                            + (moved[1] - orig[1]).abs()
                            + (moved[2] - orig[2]).abs()
                            <= 1
                    })
                });
                if touches {
                    cand.translate(rx, ry, rz);
                    self.commit_rotation(cand, axis);
                    return;
                }
            }
        }

        self.cues.emit(Cue::RotationBlocked);
    }

    fn commit_rotation(&mut self, mut cand: Piece, axis: usize) {
        self.raise_toward_entry_depth(&mut cand);
        self.detect_spin(&cand, axis);
        self.current = cand;
        self.project_ghost();
        let gold = self.fully_grounded(&self.ghost);
        self.cues.emit(if gold { Cue::RotateGold } else { Cue::Rotate });
    }

    /// Walk a kicked-down piece back up toward the depth it rotated at,
    /// stopping at the first obstruction.
    fn raise_toward_entry_depth(&self, cand: &mut Piece) {
        let steps = (cand.center_depth() - self.current.center_depth()) / 2;
        for _ in 0..steps.max(0) {
            if cand
                .cubes
                .iter()
                .all(|&c| self.placeable(c, 0, 0, -1))
            {
                cand.translate(0, 0, -1);
            } else {
                return;
            }
        }
    }

    fn detect_spin(&mut self, cand: &Piece, axis: usize) {
        let mut escapes: Vec<[i32; 3]> = vec![[0, 0, -1]];
        if axis != 0 {
            escapes.push([0, 1, 0]);
            escapes.push([0, -1, 0]);
        }
        if axis != 1 {
            escapes.push([1, 0, 0]);
            escapes.push([-1, 0, 0]);
        }
        for [dx, dy, dz] in escapes {
            if cand
                .cubes
                .iter()
                .all(|&c| self.placeable(c, dx, dy, dz))
            {
                return;
            }
        }
        if self.current.center_depth() > self.deepest_spin_z {
            self.deepest_spin_z = self.current.center_depth();
            let displacement = ((cand.centers[0][0] - self.current.centers[0][0]).abs()
                + (cand.centers[0][1] - self.current.centers[0][1]).abs()
                + (cand.centers[0][2] - self.current.centers[0][2]).abs())
                / 2;
            self.progress
                .increase_score(20.0 + 10.0 * displacement as f64);
            self.progress
                .multiplier_bonus(0.14 + 0.07 * displacement as f64);
            self.progress.record_spin();
            self.spin_flag = true;
            self.cues.emit(Cue::Spin);
        }
    }

    // ---- locking ---------------------------------------------------------

    fn sorted_cube(&self, n: usize) -> Cube {
        let mut cubes = self.current.cubes;
        cubes.sort_by_key(|c| -c[2]);
        cubes[n]
    }

    fn place_current(&mut self, hard: bool) {
        let mut planes_cleared = 0usize;
        for n in 0..4 {
            let cube = self.sorted_cube(n);
            if cube[2] >= 0 {
                self.grid.lock_cube(cube[0], cube[1], cube[2], self.current.kind);
            } else if cube[2] == -1 {
                // A cube still above the grid can only land if the cubes
                // locked so far completed planes; clear them now and ride
                // the shift down.
                planes_cleared += self.award_plane_clear();
                for _ in 0..planes_cleared {
                    self.lower_current(true, false);
                }
                if planes_cleared == 0 {
                    self.mode = Mode::Finished;
                } else {
                    let cube = self.sorted_cube(n);
                    self.grid
                        .lock_cube(cube[0], cube[1], cube[2], self.current.kind);
                }
            } else {
                self.mode = Mode::Finished;
            }
        }
        self.award_plane_clear();
        self.next_piece();
        self.refresh_tick_speed();
        if hard {
            self.cues.emit(Cue::PlaceHard);
        } else {
            self.cues.emit(Cue::PlaceSoft);
        }
    }

    fn award_plane_clear(&mut self) -> usize {
        let planes = self.grid.clear_full_planes();
        let idx = planes.min(4);
        let (score_factor, mult_factor) = if self.spin_flag {
            (SPIN_SCORE_FACTOR, SPIN_MULT_FACTOR)
        } else {
            (1.0, 1.0)
        };
        self.progress
            .increase_score(PLANE_SCORE_BONUSES[idx] * score_factor);
        self.progress.add_cleared_planes(planes);
        self.refresh_tick_speed();
        self.progress
            .multiplier_bonus(PLANE_MULT_BONUSES[idx] * mult_factor);
        if planes > 0 {
            self.progress.record_plane_clear(planes, self.spin_flag);
            if self.spin_flag {
                self.cues.emit(Cue::SpinClear(planes.min(3) as u8));
            } else {
                self.cues.emit(Cue::PlaneClear(planes.min(4) as u8));
            }
        }
        planes
    }
}

//! Score, multiplier and level progression
//!
//! All score and multiplier arithmetic runs in f64 so a replayed game
//! reproduces the exact same numbers.

use crate::types::{
    FPS, MULT_BUFFER_DRAIN_COEFFICIENT, MULT_BUFFER_SIZE, MULT_DRAIN_COEFFICIENT,
};

/// Statistics shown on the side panel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClearStats {
    pub total_planes: u32,
    /// Clears by size, 1 to 4 planes.
    pub plane_clears: [u32; 4],
    /// Spin clears by size, 1 to 3 planes (larger counts share the last slot).
    pub spin_clears: [u32; 3],
    pub total_spins: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    score: f64,
    multiplier: f64,
    highest_multiplier: f64,
    buffer: f64,
    multiplier_cap: f64,
    level: u32,
    clear_progress: u32,
    stats: ClearStats,
}

impl Progression {
    /// Starting at `initial_level` grants the plane-clear progress a player
    /// would have earned reaching that level from 1.
    pub fn new(initial_level: u32) -> Self {
        let il = initial_level as f64;
        let head_start = ((il - 1.0) * (3.5 + 0.125 * (il - 1.0))).ceil() as u32;
        let mut p = Progression {
            score: 0.0,
            multiplier: 1.0,
            highest_multiplier: 1.0,
            buffer: 0.0,
            multiplier_cap: 1.0,
            level: 1,
            clear_progress: head_start,
            stats: ClearStats::default(),
        };
        p.recompute_level();
        p
    }

    fn recompute_level(&mut self) {
        let progress = self.clear_progress as f64;
        self.level = ((8.0 * progress + 196.0).sqrt().floor() - 13.0) as u32;
        self.multiplier_cap = 1.0 + self.level as f64 / 5.0;
    }

    /// Award points through the current multiplier.
    pub fn increase_score(&mut self, points: f64) {
        self.score += points * self.multiplier;
    }

    /// Feed the multiplier buffer; overflow spills into the multiplier up to
    /// the level cap.
    pub fn multiplier_bonus(&mut self, amount: f64) {
        self.buffer += amount;
        if self.buffer > MULT_BUFFER_SIZE {
            self.multiplier += self.buffer - MULT_BUFFER_SIZE;
            self.buffer = MULT_BUFFER_SIZE;
            if self.multiplier > self.multiplier_cap {
                self.multiplier = self.multiplier_cap;
            }
        }
        if self.multiplier > self.highest_multiplier {
            self.highest_multiplier = self.multiplier;
        }
    }

    /// Per-frame drain: the buffer empties first, then the multiplier itself
    /// decays toward 1.
    pub fn decay_tick(&mut self) {
        self.buffer -= self.multiplier * MULT_BUFFER_DRAIN_COEFFICIENT / FPS;
        if self.buffer < 0.0 {
            self.multiplier += self.buffer * MULT_DRAIN_COEFFICIENT * self.multiplier;
            self.buffer = 0.0;
            if self.multiplier < 1.0 {
                self.multiplier = 1.0;
            }
        }
    }

    /// Record cleared planes and recheck the level.
    pub fn add_cleared_planes(&mut self, planes: usize) {
        self.stats.total_planes += planes as u32;
        self.clear_progress += planes as u32;
        self.recompute_level();
    }

    pub fn record_plane_clear(&mut self, planes: usize, spin: bool) {
        if planes == 0 {
            return;
        }
        if spin {
            self.stats.spin_clears[planes.min(3) - 1] += 1;
        } else {
            self.stats.plane_clears[planes.min(4) - 1] += 1;
        }
    }

    pub fn record_spin(&mut self) {
        self.stats.total_spins += 1;
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn highest_multiplier(&self) -> f64 {
        self.highest_multiplier
    }

    pub fn multiplier_cap(&self) -> f64 {
        self.multiplier_cap
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stats(&self) -> &ClearStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_at_start() {
        let p = Progression::new(1);
        assert_eq!(p.level(), 1);
        assert_eq!(p.multiplier_cap(), 1.2);
        assert_eq!(p.score(), 0.0);
        assert_eq!(p.multiplier(), 1.0);
    }

    #[test]
    fn head_start_matches_requested_level() {
        for il in [1, 2, 5, 10, 25, 40] {
            let p = Progression::new(il);
            assert_eq!(p.level(), il, "initial level {il}");
        }
    }

    #[test]
    fn level_grows_with_cleared_planes() {
        let mut p = Progression::new(1);
        let mut last = p.level();
        for _ in 0..200 {
            p.add_cleared_planes(1);
            assert!(p.level() >= last);
            last = p.level();
        }
        assert!(last > 1);
    }

    #[test]
    fn score_awards_run_through_multiplier() {
        let mut p = Progression::new(40);
        p.increase_score(100.0);
        assert_eq!(p.score(), 100.0);
        p.multiplier_bonus(5.0);
        let mult = p.multiplier();
        assert!(mult > 1.0);
        p.increase_score(100.0);
        assert_eq!(p.score(), 100.0 + 100.0 * mult);
    }

    #[test]
    fn bonus_fills_buffer_before_multiplier() {
        let mut p = Progression::new(1);
        p.multiplier_bonus(0.3);
        assert_eq!(p.multiplier(), 1.0);
        p.multiplier_bonus(0.3);
        // 0.6 total: 0.4 stays banked, 0.2 spills.
        assert!((p.multiplier() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn multiplier_clamps_to_level_cap() {
        let mut p = Progression::new(1);
        p.multiplier_bonus(10.0);
        assert_eq!(p.multiplier(), 1.2);
        assert_eq!(p.highest_multiplier(), 1.2);
    }

    #[test]
    fn decay_drains_buffer_then_multiplier() {
        let mut p = Progression::new(10);
        p.multiplier_bonus(1.0);
        let boosted = p.multiplier();
        assert!(boosted > 1.0);
        // A few frames only eat the buffer.
        p.decay_tick();
        assert_eq!(p.multiplier(), boosted);
        // Long idle stretch drains the multiplier back to the floor.
        for _ in 0..400_000 {
            p.decay_tick();
        }
        assert_eq!(p.multiplier(), 1.0);
        assert_eq!(p.highest_multiplier(), boosted);
    }

    #[test]
    fn decay_never_drops_below_one() {
        let mut p = Progression::new(1);
        for _ in 0..10_000 {
            p.decay_tick();
        }
        assert_eq!(p.multiplier(), 1.0);
    }

    #[test]
    fn clear_statistics_bucketed_by_size_and_spin() {
        let mut p = Progression::new(1);
        p.record_plane_clear(1, false);
        p.record_plane_clear(4, false);
        p.record_plane_clear(2, true);
        p.record_plane_clear(0, false);
        assert_eq!(p.stats().plane_clears, [1, 0, 0, 1]);
        assert_eq!(p.stats().spin_clears, [0, 1, 0]);
    }
}

//! Deterministic RNG and the piece queue
//!
//! Linear congruential generator (Numerical Recipes constants). Not
//! cryptographic; chosen so a seed reproduces a whole game exactly.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::types::{PieceKind, NEXT_PIECE_COUNT};

#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        SimpleRng { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }

    /// Uniform-ish value in `0..max`. Fine for bag picks at these sizes.
    pub fn next_range(&mut self, max: usize) -> usize {
        debug_assert!(max > 0);
        (self.next() as usize) % max
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_range(i + 1);
            items.swap(i, j);
        }
    }
}

/// Upcoming-piece queue fed by 9-piece bags: one of every kind plus one
/// extra drawn from the first seven (ChiralB is never doubled).
#[derive(Debug, Clone)]
pub struct PieceQueue {
    queue: VecDeque<PieceKind>,
    rng: SimpleRng,
}

impl PieceQueue {
    pub fn new(seed: u32) -> Self {
        PieceQueue {
            queue: VecDeque::new(),
            rng: SimpleRng::new(seed),
        }
    }

    /// Drop queued pieces but keep the RNG sequence going.
    pub fn reset(&mut self) {
        self.queue.clear();
    }

    fn refill(&mut self) {
        while self.queue.len() <= NEXT_PIECE_COUNT {
            let mut bag: ArrayVec<PieceKind, 9> = PieceKind::ALL.iter().copied().collect();
            bag.push(PieceKind::ALL[self.rng.next_range(7)]);
            self.rng.shuffle(&mut bag);
            self.queue.extend(bag);
        }
    }

    pub fn draw(&mut self) -> PieceKind {
        self.refill();
        // refill guarantees the queue is never empty here
        self.queue.pop_front().unwrap_or(PieceKind::I)
    }

    /// Preview of the next pieces, in draw order.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied().take(NEXT_PIECE_COUNT)
    }
}

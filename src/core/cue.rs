//! Audio cue capability
//!
//! The core announces feedback moments; whoever owns the game decides what
//! to do with them. The terminal frontend currently drops them, tests
//! record them.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Move,
    MoveGold,
    Rotate,
    RotateGold,
    RotationBlocked,
    Lower,
    PlaceSoft,
    PlaceHard,
    SonicDrop,
    Hold,
    Spin,
    /// 1 to 4 planes cleared without a spin.
    PlaneClear(u8),
    /// 1 to 3 planes cleared off a spin; larger clears share the last cue.
    SpinClear(u8),
}

pub trait CueSink {
    fn emit(&mut self, cue: Cue);
}

/// Sink that swallows everything.
#[derive(Debug, Default)]
pub struct NullCues;

impl CueSink for NullCues {
    fn emit(&mut self, _cue: Cue) {}
}

/// Shared recording sink; clone one handle into the game and keep the other.
#[derive(Debug, Clone, Default)]
pub struct CueBuffer {
    cues: Rc<RefCell<Vec<Cue>>>,
}

impl CueBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Cue> {
        self.cues.borrow_mut().drain(..).collect()
    }

    pub fn contains(&self, cue: Cue) -> bool {
        self.cues.borrow().contains(&cue)
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues.borrow().iter().filter(|&&c| c == cue).count()
    }
}

impl CueSink for CueBuffer {
    fn emit(&mut self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}

//! History.rs
//!
//! Bounded record of past frames for rewinding. The newest entry is always
//! the live state, so stepping back once shows the frame before it.

use crate::objects::barycenter::Barycenter;
use crate::objects::clocks::SimClock;
use crate::objects::movables::Body;
use std::collections::VecDeque;

/// Frame struct
///
/// Everything needed to put the simulation back where it was
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub bodies: Vec<Body>,
    pub barycenter: Barycenter,
    pub clock: SimClock,
}

#[derive(Debug, Clone, Default)]
pub struct FrameHistory {
    frames: VecDeque<Frame>,
    cursor: usize,
    capacity: usize,
}

impl FrameHistory {
    /// `capacity` of zero turns recording off
    pub fn new(capacity: usize) -> Self {
        FrameHistory {
            frames: VecDeque::with_capacity(capacity.min(64)),
            cursor: 0,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// true when the cursor sits on the newest frame
    pub fn is_live(&self) -> bool {
        self.frames.is_empty() || self.cursor + 1 == self.frames.len()
    }

    /// Append a frame, dropping the oldest once over capacity
    pub fn record(&mut self, frame: Frame) {
        if self.capacity == 0 {
            return;
        }

        self.frames.push_back(frame);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
        self.cursor = self.frames.len() - 1;
    }

    /// Overwrite the newest frame, or record one if there is none yet. Used
    /// when the live state changes between frames.
    pub fn amend(&mut self, frame: Frame) {
        match self.frames.back_mut() {
            Some(newest) if self.capacity > 0 => *newest = frame,
            _ => self.record(frame),
        }
    }

    /// Step one frame back, stopping at the oldest
    pub fn rewind(&mut self) -> Option<&Frame> {
        if self.frames.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.frames.get(self.cursor)
    }

    /// Step one frame forward, stopping at the newest
    pub fn forward(&mut self) -> Option<&Frame> {
        if self.frames.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1).min(self.frames.len() - 1);
        self.frames.get(self.cursor)
    }

    /// Forget every frame ahead of the cursor. Called when the simulation
    /// resumes from a rewound frame.
    pub fn truncate_future(&mut self) {
        if !self.frames.is_empty() {
            self.frames.truncate(self.cursor + 1);
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }
}

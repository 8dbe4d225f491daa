//! Fixed-length trail of recent positions for one body
//!
//! The buffer is always full: it starts as `capacity` copies of the initial
//! position, `push` overwrites the oldest slot in O(1), and `reset_to`
//! refills every slot at once.

use glam::DVec2;

use crate::error::{PendulumError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryHistory {
    points: Vec<DVec2>,
    /// Index of the oldest entry, which is the next one overwritten.
    head: usize,
}

impl TrajectoryHistory {
    pub fn new(capacity: usize, initial: DVec2) -> Result<Self> {
        if capacity == 0 {
            return Err(PendulumError::invalid(
                "trail_capacity",
                "a trail needs at least one point",
            ));
        }
        Ok(Self {
            points: vec![initial; capacity],
            head: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    pub fn push(&mut self, point: DVec2) {
        self.points[self.head] = point;
        self.head = (self.head + 1) % self.points.len();
    }

    pub fn reset_to(&mut self, point: DVec2) {
        self.points.fill(point);
        self.head = 0;
    }

    /// Most recently pushed point.
    pub fn latest(&self) -> DVec2 {
        let len = self.points.len();
        self.points[(self.head + len - 1) % len]
    }

    /// Oldest to newest, always `capacity` items.
    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        let (newer, older) = self.points.split_at(self.head);
        older.iter().chain(newer).copied()
    }

    /// Owned copy, oldest to newest.
    pub fn snapshot(&self) -> Vec<DVec2> {
        let mut out = Vec::with_capacity(self.points.len());
        out.extend_from_slice(&self.points[self.head..]);
        out.extend_from_slice(&self.points[..self.head]);
        out
    }
}

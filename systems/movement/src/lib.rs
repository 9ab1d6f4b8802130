#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint travel along the authored path.
//!
//! Attackers carry a [`PathProgress`] cursor: the index of the waypoint they
//! last reached, their current position, and the waypoint they are heading
//! toward. Movement is a straight-line step that snaps onto the waypoint once
//! the remaining distance fits within a single step.

use elemental_defence_core::{Path, Vec2};

/// Result of a single movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Travel {
    /// Still travelling along the path.
    EnRoute,
    /// Reached the final waypoint.
    ReachedEnd,
}

/// Position of a traveller along a [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathProgress {
    index: usize,
    position: Vec2,
    target: Vec2,
}

impl PathProgress {
    /// Places a traveller on the first waypoint heading for the second.
    #[must_use]
    pub fn start(path: &Path) -> Self {
        Self::at_waypoint(path, 0)
    }

    fn at_waypoint(path: &Path, index: usize) -> Self {
        let index = index.min(path.last_index());
        let position = path.position(index);
        let target = if index < path.last_index() {
            path.position(index + 1)
        } else {
            position
        };
        Self {
            index,
            position,
            target,
        }
    }

    /// Index of the waypoint most recently reached.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Current position in world units.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Waypoint currently being approached.
    #[must_use]
    pub const fn target(&self) -> Vec2 {
        self.target
    }

    /// Moves up to `speed` world units toward the next waypoint.
    pub fn advance(&mut self, path: &Path, speed: f32) -> Travel {
        let distance = self.position.distance(self.target);
        if distance > speed {
            let direction = (self.target - self.position) / distance;
            self.position += direction * speed;
            return Travel::EnRoute;
        }

        self.position = self.target;
        self.index += 1;
        if self.index >= path.last_index() {
            return Travel::ReachedEnd;
        }
        self.target = path.position(self.index + 1);
        Travel::EnRoute
    }

    /// Throws the traveller back `steps` waypoints, clamping at the start.
    ///
    /// Both the position and the next target are recomputed from the path.
    pub fn rewind(&mut self, path: &Path, steps: usize) {
        *self = Self::at_waypoint(path, self.index.saturating_sub(steps));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elemental_defence_core::CellCoord;

    fn line() -> Path {
        Path::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(2, 0),
            CellCoord::new(2, 2),
        ])
        .expect("three waypoints")
    }

    #[test]
    fn start_heads_for_second_waypoint() {
        let progress = PathProgress::start(&line());
        assert_eq!(progress.index(), 0);
        assert_eq!(progress.position(), Vec2::new(20.0, 20.0));
        assert_eq!(progress.target(), Vec2::new(100.0, 20.0));
    }

    #[test]
    fn step_moves_toward_target_by_speed() {
        let path = line();
        let mut progress = PathProgress::start(&path);
        assert_eq!(progress.advance(&path, 10.0), Travel::EnRoute);
        assert_eq!(progress.position(), Vec2::new(30.0, 20.0));
        assert_eq!(progress.index(), 0);
    }

    #[test]
    fn step_snaps_when_within_reach() {
        let path = line();
        let mut progress = PathProgress::start(&path);
        assert_eq!(progress.advance(&path, 80.0), Travel::EnRoute);
        assert_eq!(progress.position(), Vec2::new(100.0, 20.0));
        assert_eq!(progress.index(), 1);
        assert_eq!(progress.target(), Vec2::new(100.0, 100.0));
        assert_eq!(progress.advance(&path, 200.0), Travel::ReachedEnd);
    }

    #[test]
    fn zero_speed_holds_position() {
        let path = line();
        let mut progress = PathProgress::start(&path);
        assert_eq!(progress.advance(&path, 0.0), Travel::EnRoute);
        assert_eq!(progress.position(), Vec2::new(20.0, 20.0));
    }
}

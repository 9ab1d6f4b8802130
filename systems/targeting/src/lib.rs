#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure target selection over spawn-ordered entity arenas.
//!
//! Every selector walks the arena front to back and never sorts, so ties are
//! always broken in favour of the entity that appeared first. Results are
//! arena indices; callers own the arenas and resolve indices back to entities.

use elemental_defence_core::Vec2;

/// Entity that occupies a point in the world and may have been flagged dead.
pub trait Positioned {
    /// Current position in world units.
    fn position(&self) -> Vec2;

    /// Whether the entity is still live and selectable.
    fn is_live(&self) -> bool;
}

/// Attacker-like entity eligible for defender targeting.
pub trait Candidate: Positioned {
    /// Current hit points.
    fn hp(&self) -> f64;

    /// Whether the entity is a boss.
    fn is_boss(&self) -> bool;
}

/// Radius test used by a selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reach {
    radius: f32,
    inclusive: bool,
}

impl Reach {
    /// Matches entities at a distance less than or equal to `radius`.
    #[must_use]
    pub const fn within(radius: f32) -> Self {
        Self {
            radius,
            inclusive: true,
        }
    }

    /// Matches entities strictly closer than `radius`.
    #[must_use]
    pub const fn closer_than(radius: f32) -> Self {
        Self {
            radius,
            inclusive: false,
        }
    }

    /// Radius in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Whether the distance between two points satisfies the reach.
    #[must_use]
    pub fn contains(&self, from: Vec2, to: Vec2) -> bool {
        let distance = from.distance(to);
        if self.inclusive {
            distance <= self.radius
        } else {
            distance < self.radius
        }
    }
}

/// Index of the first live entity within reach of `origin`, skipping `skip`.
#[must_use]
pub fn first_in_reach<T: Positioned>(
    items: &[T],
    origin: Vec2,
    reach: Reach,
    skip: Option<usize>,
) -> Option<usize> {
    items.iter().enumerate().find_map(|(index, item)| {
        let eligible =
            Some(index) != skip && item.is_live() && reach.contains(origin, item.position());
        eligible.then_some(index)
    })
}

/// Index of the live candidate with the most hit points.
///
/// Earlier entities win ties.
#[must_use]
pub fn strongest<T: Candidate>(items: &[T]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, item) in items.iter().enumerate() {
        if !item.is_live() {
            continue;
        }
        match best {
            Some((_, hp)) if item.hp() <= hp => {}
            _ => best = Some((index, item.hp())),
        }
    }
    best.map(|(index, _)| index)
}

/// Index of the live entity nearest to `point` whose own reach covers it.
///
/// The reach is resolved per entity so larger entities present larger hit
/// areas. Earlier entities win ties.
#[must_use]
pub fn nearest_covering<T, F>(items: &[T], point: Vec2, reach_of: F) -> Option<usize>
where
    T: Positioned,
    F: Fn(&T) -> Reach,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, item) in items.iter().enumerate() {
        if !item.is_live() || !reach_of(item).contains(item.position(), point) {
            continue;
        }
        let distance = item.position().distance(point);
        match best {
            Some((_, nearest)) if distance >= nearest => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Selection helper that reuses a scratch buffer across calls.
#[derive(Debug, Default)]
pub struct Targeting {
    scratch: Vec<usize>,
}

impl Targeting {
    /// Creates a targeting helper with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices of every live entity within reach of `origin`, in arena order.
    pub fn in_reach<T: Positioned>(&mut self, items: &[T], origin: Vec2, reach: Reach) -> &[usize] {
        self.scratch.clear();
        for (index, item) in items.iter().enumerate() {
            if item.is_live() && reach.contains(origin, item.position()) {
                self.scratch.push(index);
            }
        }
        &self.scratch
    }

    /// Indices of every entity matching `predicate`, in arena order.
    pub fn matching<T, F>(&mut self, items: &[T], predicate: F) -> &[usize]
    where
        F: Fn(&T) -> bool,
    {
        self.scratch.clear();
        for (index, item) in items.iter().enumerate() {
            if predicate(item) {
                self.scratch.push(index);
            }
        }
        &self.scratch
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave-start random events and the acid rain weather they can arm.
//!
//! Rolling and resolving are pure: [`roll`] picks a [`RandomEventKind`] from
//! the weighted table and [`resolve`] turns it into a concrete
//! [`EventEffect`]. The world owns every entity the effect touches and applies
//! it itself.

use elemental_defence_core::{Element, RandomEventKind, RollExt, ELEMENT_COUNT, TICKS_PER_SECOND};

/// Weighted event table in roll order.
pub const EVENT_TABLE: [(RandomEventKind, u32); 10] = [
    (RandomEventKind::Calm, 40),
    (RandomEventKind::HealAttackers, 5),
    (RandomEventKind::DoubleHp, 10),
    (RandomEventKind::SpeedUp, 10),
    (RandomEventKind::DefenderDecay, 5),
    (RandomEventKind::BonusGold, 10),
    (RandomEventKind::DestroyDefender, 5),
    (RandomEventKind::ChangeElement, 10),
    (RandomEventKind::DoubleDamage, 5),
    (RandomEventKind::AcidRain, 10),
];

/// Sum of every weight in [`EVENT_TABLE`].
pub const TOTAL_WEIGHT: u32 = 110;

/// Movement multiplier applied to attackers while acid rain falls.
pub const ACID_RAIN_MOVE_FACTOR: f32 = 0.95;

/// Attack-speed multiplier applied to defenders while acid rain falls.
pub const ACID_RAIN_ATTACK_FACTOR: f32 = 0.9;

/// Concrete mutation produced by a rolled event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventEffect {
    /// No change.
    Nothing,
    /// Heal every live attacker to full.
    HealAttackers,
    /// Multiply wave and live attacker hit points.
    ScaleHp(f64),
    /// Multiply wave and live attacker speed.
    ScaleSpeed(f32),
    /// Halve every defender's current hit points, rounding down.
    HalveDefenderHp,
    /// Add gold to the pool.
    GrantGold(u64),
    /// Destroy the defender at the provided arena position.
    DestroyDefender {
        /// Position in the defender arena.
        index: usize,
    },
    /// Switch the wave and live attackers to a single element.
    ReassignElement(Element),
    /// Multiply damage dealt by attacker melee strikes.
    IncomingDamage(f64),
    /// Start acid rain lasting the provided number of ticks.
    AcidRain {
        /// Duration in ticks.
        ticks: f32,
    },
}

/// Picks an event from the weighted table.
pub fn roll<R: RollExt>(rng: &mut R) -> RandomEventKind {
    let sample = rng.unit() * f64::from(TOTAL_WEIGHT);
    let mut cumulative = 0u32;
    for (kind, weight) in EVENT_TABLE {
        cumulative += weight;
        if sample < f64::from(cumulative) {
            return kind;
        }
    }
    RandomEventKind::Calm
}

/// Resolves a rolled event into its concrete effect for the provided wave.
pub fn resolve<R: RollExt>(
    kind: RandomEventKind,
    wave: u32,
    defender_count: usize,
    rng: &mut R,
) -> EventEffect {
    match kind {
        RandomEventKind::Calm => EventEffect::Nothing,
        RandomEventKind::HealAttackers => EventEffect::HealAttackers,
        RandomEventKind::DoubleHp => EventEffect::ScaleHp(2.0),
        RandomEventKind::SpeedUp => EventEffect::ScaleSpeed(1.5),
        RandomEventKind::DefenderDecay => EventEffect::HalveDefenderHp,
        RandomEventKind::BonusGold => EventEffect::GrantGold(500 + 100 * u64::from(wave)),
        RandomEventKind::DestroyDefender if defender_count == 0 => EventEffect::Nothing,
        RandomEventKind::DestroyDefender => EventEffect::DestroyDefender {
            index: rng.pick(defender_count),
        },
        RandomEventKind::ChangeElement => {
            EventEffect::ReassignElement(Element::from_index(rng.pick(ELEMENT_COUNT)))
        }
        RandomEventKind::DoubleDamage => EventEffect::IncomingDamage(2.0),
        RandomEventKind::AcidRain => {
            let seconds = rng.between(10.0, 20.0);
            EventEffect::AcidRain {
                ticks: (seconds * f64::from(TICKS_PER_SECOND)).floor() as f32,
            }
        }
    }
}

/// Timed weather that slows the field and corrodes defenders.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AcidRain {
    remaining: f32,
    clock: f32,
}

impl AcidRain {
    /// Starts a storm lasting `ticks`.
    #[must_use]
    pub const fn new(ticks: f32) -> Self {
        Self {
            remaining: ticks,
            clock: 0.0,
        }
    }

    /// Whether the storm is still falling.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Ticks left before the storm ends.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Stops the storm immediately.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Movement multiplier for attackers this tick.
    #[must_use]
    pub fn move_factor(&self) -> f32 {
        if self.is_active() {
            ACID_RAIN_MOVE_FACTOR
        } else {
            1.0
        }
    }

    /// Attack-speed multiplier for defenders this tick.
    #[must_use]
    pub fn attack_factor(&self) -> f32 {
        if self.is_active() {
            ACID_RAIN_ATTACK_FACTOR
        } else {
            1.0
        }
    }

    /// Advances the storm and returns the corrosion damage due this tick.
    ///
    /// Every defender takes 2 to 5 damage once per in-game second.
    pub fn advance<R: RollExt>(&mut self, scale: f32, rng: &mut R) -> Option<f64> {
        if !self.is_active() {
            return None;
        }
        self.remaining -= scale;
        self.clock += scale;
        if self.clock < TICKS_PER_SECOND {
            return None;
        }
        self.clock = 0.0;
        Some(2.0 + rng.pick(4) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn table_weights_sum_to_total() {
        let sum: u32 = EVENT_TABLE.iter().map(|(_, weight)| weight).sum();
        assert_eq!(sum, TOTAL_WEIGHT);
    }

    #[test]
    fn extreme_rolls_hit_table_ends() {
        assert_eq!(roll(&mut StepRng::new(0, 0)), RandomEventKind::Calm);
        assert_eq!(roll(&mut StepRng::new(u64::MAX, 0)), RandomEventKind::AcidRain);
    }

    #[test]
    fn inactive_weather_is_neutral() {
        let mut rain = AcidRain::default();
        assert_eq!(rain.move_factor(), 1.0);
        assert_eq!(rain.attack_factor(), 1.0);
        assert_eq!(rain.advance(1.0, &mut StepRng::new(0, 0)), None);
    }
}

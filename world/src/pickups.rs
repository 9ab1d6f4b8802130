//! Pickups lying on the path and short-lived floating text cues.

use elemental_defence_core::{Event, PickupId, PickupKind, RollExt, Vec2};
use elemental_defence_system_targeting::{first_in_reach, Reach};

use crate::World;

const PICKUP_LIFE: f32 = 600.0;
const FOOD_SPAWN_CHANCE: f64 = 0.003;
const EAT_RADIUS: f32 = 20.0;
const HEAL_FRACTION: f64 = 0.2;
const SPEED_BOOST: f32 = 1.3;
const INVINCIBILITY_TICKS: f32 = 450.0;
const POISON_FRACTION: f64 = 0.3;
const POISON_SLOW_TICKS: f32 = 180.0;

const TEXT_LIFE: f32 = 30.0;
const TEXT_RISE: f32 = 1.0;
const MAX_DAMAGE_TEXTS: usize = 50;

/// Presentation hint attached to a floating text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextTone {
    /// Plain damage or information.
    Neutral,
    /// Super-effective hits and crits.
    Effective,
    /// Resisted hits and immunities.
    Resisted,
    /// Damage over time.
    Poison,
    /// Revivals, splits, silences and other alarms.
    Warning,
    /// Repairs and pickups that restore health.
    Heal,
    /// Income.
    Gold,
}

#[derive(Clone, Debug)]
pub(crate) struct FloatingText {
    pub(crate) position: Vec2,
    pub(crate) label: String,
    pub(crate) tone: TextTone,
    pub(crate) life: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) kind: PickupKind,
    pub(crate) position: Vec2,
    pub(crate) life: f32,
}

impl Pickup {
    pub(crate) fn fresh(id: PickupId, kind: PickupKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            life: PICKUP_LIFE,
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        self.life > 0.0
    }
}

fn roll_food<R: RollExt>(rng: &mut R) -> PickupKind {
    let roll = rng.unit();
    if roll < 0.45 {
        PickupKind::Heal
    } else if roll < 0.9 {
        PickupKind::Speed
    } else {
        PickupKind::Invincibility
    }
}

impl World {
    pub(crate) fn cue(&mut self, position: Vec2, label: String, tone: TextTone) {
        self.texts.push(FloatingText {
            position,
            label,
            tone,
            life: TEXT_LIFE,
        });
    }

    /// Emits a cue unless the screen is already crowded with text.
    pub(crate) fn capped_cue(&mut self, position: Vec2, label: String, tone: TextTone) {
        if self.texts.len() < MAX_DAMAGE_TEXTS {
            self.cue(position, label, tone);
        }
    }

    pub(crate) fn damage_cue(&mut self, position: Vec2, amount: f64, tone: TextTone) {
        self.capped_cue(position, format!("{:.0}", amount.floor()), tone);
    }

    pub(crate) fn update_texts(&mut self, scale: f32) {
        for text in &mut self.texts {
            text.position.y -= TEXT_RISE * scale;
            text.life -= scale;
        }
        self.texts.retain(|text| text.life > 0.0);
    }

    pub(crate) fn spawn_food(&mut self, out_events: &mut Vec<Event>) {
        if self.scheduler.is_active() && self.rng.chance(FOOD_SPAWN_CHANCE) {
            self.spawn_pickup_on_path(None, out_events);
        }
    }

    /// Drops a pickup at a random point of a random path segment.
    ///
    /// Without an explicit kind the pickup is rolled from the food table.
    pub(crate) fn spawn_pickup_on_path(&mut self, kind: Option<PickupKind>, out_events: &mut Vec<Event>) {
        let path = &self.content.path;
        let segment = self.rng.pick(path.segment_count());
        let t = self.rng.unit() as f32;
        let position = path.point_on_segment(segment, t);
        let kind = match kind {
            Some(kind) => kind,
            None => roll_food(&mut self.rng),
        };

        let id = self.allocate_pickup_id();
        self.pickups.push(Pickup::fresh(id, kind, position));
        out_events.push(Event::PickupSpawned { pickup: id, kind });
    }

    pub(crate) fn update_pickups(&mut self, scale: f32) {
        for pickup in &mut self.pickups {
            pickup.life -= scale;
        }
    }

    pub(crate) fn resolve_pickup_collisions(&mut self, out_events: &mut Vec<Event>) {
        for index in 0..self.pickups.len() {
            let pickup = self.pickups[index];
            if !pickup.is_live() {
                continue;
            }
            let Some(eater) =
                first_in_reach(&self.attackers, pickup.position, Reach::closer_than(EAT_RADIUS), None)
            else {
                continue;
            };
            self.pickups[index].life = 0.0;
            let attacker_id = self.attackers[eater].id;
            out_events.push(Event::PickupConsumed {
                pickup: pickup.id,
                attacker: attacker_id,
                kind: pickup.kind,
            });
            self.consume(eater, pickup, out_events);
        }
    }

    fn consume(&mut self, eater: usize, pickup: Pickup, out_events: &mut Vec<Event>) {
        let attacker = &mut self.attackers[eater];
        match pickup.kind {
            PickupKind::Heal => {
                attacker.hp = (attacker.hp + attacker.max_hp * HEAL_FRACTION).min(attacker.max_hp);
                self.cue(pickup.position, "Yum!".to_string(), TextTone::Heal);
            }
            PickupKind::Speed => {
                attacker.speed *= SPEED_BOOST;
                self.cue(pickup.position, "Speed!".to_string(), TextTone::Warning);
            }
            PickupKind::Invincibility => {
                attacker.status.invincible = INVINCIBILITY_TICKS;
                self.cue(pickup.position, "Invincible!".to_string(), TextTone::Warning);
            }
            PickupKind::Poison => {
                let damage = (attacker.max_hp * POISON_FRACTION).floor();
                self.wound_attacker(eater, damage, out_events);
                let attacker = &mut self.attackers[eater];
                if !attacker.dead {
                    attacker.status.slow = POISON_SLOW_TICKS;
                }
            }
        }
    }
}

//! Homing projectiles and everything that happens on impact.

use elemental_defence_core::{AttackerId, DefenderId, Element, Event, ProjectileId, Skill, Vec2};
use elemental_defence_system_combat::{
    root_ticks, splash, FREEZE_TICKS, POISON_DAMAGE, SLOW_TICKS,
};
use elemental_defence_system_targeting::Reach;

use crate::attackers::Killer;
use crate::pickups::TextTone;
use crate::World;

/// Parameters of a projectile about to leave its defender.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Launch {
    pub(crate) origin: Vec2,
    pub(crate) target: AttackerId,
    pub(crate) damage: f64,
    pub(crate) element: Element,
    pub(crate) speed: f32,
    pub(crate) crit: bool,
    pub(crate) skill: Option<Skill>,
    pub(crate) source: DefenderId,
    pub(crate) source_level: u32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: Vec2,
    pub(crate) target: AttackerId,
    pub(crate) damage: f64,
    pub(crate) element: Element,
    pub(crate) speed: f32,
    pub(crate) crit: bool,
    pub(crate) skill: Option<Skill>,
    pub(crate) source: DefenderId,
    pub(crate) source_level: u32,
    pub(crate) resolved: bool,
}

impl World {
    pub(crate) fn launch(&mut self, launch: Launch) {
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile {
            id,
            position: launch.origin,
            target: launch.target,
            damage: launch.damage,
            element: launch.element,
            speed: launch.speed,
            crit: launch.crit,
            skill: launch.skill,
            source: launch.source,
            source_level: launch.source_level,
            resolved: false,
        });
    }

    fn live_attacker_index(&self, id: AttackerId) -> Option<usize> {
        self.attackers
            .iter()
            .position(|attacker| attacker.id == id && !attacker.dead)
    }

    pub(crate) fn update_projectiles(&mut self, scale: f32, out_events: &mut Vec<Event>) {
        let count = self.projectiles.len();
        for index in 0..count {
            if self.projectiles[index].resolved {
                continue;
            }
            let Some(target) = self.live_attacker_index(self.projectiles[index].target) else {
                self.projectiles[index].resolved = true;
                continue;
            };

            let destination = self.attackers[target].progress.position();
            let projectile = &mut self.projectiles[index];
            let travel = projectile.speed * scale;
            let distance = projectile.position.distance(destination);
            if distance > travel {
                projectile.position += (destination - projectile.position) / distance * travel;
                continue;
            }

            projectile.position = destination;
            projectile.resolved = true;
            let hit = *projectile;
            self.impact(hit, target, out_events);
        }
    }

    fn impact(&mut self, hit: Projectile, target: usize, out_events: &mut Vec<Event>) {
        if hit.crit {
            self.capped_cue(hit.position, "CRIT!".to_string(), TextTone::Effective);
        }

        if hit.skill == Some(Skill::Merchant) {
            let attacker = &mut self.attackers[target];
            attacker.hp = (attacker.hp + hit.damage).min(attacker.max_hp);
            let income = hit.damage.max(0.0) as u64;
            self.gold = self.gold.saturating_add(income);
            self.cue(hit.position, format!("+${income}"), TextTone::Gold);
        } else {
            let killer = Some(Killer {
                defender: hit.source,
                skill: hit.skill,
            });
            self.strike_attacker(target, hit.damage, hit.element, killer, out_events);
            if let Some(splash) = splash(hit.skill) {
                let victims = self
                    .targeting
                    .in_reach(&self.attackers, hit.position, Reach::within(splash.radius))
                    .to_vec();
                for victim in victims {
                    if victim == target || self.attackers[victim].dead {
                        continue;
                    }
                    self.strike_attacker(
                        victim,
                        hit.damage * splash.fraction,
                        hit.element,
                        killer,
                        out_events,
                    );
                }
            }
        }

        if !self.attackers[target].dead {
            self.apply_crowd_control(hit, target);
        }
    }

    fn apply_crowd_control(&mut self, hit: Projectile, target: usize) {
        let attacker = &mut self.attackers[target];
        let boss = attacker.is_boss();
        if hit.element == Element::Water || hit.skill == Some(Skill::Slow) {
            attacker.status.slow = SLOW_TICKS;
        }
        if hit.element == Element::Poison || hit.skill == Some(Skill::Poison) {
            attacker.status.poison = POISON_DAMAGE;
            attacker.status.poison_clock = 0.0;
        }
        match hit.skill {
            Some(Skill::Freeze) if boss => {
                self.capped_cue(hit.position, "Immune!".to_string(), TextTone::Resisted);
            }
            Some(Skill::Freeze) => attacker.status.stop = FREEZE_TICKS,
            Some(Skill::Root) if boss => attacker.status.stop = root_ticks(hit.source_level),
            _ => {}
        }
    }
}

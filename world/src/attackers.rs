//! Attacker state machine: status effects, melee, summons, travel, damage
//! intake and death resolution.

use elemental_defence_core::{
    combined_multiplier, AttackerId, DefenderId, Element, ElementSet, Event, Path, RollExt,
    Skill, SpawnTier, Vec2, WaveConfig, TICKS_PER_SECOND, TILE_SIZE,
};
use elemental_defence_system_movement::{PathProgress, Travel};
use elemental_defence_system_targeting::{first_in_reach, Candidate, Positioned, Reach};
use tracing::debug;

use crate::pickups::TextTone;
use crate::World;

const REGEN_CHANCE: f64 = 0.01;
const REGEN_FRACTION: f64 = 0.005;
const SLOW_FACTOR: f32 = 0.5;
const MELEE_REACH: f32 = TILE_SIZE * 2.0;
const MELEE_DAMAGE: f64 = 10.0;
const BOSS_MELEE_FACTOR: f64 = 5.0;
const MELEE_COOLDOWN: f32 = 60.0;
const SUMMON_PERIOD: f32 = 5.0 * TICKS_PER_SECOND;
const SUMMON_CHANCE: f64 = 0.1;
const REVIVAL_CHANCE: f64 = 0.05;
const SPLIT_CHANCE: f64 = 0.05;
const SPLIT_HP_FRACTION: f64 = 0.5;
const SPLIT_SCALE_FACTOR: f32 = 0.8;
const GREED_KILL_BONUS: f64 = 0.5;
const SCORE_PER_GOLD: u64 = 10;
const SILENCE_CHANCE: f64 = 0.05;
const SILENCE_TICKS: f32 = 3.0 * TICKS_PER_SECOND;
const MAX_SILENCED_PER_DEATH: usize = 3;

/// Timed conditions carried by an attacker. Every timer counts ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Status {
    pub(crate) slow: f32,
    pub(crate) stop: f32,
    pub(crate) poison: f64,
    pub(crate) poison_clock: f32,
    pub(crate) invincible: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Attacker {
    pub(crate) id: AttackerId,
    pub(crate) tier: SpawnTier,
    pub(crate) is_split: bool,
    pub(crate) revived: bool,
    pub(crate) progress: PathProgress,
    pub(crate) hp: f64,
    pub(crate) max_hp: f64,
    pub(crate) speed: f32,
    pub(crate) scale: f32,
    pub(crate) reward: u64,
    pub(crate) elements: ElementSet,
    pub(crate) status: Status,
    pub(crate) melee_cooldown: f32,
    pub(crate) summon_clock: f32,
    pub(crate) dead: bool,
}

/// The defender credited with a hit, with the skill its shot carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Killer {
    pub(crate) defender: DefenderId,
    pub(crate) skill: Option<Skill>,
}

impl Attacker {
    pub(crate) fn spawn(id: AttackerId, config: &WaveConfig, tier: SpawnTier, path: &Path) -> Self {
        let profile = config.profile(tier);
        Self {
            id,
            tier,
            is_split: false,
            revived: false,
            progress: PathProgress::start(path),
            hp: profile.hp,
            max_hp: profile.hp,
            speed: profile.speed,
            scale: profile.scale,
            reward: profile.reward,
            elements: config.elements,
            status: Status::default(),
            melee_cooldown: 0.0,
            summon_clock: 0.0,
            dead: false,
        }
    }

    pub(crate) fn is_boss(&self) -> bool {
        self.tier == SpawnTier::Boss
    }

    pub(crate) fn is_invincible(&self) -> bool {
        self.status.invincible > 0.0
    }

    /// Revival and splitting are reserved for full-blooded spawns.
    fn may_cheat_death(&self) -> bool {
        !self.revived && self.tier != SpawnTier::Minion && !self.is_split
    }

    /// Ticks the movement-affecting timers and returns this tick's step.
    fn step_length(&mut self, scale: f32, weather: f32) -> f32 {
        let mut step = self.speed * scale * weather;
        if self.status.stop > 0.0 {
            step = 0.0;
            self.status.stop -= scale;
        } else if self.status.slow > 0.0 {
            step *= SLOW_FACTOR;
            self.status.slow -= scale;
        }
        if self.status.invincible > 0.0 {
            self.status.invincible -= scale;
        }
        step
    }
}

impl Positioned for Attacker {
    fn position(&self) -> Vec2 {
        self.progress.position()
    }

    fn is_live(&self) -> bool {
        !self.dead
    }
}

impl Candidate for Attacker {
    fn hp(&self) -> f64 {
        self.hp
    }

    fn is_boss(&self) -> bool {
        Attacker::is_boss(self)
    }
}

impl World {
    pub(crate) fn update_attackers(&mut self, scale: f32, out_events: &mut Vec<Event>) {
        let weather = self.weather.move_factor();
        let count = self.attackers.len();
        for index in 0..count {
            if !self.attackers[index].dead {
                self.update_attacker(index, scale, weather, out_events);
            }
        }
    }

    fn update_attacker(&mut self, index: usize, scale: f32, weather: f32, out_events: &mut Vec<Event>) {
        let step = self.attackers[index].step_length(scale, weather);

        let attacker = &self.attackers[index];
        if attacker.hp < attacker.max_hp && self.rng.chance(REGEN_CHANCE) {
            let attacker = &mut self.attackers[index];
            attacker.hp = (attacker.hp + attacker.max_hp * REGEN_FRACTION).min(attacker.max_hp);
        }

        self.tick_poison(index, scale, out_events);
        if self.attackers[index].dead {
            return;
        }

        self.attacker_melee(index, scale, out_events);
        if self.attackers[index].is_boss() {
            self.boss_summon(index, scale, out_events);
        }

        let attacker = &mut self.attackers[index];
        if attacker.progress.advance(&self.content.path, step) == Travel::ReachedEnd {
            self.attacker_escaped(index, out_events);
        }
    }

    fn tick_poison(&mut self, index: usize, scale: f32, out_events: &mut Vec<Event>) {
        let status = &mut self.attackers[index].status;
        if status.poison <= 0.0 {
            return;
        }
        let due = status.poison_clock <= 0.0;
        if due {
            status.poison_clock = TICKS_PER_SECOND;
        }
        status.poison_clock -= scale;
        if due {
            let amount = status.poison;
            self.wound_attacker(index, amount, out_events);
        }
    }

    fn attacker_melee(&mut self, index: usize, scale: f32, out_events: &mut Vec<Event>) {
        let attacker = &mut self.attackers[index];
        if attacker.melee_cooldown > 0.0 {
            attacker.melee_cooldown -= scale;
        }
        if attacker.melee_cooldown > 0.0 {
            return;
        }
        let origin = attacker.progress.position();
        let factor = if attacker.is_boss() { BOSS_MELEE_FACTOR } else { 1.0 };
        let Some(target) = first_in_reach(&self.defenders, origin, Reach::closer_than(MELEE_REACH), None)
        else {
            return;
        };
        self.attackers[index].melee_cooldown = MELEE_COOLDOWN;
        self.damage_defender(target, MELEE_DAMAGE * factor * self.incoming_damage, out_events);
    }

    fn boss_summon(&mut self, index: usize, scale: f32, out_events: &mut Vec<Event>) {
        let boss = &mut self.attackers[index];
        boss.summon_clock += scale;
        if boss.summon_clock < SUMMON_PERIOD {
            return;
        }
        boss.summon_clock = 0.0;
        if !self.rng.chance(SUMMON_CHANCE) {
            return;
        }
        let Some(minion) = self.spawn_escort(index) else {
            return;
        };
        let boss = &self.attackers[index];
        let (boss_id, position) = (boss.id, boss.progress.position());
        let minion_id = self.attackers[minion].id;
        self.cue(position, "Summon!".to_string(), TextTone::Warning);
        out_events.push(Event::MinionSummoned {
            boss: boss_id,
            minion: minion_id,
        });
    }

    /// Spawns a minion of the wave in play at the progress of `origin`.
    ///
    /// Returns the arena index of the new attacker.
    fn spawn_escort(&mut self, origin: usize) -> Option<usize> {
        let id = self.allocate_attacker_id();
        let config = self.content.waves.get(self.scheduler.wave())?;
        let mut escort = Attacker::spawn(id, config, SpawnTier::Minion, &self.content.path);
        escort.progress = self.attackers[origin].progress;
        self.attackers.push(escort);
        Some(self.attackers.len() - 1)
    }

    fn attacker_escaped(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let attacker = &mut self.attackers[index];
        attacker.dead = true;
        let id = attacker.id;
        self.lives = self.lives.saturating_sub(1);
        debug!(attacker = id.get(), lives = self.lives, "attacker reached the end");
        out_events.push(Event::AttackerReachedEnd {
            attacker: id,
            lives: self.lives,
        });
        if self.lives == 0 {
            self.declare_defeat(out_events);
        }
    }

    /// Deals elemental damage to the attacker at `index`.
    pub(crate) fn strike_attacker(
        &mut self,
        index: usize,
        amount: f64,
        element: Element,
        killer: Option<Killer>,
        out_events: &mut Vec<Event>,
    ) {
        let attacker = &self.attackers[index];
        if attacker.dead {
            return;
        }
        let position = attacker.progress.position();
        if attacker.is_invincible() {
            self.capped_cue(position, "Invincible!".to_string(), TextTone::Neutral);
            return;
        }

        let multiplier = combined_multiplier(element, &attacker.elements);
        let dealt = amount * multiplier;
        self.attackers[index].hp -= dealt;

        let tone = if multiplier > 1.2 {
            TextTone::Effective
        } else if multiplier < 0.8 {
            TextTone::Resisted
        } else {
            TextTone::Neutral
        };
        self.damage_cue(position, dealt, tone);

        if self.attackers[index].hp <= 0.0 {
            self.resolve_attacker_death(index, killer, out_events);
        }
    }

    /// Deals raw damage that ignores the element chart.
    pub(crate) fn wound_attacker(&mut self, index: usize, amount: f64, out_events: &mut Vec<Event>) {
        let attacker = &mut self.attackers[index];
        if attacker.dead || attacker.is_invincible() {
            return;
        }
        attacker.hp -= amount;
        let position = attacker.progress.position();
        self.damage_cue(position, amount, TextTone::Poison);
        if self.attackers[index].hp <= 0.0 {
            self.resolve_attacker_death(index, None, out_events);
        }
    }

    fn resolve_attacker_death(
        &mut self,
        index: usize,
        killer: Option<Killer>,
        out_events: &mut Vec<Event>,
    ) {
        if self.attackers[index].may_cheat_death() {
            if self.rng.chance(REVIVAL_CHANCE) {
                let attacker = &mut self.attackers[index];
                attacker.revived = true;
                attacker.max_hp *= 2.0;
                attacker.hp = attacker.max_hp;
                let (id, max_hp, position) = (attacker.id, attacker.max_hp, attacker.progress.position());
                debug!(attacker = id.get(), max_hp, "attacker revived");
                self.cue(position, "REVIVED!".to_string(), TextTone::Warning);
                out_events.push(Event::AttackerRevived { attacker: id, max_hp });
                return;
            }
            if self.rng.chance(SPLIT_CHANCE) {
                self.split_attacker(index, out_events);
            }
        }

        let attacker = &mut self.attackers[index];
        attacker.dead = true;
        let (id, base, boss) = (attacker.id, attacker.reward, attacker.is_boss());

        let greedy = killer.is_some_and(|killer| killer.skill == Some(Skill::Greed));
        let bonus = if greedy {
            (base as f64 * GREED_KILL_BONUS).floor() as u64
        } else {
            0
        };
        let reward = base.saturating_add(bonus);
        self.gold = self.gold.saturating_add(reward);
        self.score = self.score.saturating_add(base.saturating_mul(SCORE_PER_GOLD));
        debug!(attacker = id.get(), reward, "attacker killed");
        out_events.push(Event::AttackerKilled {
            attacker: id,
            reward,
            killer: killer.map(|killer| killer.defender),
        });

        self.silence_on_death(boss, out_events);
    }

    fn split_attacker(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let Some(child) = self.spawn_escort(index) else {
            return;
        };
        let parent = &self.attackers[index];
        let (parent_id, max_hp, scale) = (parent.id, parent.max_hp, parent.scale);
        let position = parent.progress.position();

        let spawned = &mut self.attackers[child];
        spawned.is_split = true;
        spawned.max_hp = max_hp * SPLIT_HP_FRACTION;
        spawned.hp = spawned.max_hp;
        spawned.scale = scale * SPLIT_SCALE_FACTOR;
        let child_id = spawned.id;

        self.cue(position, "SPLIT!".to_string(), TextTone::Warning);
        out_events.push(Event::AttackerSplit {
            parent: parent_id,
            child: child_id,
        });
    }

    fn silence_on_death(&mut self, boss: bool, out_events: &mut Vec<Event>) {
        let any_defender = self.defenders.iter().any(|defender| !defender.dead);
        if !(boss || self.rng.chance(SILENCE_CHANCE)) || !any_defender {
            return;
        }

        let count = self.rng.pick(MAX_SILENCED_PER_DEATH) + 1;
        let mut candidates = self
            .targeting
            .matching(&self.defenders, |defender| {
                !defender.dead && defender.silenced <= 0.0
            })
            .to_vec();
        for _ in 0..count {
            if candidates.is_empty() {
                break;
            }
            let picked = candidates.remove(self.rng.pick(candidates.len()));
            let defender = &mut self.defenders[picked];
            defender.silenced = SILENCE_TICKS;
            let (id, position) = (defender.id, defender.cell.center());
            debug!(defender = id.get(), "defender silenced");
            self.cue(position, "SILENCED!".to_string(), TextTone::Warning);
            out_events.push(Event::DefenderSilenced { defender: id });
        }
    }
}

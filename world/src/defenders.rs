//! Defender state machine plus the build, sell, upgrade and active-skill
//! commands.

use elemental_defence_core::{
    ArchetypeId, AttackerId, CellCoord, CommandError, DefenderId, Element, Event, PickupKind,
    RollExt, Skill, Vec2, TICKS_PER_SECOND, TILE_SIZE,
};
use elemental_defence_system_builder::validate_placement;
use elemental_defence_system_combat::{
    resolve_shot, sell_value, shot_damage, teleport_chance_percent, teleport_period, trap_damage,
    upgrade_cost, ShotInput, BERSERK_DRAIN, BERSERK_REACH, NUKE_COOLDOWN, NUKE_DAMAGE_PER_LEVEL,
    PROJECTILE_SPEED, STARFALL_PROJECTILE_SPEED,
};
use elemental_defence_system_content::Catalog;
use elemental_defence_system_targeting::{first_in_reach, strongest, Positioned, Reach};
use tracing::debug;

use crate::attackers::Killer;
use crate::pickups::TextTone;
use crate::projectiles::Launch;
use crate::World;

const REGEN_CHANCE: f64 = 0.01;
const REGEN_AMOUNT: f64 = 1.0;
const TRANSFORM_PERIOD: f32 = 10.0 * TICKS_PER_SECOND;
const INCOME_PERIOD: f32 = 5.0 * TICKS_PER_SECOND;
const INCOME_AMOUNT: u64 = 10;
const HEAL_PERIOD: f32 = TICKS_PER_SECOND;
const HEAL_REACH: f32 = TILE_SIZE * 3.0;
const HEAL_PER_LEVEL: f64 = 5.0;
const POISON_TRAP_PERIOD: f32 = TICKS_PER_SECOND;
const POISON_TRAP_CHANCE: f64 = 0.05;
const TELEPORT_REWIND: usize = 5;
const STARFALL_CRUSH_CHANCE: f64 = 0.15;
const TRAP_CONTACT: f32 = TILE_SIZE * 0.5;
const TRAP_RELEASE: f32 = TILE_SIZE;
const TRAP_SLOW_TICKS: f32 = 120.0;
const SPEED_AURA: f32 = 2.0;
const DAMAGE_AURA: f64 = 1.5;
const CRIT_AURA: f64 = 0.3;

/// Multipliers granted by nearby support defenders, recomputed every update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Auras {
    pub(crate) attack_speed: f32,
    pub(crate) damage: f64,
    pub(crate) crit: f64,
}

impl Auras {
    const NEUTRAL: Self = Self {
        attack_speed: 1.0,
        damage: 1.0,
        crit: 0.0,
    };
}

#[derive(Clone, Debug)]
pub(crate) struct Defender {
    pub(crate) id: DefenderId,
    pub(crate) archetype: ArchetypeId,
    pub(crate) cell: CellCoord,
    pub(crate) level: u32,
    pub(crate) spent: u64,
    pub(crate) hp: f64,
    pub(crate) max_hp: f64,
    pub(crate) cooldown: f32,
    pub(crate) skill_clock: f32,
    pub(crate) transform_clock: f32,
    pub(crate) active_cooldown: f32,
    pub(crate) silenced: f32,
    pub(crate) auras: Auras,
    pub(crate) trapped: Vec<AttackerId>,
    pub(crate) dead: bool,
}

impl Defender {
    pub(crate) fn new(
        id: DefenderId,
        archetype: ArchetypeId,
        cell: CellCoord,
        cost: u64,
        max_hp: f64,
    ) -> Self {
        Self {
            id,
            archetype,
            cell,
            level: 1,
            spent: cost,
            hp: max_hp,
            max_hp,
            cooldown: 0.0,
            skill_clock: 0.0,
            transform_clock: 0.0,
            active_cooldown: 0.0,
            silenced: 0.0,
            auras: Auras::NEUTRAL,
            trapped: Vec::new(),
            dead: false,
        }
    }
}

impl Positioned for Defender {
    fn position(&self) -> Vec2 {
        self.cell.center()
    }

    fn is_live(&self) -> bool {
        !self.dead
    }
}

/// Catalog stats of a defender's current archetype.
#[derive(Clone, Copy, Debug)]
struct Stats {
    element: Element,
    damage: f64,
    range: f32,
    cooldown: f32,
    cost: u64,
    skill: Option<Skill>,
}

fn stats(catalog: &Catalog, archetype: ArchetypeId) -> Option<Stats> {
    let entry = catalog.get(archetype)?;
    Some(Stats {
        element: entry.element,
        damage: entry.damage,
        range: entry.range,
        cooldown: entry.cooldown,
        cost: entry.cost,
        skill: entry.skill,
    })
}

impl World {
    pub(crate) fn live_defender_index(&self, id: DefenderId) -> Option<usize> {
        self.defenders
            .iter()
            .position(|defender| defender.id == id && !defender.dead)
    }

    pub(crate) fn build_defender(
        &mut self,
        archetype: ArchetypeId,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let entry = self
            .content
            .catalog
            .get(archetype)
            .ok_or(CommandError::UnknownArchetype(archetype))?;
        let occupied = self
            .defenders
            .iter()
            .any(|defender| !defender.dead && defender.cell == cell);
        validate_placement(entry, cell, &self.content.path, occupied, self.gold)?;
        let (cost, max_hp) = (entry.cost, entry.max_hp());

        self.gold -= cost;
        let id = self.allocate_defender_id();
        self.defenders.push(Defender::new(id, archetype, cell, cost, max_hp));
        debug!(defender = id.get(), archetype = archetype.get(), cost, "defender built");
        out_events.push(Event::DefenderBuilt {
            defender: id,
            archetype,
            cell,
            cost,
        });
        Ok(())
    }

    pub(crate) fn sell_defender(
        &mut self,
        id: DefenderId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let index = self
            .live_defender_index(id)
            .ok_or(CommandError::MissingDefender)?;
        let defender = self.defenders.remove(index);
        let refund = sell_value(defender.spent, defender.hp, defender.max_hp);
        self.gold = self.gold.saturating_add(refund);
        debug!(defender = id.get(), refund, "defender sold");
        out_events.push(Event::DefenderSold {
            defender: id,
            refund,
        });
        self.clear_selection_of(id, out_events);
        Ok(())
    }

    pub(crate) fn upgrade_defender(
        &mut self,
        id: DefenderId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let index = self
            .live_defender_index(id)
            .ok_or(CommandError::MissingDefender)?;
        let base = stats(&self.content.catalog, self.defenders[index].archetype)
            .ok_or(CommandError::MissingDefender)?
            .cost;
        let cost = upgrade_cost(base, self.defenders[index].level);
        if self.gold < cost {
            return Err(CommandError::InsufficientGold {
                required: cost,
                available: self.gold,
            });
        }

        self.gold -= cost;
        let defender = &mut self.defenders[index];
        defender.level += 1;
        defender.spent = defender.spent.saturating_add(cost);
        let level = defender.level;
        debug!(defender = id.get(), level, cost, "defender upgraded");
        out_events.push(Event::DefenderUpgraded {
            defender: id,
            level,
            cost,
        });
        Ok(())
    }

    pub(crate) fn trigger_active_skill(
        &mut self,
        id: DefenderId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let index = self
            .live_defender_index(id)
            .ok_or(CommandError::MissingDefender)?;
        let defender = &self.defenders[index];
        if defender.silenced > 0.0 {
            return Err(CommandError::Silenced);
        }
        let stats = stats(&self.content.catalog, defender.archetype)
            .filter(|stats| stats.skill.is_some_and(Skill::is_active))
            .ok_or(CommandError::NoActiveSkill)?;
        if defender.active_cooldown > 0.0 {
            return Err(CommandError::SkillOnCooldown);
        }
        let target = strongest(&self.attackers).ok_or(CommandError::NoValidTarget)?;

        let damage = NUKE_DAMAGE_PER_LEVEL * f64::from(defender.level);
        self.defenders[index].active_cooldown = NUKE_COOLDOWN;
        let target_id = self.attackers[target].id;
        debug!(defender = id.get(), target = target_id.get(), damage, "active skill fired");
        out_events.push(Event::ActiveSkillTriggered {
            defender: id,
            target: target_id,
            damage,
        });
        let killer = Killer {
            defender: id,
            skill: stats.skill,
        };
        self.strike_attacker(target, damage, stats.element, Some(killer), out_events);
        Ok(())
    }

    /// Applies damage from attackers or weather to the defender at `index`.
    pub(crate) fn damage_defender(&mut self, index: usize, amount: f64, out_events: &mut Vec<Event>) {
        let defender = &mut self.defenders[index];
        if defender.dead {
            return;
        }
        defender.hp -= amount;
        let (position, destroyed) = (defender.cell.center(), defender.hp <= 0.0);
        self.damage_cue(position, amount, TextTone::Warning);
        if destroyed {
            self.destroy_defender(index, out_events);
        }
    }

    pub(crate) fn destroy_defender(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let defender = &mut self.defenders[index];
        if defender.dead {
            return;
        }
        defender.dead = true;
        let id = defender.id;
        debug!(defender = id.get(), "defender destroyed");
        out_events.push(Event::DefenderDestroyed { defender: id });
        self.clear_selection_of(id, out_events);
    }

    fn clear_selection_of(&mut self, id: DefenderId, out_events: &mut Vec<Event>) {
        if self.selected == Some(id) {
            self.selected = None;
            out_events.push(Event::SelectionChanged { defender: None });
        }
    }

    pub(crate) fn update_defenders(&mut self, scale: f32, out_events: &mut Vec<Event>) {
        let count = self.defenders.len();
        for index in 0..count {
            if !self.defenders[index].dead {
                self.update_defender(index, scale, out_events);
            }
        }
    }

    fn update_defender(&mut self, index: usize, scale: f32, out_events: &mut Vec<Event>) {
        let defender = &self.defenders[index];
        if defender.hp < defender.max_hp && self.rng.chance(REGEN_CHANCE) {
            let defender = &mut self.defenders[index];
            defender.hp = (defender.hp + REGEN_AMOUNT).min(defender.max_hp);
        }

        let defender = &mut self.defenders[index];
        if defender.silenced > 0.0 {
            defender.silenced -= scale;
            return;
        }
        defender.active_cooldown = (defender.active_cooldown - scale).max(0.0);

        self.tick_transform(index, scale, out_events);
        self.refresh_auras(index);
        let Some(stats) = stats(&self.content.catalog, self.defenders[index].archetype) else {
            return;
        };
        self.tick_passive_skill(index, stats, scale, out_events);

        let attack_factor = self.weather.attack_factor();
        let defender = &mut self.defenders[index];
        if defender.cooldown > 0.0 {
            defender.cooldown -= scale * defender.auras.attack_speed * attack_factor;
            return;
        }

        match stats.skill {
            Some(Skill::Starfall) => self.starfall(index, stats),
            Some(Skill::Barricade) => self.spring_trap(index, stats, out_events),
            _ => self.standard_attack(index, stats, out_events),
        }
    }

    fn tick_transform(&mut self, index: usize, scale: f32, out_events: &mut Vec<Event>) {
        let catalog = &self.content.catalog;
        let defender = &mut self.defenders[index];
        if stats(catalog, defender.archetype).and_then(|stats| stats.skill) != Some(Skill::Transform) {
            return;
        }
        defender.transform_clock += scale;
        if defender.transform_clock < TRANSFORM_PERIOD {
            return;
        }
        defender.transform_clock = 0.0;

        let drawn = self.rng.pick(catalog.len());
        let mut next = catalog
            .nth(drawn)
            .map_or(ArchetypeId::new(0), |entry| entry.id);
        if stats(catalog, next).and_then(|stats| stats.skill) == Some(Skill::Transform) {
            next = ArchetypeId::new(0);
        }

        let defender = &mut self.defenders[index];
        defender.archetype = next;
        let (id, position) = (defender.id, defender.cell.center());
        debug!(defender = id.get(), archetype = next.get(), "defender transformed");
        self.cue(position, "Transform!".to_string(), TextTone::Warning);
        out_events.push(Event::DefenderTransformed {
            defender: id,
            archetype: next,
        });
    }

    fn refresh_auras(&mut self, index: usize) {
        let position = self.defenders[index].cell.center();
        let mut auras = Auras::NEUTRAL;
        for (other_index, other) in self.defenders.iter().enumerate() {
            if other_index == index || other.dead {
                continue;
            }
            let Some(other_stats) = stats(&self.content.catalog, other.archetype) else {
                continue;
            };
            if !Reach::within(other_stats.range).contains(other.cell.center(), position) {
                continue;
            }
            match other_stats.skill {
                Some(Skill::BuffSpeed) => auras.attack_speed = SPEED_AURA,
                Some(Skill::BuffDamage) => auras.damage = DAMAGE_AURA,
                Some(Skill::BuffCrit) => auras.crit = CRIT_AURA,
                _ => {}
            }
        }
        self.defenders[index].auras = auras;
    }

    fn tick_passive_skill(&mut self, index: usize, stats: Stats, scale: f32, out_events: &mut Vec<Event>) {
        let defender = &mut self.defenders[index];
        defender.skill_clock += scale;
        let (clock, level, position) = (defender.skill_clock, defender.level, defender.cell.center());

        match stats.skill {
            Some(Skill::Gold | Skill::Meteor) if clock >= INCOME_PERIOD => {
                defender.skill_clock = 0.0;
                self.gold = self.gold.saturating_add(INCOME_AMOUNT);
                self.cue(position, format!("+${INCOME_AMOUNT}"), TextTone::Gold);
            }
            Some(Skill::Teleport) if clock >= teleport_period(level) => {
                defender.skill_clock = 0.0;
                self.attempt_teleport(position, level, stats.range, out_events);
            }
            Some(Skill::Heal) if clock >= HEAL_PERIOD => {
                defender.skill_clock = 0.0;
                self.heal_neighbour(index, position, level);
            }
            Some(Skill::SpawnPoison) if clock >= POISON_TRAP_PERIOD => {
                defender.skill_clock = 0.0;
                if self.rng.chance(POISON_TRAP_CHANCE) {
                    self.spawn_pickup_on_path(Some(PickupKind::Poison), out_events);
                }
            }
            _ => {}
        }
    }

    fn attempt_teleport(&mut self, position: Vec2, level: u32, range: f32, out_events: &mut Vec<Event>) {
        let chance = teleport_chance_percent(self.rng.unit(), level);
        if self.rng.unit() * 100.0 >= chance {
            return;
        }
        let candidates = self
            .targeting
            .in_reach(&self.attackers, position, Reach::within(range))
            .to_vec();
        if candidates.is_empty() {
            return;
        }
        let target = candidates[self.rng.pick(candidates.len())];
        let attacker = &mut self.attackers[target];
        attacker.progress.rewind(&self.content.path, TELEPORT_REWIND);
        let (id, path_index, landing) = (
            attacker.id,
            attacker.progress.index(),
            attacker.progress.position(),
        );
        self.cue(landing, "Teleport!".to_string(), TextTone::Warning);
        out_events.push(Event::AttackerTeleported {
            attacker: id,
            path_index,
        });
    }

    fn heal_neighbour(&mut self, index: usize, position: Vec2, level: u32) {
        let reach = Reach::within(HEAL_REACH);
        let patient = self
            .targeting
            .matching(&self.defenders, |other| {
                !other.dead
                    && other.hp < other.max_hp
                    && reach.contains(position, other.cell.center())
            })
            .iter()
            .copied()
            .find(|&other| other != index);
        let Some(patient) = patient else {
            return;
        };
        let amount = HEAL_PER_LEVEL * f64::from(level);
        let defender = &mut self.defenders[patient];
        defender.hp = (defender.hp + amount).min(defender.max_hp);
        let target = defender.cell.center();
        self.cue(target, format!("+{amount:.0}"), TextTone::Heal);
    }

    fn standard_attack(&mut self, index: usize, stats: Stats, out_events: &mut Vec<Event>) {
        let position = self.defenders[index].cell.center();
        let Some(target) = first_in_reach(&self.attackers, position, Reach::within(stats.range), None)
        else {
            return;
        };
        self.shoot(index, target, stats, out_events);
        self.defenders[index].cooldown = stats.cooldown;
    }

    fn shoot(&mut self, index: usize, target: usize, stats: Stats, out_events: &mut Vec<Event>) {
        let defender = &self.defenders[index];
        let input = ShotInput {
            base_damage: stats.damage,
            level: defender.level,
            damage_multiplier: defender.auras.damage,
            crit_bonus: defender.auras.crit,
            skill: stats.skill,
            target_is_boss: self.attackers[target].is_boss(),
            gold: self.gold,
        };
        let (source, source_level, origin) = (defender.id, defender.level, defender.cell.center());
        let shot = resolve_shot(&input, &mut self.rng);

        if stats.skill == Some(Skill::Berserk) {
            let ally = first_in_reach(&self.defenders, origin, Reach::within(BERSERK_REACH), Some(index));
            if let Some(ally) = ally {
                self.damage_defender(ally, BERSERK_DRAIN, out_events);
            }
        }

        self.launch(Launch {
            origin,
            target: self.attackers[target].id,
            damage: shot.damage,
            element: stats.element,
            speed: PROJECTILE_SPEED,
            crit: shot.crit,
            skill: stats.skill,
            source,
            source_level,
        });
    }

    fn starfall(&mut self, index: usize, stats: Stats) {
        let defender = &self.defenders[index];
        let damage = shot_damage(stats.damage, defender.level, defender.auras.damage);
        let (source, source_level, origin) = (defender.id, defender.level, defender.cell.center());

        let targets = self
            .targeting
            .matching(&self.attackers, |attacker| !attacker.dead)
            .to_vec();
        for target in targets {
            self.launch(Launch {
                origin,
                target: self.attackers[target].id,
                damage,
                element: stats.element,
                speed: STARFALL_PROJECTILE_SPEED,
                crit: false,
                skill: stats.skill,
                source,
                source_level,
            });
        }

        let food = self
            .targeting
            .matching(&self.pickups, |pickup| pickup.is_live())
            .to_vec();
        if !food.is_empty() && self.rng.chance(STARFALL_CRUSH_CHANCE) {
            let crushed = &mut self.pickups[food[self.rng.pick(food.len())]];
            crushed.life = 0.0;
            let position = crushed.position;
            self.cue(position, "Crushed!".to_string(), TextTone::Neutral);
        }

        self.defenders[index].cooldown = stats.cooldown;
    }

    fn spring_trap(&mut self, index: usize, stats: Stats, out_events: &mut Vec<Event>) {
        let defender = &mut self.defenders[index];
        let (source, level, position) = (defender.id, defender.level, defender.cell.center());
        let attackers = &self.attackers;
        defender.trapped.retain(|held| {
            attackers.iter().any(|attacker| {
                attacker.id == *held
                    && !attacker.dead
                    && attacker.progress.position().distance(position) < TRAP_RELEASE
            })
        });

        let contacts = self
            .targeting
            .in_reach(&self.attackers, position, Reach::closer_than(TRAP_CONTACT))
            .to_vec();
        for target in contacts {
            let id = self.attackers[target].id;
            if self.defenders[index].trapped.contains(&id) {
                continue;
            }
            self.defenders[index].trapped.push(id);
            let damage = trap_damage(level, self.rng.unit());
            let killer = Killer {
                defender: source,
                skill: stats.skill,
            };
            self.strike_attacker(target, damage, stats.element, Some(killer), out_events);
            self.attackers[target].status.slow = TRAP_SLOW_TICKS;
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure damage and economy formulas used by defenders and projectiles.

use elemental_defence_core::{RollExt, Skill, TICKS_PER_SECOND, TILE_SIZE};

/// Travel speed of a standard projectile in world units per tick.
pub const PROJECTILE_SPEED: f32 = 8.0;

/// Travel speed of starfall projectiles in world units per tick.
pub const STARFALL_PROJECTILE_SPEED: f32 = 20.0;

/// Intrinsic crit chance of the crit skill.
pub const CRIT_SKILL_CHANCE: f64 = 0.25;

/// Hit points a berserk shot drains from a nearby ally.
pub const BERSERK_DRAIN: f64 = 10.0;

/// Radius in which a berserk defender looks for an ally to drain.
pub const BERSERK_REACH: f32 = TILE_SIZE * 2.0;

/// Damage multiplier applied by blades against bosses.
pub const BLADE_BOSS_MULTIPLIER: f64 = 3.0;

/// Share of cumulative spend returned on sale at full health.
pub const SELL_RATIO: f64 = 0.7;

/// Per-level growth factor for damage and upgrade cost.
pub const LEVEL_GROWTH: f64 = 1.5;

/// Damage dealt by the nuke per defender level.
pub const NUKE_DAMAGE_PER_LEVEL: f64 = 500.0;

/// Ticks the nuke needs to recharge.
pub const NUKE_COOLDOWN: f32 = 600.0;

/// Ticks of soft slow applied by water and slow shots.
pub const SLOW_TICKS: f32 = 60.0;

/// Ticks of hard stop applied by freeze shots.
pub const FREEZE_TICKS: f32 = 60.0;

/// Poison damage dealt per in-game second.
pub const POISON_DAMAGE: f64 = 20.0;

/// Exponential damage growth for the provided level.
#[must_use]
pub fn growth(level: u32) -> f64 {
    LEVEL_GROWTH.powi(level.saturating_sub(1) as i32)
}

/// Damage of a standard shot before crits and skill overrides.
#[must_use]
pub fn shot_damage(base: f64, level: u32, damage_multiplier: f64) -> f64 {
    (base * growth(level) * damage_multiplier).floor()
}

/// Gold refunded when selling, scaled by remaining health.
#[must_use]
pub fn sell_value(spent: u64, hp: f64, max_hp: f64) -> u64 {
    if max_hp <= 0.0 {
        return 0;
    }
    let health = (hp / max_hp).clamp(0.0, 1.0);
    (spent as f64 * SELL_RATIO * health).floor() as u64
}

/// Gold required to raise a defender from `level` to `level + 1`.
#[must_use]
pub fn upgrade_cost(archetype_cost: u64, level: u32) -> u64 {
    (archetype_cost as f64 * LEVEL_GROWTH.powi(level as i32)).floor() as u64
}

/// Damage of a greed shot: a share of the gold reserve, never below ten.
#[must_use]
pub fn greed_damage(gold: u64, level: u32) -> f64 {
    let share = 0.005 + f64::from(level.saturating_sub(1)) * 0.001;
    (gold as f64 * share).floor().max(10.0)
}

/// Crit chance from the archetype skill plus aura bonus.
#[must_use]
pub fn crit_chance(skill: Option<Skill>, bonus: f64) -> f64 {
    let intrinsic = if skill == Some(Skill::Crit) {
        CRIT_SKILL_CHANCE
    } else {
        0.0
    };
    intrinsic + bonus
}

/// Splash applied around the primary target on arrival.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splash {
    /// Radius around the target in world units.
    pub radius: f32,
    /// Fraction of the primary damage dealt to each splashed attacker.
    pub fraction: f64,
}

/// Splash profile for the provided skill, if it splashes.
#[must_use]
pub fn splash(skill: Option<Skill>) -> Option<Splash> {
    match skill? {
        Skill::Aoe => Some(Splash {
            radius: 100.0,
            fraction: 0.5,
        }),
        Skill::Blackhole => Some(Splash {
            radius: 150.0,
            fraction: 0.8,
        }),
        Skill::Meteor => Some(Splash {
            radius: 120.0,
            fraction: 0.5,
        }),
        _ => None,
    }
}

/// Ticks a root shot pins a boss: a tenth of a second per level.
#[must_use]
pub fn root_ticks(level: u32) -> f32 {
    (f64::from(level) * 0.1 * f64::from(TICKS_PER_SECOND)).floor() as f32
}

/// Contact damage of a barricade trap given a uniform roll in `[0, 1)`.
#[must_use]
pub fn trap_damage(level: u32, roll: f64) -> f64 {
    let bonus = f64::from(level.saturating_sub(1)) * 20.0;
    let low = 20.0 + bonus;
    let high = 50.0 + bonus;
    (low + roll * (high - low)).floor()
}

/// Ticks between teleport attempts: ten seconds, one less per level, at least one.
#[must_use]
pub fn teleport_period(level: u32) -> f32 {
    let seconds = 10u32.saturating_sub(level.saturating_sub(1)).max(1);
    seconds as f32 * TICKS_PER_SECOND
}

/// Percent chance of a teleport attempt succeeding given a roll in `[0, 1)`.
#[must_use]
pub fn teleport_chance_percent(roll: f64, level: u32) -> f64 {
    roll * 9.0 + 1.0 + f64::from(level)
}

/// Inputs required to resolve one standard shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotInput {
    /// Archetype base damage.
    pub base_damage: f64,
    /// Defender level.
    pub level: u32,
    /// Aura damage multiplier.
    pub damage_multiplier: f64,
    /// Aura crit chance bonus.
    pub crit_bonus: f64,
    /// Archetype skill.
    pub skill: Option<Skill>,
    /// Whether the locked target is a boss.
    pub target_is_boss: bool,
    /// Current gold reserve.
    pub gold: u64,
}

/// Resolved damage and crit flag of a shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Damage carried by the projectile.
    pub damage: f64,
    /// Whether the shot critted.
    pub crit: bool,
}

/// Resolves damage for a standard shot, rolling crit when it is possible.
///
/// Greed shots skip the crit roll entirely, so they never draw from `rng` and
/// never show a crit cue.
pub fn resolve_shot<R: RollExt>(input: &ShotInput, rng: &mut R) -> Shot {
    if input.skill == Some(Skill::Greed) {
        return Shot {
            damage: greed_damage(input.gold, input.level),
            crit: false,
        };
    }

    let mut damage = shot_damage(input.base_damage, input.level, input.damage_multiplier);
    let chance = crit_chance(input.skill, input.crit_bonus);
    let crit = chance > 0.0 && rng.chance(chance);
    if crit {
        damage *= 2.0;
    }
    if input.skill == Some(Skill::Blade) && input.target_is_boss {
        damage *= BLADE_BOSS_MULTIPLIER;
    }
    Shot { damage, crit }
}

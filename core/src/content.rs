use serde::{Deserialize, Serialize};

use crate::{Element, ElementSet};

/// Identifier of a defender archetype within the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId(u32);

impl ArchetypeId {
    /// Creates a new archetype identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Special behaviour attached to a defender archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Periodically heals the first damaged ally nearby.
    Heal,
    /// Shots slow the target.
    Slow,
    /// Intrinsic critical hit chance.
    Crit,
    /// Periodic gold trickle.
    Gold,
    /// Shots poison the target.
    Poison,
    /// Player-triggered strike against the strongest attacker.
    Nuke,
    /// Small splash around the target.
    Aoe,
    /// Wide, heavy splash around the target.
    Blackhole,
    /// Periodically turns into a random archetype.
    Transform,
    /// Doubles attack speed of allies in range.
    BuffSpeed,
    /// Heavy shots that drain a nearby ally.
    Berserk,
    /// Splash plus a periodic gold trickle.
    Meteor,
    /// Stops non-boss targets outright.
    Freeze,
    /// Damage scales with the gold reserve; kills pay a bonus.
    Greed,
    /// Pins bosses in place.
    Root,
    /// Raises damage of allies in range.
    BuffDamage,
    /// Triple damage against bosses.
    Blade,
    /// Raises crit chance of allies in range.
    BuffCrit,
    /// Strikes every attacker on the field.
    Starfall,
    /// Path trap that damages and slows each entrant once.
    Barricade,
    /// Drops poison pickups on the path.
    SpawnPoison,
    /// Throws attackers back along the path.
    Teleport,
    /// Heals the target and earns the healed amount as gold.
    Merchant,
}

impl Skill {
    /// Whether the skill is triggered by the player instead of running passively.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Skill::Nuke)
    }

    /// Placement rule imposed by the skill.
    #[must_use]
    pub const fn placement(self) -> PlacementRule {
        match self {
            Skill::Barricade => PlacementRule::OnPath,
            _ => PlacementRule::OffPath,
        }
    }

    /// Short player-facing summary.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Skill::Heal => "heals nearby towers",
            Skill::Slow => "slows enemies",
            Skill::Crit => "critical strike chance",
            Skill::Gold => "produces gold",
            Skill::Poison => "poison damage",
            Skill::Nuke => "active: nuke the strongest enemy",
            Skill::Aoe => "area damage",
            Skill::Blackhole => "heavy area damage",
            Skill::Transform => "transforms every 10s",
            Skill::BuffSpeed => "raises ally attack speed",
            Skill::Berserk => "huge damage, drains an ally",
            Skill::Meteor => "area damage and gold",
            Skill::Freeze => "freezes enemies for 1s (bosses immune)",
            Skill::Greed => "damage from gold reserve, kill bonus",
            Skill::Root => "roots bosses 0.1s per level",
            Skill::BuffDamage => "raises ally damage",
            Skill::Blade => "short range, triple damage to bosses",
            Skill::BuffCrit => "raises ally crit chance",
            Skill::Starfall => "hits every enemy, destroys pickups",
            Skill::Barricade => "path trap, contact damage and slow",
            Skill::SpawnPoison => "drops poison food",
            Skill::Teleport => "chance to rewind enemies",
            Skill::Merchant => "heals enemies for gold",
        }
    }
}

/// Visual tag handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Round body.
    Circle,
    /// Square body.
    Square,
    /// Triangular body.
    Triangle,
    /// Five-sided body.
    Pentagon,
    /// Rotated square body.
    Diamond,
    /// Star body.
    Star,
    /// Wide bar used by path traps.
    Rect,
}

/// Where on the board an archetype may be placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementRule {
    /// Must be placed away from the path.
    OffPath,
    /// Must be placed on the path.
    OnPath,
}

/// Immutable template describing a buildable defender.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Catalog identifier.
    pub id: ArchetypeId,
    /// Display name.
    pub name: String,
    /// Element carried by every shot.
    pub element: Element,
    /// Damage per shot at level one.
    pub damage: f64,
    /// Targeting radius in world units.
    pub range: f32,
    /// Ticks between shots.
    pub cooldown: f32,
    /// Gold required to build.
    pub cost: u64,
    /// Visual tag.
    pub shape: Shape,
    /// Tier used for hit points.
    pub tier: u32,
    /// Optional special behaviour.
    pub skill: Option<Skill>,
}

impl Archetype {
    /// Hit points granted on construction.
    #[must_use]
    pub fn max_hp(&self) -> f64 {
        match self.skill {
            Some(Skill::Barricade) => 100.0,
            _ => 100.0 * f64::from(self.tier),
        }
    }

    /// Placement rule derived from the archetype's skill.
    #[must_use]
    pub fn placement(&self) -> PlacementRule {
        self.skill.map_or(PlacementRule::OffPath, Skill::placement)
    }
}

/// Category of a scheduled or summoned attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnTier {
    /// Regular wave member.
    Standard,
    /// Weak escort spawned by boss waves, summons, and splits.
    Minion,
    /// Boss-tier attacker.
    Boss,
}

/// Concrete stats for one attacker derived from a wave template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnProfile {
    /// Starting and maximum hit points.
    pub hp: f64,
    /// Movement per tick at normal time scale.
    pub speed: f32,
    /// Visual scale, also used for tap hit radius.
    pub scale: f32,
    /// Gold granted on death.
    pub reward: u64,
}

/// Template describing one wave of the content curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// One-based wave number.
    pub level: u32,
    /// Elements carried by every attacker of the wave.
    pub elements: ElementSet,
    /// Number of scheduled spawns.
    pub count: u32,
    /// Hit points of a standard member.
    pub hp: f64,
    /// Movement per tick of a standard member.
    pub speed: f32,
    /// Ticks between spawns.
    pub interval: f32,
    /// Gold paid for a standard member.
    pub reward: u64,
    /// Visual scale of a standard member.
    pub scale: f32,
    /// Whether the wave ends with bosses.
    pub is_boss: bool,
    /// Number of trailing spawns that are boss-tier on boss waves.
    pub boss_count: u32,
}

impl WaveConfig {
    /// Resolves the stats of an attacker of the provided tier.
    #[must_use]
    pub fn profile(&self, tier: SpawnTier) -> SpawnProfile {
        match tier {
            SpawnTier::Minion => SpawnProfile {
                hp: self.hp / 20.0,
                speed: self.speed * 1.5,
                scale: 0.5,
                reward: self.reward / 20,
            },
            SpawnTier::Standard | SpawnTier::Boss => SpawnProfile {
                hp: self.hp,
                speed: self.speed,
                scale: self.scale,
                reward: self.reward,
            },
        }
    }
}

/// Kinds of wave-start random events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomEventKind {
    /// Nothing happens.
    Calm,
    /// Live attackers are healed to full.
    HealAttackers,
    /// Wave hit points are doubled.
    DoubleHp,
    /// Wave speed rises by half.
    SpeedUp,
    /// Every defender loses half its hit points.
    DefenderDecay,
    /// Flat gold grant that scales with the wave.
    BonusGold,
    /// One random defender is destroyed.
    DestroyDefender,
    /// The wave switches to a random element.
    ChangeElement,
    /// Attacker melee strikes hit twice as hard.
    DoubleDamage,
    /// Timed weather that slows everything and corrodes defenders.
    AcidRain,
}

impl RandomEventKind {
    /// Display name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RandomEventKind::Calm => "Calm",
            RandomEventKind::HealAttackers => "Second Wind",
            RandomEventKind::DoubleHp => "Thick Hide",
            RandomEventKind::SpeedUp => "Frenzy",
            RandomEventKind::DefenderDecay => "Rust",
            RandomEventKind::BonusGold => "Windfall",
            RandomEventKind::DestroyDefender => "Earthquake",
            RandomEventKind::ChangeElement => "Elemental Shift",
            RandomEventKind::DoubleDamage => "Bloodlust",
            RandomEventKind::AcidRain => "Acid Rain",
        }
    }

    /// One-line effect summary.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            RandomEventKind::Calm => "nothing happens",
            RandomEventKind::HealAttackers => "enemies are fully healed",
            RandomEventKind::DoubleHp => "enemy HP doubled",
            RandomEventKind::SpeedUp => "enemy speed +50%",
            RandomEventKind::DefenderDecay => "towers lose half their HP",
            RandomEventKind::BonusGold => "bonus gold",
            RandomEventKind::DestroyDefender => "a random tower is destroyed",
            RandomEventKind::ChangeElement => "enemies change element",
            RandomEventKind::DoubleDamage => "enemy attacks deal double damage",
            RandomEventKind::AcidRain => "everything slows, towers corrode",
        }
    }
}

/// Kinds of collectible pickups lying on the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores a fifth of the eater's hit points.
    Heal,
    /// Permanently speeds the eater up.
    Speed,
    /// Grants temporary invincibility.
    Invincibility,
    /// Damages and slows the eater.
    Poison,
}

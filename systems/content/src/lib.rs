#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic content generation for the defender catalog, the wave curve,
//! and the authored path layout.
//!
//! Everything here is computed once at session start and then only read. The
//! single exception is the wave table, which random events may rewrite for the
//! wave currently in play.

use elemental_defence_core::{
    Archetype, ArchetypeId, CellCoord, Element, ElementSet, Path, Shape, Skill, WaveConfig,
    TILE_SIZE, TOTAL_WAVES,
};

/// Number of archetypes generated by formula before the authored specials.
pub const GENERATED_ARCHETYPES: u32 = 20;

/// Trailing boss spawns on every boss wave.
pub const BOSS_COUNT: u32 = 3;

const SNIPER_ID: u32 = 18;
const RAPID_ID: u32 = 19;

const SHAPE_CYCLE: [Shape; 5] = [
    Shape::Circle,
    Shape::Square,
    Shape::Triangle,
    Shape::Pentagon,
    Shape::Diamond,
];

const GENERATED_NAMES: [&str; GENERATED_ARCHETYPES as usize] = [
    "Stone Sentry",
    "Lumen Spire",
    "Shade Obelisk",
    "Tide Turret",
    "Ember Cannon",
    "Gale Tower",
    "Gold Quarry",
    "Venom Spitter",
    "Field Medic",
    "Radiant Lance",
    "Night Fang",
    "Frost Fountain",
    "Inferno Pit",
    "Storm Needle",
    "Bedrock Mint",
    "Plague Altar",
    "Doom Tank",
    "Holy Nova",
    "Sniper Elite",
    "Rapid Gunner",
];

struct Special {
    name: &'static str,
    element: Element,
    range_tiles: f32,
    damage: f64,
    cooldown: f32,
    cost: u64,
    shape: Shape,
    skill: Skill,
}

const SPECIALS: [Special; 17] = [
    special("Cannon", Element::None, 5.0, 50.0, 90.0, 250, Shape::Square, Skill::Aoe),
    special("Black Hole", Element::Dark, 5.0, 500.0, 120.0, 1000, Shape::Circle, Skill::Blackhole),
    special("Chaos Prism", Element::None, 4.0, 20.0, 60.0, 500, Shape::Diamond, Skill::Transform),
    special("Tailwind Totem", Element::Wind, 4.0, 5.0, 60.0, 400, Shape::Triangle, Skill::BuffSpeed),
    special("Berserker", Element::Fire, 4.0, 300.0, 45.0, 600, Shape::Pentagon, Skill::Berserk),
    special("Meteor Spire", Element::Light, 6.0, 200.0, 90.0, 1000, Shape::Circle, Skill::Meteor),
    special("Glacier", Element::Water, 4.0, 30.0, 60.0, 800, Shape::Square, Skill::Freeze),
    special("Greed Engine", Element::None, 5.0, 1.0, 60.0, 3000, Shape::Diamond, Skill::Greed),
    special("Vine Snare", Element::Poison, 4.0, 40.0, 45.0, 900, Shape::Triangle, Skill::Root),
    special("War Drum", Element::Fire, 3.0, 0.0, 60.0, 1200, Shape::Pentagon, Skill::BuffDamage),
    special("Blade Dancer", Element::None, 1.8, 400.0, 30.0, 1500, Shape::Square, Skill::Blade),
    special("Hawkeye", Element::Wind, 3.0, 0.0, 60.0, 1200, Shape::Circle, Skill::BuffCrit),
    special("Starfall", Element::Wind, 100.0, 20.0, 120.0, 2500, Shape::Star, Skill::Starfall),
    special("Barricade", Element::Earth, 0.5, 0.0, 0.0, 500, Shape::Rect, Skill::Barricade),
    special("Toxin Lab", Element::Poison, 4.0, 40.0, 60.0, 1800, Shape::Pentagon, Skill::SpawnPoison),
    special("Chronos", Element::Dark, 5.0, 10.0, 60.0, 2500, Shape::Diamond, Skill::Teleport),
    special("Merchant", Element::None, 4.0, 10.0, 60.0, 1000, Shape::Square, Skill::Merchant),
];

#[allow(clippy::too_many_arguments)]
const fn special(
    name: &'static str,
    element: Element,
    range_tiles: f32,
    damage: f64,
    cooldown: f32,
    cost: u64,
    shape: Shape,
    skill: Skill,
) -> Special {
    Special {
        name,
        element,
        range_tiles,
        damage,
        cooldown,
        cost,
        shape,
        skill,
    }
}

const PATH_WAYPOINTS: [(u32, u32); 7] = [(0, 2), (18, 2), (18, 6), (1, 6), (1, 10), (18, 10), (18, 14)];

/// Immutable catalog of every buildable defender archetype.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    archetypes: Vec<Archetype>,
}

impl Catalog {
    /// Generates the formula archetypes followed by the authored specials.
    #[must_use]
    pub fn generate() -> Self {
        let mut archetypes: Vec<Archetype> = (0..GENERATED_ARCHETYPES).map(generated).collect();
        for (offset, entry) in SPECIALS.iter().enumerate() {
            archetypes.push(Archetype {
                id: ArchetypeId::new(GENERATED_ARCHETYPES + offset as u32),
                name: entry.name.to_string(),
                element: entry.element,
                damage: entry.damage,
                range: entry.range_tiles * TILE_SIZE,
                cooldown: entry.cooldown,
                cost: entry.cost,
                shape: entry.shape,
                tier: 3,
                skill: Some(entry.skill),
            });
        }
        Self { archetypes }
    }

    /// Looks up an archetype by identifier.
    #[must_use]
    pub fn get(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(usize::try_from(id.get()).ok()?)
    }

    /// Archetype at the provided catalog position.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&Archetype> {
        self.archetypes.get(index)
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Iterates entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }
}

fn generated(index: u32) -> Archetype {
    let element = Element::from_index(index as usize);
    let tier = index / 8 + 1;
    let (range_tiles, damage, cooldown, cost) = match index {
        SNIPER_ID => (12.0, 300.0, 120.0, 800),
        RAPID_ID => (4.0, 5.0, 5.0, 600),
        _ => {
            let range = 3 + index % 5;
            let damage = 10 + index * 2 + tier * 5;
            let cooldown = 60u32.saturating_sub((index % 3) * 10).max(10);
            let cost = 50 + u64::from(index) * 25;
            (range as f32, f64::from(damage), cooldown as f32, cost)
        }
    };

    Archetype {
        id: ArchetypeId::new(index),
        name: GENERATED_NAMES[index as usize].to_string(),
        element,
        damage,
        range: range_tiles * TILE_SIZE,
        cooldown,
        cost,
        shape: SHAPE_CYCLE[index as usize % SHAPE_CYCLE.len()],
        tier,
        skill: generated_skill(index, element),
    }
}

fn generated_skill(index: u32, element: Element) -> Option<Skill> {
    if index == 0 || index == 8 {
        return Some(Skill::Heal);
    }
    match element {
        Element::Water => Some(Skill::Slow),
        Element::Fire => Some(Skill::Crit),
        Element::Earth => Some(Skill::Gold),
        Element::Poison => Some(Skill::Poison),
        _ if index == SNIPER_ID => Some(Skill::Nuke),
        _ => None,
    }
}

/// The 100-wave difficulty curve.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveTable {
    waves: Vec<WaveConfig>,
}

impl WaveTable {
    /// Generates every wave of the curve.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            waves: (0..TOTAL_WAVES).map(wave).collect(),
        }
    }

    /// Looks up a wave by its one-based number.
    #[must_use]
    pub fn get(&self, level: u32) -> Option<&WaveConfig> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.waves.get(index)
    }

    /// Mutable access for random events rewriting the wave in play.
    #[must_use]
    pub fn get_mut(&mut self, level: u32) -> Option<&mut WaveConfig> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.waves.get_mut(index)
    }

    /// Number of waves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waves.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Iterates waves in order.
    pub fn iter(&self) -> impl Iterator<Item = &WaveConfig> {
        self.waves.iter()
    }
}

fn wave(index: u32) -> WaveConfig {
    let is_boss = (index + 1) % 5 == 0;
    let primary = Element::from_index(index as usize + 2);
    let elements = if is_boss && index > 5 {
        ElementSet::pair(primary, Element::from_index(index as usize + 5))
    } else {
        ElementSet::single(primary)
    };
    let boss_factor = if is_boss { 10.0 } else { 1.0 };
    let base_hp = 150.0 * 1.15f64.powi(index as i32);
    let speed = 1.0 + (index % 3) as f32 * 0.5;
    let reward = (10 + u64::from(index) * 3 / 2) * if is_boss { 10 } else { 1 };
    let scale = (0.6 + (index % 4) as f32 * 0.1) * if is_boss { 2.5 } else { 1.0 };

    WaveConfig {
        level: index + 1,
        elements,
        count: if is_boss { 13 } else { 10 + index / 2 },
        hp: (base_hp * boss_factor).floor(),
        speed: if is_boss { speed * 0.5 } else { speed },
        interval: if is_boss { 60.0 } else { (60 - index.min(40)) as f32 },
        reward,
        scale,
        is_boss,
        boss_count: BOSS_COUNT,
    }
}

/// The authored serpentine route across the board.
#[must_use]
pub fn authored_path() -> Path {
    let waypoints = PATH_WAYPOINTS
        .iter()
        .map(|&(column, row)| CellCoord::new(column, row))
        .collect();
    Path::new(waypoints).expect("authored path holds seven waypoints")
}

/// Bundle of every generated content table.
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    /// Defender catalog.
    pub catalog: Catalog,
    /// Wave curve.
    pub waves: WaveTable,
    /// Attacker route.
    pub path: Path,
}

impl Content {
    /// Generates all content tables.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            catalog: Catalog::generate(),
            waves: WaveTable::generate(),
            path: authored_path(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::generate()
    }
}

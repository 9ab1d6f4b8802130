#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Elemental Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! happened. Rejected commands never mutate state; they surface as
//! [`Event::CommandRejected`] carrying a [`CommandError`].

mod content;
mod element;
mod rng;

pub use content::{
    Archetype, ArchetypeId, PickupKind, PlacementRule, RandomEventKind, Shape, Skill,
    SpawnProfile, SpawnTier, WaveConfig,
};
pub use element::{combined_multiplier, multiplier, Element, ElementSet, ELEMENT_COUNT};
pub use glam::Vec2;
pub use rng::RollExt;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to Elemental Defence.";

/// Simulation ticks per in-game second.
pub const TICKS_PER_SECOND: f32 = 90.0;

/// Side length of a grid cell in world units.
pub const TILE_SIZE: f32 = 40.0;

/// Number of cell columns on the board.
pub const GRID_COLUMNS: u32 = 20;

/// Number of cell rows on the board.
pub const GRID_ROWS: u32 = 15;

/// Number of waves in the content curve.
pub const TOTAL_WAVES: u32 = 100;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Marks the session as started and arms the first auto-start countdown.
    BeginSession,
    /// Advances the simulation by one fixed step.
    Tick,
    /// Requests construction of a defender at the provided cell.
    BuildDefender {
        /// Catalog entry to build.
        archetype: ArchetypeId,
        /// Cell that will hold the defender.
        cell: CellCoord,
    },
    /// Sells a defender for its hit-point scaled value.
    SellDefender {
        /// Defender to sell.
        defender: DefenderId,
    },
    /// Raises a defender by one level.
    UpgradeDefender {
        /// Defender to upgrade.
        defender: DefenderId,
    },
    /// Fires the defender's active skill.
    TriggerActiveSkill {
        /// Defender owning the skill.
        defender: DefenderId,
    },
    /// Starts the next wave immediately.
    StartNextWave,
    /// Switches the global time scale.
    SetTimeScale {
        /// Time scale to activate.
        scale: TimeScale,
    },
    /// Deals direct damage to the nearest attacker under the provided point.
    TapDamage {
        /// Point in world units.
        position: Vec2,
        /// Damage to deal.
        amount: f64,
    },
    /// Updates the externally held selection.
    SelectDefender {
        /// Defender to select, or `None` to clear the selection.
        defender: Option<DefenderId>,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks processed since the world was created.
        tick: u64,
    },
    /// Confirms the session started.
    SessionStarted,
    /// Confirms that the time scale changed.
    TimeScaleChanged {
        /// Time scale now active.
        scale: TimeScale,
    },
    /// Reports that a command was rejected without mutating state.
    CommandRejected {
        /// Specific reason the command failed.
        reason: CommandError,
    },
    /// Confirms a defender was built.
    DefenderBuilt {
        /// Identifier assigned to the new defender.
        defender: DefenderId,
        /// Catalog entry that was built.
        archetype: ArchetypeId,
        /// Cell holding the defender.
        cell: CellCoord,
        /// Gold spent.
        cost: u64,
    },
    /// Confirms a defender was sold.
    DefenderSold {
        /// Defender that was sold.
        defender: DefenderId,
        /// Gold refunded.
        refund: u64,
    },
    /// Confirms a defender was upgraded.
    DefenderUpgraded {
        /// Defender that was upgraded.
        defender: DefenderId,
        /// Level reached.
        level: u32,
        /// Gold spent.
        cost: u64,
    },
    /// Reports that a defender was destroyed.
    DefenderDestroyed {
        /// Defender that was destroyed.
        defender: DefenderId,
    },
    /// Reports that a defender turned into another archetype.
    DefenderTransformed {
        /// Defender that changed.
        defender: DefenderId,
        /// Archetype it became.
        archetype: ArchetypeId,
    },
    /// Reports that a defender was silenced.
    DefenderSilenced {
        /// Defender that was silenced.
        defender: DefenderId,
    },
    /// Confirms an active skill fired.
    ActiveSkillTriggered {
        /// Defender that fired.
        defender: DefenderId,
        /// Attacker that was struck.
        target: AttackerId,
        /// Damage dealt before elemental modifiers.
        damage: f64,
    },
    /// Reports that the selection changed.
    SelectionChanged {
        /// Defender now selected, if any.
        defender: Option<DefenderId>,
    },
    /// Announces that a wave began.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
    },
    /// Announces the random event rolled at wave start.
    RandomEventTriggered {
        /// Wave the event applies to.
        wave: u32,
        /// Event that was rolled.
        kind: RandomEventKind,
    },
    /// Confirms an attacker entered the path.
    AttackerSpawned {
        /// Identifier assigned to the attacker.
        attacker: AttackerId,
        /// Category of the attacker.
        tier: SpawnTier,
    },
    /// Reports that an attacker died and paid out.
    AttackerKilled {
        /// Attacker that died.
        attacker: AttackerId,
        /// Gold granted, including kill bonuses.
        reward: u64,
        /// Defender credited with the kill.
        killer: Option<DefenderId>,
    },
    /// Reports that an attacker cheated death.
    AttackerRevived {
        /// Attacker that revived.
        attacker: AttackerId,
        /// New maximum hit points.
        max_hp: f64,
    },
    /// Reports that a dying attacker split off a child.
    AttackerSplit {
        /// Attacker that died.
        parent: AttackerId,
        /// Child that was spawned.
        child: AttackerId,
    },
    /// Reports that a boss summoned a minion.
    MinionSummoned {
        /// Boss that summoned.
        boss: AttackerId,
        /// Minion that appeared.
        minion: AttackerId,
    },
    /// Reports that an attacker was thrown back along the path.
    AttackerTeleported {
        /// Attacker that moved.
        attacker: AttackerId,
        /// Waypoint index it now occupies.
        path_index: usize,
    },
    /// Reports that an attacker reached the end of the path.
    AttackerReachedEnd {
        /// Attacker that escaped.
        attacker: AttackerId,
        /// Lives left afterwards.
        lives: u32,
    },
    /// Reports that a pickup appeared.
    PickupSpawned {
        /// Identifier assigned to the pickup.
        pickup: PickupId,
        /// Kind of pickup.
        kind: PickupKind,
    },
    /// Reports that an attacker ate a pickup.
    PickupConsumed {
        /// Pickup that was eaten.
        pickup: PickupId,
        /// Attacker that ate it.
        attacker: AttackerId,
        /// Kind of pickup.
        kind: PickupKind,
    },
    /// Announces that a wave finished and paid its bonus.
    WaveCompleted {
        /// Wave that finished.
        wave: u32,
        /// Gold granted.
        bonus: u64,
    },
    /// Announces that the final wave was cleared.
    Victory,
    /// Announces that every life was lost.
    GameOver {
        /// Wave reached.
        wave: u32,
        /// Final score.
        score: u64,
    },
}

impl Event {
    /// Player-facing notification for events worth surfacing, if any.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        let (code, message) = match self {
            Event::CommandRejected { reason } => (reason.code(), reason.to_string()),
            Event::DefenderBuilt { cost, .. } => ("defender_built", format!("Tower built for ${cost}.")),
            Event::DefenderSold { refund, .. } => ("defender_sold", format!("Tower sold for ${refund}.")),
            Event::DefenderUpgraded { level, cost, .. } => (
                "defender_upgraded",
                format!("Tower upgraded to level {level} for ${cost}."),
            ),
            Event::AttackerRevived { .. } => (
                "attacker_revived",
                "An enemy revived with doubled HP!".to_string(),
            ),
            Event::RandomEventTriggered { kind, .. } => (
                "random_event",
                format!("Random event: {} - {}", kind.name(), kind.description()),
            ),
            Event::WaveCompleted { bonus, .. } => (
                "wave_completed",
                format!("Wave complete! +${bonus} gold. Towers repaired."),
            ),
            Event::Victory => ("victory", "Victory! All 100 waves cleared!".to_string()),
            Event::GameOver { wave, score } => (
                "game_over",
                format!("Game over at wave {wave} with score {score}."),
            ),
            _ => return None,
        };
        Some(Notification { code, message })
    }
}

/// Structured reason code plus human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Message suitable for display.
    pub message: String,
}

/// Reasons a command can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum CommandError {
    /// The resource pool cannot cover the cost.
    #[error("not enough gold: need {required}, have {available}")]
    InsufficientGold {
        /// Gold required.
        required: u64,
        /// Gold available.
        available: u64,
    },
    /// The archetype may not be placed on this kind of cell.
    #[error("invalid placement: {rule:?} required")]
    InvalidPlacement {
        /// Rule that was violated.
        rule: PlacementRule,
    },
    /// Another defender already holds the cell.
    #[error("cell is already occupied")]
    CellOccupied,
    /// The cell lies outside the board.
    #[error("cell is outside the board")]
    OutOfBounds,
    /// No archetype carries the identifier.
    #[error("unknown archetype {0:?}")]
    UnknownArchetype(ArchetypeId),
    /// No live defender carries the identifier.
    #[error("no such tower")]
    MissingDefender,
    /// The defender has no player-triggered skill.
    #[error("tower has no active skill")]
    NoActiveSkill,
    /// The active skill is still cooling down.
    #[error("skill is on cooldown")]
    SkillOnCooldown,
    /// The defender is silenced.
    #[error("tower is silenced and cannot cast")]
    Silenced,
    /// No attacker is available to target.
    #[error("no target available")]
    NoValidTarget,
    /// A wave is already running.
    #[error("a wave is already in progress")]
    WaveInProgress,
    /// Every wave has been played.
    #[error("no waves remain")]
    ContentExhausted,
    /// The session ended.
    #[error("the game is over")]
    GameOver,
}

impl CommandError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            CommandError::InsufficientGold { .. } => "insufficient_gold",
            CommandError::InvalidPlacement { .. } => "invalid_placement",
            CommandError::CellOccupied => "cell_occupied",
            CommandError::OutOfBounds => "out_of_bounds",
            CommandError::UnknownArchetype(_) => "unknown_archetype",
            CommandError::MissingDefender => "missing_defender",
            CommandError::NoActiveSkill => "no_active_skill",
            CommandError::SkillOnCooldown => "skill_on_cooldown",
            CommandError::Silenced => "silenced",
            CommandError::NoValidTarget => "no_valid_target",
            CommandError::WaveInProgress => "wave_in_progress",
            CommandError::ContentExhausted => "content_exhausted",
            CommandError::GameOver => "game_over",
        }
    }
}

/// Global speed multiplier applied to every per-tick delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeScale {
    /// Real-time simulation.
    #[default]
    Normal,
    /// Every delta doubled.
    Double,
}

impl TimeScale {
    /// Multiplier applied to per-tick deltas.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            TimeScale::Normal => 1.0,
            TimeScale::Double => 2.0,
        }
    }
}

/// Unique identifier assigned to an attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackerId(u32);

impl AttackerId {
    /// Creates a new attacker identifier with the provided numeric value.
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

/// Unique identifier assigned to a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
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

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
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

/// Unique identifier assigned to a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
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

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Whether the cell lies on the board.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.column < GRID_COLUMNS && self.row < GRID_ROWS
    }

    /// Centre of the cell in world units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.column as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// Cell containing the provided world position, if it lies on the board.
    #[must_use]
    pub fn containing(position: Vec2) -> Option<Self> {
        if position.x < 0.0 || position.y < 0.0 {
            return None;
        }
        let cell = Self::new(
            (position.x / TILE_SIZE) as u32,
            (position.y / TILE_SIZE) as u32,
        );
        cell.in_bounds().then_some(cell)
    }
}

/// Ordered waypoints attackers follow from spawn to exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    waypoints: Vec<CellCoord>,
}

impl Path {
    /// Creates a path from at least two waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<CellCoord>) -> Option<Self> {
        (waypoints.len() >= 2).then_some(Self { waypoints })
    }

    /// Waypoint cells in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; paths hold at least two waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Number of straight segments between waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// World position of the waypoint, clamped to the final waypoint.
    #[must_use]
    pub fn position(&self, index: usize) -> Vec2 {
        self.waypoints[index.min(self.last_index())].center()
    }

    /// Point at fraction `t` along the provided segment.
    #[must_use]
    pub fn point_on_segment(&self, segment: usize, t: f32) -> Vec2 {
        let start = self.position(segment);
        let end = self.position(segment + 1);
        start.lerp(end, t)
    }

    /// Whether the cell lies on any segment's bounding box.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.waypoints.windows(2).any(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let columns = start.column().min(end.column())..=start.column().max(end.column());
            let rows = start.row().min(end.row())..=start.row().max(end.row());
            columns.contains(&cell.column()) && rows.contains(&cell.row())
        })
    }
}

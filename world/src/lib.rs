#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Elemental Defence.
//!
//! The world owns every attacker, defender, projectile, pickup and floating
//! text, plus the economy and the single random stream. Adapters mutate it
//! only through [`apply`] and observe it only through [`query`] snapshots and
//! the [`Event`] values each command produces. One [`Command::Tick`] advances
//! the simulation by one fixed step in a fixed stage order, so two worlds fed
//! the same seed and command log stay in lockstep.

mod attackers;
mod defenders;
mod pickups;
mod projectiles;
mod rng;
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding;
#[cfg(test)]
mod scenarios;

pub use rng::SimRng;
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub use rng::ScriptedRng;

use elemental_defence_core::{
    AttackerId, Command, CommandError, DefenderId, Element, ElementSet, Event, PickupId,
    ProjectileId, RandomEventKind, SpawnTier, TimeScale, Vec2, TOTAL_WAVES, WELCOME_BANNER,
};
use elemental_defence_system_content::Content;
use elemental_defence_system_random_events::{self as random_events, AcidRain, EventEffect};
use elemental_defence_system_spawning::{SchedulerAction, WaveScheduler};
use elemental_defence_system_targeting::{nearest_covering, Reach, Targeting};
use tracing::{debug, info};

use attackers::Attacker;
use defenders::Defender;
use pickups::{FloatingText, Pickup};
use projectiles::Projectile;

/// Gold available when a session starts.
pub const DEFAULT_STARTING_GOLD: u64 = 600;

/// Lives available when a session starts.
pub const DEFAULT_STARTING_LIVES: u32 = 20;

/// Base tap radius, multiplied by the attacker's visual scale.
const TAP_RADIUS: f32 = 30.0;

/// Hit points every live defender gains in capacity when a wave completes.
const WAVE_REPAIR_MAX_HP: f64 = 10.0;

/// Hit points every live defender recovers when a wave completes.
const WAVE_REPAIR_HP: f64 = 20.0;

/// Session parameters fixed at world creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Seed of the simulation random stream.
    pub seed: u64,
    /// Gold in the pool at session start.
    pub starting_gold: u64,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Number of waves that must be cleared for victory.
    pub total_waves: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_gold: DEFAULT_STARTING_GOLD,
            starting_lives: DEFAULT_STARTING_LIVES,
            total_waves: TOTAL_WAVES,
        }
    }
}

/// Terminal state of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The session is still being played.
    #[default]
    InProgress,
    /// Every wave was cleared.
    Victory,
    /// Every life was lost.
    Defeat,
}

/// Represents the authoritative Elemental Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    content: Content,
    scheduler: WaveScheduler,
    scheduler_actions: Vec<SchedulerAction>,
    rng: SimRng,
    targeting: Targeting,
    attackers: Vec<Attacker>,
    defenders: Vec<Defender>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    texts: Vec<FloatingText>,
    next_attacker_id: u32,
    next_defender_id: u32,
    next_projectile_id: u32,
    next_pickup_id: u32,
    gold: u64,
    lives: u32,
    score: u64,
    tick_index: u64,
    time_scale: TimeScale,
    incoming_damage: f64,
    weather: AcidRain,
    selected: Option<DefenderId>,
    session_started: bool,
    outcome: Outcome,
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world whose random stream derives from `config.seed`.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self::with_rng(config, SimRng::seeded(config.seed))
    }

    /// Creates a world consulting the provided random stream.
    ///
    /// The seed inside `config` is ignored.
    #[must_use]
    pub fn with_rng(config: WorldConfig, rng: SimRng) -> Self {
        let content = Content::generate();
        let total_waves = config.total_waves.clamp(1, content.waves.len() as u32);
        Self {
            banner: WELCOME_BANNER,
            content,
            scheduler: WaveScheduler::new(total_waves),
            scheduler_actions: Vec::new(),
            rng,
            targeting: Targeting::new(),
            attackers: Vec::new(),
            defenders: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            texts: Vec::new(),
            next_attacker_id: 0,
            next_defender_id: 0,
            next_projectile_id: 0,
            next_pickup_id: 0,
            gold: config.starting_gold,
            lives: config.starting_lives,
            score: 0,
            tick_index: 0,
            time_scale: TimeScale::Normal,
            incoming_damage: 1.0,
            weather: AcidRain::default(),
            selected: None,
            session_started: false,
            outcome: Outcome::InProgress,
        }
    }

    fn allocate_attacker_id(&mut self) -> AttackerId {
        let id = AttackerId::new(self.next_attacker_id);
        self.next_attacker_id = self.next_attacker_id.saturating_add(1);
        id
    }

    fn allocate_defender_id(&mut self) -> DefenderId {
        let id = DefenderId::new(self.next_defender_id);
        self.next_defender_id = self.next_defender_id.saturating_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        id
    }

    fn allocate_pickup_id(&mut self) -> PickupId {
        let id = PickupId::new(self.next_pickup_id);
        self.next_pickup_id = self.next_pickup_id.saturating_add(1);
        id
    }

    fn reject(&self, reason: CommandError, out_events: &mut Vec<Event>) {
        debug!(code = reason.code(), %reason, "command rejected");
        out_events.push(Event::CommandRejected { reason });
    }

    fn begin_session(&mut self, out_events: &mut Vec<Event>) {
        if self.session_started {
            return;
        }
        self.session_started = true;
        self.scheduler.arm_auto_start();
        info!(banner = self.banner, "session started");
        out_events.push(Event::SessionStarted);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.tick_index,
        });
        let scale = self.time_scale.factor();

        self.update_weather(scale, out_events);
        self.update_scheduler(scale, out_events);

        self.update_attackers(scale, out_events);
        self.attackers.retain(|attacker| !attacker.dead);

        self.update_defenders(scale, out_events);
        self.defenders.retain(|defender| !defender.dead);

        self.update_projectiles(scale, out_events);
        self.projectiles.retain(|projectile| !projectile.resolved);

        self.update_texts(scale);
        self.spawn_food(out_events);
        self.update_pickups(scale);
        self.pickups.retain(Pickup::is_live);

        self.resolve_pickup_collisions(out_events);
        self.pickups.retain(Pickup::is_live);
    }

    fn update_weather(&mut self, scale: f32, out_events: &mut Vec<Event>) {
        let Some(damage) = self.weather.advance(scale, &mut self.rng) else {
            return;
        };
        for index in 0..self.defenders.len() {
            if !self.defenders[index].dead {
                self.damage_defender(index, damage, out_events);
            }
        }
    }

    fn update_scheduler(&mut self, scale: f32, out_events: &mut Vec<Event>) {
        let live = self.attackers.iter().filter(|attacker| !attacker.dead).count();
        let mut actions = std::mem::take(&mut self.scheduler_actions);
        actions.clear();
        self.scheduler.advance(scale, live, &mut actions);
        for action in actions.drain(..) {
            match action {
                SchedulerAction::Spawn { wave, tier } => self.spawn_scheduled(wave, tier, out_events),
                SchedulerAction::Completed {
                    wave,
                    bonus,
                    victory,
                } => self.complete_wave(wave, bonus, victory, out_events),
                SchedulerAction::AutoStart => {
                    if let Err(reason) = self.start_wave(out_events) {
                        debug!(code = reason.code(), "auto-start skipped");
                    }
                }
            }
        }
        self.scheduler_actions = actions;
    }

    fn spawn_scheduled(&mut self, wave: u32, tier: SpawnTier, out_events: &mut Vec<Event>) {
        let id = self.allocate_attacker_id();
        let Some(config) = self.content.waves.get(wave) else {
            return;
        };
        let attacker = Attacker::spawn(id, config, tier, &self.content.path);
        self.attackers.push(attacker);
        out_events.push(Event::AttackerSpawned { attacker: id, tier });
    }

    fn complete_wave(&mut self, wave: u32, bonus: u64, victory: bool, out_events: &mut Vec<Event>) {
        self.gold = self.gold.saturating_add(bonus);
        for defender in self.defenders.iter_mut().filter(|defender| !defender.dead) {
            defender.max_hp += WAVE_REPAIR_MAX_HP;
            defender.hp = (defender.hp + WAVE_REPAIR_HP).min(defender.max_hp);
        }
        info!(wave, bonus, gold = self.gold, "wave completed");
        out_events.push(Event::WaveCompleted { wave, bonus });

        if victory && self.outcome == Outcome::InProgress {
            self.outcome = Outcome::Victory;
            info!(score = self.score, "victory");
            out_events.push(Event::Victory);
        }
    }

    fn start_wave(&mut self, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        let config = self
            .content
            .waves
            .get(self.scheduler.wave())
            .ok_or(CommandError::ContentExhausted)?;
        let wave = self.scheduler.begin(config)?;

        self.incoming_damage = 1.0;
        self.weather.clear();
        info!(wave, "wave started");
        out_events.push(Event::WaveStarted { wave });

        if wave > 1 {
            self.trigger_random_event(wave, out_events);
        }
        Ok(())
    }

    fn trigger_random_event(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        let kind = random_events::roll(&mut self.rng);
        let live_defenders = self
            .targeting
            .matching(&self.defenders, |defender| !defender.dead)
            .to_vec();
        let effect = random_events::resolve(kind, wave, live_defenders.len(), &mut self.rng);

        if kind != RandomEventKind::Calm {
            info!(wave, event = kind.name(), "random event");
            out_events.push(Event::RandomEventTriggered { wave, kind });
        }

        match effect {
            EventEffect::Nothing => {}
            EventEffect::HealAttackers => {
                for attacker in self.attackers.iter_mut().filter(|attacker| !attacker.dead) {
                    attacker.hp = attacker.max_hp;
                }
            }
            EventEffect::ScaleHp(factor) => {
                if let Some(config) = self.content.waves.get_mut(wave) {
                    config.hp *= factor;
                }
                for attacker in self.attackers.iter_mut().filter(|attacker| !attacker.dead) {
                    attacker.hp *= factor;
                    attacker.max_hp *= factor;
                }
            }
            EventEffect::ScaleSpeed(factor) => {
                if let Some(config) = self.content.waves.get_mut(wave) {
                    config.speed *= factor;
                }
                for attacker in self.attackers.iter_mut().filter(|attacker| !attacker.dead) {
                    attacker.speed *= factor;
                }
            }
            EventEffect::HalveDefenderHp => {
                for index in live_defenders {
                    let defender = &mut self.defenders[index];
                    defender.hp = (defender.hp / 2.0).floor();
                    if defender.hp <= 0.0 {
                        self.destroy_defender(index, out_events);
                    }
                }
            }
            EventEffect::GrantGold(amount) => {
                self.gold = self.gold.saturating_add(amount);
            }
            EventEffect::DestroyDefender { index } => {
                if let Some(&target) = live_defenders.get(index) {
                    self.destroy_defender(target, out_events);
                }
            }
            EventEffect::ReassignElement(element) => {
                let elements = ElementSet::single(element);
                if let Some(config) = self.content.waves.get_mut(wave) {
                    config.elements = elements;
                }
                for attacker in self.attackers.iter_mut().filter(|attacker| !attacker.dead) {
                    attacker.elements = elements;
                }
            }
            EventEffect::IncomingDamage(factor) => {
                self.incoming_damage = factor;
            }
            EventEffect::AcidRain { ticks } => {
                self.weather = AcidRain::new(ticks);
            }
        }
    }

    fn tap_damage(
        &mut self,
        position: Vec2,
        amount: f64,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let target = nearest_covering(&self.attackers, position, |attacker| {
            Reach::closer_than(TAP_RADIUS * attacker.scale)
        })
        .ok_or(CommandError::NoValidTarget)?;
        self.strike_attacker(target, amount, Element::None, None, out_events);
        Ok(())
    }

    fn select_defender(
        &mut self,
        defender: Option<DefenderId>,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        if let Some(id) = defender {
            let _ = self
                .live_defender_index(id)
                .ok_or(CommandError::MissingDefender)?;
        }
        self.selected = defender;
        out_events.push(Event::SelectionChanged { defender });
        Ok(())
    }

    fn set_time_scale(&mut self, scale: TimeScale, out_events: &mut Vec<Event>) {
        self.time_scale = scale;
        out_events.push(Event::TimeScaleChanged { scale });
    }

    fn declare_defeat(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome == Outcome::Defeat {
            return;
        }
        self.outcome = Outcome::Defeat;
        let wave = self.scheduler.wave();
        info!(wave, score = self.score, "game over");
        out_events.push(Event::GameOver {
            wave,
            score: self.score,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome == Outcome::Defeat {
        world.reject(CommandError::GameOver, out_events);
        return;
    }

    let result = match command {
        Command::BeginSession => {
            world.begin_session(out_events);
            Ok(())
        }
        Command::Tick => {
            world.tick(out_events);
            Ok(())
        }
        Command::BuildDefender { archetype, cell } => {
            world.build_defender(archetype, cell, out_events)
        }
        Command::SellDefender { defender } => world.sell_defender(defender, out_events),
        Command::UpgradeDefender { defender } => world.upgrade_defender(defender, out_events),
        Command::TriggerActiveSkill { defender } => {
            world.trigger_active_skill(defender, out_events)
        }
        Command::StartNextWave => world.start_wave(out_events),
        Command::SetTimeScale { scale } => {
            world.set_time_scale(scale, out_events);
            Ok(())
        }
        Command::TapDamage { position, amount } => world.tap_damage(position, amount, out_events),
        Command::SelectDefender { defender } => world.select_defender(defender, out_events),
    };

    if let Err(reason) = result {
        world.reject(reason, out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Outcome, World};
    use elemental_defence_core::{
        Archetype, ArchetypeId, AttackerId, CellCoord, DefenderId, Element, ElementSet, Path,
        PickupId, PickupKind, ProjectileId, Skill, SpawnTier, TimeScale, Vec2,
    };
    use elemental_defence_system_builder::PlacementPreview;
    use elemental_defence_system_combat::{sell_value, upgrade_cost};
    use elemental_defence_system_content::Catalog;
    pub use elemental_defence_system_spawning::Phase as WavePhase;

    pub use crate::pickups::TextTone;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Gold in the pool.
    #[must_use]
    pub fn gold(world: &World) -> u64 {
        world.gold
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Score accumulated from kills.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Number of ticks processed since creation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Active time scale.
    #[must_use]
    pub fn time_scale(world: &World) -> TimeScale {
        world.time_scale
    }

    /// Terminal state of the session.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Whether every life was lost.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.outcome == Outcome::Defeat
    }

    /// Currently selected defender, if any.
    #[must_use]
    pub fn selected_defender(world: &World) -> Option<DefenderId> {
        world.selected
    }

    /// Defender catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.content.catalog
    }

    /// Looks up one catalog entry.
    #[must_use]
    pub fn archetype(world: &World, id: ArchetypeId) -> Option<&Archetype> {
        world.content.catalog.get(id)
    }

    /// Attacker route.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.content.path
    }

    /// Multiplier applied to attacker melee strikes this wave.
    #[must_use]
    pub fn incoming_damage_multiplier(world: &World) -> f64 {
        world.incoming_damage
    }

    /// Ticks of acid rain remaining, if a storm is active.
    #[must_use]
    pub fn acid_rain(world: &World) -> Option<f32> {
        world
            .weather
            .is_active()
            .then(|| world.weather.remaining())
    }

    /// Progress of the wave scheduler.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct WaveStatus {
        /// Current wave, or the next wave to start when idle.
        pub wave: u32,
        /// Waves required for victory.
        pub total: u32,
        /// Scheduler phase.
        pub phase: WavePhase,
        /// Spawns still queued for the running wave.
        pub remaining_spawns: u32,
        /// Seconds until the next wave starts on its own, if armed.
        pub auto_start: Option<f32>,
    }

    /// Captures the scheduler state.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        WaveStatus {
            wave: world.scheduler.wave(),
            total: world.scheduler.total(),
            phase: world.scheduler.phase(),
            remaining_spawns: world.scheduler.remaining(),
            auto_start: world.scheduler.auto_start(),
        }
    }

    /// Whether a wave is currently spawning or draining.
    #[must_use]
    pub fn is_wave_active(world: &World) -> bool {
        world.scheduler.is_active()
    }

    /// Summary of the wave the scheduler points at.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct WavePreview {
        /// One-based wave number.
        pub wave: u32,
        /// Elements every member carries.
        pub elements: ElementSet,
        /// Scheduled spawn count.
        pub count: u32,
        /// Hit points of a standard member.
        pub hp: f64,
        /// Whether the wave ends with bosses.
        pub is_boss: bool,
    }

    /// Describes the current or upcoming wave.
    #[must_use]
    pub fn wave_preview(world: &World) -> Option<WavePreview> {
        let config = world.content.waves.get(world.scheduler.wave())?;
        Some(WavePreview {
            wave: config.level,
            elements: config.elements,
            count: config.count,
            hp: config.hp,
            is_boss: config.is_boss,
        })
    }

    /// Snapshot of a live attacker.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AttackerSnapshot {
        /// Identifier of the attacker.
        pub id: AttackerId,
        /// Spawn category.
        pub tier: SpawnTier,
        /// Position in world units.
        pub position: Vec2,
        /// Waypoint index most recently reached.
        pub path_index: usize,
        /// Current hit points.
        pub hp: f64,
        /// Maximum hit points.
        pub max_hp: f64,
        /// Base movement per tick.
        pub speed: f32,
        /// Visual scale.
        pub scale: f32,
        /// Elements carried.
        pub elements: ElementSet,
        /// Whether the attacker was spawned by a split.
        pub is_split: bool,
        /// Whether the attacker already revived once.
        pub revived: bool,
        /// Whether a soft slow is active.
        pub slowed: bool,
        /// Whether a hard stop is active.
        pub stopped: bool,
        /// Whether poison is applied.
        pub poisoned: bool,
        /// Whether invincibility is active.
        pub invincible: bool,
    }

    /// Captures every live attacker in identifier order.
    #[must_use]
    pub fn attackers(world: &World) -> Vec<AttackerSnapshot> {
        let mut snapshots: Vec<AttackerSnapshot> = world
            .attackers
            .iter()
            .filter(|attacker| !attacker.dead)
            .map(|attacker| AttackerSnapshot {
                id: attacker.id,
                tier: attacker.tier,
                position: attacker.progress.position(),
                path_index: attacker.progress.index(),
                hp: attacker.hp,
                max_hp: attacker.max_hp,
                speed: attacker.speed,
                scale: attacker.scale,
                elements: attacker.elements,
                is_split: attacker.is_split,
                revived: attacker.revived,
                slowed: attacker.status.slow > 0.0,
                stopped: attacker.status.stop > 0.0,
                poisoned: attacker.status.poison > 0.0,
                invincible: attacker.is_invincible(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Snapshot of one attacker, if it is alive.
    #[must_use]
    pub fn attacker(world: &World, id: AttackerId) -> Option<AttackerSnapshot> {
        attackers(world).into_iter().find(|snapshot| snapshot.id == id)
    }

    /// Aura multipliers currently affecting a defender.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AuraSnapshot {
        /// Attack speed multiplier.
        pub attack_speed: f32,
        /// Damage multiplier.
        pub damage: f64,
        /// Crit chance bonus.
        pub crit: f64,
    }

    /// Snapshot of a live defender.
    #[derive(Clone, Debug, PartialEq)]
    pub struct DefenderSnapshot {
        /// Identifier of the defender.
        pub id: DefenderId,
        /// Current archetype.
        pub archetype: ArchetypeId,
        /// Archetype display name.
        pub name: String,
        /// Element of the current archetype.
        pub element: Element,
        /// Skill of the current archetype.
        pub skill: Option<Skill>,
        /// Cell holding the defender.
        pub cell: CellCoord,
        /// Centre of the cell in world units.
        pub position: Vec2,
        /// Range in world units.
        pub range: f32,
        /// Upgrade level.
        pub level: u32,
        /// Gold spent on the defender so far.
        pub spent: u64,
        /// Current hit points.
        pub hp: f64,
        /// Maximum hit points.
        pub max_hp: f64,
        /// Ticks of silence remaining.
        pub silenced: f32,
        /// Ticks until the active skill can fire again.
        pub active_cooldown: f32,
        /// Refund if sold now.
        pub sell_value: u64,
        /// Cost of the next upgrade.
        pub upgrade_cost: u64,
        /// Auras applied on the last update.
        pub auras: AuraSnapshot,
    }

    /// Captures every live defender in identifier order.
    #[must_use]
    pub fn defenders(world: &World) -> Vec<DefenderSnapshot> {
        let mut snapshots: Vec<DefenderSnapshot> = world
            .defenders
            .iter()
            .filter(|defender| !defender.dead)
            .filter_map(|defender| {
                let archetype = world.content.catalog.get(defender.archetype)?;
                Some(DefenderSnapshot {
                    id: defender.id,
                    archetype: defender.archetype,
                    name: archetype.name.clone(),
                    element: archetype.element,
                    skill: archetype.skill,
                    cell: defender.cell,
                    position: defender.cell.center(),
                    range: archetype.range,
                    level: defender.level,
                    spent: defender.spent,
                    hp: defender.hp,
                    max_hp: defender.max_hp,
                    silenced: defender.silenced.max(0.0),
                    active_cooldown: defender.active_cooldown,
                    sell_value: sell_value(defender.spent, defender.hp, defender.max_hp),
                    upgrade_cost: upgrade_cost(archetype.cost, defender.level),
                    auras: AuraSnapshot {
                        attack_speed: defender.auras.attack_speed,
                        damage: defender.auras.damage,
                        crit: defender.auras.crit,
                    },
                })
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Snapshot of one defender, if it is alive.
    #[must_use]
    pub fn defender(world: &World, id: DefenderId) -> Option<DefenderSnapshot> {
        defenders(world).into_iter().find(|snapshot| snapshot.id == id)
    }

    /// Identifier of the live defender occupying `cell`, if any.
    #[must_use]
    pub fn defender_at(world: &World, cell: CellCoord) -> Option<DefenderId> {
        world
            .defenders
            .iter()
            .find(|defender| !defender.dead && defender.cell == cell)
            .map(|defender| defender.id)
    }

    /// Evaluates whether `archetype` could be built at `cell` right now.
    #[must_use]
    pub fn placement_preview(
        world: &World,
        archetype: ArchetypeId,
        cell: CellCoord,
    ) -> Option<PlacementPreview> {
        let entry = world.content.catalog.get(archetype)?;
        let occupied = defender_at(world, cell).is_some();
        Some(PlacementPreview::evaluate(
            entry,
            cell,
            &world.content.path,
            occupied,
            world.gold,
        ))
    }

    /// Snapshot of an in-flight projectile.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Identifier of the projectile.
        pub id: ProjectileId,
        /// Position in world units.
        pub position: Vec2,
        /// Attacker the projectile homes on.
        pub target: AttackerId,
        /// Damage carried.
        pub damage: f64,
        /// Element carried.
        pub element: Element,
        /// Whether the shot critted.
        pub crit: bool,
    }

    /// Captures every in-flight projectile in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .filter(|projectile| !projectile.resolved)
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                target: projectile.target,
                damage: projectile.damage,
                element: projectile.element,
                crit: projectile.crit,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Snapshot of a pickup lying on the path.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PickupSnapshot {
        /// Identifier of the pickup.
        pub id: PickupId,
        /// Kind of pickup.
        pub kind: PickupKind,
        /// Position in world units.
        pub position: Vec2,
        /// Ticks until the pickup expires.
        pub life: f32,
    }

    /// Captures every live pickup in identifier order.
    #[must_use]
    pub fn pickups(world: &World) -> Vec<PickupSnapshot> {
        let mut snapshots: Vec<PickupSnapshot> = world
            .pickups
            .iter()
            .filter(|pickup| pickup.is_live())
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                kind: pickup.kind,
                position: pickup.position,
                life: pickup.life,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Snapshot of a floating text cue.
    #[derive(Clone, Debug, PartialEq)]
    pub struct TextSnapshot {
        /// Position in world units.
        pub position: Vec2,
        /// Text to draw.
        pub label: String,
        /// Presentation hint.
        pub tone: TextTone,
        /// Ticks until the text fades.
        pub life: f32,
    }

    /// Captures every floating text in creation order.
    #[must_use]
    pub fn floating_texts(world: &World) -> Vec<TextSnapshot> {
        world
            .texts
            .iter()
            .map(|text| TextSnapshot {
                position: text.position,
                label: text.label.clone(),
                tone: text.tone,
                life: text.life,
            })
            .collect()
    }
}

//! Drives a world through a session plan using only the command surface.

use std::fmt;

use elemental_defence_core::{Command, Event, TimeScale, TICKS_PER_SECOND};
use elemental_defence_world::{self as world, query, Outcome, World, WorldConfig};
use tracing::{debug, info, warn};

use crate::session::SessionPlan;

/// Final tallies of a headless run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) seed: u64,
    pub(crate) ticks: u64,
    pub(crate) waves_cleared: u32,
    pub(crate) outcome: Outcome,
    pub(crate) gold: u64,
    pub(crate) lives: u32,
    pub(crate) score: u64,
    pub(crate) defenders: usize,
    pub(crate) kills: u64,
    pub(crate) rejected: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seed:          {}", self.seed)?;
        writeln!(f, "Outcome:       {:?}", self.outcome)?;
        writeln!(f, "Ticks:         {}", self.ticks)?;
        writeln!(f, "Waves cleared: {}", self.waves_cleared)?;
        writeln!(f, "Kills:         {}", self.kills)?;
        writeln!(f, "Score:         {}", self.score)?;
        writeln!(f, "Gold:          {}", self.gold)?;
        writeln!(f, "Lives:         {}", self.lives)?;
        writeln!(f, "Towers:        {}", self.defenders)?;
        write!(f, "Rejected:      {}", self.rejected)
    }
}

#[derive(Debug, Default)]
struct Tally {
    waves_cleared: u32,
    kills: u64,
    rejected: u64,
}

struct Runner {
    world: World,
    events: Vec<Event>,
    tally: Tally,
}

impl Runner {
    fn new(plan: &SessionPlan) -> Self {
        Self {
            world: World::with_config(WorldConfig {
                seed: plan.seed,
                total_waves: plan.waves,
                ..WorldConfig::default()
            }),
            events: Vec::new(),
            tally: Tally::default(),
        }
    }

    /// Applies a command and returns how many waves it completed.
    fn dispatch(&mut self, command: Command) -> u32 {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);

        let mut completed = 0;
        for event in &self.events {
            match event {
                Event::WaveCompleted { .. } => completed += 1,
                Event::AttackerKilled { .. } => self.tally.kills += 1,
                Event::CommandRejected { .. } => self.tally.rejected += 1,
                _ => {}
            }
            if let Some(notification) = event.notification() {
                match event {
                    Event::CommandRejected { .. } => {
                        warn!(code = notification.code, "{}", notification.message);
                    }
                    _ => info!(code = notification.code, "{}", notification.message),
                }
            }
        }
        self.tally.waves_cleared += completed;
        completed
    }

    fn upgrade_all(&mut self, plan: &SessionPlan) {
        for defender in plan.upgrade_targets() {
            let cost = query::defender(&self.world, defender).map(|snapshot| snapshot.upgrade_cost);
            match cost {
                Some(cost) if cost <= query::gold(&self.world) => {
                    let _ = self.dispatch(Command::UpgradeDefender { defender });
                }
                Some(_) => debug!(defender = defender.get(), "upgrade postponed"),
                None => {}
            }
        }
    }

    fn fire_ready_skills(&mut self) {
        if query::attackers(&self.world).is_empty() {
            return;
        }
        let ready: Vec<_> = query::defenders(&self.world)
            .into_iter()
            .filter(|defender| {
                defender.skill.is_some_and(|skill| skill.is_active())
                    && defender.active_cooldown <= 0.0
                    && defender.silenced <= 0.0
            })
            .map(|defender| defender.id)
            .collect();
        for defender in ready {
            let _ = self.dispatch(Command::TriggerActiveSkill { defender });
        }
    }

    fn summary(&self, seed: u64) -> Summary {
        Summary {
            seed,
            ticks: query::tick_index(&self.world),
            waves_cleared: self.tally.waves_cleared,
            outcome: query::outcome(&self.world),
            gold: query::gold(&self.world),
            lives: query::lives(&self.world),
            score: query::score(&self.world),
            defenders: query::defenders(&self.world).len(),
            kills: self.tally.kills,
            rejected: self.tally.rejected,
        }
    }
}

/// Plays a session until it ends or the tick budget runs out.
///
/// Waves are started back to back instead of waiting for the auto-start
/// countdown.
pub(crate) fn run(plan: &SessionPlan) -> Summary {
    let mut runner = Runner::new(plan);
    info!(seed = plan.seed, waves = plan.waves, "{}", query::welcome_banner(&runner.world));

    let _ = runner.dispatch(Command::BeginSession);
    if plan.fast {
        let _ = runner.dispatch(Command::SetTimeScale {
            scale: TimeScale::Double,
        });
    }
    for order in &plan.builds {
        let _ = runner.dispatch(Command::BuildDefender {
            archetype: order.archetype(),
            cell: order.cell(),
        });
    }
    let _ = runner.dispatch(Command::StartNextWave);

    let skill_period = TICKS_PER_SECOND as u64;
    while query::outcome(&runner.world) == Outcome::InProgress
        && query::tick_index(&runner.world) < plan.max_ticks
    {
        if runner.dispatch(Command::Tick) > 0 && query::outcome(&runner.world) == Outcome::InProgress {
            runner.upgrade_all(plan);
            let _ = runner.dispatch(Command::StartNextWave);
        }
        if plan.auto_skills && query::tick_index(&runner.world) % skill_period == 0 {
            runner.fire_ready_skills();
        }
    }

    runner.summary(plan.seed)
}

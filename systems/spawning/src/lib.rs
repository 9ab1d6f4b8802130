#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave scheduler that turns a wave configuration into timed spawn actions.
//!
//! The scheduler owns the wave counter and the spawn countdown but never
//! touches entities itself. Each tick the world calls [`WaveScheduler::advance`]
//! with the number of live attackers and then performs the returned
//! [`SchedulerAction`] values in order.

use elemental_defence_core::{CommandError, SpawnTier, WaveConfig, TICKS_PER_SECOND, TOTAL_WAVES};

/// Seconds before the next wave starts on its own.
pub const AUTO_START_SECONDS: f32 = 10.0;

/// Flat part of the wave completion bonus.
pub const COMPLETION_BONUS_BASE: u64 = 100;

/// Completion bonus added per wave number.
pub const COMPLETION_BONUS_PER_WAVE: u64 = 25;

/// Lifecycle of the wave in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Between waves, possibly counting down to an automatic start.
    Idle,
    /// Spawns remain in the countdown.
    Spawning,
    /// Every spawn was emitted; waiting for the field to clear.
    Draining,
    /// The final wave was cleared.
    Victory,
}

/// Work the world must perform on behalf of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerAction {
    /// Spawn one attacker of the current wave.
    Spawn {
        /// One-based wave supplying the attacker's stats.
        wave: u32,
        /// Category to spawn.
        tier: SpawnTier,
    },
    /// The wave finished; pay the bonus and repair defenders.
    Completed {
        /// Wave that finished.
        wave: u32,
        /// Gold granted for the clear.
        bonus: u64,
        /// Whether this was the final wave.
        victory: bool,
    },
    /// The auto-start countdown elapsed.
    AutoStart,
}

/// Completion bonus for reaching the provided wave number.
#[must_use]
pub const fn completion_bonus(next_wave: u32) -> u64 {
    COMPLETION_BONUS_BASE + COMPLETION_BONUS_PER_WAVE * next_wave as u64
}

/// Tier of the spawn emitted while `remaining` spawns are still queued.
///
/// Boss waves hold their bosses for the final `boss_count` spawns.
#[must_use]
pub const fn spawn_tier(is_boss: bool, remaining: u32, boss_count: u32) -> SpawnTier {
    if !is_boss {
        SpawnTier::Standard
    } else if remaining > boss_count {
        SpawnTier::Minion
    } else {
        SpawnTier::Boss
    }
}

/// State machine pacing spawns and detecting wave completion.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveScheduler {
    phase: Phase,
    wave: u32,
    total: u32,
    remaining: u32,
    interval: f32,
    spawn_timer: f32,
    is_boss: bool,
    boss_count: u32,
    auto_start: Option<f32>,
}

impl Default for WaveScheduler {
    fn default() -> Self {
        Self::new(TOTAL_WAVES)
    }
}

impl WaveScheduler {
    /// Creates an idle scheduler positioned before the first of `total` waves.
    #[must_use]
    pub const fn new(total: u32) -> Self {
        Self {
            phase: Phase::Idle,
            wave: 1,
            total,
            remaining: 0,
            interval: 0.0,
            spawn_timer: 0.0,
            is_boss: false,
            boss_count: 0,
            auto_start: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// One-based number of the wave in play, or the next wave while idle.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Whether a wave is spawning or draining.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Spawning | Phase::Draining)
    }

    /// Spawns left in the countdown.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds left on the auto-start countdown, if armed.
    #[must_use]
    pub const fn auto_start(&self) -> Option<f32> {
        self.auto_start
    }

    /// Arms the countdown that starts the next wave automatically.
    pub fn arm_auto_start(&mut self) {
        if self.phase == Phase::Idle {
            self.auto_start = Some(AUTO_START_SECONDS);
        }
    }

    /// Starts the next wave using its configuration.
    ///
    /// Returns the one-based wave number that began.
    pub fn begin(&mut self, config: &WaveConfig) -> Result<u32, CommandError> {
        match self.phase {
            Phase::Spawning | Phase::Draining => return Err(CommandError::WaveInProgress),
            Phase::Victory => return Err(CommandError::ContentExhausted),
            Phase::Idle => {}
        }
        if self.wave > self.total {
            return Err(CommandError::ContentExhausted);
        }

        self.phase = Phase::Spawning;
        self.remaining = config.count;
        self.interval = config.interval;
        self.spawn_timer = 0.0;
        self.is_boss = config.is_boss;
        self.boss_count = config.boss_count;
        self.auto_start = None;
        if self.remaining == 0 {
            self.phase = Phase::Draining;
        }
        Ok(self.wave)
    }

    /// Advances timers by one tick scaled by `scale`.
    pub fn advance(&mut self, scale: f32, live_attackers: usize, out: &mut Vec<SchedulerAction>) {
        match self.phase {
            Phase::Spawning => {
                self.spawn_timer -= scale;
                if self.spawn_timer > 0.0 {
                    return;
                }
                out.push(SchedulerAction::Spawn {
                    wave: self.wave,
                    tier: spawn_tier(self.is_boss, self.remaining, self.boss_count),
                });
                self.remaining -= 1;
                self.spawn_timer = self.interval;
                if self.remaining == 0 {
                    self.phase = Phase::Draining;
                }
            }
            Phase::Draining => {
                if live_attackers > 0 {
                    return;
                }
                let finished = self.wave;
                self.wave += 1;
                let bonus = completion_bonus(self.wave);
                let victory = self.wave > self.total;
                if victory {
                    self.wave = self.total;
                    self.phase = Phase::Victory;
                } else {
                    self.phase = Phase::Idle;
                    self.auto_start = Some(AUTO_START_SECONDS);
                }
                out.push(SchedulerAction::Completed {
                    wave: finished,
                    bonus,
                    victory,
                });
            }
            Phase::Idle => {
                let Some(seconds) = self.auto_start.as_mut() else {
                    return;
                };
                *seconds -= scale / TICKS_PER_SECOND;
                if *seconds <= 0.0 {
                    self.auto_start = None;
                    out.push(SchedulerAction::AutoStart);
                }
            }
            Phase::Victory => {}
        }
    }
}

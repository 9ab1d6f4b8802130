//! Session files describing a scripted headless run.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use elemental_defence_core::{ArchetypeId, CellCoord, DefenderId, TOTAL_WAVES};
use serde::Deserialize;

/// Ticks simulated before the runner gives up on an unfinished session.
pub(crate) const DEFAULT_MAX_TICKS: u64 = 500_000;

/// A tower to place before the first wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BuildOrder {
    pub(crate) archetype: u32,
    pub(crate) column: u32,
    pub(crate) row: u32,
}

impl BuildOrder {
    pub(crate) const fn archetype(&self) -> ArchetypeId {
        ArchetypeId::new(self.archetype)
    }

    pub(crate) const fn cell(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

/// Everything the runner needs to replay a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionPlan {
    pub(crate) seed: u64,
    pub(crate) waves: u32,
    pub(crate) max_ticks: u64,
    pub(crate) fast: bool,
    /// Fire ready active skills once per in-game second.
    pub(crate) auto_skills: bool,
    pub(crate) builds: Vec<BuildOrder>,
    /// Defender ids upgraded after every cleared wave, in order, while gold lasts.
    pub(crate) upgrades: Vec<u32>,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            seed: 0,
            waves: TOTAL_WAVES,
            max_ticks: DEFAULT_MAX_TICKS,
            fast: false,
            auto_skills: true,
            builds: vec![
                BuildOrder {
                    archetype: 4,
                    column: 4,
                    row: 3,
                },
                BuildOrder {
                    archetype: 3,
                    column: 9,
                    row: 3,
                },
                BuildOrder {
                    archetype: 0,
                    column: 14,
                    row: 3,
                },
            ],
            upgrades: Vec::new(),
        }
    }
}

impl SessionPlan {
    /// Reads and parses a session file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse session file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let plan: Self = toml::from_str(contents)?;
        anyhow::ensure!(plan.waves > 0, "a session needs at least one wave");
        Ok(plan)
    }

    pub(crate) fn upgrade_targets(&self) -> impl Iterator<Item = DefenderId> + '_ {
        self.upgrades.iter().copied().map(DefenderId::new)
    }
}

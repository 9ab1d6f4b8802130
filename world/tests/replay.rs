use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use elemental_defence_core::{ArchetypeId, CellCoord, Command, DefenderId, Event, TimeScale};
use elemental_defence_world::{self as world, query, World, WorldConfig};

#[test]
fn equal_seeds_replay_identically() {
    let first = replay(7, scripted_commands());
    let second = replay(7, scripted_commands());
    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.events > 0);
}

#[test]
fn session_progresses_through_early_waves() {
    let outcome = replay(11, scripted_commands());
    assert!(outcome.waves_started >= 2, "waves started: {}", outcome.waves_started);
    assert!(outcome.spawned >= 10, "attackers spawned: {}", outcome.spawned);
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    fingerprint: u64,
    events: usize,
    waves_started: usize,
    spawned: usize,
    gold: u64,
    lives: u32,
    score: u64,
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::BeginSession,
        Command::BuildDefender {
            archetype: ArchetypeId::new(4),
            cell: CellCoord::new(4, 3),
        },
        Command::BuildDefender {
            archetype: ArchetypeId::new(3),
            cell: CellCoord::new(9, 3),
        },
        Command::BuildDefender {
            archetype: ArchetypeId::new(0),
            cell: CellCoord::new(14, 3),
        },
        Command::StartNextWave,
    ];
    commands.extend(std::iter::repeat(Command::Tick).take(1500));
    commands.push(Command::SetTimeScale {
        scale: TimeScale::Double,
    });
    commands.push(Command::UpgradeDefender {
        defender: DefenderId::new(0),
    });
    commands.extend(std::iter::repeat(Command::Tick).take(2500));
    commands
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::with_config(WorldConfig {
        seed,
        ..WorldConfig::default()
    });
    let mut hasher = DefaultHasher::new();
    let mut events = Vec::new();
    let mut total = 0;
    let mut waves_started = 0;
    let mut spawned = 0;

    for command in commands {
        events.clear();
        world::apply(&mut world, command, &mut events);
        for event in &events {
            total += 1;
            match event {
                Event::WaveStarted { .. } => waves_started += 1,
                Event::AttackerSpawned { .. } => spawned += 1,
                _ => {}
            }
            format!("{event:?}").hash(&mut hasher);
        }
    }

    for attacker in query::attackers(&world) {
        attacker.id.hash(&mut hasher);
        attacker.hp.to_bits().hash(&mut hasher);
        attacker.position.x.to_bits().hash(&mut hasher);
        attacker.position.y.to_bits().hash(&mut hasher);
    }

    ReplayOutcome {
        fingerprint: hasher.finish(),
        events: total,
        waves_started,
        spawned,
        gold: query::gold(&world),
        lives: query::lives(&world),
        score: query::score(&world),
    }
}

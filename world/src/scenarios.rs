use elemental_defence_core::{
    ArchetypeId, CellCoord, Command, CommandError, Element, Event, PickupKind, PlacementRule,
    Skill, SpawnTier, Vec2,
};
use elemental_defence_system_combat::PROJECTILE_SPEED;
use elemental_defence_system_spawning::completion_bonus;

use crate::projectiles::Launch;
use crate::query::{self, WavePhase};
use crate::{apply, scaffolding, Outcome, ScriptedRng, SimRng, World, WorldConfig};

const HEALER: ArchetypeId = ArchetypeId::new(0);
const TIDECALLER: ArchetypeId = ArchetypeId::new(3);
const PROSPECTOR: ArchetypeId = ArchetypeId::new(6);
const SNIPER: ArchetypeId = ArchetypeId::new(18);
const CHAOS_PRISM: ArchetypeId = ArchetypeId::new(22);
const GREED_ENGINE: ArchetypeId = ArchetypeId::new(27);
const MERCHANT: ArchetypeId = ArchetypeId::new(36);
const OFF_PATH: CellCoord = CellCoord::new(5, 4);
/// Directly below the first path cell.
const PATH_SIDE: CellCoord = CellCoord::new(1, 3);

/// World whose every probability roll fails and every pick lands last.
fn quiet_world() -> World {
    scripted_world(&[0.99])
}

fn scripted_world(units: &[f64]) -> World {
    World::with_rng(
        WorldConfig::default(),
        SimRng::from_rng(ScriptedRng::new(units)),
    )
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn ticks(world: &mut World, count: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        apply(world, Command::Tick, &mut events);
    }
    events
}

fn rejection(events: &[Event]) -> Option<CommandError> {
    events.iter().find_map(|event| match event {
        Event::CommandRejected { reason } => Some(*reason),
        _ => None,
    })
}

fn position_of(world: &World, index: usize) -> Vec2 {
    query::attackers(world)[index].position
}

#[test]
fn rejected_builds_leave_gold_untouched() {
    let mut world = quiet_world();

    let on_path = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: CellCoord::new(5, 2),
        },
    );
    assert_eq!(
        rejection(&on_path),
        Some(CommandError::InvalidPlacement {
            rule: PlacementRule::OffPath
        })
    );

    let too_expensive = run(
        &mut world,
        Command::BuildDefender {
            archetype: MERCHANT,
            cell: OFF_PATH,
        },
    );
    assert_eq!(
        rejection(&too_expensive),
        Some(CommandError::InsufficientGold {
            required: 1000,
            available: 600
        })
    );

    let outside = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: CellCoord::new(25, 3),
        },
    );
    assert_eq!(rejection(&outside), Some(CommandError::OutOfBounds));

    let unknown = run(
        &mut world,
        Command::BuildDefender {
            archetype: ArchetypeId::new(99),
            cell: OFF_PATH,
        },
    );
    assert_eq!(
        rejection(&unknown),
        Some(CommandError::UnknownArchetype(ArchetypeId::new(99)))
    );
    assert_eq!(query::gold(&world), 600);

    let built = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: OFF_PATH,
        },
    );
    assert!(matches!(built.as_slice(), [Event::DefenderBuilt { cost: 50, .. }]));
    assert_eq!(query::gold(&world), 550);

    let occupied = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: OFF_PATH,
        },
    );
    assert_eq!(rejection(&occupied), Some(CommandError::CellOccupied));
    assert_eq!(query::gold(&world), 550);
}

#[test]
fn selling_at_half_health_refunds_thirty_five_percent() {
    let mut world = quiet_world();
    let _ = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: OFF_PATH,
        },
    );
    let snapshot = query::defenders(&world).remove(0);
    scaffolding::set_defender_hp(&mut world, snapshot.id, snapshot.max_hp / 2.0);

    let events = run(
        &mut world,
        Command::SellDefender {
            defender: snapshot.id,
        },
    );
    assert!(events.contains(&Event::DefenderSold {
        defender: snapshot.id,
        refund: 17,
    }));
    assert_eq!(query::gold(&world), 550 + 17);
    assert!(query::defenders(&world).is_empty());
}

#[test]
fn upgrades_compound_cost_and_accumulate_spend() {
    let mut world = quiet_world();
    let _ = run(
        &mut world,
        Command::BuildDefender {
            archetype: HEALER,
            cell: OFF_PATH,
        },
    );
    let id = query::defenders(&world)[0].id;

    let events = run(&mut world, Command::UpgradeDefender { defender: id });
    assert!(events.contains(&Event::DefenderUpgraded {
        defender: id,
        level: 2,
        cost: 75,
    }));
    let snapshot = query::defender(&world, id).expect("defender survives");
    assert_eq!(snapshot.spent, 125);
    assert_eq!(snapshot.upgrade_cost, 112);
    assert_eq!(query::gold(&world), 475);
}

#[test]
fn invincible_attackers_shrug_off_lethal_damage() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    scaffolding::grant_invincibility(&mut world, attacker, 100.0);
    let position = position_of(&world, 0);

    let events = run(
        &mut world,
        Command::TapDamage {
            position,
            amount: 1.0e9,
        },
    );
    assert!(rejection(&events).is_none());
    let snapshot = query::attacker(&world, attacker).expect("attacker survives");
    assert_eq!(snapshot.hp, snapshot.max_hp);
    assert!(snapshot.invincible);
}

#[test]
fn lethal_tap_pays_reward_and_score() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    let position = position_of(&world, 0);

    let events = run(
        &mut world,
        Command::TapDamage {
            position,
            amount: 1.0e6,
        },
    );
    assert!(events.contains(&Event::AttackerKilled {
        attacker,
        reward: 10,
        killer: None,
    }));
    assert_eq!(query::gold(&world), 610);
    assert_eq!(query::score(&world), 100);
    assert!(query::attacker(&world, attacker).is_none());
}

#[test]
fn tap_far_from_any_attacker_is_rejected() {
    let mut world = quiet_world();
    let _ = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    let events = run(
        &mut world,
        Command::TapDamage {
            position: Vec2::new(700.0, 500.0),
            amount: 10.0,
        },
    );
    assert_eq!(rejection(&events), Some(CommandError::NoValidTarget));
}

#[test]
fn revival_doubles_hit_points_exactly_once() {
    let mut world = scripted_world(&[0.0]);
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    let mut events = Vec::new();

    scaffolding::strike_attacker(&mut world, attacker, 1.0e6, &mut events);
    assert!(events.contains(&Event::AttackerRevived {
        attacker,
        max_hp: 300.0,
    }));
    let snapshot = query::attacker(&world, attacker).expect("revived");
    assert_eq!(snapshot.hp, 300.0);
    assert!(snapshot.revived);

    events.clear();
    scaffolding::strike_attacker(&mut world, attacker, 1.0e6, &mut events);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AttackerKilled { attacker: id, .. } if *id == attacker)));
    assert!(query::attacker(&world, attacker).is_none());
}

#[test]
fn split_leaves_a_half_health_child_behind() {
    // Revival fails, split succeeds, the silence roll fails.
    let mut world = scripted_world(&[0.5, 0.0, 0.99]);
    let parent = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    let mut events = Vec::new();

    scaffolding::strike_attacker(&mut world, parent, 1.0e6, &mut events);

    let child = events
        .iter()
        .find_map(|event| match event {
            Event::AttackerSplit { parent: p, child } if *p == parent => Some(*child),
            _ => None,
        })
        .expect("split event");
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AttackerKilled { attacker, .. } if *attacker == parent)));

    let snapshot = query::attacker(&world, child).expect("child alive");
    assert_eq!(snapshot.tier, SpawnTier::Minion);
    assert!(snapshot.is_split);
    assert_eq!(snapshot.max_hp, 75.0);
    assert_eq!(snapshot.hp, 75.0);
    assert!((snapshot.scale - 0.6 * 0.8).abs() < 1e-6);
}

#[test]
fn split_children_die_for_good() {
    // Revival fails, split succeeds, the silence roll fails.
    let mut world = scripted_world(&[0.5, 0.0, 0.99]);
    let parent = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 100.0);
    let mut events = Vec::new();
    scaffolding::strike_attacker(&mut world, parent, 1.0e6, &mut events);
    let child = events
        .iter()
        .find_map(|event| match event {
            Event::AttackerSplit { child, .. } => Some(*child),
            _ => None,
        })
        .expect("split event");

    world.rng = SimRng::from_rng(ScriptedRng::constant(0.0));
    events.clear();
    scaffolding::strike_attacker(&mut world, child, 1.0e6, &mut events);

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::AttackerRevived { .. } | Event::AttackerSplit { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AttackerKilled { attacker, .. } if *attacker == child)));
    assert!(query::attackers(&world).is_empty());
}

#[test]
fn minions_never_revive_or_split() {
    let mut world = scripted_world(&[0.0]);
    let mut events = Vec::new();
    for _ in 0..10 {
        let minion = scaffolding::spawn_attacker(&mut world, SpawnTier::Minion, 0.0);
        scaffolding::strike_attacker(&mut world, minion, 1.0e6, &mut events);
    }

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::AttackerRevived { .. } | Event::AttackerSplit { .. })));
    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::AttackerKilled { .. }))
        .count();
    assert_eq!(kills, 10);
    assert!(query::attackers(&world).is_empty());
}

#[test]
fn revival_and_split_rates_stay_near_five_percent() {
    let mut world = World::with_config(WorldConfig {
        seed: 0x5eed,
        ..WorldConfig::default()
    });
    let mut events = Vec::new();
    for _ in 0..1000 {
        let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
        scaffolding::strike_attacker(&mut world, attacker, 1.0e9, &mut events);
    }

    let revivals = events
        .iter()
        .filter(|event| matches!(event, Event::AttackerRevived { .. }))
        .count();
    let splits = events
        .iter()
        .filter(|event| matches!(event, Event::AttackerSplit { .. }))
        .count();
    assert!((20..=90).contains(&revivals), "revivals: {revivals}");
    assert!((15..=90).contains(&splits), "splits: {splits}");
}

#[test]
fn poison_ticks_at_once_and_then_every_second() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    scaffolding::poison_attacker(&mut world, attacker);

    let _ = ticks(&mut world, 1);
    assert_eq!(query::attacker(&world, attacker).map(|a| a.hp), Some(130.0));
    let _ = ticks(&mut world, 89);
    assert_eq!(query::attacker(&world, attacker).map(|a| a.hp), Some(130.0));
    let _ = ticks(&mut world, 1);
    assert_eq!(query::attacker(&world, attacker).map(|a| a.hp), Some(110.0));
}

#[test]
fn invincibility_blocks_poison() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    scaffolding::poison_attacker(&mut world, attacker);
    scaffolding::grant_invincibility(&mut world, attacker, 450.0);

    let _ = ticks(&mut world, 200);
    let snapshot = query::attacker(&world, attacker).expect("alive");
    assert_eq!(snapshot.hp, snapshot.max_hp);
    assert!(snapshot.poisoned);
}

#[test]
fn melee_strikes_ignore_elements_and_scale_for_bosses() {
    let mut world = quiet_world();
    let cell = CellCoord::new(0, 3);
    let defender = scaffolding::place_defender(&mut world, SNIPER, cell);
    let max_hp = query::defender(&world, defender).expect("placed").max_hp;
    let _ = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);

    let _ = ticks(&mut world, 1);
    assert_eq!(query::defender(&world, defender).map(|d| d.hp), Some(max_hp - 10.0));

    let mut world = quiet_world();
    let defender = scaffolding::place_defender(&mut world, SNIPER, cell);
    let _ = scaffolding::spawn_attacker(&mut world, SpawnTier::Boss, 0.0);
    let _ = ticks(&mut world, 1);
    assert_eq!(query::defender(&world, defender).map(|d| d.hp), Some(max_hp - 50.0));
}

#[test]
fn active_skill_checks_preconditions_in_order() {
    let mut world = quiet_world();
    let healer = scaffolding::place_defender(&mut world, HEALER, OFF_PATH);
    let sniper = scaffolding::place_defender(&mut world, SNIPER, CellCoord::new(6, 4));

    let events = run(&mut world, Command::TriggerActiveSkill { defender: healer });
    assert_eq!(rejection(&events), Some(CommandError::NoActiveSkill));
    let events = run(&mut world, Command::TriggerActiveSkill { defender: sniper });
    assert_eq!(rejection(&events), Some(CommandError::NoValidTarget));

    let strong = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 80.0);
    let weak = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 40.0);
    let mut scratch = Vec::new();
    scaffolding::strike_attacker(&mut world, weak, 10.0, &mut scratch);
    let events = run(&mut world, Command::TriggerActiveSkill { defender: sniper });
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ActiveSkillTriggered { target, damage, .. } if *target == strong && *damage == 500.0
    )));
    assert!(query::attacker(&world, weak).is_some());

    let events = run(&mut world, Command::TriggerActiveSkill { defender: sniper });
    assert_eq!(rejection(&events), Some(CommandError::SkillOnCooldown));
}

#[test]
fn selling_the_selected_defender_clears_the_selection() {
    let mut world = quiet_world();
    let id = scaffolding::place_defender(&mut world, HEALER, OFF_PATH);

    let events = run(&mut world, Command::SelectDefender { defender: Some(id) });
    assert_eq!(events, vec![Event::SelectionChanged { defender: Some(id) }]);
    assert_eq!(query::selected_defender(&world), Some(id));

    let events = run(&mut world, Command::SellDefender { defender: id });
    assert!(events.contains(&Event::SelectionChanged { defender: None }));
    assert_eq!(query::selected_defender(&world), None);

    let events = run(&mut world, Command::SelectDefender { defender: Some(id) });
    assert_eq!(rejection(&events), Some(CommandError::MissingDefender));
}

#[test]
fn session_start_is_idempotent_and_arms_the_countdown() {
    let mut world = quiet_world();
    let first = run(&mut world, Command::BeginSession);
    let second = run(&mut world, Command::BeginSession);
    assert_eq!(first, vec![Event::SessionStarted]);
    assert!(second.is_empty());
    assert_eq!(query::wave_status(&world).auto_start, Some(10.0));

    let events = ticks(&mut world, 905);
    let started = events
        .iter()
        .filter(|event| matches!(event, Event::WaveStarted { wave: 1 }))
        .count();
    assert_eq!(started, 1);

    let events = run(&mut world, Command::StartNextWave);
    assert_eq!(rejection(&events), Some(CommandError::WaveInProgress));
}

#[test]
fn wave_completion_pays_once_and_repairs_defenders() {
    let mut world = quiet_world();
    let defender = scaffolding::place_defender(&mut world, HEALER, CellCoord::new(10, 12));
    let max_hp = query::defender(&world, defender).expect("placed").max_hp;
    scaffolding::set_defender_hp(&mut world, defender, max_hp - 50.0);

    let events = run(&mut world, Command::StartNextWave);
    assert!(events.contains(&Event::WaveStarted { wave: 1 }));
    for _ in 0..2000 {
        if query::wave_status(&world).phase == WavePhase::Draining {
            break;
        }
        let _ = ticks(&mut world, 1);
    }
    assert_eq!(query::wave_status(&world).phase, WavePhase::Draining);

    let mut kills = Vec::new();
    for snapshot in query::attackers(&world) {
        scaffolding::strike_attacker(&mut world, snapshot.id, 1.0e9, &mut kills);
    }
    let gold_before = query::gold(&world);

    let events = ticks(&mut world, 30);
    let completions: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCompleted { .. }))
        .collect();
    let bonus = completion_bonus(2);
    assert_eq!(completions, vec![&Event::WaveCompleted { wave: 1, bonus }]);
    assert_eq!(query::gold(&world), gold_before + bonus);

    let repaired = query::defender(&world, defender).expect("alive");
    assert_eq!(repaired.max_hp, max_hp + 10.0);
    assert_eq!(repaired.hp, max_hp - 30.0);
    assert_eq!(query::wave_status(&world).phase, WavePhase::Idle);
    assert_eq!(query::wave_status(&world).wave, 2);
}

#[test]
fn acid_rain_corrodes_defenders_every_second() {
    let mut world = quiet_world();
    let defender = scaffolding::place_defender(&mut world, HEALER, CellCoord::new(10, 12));
    let max_hp = query::defender(&world, defender).expect("placed").max_hp;
    scaffolding::start_acid_rain(&mut world, 1000.0);

    let _ = ticks(&mut world, 89);
    assert_eq!(query::defender(&world, defender).map(|d| d.hp), Some(max_hp));
    let _ = ticks(&mut world, 1);
    // The last of four picks deals two plus three.
    assert_eq!(query::defender(&world, defender).map(|d| d.hp), Some(max_hp - 5.0));
    assert!(query::acid_rain(&world).is_some());
}

#[test]
fn acid_rain_slows_attackers() {
    let mut dry = quiet_world();
    let mut wet = quiet_world();
    let _ = scaffolding::spawn_attacker(&mut dry, SpawnTier::Standard, 0.0);
    let _ = scaffolding::spawn_attacker(&mut wet, SpawnTier::Standard, 0.0);
    scaffolding::start_acid_rain(&mut wet, 1000.0);

    let _ = ticks(&mut dry, 100);
    let _ = ticks(&mut wet, 100);
    let dry_x = position_of(&dry, 0).x;
    let wet_x = position_of(&wet, 0).x;
    assert!((dry_x - 120.0).abs() < 1e-2);
    assert!((wet_x - 115.0).abs() < 1e-2);
}

#[test]
fn acid_rain_slows_defender_reloads() {
    let mut dry = quiet_world();
    let mut wet = quiet_world();
    for world in [&mut dry, &mut wet] {
        let _ = scaffolding::place_defender(world, TIDECALLER, PATH_SIDE);
        let _ = scaffolding::spawn_attacker(world, SpawnTier::Standard, 0.0);
    }
    scaffolding::start_acid_rain(&mut wet, 1000.0);

    // The first tick fires and reloads the sixty tick cooldown.
    let _ = ticks(&mut dry, 1);
    let _ = ticks(&mut wet, 1);
    assert_eq!(dry.defenders[0].cooldown, 60.0);
    assert_eq!(wet.defenders[0].cooldown, 60.0);

    let _ = ticks(&mut dry, 10);
    let _ = ticks(&mut wet, 10);
    assert!((dry.defenders[0].cooldown - 50.0).abs() < 1e-3);
    assert!((wet.defenders[0].cooldown - 51.0).abs() < 1e-3);
}

#[test]
fn acid_rain_destroys_worn_down_defenders() {
    let mut world = quiet_world();
    let defender = scaffolding::place_defender(&mut world, HEALER, CellCoord::new(10, 12));
    scaffolding::set_defender_hp(&mut world, defender, 3.0);
    scaffolding::start_acid_rain(&mut world, 1000.0);

    let events = ticks(&mut world, 90);
    assert!(events.contains(&Event::DefenderDestroyed { defender }));
    assert!(query::defender(&world, defender).is_none());
    assert!(query::defenders(&world).is_empty());
}

#[test]
fn losing_every_life_ends_the_session() {
    let mut world = World::with_rng(
        WorldConfig {
            starting_lives: 1,
            ..WorldConfig::default()
        },
        SimRng::from_rng(ScriptedRng::constant(0.99)),
    );
    let _ = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 2500.0);

    let mut events = Vec::new();
    for _ in 0..200 {
        apply(&mut world, Command::Tick, &mut events);
        if query::is_game_over(&world) {
            break;
        }
    }
    assert!(events.contains(&Event::GameOver { wave: 1, score: 0 }));
    assert_eq!(query::lives(&world), 0);
    assert_eq!(query::outcome(&world), Outcome::Defeat);

    let events = run(&mut world, Command::Tick);
    assert_eq!(events, vec![Event::CommandRejected {
        reason: CommandError::GameOver
    }]);
}

#[test]
fn water_shots_damage_and_slow_their_target() {
    let mut world = quiet_world();
    let _ = scaffolding::place_defender(&mut world, TIDECALLER, PATH_SIDE);
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);

    let _ = ticks(&mut world, 20);
    let snapshot = query::attacker(&world, attacker).expect("alive");
    assert_eq!(snapshot.hp, 150.0 - 21.0);
    assert!(snapshot.slowed);
    assert!(query::projectiles(&world).is_empty());
}

#[test]
fn merchant_shots_heal_the_target_and_pay_out() {
    let mut world = quiet_world();
    let _ = scaffolding::place_defender(&mut world, MERCHANT, PATH_SIDE);
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    let mut scratch = Vec::new();
    scaffolding::strike_attacker(&mut world, attacker, 50.0, &mut scratch);

    let _ = ticks(&mut world, 20);
    assert_eq!(query::attacker(&world, attacker).map(|a| a.hp), Some(110.0));
    assert_eq!(query::gold(&world), 610);
}

#[test]
fn gold_skill_pays_every_five_seconds() {
    let mut world = quiet_world();
    let _ = scaffolding::place_defender(&mut world, PROSPECTOR, OFF_PATH);

    let _ = ticks(&mut world, 449);
    assert_eq!(query::gold(&world), 600);
    let _ = ticks(&mut world, 1);
    assert_eq!(query::gold(&world), 610);
}

#[test]
fn healer_mends_a_damaged_neighbour_each_second() {
    let mut world = quiet_world();
    let _ = scaffolding::place_defender(&mut world, HEALER, OFF_PATH);
    let patient = scaffolding::place_defender(&mut world, SNIPER, CellCoord::new(6, 4));
    scaffolding::set_defender_hp(&mut world, patient, 200.0);

    let _ = ticks(&mut world, 89);
    assert_eq!(query::defender(&world, patient).map(|d| d.hp), Some(200.0));
    let _ = ticks(&mut world, 1);
    assert_eq!(query::defender(&world, patient).map(|d| d.hp), Some(205.0));
}

#[test]
fn chaos_prism_transforms_after_ten_seconds() {
    let mut world = quiet_world();
    let prism = scaffolding::place_defender(&mut world, CHAOS_PRISM, OFF_PATH);

    let events = ticks(&mut world, 900);
    assert!(events.contains(&Event::DefenderTransformed {
        defender: prism,
        archetype: MERCHANT,
    }));
    assert_eq!(query::defender(&world, prism).map(|d| d.archetype), Some(MERCHANT));
}

#[test]
fn heal_pickup_restores_a_fifth_of_max_hp() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    let mut scratch = Vec::new();
    scaffolding::strike_attacker(&mut world, attacker, 100.0, &mut scratch);
    let pickup = scaffolding::drop_pickup(&mut world, PickupKind::Heal, Vec2::new(25.0, 100.0));

    let events = ticks(&mut world, 1);
    assert!(events.contains(&Event::PickupConsumed {
        pickup,
        attacker,
        kind: PickupKind::Heal,
    }));
    assert_eq!(query::attacker(&world, attacker).map(|a| a.hp), Some(80.0));
    assert!(query::pickups(&world).is_empty());
}

#[test]
fn poison_pickup_wounds_and_slows() {
    let mut world = quiet_world();
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    let _ = scaffolding::drop_pickup(&mut world, PickupKind::Poison, Vec2::new(25.0, 100.0));

    let _ = ticks(&mut world, 1);
    let snapshot = query::attacker(&world, attacker).expect("alive");
    assert_eq!(snapshot.hp, 150.0 - 45.0);
    assert!(snapshot.slowed);
}

#[test]
fn clearing_the_final_wave_wins_the_session() {
    let mut world = World::with_rng(
        WorldConfig {
            total_waves: 1,
            ..WorldConfig::default()
        },
        SimRng::from_rng(ScriptedRng::constant(0.99)),
    );
    let _ = run(&mut world, Command::StartNextWave);
    for _ in 0..2000 {
        if query::wave_status(&world).phase == WavePhase::Draining {
            break;
        }
        let _ = ticks(&mut world, 1);
    }

    let mut kills = Vec::new();
    for snapshot in query::attackers(&world) {
        scaffolding::strike_attacker(&mut world, snapshot.id, 1.0e9, &mut kills);
    }
    let events = ticks(&mut world, 30);
    assert_eq!(
        events.iter().filter(|event| **event == Event::Victory).count(),
        1
    );
    assert_eq!(query::outcome(&world), Outcome::Victory);

    let events = run(&mut world, Command::StartNextWave);
    assert_eq!(rejection(&events), Some(CommandError::ContentExhausted));
}

#[test]
fn greed_bonus_survives_selling_the_shooter() {
    let mut world = quiet_world();
    let defender = scaffolding::place_defender(&mut world, GREED_ENGINE, PATH_SIDE);
    let attacker = scaffolding::spawn_attacker(&mut world, SpawnTier::Standard, 0.0);
    world.launch(Launch {
        origin: position_of(&world, 0),
        target: attacker,
        damage: 1.0e6,
        element: Element::None,
        speed: PROJECTILE_SPEED,
        crit: false,
        skill: Some(Skill::Greed),
        source: defender,
        source_level: 1,
    });

    let sold = run(&mut world, Command::SellDefender { defender });
    assert!(rejection(&sold).is_none());
    let events = ticks(&mut world, 1);
    assert!(events.contains(&Event::AttackerKilled {
        attacker,
        reward: 15,
        killer: Some(defender),
    }));
}

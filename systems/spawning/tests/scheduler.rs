use elemental_defence_core::{CommandError, SpawnTier};
use elemental_defence_system_content::WaveTable;
use elemental_defence_system_spawning::{Phase, SchedulerAction, WaveScheduler};

fn run_until_drained(scheduler: &mut WaveScheduler) -> Vec<SchedulerAction> {
    let mut actions = Vec::new();
    let mut guard = 0;
    while scheduler.phase() == Phase::Spawning {
        scheduler.advance(1.0, 1, &mut actions);
        guard += 1;
        assert!(guard < 10_000, "spawn countdown never finished");
    }
    actions
}

fn tiers(actions: &[SchedulerAction]) -> Vec<SpawnTier> {
    actions
        .iter()
        .filter_map(|action| match action {
            SchedulerAction::Spawn { tier, .. } => Some(*tier),
            _ => None,
        })
        .collect()
}

#[test]
fn boss_wave_spawns_bosses_last() {
    let table = WaveTable::generate();
    let config = table.get(5).expect("wave 5");
    let mut scheduler = WaveScheduler::default();
    for _ in 1..5 {
        let _ = scheduler.begin(table.get(scheduler.wave()).expect("wave")).expect("idle");
        let _ = run_until_drained(&mut scheduler);
        let mut out = Vec::new();
        scheduler.advance(1.0, 0, &mut out);
    }
    assert_eq!(scheduler.wave(), 5);

    assert_eq!(scheduler.begin(config), Ok(5));
    let spawned = tiers(&run_until_drained(&mut scheduler));
    assert_eq!(spawned.len(), 13);
    assert!(spawned[..10].iter().all(|tier| *tier == SpawnTier::Minion));
    assert!(spawned[10..].iter().all(|tier| *tier == SpawnTier::Boss));
}

#[test]
fn first_spawn_is_immediate_and_then_paced_by_interval() {
    let table = WaveTable::generate();
    let config = table.get(1).expect("wave 1");
    let mut scheduler = WaveScheduler::default();
    let _ = scheduler.begin(config).expect("idle");

    let mut actions = Vec::new();
    scheduler.advance(1.0, 0, &mut actions);
    assert_eq!(
        actions,
        vec![SchedulerAction::Spawn {
            wave: 1,
            tier: SpawnTier::Standard
        }]
    );

    actions.clear();
    for _ in 0..59 {
        scheduler.advance(1.0, 1, &mut actions);
    }
    assert!(actions.is_empty());
    scheduler.advance(1.0, 1, &mut actions);
    assert_eq!(actions.len(), 1);
    assert_eq!(scheduler.remaining(), 8);
}

#[test]
fn drained_wave_completes_exactly_once() {
    let table = WaveTable::generate();
    let mut scheduler = WaveScheduler::default();
    let _ = scheduler.begin(table.get(1).expect("wave 1")).expect("idle");
    let _ = run_until_drained(&mut scheduler);
    assert_eq!(scheduler.phase(), Phase::Draining);

    let mut actions = Vec::new();
    scheduler.advance(1.0, 2, &mut actions);
    assert!(actions.is_empty(), "live attackers hold the wave open");

    for _ in 0..5 {
        scheduler.advance(1.0, 0, &mut actions);
    }
    let completions: Vec<_> = actions
        .iter()
        .filter(|action| matches!(action, SchedulerAction::Completed { .. }))
        .collect();
    assert_eq!(
        completions,
        vec![&SchedulerAction::Completed {
            wave: 1,
            bonus: 150,
            victory: false
        }]
    );
    assert_eq!(scheduler.wave(), 2);
    assert_eq!(scheduler.phase(), Phase::Idle);
    assert!(scheduler.auto_start().is_some());
}

#[test]
fn starting_during_a_wave_is_rejected() {
    let table = WaveTable::generate();
    let mut scheduler = WaveScheduler::default();
    let config = table.get(1).expect("wave 1");
    let _ = scheduler.begin(config).expect("idle");
    assert_eq!(scheduler.begin(config), Err(CommandError::WaveInProgress));
    let _ = run_until_drained(&mut scheduler);
    assert_eq!(scheduler.begin(config), Err(CommandError::WaveInProgress));
}

#[test]
fn auto_start_fires_after_ten_seconds() {
    let mut scheduler = WaveScheduler::default();
    scheduler.arm_auto_start();
    let mut actions = Vec::new();
    let mut ticks = 0;
    while actions.is_empty() {
        scheduler.advance(1.0, 0, &mut actions);
        ticks += 1;
        assert!(ticks < 2_000);
    }
    assert!((895..=905).contains(&ticks), "fired after {ticks} ticks");
    assert_eq!(actions, vec![SchedulerAction::AutoStart]);
    assert_eq!(scheduler.auto_start(), None);
}

#[test]
fn double_speed_halves_the_auto_start_countdown() {
    let mut scheduler = WaveScheduler::default();
    scheduler.arm_auto_start();
    let mut actions = Vec::new();
    let mut ticks = 0;
    while actions.is_empty() {
        scheduler.advance(2.0, 0, &mut actions);
        ticks += 1;
    }
    assert!((445..=455).contains(&ticks), "fired after {ticks} ticks");
}

#[test]
fn clearing_the_final_wave_declares_victory() {
    let table = WaveTable::generate();
    let mut scheduler = WaveScheduler::new(2);
    for expected in 1..=2 {
        assert_eq!(
            scheduler.begin(table.get(expected).expect("wave")),
            Ok(expected)
        );
        let _ = run_until_drained(&mut scheduler);
        let mut actions = Vec::new();
        scheduler.advance(1.0, 0, &mut actions);
        assert_eq!(actions.len(), 1);
        if expected == 2 {
            assert_eq!(
                actions[0],
                SchedulerAction::Completed {
                    wave: 2,
                    bonus: 175,
                    victory: true
                }
            );
        }
    }
    assert_eq!(scheduler.phase(), Phase::Victory);
    assert_eq!(scheduler.wave(), 2);
    assert_eq!(scheduler.auto_start(), None);
    assert_eq!(
        scheduler.begin(table.get(2).expect("wave")),
        Err(CommandError::ContentExhausted)
    );
}

//! Helpers that stage scenarios by reaching past the command surface.
//!
//! Only compiled for tests or with the `scenario_scaffolding` feature.

use elemental_defence_core::{
    ArchetypeId, AttackerId, CellCoord, DefenderId, Element, Event, PickupId, PickupKind,
    SpawnTier, Vec2, TILE_SIZE,
};
use elemental_defence_system_combat::POISON_DAMAGE;
use elemental_defence_system_movement::Travel;
use elemental_defence_system_random_events::AcidRain;

use crate::attackers::Attacker;
use crate::defenders::Defender;
use crate::pickups::Pickup;
use crate::World;

/// Spawns an attacker of the wave in play `distance` world units down the path.
///
/// Crossing a waypoint snaps onto it, so the final position may trail the
/// requested distance slightly.
pub fn spawn_attacker(world: &mut World, tier: SpawnTier, distance: f32) -> AttackerId {
    let id = world.allocate_attacker_id();
    let wave = world.scheduler.wave();
    let config = world
        .content
        .waves
        .get(wave)
        .expect("scheduler always points at a generated wave");
    let mut attacker = Attacker::spawn(id, config, tier, &world.content.path);

    let mut remaining = distance;
    while remaining > 0.0 {
        let step = remaining.min(TILE_SIZE);
        if attacker.progress.advance(&world.content.path, step) == Travel::ReachedEnd {
            break;
        }
        remaining -= step;
    }

    world.attackers.push(attacker);
    id
}

/// Deals element-less damage to an attacker through the regular intake.
pub fn strike_attacker(world: &mut World, id: AttackerId, amount: f64, out_events: &mut Vec<Event>) {
    if let Some(index) = attacker_index(world, id) {
        world.strike_attacker(index, amount, Element::None, None, out_events);
    }
}

/// Makes an attacker invincible for `ticks`.
pub fn grant_invincibility(world: &mut World, id: AttackerId, ticks: f32) {
    if let Some(index) = attacker_index(world, id) {
        world.attackers[index].status.invincible = ticks;
    }
}

/// Applies poison to an attacker as a poison shot would.
pub fn poison_attacker(world: &mut World, id: AttackerId) {
    if let Some(index) = attacker_index(world, id) {
        let status = &mut world.attackers[index].status;
        status.poison = POISON_DAMAGE;
        status.poison_clock = 0.0;
    }
}

/// Places a defender without charging gold or checking placement rules.
pub fn place_defender(world: &mut World, archetype: ArchetypeId, cell: CellCoord) -> DefenderId {
    let entry = world
        .content
        .catalog
        .get(archetype)
        .expect("scenarios place catalog archetypes");
    let (cost, max_hp) = (entry.cost, entry.max_hp());
    let id = world.allocate_defender_id();
    world
        .defenders
        .push(Defender::new(id, archetype, cell, cost, max_hp));
    id
}

/// Overrides a defender's current hit points.
pub fn set_defender_hp(world: &mut World, id: DefenderId, hp: f64) {
    if let Some(index) = world.live_defender_index(id) {
        world.defenders[index].hp = hp;
    }
}

/// Drops a fresh pickup at an arbitrary position.
pub fn drop_pickup(world: &mut World, kind: PickupKind, position: Vec2) -> PickupId {
    let id = world.allocate_pickup_id();
    world.pickups.push(Pickup::fresh(id, kind, position));
    id
}

/// Starts an acid rain storm lasting `ticks`.
pub fn start_acid_rain(world: &mut World, ticks: f32) {
    world.weather = AcidRain::new(ticks);
}

fn attacker_index(world: &World, id: AttackerId) -> Option<usize> {
    world
        .attackers
        .iter()
        .position(|attacker| attacker.id == id && !attacker.dead)
}

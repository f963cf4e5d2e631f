//! Helpers for placing entities directly into a world under test.

use bloon_defence_core::{
    Abilities, Angle, BloonKind, Command, DamageType, Difficulty, Event, FixedPosition, Modifiers,
    Position, SimulationConfig,
};
use bloon_defence_system_movement::ProjectileMotion;
use bloon_defence_system_tower_combat::Payload;

use crate::{
    apply,
    bloons::{Bloon, BloonSeed, Projectile},
    list::NodeHandle,
    World,
};

/// Sandbox world on Medium with the provided limits.
pub(crate) fn sandbox_with(config: SimulationConfig) -> World {
    let mut world = World::with_config(config).expect("valid config");
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::NewGame {
            difficulty: Difficulty::Medium,
            sandbox: true,
        },
        &mut events,
    );
    world
}

/// Inserts a plain bloon of `kind` at `position`, off the path if need be.
pub(crate) fn put_bloon(world: &mut World, kind: BloonKind, position: Position) -> NodeHandle {
    let mut seed = BloonSeed::at_entrance(
        &world.path,
        kind,
        Modifiers::empty(),
        world.movement.regrow_interval(),
    );
    seed.motion.position = position;
    let stats = world.catalog.bloon(kind).expect("known kind");
    let bloon = Bloon::from_seed(seed, stats);
    world.bloons.insert(position, bloon).expect("bloon slot")
}

/// Inserts a projectile heading east at `position`.
pub(crate) fn put_projectile(world: &mut World, position: Position, payload: Payload) -> NodeHandle {
    let projectile = Projectile {
        motion: ProjectileMotion {
            position: FixedPosition::from_position(position),
            angle: Angle::EAST,
            speed: 4,
            lifetime: world.config.projectile_lifetime,
        },
        payload,
        size: world.config.projectile_size,
        last_hit: None,
    };
    world
        .projectiles
        .insert(position, projectile)
        .expect("projectile slot")
}

/// Single-hit payload without effects.
pub(crate) fn payload(damage: u16, damage_type: DamageType) -> Payload {
    Payload {
        tower: None,
        damage,
        damage_type,
        pierce: 1,
        splash: 0,
        stun: 0,
        slow: 0,
        dot_damage: 0,
        dot_interval: 0,
        moab_multiplier: 1,
        abilities: Abilities::empty(),
        camo_vision: false,
    }
}

/// Health of a live bloon, or `None` once it is gone.
pub(crate) fn health(world: &World, handle: NodeHandle) -> Option<i32> {
    world.bloons.get(handle).map(|bloon| bloon.health)
}

/// Applies `commands` in order and returns every emitted event.
pub(crate) fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use bloon_defence_core::{
    BloonKind, Command, Difficulty, Event, Modifiers, Position, TargetPolicy, TowerKind,
    UpgradePath,
};
use bloon_defence_world::{
    self as world,
    query::{self, BloonSnapshot, ProjectileSnapshot, TowerSnapshot},
    World,
};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.pops > 0, "scripted towers never popped anything");
}

#[test]
fn fast_forward_matches_doubled_ticks() {
    let doubled = replay(
        opening()
            .into_iter()
            .chain(std::iter::repeat(Command::Tick).take(800))
            .collect(),
    );
    let fast = replay(
        opening()
            .into_iter()
            .chain([Command::SetFastForward { enabled: true }])
            .chain(std::iter::repeat(Command::Tick).take(400))
            .collect(),
    );

    assert_eq!(doubled.bloons, fast.bloons);
    assert_eq!(doubled.projectiles, fast.projectiles);
    assert_eq!(doubled.towers, fast.towers);
}

fn opening() -> Vec<Command> {
    vec![
        Command::NewGame {
            difficulty: Difficulty::Easy,
            sandbox: true,
        },
        Command::PlaceTower {
            kind: TowerKind::Dart,
            position: Position::new(32, 140),
        },
        Command::PlaceTower {
            kind: TowerKind::Tack,
            position: Position::new(100, 100),
        },
        Command::PlaceTower {
            kind: TowerKind::Bomb,
            position: Position::new(100, 140),
        },
        Command::PlaceTower {
            kind: TowerKind::Ice,
            position: Position::new(180, 190),
        },
        Command::PlaceTower {
            kind: TowerKind::Sniper,
            position: Position::new(250, 180),
        },
        Command::StartRound,
    ]
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = opening();
    for step in 0..2_000_u32 {
        if step == 300 {
            commands.push(Command::SpawnBloon {
                kind: BloonKind::CERAMIC,
                modifiers: Modifiers::REGROW,
            });
        }
        if step == 500 {
            commands.push(Command::SpawnBloon {
                kind: BloonKind::ZEBRA,
                modifiers: Modifiers::CAMO,
            });
        }
        commands.push(Command::Tick);
    }
    commands.push(Command::SetTargetPolicy {
        tower: first_tower(),
        policy: TargetPolicy::Strong,
    });
    commands.push(Command::UpgradeTower {
        tower: first_tower(),
        path: UpgradePath::First,
    });
    commands.extend(std::iter::repeat(Command::Tick).take(500));
    commands
}

fn first_tower() -> bloon_defence_core::TowerId {
    bloon_defence_core::TowerId::new(0, 0)
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let mut log = Vec::new();
    let mut pops = 0;

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        pops += events
            .iter()
            .filter(|event| matches!(event, Event::BloonPopped { .. }))
            .count();
        log.extend(events);
    }

    ReplayOutcome {
        bloons: query::bloon_view(&world).into_vec(),
        projectiles: query::projectile_view(&world).into_vec(),
        towers: query::tower_view(&world).into_vec(),
        events: log,
        pops,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    bloons: Vec<BloonSnapshot>,
    projectiles: Vec<ProjectileSnapshot>,
    towers: Vec<TowerSnapshot>,
    events: Vec<Event>,
    pops: usize,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.bloons.hash(&mut hasher);
        self.projectiles.hash(&mut hasher);
        self.towers.hash(&mut hasher);
        format!("{:?}", self.events).hash(&mut hasher);
        hasher.finish()
    }
}

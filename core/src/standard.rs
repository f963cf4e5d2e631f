//! Standard game data: the twelve bloon kinds, eight towers with their upgrade
//! paths, and the eighty scripted rounds.

use crate::{
    catalog::{
        BloonKind, BloonStats, ChildSpawn, FireMode, SpawnGroup, TowerBaseStats, TowerBlueprint,
        TowerKind, UpgradeDelta, UPGRADE_LEVELS,
    },
    flags::{Abilities, DamageType, Immunity, Modifiers},
};

const NO_CHILDREN: &[(BloonKind, u8)] = &[];

#[allow(clippy::type_complexity)]
const BLOON_TABLE: [(&str, u16, u16, &[(BloonKind, u8)], Immunity, u32, u8); 12] = [
    ("Red", 1, 256, NO_CHILDREN, Immunity::empty(), 1, 10),
    ("Blue", 1, 358, &[(BloonKind::RED, 1)], Immunity::empty(), 2, 10),
    ("Green", 1, 461, &[(BloonKind::BLUE, 1)], Immunity::empty(), 3, 10),
    ("Yellow", 1, 819, &[(BloonKind::GREEN, 1)], Immunity::empty(), 4, 10),
    ("Pink", 1, 896, &[(BloonKind::YELLOW, 1)], Immunity::empty(), 5, 10),
    ("Black", 1, 461, &[(BloonKind::PINK, 2)], Immunity::EXPLOSION, 11, 8),
    ("White", 1, 512, &[(BloonKind::PINK, 2)], Immunity::FREEZE, 11, 8),
    ("Lead", 1, 256, &[(BloonKind::BLACK, 2)], Immunity::SHARP, 23, 10),
    (
        "Zebra",
        1,
        461,
        &[(BloonKind::BLACK, 1), (BloonKind::WHITE, 1)],
        Immunity::EXPLOSION.union(Immunity::FREEZE),
        23,
        10,
    ),
    ("Rainbow", 1, 563, &[(BloonKind::ZEBRA, 2)], Immunity::empty(), 47, 10),
    ("Ceramic", 10, 640, &[(BloonKind::RAINBOW, 2)], Immunity::empty(), 104, 12),
    ("MOAB", 200, 256, &[(BloonKind::CERAMIC, 4)], Immunity::empty(), 616, 24),
];

pub(crate) fn bloons() -> Vec<BloonStats> {
    BLOON_TABLE
        .iter()
        .enumerate()
        .map(
            |(ordinal, &(name, health, speed, children, immunity, rbe, size))| BloonStats {
                name,
                health,
                speed,
                immunity,
                rbe,
                children: children
                    .iter()
                    .map(|&(kind, count)| ChildSpawn { kind, count })
                    .collect(),
                moab_class: ordinal >= BloonKind::MOAB.index(),
                size,
            },
        )
        .collect()
}

const fn base(
    name: &'static str,
    cost: u32,
    attack_frames: u16,
    range: u16,
    damage: u16,
    pierce: u16,
    damage_type: DamageType,
    projectile_count: u8,
    projectile_speed: u8,
    mode: FireMode,
) -> TowerBaseStats {
    TowerBaseStats {
        name,
        cost,
        attack_frames,
        range,
        damage,
        pierce,
        damage_type,
        camo_vision: false,
        projectile_count,
        projectile_speed,
        mode,
        slow: 0,
    }
}

const fn named(name: &'static str, cost: u32) -> UpgradeDelta {
    UpgradeDelta {
        name,
        cost,
        ..UpgradeDelta::NONE
    }
}

type Paths = [[UpgradeDelta; UPGRADE_LEVELS]; 2];

const DART: Paths = [
    [
        UpgradeDelta { range: 12, ..named("Long Range", 90) },
        UpgradeDelta { range: 8, grants_camo: true, ..named("Enhanced Sight", 120) },
        UpgradeDelta {
            damage: 1,
            pierce: 4,
            damage_type: Some(DamageType::NORMAL),
            splash: 8,
            ..named("Spike-o-pult", 500)
        },
        UpgradeDelta { damage: 3, pierce: 8, ..named("Juggernaut", 1800) },
    ],
    [
        UpgradeDelta { pierce: 1, ..named("Sharp Shots", 140) },
        UpgradeDelta { pierce: 2, ..named("Razor Sharp", 200) },
        UpgradeDelta { projectile_count: 2, ..named("Triple Shot", 400) },
        UpgradeDelta { attack_percent: -50, ..named("Fan Club", 8000) },
    ],
];

const TACK: Paths = [
    [
        UpgradeDelta { attack_percent: -15, ..named("Faster Shooting", 210) },
        UpgradeDelta { attack_percent: -15, ..named("Even Faster", 300) },
        UpgradeDelta {
            damage: 1,
            damage_type: Some(DamageType::NORMAL),
            ..named("Hot Shots", 550)
        },
        UpgradeDelta { damage: 2, range: 4, ..named("Ring of Fire", 2500) },
    ],
    [
        UpgradeDelta { range: 6, ..named("Extra Range", 100) },
        UpgradeDelta { projectile_count: 4, ..named("Extra Spread", 250) },
        UpgradeDelta { damage: 1, pierce: 1, ..named("Blade Shooter", 500) },
        UpgradeDelta {
            damage: 1,
            pierce: 2,
            attack_percent: -25,
            ..named("Blade Maelstrom", 2800)
        },
    ],
];

const SNIPER: Paths = [
    [
        UpgradeDelta {
            damage: 2,
            damage_type: Some(DamageType::NORMAL),
            ..named("Full Metal Jacket", 350)
        },
        UpgradeDelta { damage: 3, ..named("Point Five Oh", 500) },
        UpgradeDelta { damage: 10, ..named("Deadly Precision", 3000) },
        UpgradeDelta { damage: 30, moab_multiplier: 5, ..named("Cripple MOAB", 12000) },
    ],
    [
        UpgradeDelta { attack_percent: -30, ..named("Faster Firing", 300) },
        UpgradeDelta { grants_camo: true, ..named("Night Vision", 350) },
        UpgradeDelta { attack_percent: -30, ..named("Semi-Automatic", 3500) },
        UpgradeDelta { attack_percent: -40, ..named("Full Auto", 8000) },
    ],
];

const BOMB: Paths = [
    [
        UpgradeDelta { pierce: 8, range: 4, splash: 12, ..named("Bigger Bombs", 400) },
        UpgradeDelta {
            pierce: 6,
            range: 8,
            attack_percent: -20,
            ..named("Missile Launcher", 500)
        },
        UpgradeDelta { damage: 8, moab_multiplier: 5, ..named("MOAB Mauler", 800) },
        UpgradeDelta {
            damage: 20,
            attack_percent: -15,
            moab_multiplier: 10,
            ..named("MOAB Assassin", 3200)
        },
    ],
    [
        UpgradeDelta {
            damage: 1,
            pierce: 2,
            damage_type: Some(DamageType::NORMAL),
            ..named("Frag Bombs", 300)
        },
        UpgradeDelta { pierce: 4, splash: 6, ..named("Cluster Bombs", 600) },
        UpgradeDelta { damage: 1, stun: 15, ..named("Bloon Impact", 2500) },
        UpgradeDelta { damage: 15, moab_multiplier: 8, ..named("MOAB Eliminator", 10000) },
    ],
];

const BOOMERANG: Paths = [
    [
        UpgradeDelta { pierce: 3, ..named("Multi-Target", 200) },
        UpgradeDelta { pierce: 2, range: 6, ..named("Glaive Thrower", 350) },
        UpgradeDelta {
            damage: 1,
            pierce: 6,
            attack_percent: -15,
            ..named("Glaive Ricochet", 1600)
        },
        UpgradeDelta {
            damage: 3,
            pierce: 8,
            attack_percent: -20,
            ..named("Glaive Lord", 5000)
        },
    ],
    [
        UpgradeDelta { damage_type: Some(DamageType::NORMAL), ..named("Sonic Boom", 250) },
        UpgradeDelta { damage: 1, ..named("Red Hot Rangs", 300) },
        UpgradeDelta { attack_percent: -35, ..named("Bionic Boomer", 1600) },
        UpgradeDelta {
            damage: 2,
            pierce: 2,
            attack_percent: -30,
            ..named("Turbo Charge", 3200)
        },
    ],
];

const NINJA: Paths = [
    [
        UpgradeDelta { range: 8, attack_percent: -10, ..named("Ninja Discipline", 300) },
        UpgradeDelta { pierce: 2, ..named("Sharp Shurikens", 350) },
        UpgradeDelta { projectile_count: 1, ..named("Double Shot", 750) },
        UpgradeDelta {
            damage: 1,
            pierce: 2,
            projectile_count: 2,
            ..named("Bloonjitsu", 2750)
        },
    ],
    [
        UpgradeDelta { abilities: Abilities::HOMING, ..named("Seeking Shuriken", 250) },
        UpgradeDelta { abilities: Abilities::DISTRACTION, ..named("Distraction", 350) },
        UpgradeDelta { abilities: Abilities::CAMO_STRIP, ..named("Counter-Espionage", 700) },
        named("Sabotage", 5000),
    ],
];

const ICE: Paths = [
    [
        UpgradeDelta { attack_percent: -15, ..named("Enhanced Freeze", 200) },
        UpgradeDelta { damage: 1, ..named("Snap Freeze", 350) },
        UpgradeDelta {
            pierce: 20,
            range: 10,
            abilities: Abilities::AURA,
            ..named("Arctic Wind", 1800)
        },
        named("Viral Frost", 2500),
    ],
    [
        UpgradeDelta { abilities: Abilities::PERMAFROST, ..named("Permafrost", 100) },
        UpgradeDelta { range: 8, ..named("Cold Snap", 225) },
        named("Ice Shards", 1500),
        UpgradeDelta { pierce: 40, attack_percent: -20, ..named("Absolute Zero", 3500) },
    ],
];

const GLUE: Paths = [
    [
        UpgradeDelta { abilities: Abilities::GLUE_SOAK, ..named("Glue Soak", 200) },
        UpgradeDelta { dot_damage: 1, dot_interval: 30, ..named("Corrosive Glue", 300) },
        UpgradeDelta { dot_damage: 1, dot_interval: -15, ..named("Bloon Dissolver", 2500) },
        UpgradeDelta { dot_damage: 2, dot_interval: -10, ..named("Bloon Liquefier", 5000) },
    ],
    [
        UpgradeDelta { slow: 45, ..named("Stickier Glue", 120) },
        UpgradeDelta { pierce: 2, ..named("Glue Splatter", 400) },
        UpgradeDelta { attack_percent: -50, ..named("Glue Hose", 3000) },
        UpgradeDelta {
            pierce: 3,
            range: 6,
            attack_percent: -20,
            ..named("Glue Striker", 4500)
        },
    ],
];

pub(crate) fn towers() -> [TowerBlueprint; TowerKind::COUNT] {
    use DamageType as D;
    use FireMode::{Area, Directional, Hitscan, Radial};

    [
        TowerBlueprint {
            base: base("Dart Monkey", 200, 21, 40, 1, 2, D::SHARP, 1, 5, Directional),
            upgrades: DART,
        },
        TowerBlueprint {
            base: base("Tack Shooter", 280, 20, 28, 1, 1, D::SHARP, 8, 4, Radial),
            upgrades: TACK,
        },
        TowerBlueprint {
            base: base("Sniper Monkey", 350, 48, 255, 2, 1, D::SHARP, 1, 0, Hitscan),
            upgrades: SNIPER,
        },
        TowerBlueprint {
            base: base("Bomb Tower", 525, 24, 40, 1, 18, D::EXPLOSION, 1, 3, Directional),
            upgrades: BOMB,
        },
        TowerBlueprint {
            base: base("Boomerang", 325, 21, 40, 1, 4, D::SHARP, 1, 4, Directional),
            upgrades: BOOMERANG,
        },
        TowerBlueprint {
            base: TowerBaseStats {
                camo_vision: true,
                ..base("Ninja Monkey", 500, 17, 40, 1, 2, D::SHARP, 1, 6, Directional)
            },
            upgrades: NINJA,
        },
        TowerBlueprint {
            base: base("Ice Tower", 500, 39, 30, 0, 40, D::FREEZE, 0, 0, Area),
            upgrades: ICE,
        },
        TowerBlueprint {
            base: TowerBaseStats {
                slow: 60,
                ..base("Glue Gunner", 275, 24, 38, 0, 1, D::NORMAL, 1, 4, Directional)
            },
            upgrades: GLUE,
        },
    ]
}

const RED: BloonKind = BloonKind::RED;
const BLUE: BloonKind = BloonKind::BLUE;
const GREEN: BloonKind = BloonKind::GREEN;
const YELLOW: BloonKind = BloonKind::YELLOW;
const PINK: BloonKind = BloonKind::PINK;
const BLACK: BloonKind = BloonKind::BLACK;
const WHITE: BloonKind = BloonKind::WHITE;
const LEAD: BloonKind = BloonKind::LEAD;
const ZEBRA: BloonKind = BloonKind::ZEBRA;
const RAINBOW: BloonKind = BloonKind::RAINBOW;
const CERAMIC: BloonKind = BloonKind::CERAMIC;
const MOAB: BloonKind = BloonKind::MOAB;

const PLAIN: Modifiers = Modifiers::empty();
const CAMO: Modifiers = Modifiers::CAMO;
const REGROW: Modifiers = Modifiers::REGROW;
const CAMO_REGROW: Modifiers = Modifiers::CAMO.union(Modifiers::REGROW);

/// (kind, modifiers, count, spacing) per group, one row per round.
const ROUNDS: [&[(BloonKind, Modifiers, u16, u8)]; 80] = [
        // Round 1
        &[(RED, PLAIN, 20, 25)],
        // Round 2
        &[(RED, PLAIN, 30, 20)],
        // Round 3
        &[(RED, PLAIN, 25, 15), (BLUE, PLAIN, 5, 25)],
        // Round 4
        &[(RED, PLAIN, 30, 15), (BLUE, PLAIN, 15, 20)],
        // Round 5
        &[(RED, PLAIN, 5, 15), (BLUE, PLAIN, 27, 15)],
        // Round 6
        &[(RED, PLAIN, 15, 10), (BLUE, PLAIN, 15, 15), (GREEN, PLAIN, 4, 25)],
        // Round 7
        &[(RED, PLAIN, 20, 10), (BLUE, PLAIN, 20, 12), (GREEN, PLAIN, 5, 20)],
        // Round 8
        &[(RED, PLAIN, 10, 10), (BLUE, PLAIN, 20, 12), (GREEN, PLAIN, 14, 15)],
        // Round 9
        &[(GREEN, PLAIN, 30, 10)],
        // Round 10
        &[(BLUE, PLAIN, 20, 8), (GREEN, PLAIN, 10, 12), (YELLOW, PLAIN, 2, 30)],
        // Round 11
        &[(BLUE, PLAIN, 10, 10), (GREEN, PLAIN, 12, 12), (YELLOW, PLAIN, 8, 18)],
        // Round 12
        &[(BLUE, PLAIN, 15, 8), (GREEN, PLAIN, 15, 10), (YELLOW, PLAIN, 5, 15), (PINK, PLAIN, 2, 20)],
        // Round 13
        &[(BLUE, PLAIN, 30, 5), (GREEN, PLAIN, 10, 10), (YELLOW, PLAIN, 8, 12), (PINK, PLAIN, 5, 18)],
        // Round 14
        &[(RED, PLAIN, 30, 5), (BLUE, PLAIN, 20, 5), (GREEN, PLAIN, 15, 8), (YELLOW, PLAIN, 10, 10), (PINK, PLAIN, 5, 12)],
        // Round 15
        &[(RED, PLAIN, 20, 5), (BLUE, PLAIN, 15, 5), (GREEN, PLAIN, 12, 8), (YELLOW, PLAIN, 10, 10), (PINK, PLAIN, 10, 12)],
        // Round 16
        &[(GREEN, PLAIN, 20, 5), (YELLOW, PLAIN, 15, 8), (PINK, PLAIN, 12, 10)],
        // Round 17
        &[(YELLOW, PLAIN, 25, 6), (PINK, PLAIN, 8, 10)],
        // Round 18
        &[(GREEN, PLAIN, 30, 5), (YELLOW, PLAIN, 10, 8), (PINK, PLAIN, 8, 10)],
        // Round 19
        &[(GREEN, PLAIN, 20, 5), (YELLOW, PLAIN, 15, 6), (PINK, PLAIN, 12, 8)],
        // Round 20
        &[(BLACK, PLAIN, 6, 15)],
        // Round 21
        &[(YELLOW, PLAIN, 20, 5), (PINK, PLAIN, 15, 8), (BLACK, PLAIN, 8, 12)],
        // Round 22
        &[(WHITE, PLAIN, 8, 12), (BLACK, PLAIN, 8, 12)],
        // Round 23
        &[(YELLOW, PLAIN, 15, 5), (WHITE, PLAIN, 10, 10), (BLACK, PLAIN, 10, 10)],
        // Round 24
        &[(GREEN, CAMO, 20, 8), (PINK, PLAIN, 15, 8), (BLACK, PLAIN, 5, 15), (WHITE, PLAIN, 5, 15)],
        // Round 25
        &[(YELLOW, REGROW, 25, 5), (BLACK, PLAIN, 10, 10), (WHITE, PLAIN, 10, 10)],
        // Round 26
        &[(PINK, PLAIN, 30, 4), (BLACK, PLAIN, 10, 8), (WHITE, PLAIN, 6, 10), (ZEBRA, PLAIN, 4, 18)],
        // Round 27
        &[(YELLOW, PLAIN, 25, 4), (BLACK, PLAIN, 12, 8), (WHITE, PLAIN, 12, 8), (LEAD, PLAIN, 3, 30)],
        // Round 28
        &[(LEAD, PLAIN, 4, 25), (BLACK, PLAIN, 10, 10), (ZEBRA, PLAIN, 5, 15)],
        // Round 29
        &[(PINK, PLAIN, 18, 5), (BLACK, PLAIN, 8, 8), (WHITE, PLAIN, 8, 8), (ZEBRA, PLAIN, 4, 15), (RAINBOW, PLAIN, 2, 30)],
        // Round 30
        &[(LEAD, PLAIN, 5, 20), (ZEBRA, PLAIN, 6, 12), (RAINBOW, PLAIN, 3, 20)],
        // Round 31
        &[(PINK, CAMO, 12, 8), (BLACK, PLAIN, 8, 8), (WHITE, PLAIN, 8, 8), (ZEBRA, PLAIN, 5, 12), (RAINBOW, PLAIN, 3, 18)],
        // Round 32
        &[(YELLOW, REGROW, 15, 5), (ZEBRA, PLAIN, 6, 12), (RAINBOW, PLAIN, 4, 15)],
        // Round 33
        &[(BLACK, REGROW, 8, 8), (WHITE, REGROW, 8, 8), (RAINBOW, PLAIN, 5, 12)],
        // Round 34
        &[(ZEBRA, PLAIN, 10, 8), (RAINBOW, PLAIN, 6, 12), (LEAD, PLAIN, 3, 20)],
        // Round 35
        &[(BLACK, CAMO_REGROW, 6, 10), (PINK, PLAIN, 18, 5), (RAINBOW, PLAIN, 6, 10)],
        // Round 36
        &[(PINK, PLAIN, 25, 3), (BLACK, PLAIN, 10, 8), (RAINBOW, PLAIN, 6, 10), (LEAD, CAMO, 2, 30)],
        // Round 37
        &[(ZEBRA, REGROW, 8, 10), (RAINBOW, PLAIN, 6, 10), (CERAMIC, PLAIN, 2, 45)],
        // Round 38
        &[(RAINBOW, PLAIN, 8, 10), (CERAMIC, PLAIN, 3, 35), (WHITE, REGROW, 10, 8)],
        // Round 39
        &[(BLACK, REGROW, 15, 5), (RAINBOW, PLAIN, 8, 8), (CERAMIC, PLAIN, 3, 30)],
        // Round 40
        &[(MOAB, PLAIN, 1, 60), (CERAMIC, PLAIN, 3, 20), (RAINBOW, REGROW, 4, 12)],
        // Round 41
        &[(CERAMIC, REGROW, 4, 20), (RAINBOW, PLAIN, 10, 8), (ZEBRA, CAMO, 8, 8)],
        // Round 42
        &[(RAINBOW, REGROW, 8, 8), (CERAMIC, PLAIN, 4, 18), (BLACK, CAMO, 10, 8)],
        // Round 43
        &[(CERAMIC, PLAIN, 6, 15), (LEAD, PLAIN, 5, 15), (RAINBOW, CAMO, 5, 10)],
        // Round 44
        &[(CERAMIC, REGROW, 5, 15), (RAINBOW, PLAIN, 12, 6)],
        // Round 45
        &[(CERAMIC, CAMO, 4, 18), (CERAMIC, PLAIN, 6, 15), (PINK, CAMO_REGROW, 15, 5)],
        // Round 46
        &[(MOAB, PLAIN, 1, 60), (CERAMIC, PLAIN, 5, 15)],
        // Round 47
        &[(CERAMIC, REGROW, 8, 12), (RAINBOW, CAMO, 8, 10), (LEAD, CAMO, 5, 15)],
        // Round 48
        &[(CERAMIC, PLAIN, 8, 12), (MOAB, PLAIN, 1, 60), (RAINBOW, REGROW, 8, 8)],
        // Round 49
        &[(CERAMIC, REGROW, 10, 10), (LEAD, CAMO_REGROW, 4, 18), (RAINBOW, PLAIN, 12, 6)],
        // Round 50
        &[(MOAB, PLAIN, 2, 60), (CERAMIC, CAMO, 6, 12)],
        // Round 51
        &[(CERAMIC, PLAIN, 12, 8), (RAINBOW, REGROW, 10, 8), (LEAD, CAMO, 5, 15)],
        // Round 52
        &[(CERAMIC, CAMO, 6, 12), (MOAB, PLAIN, 1, 60), (RAINBOW, CAMO_REGROW, 6, 10)],
        // Round 53
        &[(CERAMIC, REGROW, 8, 10), (CERAMIC, CAMO, 6, 12), (LEAD, CAMO, 6, 12)],
        // Round 54
        &[(MOAB, PLAIN, 2, 50), (CERAMIC, PLAIN, 8, 10)],
        // Round 55
        &[(CERAMIC, CAMO_REGROW, 8, 10), (RAINBOW, PLAIN, 15, 5), (MOAB, PLAIN, 1, 60)],
        // Round 56
        &[(MOAB, PLAIN, 2, 45), (CERAMIC, REGROW, 8, 10), (LEAD, CAMO, 4, 18)],
        // Round 57
        &[(CERAMIC, CAMO, 10, 8), (RAINBOW, REGROW, 12, 6), (MOAB, PLAIN, 1, 60)],
        // Round 58
        &[(MOAB, PLAIN, 2, 40), (CERAMIC, CAMO_REGROW, 6, 12), (LEAD, CAMO, 5, 15)],
        // Round 59
        &[(CERAMIC, PLAIN, 12, 6), (CERAMIC, REGROW, 8, 8), (MOAB, PLAIN, 2, 40)],
        // Round 60
        &[(MOAB, PLAIN, 3, 35), (CERAMIC, CAMO_REGROW, 8, 10)],
        // Round 61
        &[(MOAB, PLAIN, 2, 40), (CERAMIC, CAMO, 12, 8), (RAINBOW, CAMO_REGROW, 8, 8)],
        // Round 62
        &[(MOAB, PLAIN, 2, 35), (CERAMIC, REGROW, 10, 8), (LEAD, CAMO_REGROW, 5, 15)],
        // Round 63
        &[(CERAMIC, CAMO_REGROW, 15, 6), (LEAD, CAMO, 8, 10), (MOAB, PLAIN, 2, 40)],
        // Round 64
        &[(MOAB, PLAIN, 3, 30), (CERAMIC, PLAIN, 12, 6), (RAINBOW, CAMO_REGROW, 8, 8)],
        // Round 65
        &[(MOAB, PLAIN, 3, 28), (CERAMIC, CAMO, 8, 8)],
        // Round 66
        &[(CERAMIC, REGROW, 15, 5), (MOAB, PLAIN, 2, 35), (LEAD, CAMO_REGROW, 6, 12)],
        // Round 67
        &[(MOAB, PLAIN, 3, 28), (CERAMIC, CAMO_REGROW, 10, 8)],
        // Round 68
        &[(MOAB, PLAIN, 3, 25), (CERAMIC, CAMO, 10, 8), (LEAD, CAMO, 6, 12)],
        // Round 69
        &[(CERAMIC, CAMO_REGROW, 15, 5), (MOAB, PLAIN, 3, 28)],
        // Round 70
        &[(MOAB, PLAIN, 3, 25), (CERAMIC, REGROW, 12, 6), (LEAD, CAMO_REGROW, 5, 15)],
        // Round 71
        &[(MOAB, PLAIN, 3, 22), (CERAMIC, CAMO, 12, 6), (RAINBOW, CAMO_REGROW, 10, 6)],
        // Round 72
        &[(MOAB, PLAIN, 3, 22), (CERAMIC, CAMO_REGROW, 12, 6)],
        // Round 73
        &[(MOAB, PLAIN, 4, 20), (LEAD, CAMO_REGROW, 8, 10), (CERAMIC, PLAIN, 12, 5)],
        // Round 74
        &[(MOAB, PLAIN, 4, 20), (CERAMIC, CAMO_REGROW, 12, 5), (RAINBOW, REGROW, 10, 6)],
        // Round 75
        &[(MOAB, PLAIN, 4, 18), (CERAMIC, CAMO, 10, 6)],
        // Round 76
        &[(MOAB, PLAIN, 4, 18), (CERAMIC, CAMO_REGROW, 12, 5), (LEAD, CAMO_REGROW, 6, 12)],
        // Round 77
        &[(MOAB, PLAIN, 5, 16), (CERAMIC, REGROW, 15, 5)],
        // Round 78
        &[(MOAB, PLAIN, 5, 16), (CERAMIC, CAMO_REGROW, 12, 5), (LEAD, CAMO, 8, 10)],
        // Round 79
        &[(MOAB, PLAIN, 5, 15), (CERAMIC, CAMO_REGROW, 15, 5)],
        // Round 80
        &[(MOAB, PLAIN, 6, 14), (CERAMIC, CAMO_REGROW, 12, 6), (LEAD, CAMO_REGROW, 6, 10)],
];

pub(crate) fn rounds() -> Vec<Vec<SpawnGroup>> {
    ROUNDS
        .iter()
        .map(|groups| {
            groups
                .iter()
                .map(|&(kind, modifiers, count, spacing)| SpawnGroup {
                    kind,
                    modifiers,
                    count,
                    spacing,
                })
                .collect()
        })
        .collect()
}

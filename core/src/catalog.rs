//! Immutable balance tables: bloon kinds, tower kinds, upgrades and round scripts.
//!
//! The world never mutates these tables. A [`Catalog`] is built once, either
//! from the standard game data via [`Catalog::standard`] or from custom tables
//! through [`Catalog::new`], and is then shared read-only with every phase.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    flags::{Abilities, DamageType, Immunity, Modifiers},
    standard,
};

/// Ordinal into the bloon table. Higher ordinals are stronger kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BloonKind(u8);

impl BloonKind {
    /// Red bloon.
    pub const RED: Self = Self(0);
    /// Blue bloon.
    pub const BLUE: Self = Self(1);
    /// Green bloon.
    pub const GREEN: Self = Self(2);
    /// Yellow bloon.
    pub const YELLOW: Self = Self(3);
    /// Pink bloon.
    pub const PINK: Self = Self(4);
    /// Black bloon.
    pub const BLACK: Self = Self(5);
    /// White bloon.
    pub const WHITE: Self = Self(6);
    /// Lead bloon.
    pub const LEAD: Self = Self(7);
    /// Zebra bloon.
    pub const ZEBRA: Self = Self(8);
    /// Rainbow bloon.
    pub const RAINBOW: Self = Self(9);
    /// Ceramic bloon.
    pub const CERAMIC: Self = Self(10);
    /// Massive Ornery Air Blimp.
    pub const MOAB: Self = Self(11);

    /// Creates a kind from its ordinal.
    #[must_use]
    pub const fn new(ordinal: u8) -> Self {
        Self(ordinal)
    }

    /// Numeric ordinal of the kind.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Ordinal as a table index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Next stronger kind, used by regrowth.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Children released when a bloon pops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChildSpawn {
    /// Kind of each child.
    pub kind: BloonKind,
    /// Number of children of that kind.
    pub count: u8,
}

/// Static properties of one bloon kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloonStats {
    /// Display name.
    pub name: &'static str,
    /// Hit points a fresh bloon of this kind starts with.
    pub health: u16,
    /// Pixels per tick scaled by 256.
    pub speed: u16,
    /// Damage types the kind ignores.
    pub immunity: Immunity,
    /// Red bloon equivalent: lives lost on leak and weight for strong targeting.
    pub rbe: u32,
    /// Up to two child groups released on pop.
    pub children: Vec<ChildSpawn>,
    /// Whether MOAB damage multipliers apply and area freezes skip it.
    pub moab_class: bool,
    /// Side length of the square hitbox in pixels.
    pub size: u8,
}

/// Towers available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Dart monkey.
    Dart,
    /// Tack shooter.
    Tack,
    /// Sniper monkey.
    Sniper,
    /// Bomb tower.
    Bomb,
    /// Boomerang thrower.
    Boomerang,
    /// Ninja monkey.
    Ninja,
    /// Ice tower.
    Ice,
    /// Glue gunner.
    Glue,
}

impl TowerKind {
    /// Number of tower kinds.
    pub const COUNT: usize = 8;

    /// Every tower kind in table order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Dart,
        Self::Tack,
        Self::Sniper,
        Self::Bomb,
        Self::Boomerang,
        Self::Ninja,
        Self::Ice,
        Self::Glue,
    ];

    /// Position of the kind in the tower table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolves a table position back into a kind.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// How a tower delivers its attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireMode {
    /// Projectiles aimed at the selected target, fanned when several are fired.
    Directional,
    /// Projectiles spread evenly around the full circle.
    Radial,
    /// Damage applied to the target instantly.
    Hitscan,
    /// Freezes every eligible bloon in range, no projectiles.
    Area,
}

/// Unupgraded statistics of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerBaseStats {
    /// Display name.
    pub name: &'static str,
    /// Purchase price before difficulty scaling.
    pub cost: u32,
    /// Ticks between attacks.
    pub attack_frames: u16,
    /// Targeting radius in pixels.
    pub range: u16,
    /// Damage per hit.
    pub damage: u16,
    /// Bloons a projectile may hit before it is spent.
    pub pierce: u16,
    /// Damage type of every attack.
    pub damage_type: DamageType,
    /// Whether camo bloons can be targeted.
    pub camo_vision: bool,
    /// Projectiles per volley.
    pub projectile_count: u8,
    /// Projectile pixels per tick.
    pub projectile_speed: u8,
    /// Attack delivery.
    pub mode: FireMode,
    /// Slow ticks applied on hit.
    pub slow: u8,
}

/// Change applied by one purchased upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeDelta {
    /// Display name.
    pub name: &'static str,
    /// Purchase price before difficulty scaling.
    pub cost: u32,
    /// Added damage.
    pub damage: i16,
    /// Added pierce.
    pub pierce: i16,
    /// Added range in pixels.
    pub range: i16,
    /// Percentage change to the attack interval, negative is faster.
    pub attack_percent: i16,
    /// Added projectiles per volley.
    pub projectile_count: i8,
    /// Grants camo vision.
    pub grants_camo: bool,
    /// Replaces the damage type.
    pub damage_type: Option<DamageType>,
    /// Added splash radius in pixels.
    pub splash: u8,
    /// Granted abilities.
    pub abilities: Abilities,
    /// Stun ticks applied on hit.
    pub stun: u8,
    /// Added damage-over-time per pulse.
    pub dot_damage: u8,
    /// Change to ticks between damage-over-time pulses.
    pub dot_interval: i8,
    /// Damage multiplier against MOAB-class bloons.
    pub moab_multiplier: u8,
    /// Added slow duration in ticks.
    pub slow: u8,
}

impl UpgradeDelta {
    /// An upgrade that changes nothing and costs nothing.
    pub const NONE: Self = Self {
        name: "",
        cost: 0,
        damage: 0,
        pierce: 0,
        range: 0,
        attack_percent: 0,
        projectile_count: 0,
        grants_camo: false,
        damage_type: None,
        splash: 0,
        abilities: Abilities::empty(),
        stun: 0,
        dot_damage: 0,
        dot_interval: 0,
        moab_multiplier: 0,
        slow: 0,
    };
}

/// Number of upgrade levels on each path.
pub const UPGRADE_LEVELS: usize = 4;

/// Base stats plus both upgrade paths of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerBlueprint {
    /// Unupgraded statistics.
    pub base: TowerBaseStats,
    /// Two upgrade paths of four levels each.
    pub upgrades: [[UpgradeDelta; UPGRADE_LEVELS]; 2],
}

/// Run of identical bloons released at a fixed spacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpawnGroup {
    /// Kind of every bloon in the group.
    pub kind: BloonKind,
    /// Modifiers applied to every bloon in the group.
    pub modifiers: Modifiers,
    /// Number of bloons.
    pub count: u16,
    /// Ticks between consecutive bloons.
    pub spacing: u8,
}

/// Problems detected while validating custom tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum CatalogError {
    /// The bloon table is empty.
    #[error("bloon table is empty")]
    NoBloons,
    /// A bloon table entry has zero health.
    #[error("bloon {kind:?} has zero health")]
    ZeroHealth {
        /// Offending kind.
        kind: BloonKind,
    },
    /// A child refers to an unknown or equal-or-stronger kind.
    #[error("bloon {parent:?} lists child {child:?} which is not a weaker known kind")]
    InvalidChild {
        /// Kind listing the child.
        parent: BloonKind,
        /// Child that failed validation.
        child: BloonKind,
    },
    /// A round group refers to an unknown bloon kind.
    #[error("round {round} spawns unknown bloon {kind:?}")]
    UnknownRoundBloon {
        /// Zero-based round index.
        round: usize,
        /// Unknown kind.
        kind: BloonKind,
    },
    /// A tower's attack interval is zero.
    #[error("tower {kind:?} has a zero attack interval")]
    ZeroAttackInterval {
        /// Offending tower kind.
        kind: TowerKind,
    },
}

/// Immutable game tables shared with every simulation phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    bloons: Vec<BloonStats>,
    towers: [TowerBlueprint; TowerKind::COUNT],
    rounds: Vec<Vec<SpawnGroup>>,
}

impl Catalog {
    /// Validates and wraps custom tables.
    ///
    /// Children must be strictly weaker than their parent so that every pop
    /// cascade terminates.
    pub fn new(
        bloons: Vec<BloonStats>,
        towers: [TowerBlueprint; TowerKind::COUNT],
        rounds: Vec<Vec<SpawnGroup>>,
    ) -> Result<Self, CatalogError> {
        if bloons.is_empty() {
            return Err(CatalogError::NoBloons);
        }

        for (ordinal, stats) in bloons.iter().enumerate() {
            let parent = BloonKind::new(u8::try_from(ordinal).unwrap_or(u8::MAX));
            if stats.health == 0 {
                return Err(CatalogError::ZeroHealth { kind: parent });
            }
            for child in &stats.children {
                if child.kind >= parent || child.kind.index() >= bloons.len() {
                    return Err(CatalogError::InvalidChild {
                        parent,
                        child: child.kind,
                    });
                }
            }
        }

        for (round, groups) in rounds.iter().enumerate() {
            if let Some(group) = groups
                .iter()
                .find(|group| group.kind.index() >= bloons.len())
            {
                return Err(CatalogError::UnknownRoundBloon {
                    round,
                    kind: group.kind,
                });
            }
        }

        if let Some(kind) = TowerKind::ALL
            .iter()
            .copied()
            .find(|kind| towers[kind.index()].base.attack_frames == 0)
        {
            return Err(CatalogError::ZeroAttackInterval { kind });
        }

        Ok(Self {
            bloons,
            towers,
            rounds,
        })
    }

    /// Twelve bloon kinds, eight towers with two four-level paths and eighty rounds.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bloons: standard::bloons(),
            towers: standard::towers(),
            rounds: standard::rounds(),
        }
    }

    /// Stats of a bloon kind, if it exists.
    #[must_use]
    pub fn bloon(&self, kind: BloonKind) -> Option<&BloonStats> {
        self.bloons.get(kind.index())
    }

    /// Number of bloon kinds.
    #[must_use]
    pub fn bloon_kinds(&self) -> usize {
        self.bloons.len()
    }

    /// Blueprint of a tower kind.
    #[must_use]
    pub fn tower(&self, kind: TowerKind) -> &TowerBlueprint {
        &self.towers[kind.index()]
    }

    /// Scripted groups of a zero-based round.
    #[must_use]
    pub fn round(&self, index: usize) -> Option<&[SpawnGroup]> {
        self.rounds.get(index).map(Vec::as_slice)
    }

    /// Number of scripted rounds.
    #[must_use]
    pub fn scripted_rounds(&self) -> usize {
        self.rounds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tables_pass_validation() {
        let standard = Catalog::standard();
        let rebuilt = Catalog::new(
            standard.bloons.clone(),
            standard.towers,
            standard.rounds.clone(),
        );
        assert_eq!(rebuilt, Ok(standard));
    }

    #[test]
    fn standard_tables_have_expected_shape() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.bloon_kinds(), 12);
        assert_eq!(catalog.scripted_rounds(), 80);
        let moab = catalog.bloon(BloonKind::MOAB).expect("moab");
        assert!(moab.moab_class);
        assert_eq!(moab.rbe, 616);
        let zebra = catalog.bloon(BloonKind::ZEBRA).expect("zebra");
        assert_eq!(zebra.children.len(), 2);
        assert!(zebra.immunity.blocks(DamageType::FREEZE));
    }

    #[test]
    fn rbe_matches_sum_of_children() {
        let catalog = Catalog::standard();
        for ordinal in 0..catalog.bloon_kinds() {
            let stats = catalog.bloon(BloonKind::new(ordinal as u8)).expect("kind");
            if stats.children.is_empty() {
                continue;
            }
            let children: u32 = stats
                .children
                .iter()
                .map(|child| {
                    u32::from(child.count) * catalog.bloon(child.kind).expect("child").rbe
                })
                .sum();
            assert_eq!(stats.rbe, children + u32::from(stats.health), "{}", stats.name);
        }
    }

    #[test]
    fn children_must_be_weaker_than_parent() {
        let mut bloons = standard::bloons();
        bloons[0].children.push(ChildSpawn {
            kind: BloonKind::BLUE,
            count: 1,
        });
        let result = Catalog::new(bloons, standard::towers(), Vec::new());
        assert_eq!(
            result,
            Err(CatalogError::InvalidChild {
                parent: BloonKind::RED,
                child: BloonKind::BLUE,
            })
        );
    }

    #[test]
    fn rounds_may_only_reference_known_kinds() {
        let rounds = vec![vec![SpawnGroup {
            kind: BloonKind::new(40),
            modifiers: Modifiers::empty(),
            count: 1,
            spacing: 1,
        }]];
        let result = Catalog::new(standard::bloons(), standard::towers(), rounds);
        assert_eq!(
            result,
            Err(CatalogError::UnknownRoundBloon {
                round: 0,
                kind: BloonKind::new(40),
            })
        );
    }

    #[test]
    fn tower_kinds_round_trip_through_index() {
        for kind in TowerKind::ALL {
            assert_eq!(TowerKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(TowerKind::from_index(TowerKind::COUNT), None);
    }
}

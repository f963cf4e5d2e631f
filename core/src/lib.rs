#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bloon Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and reports what happened through [`Event`] values.
//! Balance data lives in the immutable [`Catalog`], limits and durations in
//! [`SimulationConfig`], and persisted state in [`SavedGame`].

mod catalog;
mod config;
mod flags;
mod geometry;
mod path;
mod save;
mod standard;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    BloonKind, BloonStats, Catalog, CatalogError, ChildSpawn, FireMode, SpawnGroup,
    TowerBaseStats, TowerBlueprint, TowerKind, UpgradeDelta, UPGRADE_LEVELS,
};
pub use config::{ConfigError, SimulationConfig};
pub use flags::{Abilities, DamageType, Immunity, Modifiers};
pub use geometry::{distance, isqrt, Angle, FixedPosition, Position, FIXED_ONE};
pub use path::{Corridor, CorridorKind, Path, PathError, Segment, DEFAULT_PATH_WIDTH};
pub use save::{SavedGame, SavedTower, SAVE_VERSION};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current game and starts a fresh one.
    NewGame {
        /// Difficulty controlling starting lives, coins and prices.
        difficulty: Difficulty,
        /// Enables free purchases and unlimited lives.
        sandbox: bool,
    },
    /// Requests placement of a tower centred on the provided position.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Centre of the tower footprint.
        position: Position,
    },
    /// Requests that a tower be sold for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests the next level on one upgrade path of a tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
        /// Path the upgrade is purchased on.
        path: UpgradePath,
    },
    /// Changes how a tower picks its target.
    SetTargetPolicy {
        /// Identifier of the tower to reconfigure.
        tower: TowerId,
        /// Policy to apply.
        policy: TargetPolicy,
    },
    /// Starts the next round's spawn script.
    StartRound,
    /// Toggles running two simulation steps per tick.
    SetFastForward {
        /// Whether fast-forward is active.
        enabled: bool,
    },
    /// Spawns a bloon at the path entrance outside of any script.
    SpawnBloon {
        /// Kind of bloon to spawn.
        kind: BloonKind,
        /// Modifiers applied to the bloon.
        modifiers: Modifiers,
    },
    /// Advances the simulation by one frame.
    Tick,
    /// Replaces the current game with a persisted one.
    LoadGame {
        /// State to restore.
        save: SavedGame,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a fresh game began.
    NewGameStarted {
        /// Difficulty of the new game.
        difficulty: Difficulty,
        /// Whether sandbox rules apply.
        sandbox: bool,
    },
    /// Indicates that the simulation advanced by one step.
    TimeAdvanced {
        /// Total steps simulated since the game began.
        tick: u64,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Centre of the tower footprint.
        position: Position,
        /// Currency charged.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the placement request.
        position: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Currency returned to the player.
        refund: u32,
    },
    /// Confirms that a tower bought an upgrade.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Path the upgrade was purchased on.
        path: UpgradePath,
        /// Level reached on that path.
        level: u8,
        /// Currency charged.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    UpgradeRejected {
        /// Identifier named in the request.
        tower: TowerId,
        /// Path named in the request.
        path: UpgradePath,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower changed its targeting policy.
    TargetPolicyChanged {
        /// Identifier of the reconfigured tower.
        tower: TowerId,
        /// Policy now in effect.
        policy: TargetPolicy,
    },
    /// Reports that a sell or policy request named no live tower.
    TowerCommandRejected {
        /// Identifier named in the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: TowerError,
    },
    /// Confirms that a tower attacked.
    TowerFired {
        /// Identifier of the tower.
        tower: TowerId,
        /// Heading of the attack.
        angle: Angle,
    },
    /// Announces that a round's script started.
    RoundStarted {
        /// Zero-based round index.
        round: u32,
    },
    /// Reports that a round could not be started.
    RoundStartRejected {
        /// Specific reason the round did not start.
        reason: RoundError,
    },
    /// Announces that every bloon of a round was resolved.
    RoundCompleted {
        /// Zero-based round index.
        round: u32,
        /// Currency paid for finishing the round.
        bonus: u32,
    },
    /// Confirms that fast-forward was toggled.
    FastForwardChanged {
        /// Whether fast-forward is now active.
        enabled: bool,
    },
    /// Confirms that a bloon entered the path.
    BloonSpawned {
        /// Kind of the spawned bloon.
        kind: BloonKind,
        /// Modifiers of the spawned bloon.
        modifiers: Modifiers,
    },
    /// Reports that a requested spawn did not happen.
    BloonSpawnRejected {
        /// Kind that was requested.
        kind: BloonKind,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces that a bloon was popped.
    BloonPopped {
        /// Kind of the popped bloon.
        kind: BloonKind,
        /// Position where it popped.
        position: Position,
        /// Tower credited with the pop, if it still exists.
        tower: Option<TowerId>,
    },
    /// Announces that a bloon reached the end of the path.
    BloonLeaked {
        /// Kind of the leaked bloon.
        kind: BloonKind,
        /// Lives removed.
        lives_lost: u32,
    },
    /// Announces that a child was queued because the population cap was reached.
    ChildDeferred {
        /// Kind of the queued child.
        kind: BloonKind,
    },
    /// Announces that a child was discarded because the deferred queue was full.
    ChildDropped {
        /// Kind of the discarded child.
        kind: BloonKind,
    },
    /// Announces that lives ran out. Emitted once per game.
    GameOver {
        /// Round index being played when the game ended.
        round: u32,
    },
    /// Confirms that a persisted game replaced the current one.
    GameLoaded {
        /// Round index restored.
        round: u32,
        /// Number of towers restored.
        towers: usize,
    },
    /// Reports that a persisted game was refused. The prior game is untouched.
    LoadRejected {
        /// Specific reason the load failed.
        reason: LoadError,
    },
}

/// Identifier of a tower slot, invalidated when the tower is sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId {
    index: u32,
    generation: u32,
}

impl TowerId {
    /// Creates a tower identifier from a slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when the identifier was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Difficulty level chosen when starting a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// More lives and cheaper towers.
    Easy,
    /// Standard rules.
    #[default]
    Medium,
    /// Fewer lives and pricier towers.
    Hard,
}

impl Difficulty {
    /// Lives at the start of a game.
    #[must_use]
    pub const fn starting_lives(self) -> u32 {
        match self {
            Self::Easy => 200,
            Self::Medium => 150,
            Self::Hard => 100,
        }
    }

    /// Coins at the start of a game.
    #[must_use]
    pub const fn starting_coins(self) -> u32 {
        match self {
            Self::Easy => 850,
            Self::Medium => 650,
            Self::Hard => 600,
        }
    }

    /// Price multiplier in percent.
    #[must_use]
    pub const fn cost_percent(self) -> u32 {
        match self {
            Self::Easy => 85,
            Self::Medium => 100,
            Self::Hard => 108,
        }
    }

    /// Scales a catalog price by the difficulty multiplier.
    #[must_use]
    pub const fn scale_cost(self, base: u32) -> u32 {
        base.saturating_mul(self.cost_percent()) / 100
    }
}

/// Rule a tower uses to pick among bloons in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetPolicy {
    /// Bloon furthest along the path.
    #[default]
    First,
    /// Bloon least far along the path.
    Last,
    /// Bloon with the highest red bloon equivalent.
    Strong,
    /// Bloon nearest to the tower.
    Close,
}

impl TargetPolicy {
    /// Policy that follows this one when cycling.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::First => Self::Last,
            Self::Last => Self::Strong,
            Self::Strong => Self::Close,
            Self::Close => Self::First,
        }
    }
}

/// One of the two upgrade paths of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradePath {
    /// Upper path.
    First,
    /// Lower path.
    Second,
}

impl UpgradePath {
    /// Both paths in fold order.
    pub const BOTH: [Self; 2] = [Self::First, Self::Second];

    /// Table index of the path.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    /// The path that is not this one.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Purchased upgrade levels on both paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeLevels([u8; 2]);

impl UpgradeLevels {
    /// Creates levels for the first and second path.
    #[must_use]
    pub const fn new(first: u8, second: u8) -> Self {
        Self([first, second])
    }

    /// Level purchased on a path.
    #[must_use]
    pub const fn get(&self, path: UpgradePath) -> u8 {
        self.0[path.index()]
    }

    /// Returns the levels with one more purchase on `path`.
    #[must_use]
    pub fn incremented(self, path: UpgradePath) -> Self {
        let mut levels = self.0;
        levels[path.index()] = levels[path.index()].saturating_add(1);
        Self(levels)
    }
}

/// Effective tower statistics after folding purchased upgrades over base stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerStats {
    /// Damage per hit.
    pub damage: u16,
    /// Bloons a projectile may hit, or bloons an area attack affects.
    pub pierce: u16,
    /// Targeting radius in pixels.
    pub range: u16,
    /// Damage type of every attack.
    pub damage_type: DamageType,
    /// Whether camo bloons can be targeted.
    pub camo_vision: bool,
    /// Projectiles per volley.
    pub projectile_count: u8,
    /// Projectile pixels per tick.
    pub projectile_speed: u8,
    /// Ticks between attacks, never below two.
    pub attack_interval: u16,
    /// Attack delivery.
    pub mode: FireMode,
    /// Granted abilities.
    pub abilities: Abilities,
    /// Splash radius in pixels, zero for none.
    pub splash: u16,
    /// Stun ticks applied on hit.
    pub stun: u16,
    /// Damage per damage-over-time pulse, zero for none.
    pub dot_damage: u16,
    /// Ticks between damage-over-time pulses.
    pub dot_interval: u16,
    /// Slow ticks applied on hit.
    pub slow: u16,
    /// Damage multiplier against MOAB-class bloons, at least one.
    pub moab_multiplier: u16,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The footprint extends beyond the playfield.
    #[error("tower footprint leaves the playfield")]
    OutOfBounds,
    /// The footprint touches the path corridor.
    #[error("tower footprint overlaps the path")]
    OnPath,
    /// The footprint overlaps another tower.
    #[error("tower footprint overlaps another tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough coins")]
    InsufficientFunds,
    /// The game has ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a command naming a tower may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum TowerError {
    /// No live tower has the provided identifier.
    #[error("no tower with that identifier")]
    MissingTower,
}

/// Reasons an upgrade purchase may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No live tower has the provided identifier.
    #[error("no tower with that identifier")]
    MissingTower,
    /// The path already has all four levels.
    #[error("upgrade path is fully purchased")]
    PathMaxed,
    /// The other path is past the crossover threshold.
    #[error("other path is too far upgraded")]
    CrossPathCap,
    /// The player cannot afford the upgrade.
    #[error("not enough coins")]
    InsufficientFunds,
}

/// Reasons a round may not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RoundError {
    /// The current round has not finished.
    #[error("a round is already in progress")]
    InProgress,
    /// The game has ended.
    #[error("the game is over")]
    GameOver,
}

/// Reasons a requested spawn did not happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SpawnError {
    /// The catalog has no such bloon kind.
    #[error("unknown bloon kind")]
    UnknownKind,
    /// The population cap is reached.
    #[error("population cap reached")]
    PopulationCap,
    /// No node slot is free.
    #[error("bloon storage exhausted")]
    SlotsExhausted,
}

/// Reasons a persisted game may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum LoadError {
    /// The save was written by an incompatible version.
    #[error("save version {found} does not match {expected}")]
    VersionMismatch {
        /// Version found in the save.
        found: u8,
        /// Version this build reads.
        expected: u8,
    },
    /// A tower names a kind outside the tower table.
    #[error("tower {index} has unknown kind {kind}")]
    UnknownTowerKind {
        /// Position of the tower in the save.
        index: usize,
        /// Raw kind found.
        kind: u8,
    },
    /// A tower's upgrade levels break the path caps.
    #[error("tower {index} has invalid upgrade levels")]
    InvalidUpgradeLevels {
        /// Position of the tower in the save.
        index: usize,
    },
    /// A tower lies outside the playfield.
    #[error("tower {index} lies outside the playfield")]
    OutOfBounds {
        /// Position of the tower in the save.
        index: usize,
    },
    /// More towers than the world can hold.
    #[error("save holds more towers than the world can store")]
    TooManyTowers,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(4, 9));
    }

    #[test]
    fn load_error_round_trips_through_bincode() {
        assert_round_trip(&LoadError::VersionMismatch {
            found: 2,
            expected: SAVE_VERSION,
        });
    }

    #[test]
    fn difficulty_scales_prices() {
        assert_eq!(Difficulty::Easy.scale_cost(200), 170);
        assert_eq!(Difficulty::Medium.scale_cost(200), 200);
        assert_eq!(Difficulty::Hard.scale_cost(200), 216);
    }

    #[test]
    fn target_policy_cycles_through_every_variant() {
        let mut policy = TargetPolicy::First;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(policy);
            policy = policy.next();
        }
        assert_eq!(policy, TargetPolicy::First);
        assert_eq!(
            seen,
            vec![
                TargetPolicy::First,
                TargetPolicy::Last,
                TargetPolicy::Strong,
                TargetPolicy::Close,
            ]
        );
    }

    #[test]
    fn upgrade_levels_increment_one_path() {
        let levels = UpgradeLevels::new(2, 0).incremented(UpgradePath::Second);
        assert_eq!(levels.get(UpgradePath::First), 2);
        assert_eq!(levels.get(UpgradePath::Second), 1);
        assert_eq!(UpgradePath::First.other(), UpgradePath::Second);
    }

    #[test]
    fn error_messages_are_readable() {
        let message = LoadError::UnknownTowerKind { index: 3, kind: 9 }.to_string();
        assert_eq!(message, "tower 3 has unknown kind 9");
    }
}

//! Persisted game state exchanged with adapters.
//!
//! Only player-owned state is saved. Derived tower statistics are recomputed
//! from each tower's kind and upgrade levels when the save is loaded.

use serde::{Deserialize, Serialize};

use crate::{Difficulty, Position, TargetPolicy, TowerKind, UpgradeLevels};

/// Version written by this build. Loads of any other version are refused.
pub const SAVE_VERSION: u8 = 1;

/// Snapshot of a game between rounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Format version, compared against [`SAVE_VERSION`].
    pub version: u8,
    /// Zero-based index of the next round to play.
    pub round: u32,
    /// Furthest round index reached.
    pub max_round: u32,
    /// Difficulty the game was started with.
    pub difficulty: Difficulty,
    /// Remaining lives.
    pub lives: u32,
    /// Currency available to spend.
    pub coins: u32,
    /// Whether purchases are free and lives never run out.
    pub sandbox: bool,
    /// Towers in placement order.
    pub towers: Vec<SavedTower>,
}

/// One persisted tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTower {
    /// Footprint centre.
    pub position: Position,
    /// Raw tower table index, validated on load.
    pub kind: u8,
    /// Purchased levels per path.
    pub upgrades: UpgradeLevels,
    /// Target selection policy.
    pub policy: TargetPolicy,
}

impl SavedTower {
    /// Builds a persisted tower from typed fields.
    #[must_use]
    pub fn new(
        position: Position,
        kind: TowerKind,
        upgrades: UpgradeLevels,
        policy: TargetPolicy,
    ) -> Self {
        Self {
            position,
            kind: kind as u8,
            upgrades,
            policy,
        }
    }

    /// Resolves the stored index into a tower kind.
    #[must_use]
    pub fn tower_kind(&self) -> Option<TowerKind> {
        TowerKind::from_index(usize::from(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_game_round_trips_through_bincode() {
        let save = SavedGame {
            version: SAVE_VERSION,
            round: 12,
            max_round: 14,
            difficulty: Difficulty::Hard,
            lives: 87,
            coins: 1234,
            sandbox: false,
            towers: vec![SavedTower::new(
                Position::new(100, 80),
                TowerKind::Glue,
                UpgradeLevels::new(3, 1),
                TargetPolicy::Strong,
            )],
        };

        let bytes = bincode::serialize(&save).expect("serialize");
        let restored: SavedGame = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, save);
    }

    #[test]
    fn unknown_kind_index_resolves_to_none() {
        let mut tower = SavedTower::new(
            Position::new(0, 0),
            TowerKind::Dart,
            UpgradeLevels::default(),
            TargetPolicy::First,
        );
        assert_eq!(tower.tower_kind(), Some(TowerKind::Dart));
        tower.kind = 42;
        assert_eq!(tower.tower_kind(), None);
    }
}

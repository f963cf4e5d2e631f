//! Authoritative tower state and placement rules.

use bloon_defence_core::{
    Catalog, Path, PlacementError, Position, SimulationConfig, TargetPolicy, TowerId, TowerKind,
    TowerStats, UpgradeLevels,
};
use bloon_defence_system_tower_combat::Cooldown;
use bloon_defence_system_upgrades::recompute;

use crate::list::{IntrusiveList, NodeHandle};

/// Towers the world can hold at once.
pub(crate) const TOWER_SLOTS: usize = 512;

/// Tower stored inside the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TowerState {
    pub(crate) kind: TowerKind,
    pub(crate) position: Position,
    pub(crate) levels: UpgradeLevels,
    pub(crate) policy: TargetPolicy,
    pub(crate) stats: TowerStats,
    pub(crate) cooldown: Cooldown,
    pub(crate) invested: u32,
    pub(crate) pops: u32,
}

impl TowerState {
    pub(crate) fn new(
        catalog: &Catalog,
        kind: TowerKind,
        position: Position,
        levels: UpgradeLevels,
        policy: TargetPolicy,
        invested: u32,
    ) -> Self {
        let stats = recompute(catalog.tower(kind), levels);
        Self {
            kind,
            position,
            levels,
            policy,
            stats,
            cooldown: Cooldown::default(),
            invested,
            pops: 0,
        }
    }

    /// Rebuilds the effective statistics from the kind and purchased levels.
    pub(crate) fn refresh(&mut self, catalog: &Catalog) {
        self.stats = recompute(catalog.tower(self.kind), self.levels);
    }
}

pub(crate) type TowerList = IntrusiveList<TowerState>;

pub(crate) fn tower_id(handle: NodeHandle) -> TowerId {
    TowerId::new(handle.index(), handle.generation())
}

pub(crate) fn tower_handle(id: TowerId) -> NodeHandle {
    NodeHandle::new(id.index(), id.generation())
}

/// Reports whether a footprint centred on `position` fits inside the playfield.
pub(crate) fn inside_playfield(config: &SimulationConfig, position: Position) -> bool {
    let half = config.tower_half_extent;
    let width = i64::from(config.width);
    let height = i64::from(config.height);
    let (x, y) = (i64::from(position.x()), i64::from(position.y()));
    let half = i64::from(half);
    x - half >= 0 && y - half >= 0 && x + half <= width && y + half <= height
}

/// Checks every placement rule except affordability.
pub(crate) fn check_site(
    config: &SimulationConfig,
    path: &Path,
    towers: &TowerList,
    position: Position,
) -> Result<(), PlacementError> {
    if !inside_playfield(config, position) {
        return Err(PlacementError::OutOfBounds);
    }

    let half = config.tower_half_extent;
    if path.blocks_footprint(position, half) {
        return Err(PlacementError::OnPath);
    }

    let overlaps = towers.iter().any(|(_, tower)| {
        (tower.position.x() - position.x()).abs() < 2 * half
            && (tower.position.y() - position.y()).abs() < 2 * half
    });
    if overlaps || towers.is_full() {
        return Err(PlacementError::Occupied);
    }

    Ok(())
}

//! Bloon and projectile entities stored in the spatial grids.

use bloon_defence_core::{BloonKind, BloonStats, Modifiers, Path, Position, TowerId};
use bloon_defence_system_movement::{BloonMotion, DamageOverTime, ProjectileMotion, Regrowth};
use bloon_defence_system_tower_combat::Payload;

use crate::list::NodeHandle;

/// Live bloon travelling the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Bloon {
    pub(crate) kind: BloonKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) health: i32,
    pub(crate) motion: BloonMotion,
    pub(crate) regrowth: Option<Regrowth>,
    pub(crate) dot: DamageOverTime,
    pub(crate) glued: bool,
    pub(crate) attacker: Option<TowerId>,
}

impl Bloon {
    pub(crate) fn from_seed(seed: BloonSeed, stats: &BloonStats) -> Self {
        Self {
            kind: seed.kind,
            modifiers: seed.modifiers,
            health: i32::from(stats.health),
            motion: seed.motion,
            regrowth: seed.regrowth,
            dot: seed.dot,
            glued: seed.glued,
            attacker: None,
        }
    }

    pub(crate) const fn position(&self) -> Position {
        self.motion.position
    }

    pub(crate) const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies damage and remembers the tower credited with a later pop.
    pub(crate) fn damage(&mut self, amount: u16, tower: Option<TowerId>) {
        self.health -= i32::from(amount);
        if tower.is_some() {
            self.attacker = tower;
        }
    }

    /// Seeds one child released when this bloon pops.
    pub(crate) fn child(&self, kind: BloonKind) -> BloonSeed {
        let mut motion = self.motion.progress_only();
        let mut dot = DamageOverTime::default();
        if self.glued {
            motion.slow = self.motion.slow;
            dot = self.dot;
        }
        BloonSeed {
            kind,
            modifiers: self.modifiers,
            motion,
            regrowth: self.regrowth,
            dot,
            glued: self.glued,
        }
    }
}

/// Everything needed to create a bloon, kept in the deferred queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct BloonSeed {
    pub(crate) kind: BloonKind,
    pub(crate) modifiers: Modifiers,
    pub(crate) motion: BloonMotion,
    pub(crate) regrowth: Option<Regrowth>,
    pub(crate) dot: DamageOverTime,
    pub(crate) glued: bool,
}

impl BloonSeed {
    /// Fresh bloon at the path entrance.
    pub(crate) fn at_entrance(
        path: &Path,
        kind: BloonKind,
        modifiers: Modifiers,
        regrow_interval: u16,
    ) -> Self {
        let regrowth = modifiers.is_regrow().then_some(Regrowth {
            ceiling: kind,
            timer: regrow_interval,
        });
        Self {
            kind,
            modifiers,
            motion: BloonMotion::at_entrance(path),
            regrowth,
            dot: DamageOverTime::default(),
            glued: false,
        }
    }
}

/// Projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Projectile {
    pub(crate) motion: ProjectileMotion,
    pub(crate) payload: Payload,
    pub(crate) size: u8,
    pub(crate) last_hit: Option<NodeHandle>,
}

impl Projectile {
    pub(crate) fn position(&self) -> Position {
        self.motion.position.to_position()
    }
}

/// Reports whether two centred square hitboxes overlap.
pub(crate) fn boxes_overlap(a: Position, a_size: u8, b: Position, b_size: u8) -> bool {
    let reach = i32::from(a_size) + i32::from(b_size);
    (a.x() - b.x()).abs() * 2 < reach && (a.y() - b.y()).abs() * 2 < reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hitboxes_overlap_only_when_strictly_intersecting() {
        let origin = Position::new(100, 100);
        assert!(boxes_overlap(origin, 10, Position::new(107, 100), 6));
        assert!(!boxes_overlap(origin, 10, Position::new(108, 100), 6));
        assert!(!boxes_overlap(origin, 10, Position::new(100, 92), 6));
    }

    #[test]
    fn children_inherit_status_only_when_glue_soaked() {
        let path = Path::standard();
        let seed = BloonSeed::at_entrance(&path, BloonKind::BLUE, Modifiers::REGROW, 90);
        let stats = BloonStats {
            name: "Blue",
            health: 1,
            speed: 256,
            immunity: bloon_defence_core::Immunity::empty(),
            rbe: 2,
            children: Vec::new(),
            moab_class: false,
            size: 10,
        };
        let mut parent = Bloon::from_seed(seed, &stats);
        parent.motion.slow = 40;
        parent.dot = DamageOverTime::new(1, 10, 50, None);

        let plain = parent.child(BloonKind::RED);
        assert_eq!(plain.motion.slow, 0);
        assert!(!plain.dot.is_active());
        assert_eq!(plain.regrowth.map(|regrowth| regrowth.ceiling), Some(BloonKind::BLUE));

        parent.glued = true;
        let soaked = parent.child(BloonKind::RED);
        assert_eq!(soaked.motion.slow, 40);
        assert!(soaked.dot.is_active());
        assert!(soaked.modifiers.is_regrow());
    }
}

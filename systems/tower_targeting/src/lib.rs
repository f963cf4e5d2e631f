#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects tower targets among bloons near a tower.
//!
//! The world gathers candidates from the grid buckets overlapping a tower's
//! range and hands them over in bucket order. Selection never depends on
//! anything but that order and the candidates' fields, so equal inputs always
//! produce equal targets.

use bloon_defence_core::{Position, TargetPolicy};

/// Snapshot of a bloon offered to the targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Candidate<K> {
    /// Opaque key the world uses to find the bloon again.
    pub key: K,
    /// Pixel position of the bloon.
    pub position: Position,
    /// Fixed-point distance travelled along the path.
    pub progress: i64,
    /// Red bloon equivalent of the bloon's current kind.
    pub rbe: u32,
    /// Whether the bloon carries the camo modifier.
    pub camo: bool,
}

/// Parameters of the tower or projectile performing a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seeker {
    /// Centre of the search.
    pub position: Position,
    /// Search radius in pixels.
    pub range: i32,
    /// Whether camo bloons may be chosen.
    pub camo_vision: bool,
}

impl Seeker {
    fn reaches<K>(&self, candidate: &Candidate<K>) -> Option<i64> {
        if candidate.camo && !self.camo_vision {
            return None;
        }

        let range = i64::from(self.range.max(0));
        let distance_sq = self.position.distance_squared(candidate.position);
        (distance_sq <= range * range).then_some(distance_sq)
    }
}

/// Targeting system that reuses a scratch buffer between searches.
#[derive(Debug)]
pub struct TowerTargeting<K> {
    eligible: Vec<Scored<K>>,
}

impl<K> Default for TowerTargeting<K> {
    fn default() -> Self {
        Self {
            eligible: Vec::new(),
        }
    }
}

impl<K: Copy> TowerTargeting<K> {
    /// Creates a targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the candidate `policy` prefers among those `seeker` can reach.
    ///
    /// Ties keep the candidate encountered first.
    pub fn select<I>(
        &mut self,
        seeker: &Seeker,
        policy: TargetPolicy,
        candidates: I,
    ) -> Option<Candidate<K>>
    where
        I: IntoIterator<Item = Candidate<K>>,
    {
        self.gather(seeker, candidates);

        let mut best: Option<&Scored<K>> = None;
        for scored in &self.eligible {
            match best {
                Some(existing) if !scored.precedes(existing, policy) => {}
                _ => best = Some(scored),
            }
        }
        best.map(|scored| scored.candidate)
    }

    /// Nearest candidate within reach, used by homing projectiles.
    pub fn nearest<I>(&mut self, seeker: &Seeker, candidates: I) -> Option<Candidate<K>>
    where
        I: IntoIterator<Item = Candidate<K>>,
    {
        self.select(seeker, TargetPolicy::Close, candidates)
    }

    /// Collects every candidate within reach in encounter order.
    pub fn in_range<I>(&mut self, seeker: &Seeker, candidates: I, out: &mut Vec<Candidate<K>>)
    where
        I: IntoIterator<Item = Candidate<K>>,
    {
        out.clear();
        self.gather(seeker, candidates);
        out.extend(self.eligible.iter().map(|scored| scored.candidate));
    }

    fn gather<I>(&mut self, seeker: &Seeker, candidates: I)
    where
        I: IntoIterator<Item = Candidate<K>>,
    {
        self.eligible.clear();
        self.eligible
            .extend(candidates.into_iter().filter_map(|candidate| {
                seeker.reaches(&candidate).map(|distance_sq| Scored {
                    candidate,
                    distance_sq,
                })
            }));
    }
}

#[derive(Clone, Copy, Debug)]
struct Scored<K> {
    candidate: Candidate<K>,
    distance_sq: i64,
}

impl<K> Scored<K> {
    fn precedes(&self, other: &Self, policy: TargetPolicy) -> bool {
        match policy {
            TargetPolicy::First => self.candidate.progress > other.candidate.progress,
            TargetPolicy::Last => self.candidate.progress < other.candidate.progress,
            TargetPolicy::Strong => self.candidate.rbe > other.candidate.rbe,
            TargetPolicy::Close => self.distance_sq < other.distance_sq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(key: u32, x: i32, progress: i64, rbe: u32) -> Candidate<u32> {
        Candidate {
            key,
            position: Position::new(x, 0),
            progress,
            rbe,
            camo: false,
        }
    }

    fn seeker(range: i32) -> Seeker {
        Seeker {
            position: Position::new(0, 0),
            range,
            camo_vision: false,
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut targeting = TowerTargeting::new();
        let chosen = targeting.select(
            &seeker(10),
            TargetPolicy::First,
            [candidate(1, 10, 5, 1), candidate(2, 11, 9, 1)],
        );
        assert_eq!(chosen.map(|c| c.key), Some(1));
    }

    #[test]
    fn ties_keep_the_earliest_candidate() {
        let mut targeting = TowerTargeting::new();
        let pool = [candidate(7, 3, 100, 4), candidate(3, 3, 100, 4)];
        for policy in [
            TargetPolicy::First,
            TargetPolicy::Last,
            TargetPolicy::Strong,
            TargetPolicy::Close,
        ] {
            let chosen = targeting.select(&seeker(50), policy, pool);
            assert_eq!(chosen.map(|c| c.key), Some(7), "{policy:?}");
        }
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let mut targeting: TowerTargeting<u32> = TowerTargeting::new();
        assert_eq!(targeting.select(&seeker(50), TargetPolicy::First, []), None);
    }
}

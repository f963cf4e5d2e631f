#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that walks a round's spawn script.
//!
//! Rounds below the scripted count come from the catalog. Later rounds are
//! generated by the freeplay rules, which scale MOAB and camo-regrow groups
//! with the distance past the last scripted round.

use bloon_defence_core::{BloonKind, Catalog, Modifiers, SpawnGroup};

/// Round index at which freeplay generation starts in the standard game.
pub const FREEPLAY_START: u32 = 80;

const COUNT_CAP: u32 = 255;

/// One bloon released by the spawn script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptedSpawn {
    /// Kind of the bloon.
    pub kind: BloonKind,
    /// Modifiers of the bloon.
    pub modifiers: Modifiers,
}

/// Groups spawned by `round`, scripted or generated.
#[must_use]
pub fn round_groups(catalog: &Catalog, round: u32) -> Vec<SpawnGroup> {
    usize::try_from(round)
        .ok()
        .and_then(|index| catalog.round(index))
        .map_or_else(|| freeplay(round), <[SpawnGroup]>::to_vec)
}

/// Generates a freeplay round.
///
/// Rounds at or below [`FREEPLAY_START`] produce the base freeplay mix.
#[must_use]
pub fn freeplay(round: u32) -> Vec<SpawnGroup> {
    let offset = round.saturating_sub(FREEPLAY_START);
    let scale = offset.saturating_mul(8).saturating_add(100);
    let scaled = |base: u32| {
        let count = base.saturating_mul(scale) / 100;
        u16::try_from(count.min(COUNT_CAP)).unwrap_or(u16::MAX)
    };
    let hardened = Modifiers::CAMO | Modifiers::REGROW;

    let moab_spacing = if offset / 3 < 8 {
        u8::try_from(10 - offset / 3).unwrap_or(2)
    } else {
        2
    };

    let mut groups = vec![
        SpawnGroup {
            kind: BloonKind::MOAB,
            modifiers: Modifiers::empty(),
            count: scaled(8),
            spacing: moab_spacing,
        },
        SpawnGroup {
            kind: BloonKind::CERAMIC,
            modifiers: hardened,
            count: scaled(30),
            spacing: 3,
        },
    ];

    let optional = [
        (3, BloonKind::LEAD, 15, 6),
        (10, BloonKind::RAINBOW, 25, 3),
        (15, BloonKind::ZEBRA, 20, 4),
    ];
    groups.extend(
        optional
            .into_iter()
            .filter(|&(threshold, ..)| offset >= threshold)
            .map(|(_, kind, base, spacing)| SpawnGroup {
                kind,
                modifiers: hardened,
                count: scaled(base),
                spacing,
            }),
    );

    groups
}

/// Position of the spawner within a round's script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spawning {
    groups: Vec<SpawnGroup>,
    group: usize,
    emitted: u16,
    countdown: u16,
}

impl Spawning {
    /// Creates a spawner with nothing to release.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Starts releasing `groups` in order. The first bloon leaves on the next tick.
    pub fn begin(&mut self, groups: Vec<SpawnGroup>) {
        self.groups = groups;
        self.group = 0;
        self.emitted = 0;
        self.countdown = 0;
        self.skip_empty_groups();
    }

    /// Reports whether every group has been released.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.group >= self.groups.len()
    }

    /// Bloons still to be released by the current script.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.groups
            .iter()
            .skip(self.group)
            .map(|group| usize::from(group.count))
            .sum::<usize>()
            .saturating_sub(usize::from(self.emitted))
    }

    /// Advances the script by one tick and appends due bloons to `out`.
    ///
    /// At most `headroom` bloons are released. A bloon that is due but finds
    /// no headroom is held and released on a later tick.
    pub fn handle(&mut self, headroom: usize, out: &mut Vec<ScriptedSpawn>) {
        if self.is_exhausted() {
            return;
        }

        self.countdown = self.countdown.saturating_sub(1);
        let mut headroom = headroom;
        while self.countdown == 0 && headroom > 0 {
            let Some(group) = self.groups.get(self.group).copied() else {
                return;
            };

            out.push(ScriptedSpawn {
                kind: group.kind,
                modifiers: group.modifiers,
            });
            headroom -= 1;
            self.emitted += 1;
            self.countdown = u16::from(group.spacing);

            if self.emitted >= group.count {
                self.group += 1;
                self.emitted = 0;
                self.skip_empty_groups();
                if self.is_exhausted() {
                    return;
                }
            }
        }
    }

    fn skip_empty_groups(&mut self) {
        while self
            .groups
            .get(self.group)
            .is_some_and(|group| group.count == 0)
        {
            self.group += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(kind: BloonKind, count: u16, spacing: u8) -> SpawnGroup {
        SpawnGroup {
            kind,
            modifiers: Modifiers::empty(),
            count,
            spacing,
        }
    }

    fn run(spawning: &mut Spawning, ticks: usize, headroom: usize) -> Vec<Vec<BloonKind>> {
        (0..ticks)
            .map(|_| {
                let mut out = Vec::new();
                spawning.handle(headroom, &mut out);
                out.into_iter().map(|spawn| spawn.kind).collect()
            })
            .collect()
    }

    #[test]
    fn groups_release_sequentially_at_their_spacing() {
        let mut spawning = Spawning::idle();
        spawning.begin(vec![
            group(BloonKind::RED, 2, 3),
            group(BloonKind::BLUE, 1, 1),
        ]);

        let released = run(&mut spawning, 7, usize::MAX);
        let red = vec![BloonKind::RED];
        let blue = vec![BloonKind::BLUE];
        assert_eq!(
            released,
            vec![red.clone(), vec![], vec![], red, vec![], vec![], blue]
        );
        assert!(spawning.is_exhausted());
    }

    #[test]
    fn zero_spacing_releases_a_burst_bounded_by_headroom() {
        let mut spawning = Spawning::idle();
        spawning.begin(vec![group(BloonKind::PINK, 5, 0)]);

        let released = run(&mut spawning, 2, 3);
        assert_eq!(released[0].len(), 3);
        assert_eq!(released[1].len(), 2);
        assert!(spawning.is_exhausted());
    }

    #[test]
    fn due_bloons_wait_for_headroom() {
        let mut spawning = Spawning::idle();
        spawning.begin(vec![group(BloonKind::RED, 1, 5)]);

        assert!(run(&mut spawning, 3, 0).iter().all(Vec::is_empty));
        assert_eq!(spawning.remaining(), 1);
        assert_eq!(run(&mut spawning, 1, 1), vec![vec![BloonKind::RED]]);
        assert_eq!(spawning.remaining(), 0);
    }

    #[test]
    fn empty_groups_are_skipped() {
        let mut spawning = Spawning::idle();
        spawning.begin(vec![group(BloonKind::RED, 0, 4)]);
        assert!(spawning.is_exhausted());
    }

    #[test]
    fn first_freeplay_round_mixes_moabs_and_ceramics() {
        let groups = freeplay(FREEPLAY_START);
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].kind, groups[0].count, groups[0].spacing), (BloonKind::MOAB, 8, 10));
        assert_eq!(groups[1].kind, BloonKind::CERAMIC);
        assert_eq!(groups[1].count, 30);
        assert!(groups[1].modifiers.is_camo() && groups[1].modifiers.is_regrow());
    }

    #[test]
    fn later_freeplay_rounds_scale_and_add_groups() {
        let groups = freeplay(FREEPLAY_START + 15);
        let kinds: Vec<BloonKind> = groups.iter().map(|group| group.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BloonKind::MOAB,
                BloonKind::CERAMIC,
                BloonKind::LEAD,
                BloonKind::RAINBOW,
                BloonKind::ZEBRA,
            ]
        );
        assert_eq!(groups[0].count, 17);
        assert_eq!(groups[0].spacing, 5);
        assert_eq!(groups[4].count, 44);

        let far = freeplay(FREEPLAY_START + 400);
        assert_eq!(far[0].spacing, 2);
        assert!(far.iter().all(|group| group.count <= 255));
        assert_eq!(far[1].count, 255);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives effective tower statistics from purchased upgrades.
//!
//! Statistics are always recomputed in full from the tower's base stats and
//! its two upgrade levels, so the same `(kind, levels)` pair yields the same
//! result no matter the order in which upgrades were bought.

use bloon_defence_core::{
    Abilities, DamageType, TowerBlueprint, TowerStats, UpgradeDelta, UpgradeError,
    UpgradeLevels, UpgradePath, UPGRADE_LEVELS,
};

/// Highest level on a single path.
pub const MAX_LEVEL: u8 = UPGRADE_LEVELS as u8;
/// Level on one path that caps the other path.
pub const CROSS_PATH_THRESHOLD: u8 = 3;
/// Highest level allowed on a path once the other path reached the threshold.
pub const CROSS_PATH_CAP: u8 = 2;
/// Attack interval floor in ticks.
pub const MIN_ATTACK_INTERVAL: u16 = 2;

/// Highest level purchasable on `path` given the other path's level.
#[must_use]
pub fn path_cap(levels: UpgradeLevels, path: UpgradePath) -> u8 {
    if levels.get(path.other()) >= CROSS_PATH_THRESHOLD {
        CROSS_PATH_CAP
    } else {
        MAX_LEVEL
    }
}

/// Checks whether the next level on `path` may be bought.
///
/// Returns the zero-based index of the upgrade that would be purchased.
pub fn check_purchase(levels: UpgradeLevels, path: UpgradePath) -> Result<usize, UpgradeError> {
    let current = levels.get(path);
    if current >= MAX_LEVEL {
        return Err(UpgradeError::PathMaxed);
    }
    if current >= path_cap(levels, path) {
        return Err(UpgradeError::CrossPathCap);
    }
    Ok(usize::from(current))
}

/// Reports whether a pair of levels could have been reached by legal purchases.
#[must_use]
pub fn levels_valid(levels: UpgradeLevels) -> bool {
    UpgradePath::BOTH
        .iter()
        .all(|&path| levels.get(path) <= path_cap(levels, path))
}

/// Catalog price of the next upgrade on `path`, if one may be bought.
pub fn next_upgrade<'a>(
    blueprint: &'a TowerBlueprint,
    levels: UpgradeLevels,
    path: UpgradePath,
) -> Result<&'a UpgradeDelta, UpgradeError> {
    let index = check_purchase(levels, path)?;
    Ok(&blueprint.upgrades[path.index()][index])
}

/// Base cost plus the catalog cost of every purchased upgrade.
#[must_use]
pub fn invested(blueprint: &TowerBlueprint, levels: UpgradeLevels) -> u32 {
    purchased(blueprint, levels).fold(blueprint.base.cost, |total, delta| {
        total.saturating_add(delta.cost)
    })
}

/// Folds the purchased upgrades of both paths over the base statistics.
#[must_use]
pub fn recompute(blueprint: &TowerBlueprint, levels: UpgradeLevels) -> TowerStats {
    let base = &blueprint.base;
    let mut fold = Fold {
        damage: i32::from(base.damage),
        pierce: i32::from(base.pierce),
        range: i32::from(base.range),
        projectile_count: i32::from(base.projectile_count),
        attack_percent: 0,
        camo_vision: base.camo_vision,
        damage_type: base.damage_type,
        abilities: Abilities::empty(),
        splash: 0,
        stun: 0,
        dot_damage: 0,
        dot_interval: 0,
        slow: i32::from(base.slow),
        moab_multiplier: 1,
    };

    for delta in purchased(blueprint, levels) {
        fold.apply(delta);
    }

    let interval_percent = (100 + fold.attack_percent).max(0);
    let attack_interval = i32::from(base.attack_frames) * interval_percent / 100;

    TowerStats {
        damage: clamp_u16(fold.damage),
        pierce: clamp_u16(fold.pierce),
        range: clamp_u16(fold.range),
        damage_type: fold.damage_type,
        camo_vision: fold.camo_vision,
        projectile_count: u8::try_from(fold.projectile_count.max(0)).unwrap_or(u8::MAX),
        projectile_speed: base.projectile_speed,
        attack_interval: clamp_u16(attack_interval).max(MIN_ATTACK_INTERVAL),
        mode: base.mode,
        abilities: fold.abilities,
        splash: clamp_u16(fold.splash),
        stun: clamp_u16(fold.stun),
        dot_damage: clamp_u16(fold.dot_damage),
        dot_interval: if fold.dot_damage > 0 {
            clamp_u16(fold.dot_interval).max(1)
        } else {
            0
        },
        slow: clamp_u16(fold.slow),
        moab_multiplier: clamp_u16(fold.moab_multiplier).max(1),
    }
}

fn purchased<'a>(
    blueprint: &'a TowerBlueprint,
    levels: UpgradeLevels,
) -> impl Iterator<Item = &'a UpgradeDelta> {
    UpgradePath::BOTH.into_iter().flat_map(move |path| {
        let count = usize::from(levels.get(path)).min(UPGRADE_LEVELS);
        blueprint.upgrades[path.index()][..count].iter()
    })
}

struct Fold {
    damage: i32,
    pierce: i32,
    range: i32,
    projectile_count: i32,
    attack_percent: i32,
    camo_vision: bool,
    damage_type: DamageType,
    abilities: Abilities,
    splash: i32,
    stun: i32,
    dot_damage: i32,
    dot_interval: i32,
    slow: i32,
    moab_multiplier: i32,
}

impl Fold {
    fn apply(&mut self, delta: &UpgradeDelta) {
        self.damage = (self.damage + i32::from(delta.damage)).max(0);
        self.pierce = (self.pierce + i32::from(delta.pierce)).max(0);
        self.range = (self.range + i32::from(delta.range)).max(0);
        self.projectile_count = (self.projectile_count + i32::from(delta.projectile_count)).max(0);
        self.attack_percent += i32::from(delta.attack_percent);
        self.camo_vision |= delta.grants_camo;
        if let Some(damage_type) = delta.damage_type {
            self.damage_type = damage_type;
        }
        self.abilities |= delta.abilities;
        self.splash += i32::from(delta.splash);
        self.stun = self.stun.max(i32::from(delta.stun));
        self.dot_damage += i32::from(delta.dot_damage);
        self.dot_interval += i32::from(delta.dot_interval);
        self.slow += i32::from(delta.slow);
        self.moab_multiplier = self.moab_multiplier.max(i32::from(delta.moab_multiplier));
    }
}

fn clamp_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloon_defence_core::{Catalog, FireMode, TowerKind};

    fn blueprint(kind: TowerKind) -> TowerBlueprint {
        *Catalog::standard().tower(kind)
    }

    #[test]
    fn unupgraded_tower_matches_base_stats() {
        let dart = blueprint(TowerKind::Dart);
        let stats = recompute(&dart, UpgradeLevels::default());
        assert_eq!(stats.damage, 1);
        assert_eq!(stats.pierce, 2);
        assert_eq!(stats.range, 40);
        assert_eq!(stats.attack_interval, 21);
        assert_eq!(stats.damage_type, DamageType::SHARP);
        assert_eq!(stats.mode, FireMode::Directional);
        assert_eq!(stats.moab_multiplier, 1);
        assert!(!stats.camo_vision);
    }

    #[test]
    fn purchased_levels_fold_additively() {
        let dart = blueprint(TowerKind::Dart);
        let stats = recompute(&dart, UpgradeLevels::new(3, 2));
        assert_eq!(stats.range, 60);
        assert_eq!(stats.damage, 2);
        assert_eq!(stats.pierce, 9);
        assert_eq!(stats.splash, 8);
        assert_eq!(stats.damage_type, DamageType::NORMAL);
        assert!(stats.camo_vision);
    }

    #[test]
    fn attack_percent_is_cumulative_and_floored() {
        let tack = blueprint(TowerKind::Tack);
        assert_eq!(recompute(&tack, UpgradeLevels::new(2, 0)).attack_interval, 14);

        let sniper = blueprint(TowerKind::Sniper);
        let stats = recompute(&sniper, UpgradeLevels::new(0, 4));
        assert_eq!(stats.attack_interval, MIN_ATTACK_INTERVAL);
    }

    #[test]
    fn grants_and_multipliers_combine() {
        let bomb = blueprint(TowerKind::Bomb);
        let stats = recompute(&bomb, UpgradeLevels::new(4, 0));
        assert_eq!(stats.moab_multiplier, 10);
        assert_eq!(stats.splash, 12);

        let ninja = blueprint(TowerKind::Ninja);
        let stats = recompute(&ninja, UpgradeLevels::new(0, 3));
        assert!(stats.abilities.contains(Abilities::HOMING | Abilities::DISTRACTION));
        assert!(stats.abilities.contains(Abilities::CAMO_STRIP));
    }

    #[test]
    fn damage_over_time_interval_accumulates() {
        let glue = blueprint(TowerKind::Glue);
        let corrosive = recompute(&glue, UpgradeLevels::new(2, 0));
        assert_eq!((corrosive.dot_damage, corrosive.dot_interval), (1, 30));
        let liquefier = recompute(&glue, UpgradeLevels::new(4, 0));
        assert_eq!((liquefier.dot_damage, liquefier.dot_interval), (4, 5));
        assert_eq!(recompute(&glue, UpgradeLevels::default()).dot_interval, 0);
        assert_eq!(recompute(&glue, UpgradeLevels::new(0, 1)).slow, 105);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let boomerang = blueprint(TowerKind::Boomerang);
        let levels = UpgradeLevels::new(2, 3);
        assert_eq!(recompute(&boomerang, levels), recompute(&boomerang, levels));
    }

    #[test]
    fn cross_path_cap_limits_the_other_path() {
        let levels = UpgradeLevels::new(3, 0);
        assert_eq!(check_purchase(levels, UpgradePath::Second), Ok(0));
        assert_eq!(
            check_purchase(UpgradeLevels::new(3, 2), UpgradePath::Second),
            Err(UpgradeError::CrossPathCap)
        );
        assert_eq!(
            check_purchase(UpgradeLevels::new(4, 0), UpgradePath::First),
            Err(UpgradeError::PathMaxed)
        );
        assert_eq!(
            check_purchase(UpgradeLevels::new(2, 2), UpgradePath::First),
            Ok(2)
        );
    }

    #[test]
    fn level_validity_mirrors_purchase_rules() {
        assert!(levels_valid(UpgradeLevels::new(4, 2)));
        assert!(levels_valid(UpgradeLevels::new(2, 2)));
        assert!(!levels_valid(UpgradeLevels::new(3, 3)));
        assert!(!levels_valid(UpgradeLevels::new(5, 0)));
    }

    #[test]
    fn invested_sums_base_and_purchased_costs() {
        let dart = blueprint(TowerKind::Dart);
        assert_eq!(invested(&dart, UpgradeLevels::default()), 200);
        assert_eq!(invested(&dart, UpgradeLevels::new(2, 1)), 200 + 90 + 120 + 140);
    }

    #[test]
    fn next_upgrade_returns_catalog_entry() {
        let ice = blueprint(TowerKind::Ice);
        let delta = next_upgrade(&ice, UpgradeLevels::new(0, 0), UpgradePath::Second)
            .expect("purchasable");
        assert_eq!(delta.abilities, Abilities::PERMAFROST);
        assert_eq!(delta.cost, 100);
    }
}

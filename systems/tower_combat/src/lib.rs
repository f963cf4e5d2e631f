#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns ready towers into volleys and projectile payloads.
//!
//! The world decides which towers are ready and which bloon they target. This
//! crate owns the arithmetic in between: cooldown bookkeeping, lead
//! prediction, fan and radial spreads, and the ability payload each
//! projectile carries from its tower.

use bloon_defence_core::{
    distance, Abilities, Angle, DamageType, Position, SimulationConfig, TowerId, TowerStats,
    FIXED_ONE,
};

/// Ticks until a tower may attack again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cooldown(u16);

impl Cooldown {
    /// Cooldown that expires after `ticks` ticks.
    #[must_use]
    pub const fn new(ticks: u16) -> Self {
        Self(ticks)
    }

    /// Remaining ticks.
    #[must_use]
    pub const fn remaining(&self) -> u16 {
        self.0
    }

    /// Counts down one tick and reports whether the tower may attack.
    ///
    /// A tower that could not attack stays ready on later ticks.
    pub fn tick(&mut self) -> bool {
        self.0 = self.0.saturating_sub(1);
        self.0 == 0
    }

    /// Restarts the countdown after a successful attack.
    pub fn rearm(&mut self, stats: &TowerStats) {
        self.0 = stats.attack_interval;
    }
}

/// Everything a projectile carries from the tower that fired it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Payload {
    /// Firing tower, used for attribution only.
    pub tower: Option<TowerId>,
    /// Damage per hit before the MOAB multiplier.
    pub damage: u16,
    /// Damage type checked against bloon immunities.
    pub damage_type: DamageType,
    /// Hits remaining.
    pub pierce: u16,
    /// Splash radius in pixels.
    pub splash: u16,
    /// Stun ticks applied on hit.
    pub stun: u16,
    /// Slow ticks applied on hit.
    pub slow: u16,
    /// Damage per damage-over-time pulse.
    pub dot_damage: u16,
    /// Ticks between damage-over-time pulses.
    pub dot_interval: u16,
    /// Damage multiplier against MOAB-class bloons.
    pub moab_multiplier: u16,
    /// Ability flags carried over from the tower.
    pub abilities: Abilities,
    /// Whether homing may lock onto camo bloons.
    pub camo_vision: bool,
}

impl Payload {
    /// Builds the payload for one projectile of `tower`.
    #[must_use]
    pub fn from_stats(stats: &TowerStats, tower: TowerId) -> Self {
        Self {
            tower: Some(tower),
            damage: stats.damage,
            damage_type: stats.damage_type,
            pierce: stats.pierce.max(1),
            splash: stats.splash,
            stun: stats.stun,
            slow: stats.slow,
            dot_damage: stats.dot_damage,
            dot_interval: stats.dot_interval,
            moab_multiplier: stats.moab_multiplier.max(1),
            abilities: stats.abilities,
            camo_vision: stats.camo_vision,
        }
    }

    /// Damage dealt to a bloon, scaled for MOAB-class targets.
    #[must_use]
    pub fn damage_against(&self, moab_class: bool) -> u16 {
        if moab_class {
            self.damage.saturating_mul(self.moab_multiplier)
        } else {
            self.damage
        }
    }

    /// Reports whether the payload homes in on bloons.
    #[must_use]
    pub const fn is_homing(&self) -> bool {
        self.abilities.contains(Abilities::HOMING)
    }

    /// Consumes one hit and reports whether the projectile is spent.
    pub fn consume_pierce(&mut self) -> bool {
        self.pierce = self.pierce.saturating_sub(1);
        self.pierce == 0
    }
}

/// Aiming and spread kernels parameterised by the simulation configuration.
#[derive(Debug)]
pub struct TowerCombat {
    lead_factor: i32,
    fan_step: i32,
    volley: Vec<Angle>,
}

impl TowerCombat {
    /// Creates the kernels for the provided configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            lead_factor: config.lead_factor,
            fan_step: i32::from(config.fan_step),
            volley: Vec::new(),
        }
    }

    /// Position a moving bloon is expected to reach shortly.
    ///
    /// The bloon is projected `lead_factor` ticks ahead along the direction
    /// of its next waypoint at its fixed-point `speed`.
    #[must_use]
    pub fn lead(&self, target: Position, next_waypoint: Position, speed: u16) -> Position {
        let span = distance(target, next_waypoint);
        if span == 0 {
            return target;
        }

        let scale = i64::from(speed) * i64::from(self.lead_factor);
        let divisor = i64::from(FIXED_ONE) * i64::from(span);
        let dx = i64::from(next_waypoint.x() - target.x()) * scale / divisor;
        let dy = i64::from(next_waypoint.y() - target.y()) * scale / divisor;
        target.offset(
            i32::try_from(dx).unwrap_or_default(),
            i32::try_from(dy).unwrap_or_default(),
        )
    }

    /// Heading from a tower toward a predicted target position.
    #[must_use]
    pub fn aim(&self, tower: Position, predicted: Position) -> Angle {
        Angle::between(tower, predicted)
    }

    /// Headings of a directional volley fanned around `base`.
    ///
    /// Neighbouring projectiles are `fan_step` steps apart and the fan is
    /// centred on the base heading.
    pub fn fan(&mut self, base: Angle, count: u8) -> &[Angle] {
        self.volley.clear();
        let count = i32::from(count.max(1));
        for index in 0..count {
            let offset = (2 * index - (count - 1)) * self.fan_step / 2;
            self.volley.push(base.rotated(offset));
        }
        &self.volley
    }

    /// Headings of a radial volley split evenly around the full circle.
    pub fn radial(&mut self, base: Angle, count: u8) -> &[Angle] {
        self.volley.clear();
        let count = i32::from(count.max(1));
        for index in 0..count {
            self.volley.push(base.rotated(index * 256 / count));
        }
        &self.volley
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloon_defence_core::{Catalog, TowerKind};

    fn combat() -> TowerCombat {
        TowerCombat::new(&SimulationConfig::default())
    }

    #[test]
    fn cooldown_stays_ready_until_rearmed() {
        let stats = stats(TowerKind::Dart);
        let mut cooldown = Cooldown::new(2);
        assert!(!cooldown.tick());
        assert!(cooldown.tick());
        assert!(cooldown.tick());
        cooldown.rearm(&stats);
        assert_eq!(cooldown.remaining(), stats.attack_interval);
    }

    #[test]
    fn single_projectile_fan_keeps_base_heading() {
        let mut combat = combat();
        assert_eq!(combat.fan(Angle::new(10), 1), &[Angle::new(10)]);
    }

    #[test]
    fn fan_is_centred_on_the_base_heading() {
        let mut combat = combat();
        let headings: Vec<u8> = combat
            .fan(Angle::new(0), 3)
            .iter()
            .map(Angle::get)
            .collect();
        assert_eq!(headings, vec![248, 0, 8]);

        let pair: Vec<u8> = combat
            .fan(Angle::new(100), 2)
            .iter()
            .map(Angle::get)
            .collect();
        assert_eq!(pair, vec![96, 104]);
    }

    #[test]
    fn radial_volley_splits_the_circle() {
        let mut combat = combat();
        let headings: Vec<u8> = combat
            .radial(Angle::new(0), 8)
            .iter()
            .map(Angle::get)
            .collect();
        assert_eq!(headings, vec![0, 32, 64, 96, 128, 160, 192, 224]);
    }

    #[test]
    fn lead_projects_along_the_next_waypoint() {
        let combat = combat();
        let lead = combat.lead(Position::new(10, 50), Position::new(100, 50), 512);
        assert_eq!(lead, Position::new(16, 50));
        let parked = combat.lead(Position::new(7, 7), Position::new(7, 7), 512);
        assert_eq!(parked, Position::new(7, 7));
    }

    #[test]
    fn moab_multiplier_applies_only_to_moab_class() {
        let mut bomb = stats(TowerKind::Bomb);
        bomb.moab_multiplier = 10;
        let payload = Payload::from_stats(&bomb, TowerId::new(0, 0));
        assert_eq!(payload.damage_against(false), bomb.damage);
        assert_eq!(payload.damage_against(true), bomb.damage * 10);
    }

    #[test]
    fn pierce_is_spent_exactly_at_zero() {
        let mut payload = Payload::from_stats(&stats(TowerKind::Dart), TowerId::new(0, 0));
        payload.pierce = 2;
        assert!(!payload.consume_pierce());
        assert!(payload.consume_pierce());
        assert_eq!(payload.pierce, 0);
    }

    fn stats(kind: TowerKind) -> TowerStats {
        let catalog = Catalog::standard();
        let base = &catalog.tower(kind).base;
        TowerStats {
            damage: base.damage,
            pierce: base.pierce,
            range: base.range,
            damage_type: base.damage_type,
            camo_vision: base.camo_vision,
            projectile_count: base.projectile_count,
            projectile_speed: base.projectile_speed,
            attack_interval: base.attack_frames,
            mode: base.mode,
            abilities: Abilities::empty(),
            splash: 0,
            stun: 0,
            dot_damage: 0,
            dot_interval: 0,
            slow: u16::from(base.slow),
            moab_multiplier: 1,
        }
    }
}

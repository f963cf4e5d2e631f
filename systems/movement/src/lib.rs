#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure fixed-point stepping kernels for bloons and projectiles.
//!
//! The world owns entity storage and spatial bookkeeping. This crate only
//! advances the motion components it is handed: bloons along the path with
//! freeze, stun, slow, regrowth and damage-over-time timers, and projectiles
//! along their heading with lifetime and bounds checks.

use bloon_defence_core::{
    Angle, BloonKind, FixedPosition, Modifiers, Path, Position, Segment, SimulationConfig,
    TowerId, FIXED_ONE,
};

/// Position of a bloon along the path and the timers that gate its movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BloonMotion {
    /// Pixel position.
    pub position: Position,
    /// Index of the segment being travelled.
    pub segment: usize,
    /// Whole pixels covered on the current segment.
    pub covered: i32,
    /// Fixed-point budget left over from previous ticks.
    pub carry: i32,
    /// Fixed-point distance travelled since entering the path.
    pub travelled: i64,
    /// Ticks the bloon remains frozen.
    pub freeze: u16,
    /// Ticks the bloon remains stunned.
    pub stun: u16,
    /// Ticks the bloon remains slowed.
    pub slow: u16,
    /// Slow applied once the current freeze thaws.
    pub pending_slow: u16,
}

impl BloonMotion {
    /// Motion of a bloon entering at the start of `path`.
    #[must_use]
    pub fn at_entrance(path: &Path) -> Self {
        Self {
            position: path.start(),
            segment: 0,
            covered: 0,
            carry: 0,
            travelled: 0,
            freeze: 0,
            stun: 0,
            slow: 0,
            pending_slow: 0,
        }
    }

    /// Copy of the path progress without any status timers.
    #[must_use]
    pub const fn progress_only(&self) -> Self {
        Self {
            position: self.position,
            segment: self.segment,
            covered: self.covered,
            carry: self.carry,
            travelled: self.travelled,
            freeze: 0,
            stun: 0,
            slow: 0,
            pending_slow: 0,
        }
    }

    /// Reports whether a freeze currently holds the bloon.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.freeze > 0
    }
}

/// Result of stepping a bloon for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BloonStep {
    /// A freeze or stun kept the bloon in place.
    Held,
    /// The bloon advanced along the path.
    Moved,
    /// The bloon passed the final waypoint.
    Leaked,
}

/// Regrowth bookkeeping for bloons carrying the regrow modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Regrowth {
    /// Strongest kind the bloon may regrow into.
    pub ceiling: BloonKind,
    /// Ticks until the next regrowth step.
    pub timer: u16,
}

/// Periodic damage attached to a bloon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DamageOverTime {
    /// Damage per pulse.
    pub damage: u16,
    /// Ticks between pulses.
    pub interval: u16,
    /// Ticks until the next pulse.
    pub countdown: u16,
    /// Ticks before the effect expires.
    pub remaining: u16,
    /// Tower credited with pops caused by the effect.
    pub tower: Option<TowerId>,
}

impl DamageOverTime {
    /// Effect that pulses every `interval` ticks for `duration` ticks.
    #[must_use]
    pub fn new(damage: u16, interval: u16, duration: u16, tower: Option<TowerId>) -> Self {
        Self {
            damage,
            interval,
            countdown: interval,
            remaining: duration,
            tower,
        }
    }

    /// Reports whether the effect still deals damage.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.remaining > 0 && self.damage > 0
    }

    /// Advances the effect by one tick and returns the damage dealt this tick.
    pub fn tick(&mut self) -> u16 {
        if !self.is_active() {
            return 0;
        }

        self.remaining -= 1;
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return 0;
        }

        self.countdown = self.interval.max(1);
        self.damage
    }
}

/// Motion of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectileMotion {
    /// Fixed-point position.
    pub position: FixedPosition,
    /// Heading.
    pub angle: Angle,
    /// Pixels per tick.
    pub speed: u8,
    /// Ticks before the projectile expires.
    pub lifetime: u16,
}

impl ProjectileMotion {
    /// Turns the projectile to face `target`.
    pub fn steer_toward(&mut self, target: Position) {
        self.angle = Angle::between(self.position.to_position(), target);
    }
}

/// Result of stepping a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileStep {
    /// The projectile advanced and remains in play.
    Moved,
    /// The projectile's lifetime ran out.
    Expired,
    /// The projectile left the playfield and its margin.
    OutOfBounds,
}

/// Movement kernels parameterised by the simulation configuration.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    width: i32,
    height: i32,
    margin: i32,
    regrow_interval: u16,
    permafrost_slow: u16,
}

impl Movement {
    /// Creates the kernels for the provided configuration.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            width: i32::try_from(config.width).unwrap_or(i32::MAX),
            height: i32::try_from(config.height).unwrap_or(i32::MAX),
            margin: config.offscreen_margin,
            regrow_interval: config.regrow_interval,
            permafrost_slow: config.permafrost_slow_ticks,
        }
    }

    /// Ticks between regrowth steps.
    #[must_use]
    pub const fn regrow_interval(&self) -> u16 {
        self.regrow_interval
    }

    /// Advances a bloon along `path` using its kind's fixed-point `speed`.
    ///
    /// Frozen or stunned bloons spend no budget. Slowed bloons move at half
    /// speed. The budget may span several segments; whatever cannot be
    /// turned into a whole pixel is carried into the next tick.
    pub fn step_bloon(&self, path: &Path, motion: &mut BloonMotion, speed: u16) -> BloonStep {
        if motion.freeze > 0 || motion.stun > 0 {
            if motion.freeze > 0 {
                motion.freeze -= 1;
                if motion.freeze == 0 && motion.pending_slow > 0 {
                    motion.slow = motion.slow.max(motion.pending_slow);
                    motion.pending_slow = 0;
                }
            }
            motion.stun = motion.stun.saturating_sub(1);
            return BloonStep::Held;
        }

        let mut budget = i32::from(speed);
        if motion.slow > 0 {
            budget /= 2;
            motion.slow -= 1;
        }
        budget += motion.carry;

        loop {
            let Some(segment) = path.segment(motion.segment) else {
                return BloonStep::Leaked;
            };

            let remaining = (segment.length - motion.covered).max(0);
            let remaining_fixed = remaining.saturating_mul(FIXED_ONE);
            if budget >= remaining_fixed {
                budget -= remaining_fixed;
                motion.travelled += i64::from(remaining_fixed);
                motion.position = segment.to;
                motion.segment += 1;
                motion.covered = 0;
                if motion.segment >= path.segment_count() {
                    motion.carry = 0;
                    return BloonStep::Leaked;
                }
                continue;
            }

            let pixels = budget / FIXED_ONE;
            motion.covered += pixels;
            motion.position = along(segment, motion.covered);
            motion.travelled += i64::from(pixels * FIXED_ONE);
            motion.carry = budget - pixels * FIXED_ONE;
            return BloonStep::Moved;
        }
    }

    /// Pushes a bloon back toward the start of its current segment.
    ///
    /// The bloon never leaves its segment, so the push is capped at the
    /// distance already covered on it.
    pub fn knock_back(&self, path: &Path, motion: &mut BloonMotion, pixels: i32) {
        let Some(segment) = path.segment(motion.segment) else {
            return;
        };

        let pushed = pixels.clamp(0, motion.covered);
        if pushed == 0 {
            return;
        }

        motion.covered -= pushed;
        motion.position = along(segment, motion.covered);
        motion.travelled = (motion.travelled - i64::from(pushed * FIXED_ONE)).max(0);
        motion.carry = 0;
    }

    /// Applies one regrowth tick and returns the kind the bloon grows into.
    ///
    /// Frozen bloons and bloons already at their ceiling do not regrow.
    pub fn regrow(
        &self,
        kind: BloonKind,
        modifiers: Modifiers,
        frozen: bool,
        regrowth: &mut Regrowth,
    ) -> Option<BloonKind> {
        if !modifiers.is_regrow() || frozen || kind >= regrowth.ceiling {
            return None;
        }

        regrowth.timer = regrowth.timer.saturating_sub(1);
        if regrowth.timer > 0 {
            return None;
        }

        regrowth.timer = self.regrow_interval;
        Some(kind.next())
    }

    /// Slow a permafrost freeze leaves behind once it thaws.
    #[must_use]
    pub const fn permafrost_slow(&self) -> u16 {
        self.permafrost_slow
    }

    /// Advances a projectile by one tick.
    pub fn step_projectile(&self, motion: &mut ProjectileMotion) -> ProjectileStep {
        motion.lifetime = motion.lifetime.saturating_sub(1);
        if motion.lifetime == 0 {
            return ProjectileStep::Expired;
        }

        motion.position = motion
            .position
            .advanced(motion.angle, i32::from(motion.speed));
        if self.out_of_bounds(motion.position.to_position()) {
            return ProjectileStep::OutOfBounds;
        }
        ProjectileStep::Moved
    }

    fn out_of_bounds(&self, position: Position) -> bool {
        position.x() < -self.margin
            || position.y() < -self.margin
            || position.x() > self.width + self.margin
            || position.y() > self.height + self.margin
    }
}

/// Point `covered` pixels from the start of `segment`, interpolated from `from`.
fn along(segment: Segment, covered: i32) -> Position {
    if covered <= 0 || segment.length <= 0 {
        return segment.from;
    }
    if covered >= segment.length {
        return segment.to;
    }

    let scale = |delta: i32| {
        let scaled = i64::from(delta) * i64::from(covered) / i64::from(segment.length);
        i32::try_from(scaled).unwrap_or_default()
    };
    segment.from.offset(
        scale(segment.to.x() - segment.from.x()),
        scale(segment.to.y() - segment.from.y()),
    )
}

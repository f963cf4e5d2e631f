//! Tunable simulation limits and effect durations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits and constants the world is built with.
///
/// Every field has a default matching the standard game, so partial TOML
/// files only need to name the values they change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Playfield width in pixels.
    pub width: u32,
    /// Playfield height in pixels.
    pub height: u32,
    /// Side length of a spatial grid cell in pixels.
    pub cell_size: u32,
    /// Population cap on live bloons.
    pub max_live_bloons: usize,
    /// Node slots reserved for bloons. Spawns beyond this fail as allocation exhaustion.
    pub bloon_slots: usize,
    /// Node slots reserved for projectiles.
    pub projectile_slots: usize,
    /// Capacity of the deferred child ring buffer.
    pub deferred_capacity: usize,
    /// Deferred children spawned at most per tick.
    pub deferred_drain_per_tick: usize,
    /// Ticks a projectile lives before expiring.
    pub projectile_lifetime: u16,
    /// Side length of a projectile hitbox in pixels.
    pub projectile_size: u8,
    /// Distance beyond the playfield edge at which projectiles are discarded.
    pub offscreen_margin: i32,
    /// Bloons a single splash may damage besides the direct target.
    pub splash_max_targets: usize,
    /// Radius within which homing projectiles acquire bloons.
    pub homing_radius: i32,
    /// Ticks of target movement added when leading a shot.
    pub lead_factor: i32,
    /// Angle steps between projectiles in a fanned volley.
    pub fan_step: u8,
    /// Ticks between regrowth steps.
    pub regrow_interval: u16,
    /// Ticks an area freeze lasts.
    pub freeze_ticks: u16,
    /// Slow ticks applied when a permafrost freeze ends.
    pub permafrost_slow_ticks: u16,
    /// Slow ticks refreshed every tick by an aura.
    pub aura_slow_ticks: u16,
    /// Ticks a damage-over-time effect lasts.
    pub dot_duration: u16,
    /// Pixels a distraction hit pushes a bloon back.
    pub knockback: i32,
    /// Half the side length of a tower footprint.
    pub tower_half_extent: i32,
    /// Share of invested currency returned when selling.
    pub sell_refund_percent: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            cell_size: 20,
            max_live_bloons: 200,
            bloon_slots: 256,
            projectile_slots: 512,
            deferred_capacity: 32,
            deferred_drain_per_tick: 4,
            projectile_lifetime: 60,
            projectile_size: 6,
            offscreen_margin: 16,
            splash_max_targets: 6,
            homing_radius: 30,
            lead_factor: 3,
            fan_step: 8,
            regrow_interval: 90,
            freeze_ticks: 30,
            permafrost_slow_ticks: 60,
            aura_slow_ticks: 2,
            dot_duration: 120,
            knockback: 12,
            tower_half_extent: 8,
            sell_refund_percent: 70,
        }
    }
}

/// Reasons a configuration is unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// A size or capacity that must be positive is zero.
    #[error("`{field}` must be positive")]
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Deferred children could never leave the queue.
    #[error("`deferred_drain_per_tick` must be positive when the queue has capacity")]
    UndrainableQueue,
    /// Selling would return more than was paid.
    #[error("`sell_refund_percent` of {percent} exceeds 100")]
    RefundAbovePurchase {
        /// Configured percentage.
        percent: u32,
    },
}

impl SimulationConfig {
    /// Checks the configuration for values the world cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width as usize),
            ("height", self.height as usize),
            ("cell_size", self.cell_size as usize),
            ("max_live_bloons", self.max_live_bloons),
            ("bloon_slots", self.bloon_slots),
            ("projectile_slots", self.projectile_slots),
            ("projectile_lifetime", usize::from(self.projectile_lifetime)),
            ("regrow_interval", usize::from(self.regrow_interval)),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { field: *field });
        }

        if self.deferred_capacity > 0 && self.deferred_drain_per_tick == 0 {
            return Err(ConfigError::UndrainableQueue);
        }

        if self.sell_refund_percent > 100 {
            return Err(ConfigError::RefundAbovePurchase {
                percent: self.sell_refund_percent,
            });
        }

        Ok(())
    }

    /// Number of grid columns covering the playfield.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.width.div_ceil(self.cell_size)
    }

    /// Number of grid rows covering the playfield.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.height.div_ceil(self.cell_size)
    }
}

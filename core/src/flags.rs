//! Bit sets describing damage types, immunities, bloon modifiers and tower abilities.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Kind of damage carried by a projectile or direct effect.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DamageType: u8 {
        /// Pointed projectiles such as darts and tacks.
        const SHARP = 0b0000_0001;
        /// Bombs and other blast damage.
        const EXPLOSION = 0b0000_0010;
        /// Ice attacks.
        const FREEZE = 0b0000_0100;
        /// Damage no bloon is immune to.
        const NORMAL = 0b0000_1000;
        /// Energy attacks.
        const ENERGY = 0b0001_0000;
    }
}

bitflags! {
    /// Damage types a bloon kind ignores.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Immunity: u8 {
        /// Ignores [`DamageType::SHARP`].
        const SHARP = 0b0000_0001;
        /// Ignores [`DamageType::EXPLOSION`].
        const EXPLOSION = 0b0000_0010;
        /// Ignores [`DamageType::FREEZE`].
        const FREEZE = 0b0000_0100;
    }
}

impl Immunity {
    /// Reports whether the immunity set blocks the provided damage type.
    #[must_use]
    pub const fn blocks(self, damage: DamageType) -> bool {
        self.bits() & damage.bits() != 0
    }
}

bitflags! {
    /// Per-instance bloon modifiers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Invisible to towers without camo vision.
        const CAMO = 0b0000_0001;
        /// Regains layers over time up to the kind it spawned as.
        const REGROW = 0b0000_0010;
    }
}

impl Modifiers {
    /// Reports whether the camo modifier is set.
    #[must_use]
    pub const fn is_camo(self) -> bool {
        self.contains(Self::CAMO)
    }

    /// Reports whether the regrow modifier is set.
    #[must_use]
    pub const fn is_regrow(self) -> bool {
        self.contains(Self::REGROW)
    }
}

bitflags! {
    /// One-way abilities granted to a tower by its upgrades.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Abilities: u8 {
        /// Projectiles steer toward the nearest bloon every tick.
        const HOMING = 0b0000_0001;
        /// Slows every bloon in range every tick.
        const AURA = 0b0000_0010;
        /// Frozen bloons stay slowed after thawing.
        const PERMAFROST = 0b0000_0100;
        /// Hits may knock bloons back along the path.
        const DISTRACTION = 0b0000_1000;
        /// Hits remove the camo modifier.
        const CAMO_STRIP = 0b0001_0000;
        /// Children of glued bloons inherit the glue.
        const GLUE_SOAK = 0b0010_0000;
    }
}

macro_rules! bits_serde {
    ($($flags:ty),+) => {
        $(
            impl Serialize for $flags {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    self.bits().serialize(serializer)
                }
            }

            impl<'de> Deserialize<'de> for $flags {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let bits = u8::deserialize(deserializer)?;
                    Ok(<$flags>::from_bits_truncate(bits))
                }
            }
        )+
    };
}

bits_serde!(DamageType, Immunity, Modifiers, Abilities);

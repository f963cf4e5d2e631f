//! Integer geometry: pixel positions, fixed-point positions, angles and distances.

use serde::{Deserialize, Serialize};

/// Fixed-point scale used for speeds, sub-pixel carries and trig results.
pub const FIXED_ONE: i32 = 256;

const FIXED_SHIFT: u32 = 8;

/// Integer pixel coordinate where `(0, 0)` is the top-left corner of the playfield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a position from pixel coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical pixel coordinate, growing downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position shifted by the provided offsets.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared(self, other: Position) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }
}

/// Position stored with eight fractional bits per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixedPosition {
    x: i32,
    y: i32,
}

impl FixedPosition {
    /// Promotes a pixel position to fixed point.
    #[must_use]
    pub const fn from_position(position: Position) -> Self {
        Self {
            x: position.x.saturating_mul(FIXED_ONE),
            y: position.y.saturating_mul(FIXED_ONE),
        }
    }

    /// Truncates toward negative infinity to the containing pixel.
    #[must_use]
    pub const fn to_position(self) -> Position {
        Position::new(self.x >> FIXED_SHIFT, self.y >> FIXED_SHIFT)
    }

    /// Advances the position along `angle` by `speed` whole pixels.
    #[must_use]
    pub fn advanced(self, angle: Angle, speed: i32) -> Self {
        Self {
            x: self.x.saturating_add(angle.cos().saturating_mul(speed)),
            y: self.y.saturating_add(angle.sin().saturating_mul(speed)),
        }
    }
}

/// sin(i * 2π / 256) * 256 for the first quarter turn.
const QUARTER_SINE: [i32; 65] = [
    0, 6, 13, 19, 25, 31, 38, 44, 50, 56, 62, 68, 74, 80, 86, 92, 98, 104, 109, 115, 121, 126,
    132, 137, 142, 147, 152, 157, 162, 167, 172, 177, 181, 185, 190, 194, 198, 202, 206, 209,
    213, 216, 220, 223, 226, 229, 231, 234, 237, 239, 241, 243, 245, 247, 248, 250, 251, 252,
    253, 254, 255, 255, 256, 256, 256,
];

/// tan(i * 2π / 256) * 256 for the first octant.
const OCTANT_TANGENT: [i32; 33] = [
    0, 6, 13, 19, 25, 32, 38, 44, 51, 57, 64, 71, 78, 85, 92, 99, 106, 113, 121, 129, 137, 145,
    153, 162, 171, 180, 190, 200, 210, 221, 232, 244, 256,
];

/// Heading measured in 1/256ths of a full turn, clockwise from +x on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Angle(u8);

impl Angle {
    /// Facing right.
    pub const EAST: Self = Self(0);
    /// Facing down the screen.
    pub const SOUTH: Self = Self(64);
    /// Facing left.
    pub const WEST: Self = Self(128);
    /// Facing up the screen.
    pub const NORTH: Self = Self(192);

    /// Creates an angle from raw steps.
    #[must_use]
    pub const fn new(steps: u8) -> Self {
        Self(steps)
    }

    /// Raw step count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Rotates by a signed number of steps, wrapping around the circle.
    #[must_use]
    pub const fn rotated(self, steps: i32) -> Self {
        Self((self.0 as i32 + steps).rem_euclid(256) as u8)
    }

    /// Sine scaled by [`FIXED_ONE`].
    #[must_use]
    pub const fn sin(self) -> i32 {
        let step = self.0 as usize;
        let index = step % 64;
        match step / 64 {
            0 => QUARTER_SINE[index],
            1 => QUARTER_SINE[64 - index],
            2 => -QUARTER_SINE[index],
            _ => -QUARTER_SINE[64 - index],
        }
    }

    /// Cosine scaled by [`FIXED_ONE`].
    #[must_use]
    pub const fn cos(self) -> i32 {
        self.rotated(64).sin()
    }

    /// Integer atan2: heading that points from `from` toward `to`.
    ///
    /// Coincident points yield [`Angle::EAST`].
    #[must_use]
    pub fn between(from: Position, to: Position) -> Self {
        let dx = i64::from(to.x) - i64::from(from.x);
        let dy = i64::from(to.y) - i64::from(from.y);
        if dx == 0 && dy == 0 {
            return Self::EAST;
        }

        let (ax, ay) = (dx.abs(), dy.abs());
        let base = if ax >= ay {
            octant_step(ay * i64::from(FIXED_ONE) / ax)
        } else {
            64 - octant_step(ax * i64::from(FIXED_ONE) / ay)
        };

        let steps = match (dx >= 0, dy >= 0) {
            (true, true) => base,
            (false, true) => 128 - base,
            (false, false) => 128 + base,
            (true, false) => 256 - base,
        };
        Self((steps & 0xff) as u8)
    }
}

fn octant_step(ratio: i64) -> i64 {
    let mut best = 0;
    let mut best_error = i64::MAX;
    for (step, tangent) in OCTANT_TANGENT.iter().enumerate() {
        let error = (i64::from(*tangent) - ratio).abs();
        if error < best_error {
            best = step as i64;
            best_error = error;
        }
    }
    best
}

/// Integer square root, rounded down.
#[must_use]
pub fn isqrt(value: u64) -> u64 {
    let mut remainder = value;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;
    while bit > remainder {
        bit >>= 2;
    }
    while bit != 0 {
        if remainder >= root + bit {
            remainder -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Pixel distance between two positions.
///
/// Axis-aligned pairs use the exact coordinate difference; other pairs use
/// the Euclidean distance rounded to the nearest pixel.
#[must_use]
pub fn distance(a: Position, b: Position) -> i32 {
    if a.x == b.x {
        return clamp_i32(i64::from(a.y).abs_diff(i64::from(b.y)));
    }
    if a.y == b.y {
        return clamp_i32(i64::from(a.x).abs_diff(i64::from(b.x)));
    }

    let squared = a.distance_squared(b).unsigned_abs();
    let root = isqrt(squared);
    let rounded = if squared > root * root + root {
        root + 1
    } else {
        root
    };
    clamp_i32(rounded)
}

fn clamp_i32(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// Planar (x, z) vector helpers shared by every simulation system.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A point or direction on the ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, z: 0.0 };

    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Unit vector for a heading angle, using the same convention as [`Vec2::heading`].
    pub fn from_heading(angle: f32) -> Self {
        Self {
            x: angle.sin(),
            z: angle.cos(),
        }
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.z * self.z
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        (other - self).length_squared()
    }

    /// Returns the unit vector, or zero when the length is zero or not finite.
    pub fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON && len.is_finite() {
            Self::new(self.x / len, self.z / len)
        } else {
            Self::ZERO
        }
    }

    /// Scales the vector down so its length is at most `max`; shorter vectors pass through.
    pub fn clamp_length(self, max: f32) -> Self {
        let len_sq = self.length_squared();
        if len_sq > max * max {
            self.normalize_or_zero() * max
        } else {
            self
        }
    }

    /// Facing angle for this direction: `atan2(x, z)`, so +z is 0 rad.
    pub fn heading(self) -> f32 {
        self.x.atan2(self.z)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.z += rhs.z;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

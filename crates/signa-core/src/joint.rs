//! Joint positions
//!
//! A joint is addressed by the name of its node in the avatar skeleton.
//! Positions travel on the wire as `[x, y, z]` arrays.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

/// Name prefix reserved for facial rig nodes
pub const FACIAL_PREFIX: &str = "face";

/// 3D position in the avatar's local space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub const ORIGIN: Position3D = Position3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::ORIGIN
    }

    /// Linear interpolation, component-wise: `self + (other - self) * t`
    pub fn lerp(&self, other: &Position3D, t: f32) -> Position3D {
        Position3D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Distance to another position
    pub fn distance(&self, other: &Position3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Position3D {
    type Output = Position3D;

    fn add(self, rhs: Position3D) -> Position3D {
        Position3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Position3D {
    type Output = Position3D;

    fn mul(self, rhs: f32) -> Position3D {
        Position3D::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f32; 3]> for Position3D {
    fn from(v: [f32; 3]) -> Self {
        Position3D::new(v[0], v[1], v[2])
    }
}

impl From<Position3D> for [f32; 3] {
    fn from(p: Position3D) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Whether a node name belongs to the facial rig
pub fn is_facial_joint(name: &str) -> bool {
    name.starts_with(FACIAL_PREFIX)
}

//! Positions and locations in the host world.
//!
//! A [`Position`] is the three coordinates a countdown is anchored to. A
//! [`Location`] adds the facing direction reported by the host. Facing is
//! carried for completeness but never takes part in movement detection:
//! turning the camera must not cancel a countdown.

use serde::{Deserialize, Serialize};

/// A point in the world (`x`, `y`, `z`).
///
/// Equality is exact numeric comparison on all three axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// East/west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North/south coordinate.
    pub z: f64,
}

impl Position {
    /// Create a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether `other` differs from this position on any axis.
    ///
    /// Exact comparison: the host reports positions at its own granularity.
    #[allow(clippy::float_cmp)]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.x != other.x || self.y != other.y || self.z != other.z
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A position plus the facing direction of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Where the actor stands.
    pub position: Position,
    /// Horizontal facing in degrees.
    pub yaw: f32,
    /// Vertical facing in degrees.
    pub pitch: f32,
}

impl Location {
    /// Create a location facing yaw 0, pitch 0.
    pub const fn at(position: Position) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Return a copy of this location with a different facing.
    #[must_use]
    pub const fn facing(self, yaw: f32, pitch: f32) -> Self {
        Self {
            position: self.position,
            yaw,
            pitch,
        }
    }
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self::at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_axis_change_is_movement() {
        let anchor = Position::new(10.5, 64.0, -3.25);
        assert!(!anchor.differs_from(&anchor));
        assert!(Position::new(10.6, 64.0, -3.25).differs_from(&anchor));
        assert!(Position::new(10.5, 65.0, -3.25).differs_from(&anchor));
        assert!(Position::new(10.5, 64.0, -3.0).differs_from(&anchor));
    }

    #[test]
    fn facing_is_not_part_of_position() {
        let here = Location::at(Position::new(1.0, 2.0, 3.0));
        let turned = here.facing(90.0, -45.0);
        assert!(!turned.position.differs_from(&here.position));
        assert_ne!(turned, here);
    }

    #[test]
    fn display_lists_all_axes() {
        assert_eq!(Position::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }
}

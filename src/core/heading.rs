//! Compass heading derivation and direction classification.
//!
//! Heading comes from the horizontal magnetic field components only
//! (atan2 of my over mx, mapped into [0, 360)). This is a flat-plane
//! approximation with no tilt compensation; headings drift when the device
//! is not held level. Known limitation, kept deliberately.

use serde::{Deserialize, Serialize};

/// Derive a compass heading in degrees [0, 360) from the horizontal
/// magnetic field components.
pub fn heading_from_magnetic(mx: f64, my: f64) -> f64 {
    let mut degrees = my.atan2(mx).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    degrees
}

/// One of the eight compass octants, or Unknown for out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    Unknown,
}

impl Direction {
    /// Classify a heading into an octant. Half-open 45° intervals with
    /// North wrapping around zero. Expects [0, 360); normalization is the
    /// caller's job (see [`heading_from_magnetic`]). Anything escaping
    /// every interval yields Unknown.
    pub fn from_degrees(degrees: f64) -> Self {
        if degrees >= 337.5 || degrees < 22.5 {
            return Direction::North;
        }
        if degrees >= 22.5 && degrees < 67.5 {
            return Direction::NorthEast;
        }
        if degrees >= 67.5 && degrees < 112.5 {
            return Direction::East;
        }
        if degrees >= 112.5 && degrees < 157.5 {
            return Direction::SouthEast;
        }
        if degrees >= 157.5 && degrees < 202.5 {
            return Direction::South;
        }
        if degrees >= 202.5 && degrees < 247.5 {
            return Direction::SouthWest;
        }
        if degrees >= 247.5 && degrees < 292.5 {
            return Direction::West;
        }
        if degrees >= 292.5 && degrees < 337.5 {
            return Direction::NorthWest;
        }
        Direction::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::NorthEast => "North-East",
            Direction::East => "East",
            Direction::SouthEast => "South-East",
            Direction::South => "South",
            Direction::SouthWest => "South-West",
            Direction::West => "West",
            Direction::NorthWest => "North-West",
            Direction::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

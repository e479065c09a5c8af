//! Sample types for the motionlog ingest boundary.
//!
//! Every sensor delivers a 3-component float vector; the kind tag tells the
//! pipeline which window channel the reading belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A 3-component vector reading (x, y, z). Immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// The zero vector, also the average of an empty window.
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Which physical sensor a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    /// Linear acceleration (m/s²)
    Accelerometer,
    /// Angular velocity (rad/s)
    Gyroscope,
    /// Magnetic field (μT), used only to derive a compass heading
    Magnetometer,
}

impl SensorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated sensor reading with its capture timestamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub values: Vector3,
    pub timestamp: DateTime<Utc>,
}

impl SensorSample {
    /// Create a sample stamped with the current time.
    pub fn new(kind: SensorKind, values: Vector3) -> Self {
        Self {
            kind,
            values,
            timestamp: Utc::now(),
        }
    }

    /// Create a sample with an explicit capture timestamp.
    pub fn at(kind: SensorKind, values: Vector3, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            values,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3_zero() {
        assert_eq!(Vector3::ZERO, Vector3::new(0.0, 0.0, 0.0));
        assert!(Vector3::ZERO.is_finite());
    }

    #[test]
    fn test_vector3_finite_check() {
        assert!(Vector3::new(1.0, -2.5, 0.0).is_finite());
        assert!(!Vector3::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Vector3::new(0.0, f64::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_sample_kind_tag() {
        let sample = SensorSample::new(SensorKind::Gyroscope, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(sample.kind, SensorKind::Gyroscope);
        assert_eq!(sample.kind.as_str(), "gyroscope");
    }
}

//! Latest-value observation point.
//!
//! The ingest service publishes the most recent raw reading per sensor kind
//! and the most recent derived heading and direction here. Presentation
//! layers poll snapshots; the pipeline never depends on anything reading
//! them.

use crate::collector::types::{SensorKind, Vector3};
use crate::core::heading::Direction;
use std::sync::{Arc, Mutex};

/// Point-in-time copy of the latest observed values.
#[derive(Debug, Clone, Default)]
pub struct LiveSnapshot {
    pub acceleration: Option<Vector3>,
    pub angular_velocity: Option<Vector3>,
    pub magnetic_field: Option<Vector3>,
    pub heading_degrees: Option<f64>,
    pub direction: Option<Direction>,
}

/// Shared latest-value store, updated on every accepted sample.
#[derive(Debug, Default)]
pub struct LiveView {
    inner: Mutex<LiveSnapshot>,
}

impl LiveView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the latest raw reading for a sensor kind.
    pub fn set_sample(&self, kind: SensorKind, values: Vector3) {
        let mut snapshot = self.inner.lock().unwrap();
        match kind {
            SensorKind::Accelerometer => snapshot.acceleration = Some(values),
            SensorKind::Gyroscope => snapshot.angular_velocity = Some(values),
            SensorKind::Magnetometer => snapshot.magnetic_field = Some(values),
        }
    }

    /// Publish the latest derived heading; the direction label follows.
    pub fn set_heading(&self, degrees: f64) {
        let mut snapshot = self.inner.lock().unwrap();
        snapshot.heading_degrees = Some(degrees);
        snapshot.direction = Some(Direction::from_degrees(degrees));
    }

    /// Get a copy of everything currently observed.
    pub fn snapshot(&self) -> LiveSnapshot {
        self.inner.lock().unwrap().clone()
    }

    /// Latest raw reading for one sensor kind.
    pub fn latest(&self, kind: SensorKind) -> Option<Vector3> {
        let snapshot = self.inner.lock().unwrap();
        match kind {
            SensorKind::Accelerometer => snapshot.acceleration,
            SensorKind::Gyroscope => snapshot.angular_velocity,
            SensorKind::Magnetometer => snapshot.magnetic_field,
        }
    }

    /// Latest derived direction label.
    pub fn direction(&self) -> Option<Direction> {
        self.inner.lock().unwrap().direction
    }
}

/// Thread-safe shared live view.
pub type SharedLiveView = Arc<LiveView>;

/// Create a new shared live view.
pub fn create_shared_view() -> SharedLiveView {
    Arc::new(LiveView::new())
}

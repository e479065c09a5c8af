//! Per-window sample accumulation.
//!
//! Three channels (acceleration, angular velocity, derived heading) share a
//! single lock so a window flush drains all of them atomically with respect
//! to concurrent `record_*` calls. A sample is either in the window being
//! drained or in the next one, never split and never lost.

use crate::collector::types::Vector3;
use std::sync::{Arc, Mutex};

/// Raw contents of one accumulation window.
#[derive(Debug, Default)]
struct Channels {
    acceleration: Vec<Vector3>,
    angular_velocity: Vec<Vector3>,
    heading_degrees: Vec<f64>,
}

/// Everything drained from one completed window.
#[derive(Debug, Default)]
pub struct DrainedWindow {
    pub acceleration: Vec<Vector3>,
    pub angular_velocity: Vec<Vector3>,
    pub heading_degrees: Vec<f64>,
}

impl DrainedWindow {
    /// Total sample count across all channels.
    pub fn sample_count(&self) -> usize {
        self.acceleration.len() + self.angular_velocity.len() + self.heading_degrees.len()
    }
}

/// Shared accumulation buffers for the window currently open.
///
/// Cleared to fresh empty collections at every window boundary; never holds
/// samples from two different windows.
#[derive(Debug, Default)]
pub struct WindowBuffers {
    inner: Mutex<Channels>,
}

impl WindowBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one acceleration sample into the open window.
    pub fn record_acceleration(&self, v: Vector3) {
        self.inner.lock().unwrap().acceleration.push(v);
    }

    /// Record one angular-velocity sample into the open window.
    pub fn record_angular_velocity(&self, v: Vector3) {
        self.inner.lock().unwrap().angular_velocity.push(v);
    }

    /// Record one derived heading sample (degrees) into the open window.
    pub fn record_heading(&self, degrees: f64) {
        self.inner.lock().unwrap().heading_degrees.push(degrees);
    }

    /// Take everything accumulated so far and reset all channels to fresh
    /// empty collections, atomically.
    pub fn drain(&self) -> DrainedWindow {
        let mut channels = self.inner.lock().unwrap();
        DrainedWindow {
            acceleration: std::mem::take(&mut channels.acceleration),
            angular_velocity: std::mem::take(&mut channels.angular_velocity),
            heading_degrees: std::mem::take(&mut channels.heading_degrees),
        }
    }

    /// Discard everything accumulated so far.
    pub fn clear(&self) {
        let mut channels = self.inner.lock().unwrap();
        channels.acceleration = Vec::new();
        channels.angular_velocity = Vec::new();
        channels.heading_degrees = Vec::new();
    }

    /// True when nothing has been recorded since the last drain or clear.
    pub fn is_empty(&self) -> bool {
        let channels = self.inner.lock().unwrap();
        channels.acceleration.is_empty()
            && channels.angular_velocity.is_empty()
            && channels.heading_degrees.is_empty()
    }
}

/// Thread-safe shared window buffers.
pub type SharedWindowBuffers = Arc<WindowBuffers>;

/// Create a new shared buffer set.
pub fn create_shared_buffers() -> SharedWindowBuffers {
    Arc::new(WindowBuffers::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_record_and_drain() {
        let buffers = WindowBuffers::new();
        assert!(buffers.is_empty());

        buffers.record_acceleration(Vector3::new(1.0, 0.0, 0.0));
        buffers.record_angular_velocity(Vector3::new(0.0, 2.0, 0.0));
        buffers.record_heading(45.0);
        assert!(!buffers.is_empty());

        let drained = buffers.drain();
        assert_eq!(drained.acceleration.len(), 1);
        assert_eq!(drained.angular_velocity.len(), 1);
        assert_eq!(drained.heading_degrees, vec![45.0]);
        assert_eq!(drained.sample_count(), 3);

        // Drain resets to a fresh window
        assert!(buffers.is_empty());
        assert_eq!(buffers.drain().sample_count(), 0);
    }

    #[test]
    fn test_clear_discards_samples() {
        let buffers = WindowBuffers::new();
        buffers.record_heading(10.0);
        buffers.record_heading(20.0);
        buffers.clear();
        assert!(buffers.is_empty());
    }

    #[test]
    fn test_concurrent_record_and_drain_loses_nothing() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 2_000;

        let buffers = create_shared_buffers();
        let mut handles = Vec::new();

        for _ in 0..WRITERS {
            let buffers = buffers.clone();
            handles.push(thread::spawn(move || {
                for i in 0..PER_WRITER {
                    buffers.record_acceleration(Vector3::new(i as f64, 0.0, 0.0));
                }
            }));
        }

        // Drain repeatedly while writers run, simulating window boundaries
        let mut drained_total = 0usize;
        while handles.iter().any(|h| !h.is_finished()) {
            drained_total += buffers.drain().acceleration.len();
        }
        for handle in handles {
            handle.join().unwrap();
        }
        drained_total += buffers.drain().acceleration.len();

        assert_eq!(drained_total, WRITERS * PER_WRITER);
        assert!(buffers.is_empty());
    }
}

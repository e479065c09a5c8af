//! Simulated IMU source.
//!
//! Desktop hosts have no accelerometer, gyroscope, or magnetometer, so
//! `--simulate` (and the replay demo) feed the pipeline with deterministic
//! synthetic readings instead: slow sinusoids around plausible resting
//! values, including a magnetic field vector that sweeps the compass.

use crate::collector::ingest::IngestHandle;
use crate::collector::types::SensorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Sample emission period (~20 Hz, in the range of SENSOR_DELAY_NORMAL).
const EMIT_PERIOD: Duration = Duration::from_millis(50);

/// Generates one synthetic reading per sensor kind per step.
#[derive(Debug, Default)]
pub struct SimulatedImu {
    step: u64,
}

impl SimulatedImu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one step and produce the next (accel, gyro, mag) triple.
    pub fn next_readings(&mut self) -> ([f64; 3], [f64; 3], [f64; 3]) {
        let t = self.step as f64 * 0.05;
        self.step += 1;

        // Resting device with gravity on z and a gentle wobble
        let accel = [0.3 * t.sin(), 0.2 * (t * 0.7).cos(), 9.81 + 0.1 * t.sin()];
        let gyro = [0.05 * (t * 1.3).sin(), 0.04 * t.cos(), 0.02 * (t * 0.4).sin()];

        // Horizontal field sweeping a full compass turn every ~60 s
        let sweep = (t * std::f64::consts::TAU / 60.0).rem_euclid(std::f64::consts::TAU);
        let mag = [30.0 * sweep.cos(), 30.0 * sweep.sin(), -20.0];

        (accel, gyro, mag)
    }
}

/// Background thread pushing simulated readings through an ingest handle.
pub struct SimulatedSource {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimulatedSource {
    pub fn start(handle: IngestHandle) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = std::thread::spawn(move || {
            let mut imu = SimulatedImu::new();
            while flag.load(Ordering::SeqCst) {
                let (accel, gyro, mag) = imu.next_readings();
                // Unavailable kinds are rejected by the handle; that is fine,
                // the enabled channels keep flowing.
                let _ = handle.push(SensorKind::Accelerometer, &accel);
                let _ = handle.push(SensorKind::Gyroscope, &gyro);
                let _ = handle.push(SensorKind::Magnetometer, &mag);
                std::thread::sleep(EMIT_PERIOD);
            }
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_are_finite_triples() {
        let mut imu = SimulatedImu::new();
        for _ in 0..1_000 {
            let (accel, gyro, mag) = imu.next_readings();
            for v in accel.iter().chain(gyro.iter()).chain(mag.iter()) {
                assert!(v.is_finite());
            }
        }
    }

    #[test]
    fn test_magnetic_field_sweeps() {
        let mut imu = SimulatedImu::new();
        let (_, _, first) = imu.next_readings();
        for _ in 0..200 {
            imu.next_readings();
        }
        let (_, _, later) = imu.next_readings();
        // After 10 simulated seconds the field direction has moved
        assert!((first[0] - later[0]).abs() > 1.0 || (first[1] - later[1]).abs() > 1.0);
    }
}

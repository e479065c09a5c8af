//! Sensor ingest boundary.
//!
//! Platform callbacks push raw readings through an [`IngestHandle`]; a
//! single service thread receives them and routes them into the window
//! buffers. Validation happens at the push boundary: a malformed payload
//! drops just that sample, and a kind the host does not provide is rejected
//! outright so its window channel stays empty forever.

use crate::collector::types::{SensorKind, SensorSample, Vector3};
use crate::config::SourceConfig;
use crate::core::buffer::SharedWindowBuffers;
use crate::core::heading::heading_from_magnetic;
use crate::live::SharedLiveView;
use crate::stats::SharedAgentStats;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Channel capacity between platform callbacks and the service thread.
const INGEST_QUEUE_CAPACITY: usize = 10_000;

/// Poll interval for the service thread's shutdown check.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Errors surfaced at the ingest boundary.
#[derive(Debug)]
pub enum IngestError {
    /// Payload did not have exactly 3 finite components; the sample is dropped.
    MalformedSample { kind: SensorKind, len: usize },
    /// The sensor kind is absent (or disabled) on this host.
    SensorUnavailable(SensorKind),
    /// The ingest queue is full; the sample is dropped, never blocked on.
    QueueFull(SensorKind),
    /// The service side of the channel is gone.
    ChannelClosed,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::MalformedSample { kind, len } => {
                write!(f, "malformed {kind} sample: expected 3 components, got {len}")
            }
            IngestError::SensorUnavailable(kind) => {
                write!(f, "sensor unavailable: {kind}")
            }
            IngestError::QueueFull(kind) => {
                write!(f, "ingest queue full, {kind} sample dropped")
            }
            IngestError::ChannelClosed => write!(f, "ingest channel closed"),
        }
    }
}

impl std::error::Error for IngestError {}

/// Owner of the ingest channel. Hand out [`IngestHandle`]s to sample
/// producers; give the receiver to [`IngestService::start`].
pub struct SensorIngest {
    sender: Sender<SensorSample>,
    receiver: Receiver<SensorSample>,
    sources: SourceConfig,
    stats: SharedAgentStats,
}

impl SensorIngest {
    pub fn new(sources: SourceConfig, stats: SharedAgentStats) -> Self {
        let (sender, receiver) = bounded(INGEST_QUEUE_CAPACITY);
        Self {
            sender,
            receiver,
            sources,
            stats,
        }
    }

    /// Get a cloneable push handle for platform callbacks.
    pub fn handle(&self) -> IngestHandle {
        IngestHandle {
            sender: self.sender.clone(),
            sources: self.sources,
            stats: self.stats.clone(),
        }
    }

    /// Get the receiving side of the channel.
    pub fn receiver(&self) -> &Receiver<SensorSample> {
        &self.receiver
    }
}

/// Push side of the ingest boundary. Cheap to clone; one per event source.
#[derive(Clone)]
pub struct IngestHandle {
    sender: Sender<SensorSample>,
    sources: SourceConfig,
    stats: SharedAgentStats,
}

impl IngestHandle {
    /// Push a raw reading stamped with the current time.
    pub fn push(&self, kind: SensorKind, values: &[f64]) -> Result<(), IngestError> {
        self.push_at(kind, values, Utc::now())
    }

    /// Push a raw reading with an explicit capture timestamp.
    pub fn push_at(
        &self,
        kind: SensorKind,
        values: &[f64],
        timestamp: DateTime<Utc>,
    ) -> Result<(), IngestError> {
        if !self.sources.enabled(kind) {
            return Err(IngestError::SensorUnavailable(kind));
        }

        if values.len() != 3 {
            self.stats.record_malformed_dropped();
            return Err(IngestError::MalformedSample {
                kind,
                len: values.len(),
            });
        }

        let vector = Vector3::new(values[0], values[1], values[2]);
        if !vector.is_finite() {
            self.stats.record_malformed_dropped();
            return Err(IngestError::MalformedSample { kind, len: 3 });
        }

        // Platform callbacks must never block on a slow consumer: if the
        // queue is full the sample is dropped and counted, not waited on.
        self.sender
            .try_send(SensorSample::at(kind, vector, timestamp))
            .map_err(|e| match e {
                crossbeam_channel::TrySendError::Full(_) => {
                    self.stats.record_queue_full_dropped();
                    IngestError::QueueFull(kind)
                }
                crossbeam_channel::TrySendError::Disconnected(_) => IngestError::ChannelClosed,
            })
    }
}

/// Service thread routing validated samples into the window buffers and
/// the live view.
pub struct IngestService {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl IngestService {
    /// Spawn the routing thread.
    pub fn start(
        receiver: Receiver<SensorSample>,
        buffers: SharedWindowBuffers,
        live: SharedLiveView,
        stats: SharedAgentStats,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let thread = std::thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                match receiver.recv_timeout(RECV_TIMEOUT) {
                    Ok(sample) => route_sample(&sample, &buffers, &live, &stats),
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    /// Stop the routing thread. Samples already queued are dropped.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for IngestService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Route one accepted sample. Magnetometer readings are converted to a
/// heading at ingest time: the pipeline averages per-sample azimuths, not
/// the heading of an averaged field vector.
fn route_sample(
    sample: &SensorSample,
    buffers: &SharedWindowBuffers,
    live: &SharedLiveView,
    stats: &SharedAgentStats,
) {
    live.set_sample(sample.kind, sample.values);
    stats.record_sample(sample.kind);

    match sample.kind {
        SensorKind::Accelerometer => buffers.record_acceleration(sample.values),
        SensorKind::Gyroscope => buffers.record_angular_velocity(sample.values),
        SensorKind::Magnetometer => {
            let heading = heading_from_magnetic(sample.values.x, sample.values.y);
            buffers.record_heading(heading);
            live.set_heading(heading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::create_shared_buffers;
    use crate::core::heading::Direction;
    use crate::live::create_shared_view;
    use crate::stats::create_shared_stats;

    fn full_sources() -> SourceConfig {
        SourceConfig::from_csv("all")
    }

    #[test]
    fn test_push_validates_length() {
        let stats = create_shared_stats();
        let ingest = SensorIngest::new(full_sources(), stats.clone());
        let handle = ingest.handle();

        let err = handle
            .push(SensorKind::Accelerometer, &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { len: 2, .. }));
        assert_eq!(stats.snapshot().malformed_dropped, 1);

        // A bad sample drops only itself
        handle
            .push(SensorKind::Accelerometer, &[1.0, 2.0, 3.0])
            .unwrap();
        assert_eq!(ingest.receiver().len(), 1);
    }

    #[test]
    fn test_push_rejects_non_finite() {
        let ingest = SensorIngest::new(full_sources(), create_shared_stats());
        let handle = ingest.handle();

        let err = handle
            .push(SensorKind::Gyroscope, &[f64::NAN, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSample { .. }));
    }

    #[test]
    fn test_push_rejects_unavailable_kind() {
        let sources = SourceConfig::from_csv("accelerometer");
        let ingest = SensorIngest::new(sources, create_shared_stats());
        let handle = ingest.handle();

        let err = handle
            .push(SensorKind::Magnetometer, &[1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::SensorUnavailable(SensorKind::Magnetometer)
        ));
    }

    #[test]
    fn test_push_drops_instead_of_blocking_when_queue_full() {
        let stats = create_shared_stats();
        // No service attached, so the queue only fills
        let ingest = SensorIngest::new(full_sources(), stats.clone());
        let handle = ingest.handle();

        for _ in 0..INGEST_QUEUE_CAPACITY {
            handle
                .push(SensorKind::Accelerometer, &[0.0, 0.0, 9.81])
                .unwrap();
        }

        // The next push must return immediately with the sample dropped,
        // not stall the producer until a consumer appears
        let start = std::time::Instant::now();
        let err = handle
            .push(SensorKind::Accelerometer, &[0.0, 0.0, 9.81])
            .unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(matches!(
            err,
            IngestError::QueueFull(SensorKind::Accelerometer)
        ));
        assert_eq!(stats.snapshot().queue_full_dropped, 1);
        assert_eq!(ingest.receiver().len(), INGEST_QUEUE_CAPACITY);
    }

    #[test]
    fn test_stopped_service_routes_nothing() {
        let stats = create_shared_stats();
        let buffers = create_shared_buffers();
        let ingest = SensorIngest::new(full_sources(), stats.clone());
        let handle = ingest.handle();

        let mut service = IngestService::start(
            ingest.receiver().clone(),
            buffers.clone(),
            create_shared_view(),
            stats.clone(),
        );
        service.stop();

        // Pushed samples stay queued; the buffers no longer grow while
        // nothing is draining them (the paused agent relies on this)
        handle
            .push(SensorKind::Accelerometer, &[1.0, 0.0, 0.0])
            .unwrap();
        std::thread::sleep(Duration::from_millis(200));

        assert!(buffers.is_empty());
        assert_eq!(stats.snapshot().accel_samples, 0);
        assert_eq!(ingest.receiver().len(), 1);
    }

    #[test]
    fn test_service_routes_samples() {
        let stats = create_shared_stats();
        let buffers = create_shared_buffers();
        let live = create_shared_view();
        let ingest = SensorIngest::new(full_sources(), stats.clone());
        let handle = ingest.handle();

        let mut service = IngestService::start(
            ingest.receiver().clone(),
            buffers.clone(),
            live.clone(),
            stats.clone(),
        );

        handle.push(SensorKind::Accelerometer, &[1.0, 0.0, 0.0]).unwrap();
        handle.push(SensorKind::Accelerometer, &[3.0, 0.0, 0.0]).unwrap();
        // East-pointing horizontal field: heading 90°
        handle.push(SensorKind::Magnetometer, &[0.0, 1.0, 0.0]).unwrap();

        // Give the service thread time to drain the queue
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while stats.snapshot().mag_samples < 1 && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        service.stop();

        let drained = buffers.drain();
        assert_eq!(drained.acceleration.len(), 2);
        assert_eq!(drained.heading_degrees.len(), 1);
        assert!((drained.heading_degrees[0] - 90.0).abs() < 1e-9);

        assert_eq!(live.direction(), Some(Direction::East));
        assert_eq!(stats.snapshot().accel_samples, 2);
    }
}

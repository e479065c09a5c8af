//! Session statistics.
//!
//! Atomic counters for everything the agent does: samples accepted per
//! sensor kind, malformed payloads dropped, windows flushed, rows written,
//! append failures. Counters persist to a small JSON file so `motionlog
//! status` can report across sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::collector::types::SensorKind;

/// Counter set for the current session.
#[derive(Debug)]
pub struct AgentStats {
    accel_samples: AtomicU64,
    gyro_samples: AtomicU64,
    mag_samples: AtomicU64,
    malformed_dropped: AtomicU64,
    queue_full_dropped: AtomicU64,
    windows_flushed: AtomicU64,
    records_written: AtomicU64,
    append_failures: AtomicU64,
    session_start: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl AgentStats {
    pub fn new() -> Self {
        Self {
            accel_samples: AtomicU64::new(0),
            gyro_samples: AtomicU64::new(0),
            mag_samples: AtomicU64::new(0),
            malformed_dropped: AtomicU64::new(0),
            queue_full_dropped: AtomicU64::new(0),
            windows_flushed: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            append_failures: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a stats set that loads from and saves to the given path.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            eprintln!("Note: Could not load previous session stats: {e}");
        }

        stats
    }

    /// Record an accepted sample.
    pub fn record_sample(&self, kind: SensorKind) {
        let counter = match kind {
            SensorKind::Accelerometer => &self.accel_samples,
            SensorKind::Gyroscope => &self.gyro_samples,
            SensorKind::Magnetometer => &self.mag_samples,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a payload dropped at the ingest boundary.
    pub fn record_malformed_dropped(&self) {
        self.malformed_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a sample dropped because the ingest queue was full.
    pub fn record_queue_full_dropped(&self) {
        self.queue_full_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed window flush.
    pub fn record_window_flushed(&self) {
        self.windows_flushed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a row successfully appended to the log.
    pub fn record_record_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed append.
    pub fn record_append_failure(&self) {
        self.append_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accel_samples: self.accel_samples.load(Ordering::Relaxed),
            gyro_samples: self.gyro_samples.load(Ordering::Relaxed),
            mag_samples: self.mag_samples.load(Ordering::Relaxed),
            malformed_dropped: self.malformed_dropped.load(Ordering::Relaxed),
            queue_full_dropped: self.queue_full_dropped.load(Ordering::Relaxed),
            windows_flushed: self.windows_flushed.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            append_failures: self.append_failures.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            "Session Statistics:\n\
             - Acceleration samples: {}\n\
             - Angular velocity samples: {}\n\
             - Magnetometer samples: {}\n\
             - Malformed samples dropped: {}\n\
             - Queue-full samples dropped: {}\n\
             - Windows flushed: {}\n\
             - Records written: {}\n\
             - Append failures: {}\n\
             - Session duration: {} seconds",
            snapshot.accel_samples,
            snapshot.gyro_samples,
            snapshot.mag_samples,
            snapshot.malformed_dropped,
            snapshot.queue_full_dropped,
            snapshot.windows_flushed,
            snapshot.records_written,
            snapshot.append_failures,
            snapshot.session_duration_secs
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let snapshot = self.snapshot();
            let persisted = PersistedStats {
                accel_samples: snapshot.accel_samples,
                gyro_samples: snapshot.gyro_samples,
                mag_samples: snapshot.mag_samples,
                malformed_dropped: snapshot.malformed_dropped,
                queue_full_dropped: snapshot.queue_full_dropped,
                windows_flushed: snapshot.windows_flushed,
                records_written: snapshot.records_written,
                append_failures: snapshot.append_failures,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load counters from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.accel_samples
                    .store(persisted.accel_samples, Ordering::Relaxed);
                self.gyro_samples
                    .store(persisted.gyro_samples, Ordering::Relaxed);
                self.mag_samples
                    .store(persisted.mag_samples, Ordering::Relaxed);
                self.malformed_dropped
                    .store(persisted.malformed_dropped, Ordering::Relaxed);
                self.queue_full_dropped
                    .store(persisted.queue_full_dropped, Ordering::Relaxed);
                self.windows_flushed
                    .store(persisted.windows_flushed, Ordering::Relaxed);
                self.records_written
                    .store(persisted.records_written, Ordering::Relaxed);
                self.append_failures
                    .store(persisted.append_failures, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.accel_samples.store(0, Ordering::Relaxed);
        self.gyro_samples.store(0, Ordering::Relaxed);
        self.mag_samples.store(0, Ordering::Relaxed);
        self.malformed_dropped.store(0, Ordering::Relaxed);
        self.queue_full_dropped.store(0, Ordering::Relaxed);
        self.windows_flushed.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.append_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for AgentStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the session counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub accel_samples: u64,
    pub gyro_samples: u64,
    pub mag_samples: u64,
    pub malformed_dropped: u64,
    pub queue_full_dropped: u64,
    pub windows_flushed: u64,
    pub records_written: u64,
    pub append_failures: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Counter format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    accel_samples: u64,
    gyro_samples: u64,
    mag_samples: u64,
    malformed_dropped: u64,
    queue_full_dropped: u64,
    windows_flushed: u64,
    records_written: u64,
    append_failures: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared stats.
pub type SharedAgentStats = Arc<AgentStats>;

/// Create a new shared stats set.
pub fn create_shared_stats() -> SharedAgentStats {
    Arc::new(AgentStats::new())
}

/// Create a new shared stats set with persistence.
pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedAgentStats {
    Arc::new(AgentStats::with_persistence(path))
}

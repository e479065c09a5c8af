//! Motionlog - windowed IMU aggregation with append-only CSV logging.
//!
//! This library ingests timestamped accelerometer, gyroscope, and
//! magnetometer readings, groups them into fixed-duration windows, averages
//! each channel per window, derives a compass direction from the averaged
//! heading, and appends one summary row per window to a CSV log.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Motionlog Agent                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │   Ingest    │──▶│   Window    │──▶│  Averager + │        │
//! │  │  (3 kinds)  │   │   Buffers   │   │  Formatter  │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! │         │                 ▲                  │              │
//! │         ▼                 │ tick             ▼              │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐        │
//! │  │  Live View  │   │  Scheduler  │   │  CSV Sink   │        │
//! │  └─────────────┘   └─────────────┘   └─────────────┘        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Samples flow in asynchronously relative to the timer; the window buffers
//! share a single lock so a boundary never observes a half-recorded sample
//! and never loses one. Heading is a flat-plane atan2 of the horizontal
//! magnetic field components (no tilt compensation).
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use motionlog::{collector, config, core, live, sink, stats};
//!
//! let agent_stats = stats::create_shared_stats();
//! let buffers = core::create_shared_buffers();
//! let view = live::create_shared_view();
//!
//! let ingest = collector::SensorIngest::new(
//!     config::SourceConfig::default(),
//!     agent_stats.clone(),
//! );
//! let handle = ingest.handle();
//!
//! let _service = collector::IngestService::start(
//!     ingest.receiver().clone(),
//!     buffers.clone(),
//!     view.clone(),
//!     agent_stats.clone(),
//! );
//! let _scheduler = core::WindowScheduler::start(
//!     Duration::from_secs(1),
//!     buffers,
//!     sink::CsvSink::new("sensor_log.csv"),
//!     agent_stats,
//! );
//!
//! // Platform callbacks push readings through the handle
//! handle
//!     .push(collector::SensorKind::Accelerometer, &[0.0, 0.0, 9.81])
//!     .expect("push failed");
//! ```

pub mod collector;
pub mod config;
pub mod core;
pub mod live;
pub mod sink;
pub mod stats;

// Re-export key types at crate root for convenience
pub use collector::{
    IngestError, IngestHandle, IngestService, SensorIngest, SensorKind, SensorSample, Vector3,
};
pub use config::{Config, SourceConfig};
pub use core::{Direction, FlushNotice, WindowBuffers, WindowScheduler};
pub use live::{LiveSnapshot, LiveView, SharedLiveView};
pub use sink::{CsvSink, Record, WindowAggregate, CSV_HEADER};
pub use stats::{AgentStats, SharedAgentStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

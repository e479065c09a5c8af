//! Sensor ingest for the motionlog agent.
//!
//! The platform sensor subsystem pushes raw readings through an
//! [`IngestHandle`]; validation and routing into the window buffers happen
//! here. A simulated source is included for hosts without IMU hardware.

pub mod ingest;
pub mod sim;
pub mod types;

// Re-export commonly used types
pub use ingest::{IngestError, IngestHandle, IngestService, SensorIngest};
pub use sim::{SimulatedImu, SimulatedSource};
pub use types::{SensorKind, SensorSample, Vector3};

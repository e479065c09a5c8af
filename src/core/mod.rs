//! Core pipeline for the motionlog agent.
//!
//! This module contains:
//! - Window buffers accumulating samples under one lock
//! - Averaging of each window channel
//! - Heading derivation and compass classification
//! - The periodic scheduler driving window boundaries

pub mod average;
pub mod buffer;
pub mod heading;
pub mod scheduler;

// Re-export commonly used types
pub use average::{average, average_scalar};
pub use buffer::{create_shared_buffers, DrainedWindow, SharedWindowBuffers, WindowBuffers};
pub use heading::{heading_from_magnetic, Direction};
pub use scheduler::{FlushNotice, WindowScheduler};

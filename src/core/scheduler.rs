//! Window boundary scheduling.
//!
//! A dedicated thread ticks on a fixed wall-clock cadence, independent of
//! sample arrival. The first tick only arms the pipeline (there is no prior
//! window to flush; anything recorded before it is discarded, matching the
//! recording gate of the original logger). Every tick after that drains the
//! buffers atomically, then averages, formats, and appends outside the
//! buffer lock so slow I/O never stalls ingestion. An empty window still
//! flushes an all-zero row.

use crate::core::buffer::SharedWindowBuffers;
use crate::core::heading::Direction;
use crate::sink::{CsvSink, Record, WindowAggregate};
use crate::stats::SharedAgentStats;
use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

/// Scheduler lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    /// Waiting for the first tick; nothing to flush yet.
    Idle,
    /// A window is open; every tick flushes and opens the next one.
    Accumulating,
}

/// Summary of one completed flush, for live display.
#[derive(Debug, Clone)]
pub struct FlushNotice {
    pub timestamp: DateTime<Local>,
    pub acceleration_samples: usize,
    pub angular_velocity_samples: usize,
    pub heading_samples: usize,
    pub avg_heading_degrees: f64,
    pub direction: Direction,
}

/// Periodic window driver. Stopping cancels future ticks immediately; an
/// in-flight flush is allowed to complete.
pub struct WindowScheduler {
    shutdown: Sender<()>,
    notices: Receiver<FlushNotice>,
    thread: Option<JoinHandle<()>>,
}

impl WindowScheduler {
    /// Spawn the tick thread with the given window duration.
    pub fn start(
        interval: Duration,
        buffers: SharedWindowBuffers,
        sink: CsvSink,
        stats: SharedAgentStats,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let (notice_tx, notice_rx) = unbounded::<FlushNotice>();

        let thread = std::thread::spawn(move || {
            run_ticks(interval, &shutdown_rx, &notice_tx, &buffers, &sink, &stats);
        });

        Self {
            shutdown: shutdown_tx,
            notices: notice_rx,
            thread: Some(thread),
        }
    }

    /// Per-flush summaries, for a presentation layer to consume.
    pub fn notices(&self) -> &Receiver<FlushNotice> {
        &self.notices
    }

    /// Cancel future ticks and wait for the worker to finish.
    pub fn stop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WindowScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_ticks(
    interval: Duration,
    shutdown: &Receiver<()>,
    notices: &Sender<FlushNotice>,
    buffers: &SharedWindowBuffers,
    sink: &CsvSink,
    stats: &SharedAgentStats,
) {
    let mut state = SchedulerState::Idle;

    loop {
        // Sleeping on the shutdown channel makes cancellation immediate
        // instead of waiting out the rest of the window.
        match shutdown.recv_timeout(interval) {
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }

        match state {
            SchedulerState::Idle => {
                // Arm only: no prior window exists. Discard anything that
                // arrived before the first boundary so window 1 holds
                // exactly one window's worth of samples.
                buffers.clear();
                state = SchedulerState::Accumulating;
            }
            SchedulerState::Accumulating => {
                let window = buffers.drain();

                // Everything below runs outside the buffer lock.
                let aggregate = WindowAggregate::from_window(Local::now(), &window);
                let record = Record::from_aggregate(&aggregate);

                stats.record_window_flushed();
                match sink.append(&record) {
                    Ok(()) => stats.record_record_written(),
                    Err(e) => {
                        // This flush is lost; the next tick proceeds normally.
                        eprintln!("motionlog: could not append record: {e}");
                        stats.record_append_failure();
                    }
                }

                let _ = notices.send(FlushNotice {
                    timestamp: aggregate.timestamp,
                    acceleration_samples: window.acceleration.len(),
                    angular_velocity_samples: window.angular_velocity.len(),
                    heading_samples: window.heading_degrees.len(),
                    avg_heading_degrees: aggregate.avg_heading_degrees,
                    direction: aggregate.direction(),
                });
            }
        }
    }
}

//! Demonstration of the motionlog pipeline on a simulated IMU.
//!
//! This example shows how to:
//! 1. Wire up ingest, window buffers, scheduler, and sink
//! 2. Feed the pipeline from the built-in simulated source
//! 3. Watch flush notices and the live view
//!
//! Run with: cargo run --example replay_demo

use std::time::Duration;

use motionlog::{
    collector::{IngestService, SensorIngest, SensorKind, SimulatedSource},
    config::SourceConfig,
    core::{create_shared_buffers, WindowScheduler},
    live::create_shared_view,
    sink::CsvSink,
    stats::create_shared_stats,
};

fn main() {
    println!("Motionlog - Replay Demo");
    println!("=======================");
    println!();

    let log_path = std::env::temp_dir().join("motionlog_demo.csv");
    let _ = std::fs::remove_file(&log_path);

    let stats = create_shared_stats();
    let live = create_shared_view();
    let buffers = create_shared_buffers();

    let ingest = SensorIngest::new(SourceConfig::default(), stats.clone());
    let mut service = IngestService::start(
        ingest.receiver().clone(),
        buffers.clone(),
        live.clone(),
        stats.clone(),
    );
    let mut scheduler = WindowScheduler::start(
        Duration::from_secs(1),
        buffers,
        CsvSink::new(&log_path),
        stats.clone(),
    );
    let mut source = SimulatedSource::start(ingest.handle());

    println!("Aggregating simulated samples for 10 seconds...");
    println!();

    let deadline = std::time::Instant::now() + Duration::from_secs(10);
    while std::time::Instant::now() < deadline {
        match scheduler.notices().recv_timeout(Duration::from_millis(100)) {
            Ok(notice) => {
                println!(
                    "[{}] Window flushed: {} accel, {} gyro, {} heading samples | {:.1}° {}",
                    notice.timestamp.format("%H:%M:%S"),
                    notice.acceleration_samples,
                    notice.angular_velocity_samples,
                    notice.heading_samples,
                    notice.avg_heading_degrees,
                    notice.direction
                );
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
        }
    }

    source.stop();
    scheduler.stop();
    service.stop();

    println!();
    if let Some(accel) = live.latest(SensorKind::Accelerometer) {
        println!(
            "Last raw acceleration: ({:.2}, {:.2}, {:.2})",
            accel.x, accel.y, accel.z
        );
    }
    if let Some(direction) = live.direction() {
        println!("Last direction: {direction}");
    }
    println!();
    println!("{}", stats.summary());
    println!();
    println!("Log written to {log_path:?}");
}

//! Motionlog CLI
//!
//! Windowed IMU aggregation agent with append-only CSV logging.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use motionlog::{
    collector::{IngestService, SensorIngest, SimulatedSource},
    config::{Config, SourceConfig},
    core::{create_shared_buffers, WindowScheduler},
    live::create_shared_view,
    sink::CsvSink,
    stats::create_shared_stats_with_persistence,
    VERSION,
};

#[derive(Parser)]
#[command(name = "motionlog")]
#[command(version = VERSION)]
#[command(about = "Windowed IMU aggregation agent with CSV logging", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start aggregating sensor data
    Start {
        /// Sensor kinds to ingest (accelerometer, gyroscope, magnetometer, or all)
        #[arg(long, default_value = "all")]
        sources: String,

        /// Window duration in seconds
        #[arg(long)]
        window_secs: Option<u64>,

        /// CSV log destination (defaults to the configured path)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Feed the pipeline from the built-in simulated IMU
        #[arg(long)]
        simulate: bool,
    },

    /// Pause aggregation
    Pause,

    /// Resume aggregation
    Resume,

    /// Show current status and session statistics
    Status,

    /// Copy the CSV log to a destination for sharing
    Export {
        /// Destination path for the copy
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            sources,
            window_secs,
            output,
            simulate,
        } => {
            cmd_start(&sources, window_secs, output, simulate);
        }
        Commands::Pause => {
            cmd_pause();
        }
        Commands::Resume => {
            cmd_resume();
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Export { output } => {
            cmd_export(output);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_start(sources: &str, window_secs: Option<u64>, output: Option<PathBuf>, simulate: bool) {
    println!("Motionlog v{VERSION}");
    println!();

    // Parse source configuration
    let source_config = SourceConfig::from_csv(sources);
    if !source_config.any_enabled() {
        eprintln!("Error: At least one sensor kind must be enabled");
        std::process::exit(1);
    }

    // Load or create configuration
    let mut config = Config::load().unwrap_or_default();
    config.sources = source_config;
    if let Some(secs) = window_secs {
        if secs == 0 {
            eprintln!("Error: Window duration must be at least 1 second");
            std::process::exit(1);
        }
        config.window_duration = Duration::from_secs(secs);
    }
    if let Some(path) = output {
        config.log_path = path;
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting aggregation...");
    println!(
        "  Accelerometer: {}",
        if config.sources.accelerometer {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Gyroscope: {}",
        if config.sources.gyroscope {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Magnetometer: {}",
        if config.sources.magnetometer {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Window duration: {}s", config.window_duration.as_secs());
    println!("  Log file: {:?}", config.log_path);
    println!(
        "  Sample source: {}",
        if simulate {
            "simulated IMU"
        } else {
            "external push"
        }
    );
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Shared pipeline state
    let stats = create_shared_stats_with_persistence(config.data_path.join("stats.json"));
    let live = create_shared_view();
    let buffers = create_shared_buffers();

    let ingest = SensorIngest::new(config.sources, stats.clone());
    let handle = ingest.handle();

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Support pause/resume from another process by polling the config file.
    let mut paused = config.paused;
    let mut last_config_check = std::time::Instant::now();

    let mut service: Option<IngestService> = None;
    let mut scheduler: Option<WindowScheduler> = None;
    let mut sim: Option<SimulatedSource> = None;

    if paused {
        println!("Aggregation is currently paused.");
        println!("Run `motionlog resume` to start.");
        println!();
    } else {
        service = Some(IngestService::start(
            ingest.receiver().clone(),
            buffers.clone(),
            live.clone(),
            stats.clone(),
        ));
        scheduler = Some(WindowScheduler::start(
            config.window_duration,
            buffers.clone(),
            CsvSink::new(&config.log_path),
            stats.clone(),
        ));
        if simulate {
            sim = Some(SimulatedSource::start(handle.clone()));
        }
    }

    // Main display loop
    while running.load(Ordering::SeqCst) {
        // Reload config periodically so `motionlog pause/resume` can control
        // a running agent.
        if last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if cfg.paused != paused {
                    paused = cfg.paused;

                    if paused {
                        println!();
                        println!("Pausing aggregation...");
                        if let Some(mut source) = sim.take() {
                            source.stop();
                        }
                        if let Some(mut sched) = scheduler.take() {
                            sched.stop();
                        }
                        // Stop routing too, so the buffers cannot grow
                        // while no scheduler is draining them
                        if let Some(mut svc) = service.take() {
                            svc.stop();
                        }
                        // Drop the partially accumulated window and any
                        // samples still queued
                        buffers.clear();
                        while ingest.receiver().try_recv().is_ok() {}
                    } else {
                        println!();
                        println!("Resuming aggregation...");
                        service = Some(IngestService::start(
                            ingest.receiver().clone(),
                            buffers.clone(),
                            live.clone(),
                            stats.clone(),
                        ));
                        scheduler = Some(WindowScheduler::start(
                            config.window_duration,
                            buffers.clone(),
                            CsvSink::new(&config.log_path),
                            stats.clone(),
                        ));
                        if simulate {
                            sim = Some(SimulatedSource::start(handle.clone()));
                        }
                    }
                }
            }
            last_config_check = std::time::Instant::now();
        }

        let Some(sched) = scheduler.as_ref() else {
            thread::sleep(Duration::from_millis(100));
            continue;
        };

        match sched.notices().recv_timeout(Duration::from_millis(100)) {
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
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                eprintln!("Scheduler disconnected unexpectedly");
                break;
            }
        }
    }

    // Stop the pipeline; an in-flight flush completes first
    println!();
    println!("Stopping aggregation...");
    if let Some(mut source) = sim.take() {
        source.stop();
    }
    if let Some(mut sched) = scheduler.take() {
        sched.stop();
    }
    if let Some(mut svc) = service.take() {
        svc.stop();
    }

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save session stats: {e}");
    }

    println!();
    println!("{}", stats.summary());
    println!();
    println!("Log file: {:?}", config.log_path);
}

fn cmd_pause() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = true;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Aggregation paused. Use 'motionlog resume' to continue.");
}

fn cmd_resume() {
    let mut config = Config::load().unwrap_or_default();
    config.paused = false;
    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Aggregation resumed.");
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Motionlog Status");
    println!("================");
    println!();

    println!("Configuration:");
    println!(
        "  Accelerometer: {}",
        if config.sources.accelerometer {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Gyroscope: {}",
        if config.sources.gyroscope {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "  Magnetometer: {}",
        if config.sources.magnetometer {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  Window duration: {}s", config.window_duration.as_secs());
    println!("  Log file: {:?}", config.log_path);
    println!("  Paused: {}", config.paused);
    println!();

    if config.log_path.exists() {
        match std::fs::read_to_string(&config.log_path) {
            Ok(content) => {
                // Header plus one row per flushed window
                let rows = content.lines().count().saturating_sub(1);
                println!("Log file rows: {rows}");
            }
            Err(e) => eprintln!("Warning: Could not read log file: {e}"),
        }
    } else {
        println!("Log file not created yet.");
    }
    println!();

    // Load and show session stats if available
    let stats_path = config.data_path.join("stats.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(n) = stats.get("accel_samples") {
                    println!("  Acceleration samples: {n}");
                }
                if let Some(n) = stats.get("gyro_samples") {
                    println!("  Angular velocity samples: {n}");
                }
                if let Some(n) = stats.get("mag_samples") {
                    println!("  Magnetometer samples: {n}");
                }
                if let Some(n) = stats.get("malformed_dropped") {
                    println!("  Malformed samples dropped: {n}");
                }
                if let Some(n) = stats.get("queue_full_dropped") {
                    println!("  Queue-full samples dropped: {n}");
                }
                if let Some(n) = stats.get("windows_flushed") {
                    println!("  Windows flushed: {n}");
                }
                if let Some(n) = stats.get("records_written") {
                    println!("  Records written: {n}");
                }
                if let Some(n) = stats.get("append_failures") {
                    println!("  Append failures: {n}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_export(output: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();

    if !config.log_path.exists() {
        eprintln!("Error: Log file not found at {:?}", config.log_path);
        eprintln!("Run 'motionlog start' to begin collecting data.");
        std::process::exit(1);
    }

    let destination = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "motionlog_export_{}.csv",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });

    match std::fs::copy(&config.log_path, &destination) {
        Ok(bytes) => println!("Exported {bytes} bytes to {destination:?}"),
        Err(e) => {
            eprintln!("Error exporting log: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}

//! Record formatting and the append-only CSV sink.
//!
//! One completed window becomes one CSV row. The header is written exactly
//! once, when the file is first created; after that the sink only ever
//! appends. The direction label is for live display only and is not
//! persisted (the row stores the raw averaged azimuth).

use crate::collector::types::Vector3;
use crate::core::average::{average, average_scalar};
use crate::core::buffer::DrainedWindow;
use crate::core::heading::Direction;
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Fixed header row, written once per log file.
pub const CSV_HEADER: &str =
    "Timestamp,AvgAcc_X,AvgAcc_Y,AvgAcc_Z,AvgAngAcc_X,AvgAngAcc_Y,AvgAngAcc_Z,AvgAzimuth";

/// Timestamp format for record rows (local time).
const TIMESTAMP_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Per-window aggregates. Computed once at flush, handed straight to the
/// formatter, then discarded.
#[derive(Debug, Clone, Copy)]
pub struct WindowAggregate {
    /// Local time of the flush
    pub timestamp: DateTime<Local>,
    pub avg_acceleration: Vector3,
    pub avg_angular_velocity: Vector3,
    pub avg_heading_degrees: f64,
}

impl WindowAggregate {
    /// Average every channel of a drained window. Empty channels average
    /// to zero, so a window with no samples still produces a valid row.
    pub fn from_window(timestamp: DateTime<Local>, window: &DrainedWindow) -> Self {
        Self {
            timestamp,
            avg_acceleration: average(&window.acceleration),
            avg_angular_velocity: average(&window.angular_velocity),
            avg_heading_degrees: average_scalar(&window.heading_degrees),
        }
    }

    /// Compass octant of the averaged heading.
    pub fn direction(&self) -> Direction {
        Direction::from_degrees(self.avg_heading_degrees)
    }
}

/// One formatted output row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: String,
}

impl Record {
    /// Format an aggregate as `timestamp,acc_x,acc_y,acc_z,gyro_x,gyro_y,
    /// gyro_z,heading`, every numeric field with exactly 2 decimal digits.
    pub fn from_aggregate(aggregate: &WindowAggregate) -> Self {
        let line = format!(
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            aggregate.timestamp.format(TIMESTAMP_FORMAT),
            aggregate.avg_acceleration.x,
            aggregate.avg_acceleration.y,
            aggregate.avg_acceleration.z,
            aggregate.avg_angular_velocity.x,
            aggregate.avg_angular_velocity.y,
            aggregate.avg_angular_velocity.z,
            aggregate.avg_heading_degrees,
        );
        Self { line }
    }

    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// Append-only CSV destination.
///
/// The file is created lazily on the first append; it grows monotonically
/// and is never truncated or rewritten by this sink.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, writing the header first if the file does not
    /// exist yet. I/O failures are returned to the caller; that flush is
    /// lost but the process keeps running.
    pub fn append(&self, record: &Record) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if is_new {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(file, "{}", record.as_line())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_aggregate() -> WindowAggregate {
        WindowAggregate {
            timestamp: Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap(),
            avg_acceleration: Vector3::new(2.0, 0.0, -9.81),
            avg_angular_velocity: Vector3::new(0.5, 1.0, 0.0),
            avg_heading_degrees: 270.0,
        }
    }

    #[test]
    fn test_record_format() {
        let record = Record::from_aggregate(&fixed_aggregate());
        assert_eq!(
            record.as_line(),
            "2024:03:07 14:05:09,2.00,0.00,-9.81,0.50,1.00,0.00,270.00"
        );
    }

    #[test]
    fn test_empty_window_formats_all_zero() {
        let aggregate =
            WindowAggregate::from_window(Local::now(), &DrainedWindow::default());
        let record = Record::from_aggregate(&aggregate);
        let fields: Vec<&str> = record.as_line().split(',').skip(1).collect();
        assert_eq!(fields, vec!["0.00"; 7]);
    }

    #[test]
    fn test_aggregate_direction() {
        let aggregate = fixed_aggregate();
        assert_eq!(aggregate.direction(), Direction::West);
    }

    #[test]
    fn test_append_writes_header_once() {
        let path = std::env::temp_dir().join(format!(
            "motionlog-sink-test-{}.csv",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let sink = CsvSink::new(&path);
        let record = Record::from_aggregate(&fixed_aggregate());
        sink.append(&record).unwrap();
        sink.append(&record).unwrap();

        // Re-opening an existing file must not duplicate the header
        let reopened = CsvSink::new(&path);
        reopened.append(&record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1..].iter().all(|l| l == &record.as_line()));

        let _ = std::fs::remove_file(&path);
    }
}

//! Per-window averaging.
//!
//! Plain running-sum arithmetic means. An empty window averages to zero
//! rather than failing, so a sensor that never delivered (or is absent on
//! the host) still yields a well-formed record.

use crate::collector::types::Vector3;

/// Component-wise arithmetic mean. Empty input yields the zero vector.
pub fn average(samples: &[Vector3]) -> Vector3 {
    if samples.is_empty() {
        return Vector3::ZERO;
    }

    let mut sum = Vector3::ZERO;
    for v in samples {
        sum.x += v.x;
        sum.y += v.y;
        sum.z += v.z;
    }

    let count = samples.len() as f64;
    Vector3::new(sum.x / count, sum.y / count, sum.z / count)
}

/// Scalar arithmetic mean. Empty input yields 0.0.
pub fn average_scalar(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

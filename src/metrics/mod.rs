//! Tremor / jerk / smoothness derivation.
//!
//! Both deltas are L1 norms over the three axes of one sensor; smoothness maps
//! their sum into (0, 1], where 1.0 means nothing changed since the previous sample.

use crate::types::{DerivedMetrics, MotionReading, Sample};

pub fn compute_metrics(current: &Sample, previous: Option<&MotionReading>) -> DerivedMetrics {
    let prev = match previous {
        Some(prev) => prev,
        None => return DerivedMetrics::baseline(),
    };

    let tremor = (current.gx - prev.gx).abs()
        + (current.gy - prev.gy).abs()
        + (current.gz - prev.gz).abs();

    let jerk = (current.ax - prev.ax).abs()
        + (current.ay - prev.ay).abs()
        + (current.az - prev.az).abs();

    DerivedMetrics {
        tremor,
        jerk,
        smoothness: smoothness(tremor, jerk),
    }
}

// 1/(1+inf) = 0，NaN 原样传播
pub fn smoothness(tremor: f64, jerk: f64) -> f64 {
    1.0 / (1.0 + tremor + jerk)
}

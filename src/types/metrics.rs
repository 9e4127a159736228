use serde::{Deserialize, Serialize};

/// Per-sample stability metrics derived from the delta against the previous sample.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DerivedMetrics {
    pub tremor: f64,
    pub jerk: f64,
    pub smoothness: f64,
}

impl DerivedMetrics {
    /// 设备的第一个样本没有参照值
    pub fn baseline() -> Self {
        Self {
            tremor: 0.0,
            jerk: 0.0,
            smoothness: 1.0,
        }
    }
}

/// 查询接口返回的单条指标
///
/// Non-finite values (a jerk that overflows to infinity) serialize as JSON `null`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MetricsPoint {
    pub time_ms: i64,
    pub tremor: f64,
    pub jerk: f64,
    pub smoothness: f64,
}

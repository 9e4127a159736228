use super::{DerivedMetrics, Sample};

pub type RecordId = i64;

/// A sample together with its derived metrics, as written to the `samples` table.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredRecord {
    pub sample: Sample,
    pub metrics: DerivedMetrics,
    /// Unix 秒（带小数），写入时由服务端生成
    pub created_at: f64,
}

impl StoredRecord {
    pub fn new(sample: Sample, metrics: DerivedMetrics, created_at: f64) -> Self {
        Self {
            sample,
            metrics,
            created_at,
        }
    }
}

use serde::Serialize;

use super::DerivedMetrics;

/// Body returned by a successful ingest; non-finite metrics are written as `null`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IngestResponse {
    pub status: &'static str,
    pub tremor: f64,
    pub jerk: f64,
    pub smoothness: f64,
}

impl IngestResponse {
    pub fn ok(metrics: DerivedMetrics) -> Self {
        Self {
            status: "ok",
            tremor: metrics.tremor,
            jerk: metrics.jerk,
            smoothness: metrics.smoothness,
        }
    }
}

/// Body returned by the history query
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryResponse<T> {
    pub data: Vec<T>,
}

/// Body returned by the latest query; `{}` when the device has no samples
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum LatestResponse<T> {
    Found(T),
    Empty {},
}

impl<T> From<Option<T>> for LatestResponse<T> {
    fn from(point: Option<T>) -> Self {
        match point {
            Some(point) => LatestResponse::Found(point),
            None => LatestResponse::Empty {},
        }
    }
}

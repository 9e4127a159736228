pub mod sample;
pub mod metrics;
pub mod record;
pub mod results;
pub mod tasks;

pub use sample::{Sample, MotionReading};
pub use metrics::{DerivedMetrics, MetricsPoint};
pub use record::{StoredRecord, RecordId};
pub use results::{IngestResponse, HistoryResponse, LatestResponse};
pub use tasks::DatabaseTask;

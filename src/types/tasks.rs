use crossbeam_channel::Sender;

use super::{MetricsPoint, RecordId, StoredRecord};
use crate::error::StoreError;

/// Database task enumeration, handled on the database thread
pub enum DatabaseTask {
    Append {
        record: StoredRecord,
        response_sender: Sender<Result<RecordId, StoreError>>,
    },
    Latest {
        device_id: String,
        response_sender: Sender<Result<Option<MetricsPoint>, StoreError>>,
    },
    History {
        device_id: String,
        limit: u64,
        response_sender: Sender<Result<Vec<MetricsPoint>, StoreError>>,
    },
    Count {
        response_sender: Sender<Result<usize, StoreError>>,
    },
}

impl DatabaseTask {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseTask::Append { .. } => "append",
            DatabaseTask::Latest { .. } => "latest",
            DatabaseTask::History { .. } => "history",
            DatabaseTask::Count { .. } => "count",
        }
    }
}

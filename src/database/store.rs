use crossbeam_channel::{bounded, Sender};

use crate::error::StoreError;
use crate::types::{DatabaseTask, MetricsPoint, RecordId, StoredRecord};

/// Append-only sample log, queried by device and recency.
pub trait SampleStore: Send + Sync {
    /// Returns once the record is committed.
    fn append(&self, record: StoredRecord) -> Result<RecordId, StoreError>;

    fn latest(&self, device_id: &str) -> Result<Option<MetricsPoint>, StoreError>;

    /// Up to `limit` most recent records, oldest first.
    fn history(&self, device_id: &str, limit: u64) -> Result<Vec<MetricsPoint>, StoreError>;
}

/// Handle to the database thread; every call is a task plus a one-shot reply channel.
#[derive(Clone)]
pub struct StoreClient {
    task_sender: Sender<DatabaseTask>,
}

impl StoreClient {
    pub fn new(task_sender: Sender<DatabaseTask>) -> Self {
        Self { task_sender }
    }

    fn request<T>(
        &self,
        build: impl FnOnce(Sender<Result<T, StoreError>>) -> DatabaseTask,
    ) -> Result<T, StoreError> {
        let (response_sender, response_receiver) = bounded(1);

        self.task_sender
            .send(build(response_sender))
            .map_err(|_| StoreError::Unavailable)?;

        // 数据库线程退出时 response_sender 被丢弃
        response_receiver.recv().map_err(|_| StoreError::Unavailable)?
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        self.request(|response_sender| DatabaseTask::Count { response_sender })
    }
}

impl SampleStore for StoreClient {
    fn append(&self, record: StoredRecord) -> Result<RecordId, StoreError> {
        self.request(|response_sender| DatabaseTask::Append { record, response_sender })
    }

    fn latest(&self, device_id: &str) -> Result<Option<MetricsPoint>, StoreError> {
        self.request(|response_sender| DatabaseTask::Latest {
            device_id: device_id.to_string(),
            response_sender,
        })
    }

    fn history(&self, device_id: &str, limit: u64) -> Result<Vec<MetricsPoint>, StoreError> {
        self.request(|response_sender| DatabaseTask::History {
            device_id: device_id.to_string(),
            limit,
            response_sender,
        })
    }
}

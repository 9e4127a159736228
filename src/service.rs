use log::{info, error};

use crate::cache::LastSampleCache;
use crate::database::SampleStore;
use crate::error::{IngestError, StoreError};
use crate::metrics::compute_metrics;
use crate::types::{DerivedMetrics, MetricsPoint, Sample, StoredRecord};
use crate::utils::{format_timestamp, unix_seconds_now};

/// Ingest and query operations over one sample store.
///
/// The last-sample cache is owned here, so every ingest path (HTTP, MQTT)
/// that shares a service also shares per-device context.
pub struct StabilityService<S> {
    cache: LastSampleCache,
    store: S,
}

impl<S: SampleStore> StabilityService<S> {
    pub fn new(store: S) -> Self {
        Self {
            cache: LastSampleCache::new(),
            store,
        }
    }

    pub fn ingest(&self, sample: Sample) -> Result<DerivedMetrics, IngestError> {
        // 取旧值与写入新值在同一把锁内完成，同一设备的并发请求不会交错
        let previous = self.cache.swap(&sample.device_id, sample.reading());
        let metrics = compute_metrics(&sample, previous.as_ref());

        info!(
            "Sample from {} at {} - tremor: {:.4}, jerk: {:.4}, smoothness: {:.4}",
            sample.device_id,
            format_timestamp(sample.time_ms),
            metrics.tremor,
            metrics.jerk,
            metrics.smoothness
        );

        let record = StoredRecord::new(sample, metrics, unix_seconds_now());
        if let Err(e) = self.store.append(record) {
            error!("Failed to store sample: {}", e);
            return Err(e.into());
        }

        Ok(metrics)
    }

    pub fn latest(&self, device_id: &str) -> Result<Option<MetricsPoint>, StoreError> {
        self.store.latest(device_id)
    }

    pub fn history(&self, device_id: &str, limit: u64) -> Result<Vec<MetricsPoint>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.store.history(device_id, limit)
    }

    #[cfg(test)]
    fn cache(&self) -> &LastSampleCache {
        &self.cache
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use std::sync::Mutex;

    /// 只记录 append 调用的内存存储
    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<StoredRecord>>,
        fail_appends: bool,
    }

    impl SampleStore for RecordingStore {
        fn append(&self, record: StoredRecord) -> Result<RecordId, StoreError> {
            if self.fail_appends {
                return Err(StoreError::Database("disk full".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            records.push(record);
            Ok(records.len() as RecordId)
        }

        fn latest(&self, device_id: &str) -> Result<Option<MetricsPoint>, StoreError> {
            Ok(self.history(device_id, 1)?.pop())
        }

        fn history(&self, device_id: &str, limit: u64) -> Result<Vec<MetricsPoint>, StoreError> {
            let records = self.records.lock().unwrap();
            let mut points: Vec<MetricsPoint> = records
                .iter()
                .rev()
                .filter(|r| r.sample.device_id == device_id)
                .take(limit as usize)
                .map(|r| MetricsPoint {
                    time_ms: r.sample.time_ms,
                    tremor: r.metrics.tremor,
                    jerk: r.metrics.jerk,
                    smoothness: r.metrics.smoothness,
                })
                .collect();
            points.reverse();
            Ok(points)
        }
    }

    #[test]
    fn consecutive_ingests_use_previous_reading() {
        let service = StabilityService::new(RecordingStore::default());

        let first = service
            .ingest(Sample::new("d1", 1, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(first, DerivedMetrics::baseline());

        let second = service
            .ingest(Sample::new("d1", 2, [1.0, 0.0, 0.0], [2.0, 1.0, 0.0]))
            .unwrap();
        assert_eq!(second.tremor, 2.0);
        assert_eq!(second.jerk, 1.0);
        assert_eq!(second.smoothness, 0.25);

        let records = service.store().records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].metrics, second);
        assert!(records[1].created_at > 0.0);
    }

    #[test]
    fn interleaved_devices_do_not_share_context() {
        let service = StabilityService::new(RecordingStore::default());

        service.ingest(Sample::new("a", 1, [0.0; 3], [0.0; 3])).unwrap();
        let b_first = service.ingest(Sample::new("b", 1, [5.0; 3], [5.0; 3])).unwrap();
        let a_second = service.ingest(Sample::new("a", 2, [1.0, 0.0, 0.0], [0.0; 3])).unwrap();
        let b_second = service.ingest(Sample::new("b", 2, [5.0; 3], [5.0; 3])).unwrap();

        assert_eq!(b_first, DerivedMetrics::baseline());
        assert_eq!(a_second.jerk, 1.0);
        assert_eq!(a_second.tremor, 0.0);
        assert_eq!(b_second.smoothness, 1.0);
    }

    #[test]
    fn store_failure_is_surfaced() {
        let store = RecordingStore {
            fail_appends: true,
            ..Default::default()
        };
        let service = StabilityService::new(store);

        let err = service
            .ingest(Sample::new("d1", 1, [0.0; 3], [0.0; 3]))
            .unwrap_err();
        assert!(matches!(err, IngestError::Store(StoreError::Database(_))));

        // 缓存与存储不要求原子，失败后缓存仍然保留新读数
        assert!(service.cache().get("d1").is_some());
    }

    #[test]
    fn zero_limit_history_is_empty() {
        let service = StabilityService::new(RecordingStore::default());
        service.ingest(Sample::new("d1", 1, [0.0; 3], [0.0; 3])).unwrap();

        assert!(service.history("d1", 0).unwrap().is_empty());
        assert_eq!(service.history("d1", 5).unwrap().len(), 1);
        assert!(service.latest("unknown_device").unwrap().is_none());
    }
}

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::types::MotionReading;

/// 每个设备最近一次上报的原始读数
///
/// 只存在于内存中，进程重启后清空；设备条目不会被淘汰。
#[derive(Default)]
pub struct LastSampleCache {
    entries: Mutex<HashMap<String, MotionReading>>,
}

impl LastSampleCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MotionReading>> {
        // 持锁期间不会 panic，poison 后数据仍然一致
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, device_id: &str) -> Option<MotionReading> {
        self.lock().get(device_id).copied()
    }

    pub fn put(&self, device_id: &str, entry: MotionReading) {
        self.lock().insert(device_id.to_string(), entry);
    }

    /// Stores `entry` and returns the reading it replaced, under a single lock.
    pub fn swap(&self, device_id: &str, entry: MotionReading) -> Option<MotionReading> {
        self.lock().insert(device_id.to_string(), entry)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn reading(v: f64) -> MotionReading {
        MotionReading { ax: v, ay: v, az: v, gx: v, gy: v, gz: v }
    }

    #[test]
    fn absent_until_first_put() {
        let cache = LastSampleCache::new();
        assert!(cache.get("pen_01").is_none());
        assert!(cache.is_empty());

        cache.put("pen_01", reading(1.0));
        assert_eq!(cache.get("pen_01"), Some(reading(1.0)));
    }

    #[test]
    fn swap_returns_previous_entry() {
        let cache = LastSampleCache::new();
        assert_eq!(cache.swap("pen_01", reading(1.0)), None);
        assert_eq!(cache.swap("pen_01", reading(2.0)), Some(reading(1.0)));
        assert_eq!(cache.get("pen_01"), Some(reading(2.0)));
    }

    #[test]
    fn devices_are_isolated() {
        let cache = LastSampleCache::new();
        cache.put("a", reading(1.0));
        cache.put("b", reading(2.0));
        cache.put("", reading(3.0));

        assert_eq!(cache.get("a"), Some(reading(1.0)));
        assert_eq!(cache.get("b"), Some(reading(2.0)));
        assert_eq!(cache.get(""), Some(reading(3.0)));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn concurrent_swaps_observe_every_value_once() {
        let cache = Arc::new(LastSampleCache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    (0..100)
                        .filter_map(|i| cache.swap("pen_01", reading((t * 100 + i) as f64)))
                        .map(|r| r.ax as i64)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen: Vec<i64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        seen.push(cache.get("pen_01").unwrap().ax as i64);
        seen.sort();

        // 每个写入值恰好被下一次 swap 读到一次（最后一个留在缓存里）
        assert_eq!(seen, (0..800).collect::<Vec<i64>>());
    }
}

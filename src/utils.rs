use chrono::{DateTime, Utc};

/// 将毫秒时间戳格式化为标准时间格式 HH:MM:SS.mmm (UTC)
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(time) => time.format("%H:%M:%S%.3f").to_string(),
        None => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

/// 当前 Unix 时间（秒，带小数）
pub fn unix_seconds_now() -> f64 {
    let now = Utc::now();
    now.timestamp_micros() as f64 / 1_000_000.0
}

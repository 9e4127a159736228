use duckdb::{Connection, Result as DuckResult, Row};
use std::fs;
use std::path::Path;
use log::{info, error};

use crate::config::DatabaseConfig;
use crate::types::{MetricsPoint, RecordId, StoredRecord};
use super::schema::DatabaseSchema;

pub struct DatabaseManager {
    conn: Connection,
}

impl DatabaseManager {
    pub fn open(config: &DatabaseConfig) -> DuckResult<Self> {
        if config.is_in_memory() {
            return Self::open_in_memory();
        }

        if config.auto_create_dir {
            if let Some(dir) = Path::new(&config.path).parent().filter(|d| !d.as_os_str().is_empty()) {
                // 目录创建失败时交给 Connection::open 报错
                if let Err(e) = fs::create_dir_all(dir) {
                    error!("Failed to create data directory {}: {}", dir.display(), e);
                }
            }
        }

        let conn = Connection::open(&config.path)?;
        info!("Database connection established at: {}", config.path);
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> DuckResult<Self> {
        let conn = Connection::open_in_memory()?;
        info!("In-memory database connection established");
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> DuckResult<Self> {
        DatabaseSchema::create_tables(&conn)?;
        Ok(DatabaseManager { conn })
    }

    pub fn append_sample(&self, record: &StoredRecord) -> DuckResult<RecordId> {
        let sample = &record.sample;
        let metrics = &record.metrics;

        let mut stmt = self.conn.prepare(
            "INSERT INTO samples (device_id, time_ms, ax, ay, az, gx, gy, gz, tremor, jerk, smoothness, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING id"
        )?;

        stmt.query_row(
            duckdb::params![
                sample.device_id,
                sample.time_ms,
                sample.ax,
                sample.ay,
                sample.az,
                sample.gx,
                sample.gy,
                sample.gz,
                metrics.tremor,
                metrics.jerk,
                metrics.smoothness,
                record.created_at
            ],
            |row| row.get::<_, i64>(0),
        )
    }

    pub fn latest_metrics(&self, device_id: &str) -> DuckResult<Option<MetricsPoint>> {
        let mut stmt = self.conn.prepare(
            "SELECT time_ms, tremor, jerk, smoothness FROM samples
             WHERE device_id = ?
             ORDER BY id DESC
             LIMIT 1"
        )?;

        let mut rows = stmt.query_map([device_id], metrics_point_from_row)?;
        rows.next().transpose()
    }

    /// 取最近 `limit` 条（按 id），按 id 升序返回
    pub fn history_metrics(&self, device_id: &str, limit: u64) -> DuckResult<Vec<MetricsPoint>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare(
            "SELECT time_ms, tremor, jerk, smoothness FROM samples
             WHERE device_id = ?
             ORDER BY id DESC
             LIMIT ?"
        )?;

        let rows = stmt.query_map(duckdb::params![device_id, limit], metrics_point_from_row)?;

        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        data.reverse();

        Ok(data)
    }

    pub fn count_samples(&self) -> DuckResult<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM samples", [], |row| {
                Ok(row.get::<_, i64>(0)? as usize)
            })
    }
}

fn metrics_point_from_row(row: &Row<'_>) -> DuckResult<MetricsPoint> {
    Ok(MetricsPoint {
        time_ms: row.get(0)?,
        tremor: row.get(1)?,
        jerk: row.get(2)?,
        smoothness: row.get(3)?,
    })
}

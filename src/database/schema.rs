use duckdb::{Connection, Result as DuckResult};
use log::info;

pub struct DatabaseSchema;

impl DatabaseSchema {
    pub fn create_tables(conn: &Connection) -> DuckResult<()> {
        // id 由序列生成，是样本唯一可信的先后顺序（time_ms 来自客户端，不保证有序）
        conn.execute("CREATE SEQUENCE IF NOT EXISTS samples_seq", [])?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS samples (
                id BIGINT PRIMARY KEY DEFAULT nextval('samples_seq'),
                device_id VARCHAR NOT NULL,
                time_ms BIGINT,
                ax DOUBLE,
                ay DOUBLE,
                az DOUBLE,
                gx DOUBLE,
                gy DOUBLE,
                gz DOUBLE,
                tremor DOUBLE,
                jerk DOUBLE,
                smoothness DOUBLE,
                created_at DOUBLE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS samples_device_idx ON samples (device_id)",
            [],
        )?;

        info!("Samples table ready");
        Ok(())
    }

    #[cfg(test)]
    pub fn table_exists(conn: &Connection, table_name: &str) -> DuckResult<bool> {
        conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            [table_name],
            |row| Ok(row.get::<_, i64>(0)? > 0),
        )
    }
}

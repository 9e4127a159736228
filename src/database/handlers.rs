use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crossbeam_channel::{bounded, Receiver, Sender};
use log::{info, error, warn, debug};

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::types::DatabaseTask;
use super::manager::DatabaseManager;
use super::store::StoreClient;

/// 启动数据库线程，连接在线程内创建并独占
///
/// 初始化失败时直接返回错误，不会留下空转的线程。
pub fn spawn_database_handler(
    config: DatabaseConfig,
    channel_capacity: usize,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(StoreClient, JoinHandle<()>), StoreError> {
    let (task_sender, task_receiver) = bounded(channel_capacity);
    let (ready_sender, ready_receiver) = bounded(1);

    let handle = thread::Builder::new()
        .name("database-handler".to_string())
        .spawn(move || {
            let db_manager = match DatabaseManager::open(&config) {
                Ok(db) => {
                    info!("Database handler thread: DuckDB initialized successfully");
                    let _ = ready_sender.send(Ok(()));
                    db
                }
                Err(e) => {
                    error!("Database handler thread: Failed to initialize DuckDB: {}", e);
                    let _ = ready_sender.send(Err(StoreError::from(e)));
                    return;
                }
            };

            run_database_handler(db_manager, task_receiver, shutdown_signal);
        })
        .map_err(|e| StoreError::Database(format!("Failed to spawn database thread: {}", e)))?;

    ready_receiver.recv().map_err(|_| StoreError::Unavailable)??;

    Ok((StoreClient::new(task_sender), handle))
}

pub fn run_database_handler(
    db_manager: DatabaseManager,
    task_receiver: Receiver<DatabaseTask>,
    shutdown_signal: Arc<AtomicBool>,
) {
    match db_manager.count_samples() {
        Ok(count) => info!("Database handler thread started ({} stored samples)", count),
        Err(e) => warn!("Database handler thread started, failed to count samples: {}", e),
    }

    while !shutdown_signal.load(Ordering::Relaxed) {
        match task_receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(task) => handle_task(&db_manager, task),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // 超时，继续循环检查关闭信号
                continue;
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                info!("Database handler: Task channel disconnected, exiting");
                break;
            }
        }
    }

    info!("Database handler thread exiting gracefully");
}

fn handle_task(db_manager: &DatabaseManager, task: DatabaseTask) {
    let name = task.name();

    match task {
        DatabaseTask::Append { record, response_sender } => {
            let result = db_manager.append_sample(&record).map_err(StoreError::from);
            match &result {
                Ok(id) => debug!("Database handler: Saved sample {} for device {}", id, record.sample.device_id),
                Err(e) => error!("Database handler: Failed to save sample for device {}: {}", record.sample.device_id, e),
            }
            reply(name, &response_sender, result);
        }
        DatabaseTask::Latest { device_id, response_sender } => {
            let result = db_manager.latest_metrics(&device_id).map_err(StoreError::from);
            if let Err(e) = &result {
                error!("Database handler: Failed to load latest sample for device {}: {}", device_id, e);
            }
            reply(name, &response_sender, result);
        }
        DatabaseTask::History { device_id, limit, response_sender } => {
            let result = db_manager.history_metrics(&device_id, limit).map_err(StoreError::from);
            if let Err(e) = &result {
                error!("Database handler: Failed to load history for device {}: {}", device_id, e);
            }
            reply(name, &response_sender, result);
        }
        DatabaseTask::Count { response_sender } => {
            let result = db_manager.count_samples().map_err(StoreError::from);
            reply(name, &response_sender, result);
        }
    }
}

fn reply<T>(task_name: &str, response_sender: &Sender<T>, result: T) {
    if let Err(e) = response_sender.try_send(result) {
        warn!("Database handler: Failed to send {} result: {}", task_name, e);
    }
}

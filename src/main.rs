use dotenv::dotenv;
use log::{error, info, warn};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use stability_hub::api::{self, AppState};
use stability_hub::config::{AppConfig, LoggingConfig};
use stability_hub::database::spawn_database_handler;
use stability_hub::logger;
use stability_hub::mqtt::run_mqtt_bridge;
use stability_hub::service::StabilityService;

fn main() {
    dotenv().ok(); // 加载 .env 文件

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logger::init_logger(&LoggingConfig::default());
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    logger::init_logger(&config.logging);
    info!("Application starting");

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let (store, db_handle) = match spawn_database_handler(
        config.database.clone(),
        config.channels.db_task_channel_capacity,
        Arc::clone(&shutdown_signal),
    ) {
        Ok(handler) => handler,
        Err(e) => {
            error!("Failed to start database handler: {}", e);
            process::exit(1);
        }
    };

    let service = Arc::new(StabilityService::new(store));

    if config.mqtt.enabled {
        let mqtt_service = Arc::clone(&service);
        let mqtt_config = config.mqtt.clone();
        let mqtt_shutdown = Arc::clone(&shutdown_signal);
        // MQTT 线程阻塞在事件循环上，退出时不等待它
        thread::spawn(move || {
            if let Err(e) = run_mqtt_bridge(mqtt_service, mqtt_config, mqtt_shutdown) {
                error!("MQTT thread failed: {}", e);
            }
        });
    } else {
        info!("MQTT bridge disabled");
    }

    let app = api::router(AppState::new(service, config.query.clone()), &config.server);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let served = runtime.block_on(api::serve(addr, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    }));

    if let Err(e) = &served {
        error!("HTTP server failed: {}", e);
    }

    shutdown_signal.store(true, Ordering::Relaxed);

    match db_handle.join() {
        Ok(()) => info!("Database thread shut down gracefully"),
        Err(e) => warn!("Database thread panicked: {:?}", e),
    }

    if served.is_err() {
        process::exit(1);
    }
}

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use log::{info, warn, error, debug};
use rumqttc::{Client, Event, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::database::SampleStore;
use crate::error::IngestError;
use crate::service::StabilityService;
use crate::types::Sample;

/// 订阅传感器主题，将每条消息送入与 HTTP 相同的采集流程
pub fn run_mqtt_bridge<S: SampleStore>(
    service: Arc<StabilityService<S>>,
    config: MqttConfig,
    shutdown_signal: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mqtt_options = MqttOptions::new(
        config.client_id.clone(),
        config.broker.clone(),
        config.port,
    );

    // 账号密码可选，来自 .env 或环境变量
    if let (Ok(user), Ok(pass)) = (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
        mqtt_options.set_credentials(user, pass);
    }

    mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive));

    let qos = qos_from_level(config.qos)?;
    let reconnect_delay = Duration::from_millis(config.reconnect_delay_ms);
    let (client, mut connection) = Client::new(mqtt_options, 10);
    info!("MQTT bridge connecting to {}:{}", config.broker, config.port);

    // 连接失败后 iter() 的下一次轮询会重连，只有关闭信号能结束循环
    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT thread received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                // clean session 下重连会丢失订阅，每次连上都重新订阅
                match client.try_subscribe(config.topic.clone(), qos) {
                    Ok(()) => info!("MQTT bridge subscribed to {} on {}:{}", config.topic, config.broker, config.port),
                    Err(e) => error!("Failed to subscribe to {}: {}", config.topic, e),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == config.topic => {
                let sample = match parse_sample(&publish.payload) {
                    Ok(sample) => sample,
                    Err(e) => {
                        warn!("Invalid sensor data: {}", e);
                        continue;
                    }
                };

                match service.ingest(sample) {
                    Ok(metrics) => debug!("MQTT sample ingested, smoothness {:.4}", metrics.smoothness),
                    Err(e) => error!("Failed to ingest MQTT sample: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("MQTT connection error: {}, retrying in {:?}", e, reconnect_delay);
                thread::sleep(reconnect_delay);
            }
        }
    }

    Ok(())
}

pub fn parse_sample(payload: &[u8]) -> Result<Sample, IngestError> {
    let payload_str = std::str::from_utf8(payload)
        .map_err(|e| IngestError::Validation(format!("Invalid UTF-8: {}", e)))?;

    Ok(serde_json::from_str::<Sample>(payload_str)?)
}

pub fn qos_from_level(level: u8) -> Result<QoS, IngestError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(IngestError::Validation(format!("Invalid MQTT QoS level: {}", other))),
    }
}

//! 应用配置管理模块
//! 集中管理所有配置项，提供默认值和配置验证

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV_VAR: &str = "STABILITY_CONFIG";

/// 使用内存数据库的特殊路径
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub mqtt: MqttConfig,
    pub query: QueryConfig,
    pub channels: ChannelConfig,
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub enable_cors: bool,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub auto_create_dir: bool,
}

/// MQTT配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MqttConfig {
    pub enabled: bool,
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub qos: u8,
    pub keep_alive: u64,
    /// 连接失败后重试前的等待时间
    pub reconnect_delay_ms: u64,
}

/// 查询接口的默认参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueryConfig {
    pub default_device_id: String,
    pub default_history_limit: u64,
}

/// 通道配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    pub db_task_channel_capacity: usize,
}

/// 日志配置，RUST_LOG / RUST_LOG_STYLE 优先
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "auto"、"always" 或 "never"
    pub style: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/writing_stability.db".to_string(),
            auto_create_dir: true,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            path: IN_MEMORY_DB_PATH.to_string(),
            auto_create_dir: false,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_DB_PATH
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "stability_hub".to_string(),
            topic: "sensors/motion".to_string(),
            qos: 1,
            keep_alive: 5,
            reconnect_delay_ms: 1000,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_device_id: "pen_01".to_string(),
            default_history_limit: 200,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            db_task_channel_capacity: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            style: "auto".to_string(),
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// 配置文件由 STABILITY_CONFIG 指定，未设置时使用默认配置
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load_from_file(path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(path, content).map_err(ConfigError::IoError)?;
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("Server port must be non-zero".to_string()));
        }

        if self.database.path.trim().is_empty() {
            return Err(ConfigError::ValidationError("Database path must not be empty".to_string()));
        }

        if self.channels.db_task_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Database task channel capacity must be positive".to_string()));
        }

        if self.query.default_device_id.is_empty() {
            return Err(ConfigError::ValidationError("Default device id must not be empty".to_string()));
        }

        if self.mqtt.qos > 2 {
            return Err(ConfigError::ValidationError(format!("Invalid MQTT QoS level: {}", self.mqtt.qos)));
        }

        if self.mqtt.enabled && self.mqtt.topic.is_empty() {
            return Err(ConfigError::ValidationError("MQTT topic must not be empty".to_string()));
        }

        if !matches!(self.logging.style.as_str(), "auto" | "always" | "never") {
            return Err(ConfigError::ValidationError(format!("Invalid log style: {}", self.logging.style)));
        }

        Ok(())
    }

    /// HTTP 监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid bind address: {}", e)))
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = AppConfig::default();
        assert_eq!(config.query.default_device_id, "pen_01");
        assert_eq!(config.query.default_history_limit, 200);
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
    }

    #[test]
    fn example_config_parses() {
        let config = AppConfig::from_toml_str(include_str!("../stability.example.toml")).unwrap();
        assert!(!config.mqtt.enabled);
        assert_eq!(config.database.path, "data/writing_stability.db");
        assert_eq!(config.mqtt.reconnect_delay_ms, 1000);
        assert_eq!(config.logging.style, "auto");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = AppConfig::from_toml_str(
            "[server]\nport = 9000\n\n[query]\ndefault_history_limit = 50\n",
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.query.default_history_limit, 50);
        assert_eq!(config.query.default_device_id, "pen_01");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = AppConfig::from_toml_str("[mqtt]\nqos = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = AppConfig::from_toml_str("[channels]\ndb_task_channel_capacity = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = AppConfig::from_toml_str("[logging]\nstyle = \"rainbow\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = AppConfig::from_toml_str("[server]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stability.toml");

        let mut config = AppConfig::default();
        config.database = DatabaseConfig::in_memory();
        config.mqtt.enabled = true;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.database.is_in_memory());
    }
}

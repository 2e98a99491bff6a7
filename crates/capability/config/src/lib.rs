//! 桥接运行配置加载。
//!
//! 配置在启动时构造一次，之后以只读引用传入各模块。

use domain::Credentials;
use std::env;
use std::time::Duration;

/// 门户默认地址。
pub const DEFAULT_PORTAL_URL: &str = "https://www.wolf-smartset.com/portal";
/// 轮询间隔下限（秒），限制对门户 API 的压力。
pub const MIN_POLL_INTERVAL_SECONDS: u64 = 10;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub portal_url: String,
    pub credentials: Credentials,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_root_topic: String,
    pub discovery_prefix: String,
    pub discovery_id_prefix: String,
    pub poll_interval: Duration,
    pub read_only: bool,
    pub debug: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（命令行覆盖、测试）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = Source { lookup };
        let username = source.required("WOLF_USER")?;
        let password = source.required("WOLF_PASSWORD")?;
        let portal_url = source
            .optional("WOLF_PORTAL_URL")
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let mqtt_host = source
            .optional("WOLF_MQTT_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let mqtt_port = source.u16_with_default("WOLF_MQTT_PORT", 1883)?;
        let mqtt_username = source.optional("WOLF_MQTT_USERNAME");
        let mqtt_password = source.optional("WOLF_MQTT_PASSWORD");
        let mqtt_root_topic = source
            .optional("WOLF_MQTT_ROOT_TOPIC")
            .unwrap_or_else(|| "wolf".to_string())
            .trim_end_matches('/')
            .to_string();
        let discovery_prefix = source
            .optional("WOLF_DISCOVERY_PREFIX")
            .unwrap_or_else(|| "homeassistant".to_string())
            .trim_end_matches('/')
            .to_string();
        let discovery_id_prefix = source
            .optional("WOLF_DISCOVERY_ID_PREFIX")
            .unwrap_or_else(|| "wolf".to_string());
        let poll_interval_seconds = source
            .u64_with_default("WOLF_POLL_INTERVAL_SECONDS", 60)?
            .max(MIN_POLL_INTERVAL_SECONDS);
        let read_only = source.bool_with_default("WOLF_READ_ONLY", false);
        let debug = source.bool_with_default("WOLF_DEBUG", false);

        Ok(Self {
            portal_url,
            credentials: Credentials::new(username, password),
            mqtt_host,
            mqtt_port,
            mqtt_username,
            mqtt_password,
            mqtt_root_topic,
            discovery_prefix,
            discovery_id_prefix,
            poll_interval: Duration::from_secs(poll_interval_seconds),
            read_only,
            debug,
        })
    }
}

struct Source<F> {
    lookup: F,
}

impl<F> Source<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        match (self.lookup)(key) {
            Some(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn u16_with_default(&self, key: &str, default: u16) -> Result<u16, ConfigError> {
        let value = match self.optional(key) {
            Some(value) => value,
            None => return Ok(default),
        };
        value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let value = match self.optional(key) {
            Some(value) => value,
            None => return Ok(default),
        };
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn bool_with_default(&self, key: &str, default: bool) -> bool {
        match self.optional(key) {
            Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_credentials_given() {
        let config = load(&[("WOLF_USER", "user"), ("WOLF_PASSWORD", "secret")]).expect("config");
        assert_eq!(config.portal_url, DEFAULT_PORTAL_URL);
        assert_eq!(config.mqtt_host, "127.0.0.1");
        assert_eq!(config.mqtt_port, 1883);
        assert_eq!(config.mqtt_root_topic, "wolf");
        assert_eq!(config.discovery_prefix, "homeassistant");
        assert_eq!(config.discovery_id_prefix, "wolf");
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert!(!config.read_only);
        assert!(config.mqtt_username.is_none());
    }

    #[test]
    fn missing_user_is_reported() {
        let err = load(&[("WOLF_PASSWORD", "secret")]).expect_err("missing");
        assert_eq!(err.to_string(), "missing required env: WOLF_USER");
    }

    #[test]
    fn poll_interval_has_floor() {
        let config = load(&[
            ("WOLF_USER", "user"),
            ("WOLF_PASSWORD", "secret"),
            ("WOLF_POLL_INTERVAL_SECONDS", "3"),
        ])
        .expect("config");
        assert_eq!(
            config.poll_interval,
            Duration::from_secs(MIN_POLL_INTERVAL_SECONDS)
        );
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[
            ("WOLF_USER", "user"),
            ("WOLF_PASSWORD", "secret"),
            ("WOLF_MQTT_PORT", "abc"),
        ])
        .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(key, _) if key == "WOLF_MQTT_PORT"));
    }

    #[test]
    fn read_only_and_trailing_slashes() {
        let config = load(&[
            ("WOLF_USER", "user"),
            ("WOLF_PASSWORD", "secret"),
            ("WOLF_READ_ONLY", "on"),
            ("WOLF_MQTT_ROOT_TOPIC", "heating/"),
            ("WOLF_PORTAL_URL", "http://localhost:8080/portal/"),
        ])
        .expect("config");
        assert!(config.read_only);
        assert_eq!(config.mqtt_root_topic, "heating");
        assert_eq!(config.portal_url, "http://localhost:8080/portal");
    }
}

//! 轮询桥接：门户参数值 → MQTT state topic。
//!
//! 状态机只有两个状态：`NeedsConnection`（初始）与 `Polling`。
//! 首次连接失败是致命的；之后的任何失败都转为下一轮的重连。

mod installation;
mod polling;

use std::time::Duration;
use wolf_config::AppConfig;
use wolf_session::SessionError;

pub use installation::{Installation, fetch_installation, load_installation};
pub use polling::PollingBridge;

/// 桥接错误。
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("catalog fetch failed: {0}")]
    CatalogFetch(String),
    #[error("no installation found for this account")]
    NoInstallation,
    #[error("poll failed: {0}")]
    Poll(String),
}

impl BridgeError {
    pub fn is_auth(&self) -> bool {
        matches!(self, BridgeError::Auth(_))
    }
}

impl From<SessionError> for BridgeError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Auth(message) => BridgeError::Auth(message),
            SessionError::Create(message) => BridgeError::Session(message),
        }
    }
}

/// 单次 `step` 的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 本轮拉取成功。`published` 为成功发布的状态值数量。
    Polled { published: usize, dropped: usize },
    /// 拉取失败，下一轮重连。
    PollFailed,
    /// 重连失败，下一轮再试。
    ConnectFailed,
}

/// 桥接运行参数（取自 `AppConfig`）。
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub root_topic: String,
    pub discovery_prefix: String,
    pub discovery_id_prefix: String,
    pub poll_interval: Duration,
    pub read_only: bool,
}

impl BridgeSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            root_topic: config.mqtt_root_topic.clone(),
            discovery_prefix: config.discovery_prefix.clone(),
            discovery_id_prefix: config.discovery_id_prefix.clone(),
            poll_interval: config.poll_interval,
            read_only: config.read_only,
        }
    }

    /// discovery 文档的 `expire_after`：三个轮询周期。
    pub fn expire_after_seconds(&self) -> u64 {
        self.poll_interval.as_secs() * 3
    }
}

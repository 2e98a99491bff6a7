//! 日志初始化与桥接计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 计数指标快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub polls_ok: u64,
    pub polls_failed: u64,
    pub reconnects: u64,
    pub values_published: u64,
    pub publish_failures: u64,
    pub dropped_unmatched: u64,
    pub keep_alive_ok: u64,
    pub keep_alive_failed: u64,
}

/// 桥接计数指标。
pub struct TelemetryMetrics {
    polls_ok: AtomicU64,
    polls_failed: AtomicU64,
    reconnects: AtomicU64,
    values_published: AtomicU64,
    publish_failures: AtomicU64,
    dropped_unmatched: AtomicU64,
    keep_alive_ok: AtomicU64,
    keep_alive_failed: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            polls_ok: AtomicU64::new(0),
            polls_failed: AtomicU64::new(0),
            reconnects: AtomicU64::new(0),
            values_published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            dropped_unmatched: AtomicU64::new(0),
            keep_alive_ok: AtomicU64::new(0),
            keep_alive_failed: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            polls_ok: self.polls_ok.load(Ordering::Relaxed),
            polls_failed: self.polls_failed.load(Ordering::Relaxed),
            reconnects: self.reconnects.load(Ordering::Relaxed),
            values_published: self.values_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            dropped_unmatched: self.dropped_unmatched.load(Ordering::Relaxed),
            keep_alive_ok: self.keep_alive_ok.load(Ordering::Relaxed),
            keep_alive_failed: self.keep_alive_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing。`RUST_LOG` 优先；否则默认 info，`debug` 为真时为 debug。
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录轮询成功次数。
pub fn record_poll_ok() {
    metrics().polls_ok.fetch_add(1, Ordering::Relaxed);
}

/// 记录轮询失败次数。
pub fn record_poll_failed() {
    metrics().polls_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录重连（含首次连接）次数。
pub fn record_reconnect() {
    metrics().reconnects.fetch_add(1, Ordering::Relaxed);
}

/// 记录已发布的参数值数量。
pub fn record_value_published() {
    metrics().values_published.fetch_add(1, Ordering::Relaxed);
}

/// 记录 MQTT 发布失败次数。
pub fn record_publish_failure() {
    metrics().publish_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录目录中找不到描述而丢弃的值。
pub fn record_dropped_unmatched() {
    metrics().dropped_unmatched.fetch_add(1, Ordering::Relaxed);
}

/// 记录会话保活成功次数。
pub fn record_keep_alive_ok() {
    metrics().keep_alive_ok.fetch_add(1, Ordering::Relaxed);
}

/// 记录会话保活失败次数。
pub fn record_keep_alive_failed() {
    metrics().keep_alive_failed.fetch_add(1, Ordering::Relaxed);
}

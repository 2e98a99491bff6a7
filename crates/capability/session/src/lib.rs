//! 会话管理：建立门户会话，并在后台周期性保活。
//!
//! 同一时刻最多只有一个保活任务；任务持有会话的不可变副本，不与主循环共享状态。

use domain::{Credentials, Session, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use wolf_telemetry::{record_keep_alive_failed, record_keep_alive_ok};
use wolf_vendor::VendorApi;

/// 门户会话默认保活周期。
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(60);

/// 会话建立错误。
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("session creation failed: {0}")]
    Create(String),
}

/// 运行中的保活任务。drop 时中止。
struct KeepAlive {
    session_id: SessionId,
    handle: JoinHandle<()>,
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct SessionManager {
    vendor: Arc<dyn VendorApi>,
    keep_alive_interval: Duration,
    keep_alive: Option<KeepAlive>,
}

impl SessionManager {
    pub fn new(vendor: Arc<dyn VendorApi>) -> Self {
        Self {
            vendor,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            keep_alive: None,
        }
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    /// 认证并创建会话。先取消已有的保活任务；失败时由调用方整体重试。
    pub async fn establish(&mut self, credentials: &Credentials) -> Result<Session, SessionError> {
        self.cancel_keep_alive();
        let token = self
            .vendor
            .authenticate(credentials)
            .await
            .map_err(|err| SessionError::Auth(err.to_string()))?;
        let id = self
            .vendor
            .create_session(&token)
            .await
            .map_err(|err| SessionError::Create(err.to_string()))?;
        info!(target: "wolf.session", session_id = %id, "session_established");
        Ok(Session { token, id })
    }

    /// 为 `session` 启动保活任务，替换之前的任务。
    pub fn start_keep_alive(&mut self, session: &Session) {
        self.cancel_keep_alive();
        let vendor = self.vendor.clone();
        let session = session.clone();
        let period = self.keep_alive_interval;
        let session_id = session.id;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match vendor.update_session(&session).await {
                    Ok(()) => {
                        record_keep_alive_ok();
                        debug!(
                            target: "wolf.session",
                            session_id = %session.id,
                            "session_keep_alive_ok"
                        );
                    }
                    Err(err) => {
                        record_keep_alive_failed();
                        warn!(
                            target: "wolf.session",
                            session_id = %session.id,
                            error = %err,
                            "session_keep_alive_failed"
                        );
                    }
                }
            }
        });
        self.keep_alive = Some(KeepAlive { session_id, handle });
    }

    pub fn cancel_keep_alive(&mut self) {
        if let Some(keep_alive) = self.keep_alive.take() {
            debug!(
                target: "wolf.session",
                session_id = %keep_alive.session_id,
                "session_keep_alive_cancelled"
            );
        }
    }

    pub fn keep_alive_running(&self) -> bool {
        self.keep_alive
            .as_ref()
            .is_some_and(|keep_alive| !keep_alive.handle.is_finished())
    }

    /// 当前保活任务对应的会话。
    pub fn keep_alive_session(&self) -> Option<SessionId> {
        self.keep_alive.as_ref().map(|keep_alive| keep_alive.session_id)
    }
}

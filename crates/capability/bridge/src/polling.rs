use crate::installation::fetch_installation;
use crate::{BridgeError, BridgeSettings, StepOutcome};
use chrono::{SecondsFormat, Utc};
use domain::{Credentials, InstallationTarget, Session, SessionId};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use wolf_catalog::{Catalog, discovery_document, discovery_topic, resolve_display, topic_for};
use wolf_config::AppConfig;
use wolf_publish::Publisher;
use wolf_session::SessionManager;
use wolf_telemetry::{
    metrics, record_dropped_unmatched, record_poll_failed, record_poll_ok,
    record_publish_failure, record_reconnect, record_value_published,
};
use wolf_vendor::VendorApi;

/// 一次连接周期内的全部状态，重连时整体丢弃。
struct Connection {
    session: Session,
    target: InstallationTarget,
    catalog: Catalog,
    value_ids: Vec<i64>,
    last_access: String,
}

enum BridgeState {
    NeedsConnection,
    Polling(Box<Connection>),
}

pub struct PollingBridge {
    settings: BridgeSettings,
    credentials: Credentials,
    vendor: Arc<dyn VendorApi>,
    publisher: Arc<dyn Publisher>,
    sessions: SessionManager,
    state: BridgeState,
    connected_once: bool,
}

impl PollingBridge {
    pub fn new(
        config: &AppConfig,
        vendor: Arc<dyn VendorApi>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            settings: BridgeSettings::from_config(config),
            credentials: config.credentials.clone(),
            sessions: SessionManager::new(vendor.clone()),
            vendor,
            publisher,
            state: BridgeState::NeedsConnection,
            connected_once: false,
        }
    }

    /// 替换会话管理器（测试中缩短保活周期）。
    pub fn with_session_manager(mut self, sessions: SessionManager) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn is_polling(&self) -> bool {
        matches!(self.state, BridgeState::Polling(_))
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            BridgeState::Polling(connection) => Some(connection.session.id),
            BridgeState::NeedsConnection => None,
        }
    }

    /// 下一次拉取使用的水位。
    pub fn last_access(&self) -> Option<&str> {
        match &self.state {
            BridgeState::Polling(connection) => Some(connection.last_access.as_str()),
            BridgeState::NeedsConnection => None,
        }
    }

    pub fn keep_alive_running(&self) -> bool {
        self.sessions.keep_alive_running()
    }

    /// 按轮询周期循环执行 `step`，只在首次连接失败时返回。
    pub async fn run(&mut self) -> Result<(), BridgeError> {
        loop {
            let outcome = self.step().await?;
            debug!(
                target: "wolf.bridge",
                ?outcome,
                metrics = ?metrics().snapshot(),
                "poll_cycle_done"
            );
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    /// 必要时连接（每轮最多一次），然后拉取并发布一轮参数值。
    pub async fn step(&mut self) -> Result<StepOutcome, BridgeError> {
        if let BridgeState::NeedsConnection = self.state {
            match self.connect().await {
                Ok(connection) => {
                    self.connected_once = true;
                    self.state = BridgeState::Polling(Box::new(connection));
                }
                Err(err) => {
                    self.sessions.cancel_keep_alive();
                    if !self.connected_once {
                        return Err(err);
                    }
                    warn!(target: "wolf.bridge", error = %err, "reconnect_failed");
                    return Ok(StepOutcome::ConnectFailed);
                }
            }
        }
        Ok(self.poll().await)
    }

    async fn connect(&mut self) -> Result<Connection, BridgeError> {
        self.sessions.cancel_keep_alive();
        record_reconnect();
        let session = self.sessions.establish(&self.credentials).await?;
        self.sessions.start_keep_alive(&session);

        let installation =
            fetch_installation(self.vendor.as_ref(), &session.token, &self.settings.root_topic)
                .await?;
        let catalog = installation.catalog;
        if !self.settings.read_only {
            self.publish_discovery(&catalog).await;
        }

        let last_access = catalog
            .last_access_hint()
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        info!(
            target: "wolf.bridge",
            session_id = %session.id,
            parameters = catalog.len(),
            last_access = %last_access,
            "bridge_connected"
        );
        Ok(Connection {
            session,
            target: installation.target,
            value_ids: catalog.value_ids(),
            catalog,
            last_access,
        })
    }

    async fn publish_discovery(&self, catalog: &Catalog) {
        let expire_after = self.settings.expire_after_seconds();
        for descriptor in catalog.descriptors() {
            let topic = discovery_topic(
                &self.settings.discovery_prefix,
                &self.settings.discovery_id_prefix,
                descriptor,
            );
            let document = discovery_document(
                descriptor,
                &self.settings.root_topic,
                &self.settings.discovery_id_prefix,
                expire_after,
            );
            let payload = match serde_json::to_string(&document) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(
                        target: "wolf.bridge",
                        topic = %topic,
                        error = %err,
                        "discovery_encode_failed"
                    );
                    continue;
                }
            };
            if let Err(err) = self.publisher.publish(&topic, &payload).await {
                record_publish_failure();
                warn!(
                    target: "wolf.bridge",
                    topic = %topic,
                    error = %err,
                    "discovery_publish_failed"
                );
            }
        }
    }

    async fn poll(&mut self) -> StepOutcome {
        let connection = match &mut self.state {
            BridgeState::Polling(connection) => connection,
            BridgeState::NeedsConnection => return StepOutcome::ConnectFailed,
        };
        let batch = match self
            .vendor
            .parameter_values(
                &connection.session,
                &connection.target,
                &connection.value_ids,
                &connection.last_access,
            )
            .await
        {
            Ok(batch) => batch,
            Err(err) => {
                record_poll_failed();
                warn!(
                    target: "wolf.bridge",
                    error = %BridgeError::Poll(err.to_string()),
                    "poll_failed_reconnecting"
                );
                self.sessions.cancel_keep_alive();
                self.state = BridgeState::NeedsConnection;
                return StepOutcome::PollFailed;
            }
        };
        record_poll_ok();
        if !batch.last_access.is_empty() {
            connection.last_access = batch.last_access;
        }

        let mut published = 0;
        let mut dropped = 0;
        for value in &batch.values {
            let Some(descriptor) = connection.catalog.get(value.value_id) else {
                record_dropped_unmatched();
                dropped += 1;
                error!(target: "wolf.bridge", value_id = value.value_id, "value_unmatched");
                continue;
            };
            let display_value = resolve_display(descriptor, &value.raw_value);
            if self.settings.read_only {
                info!(
                    target: "wolf.bridge",
                    value_id = value.value_id,
                    name = %descriptor.name,
                    value = %display_value,
                    "value_read"
                );
                continue;
            }
            let topic = topic_for(descriptor, &self.settings.root_topic);
            match self.publisher.publish(&topic, display_value).await {
                Ok(()) => {
                    record_value_published();
                    published += 1;
                }
                Err(err) => {
                    record_publish_failure();
                    warn!(
                        target: "wolf.bridge",
                        topic = %topic,
                        error = %err,
                        "value_publish_failed"
                    );
                }
            }
        }
        debug!(
            target: "wolf.bridge",
            received = batch.values.len(),
            published,
            dropped,
            "poll_ok"
        );
        StepOutcome::Polled { published, dropped }
    }
}

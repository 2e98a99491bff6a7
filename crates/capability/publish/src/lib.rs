//! MQTT 发布能力：状态值与 discovery 文档都经由 `Publisher` 发出。

mod client_id;

use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use std::time::Duration;
use tracing::{debug, info, warn};

pub use client_id::{CLIENT_ID_PREFIX, client_id, client_id_from};

/// 客户端请求队列容量；broker 不可达时最多积压这么多条。
pub const REQUEST_QUEUE_CAPACITY: usize = 64;

/// 发布错误。
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("publish error: {0}")]
    Publish(String),
}

/// 发布器抽象。
#[async_trait]
pub trait Publisher: Send + Sync {
    /// QoS 1、不保留。尽力投递：不可投递时返回错误，不阻塞调用方。
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

/// 空发布器（只读模式与 `list` 使用）。
#[derive(Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl Publisher for NoopPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        debug!(target: "wolf.publish", topic, payload, "mqtt_publish_skipped");
        Ok(())
    }
}

/// MQTT Publisher 配置。
#[derive(Debug, Clone)]
pub struct MqttPublisherConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
}

/// 基于 rumqttc 的发布器；断线由后台事件循环自动重连。
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    pub fn connect(config: MqttPublisherConfig) -> (Self, tokio::task::JoinHandle<()>) {
        info!(
            target: "wolf.publish",
            client_id = %config.client_id,
            host = %config.host,
            port = config.port,
            "mqtt_connecting"
        );
        let mut options = MqttOptions::new(config.client_id, config.host, config.port);
        options.set_keep_alive(Duration::from_secs(120));
        if let (Some(username), Some(password)) = (config.username, config.password) {
            options.set_credentials(username, password);
        }
        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_QUEUE_CAPACITY);
        let handle = tokio::spawn(async move {
            let mut connected = false;
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        connected = true;
                        info!(target: "wolf.publish", "mqtt_connected");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        if connected {
                            warn!(target: "wolf.publish", error = %err, "mqtt_connection_lost");
                        } else {
                            warn!(target: "wolf.publish", error = %err, "mqtt_connect_failed");
                        }
                        connected = false;
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });
        (Self { client }, handle)
    }
}

#[async_trait]
impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        debug!(target: "wolf.publish", topic, payload, "mqtt_publish");
        // 队列满（broker 断开期间）直接报错，轮询循环不能被挂起。
        self.client
            .try_publish(topic, QoS::AtLeastOnce, false, payload.as_bytes().to_vec())
            .map_err(|err| PublishError::Publish(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_publisher_accepts_everything() {
        let publisher = NoopPublisher;
        publisher
            .publish("wolf/Room_Temp/state", "21.5")
            .await
            .expect("noop");
    }

    #[tokio::test]
    async fn publish_is_queued_while_broker_is_unreachable() {
        let (publisher, handle) = MqttPublisher::connect(MqttPublisherConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: None,
            password: None,
            client_id: "wolfmqttbridge-test".to_string(),
        });
        publisher
            .publish("wolf/Room_Temp/state", "21.5")
            .await
            .expect("queued");
        handle.abort();
    }

    #[tokio::test]
    async fn full_queue_fails_fast_instead_of_blocking() {
        let (publisher, handle) = MqttPublisher::connect(MqttPublisherConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: None,
            password: None,
            client_id: "wolfmqttbridge-test".to_string(),
        });
        let attempts = REQUEST_QUEUE_CAPACITY + 36;
        let results = tokio::time::timeout(Duration::from_secs(5), async {
            let mut results = Vec::with_capacity(attempts);
            for index in 0..attempts {
                let topic = format!("wolf/Parameter_{}/state", index);
                results.push(publisher.publish(&topic, "1").await);
            }
            results
        })
        .await
        .expect("publishing must not block");
        handle.abort();

        assert_eq!(results.len(), attempts);
        let failed = results.iter().filter(|result| result.is_err()).count();
        assert!(failed > 0);
        assert!(matches!(results.last(), Some(Err(PublishError::Publish(_)))));
    }
}

//! Wolf Smartset → MQTT 桥接入口：`list` 打印参数目录，`br` 运行轮询桥接。

mod cli;
mod list;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use wolf_bridge::{BridgeError, PollingBridge, load_installation};
use wolf_config::AppConfig;
use wolf_publish::{MqttPublisher, MqttPublisherConfig, NoopPublisher, Publisher, client_id};
use wolf_telemetry::init_tracing;
use wolf_vendor::PortalClient;

/// 认证被拒绝时的退出码，与其他致命错误区分。
const EXIT_AUTH_FAILED: u8 = 2;
const EXIT_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 命令行参数优先于环境变量
    let overrides = cli.overrides();
    let config = match AppConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    }) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {}", err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    init_tracing(config.debug);

    let vendor = match PortalClient::new(config.portal_url.clone()) {
        Ok(vendor) => Arc::new(vendor),
        Err(err) => {
            error!(target: "wolf.app", error = %err, "portal_client_failed");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match cli.command {
        Command::List => {
            let loaded = load_installation(
                vendor.as_ref(),
                &config.credentials,
                &config.mqtt_root_topic,
            )
            .await;
            match loaded {
                Ok(installation) => {
                    print!("{}", list::render(&installation));
                    ExitCode::SUCCESS
                }
                Err(err) => fatal(err),
            }
        }
        Command::Br => run_bridge(&config, vendor).await,
    }
}

async fn run_bridge(config: &AppConfig, vendor: Arc<PortalClient>) -> ExitCode {
    let mut mqtt_task = None;
    let publisher: Arc<dyn Publisher> = if config.read_only {
        info!(target: "wolf.app", "read_only_mode");
        Arc::new(NoopPublisher)
    } else {
        let (publisher, handle) = MqttPublisher::connect(MqttPublisherConfig {
            host: config.mqtt_host.clone(),
            port: config.mqtt_port,
            username: config.mqtt_username.clone(),
            password: config.mqtt_password.clone(),
            client_id: client_id(),
        });
        mqtt_task = Some(handle);
        Arc::new(publisher)
    };

    let mut bridge = PollingBridge::new(config, vendor, publisher);
    info!(
        target: "wolf.app",
        poll_interval_seconds = config.poll_interval.as_secs(),
        root_topic = %config.mqtt_root_topic,
        "bridge_started"
    );
    let code = tokio::select! {
        result = bridge.run() => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => fatal(err),
        },
        _ = tokio::signal::ctrl_c() => {
            info!(target: "wolf.app", "shutdown_requested");
            ExitCode::SUCCESS
        }
    };
    if let Some(handle) = mqtt_task {
        handle.abort();
    }
    code
}

fn fatal(err: BridgeError) -> ExitCode {
    error!(target: "wolf.app", error = %err, "bridge_fatal");
    if err.is_auth() {
        ExitCode::from(EXIT_AUTH_FAILED)
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

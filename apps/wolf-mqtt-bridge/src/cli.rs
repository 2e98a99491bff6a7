use clap::{Parser, Subcommand};

/// Wolf Smartset → MQTT 桥接。
#[derive(Parser, Debug)]
#[command(name = "wolf-mqtt-bridge", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 输出 debug 级别日志
    #[arg(long, global = true)]
    pub debug: bool,

    /// Wolf Smartset 用户名（覆盖 WOLF_USER）
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Wolf Smartset 密码（覆盖 WOLF_PASSWORD）
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// 门户地址（覆盖 WOLF_PORTAL_URL）
    #[arg(long, global = true, value_name = "URL")]
    pub portal_url: Option<String>,

    /// MQTT broker 主机
    #[arg(long, global = true)]
    pub mqtt_host: Option<String>,

    /// MQTT broker 端口
    #[arg(long, global = true)]
    pub mqtt_port: Option<u16>,

    #[arg(long, global = true)]
    pub mqtt_username: Option<String>,

    #[arg(long, global = true)]
    pub mqtt_password: Option<String>,

    /// state topic 根
    #[arg(long, global = true)]
    pub root_topic: Option<String>,

    /// Home Assistant discovery 前缀
    #[arg(long, global = true)]
    pub discovery_prefix: Option<String>,

    /// discovery unique_id 前缀
    #[arg(long, global = true)]
    pub discovery_id_prefix: Option<String>,

    /// 轮询间隔（秒，最小 10）
    #[arg(long, global = true, value_name = "SECONDS")]
    pub poll_interval: Option<u64>,

    /// 只拉取与记录日志，不发布 MQTT
    #[arg(long, global = true)]
    pub read_only: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 打印安装信息与全部参数后退出
    List,
    /// 运行桥接
    Br,
}

impl Cli {
    /// 命令行参数折算成配置键，优先于环境变量。
    pub fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut overrides = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                overrides.push((key, value));
            }
        };
        push("WOLF_USER", self.user.clone());
        push("WOLF_PASSWORD", self.password.clone());
        push("WOLF_PORTAL_URL", self.portal_url.clone());
        push("WOLF_MQTT_HOST", self.mqtt_host.clone());
        push("WOLF_MQTT_PORT", self.mqtt_port.map(|port| port.to_string()));
        push("WOLF_MQTT_USERNAME", self.mqtt_username.clone());
        push("WOLF_MQTT_PASSWORD", self.mqtt_password.clone());
        push("WOLF_MQTT_ROOT_TOPIC", self.root_topic.clone());
        push("WOLF_DISCOVERY_PREFIX", self.discovery_prefix.clone());
        push("WOLF_DISCOVERY_ID_PREFIX", self.discovery_id_prefix.clone());
        push(
            "WOLF_POLL_INTERVAL_SECONDS",
            self.poll_interval.map(|seconds| seconds.to_string()),
        );
        push("WOLF_READ_ONLY", self.read_only.then(|| "true".to_string()));
        push("WOLF_DEBUG", self.debug.then(|| "true".to_string()));
        overrides
    }
}

use std::time::Duration;
use wolf_config::AppConfig;

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("WOLF_USER", "user@example.com");
        std::env::set_var("WOLF_PASSWORD", "secret");
        std::env::set_var("WOLF_MQTT_HOST", "broker.local");
        std::env::set_var("WOLF_MQTT_PORT", "1884");
        std::env::set_var("WOLF_POLL_INTERVAL_SECONDS", "30");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.credentials.username, "user@example.com");
    assert_eq!(config.mqtt_host, "broker.local");
    assert_eq!(config.mqtt_port, 1884);
    assert_eq!(config.poll_interval, Duration::from_secs(30));
}

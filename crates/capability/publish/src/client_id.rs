use sysinfo::Networks;

pub const CLIENT_ID_PREFIX: &str = "wolfmqttbridge-";

/// 基于本机硬件地址的半固定 client id，同一主机多次启动保持一致。
pub fn client_id() -> String {
    let hostname = hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().to_string());
    client_id_from(first_mac_address(), hostname)
}

/// MAC 优先，其次主机名，都没有时只保留前缀。
pub fn client_id_from(mac: Option<String>, hostname: Option<String>) -> String {
    let suffix = mac
        .or(hostname)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_default();
    format!("{}{}", CLIENT_ID_PREFIX, suffix)
}

/// 按接口名排序后的第一个非零 MAC。
fn first_mac_address() -> Option<String> {
    let networks = Networks::new_with_refreshed_list();
    let mut interfaces: Vec<_> = networks
        .list()
        .iter()
        .filter(|(_, data)| !data.mac_address().is_unspecified())
        .map(|(name, data)| (name.clone(), data.mac_address().to_string()))
        .collect();
    interfaces.sort();
    interfaces.into_iter().next().map(|(_, mac)| mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_wins_over_hostname() {
        assert_eq!(
            client_id_from(Some("aa:bb:cc:dd:ee:ff".to_string()), Some("nas".to_string())),
            "wolfmqttbridge-aa:bb:cc:dd:ee:ff"
        );
    }

    #[test]
    fn hostname_fallback() {
        assert_eq!(
            client_id_from(None, Some("nas".to_string())),
            "wolfmqttbridge-nas"
        );
        assert_eq!(client_id_from(None, None), "wolfmqttbridge-");
    }

    #[test]
    fn detected_id_has_prefix() {
        assert!(client_id().starts_with(CLIENT_ID_PREFIX));
    }
}

use api_contract::DiscoveryDocument;
use domain::ParameterDescriptor;

/// discovery 文档声明的 QoS，与状态发布一致。
pub const DISCOVERY_QOS: u8 = 1;

/// 空白序列折叠为单个 `_`。
pub fn sanitize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `<root>/<sanitized name>/state`
pub fn topic_for(descriptor: &ParameterDescriptor, root: &str) -> String {
    format!(
        "{}/{}/state",
        root.trim_end_matches('/'),
        sanitize_name(&descriptor.name)
    )
}

/// `<id_prefix>-<name>`，参数名不做替换。
pub fn unique_id(id_prefix: &str, descriptor: &ParameterDescriptor) -> String {
    format!("{}-{}", id_prefix, descriptor.name)
}

/// `<discovery_prefix>/sensor/<id_prefix>-<name>/config`
pub fn discovery_topic(
    discovery_prefix: &str,
    id_prefix: &str,
    descriptor: &ParameterDescriptor,
) -> String {
    format!(
        "{}/sensor/{}/config",
        discovery_prefix.trim_end_matches('/'),
        unique_id(id_prefix, descriptor)
    )
}

pub fn discovery_document(
    descriptor: &ParameterDescriptor,
    root: &str,
    id_prefix: &str,
    expire_after: u64,
) -> DiscoveryDocument {
    DiscoveryDocument {
        name: descriptor.name.clone(),
        state_topic: topic_for(descriptor, root),
        unit_of_measurement: descriptor.unit.clone(),
        unique_id: unique_id(id_prefix, descriptor),
        expire_after,
        qos: DISCOVERY_QOS,
    }
}

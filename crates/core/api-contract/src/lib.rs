//! Wolf Smartset 门户的线上契约（DTO）与 Home Assistant discovery 文档。
//!
//! 门户 JSON 一律 PascalCase（认证接口除外，使用 OAuth 的 snake_case）。
//! 这里只声明桥接用到的字段，其余字段由 serde 忽略。

use serde::{Deserialize, Deserializer, Serialize};

/// 门户偶尔用 `null` 表示空值：按缺省值处理，与字段缺失一致。
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `POST /connect/token2` 响应体。
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(rename = "CultureInfoCode", default)]
    pub culture_info_code: Option<String>,
}

/// `POST /api/portal/CreateSession` 请求体。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSessionRequest {
    pub timestamp: String,
}

/// `POST /api/portal/UpdateSession` 请求体。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSessionRequest {
    pub session_id: i64,
}

/// `GET /api/portal/GetSystemList` 的单个条目。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemEntry {
    pub id: i64,
    pub gateway_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gateway_software_version: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_foreign_system: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_level: i64,
}

/// `GET /api/portal/GetGuiDescriptionForGateway` 响应体：菜单 → 标签页 → 参数。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GuiDescription {
    #[serde(default, deserialize_with = "null_as_default")]
    pub menu_items: Vec<MenuItem>,
}

/// GUI 描述中的菜单项。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tab_views: Vec<TabView>,
}

/// 菜单下的标签页。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TabView {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tab_name: String,
    #[serde(rename = "GuiId", default, deserialize_with = "null_as_default")]
    pub gui_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bundle_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameter_descriptors: Vec<ParameterDescriptorEntry>,
    #[serde(default)]
    pub get_value_last_access: Option<String>,
}

/// 标签页中的参数描述。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterDescriptorEntry {
    pub value_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameter_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read_only: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub list_items: Vec<ListItem>,
    /// 周计划等子参数，不属于可轮询的顶层值。
    #[serde(default, deserialize_with = "null_as_default")]
    pub child_parameter_descriptors: Vec<serde_json::Value>,
}

/// 枚举参数的候选值。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_text: String,
}

/// `POST /api/portal/GetParameterValues` 请求体。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterValuesRequest {
    pub bundle_id: i64,
    pub is_sub_bundle: bool,
    pub value_id_list: Vec<i64>,
    pub gateway_id: i64,
    pub system_id: i64,
    pub last_access: String,
    pub gui_id_changed: bool,
    pub session_id: i64,
}

/// `POST /api/portal/GetParameterValues` 响应体。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterValuesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_access: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<ValueEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_new_job_created: bool,
}

/// 单个参数值。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueEntry {
    pub value_id: i64,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: i32,
}

/// Home Assistant MQTT discovery 文档（sensor）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDocument {
    pub name: String,
    pub state_topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    pub unique_id: String,
    pub expire_after: u64,
    pub qos: u8,
}

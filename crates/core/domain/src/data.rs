/// 枚举型参数的一个取值（原始值 → 显示文本）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    pub value: String,
    pub display_text: String,
}

/// 可轮询的参数描述，由 GUI 描述树展平得到。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub value_id: i64,
    pub parameter_id: i64,
    pub name: String,
    pub group: String,
    pub unit: Option<String>,
    pub items: Vec<EnumItem>,
    pub read_only: bool,
    pub menu: String,
    pub tab: String,
}

/// 单次轮询返回的参数值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterValue {
    pub value_id: i64,
    pub raw_value: String,
    pub state: i32,
}

/// 一次轮询的结果：参数值与门户返回的新水位。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueBatch {
    pub last_access: String,
    pub values: Vec<ParameterValue>,
}

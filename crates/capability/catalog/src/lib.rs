//! 参数目录：把门户的 GUI 描述树展平成可轮询参数，并负责显示值与 topic 推导。

mod naming;

use api_contract::GuiDescription;
use domain::{EnumItem, ParameterDescriptor};
use std::collections::{BTreeMap, HashMap, HashSet};

pub use naming::{
    DISCOVERY_QOS, discovery_document, discovery_topic, sanitize_name, topic_for, unique_id,
};

/// 按菜单 → 标签页 → 参数的文档顺序展平 GUI 描述。
///
/// 子参数（周计划条目）不展开；同一 value id 重复出现时保留第一次。
pub fn build(gui: &GuiDescription) -> Vec<ParameterDescriptor> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();
    for menu in &gui.menu_items {
        for tab in &menu.tab_views {
            for entry in &tab.parameter_descriptors {
                if !seen.insert(entry.value_id) {
                    continue;
                }
                descriptors.push(ParameterDescriptor {
                    value_id: entry.value_id,
                    parameter_id: entry.parameter_id,
                    name: entry.name.clone(),
                    group: entry.group.clone(),
                    unit: entry
                        .unit
                        .as_deref()
                        .map(str::trim)
                        .filter(|unit| !unit.is_empty())
                        .map(str::to_string),
                    items: entry
                        .list_items
                        .iter()
                        .map(|item| EnumItem {
                            value: item.value.clone(),
                            display_text: item.display_text.clone(),
                        })
                        .collect(),
                    read_only: entry.is_read_only,
                    menu: menu.name.clone(),
                    tab: tab.tab_name.clone(),
                });
            }
        }
    }
    descriptors
}

/// 枚举翻译：精确匹配原始值，未匹配时原样返回。
pub fn resolve_display<'a>(descriptor: &'a ParameterDescriptor, raw: &'a str) -> &'a str {
    descriptor
        .items
        .iter()
        .find(|item| item.value == raw)
        .map(|item| item.display_text.as_str())
        .unwrap_or(raw)
}

/// 一次连接周期内不可变的参数目录。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<ParameterDescriptor>,
    index: HashMap<i64, usize>,
    last_access_hint: Option<String>,
}

impl Catalog {
    pub fn from_gui(gui: &GuiDescription) -> Self {
        let last_access_hint = gui
            .menu_items
            .iter()
            .flat_map(|menu| menu.tab_views.iter())
            .find_map(|tab| tab.get_value_last_access.clone())
            .filter(|value| !value.is_empty());
        let mut catalog = Self::from_descriptors(build(gui));
        catalog.last_access_hint = last_access_hint;
        catalog
    }

    pub fn from_descriptors(descriptors: Vec<ParameterDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(descriptors.len());
        let mut unique = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if index.contains_key(&descriptor.value_id) {
                continue;
            }
            index.insert(descriptor.value_id, unique.len());
            unique.push(descriptor);
        }
        Self {
            descriptors: unique,
            index,
            last_access_hint: None,
        }
    }

    pub fn get(&self, value_id: i64) -> Option<&ParameterDescriptor> {
        self.index
            .get(&value_id)
            .and_then(|position| self.descriptors.get(*position))
    }

    /// 轮询用的 value id 列表（目录顺序）。
    pub fn value_ids(&self) -> Vec<i64> {
        self.descriptors.iter().map(|descriptor| descriptor.value_id).collect()
    }

    pub fn descriptors(&self) -> &[ParameterDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// GUI 描述里携带的 `GetValueLastAccess`，用作首轮轮询的水位。
    pub fn last_access_hint(&self) -> Option<&str> {
        self.last_access_hint.as_deref()
    }

    /// 被多个参数共用的 state topic（只检测，不消解）。
    pub fn topic_collisions(&self, root: &str) -> Vec<(String, Vec<i64>)> {
        let mut topics: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        for descriptor in &self.descriptors {
            topics
                .entry(topic_for(descriptor, root))
                .or_default()
                .push(descriptor.value_id);
        }
        topics
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect()
    }
}

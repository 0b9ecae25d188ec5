use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SELECT_LABEL: &str = "Choose an item";
pub const DEFAULT_LABEL_PROPERTY: &str = "name";
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#bde4ff";

const LABEL_BASE: &str = "field-label leading-none mb-2";
const CONTAINER_BASE: &str = "relative";
const TRIGGER_BASE: &str = "field-input overflow-hidden text-left";
const MENU_BASE: &str =
    "absolute mt-1 w-full rounded-md bg-white border border-gray-400 z-10 outline-none overflow-hidden";
const ITEM_BASE: &str = "p-1 px-3 cursor-pointer";

/// Presentation settings for a dropdown.
///
/// Items are JSON values: either plain values rendered as-is, or objects
/// whose `object_label_property` field is the label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropdownConfig {
    pub items_are_objects: bool,
    pub object_label_property: String,
    pub select_label: String,
    pub label_value: Option<String>,
    pub hide_label: bool,
    pub required: bool,
    pub label_classes: String,
    pub select_container_classes: String,
    pub trigger_classes: String,
    pub ul_classes: String,
    pub li_classes: String,
    pub highlight_color: String,
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            items_are_objects: false,
            object_label_property: DEFAULT_LABEL_PROPERTY.to_string(),
            select_label: DEFAULT_SELECT_LABEL.to_string(),
            label_value: None,
            hide_label: false,
            required: false,
            label_classes: String::new(),
            select_container_classes: String::new(),
            trigger_classes: String::new(),
            ul_classes: String::new(),
            li_classes: String::new(),
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        }
    }
}

impl DropdownConfig {
    pub fn item_label(&self, item: &Value) -> String {
        if self.items_are_objects {
            item.get(&self.object_label_property)
                .map(value_text)
                .unwrap_or_default()
        } else {
            value_text(item)
        }
    }

    /// Text for the toggle button: the selected item's label, or the
    /// placeholder when nothing with a label is selected.
    pub fn display_label(&self, selected: Option<&Value>) -> String {
        selected
            .map(|item| self.item_label(item))
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| self.select_label.clone())
    }

    pub fn label_class(&self) -> String {
        join_classes(&[
            LABEL_BASE,
            if self.required { "required" } else { "" },
            if self.hide_label { "sr-only" } else { "" },
            &self.label_classes,
        ])
    }

    pub fn container_class(&self) -> String {
        join_classes(&[CONTAINER_BASE, &self.select_container_classes])
    }

    pub fn trigger_class(&self) -> String {
        join_classes(&[TRIGGER_BASE, &self.trigger_classes])
    }

    pub fn menu_class(&self) -> String {
        join_classes(&[MENU_BASE, &self.ul_classes])
    }

    pub fn item_class(&self) -> String {
        join_classes(&[ITEM_BASE, &self.li_classes])
    }

    /// Inline style for a list item.
    pub fn item_style(&self, highlighted: bool) -> String {
        if highlighted && !self.highlight_color.is_empty() {
            format!("background-color: {}", self.highlight_color)
        } else {
            String::new()
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn join_classes(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object_config() -> DropdownConfig {
        DropdownConfig {
            items_are_objects: true,
            object_label_property: "label".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = DropdownConfig::default();
        assert_eq!(config.select_label, "Choose an item");
        assert_eq!(config.object_label_property, "name");
        assert_eq!(config.highlight_color, "#bde4ff");
        assert!(!config.items_are_objects);
        assert!(config.label_value.is_none());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: DropdownConfig = serde_json::from_str(
            r#"{"items_are_objects": true, "object_label_property": "label", "required": true}"#,
        )
        .unwrap();
        assert!(config.items_are_objects);
        assert_eq!(config.object_label_property, "label");
        assert_eq!(config.select_label, DEFAULT_SELECT_LABEL);
        assert!(config.required);
    }

    #[test]
    fn test_item_label_for_objects() {
        let config = object_config();
        assert_eq!(config.item_label(&json!({"label": "Born a crime"})), "Born a crime");
        assert_eq!(config.item_label(&json!({"name": "Other"})), "");
        assert_eq!(config.item_label(&json!({"label": 42})), "42");
    }

    #[test]
    fn test_item_label_for_raw_values() {
        let config = DropdownConfig::default();
        assert_eq!(config.item_label(&json!("Ada")), "Ada");
        assert_eq!(config.item_label(&json!(7)), "7");
        assert_eq!(config.item_label(&Value::Null), "");
    }

    #[test]
    fn test_display_label_falls_back_to_placeholder() {
        let config = object_config();
        assert_eq!(config.display_label(None), "Choose an item");
        assert_eq!(
            config.display_label(Some(&json!({"label": "Net Moves"}))),
            "Net Moves"
        );
        assert_eq!(config.display_label(Some(&json!({"label": ""}))), "Choose an item");
    }

    #[test]
    fn test_class_composition() {
        let config = DropdownConfig {
            required: true,
            hide_label: true,
            label_classes: "text-sm".to_string(),
            trigger_classes: " w-64 ".to_string(),
            ..Default::default()
        };

        assert_eq!(
            config.label_class(),
            "field-label leading-none mb-2 required sr-only text-sm"
        );
        assert_eq!(config.trigger_class(), "field-input overflow-hidden text-left w-64");
        assert_eq!(config.container_class(), "relative");
        assert_eq!(config.item_class(), "p-1 px-3 cursor-pointer");
        assert!(config.menu_class().starts_with("absolute mt-1"));
    }

    #[test]
    fn test_item_style() {
        let mut config = DropdownConfig::default();
        assert_eq!(config.item_style(true), "background-color: #bde4ff");
        assert_eq!(config.item_style(false), "");
        config.highlight_color.clear();
        assert_eq!(config.item_style(true), "");
    }
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTaskbarItem {
    pub name: String,
    /// Click action or handler name. `wm:start-menu` turns the item into a
    /// start button.
    #[serde(default)]
    pub click: Option<String>,
    /// Markup shown inside the cell. Defaults to the item name.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMenuItem {
    pub name: String,
    pub click: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerOptions {
    pub min_height: f64,
    pub min_width: f64,
    #[serde(rename = "dataURL")]
    pub data_url: String,
    pub taskbar: bool,
    pub taskbar_items: Vec<String>,
    pub custom_taskbar_items: Vec<CustomTaskbarItem>,
    pub start_menu_items: Vec<StartMenuItem>,
    pub background: String,
    pub themes: BTreeMap<String, String>,
    pub theme_prefix: String,
    pub border_radius: String,
    pub project_title: String,
    pub version: String,
    pub data: Value,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            min_height: 100.0,
            min_width: 200.0,
            data_url: String::new(),
            taskbar: false,
            taskbar_items: ["start", "trays", "details", "datetime"]
                .into_iter()
                .map(String::from)
                .collect(),
            custom_taskbar_items: Vec::new(),
            start_menu_items: Vec::new(),
            background: String::new(),
            themes: [("light", "light"), ("blue", "blue")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            theme_prefix: "light".to_string(),
            border_radius: "10".to_string(),
            project_title: "pane-wm".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            data: Value::Object(Default::default()),
        }
    }
}

impl ManagerOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Theme class prefix. Unknown prefixes fall back to the raw value.
    pub fn theme(&self) -> &str {
        self.themes
            .get(&self.theme_prefix)
            .map_or(self.theme_prefix.as_str(), String::as_str)
    }

    pub fn apply_change(&mut self, change: OptionChange) -> ChangeEffect {
        match change {
            OptionChange::MinHeight(v) => {
                self.min_height = v;
                ChangeEffect::UpdateResizeLimits
            }
            OptionChange::MinWidth(v) => {
                self.min_width = v;
                ChangeEffect::UpdateResizeLimits
            }
            OptionChange::DataUrl(v) => {
                self.data_url = v;
                ChangeEffect::None
            }
            OptionChange::Taskbar(v) => {
                self.taskbar = v;
                ChangeEffect::RebuildTaskbar
            }
            OptionChange::TaskbarItems(v) => {
                self.taskbar_items = v;
                ChangeEffect::RebuildTaskbar
            }
            OptionChange::CustomTaskbarItems(v) => {
                self.custom_taskbar_items = v;
                ChangeEffect::RebuildTaskbar
            }
            OptionChange::StartMenuItems(v) => {
                self.start_menu_items = v;
                ChangeEffect::None
            }
            OptionChange::Background(v) => {
                self.background = v;
                ChangeEffect::UpdateBackground
            }
            OptionChange::Themes(v) => {
                self.themes = v;
                ChangeEffect::Retheme
            }
            OptionChange::ThemePrefix(v) => {
                self.theme_prefix = v;
                ChangeEffect::Retheme
            }
            OptionChange::BorderRadius(v) => {
                self.border_radius = v;
                ChangeEffect::Retheme
            }
            OptionChange::ProjectTitle(v) => {
                self.project_title = v;
                ChangeEffect::RebuildTaskbar
            }
            OptionChange::Version(v) => {
                self.version = v;
                ChangeEffect::RebuildTaskbar
            }
            OptionChange::Data(v) => {
                self.data = v;
                ChangeEffect::ReplaceData
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionChange {
    MinHeight(f64),
    MinWidth(f64),
    DataUrl(String),
    Taskbar(bool),
    TaskbarItems(Vec<String>),
    CustomTaskbarItems(Vec<CustomTaskbarItem>),
    StartMenuItems(Vec<StartMenuItem>),
    Background(String),
    Themes(BTreeMap<String, String>),
    ThemePrefix(String),
    BorderRadius(String),
    ProjectTitle(String),
    Version(String),
    Data(Value),
}

impl OptionChange {
    /// Parses a dynamic `key = value` assignment using the JSON option names.
    pub fn from_key_value(key: &str, value: Value) -> Result<Self, ConfigError> {
        fn parse<T: serde::de::DeserializeOwned>(key: &str, value: Value) -> Result<T, ConfigError> {
            serde_json::from_value(value).map_err(|source| ConfigError::InvalidValue {
                key: key.to_string(),
                source,
            })
        }

        Ok(match key {
            "minHeight" => OptionChange::MinHeight(parse(key, value)?),
            "minWidth" => OptionChange::MinWidth(parse(key, value)?),
            "dataURL" => OptionChange::DataUrl(parse(key, value)?),
            "taskbar" => OptionChange::Taskbar(parse(key, value)?),
            "taskbarItems" => OptionChange::TaskbarItems(parse(key, value)?),
            "customTaskbarItems" => OptionChange::CustomTaskbarItems(parse(key, value)?),
            "startMenuItems" => OptionChange::StartMenuItems(parse(key, value)?),
            "background" => OptionChange::Background(parse(key, value)?),
            "themes" => OptionChange::Themes(parse(key, value)?),
            "themePrefix" => OptionChange::ThemePrefix(parse(key, value)?),
            "borderRadius" => OptionChange::BorderRadius(match value {
                Value::Number(n) => n.to_string(),
                other => parse(key, other)?,
            }),
            "projectTitle" => OptionChange::ProjectTitle(parse(key, value)?),
            "version" => OptionChange::Version(parse(key, value)?),
            "data" => OptionChange::Data(value),
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEffect {
    None,
    UpdateBackground,
    RebuildTaskbar,
    Retheme,
    UpdateResizeLimits,
    ReplaceData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let options = ManagerOptions::default();
        assert_eq!(options.min_height, 100.0);
        assert_eq!(options.min_width, 200.0);
        assert!(!options.taskbar);
        assert_eq!(options.taskbar_items, ["start", "trays", "details", "datetime"]);
        assert_eq!(options.theme(), "light");
        assert_eq!(options.border_radius, "10");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options = ManagerOptions::from_json_str(indoc! {r#"
            {
                "taskbar": true,
                "dataURL": "/api?x=1",
                "themePrefix": "blue",
                "startMenuItems": [{"name": "Notes", "click": "open-notes"}]
            }
        "#})
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(options.taskbar);
        assert_eq!(options.data_url, "/api?x=1");
        assert_eq!(options.theme(), "blue");
        assert_eq!(options.min_width, 200.0);
        assert_eq!(options.start_menu_items[0].click, "open-notes");
    }

    #[test]
    fn key_value_changes_parse_and_report_effects() {
        let mut options = ManagerOptions::default();
        let change = OptionChange::from_key_value("background", json!("sky.png"))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(options.apply_change(change), ChangeEffect::UpdateBackground);
        assert_eq!(options.background, "sky.png");

        let change = OptionChange::from_key_value("borderRadius", json!(4)).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(options.apply_change(change), ChangeEffect::Retheme);
        assert_eq!(options.border_radius, "4");
    }

    #[test]
    fn bad_keys_and_values_are_errors() {
        assert!(matches!(
            OptionChange::from_key_value("icons", json!([])),
            Err(ConfigError::UnknownOption(key)) if key == "icons"
        ));
        assert!(matches!(
            OptionChange::from_key_value("taskbar", json!("yes")),
            Err(ConfigError::InvalidValue { key, .. }) if key == "taskbar"
        ));
    }
}

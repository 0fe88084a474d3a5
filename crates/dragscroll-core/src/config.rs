//! Binding configuration.

use crate::input::MouseButton;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Handle selector is empty")]
    EmptySelector,
}

/// Which descendants of a bound element act as drag handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum HandleSelector {
    /// The first child element.
    #[default]
    FirstChild,
    /// A CSS selector evaluated against the bound element's descendants.
    ///
    /// A leading `>` restricts matching to direct children.
    Css(String),
}

impl HandleSelector {
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }
}

/// Drag-to-scroll options, fixed for the lifetime of a binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragScrollConfig {
    /// Descendants that start a drag when pressed.
    pub handle_selector: HandleSelector,
    /// Accept presses that bubbled up from a descendant of the handle.
    pub accept_propagated_event: bool,
    /// Suppress the default action and bubbling of handled mouse events.
    pub prevent_default: bool,
    /// Same as `prevent_default`, for touch events.
    pub touch_prevent_default: bool,
    /// Mouse button that starts a drag.
    pub trigger_button: MouseButton,
    /// Allow the vertical scroll offset to change.
    pub allow_vertical: bool,
}

impl Default for DragScrollConfig {
    fn default() -> Self {
        Self {
            handle_selector: HandleSelector::FirstChild,
            accept_propagated_event: true,
            prevent_default: true,
            touch_prevent_default: false,
            trigger_button: MouseButton::Left,
            allow_vertical: true,
        }
    }
}

impl DragScrollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that can never match a handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.handle_selector {
            HandleSelector::Css(selector) if selector.trim().trim_start_matches('>').trim().is_empty() => {
                Err(ConfigError::EmptySelector)
            }
            _ => Ok(()),
        }
    }

    pub fn with_handle_selector(mut self, selector: HandleSelector) -> Self {
        self.handle_selector = selector;
        self
    }

    pub fn with_accept_propagated_event(mut self, accept: bool) -> Self {
        self.accept_propagated_event = accept;
        self
    }

    pub fn with_prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    pub fn with_touch_prevent_default(mut self, prevent: bool) -> Self {
        self.touch_prevent_default = prevent;
        self
    }

    pub fn with_trigger_button(mut self, button: MouseButton) -> Self {
        self.trigger_button = button;
        self
    }

    pub fn with_allow_vertical(mut self, allow: bool) -> Self {
        self.allow_vertical = allow;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DragScrollConfig::default();
        assert_eq!(config.handle_selector, HandleSelector::FirstChild);
        assert!(config.accept_propagated_event);
        assert!(config.prevent_default);
        assert!(!config.touch_prevent_default);
        assert_eq!(config.trigger_button, MouseButton::Left);
        assert!(config.allow_vertical);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DragScrollConfig::from_json(r#"{ "allow_vertical": false }"#).unwrap();
        assert!(!config.allow_vertical);
        assert!(config.prevent_default);
        assert_eq!(config.handle_selector, HandleSelector::FirstChild);
    }

    #[test]
    fn test_css_selector_json() {
        let json = r#"{
            "handle_selector": { "kind": "css", "value": ".handle" },
            "trigger_button": "Middle"
        }"#;
        let config = DragScrollConfig::from_json(json).unwrap();
        assert_eq!(config.handle_selector, HandleSelector::css(".handle"));
        assert_eq!(config.trigger_button, MouseButton::Middle);
    }

    #[test]
    fn test_unknown_button_is_accepted() {
        let config = DragScrollConfig::from_json(r#"{ "trigger_button": { "Other": 7 } }"#).unwrap();
        assert_eq!(config.trigger_button, MouseButton::Other(7));
    }

    #[test]
    fn test_empty_selector_rejected() {
        let json = r#"{ "handle_selector": { "kind": "css", "value": " > " } }"#;
        assert!(matches!(
            DragScrollConfig::from_json(json),
            Err(ConfigError::EmptySelector)
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            DragScrollConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_of_builder() {
        let config = DragScrollConfig::new()
            .with_handle_selector(HandleSelector::css("> .grip"))
            .with_trigger_button(MouseButton::Right)
            .with_touch_prevent_default(true);
        let parsed = DragScrollConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}

//! 页面配置
//!
//! Everything the widgets look up in the markup (class names, selectors,
//! timings, visitor-facing messages) comes from [`PageConfig`]. The default
//! value describes the stock landing page; hosts override it from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

fn default_feedback_delay_ms() -> u64 {
    3000
}

fn default_redirect_form_type() -> String {
    "ticket".to_string()
}

/// One modal dialog known to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalConfig {
    /// Registry key (`register`, `payment`, ...)
    pub name: String,
    /// Selector of the modal root
    pub selector: String,
    /// Selector of the elements that open it; `None` for modals opened by code only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_selector: Option<String>,
    /// Whether the modal's form goes through the submission pipeline
    #[serde(default)]
    pub has_form: bool,
}

impl ModalConfig {
    /// Modal whose root is `.{name}` and trigger `.{name}__open`
    pub fn conventional(name: &str, has_form: bool) -> Self {
        Self {
            name: name.to_string(),
            selector: format!(".{name}"),
            open_selector: Some(format!(".{name}__open")),
            has_form,
        }
    }
}

/// Class names shared with the stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub active: String,
    pub open: String,
    pub hide: String,
    pub selected: String,
    pub invalid: String,
    pub no_scroll: String,
    pub overlay: String,
    pub modal: String,
    pub modal_close: String,
    pub modal_success: String,
    pub modal_error: String,
    pub select_hidden: String,
    pub select_wrapper: String,
    pub select_styled: String,
    pub select_title: String,
    pub select_options: String,
    pub header: String,
    pub header_burger: String,
    pub header_menu: String,
    pub header_menu_open: String,
    pub tab: String,
    pub tab_button: String,
    pub tab_pane: String,
    pub tab_button_active: String,
    pub tab_pane_show: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            active: "active".into(),
            open: "open".into(),
            hide: "hide".into(),
            selected: "selected".into(),
            invalid: "invalid".into(),
            no_scroll: "no-scroll".into(),
            overlay: "overlay".into(),
            modal: "modal".into(),
            modal_close: "modal__close".into(),
            modal_success: "modal__success".into(),
            modal_error: "modal__error".into(),
            select_hidden: "select-hidden".into(),
            select_wrapper: "select".into(),
            select_styled: "select-styled".into(),
            select_title: "select-styled__title".into(),
            select_options: "select-options".into(),
            header: "header".into(),
            header_burger: "header__burger".into(),
            header_menu: "header__menu".into(),
            header_menu_open: "header__menu--open".into(),
            tab: "tab".into(),
            tab_button: "tab-btn".into(),
            tab_pane: "tab-pane".into(),
            tab_button_active: "tab-btn-active".into(),
            tab_pane_show: "tab-pane-show".into(),
        }
    }
}

/// Visitor-facing texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    /// Shown on an empty required field
    pub required: String,
    /// Shown on a malformed email field
    pub email: String,
    /// Blocking alert after a failed submission
    pub submit_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required: "необходимо заполнить поле".into(),
            email: "Поле заполнено некорректно".into(),
            submit_failed: "Ошибка при отправке формы".into(),
        }
    }
}

/// 页面配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub modals: Vec<ModalConfig>,
    /// Feedback panel lifetime, also the redirect delay
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
    /// `href` of the injected close button's icon
    pub close_icon_href: String,
    /// Reply `FORM_TYPE` that triggers the post-submit redirect
    #[serde(default = "default_redirect_form_type")]
    pub redirect_form_type: String,
    /// Selector of the native selects replaced by dropdowns
    pub dropdown_selector: String,
    /// Hidden field receiving the trigger's `data-type`
    pub type_field_name: String,
    /// `data-*` key read from the trigger
    pub type_data_key: String,
    pub classes: ClassNames,
    pub messages: Messages,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            modals: vec![
                ModalConfig::conventional("become-partner", true),
                ModalConfig::conventional("register", true),
                ModalConfig::conventional("payment", true),
                ModalConfig {
                    name: "get-videos".into(),
                    selector: ".get-videos".into(),
                    open_selector: None,
                    has_form: false,
                },
            ],
            feedback_delay_ms: default_feedback_delay_ms(),
            close_icon_href: "/local/templates/digital_2024_autumn/assets/svg/sprite.svg#icon-close"
                .into(),
            redirect_form_type: default_redirect_form_type(),
            dropdown_selector: "select".into(),
            type_field_name: "type_action".into(),
            type_data_key: "type".into(),
            classes: ClassNames::default(),
            messages: Messages::default(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON config; absent keys take their defaults
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::ConfigError(format!("Invalid page config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    pub fn modal(&self, name: &str) -> Option<&ModalConfig> {
        self.modals.iter().find(|m| m.name == name)
    }

    fn validate(&self) -> CoreResult<()> {
        let mut seen = std::collections::HashSet::new();
        for modal in &self.modals {
            if modal.name.is_empty() {
                return Err(CoreError::ConfigError("modal name must not be empty".into()));
            }
            if !seen.insert(modal.name.as_str()) {
                return Err(CoreError::ConfigError(format!(
                    "duplicate modal name: {}",
                    modal.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lists_stock_modals() {
        let config = PageConfig::default();
        let names: Vec<&str> = config.modals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["become-partner", "register", "payment", "get-videos"]);

        let register = config.modal("register").unwrap();
        assert_eq!(register.selector, ".register");
        assert_eq!(register.open_selector.as_deref(), Some(".register__open"));
        assert!(register.has_form);
        assert!(config.modal("get-videos").unwrap().open_selector.is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PageConfig::from_json_str(
            r#"{"feedbackDelayMs": 1500, "classes": {"noScroll": "locked"}}"#,
        )
        .unwrap();
        assert_eq!(config.feedback_delay_ms, 1500);
        assert_eq!(config.classes.no_scroll, "locked");
        assert_eq!(config.classes.overlay, "overlay");
        assert_eq!(config.redirect_form_type, "ticket");
        assert_eq!(config.modals.len(), 4);
    }

    #[test]
    fn modal_list_replaces_defaults() {
        let config = PageConfig::from_json_str(
            r##"{"modals": [{"name": "callback", "selector": "#callback", "hasForm": true}]}"##,
        )
        .unwrap();
        assert_eq!(config.modals.len(), 1);
        assert!(config.modals[0].open_selector.is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let result = PageConfig::from_json_str(
            r#"{"modals": [{"name": "a", "selector": ".a"}, {"name": "a", "selector": ".b"}]}"#,
        );
        assert!(matches!(result, Err(CoreError::ConfigError(_))));
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            PageConfig::from_json_str("{"),
            Err(CoreError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = PageConfig::from_file("/nonexistent/pagekit.json");
        assert!(matches!(result, Err(CoreError::ConfigError(_))));
    }
}

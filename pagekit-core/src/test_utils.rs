//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use async_trait::async_trait;
use pagekit_transport::{FormSubmission, FormTransport, SubmissionReply, TransportError};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::PageConfig;
use crate::dom::{Document, NodeId, NodeSpec};
use crate::page::Page;
use crate::traits::BrowserHost;

// ===== MockTransport =====

pub struct MockTransport {
    calls: Mutex<Vec<FormSubmission>>,
    result: Result<SubmissionReply, TransportError>,
}

impl MockTransport {
    pub fn succeeding(body: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Ok(SubmissionReply::from_value(body)),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Err(error),
        }
    }

    pub async fn calls(&self) -> Vec<FormSubmission> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl FormTransport for MockTransport {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn submit(&self, submission: &FormSubmission) -> pagekit_transport::Result<SubmissionReply> {
        self.calls.lock().await.push(submission.clone());
        self.result.clone()
    }
}

// ===== RecordingHost =====

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
}

impl BrowserHost for RecordingHost {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}

// ===== Fixtures =====

fn modal_form(name: &str, action: &str, fields: Value) -> Value {
    let mut children = vec![json!({"tag": "input", "attrs": {"type": "hidden", "name": "type_action"}})];
    if let Value::Array(fields) = fields {
        children.extend(fields);
    }
    children.push(json!({"tag": "button", "text": "Send"}));
    json!({"tag": "div", "class": format!("modal {name}"), "children": [
        {"tag": "form", "attrs": {"action": action}, "children": children},
        {"tag": "div", "class": "modal__success", "text": "Thank you"},
        {"tag": "div", "class": "modal__error", "text": "Something went wrong"}
    ]})
}

/// Markup of the stock landing page
pub fn landing_spec() -> NodeSpec {
    let value = json!({
        "tag": "body",
        "children": [
            {"tag": "header", "class": "header", "children": [
                {"tag": "button", "class": "header__burger", "children": [{"tag": "span"}]},
                {"tag": "nav", "class": "header__menu", "children": [
                    {"tag": "ul", "children": [
                        {"tag": "li", "children": [{"tag": "a", "attrs": {"href": "#program"}, "text": "Program"}]},
                        {"tag": "li", "children": [{"tag": "a", "attrs": {"href": "#speakers"}, "text": "Speakers"}]}
                    ]}
                ]}
            ]},
            {"tag": "h1", "text": "Digital Autumn"},
            {"tag": "a", "class": "btn register__open", "attrs": {"data-type": "vip"}, "children": [
                {"tag": "span", "text": "Register"}
            ]},
            {"tag": "button", "class": "btn payment__open", "attrs": {"data-type": "ticket"}, "text": "Buy ticket"},
            {"tag": "button", "class": "btn become-partner__open", "text": "Become a partner"},
            {"tag": "form", "class": "search", "children": [{"tag": "input", "attrs": {"name": "q"}}]},
            {"tag": "section", "class": "tab", "children": [
                {"tag": "button", "class": "tab-btn tab-btn-active", "attrs": {"data-target-id": "day1"}, "text": "Day 1"},
                {"tag": "button", "class": "tab-btn", "attrs": {"data-target-id": "day2"}, "text": "Day 2"},
                {"tag": "div", "class": "tab-pane tab-pane-show", "attrs": {"data-id": "day1"}},
                {"tag": "div", "class": "tab-pane", "attrs": {"data-id": "day2"}}
            ]},
            modal_form("register", "/ajax/register.php", json!([
                {"tag": "input", "attrs": {"name": "name", "required": ""}},
                {"tag": "input", "attrs": {"name": "email", "type": "email"}},
                {"tag": "select", "attrs": {"name": "city"}, "children": [
                    {"tag": "option", "attrs": {"value": ""}, "text": "City"},
                    {"tag": "option", "attrs": {"value": "nn"}, "text": "Nizhny Novgorod"},
                    {"tag": "option", "attrs": {"value": "msk"}, "text": "Moscow"}
                ]}
            ])),
            modal_form("payment", "/ajax/payment.php", json!([
                {"tag": "input", "attrs": {"name": "phone", "type": "tel", "required": ""}},
                {"tag": "select", "attrs": {"name": "tariff", "data-title": "Tariff"}, "children": [
                    {"tag": "option", "attrs": {"value": "base"}, "text": "Base"},
                    {"tag": "option", "attrs": {"value": "pro"}, "text": "Pro"}
                ]}
            ])),
            modal_form("become-partner", "/ajax/partner.php", json!([
                {"tag": "input", "attrs": {"name": "company", "required": ""}}
            ])),
            {"tag": "div", "class": "modal get-videos", "children": [
                {"tag": "div", "class": "video"}
            ]}
        ]
    });
    serde_json::from_value(value).unwrap()
}

pub fn landing_page() -> Page {
    Page::mount(Document::from_spec(&landing_spec()), PageConfig::default()).unwrap()
}

/// First node matching `selector`; panics when absent
pub fn node(page: &Page, selector: &str) -> NodeId {
    page.query(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("no node matches {selector}"))
}

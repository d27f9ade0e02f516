//! Submission payload and reply types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A single named form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Field name (`name` attribute).
    pub name: String,
    /// Current value.
    pub value: String,
}

/// Ordered multipart field set.
///
/// Keeps document order and allows repeated names, like a browser `FormData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, keeping any earlier field with the same name.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FormPayload {
    type Item = &'a FormField;
    type IntoIter = std::slice::Iter<'a, FormField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// One submission attempt, owned so it can cross an `await`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Correlates the request with the page-side bookkeeping in logs.
    pub id: Uuid,
    /// Form `action` URL.
    pub action: String,
    /// Serialized fields.
    pub payload: FormPayload,
}

impl FormSubmission {
    #[must_use]
    pub fn new(action: impl Into<String>, payload: FormPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            action: action.into(),
            payload,
        }
    }
}

/// Parsed success body.
///
/// The endpoint answers with a JSON object that carries at least a submission
/// purpose tag (`FORM_TYPE`) and optionally a redirect URL (`RK_LINK`). Any other
/// keys are kept in `extra`. A JSON body that is not an object is accepted and
/// yields an empty reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReply {
    /// Submission purpose tag.
    #[serde(rename = "FORM_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<Value>,
    /// Redirect target.
    #[serde(rename = "RK_LINK", default, skip_serializing_if = "Option::is_none")]
    pub redirect_link: Option<Value>,
    /// Remaining keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmissionReply {
    /// Build a reply from any JSON value.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                form_type: map.remove("FORM_TYPE"),
                redirect_link: map.remove("RK_LINK"),
                extra: map,
            },
            _ => Self::default(),
        }
    }

    /// `FORM_TYPE` when it is a string.
    pub fn form_type(&self) -> Option<&str> {
        self.form_type.as_ref().and_then(Value::as_str)
    }

    /// `RK_LINK` when it is a non-empty string.
    pub fn redirect_link(&self) -> Option<&str> {
        self.redirect_link
            .as_ref()
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
    }

    /// Redirect target, but only when the reply is tagged with `form_type`.
    pub fn redirect_for(&self, form_type: &str) -> Option<&str> {
        if self.form_type() == Some(form_type) {
            self.redirect_link()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_keeps_order_and_duplicates() {
        let mut payload = FormPayload::new();
        payload.push("topic", "a");
        payload.push("name", "Ada");
        payload.push("topic", "b");

        let names: Vec<&str> = payload.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["topic", "name", "topic"]);
        assert_eq!(payload.get("topic"), Some("a"));
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn reply_with_ticket_redirect() {
        let reply = SubmissionReply::from_value(json!({
            "FORM_TYPE": "ticket",
            "RK_LINK": "https://x/y",
            "ID": 7
        }));
        assert_eq!(reply.form_type(), Some("ticket"));
        assert_eq!(reply.redirect_for("ticket"), Some("https://x/y"));
        assert_eq!(reply.redirect_for("partner"), None);
        assert_eq!(reply.extra.get("ID"), Some(&json!(7)));
    }

    #[test]
    fn empty_link_is_no_redirect() {
        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": "ticket", "RK_LINK": ""}));
        assert_eq!(reply.redirect_for("ticket"), None);

        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": "ticket", "RK_LINK": null}));
        assert_eq!(reply.redirect_for("ticket"), None);
    }

    #[test]
    fn non_object_body_is_empty_reply() {
        assert_eq!(SubmissionReply::from_value(json!(true)), SubmissionReply::default());
        assert_eq!(SubmissionReply::from_value(json!([1, 2])), SubmissionReply::default());
    }

    #[test]
    fn numeric_form_type_is_ignored() {
        let reply = SubmissionReply::from_value(json!({"FORM_TYPE": 1, "RK_LINK": "https://x"}));
        assert_eq!(reply.form_type(), None);
        assert_eq!(reply.redirect_for("1"), None);
    }
}

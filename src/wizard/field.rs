//! Field declarations and the values a wizard session collects for them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::rules::{conventional_rules, Rule};

/// Current value of every field in a session, keyed by field name.
pub type FormData = BTreeMap<String, FieldValue>;

/// Field name to error message. An absent key means the field is valid.
pub type FieldErrors = BTreeMap<String, String>;

/// Callback fired after a field's value (and error) has been stored.
pub type ChangeHook = Arc<dyn Fn(&FieldValue, &mut FormData) + Send + Sync>;

/// Supported input kinds. Drives both rendering and default rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Date,
    Select,
    File,
    Textarea,
    Password,
    Number,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Metadata for a file picked in a `File` field. The bytes stay with the
/// caller; the wizard only tracks what was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// A single collected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    File(FileHandle),
    /// Structured payloads produced by custom fields.
    Raw(serde_json::Value),
}

impl FieldValue {
    pub fn empty() -> Self {
        FieldValue::Text(String::new())
    }

    /// Returns the textual form when the value is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Raw(serde_json::Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Strings are blank when only whitespace remains; other values only when
    /// they carry nothing at all.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::File(_) => false,
            FieldValue::Raw(serde_json::Value::Null) => true,
            other => other
                .as_text()
                .map(|text| text.trim().is_empty())
                .unwrap_or(false),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<FileHandle> for FieldValue {
    fn from(value: FileHandle) -> Self {
        FieldValue::File(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => FieldValue::Text(text),
            other => FieldValue::Raw(other),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::File(file) => f.write_str(&file.file_name),
            FieldValue::Raw(value) => write!(f, "{}", value),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    pub options: Vec<SelectOption>,
    pub placeholder: Option<String>,
    pub accept: Option<String>,
    pub rules: Vec<Rule>,
    pub on_change: Option<ChangeHook>,
}

impl FieldDescriptor {
    /// Creates an optional field. Format rules implied by the kind and by the
    /// name conventions table are attached up front.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let mut rules = Vec::new();
        match kind {
            FieldKind::Email => rules.push(Rule::Email),
            FieldKind::Date => rules.push(Rule::IsoDate),
            _ => {}
        }
        for rule in conventional_rules(&name) {
            if !rules.iter().any(|existing| existing.same_variant(&rule)) {
                rules.push(rule);
            }
        }
        Self {
            name,
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            placeholder: None,
            accept: None,
            rules,
            on_change: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        if !self.rules.iter().any(|rule| matches!(rule, Rule::Required)) {
            self.rules.push(Rule::Required);
        }
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Drops every rule of the same variant as `rule`, including ones seeded
    /// from the field name.
    pub fn without_rule(mut self, rule: Rule) -> Self {
        self.rules.retain(|existing| !existing.same_variant(&rule));
        if matches!(rule, Rule::Required) {
            self.required = false;
        }
        self
    }

    /// Attaches a caller-supplied check that runs after every built-in rule.
    pub fn with_validator<F>(self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.with_rule(Rule::Custom(Arc::new(check)))
    }

    pub fn with_on_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FieldValue, &mut FormData) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(hook));
        self
    }

    /// Label shown for `value` when the field is a select.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("rules", &self.rules)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_name_seed_rules() {
        let email = FieldDescriptor::new("email", "Email", FieldKind::Email);
        assert!(email.rules.iter().any(|rule| matches!(rule, Rule::Email)));

        let phone = FieldDescriptor::new("phone", "Phone", FieldKind::Text);
        assert!(phone.rules.iter().any(|rule| matches!(rule, Rule::Phone)));
        assert!(!phone.required);

        let trimmed = phone.without_rule(Rule::Phone);
        assert!(trimmed.rules.is_empty());
    }

    #[test]
    fn blank_detection_depends_on_value_shape() {
        assert!(FieldValue::from("   ").is_blank());
        assert!(FieldValue::Raw(serde_json::Value::Null).is_blank());
        assert!(!FieldValue::Raw(serde_json::json!({ "id": 4 })).is_blank());
        assert!(!FieldValue::File(FileHandle {
            file_name: "scan.pdf".into(),
            content_type: None,
            size: 0,
        })
        .is_blank());
    }

    #[test]
    fn json_strings_become_text_values() {
        let value = FieldValue::from(serde_json::json!("Ana"));
        assert_eq!(value, FieldValue::Text("Ana".into()));
        assert_eq!(value.to_string(), "Ana");
    }
}

//! Caller-provided inputs that replace the built-in widget for a field while
//! the engine keeps owning that field's value and error.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::field::{FieldValue, FormData};

/// Everything a custom input needs to render itself and report edits.
#[derive(Debug, Clone)]
pub struct CustomFieldContext<'a> {
    pub name: &'a str,
    pub value: Option<&'a FieldValue>,
    pub error: Option<&'a str>,
    pub helper_text: Option<&'a str>,
    pub placeholder: Option<String>,
    pub form_data: &'a FormData,
}

/// Edit produced by a custom input.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomEdit {
    /// Same path as a regular field edit: stored, validated, hooks fired.
    Change(FieldValue),
    /// Writes straight into the form data without validation.
    Merge(FormData),
}

pub trait CustomField: Send + Sync {
    /// Translates raw widget output into edits.
    fn bind(&self, ctx: &CustomFieldContext<'_>, input: serde_json::Value) -> Vec<CustomEdit>;
}

pub type CustomFieldTable = BTreeMap<String, Arc<dyn CustomField>>;

/// Remote search selector: the widget hands back the picked row and the
/// field stores its id while the display label lands in a sibling key.
#[derive(Debug, Clone)]
pub struct SearchSelectField {
    pub id_key: String,
    pub label_key: String,
    pub label_target: String,
}

impl SearchSelectField {
    pub fn new(
        id_key: impl Into<String>,
        label_key: impl Into<String>,
        label_target: impl Into<String>,
    ) -> Self {
        Self {
            id_key: id_key.into(),
            label_key: label_key.into(),
            label_target: label_target.into(),
        }
    }
}

impl CustomField for SearchSelectField {
    fn bind(&self, _ctx: &CustomFieldContext<'_>, input: serde_json::Value) -> Vec<CustomEdit> {
        if input.is_null() {
            let mut cleared = FormData::new();
            cleared.insert(self.label_target.clone(), FieldValue::empty());
            return vec![CustomEdit::Change(FieldValue::empty()), CustomEdit::Merge(cleared)];
        }

        let id = match input.get(&self.id_key) {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => return Vec::new(),
        };
        let mut edits = vec![CustomEdit::Change(FieldValue::Text(id))];
        if let Some(label) = input.get(&self.label_key).and_then(|label| label.as_str()) {
            let mut merged = FormData::new();
            merged.insert(self.label_target.clone(), FieldValue::from(label));
            edits.push(CustomEdit::Merge(merged));
        }
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(data: &FormData) -> CustomFieldContext<'_> {
        CustomFieldContext {
            name: "patient",
            value: None,
            error: None,
            helper_text: None,
            placeholder: None,
            form_data: data,
        }
    }

    #[test]
    fn picked_row_stores_id_and_label() {
        let field = SearchSelectField::new("id", "full_name", "patient_full_name");
        let data = FormData::new();
        let edits = field.bind(&context(&data), json!({ "id": 17, "full_name": "José Pérez" }));
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0], CustomEdit::Change(FieldValue::from("17")));
        match &edits[1] {
            CustomEdit::Merge(merged) => {
                assert_eq!(merged["patient_full_name"], FieldValue::from("José Pérez"));
            }
            other => panic!("Unexpected edit: {:?}", other),
        }
    }

    #[test]
    fn rows_without_id_are_ignored() {
        let field = SearchSelectField::new("id", "full_name", "patient_full_name");
        let data = FormData::new();
        assert!(field.bind(&context(&data), json!({ "full_name": "x" })).is_empty());
    }
}

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::field::{FieldDescriptor, FormData};

/// One page of fields within a wizard session.
#[derive(Debug, Clone, Default)]
pub struct StepDescriptor {
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: None,
            fields,
        }
    }

    pub fn titled(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: Some(title.into()),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

type StepsCallback = dyn Fn(&FormData) -> Vec<StepDescriptor> + Send + Sync;

/// Source of the step list. Dynamic providers must be cheap and free of side
/// effects: they run on every read.
#[derive(Clone)]
pub enum StepsProvider {
    Static(Vec<StepDescriptor>),
    Dynamic(Arc<StepsCallback>),
}

impl StepsProvider {
    pub fn dynamic<F>(build: F) -> Self
    where
        F: Fn(&FormData) -> Vec<StepDescriptor> + Send + Sync + 'static,
    {
        StepsProvider::Dynamic(Arc::new(build))
    }

    /// Derives the step list for the given form data.
    pub fn resolve(&self, data: &FormData) -> Cow<'_, [StepDescriptor]> {
        match self {
            StepsProvider::Static(steps) => Cow::Borrowed(steps.as_slice()),
            StepsProvider::Dynamic(build) => Cow::Owned(build(data)),
        }
    }
}

impl From<Vec<StepDescriptor>> for StepsProvider {
    fn from(steps: Vec<StepDescriptor>) -> Self {
        StepsProvider::Static(steps)
    }
}

impl fmt::Debug for StepsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepsProvider::Static(steps) => f.debug_tuple("Static").field(&steps.len()).finish(),
            StepsProvider::Dynamic(_) => f.write_str("Dynamic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::field::{FieldKind, FieldValue};

    #[test]
    fn dynamic_provider_follows_form_data() {
        let provider = StepsProvider::dynamic(|data| {
            let mut steps = vec![StepDescriptor::new(vec![FieldDescriptor::new(
                "role",
                "Role",
                FieldKind::Select,
            )])];
            if data.get("role").and_then(FieldValue::as_text) == Some("professional") {
                steps.push(StepDescriptor::new(vec![FieldDescriptor::new(
                    "specialty",
                    "Specialty",
                    FieldKind::Text,
                )]));
            }
            steps
        });

        let mut data = FormData::new();
        assert_eq!(provider.resolve(&data).len(), 1);
        data.insert("role".into(), FieldValue::from("professional"));
        let steps = provider.resolve(&data);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].field("specialty").is_some());
    }
}

use std::sync::Arc;

use crate::filter::{FilterConfig, FilterDescriptor};
use crate::wizard::{
    CustomFieldTable, FieldDescriptor, FieldKind, Purpose, SearchSelectField, StepDescriptor,
    StepsProvider,
};

use super::{EntityForm, EntityKind};

/// Single-step clinical record tied to a patient.
pub struct MedicalHistoryForm;

impl EntityForm for MedicalHistoryForm {
    fn kind(&self) -> EntityKind {
        EntityKind::MedicalHistory
    }

    fn steps(&self, _purpose: Purpose) -> StepsProvider {
        StepsProvider::Static(vec![StepDescriptor::new(vec![
            FieldDescriptor::new("patient", "Patient", FieldKind::Custom)
                .required()
                .with_placeholder("Search patient"),
            FieldDescriptor::new("diagnosis", "Diagnosis", FieldKind::Textarea).required(),
            FieldDescriptor::new("treatment", "Treatment", FieldKind::Textarea),
            FieldDescriptor::new("notes", "Notes", FieldKind::Textarea),
            FieldDescriptor::new("attachment", "Attachment", FieldKind::File)
                .with_accept("application/pdf,image/*"),
        ])])
    }

    fn filters(&self) -> Vec<FilterDescriptor> {
        let mut filters = vec![
            FilterDescriptor::text("patient", "Patient"),
            FilterDescriptor::text("diagnosis", "Diagnosis"),
        ];
        filters.extend(FilterDescriptor::date_range("From", "Until"));
        filters
    }

    fn filter_config(&self) -> FilterConfig {
        FilterConfig::new("created_at").with_key("patient", "patient_full_name")
    }

    fn custom_fields(&self) -> CustomFieldTable {
        let mut table = CustomFieldTable::new();
        table.insert(
            "patient".into(),
            Arc::new(SearchSelectField::new("id", "full_name", "patient_full_name")),
        );
        table
    }
}

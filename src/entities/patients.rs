use crate::filter::{FilterConfig, FilterDescriptor};
use crate::wizard::{
    FieldDescriptor, FieldKind, Purpose, SelectOption, StepDescriptor, StepsProvider,
};

use super::{EntityForm, EntityKind};

const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub struct PatientForm;

fn document_field() -> FieldDescriptor {
    FieldDescriptor::new("document_id", "Document ID", FieldKind::Text)
        .required()
        .with_placeholder("12345678")
        .with_validator(|value| {
            let text = value.as_text().unwrap_or_default().trim();
            let valid =
                (6..=10).contains(&text.len()) && text.chars().all(|ch| ch.is_ascii_digit());
            (!valid).then(|| "Document ID must have 6 to 10 digits".to_string())
        })
}

fn gender_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Female", "female"),
        SelectOption::new("Male", "male"),
        SelectOption::new("Other", "other"),
    ]
}

impl EntityForm for PatientForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Patients
    }

    fn steps(&self, _purpose: Purpose) -> StepsProvider {
        StepsProvider::Static(vec![
            StepDescriptor::titled(
                "Personal data",
                vec![
                    FieldDescriptor::new("first_name", "First name", FieldKind::Text).required(),
                    FieldDescriptor::new("last_name", "Last name", FieldKind::Text).required(),
                    document_field(),
                    FieldDescriptor::new("birth_date", "Birth date", FieldKind::Date).required(),
                    FieldDescriptor::new("gender", "Gender", FieldKind::Select)
                        .required()
                        .with_options(gender_options()),
                ],
            ),
            StepDescriptor::titled(
                "Contact",
                vec![
                    FieldDescriptor::new("email", "Email", FieldKind::Email).required(),
                    FieldDescriptor::new("phone", "Phone", FieldKind::Text).required(),
                    FieldDescriptor::new("address", "Address", FieldKind::Textarea),
                ],
            ),
            StepDescriptor::titled(
                "Clinical data",
                vec![
                    FieldDescriptor::new("blood_type", "Blood type", FieldKind::Select)
                        .with_options(
                            BLOOD_TYPES
                                .iter()
                                .map(|blood_type| SelectOption::new(*blood_type, *blood_type))
                                .collect(),
                        ),
                    FieldDescriptor::new("allergies", "Allergies", FieldKind::Textarea),
                ],
            ),
        ])
    }

    fn filters(&self) -> Vec<FilterDescriptor> {
        let mut filters = vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::text("document_id", "Document ID"),
        ];
        filters.extend(FilterDescriptor::date_range("Registered from", "Registered until"));
        filters
    }

    fn filter_config(&self) -> FilterConfig {
        FilterConfig::new("created_at").with_key("name", "full_name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{validate_field, FieldValue};

    #[test]
    fn document_ids_are_digits_only() {
        let field = document_field();
        assert!(validate_field(&field, &FieldValue::from("V-1234")).is_err());
        assert!(validate_field(&field, &FieldValue::from("12345")).is_err());
        assert!(validate_field(&field, &FieldValue::from("24123456")).is_ok());
    }
}

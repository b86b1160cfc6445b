use crate::filter::{FilterConfig, FilterDescriptor};
use crate::wizard::{
    FieldDescriptor, FieldKind, Purpose, SelectOption, StepDescriptor, StepsProvider,
};

use super::{EntityForm, EntityKind};

pub struct ProfessionalForm;

pub fn specialty_options() -> Vec<SelectOption> {
    [
        ("General medicine", "general_medicine"),
        ("Cardiology", "cardiology"),
        ("Dermatology", "dermatology"),
        ("Gynecology", "gynecology"),
        ("Pediatrics", "pediatrics"),
        ("Traumatology", "traumatology"),
    ]
    .into_iter()
    .map(|(label, value)| SelectOption::new(label, value))
    .collect()
}

impl EntityForm for ProfessionalForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Professionals
    }

    fn steps(&self, _purpose: Purpose) -> StepsProvider {
        StepsProvider::Static(vec![
            StepDescriptor::titled(
                "Personal data",
                vec![
                    FieldDescriptor::new("first_name", "First name", FieldKind::Text).required(),
                    FieldDescriptor::new("last_name", "Last name", FieldKind::Text).required(),
                    FieldDescriptor::new("email", "Email", FieldKind::Email).required(),
                    FieldDescriptor::new("phone", "Phone", FieldKind::Text).required(),
                ],
            ),
            StepDescriptor::titled(
                "Practice",
                vec![
                    FieldDescriptor::new("specialty", "Specialty", FieldKind::Select)
                        .required()
                        .with_options(specialty_options()),
                    FieldDescriptor::new("license_number", "License number", FieldKind::Text)
                        .required(),
                    FieldDescriptor::new("signature", "Signature", FieldKind::File)
                        .with_accept("image/*"),
                ],
            ),
        ])
    }

    fn filters(&self) -> Vec<FilterDescriptor> {
        let mut filters = vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::select("specialty", "Specialty", specialty_options()),
        ];
        filters.extend(FilterDescriptor::date_range("Registered from", "Registered until"));
        filters
    }

    fn filter_config(&self) -> FilterConfig {
        FilterConfig::new("created_at").with_key("name", "full_name")
    }
}

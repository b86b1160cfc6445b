use std::sync::Arc;

use chrono::NaiveTime;

use crate::filter::{FilterConfig, FilterDescriptor};
use crate::wizard::{
    CustomFieldTable, FieldDescriptor, FieldKind, Purpose, SearchSelectField, SelectOption,
    StepDescriptor, StepsProvider,
};

use super::{EntityForm, EntityKind};

const TIME_FORMAT: &str = "%H:%M";

pub struct AppointmentForm;

fn status_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Pending", "pending"),
        SelectOption::new("Confirmed", "confirmed"),
        SelectOption::new("Completed", "completed"),
        SelectOption::new("Cancelled", "cancelled"),
    ]
}

fn time_field() -> FieldDescriptor {
    FieldDescriptor::new("time", "Time", FieldKind::Text)
        .required()
        .with_placeholder("HH:MM")
        .with_validator(|value| {
            let text = value.as_text().unwrap_or_default().trim();
            NaiveTime::parse_from_str(text, TIME_FORMAT)
                .is_err()
                .then(|| "Use HH:MM format".to_string())
        })
}

impl EntityForm for AppointmentForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Appointments
    }

    fn steps(&self, purpose: Purpose) -> StepsProvider {
        let mut schedule = vec![
            FieldDescriptor::new("date", "Date", FieldKind::Date).required(),
            time_field(),
            FieldDescriptor::new("reason", "Reason", FieldKind::Textarea).required(),
        ];
        if purpose == Purpose::Edit {
            schedule.push(
                FieldDescriptor::new("status", "Status", FieldKind::Select)
                    .required()
                    .with_options(status_options()),
            );
        }

        StepsProvider::Static(vec![
            StepDescriptor::titled(
                "Participants",
                vec![
                    FieldDescriptor::new("patient", "Patient", FieldKind::Custom)
                        .required()
                        .with_placeholder("Search patient"),
                    FieldDescriptor::new("professional", "Professional", FieldKind::Custom)
                        .required()
                        .with_placeholder("Search professional"),
                ],
            ),
            StepDescriptor::titled("Schedule", schedule),
        ])
    }

    fn filters(&self) -> Vec<FilterDescriptor> {
        let mut filters = vec![
            FilterDescriptor::text("patient", "Patient"),
            FilterDescriptor::text("professional", "Professional"),
            FilterDescriptor::select("status", "Status", status_options()),
        ];
        filters.extend(FilterDescriptor::date_range("From", "Until"));
        filters
    }

    fn filter_config(&self) -> FilterConfig {
        FilterConfig::new("scheduled_at")
            .with_key("patient", "patient_full_name")
            .with_key("professional", "professional_full_name")
    }

    fn custom_fields(&self) -> CustomFieldTable {
        let mut table = CustomFieldTable::new();
        table.insert(
            "patient".into(),
            Arc::new(SearchSelectField::new("id", "full_name", "patient_full_name")),
        );
        table.insert(
            "professional".into(),
            Arc::new(SearchSelectField::new("id", "full_name", "professional_full_name")),
        );
        table
    }
}

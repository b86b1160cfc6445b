use crate::filter::{FilterConfig, FilterDescriptor};
use crate::session::Role;
use crate::wizard::{
    FieldDescriptor, FieldKind, FieldValue, FormData, Purpose, SelectOption, StepDescriptor,
    StepsProvider,
};

use super::professionals::specialty_options;
use super::{EntityForm, EntityKind};

const MIN_PASSWORD_LEN: usize = 8;
const PROFESSIONAL_FIELDS: [&str; 2] = ["specialty", "license_number"];

/// Panel accounts. Professional accounts get an extra profile step.
pub struct UserForm;

fn role_options() -> Vec<SelectOption> {
    [
        ("Administrator", Role::Admin),
        ("Professional", Role::Professional),
        ("Receptionist", Role::Receptionist),
    ]
    .into_iter()
    .map(|(label, role)| SelectOption::new(label, role.to_string()))
    .collect()
}

fn is_professional(data: &FormData) -> bool {
    data.get("role").and_then(FieldValue::as_text) == Some(Role::Professional.to_string().as_str())
}

fn password_field() -> FieldDescriptor {
    FieldDescriptor::new("password", "Password", FieldKind::Password)
        .required()
        .with_validator(|value| {
            let length = value.as_text().map(|text| text.chars().count()).unwrap_or(0);
            (length < MIN_PASSWORD_LEN)
                .then(|| format!("Password must have at least {} characters", MIN_PASSWORD_LEN))
        })
}

fn role_field() -> FieldDescriptor {
    FieldDescriptor::new("role", "Role", FieldKind::Select)
        .required()
        .with_options(role_options())
        .with_on_change(|_, data| {
            if !is_professional(data) {
                for key in PROFESSIONAL_FIELDS {
                    data.remove(key);
                }
            }
        })
}

fn build_steps(purpose: Purpose, data: &FormData) -> Vec<StepDescriptor> {
    let mut account = vec![
        FieldDescriptor::new("first_name", "First name", FieldKind::Text).required(),
        FieldDescriptor::new("last_name", "Last name", FieldKind::Text).required(),
        FieldDescriptor::new("email", "Email", FieldKind::Email).required(),
    ];
    if purpose == Purpose::Create {
        account.push(password_field());
    }

    let mut steps = vec![
        StepDescriptor::titled("Account", account),
        StepDescriptor::titled(
            "Contact",
            vec![
                role_field(),
                FieldDescriptor::new("phone", "Phone", FieldKind::Text)
                    .required()
                    .with_placeholder("04121234567"),
                FieldDescriptor::new("address", "Address", FieldKind::Textarea),
            ],
        ),
    ];

    if is_professional(data) {
        steps.push(StepDescriptor::titled(
            "Professional profile",
            vec![
                FieldDescriptor::new("specialty", "Specialty", FieldKind::Select)
                    .required()
                    .with_options(specialty_options()),
                FieldDescriptor::new("license_number", "License number", FieldKind::Text)
                    .required(),
            ],
        ));
    }
    steps
}

impl EntityForm for UserForm {
    fn kind(&self) -> EntityKind {
        EntityKind::Users
    }

    fn steps(&self, purpose: Purpose) -> StepsProvider {
        StepsProvider::dynamic(move |data| build_steps(purpose, data))
    }

    fn filters(&self) -> Vec<FilterDescriptor> {
        let mut filters = vec![
            FilterDescriptor::text("name", "Name"),
            FilterDescriptor::text("email", "Email"),
            FilterDescriptor::select("role", "Role", role_options()),
        ];
        filters.extend(FilterDescriptor::date_range("Created from", "Created until"));
        filters
    }

    fn filter_config(&self) -> FilterConfig {
        FilterConfig::new("created_at").with_key("name", "full_name")
    }
}

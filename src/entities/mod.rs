//! Step, filter and custom-field declarations for each entity view.

pub mod appointments;
pub mod medical_history;
pub mod patients;
pub mod professionals;
pub mod users;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PanelConfig;
use crate::filter::{FilterConfig, FilterDescriptor, FilterView, Record};
use crate::wizard::{CustomFieldTable, Purpose, StepsProvider, WizardEngine};

pub use appointments::AppointmentForm;
pub use medical_history::MedicalHistoryForm;
pub use patients::PatientForm;
pub use professionals::ProfessionalForm;
pub use users::UserForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Patients,
    Professionals,
    Appointments,
    MedicalHistory,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Users,
        EntityKind::Patients,
        EntityKind::Professionals,
        EntityKind::Appointments,
        EntityKind::MedicalHistory,
    ];

    /// Collection path on the backend.
    pub fn endpoint(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Patients => "patients",
            EntityKind::Professionals => "professionals",
            EntityKind::Appointments => "appointments",
            EntityKind::MedicalHistory => "medical-history",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Users => "Users",
            EntityKind::Patients => "Patients",
            EntityKind::Professionals => "Professionals",
            EntityKind::Appointments => "Appointments",
            EntityKind::MedicalHistory => "Medical history",
        };
        f.write_str(label)
    }
}

/// Everything an entity view hands to the wizard and filter engines.
///
/// Implementations describe their steps and filters; the provided methods
/// assemble ready-to-use engines from them.
pub trait EntityForm: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Steps shown when creating or editing a record.
    fn steps(&self, purpose: Purpose) -> StepsProvider;

    fn filters(&self) -> Vec<FilterDescriptor>;

    fn filter_config(&self) -> FilterConfig;

    fn custom_fields(&self) -> CustomFieldTable {
        CustomFieldTable::new()
    }

    fn wizard(&self, purpose: Purpose, config: &PanelConfig) -> WizardEngine {
        WizardEngine::new(self.steps(purpose))
            .with_purpose(purpose)
            .with_custom_fields(self.custom_fields())
            .with_deadline(config.submit_deadline())
    }

    fn filter_view(&self, records: Vec<Record>) -> FilterView {
        let mut view = FilterView::new(&self.filters(), self.filter_config());
        view.set_records(records);
        view
    }
}

pub fn form_for(kind: EntityKind) -> Box<dyn EntityForm> {
    match kind {
        EntityKind::Users => Box::new(UserForm),
        EntityKind::Patients => Box::new(PatientForm),
        EntityKind::Professionals => Box::new(ProfessionalForm),
        EntityKind::Appointments => Box::new(AppointmentForm),
        EntityKind::MedicalHistory => Box::new(MedicalHistoryForm),
    }
}

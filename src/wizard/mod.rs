//! Multi-step record wizard shared by every entity view.
//!
//! Callers describe their steps (statically or as a function of the answers
//! collected so far), attach optional custom inputs, and supply a
//! [`FinishHandler`] that persists the finished payload. The engine owns the
//! transient session state: step position, form data, field errors, the
//! submission banner and the submitting flag.

pub mod custom;
pub mod engine;
pub mod field;
pub mod rules;
pub mod steps;
pub mod submission;

pub use custom::{
    CustomEdit, CustomField, CustomFieldContext, CustomFieldTable, SearchSelectField,
};
pub use engine::{WizardEngine, WizardState};
pub use field::{
    ChangeHook, FieldDescriptor, FieldErrors, FieldKind, FieldValue, FileHandle, FormData,
    SelectOption,
};
pub use rules::{validate_field, Rule, ValidationError};
pub use steps::{StepDescriptor, StepsProvider};
pub use submission::{
    finish_fn, FinishError, FinishFn, FinishHandler, PendingSubmit, Purpose, SubmitOutcome,
    SubmitStatus, FALLBACK_SERVER_MESSAGE,
};

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::custom::{CustomEdit, CustomField, CustomFieldContext, CustomFieldTable};
use super::field::{FieldDescriptor, FieldErrors, FieldKind, FieldValue, FormData};
use super::rules::validate_field;
use super::steps::{StepDescriptor, StepsProvider};
use super::submission::{
    FinishError, FinishHandler, PendingSubmit, Purpose, SubmitOutcome, SubmitStatus,
};

const UNFILLED: &str = "[unfilled]";
const MASKED: &str = "********";

/// Transient state of one wizard instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub visible: bool,
    pub step_index: usize,
    pub form_data: FormData,
    pub errors: FieldErrors,
    pub server_error_message: String,
    pub is_submitting: bool,
}

/// Drives a multi-step data-entry form: navigation, validation gating, custom
/// field binding, and the submission lifecycle.
///
/// The step list is never cached. Every read re-resolves the
/// [`StepsProvider`] against the current form data, so fields that appear or
/// disappear with earlier answers are always validated against what is on
/// screen.
pub struct WizardEngine {
    steps: StepsProvider,
    purpose: Purpose,
    custom_fields: CustomFieldTable,
    deadline: Option<Duration>,
    state: WizardState,
}

impl WizardEngine {
    pub fn new(steps: impl Into<StepsProvider>) -> Self {
        Self {
            steps: steps.into(),
            purpose: Purpose::default(),
            custom_fields: CustomFieldTable::new(),
            deadline: None,
            state: WizardState::default(),
        }
    }

    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_custom_field(
        mut self,
        name: impl Into<String>,
        field: Arc<dyn CustomField>,
    ) -> Self {
        self.custom_fields.insert(name.into(), field);
        self
    }

    pub fn with_custom_fields(mut self, table: CustomFieldTable) -> Self {
        self.custom_fields.extend(table);
        self
    }

    /// Bounds how long [`submit`](Self::submit) waits on the finish handler.
    /// `None` waits indefinitely.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn form_data(&self) -> &FormData {
        &self.state.form_data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.state.errors.get(name).map(String::as_str)
    }

    pub fn server_error_message(&self) -> &str {
        &self.state.server_error_message
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting
    }

    pub fn steps(&self) -> Cow<'_, [StepDescriptor]> {
        self.steps.resolve(&self.state.form_data)
    }

    /// Position of the current step, clamped to the steps derived right now.
    pub fn current_step_index(&self) -> usize {
        clamp_index(self.state.step_index, self.steps().len())
    }

    pub fn current_step(&self) -> Option<StepDescriptor> {
        let steps = self.steps();
        steps
            .get(clamp_index(self.state.step_index, steps.len()))
            .cloned()
    }

    pub fn is_last_step(&self) -> bool {
        let len = self.steps().len();
        clamp_index(self.state.step_index, len) + 1 >= len
    }

    /// Starts a fresh session seeded with `initial`.
    pub fn open(&mut self, initial: FormData) {
        self.state.step_index = 0;
        self.state.errors.clear();
        self.state.server_error_message.clear();
        self.state.form_data = initial;
        self.state.visible = true;
        info!(purpose = ?self.purpose, "wizard opened");
    }

    /// Hides the wizard. Data and errors stay until the next `open`.
    pub fn close(&mut self) {
        self.state.visible = false;
        debug!("wizard closed");
    }

    /// Overlays field errors reported by the backend.
    pub fn set_errors_from_server(&mut self, errors: FieldErrors) {
        self.state.errors.extend(errors);
        self.state.server_error_message.clear();
    }

    /// Stores an edit and re-validates only the edited field.
    pub fn handle_change(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        self.state.form_data.insert(name.to_string(), value.clone());

        let (verdict, hook) = {
            let steps = self.steps.resolve(&self.state.form_data);
            let index = clamp_index(self.state.step_index, steps.len());
            match steps.get(index).and_then(|step| step.field(name)) {
                Some(field) => (Some(validate_field(field, &value)), field.on_change.clone()),
                None => (None, None),
            }
        };

        match verdict {
            Some(Ok(())) => {
                self.state.errors.remove(name);
            }
            Some(Err(err)) => {
                self.state.errors.insert(name.to_string(), err.message);
            }
            None => {}
        }

        if let Some(hook) = hook {
            hook(&value, &mut self.state.form_data);
        }
        self.clamp_step_index();
    }

    /// Validates every field of the current step and advances when all pass.
    /// The last step never advances. Returns whether the index moved.
    pub fn next_step(&mut self) -> bool {
        let (failures, index, len) = {
            let steps = self.steps.resolve(&self.state.form_data);
            let index = clamp_index(self.state.step_index, steps.len());
            let failures = steps
                .get(index)
                .map(|step| collect_failures(step.fields.iter(), &self.state.form_data))
                .unwrap_or_default();
            (failures, index, steps.len())
        };

        self.state.step_index = index;
        if !failures.is_empty() {
            debug!(step = index, failing = failures.len(), "step advance blocked");
            self.state.errors = failures;
            return false;
        }
        if index + 1 < len {
            self.state.step_index = index + 1;
            true
        } else {
            false
        }
    }

    pub fn prev_step(&mut self) -> bool {
        let index = self.current_step_index();
        if index > 0 {
            self.state.step_index = index - 1;
            true
        } else {
            self.state.step_index = 0;
            false
        }
    }

    /// Validates every step and, when everything passes, raises
    /// `is_submitting` and returns what the finish handler needs.
    ///
    /// Refuses with [`SubmitStatus::InFlight`] while an earlier submission
    /// has not been completed. Every `Ok` must be followed by
    /// [`complete_submit`](Self::complete_submit).
    pub fn begin_submit(&mut self) -> Result<PendingSubmit, SubmitStatus> {
        if self.state.is_submitting {
            debug!("submission already in flight");
            return Err(SubmitStatus::InFlight);
        }
        let failures = {
            let steps = self.steps.resolve(&self.state.form_data);
            collect_failures(
                steps.iter().flat_map(|step| step.fields.iter()),
                &self.state.form_data,
            )
        };
        if !failures.is_empty() {
            debug!(failing = failures.len(), "submission blocked by validation");
            self.state.errors = failures;
            return Err(SubmitStatus::Invalid);
        }

        self.state.is_submitting = true;
        Ok(PendingSubmit {
            purpose: self.purpose,
            data: self.state.form_data.clone(),
            deadline: self.deadline,
        })
    }

    /// Applies the handler result and lowers `is_submitting`.
    pub fn complete_submit(&mut self, result: Result<SubmitOutcome, FinishError>) -> SubmitStatus {
        settle(&mut self.state, result)
    }

    /// Runs [`begin_submit`](Self::begin_submit), the handler and
    /// [`complete_submit`](Self::complete_submit) in one call.
    ///
    /// `is_submitting` is lowered again on every exit path, including when
    /// this future is dropped before it completes.
    pub async fn submit(&mut self, handler: &dyn FinishHandler) -> SubmitStatus {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(status) => return status,
        };
        let guard = SubmittingGuard { state: &mut self.state };
        let result = pending.run(handler).await;
        guard.settle(result)
    }

    /// Binding data for a custom field, or `None` when `name` has no custom
    /// input registered.
    pub fn custom_field_context(&self, name: &str) -> Option<CustomFieldContext<'_>> {
        let (name, _) = self.custom_fields.get_key_value(name)?;
        let placeholder = self
            .steps()
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|field| &field.name == name)
            .and_then(|field| field.placeholder.clone());
        let error = self.error(name);
        Some(CustomFieldContext {
            name: name.as_str(),
            value: self.state.form_data.get(name),
            error,
            helper_text: error,
            placeholder,
            form_data: &self.state.form_data,
        })
    }

    /// Feeds raw widget output to the custom input registered for `name`.
    /// Returns `false` when there is none.
    pub fn custom_input(&mut self, name: &str, input: serde_json::Value) -> bool {
        let Some(binding) = self.custom_fields.get(name).cloned() else {
            return false;
        };
        let edits = match self.custom_field_context(name) {
            Some(ctx) => binding.bind(&ctx, input),
            None => return false,
        };
        for edit in edits {
            match edit {
                CustomEdit::Change(value) => self.handle_change(name, value),
                CustomEdit::Merge(data) => self.state.form_data.extend(data),
            }
        }
        self.clamp_step_index();
        true
    }

    /// Label/value pairs for every field currently on any step, in order.
    pub fn summary(&self) -> Vec<(String, String)> {
        self.steps()
            .iter()
            .flat_map(|step| step.fields.iter())
            .map(|field| (field.label.clone(), self.display_value(field)))
            .collect()
    }

    fn display_value(&self, field: &FieldDescriptor) -> String {
        match self.state.form_data.get(&field.name) {
            Some(value) if !value.is_blank() => match (field.kind, value) {
                (FieldKind::Password, _) => MASKED.to_string(),
                (FieldKind::Select, FieldValue::Text(selected)) => field
                    .option_label(selected)
                    .unwrap_or(selected)
                    .to_string(),
                _ => value.to_string(),
            },
            _ => UNFILLED.to_string(),
        }
    }

    fn clamp_step_index(&mut self) {
        let len = self.steps().len();
        self.state.step_index = clamp_index(self.state.step_index, len);
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

fn collect_failures<'a>(
    fields: impl Iterator<Item = &'a FieldDescriptor>,
    data: &FormData,
) -> FieldErrors {
    let missing = FieldValue::empty();
    fields
        .filter_map(|field| {
            let value = data.get(&field.name).unwrap_or(&missing);
            validate_field(field, value)
                .err()
                .map(|err| (field.name.clone(), err.message))
        })
        .collect()
}

fn settle(state: &mut WizardState, result: Result<SubmitOutcome, FinishError>) -> SubmitStatus {
    state.is_submitting = false;
    match result {
        Ok(SubmitOutcome::Success) => {
            state.server_error_message.clear();
            state.visible = false;
            info!("submission completed");
            SubmitStatus::Completed
        }
        Ok(SubmitOutcome::Rejected(errors)) => {
            debug!(failing = errors.len(), "submission rejected by backend");
            state.errors = errors;
            state.server_error_message.clear();
            SubmitStatus::Rejected
        }
        Err(err) => {
            warn!(error = %err, "submission failed");
            state.server_error_message = err.banner_message();
            SubmitStatus::Failed
        }
    }
}

/// Lowers `is_submitting` if the handler call is abandoned.
struct SubmittingGuard<'a> {
    state: &'a mut WizardState,
}

impl SubmittingGuard<'_> {
    fn settle(mut self, result: Result<SubmitOutcome, FinishError>) -> SubmitStatus {
        settle(self.state, result)
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.state.is_submitting = false;
    }
}

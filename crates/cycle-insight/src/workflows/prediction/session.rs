use tracing::debug;

use super::client::{PredictionError, PredictionService};
use super::domain::{PredictionRequest, PredictionResponse};
use super::fields::FieldName;
use super::form::FormState;
use super::presenter::{ResultSummary, ResultView};
use super::service::PredictionWorkflow;
use super::validation::FieldErrors;

/// First half of a submission on a [`PredictionForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Validation passed and the form is now submitting. Send the request
    /// and hand the result to [`PredictionForm::finish_submit`].
    Dispatch(PredictionRequest),
    /// Validation failed; errors are now shown beside the inputs.
    Invalid(FieldErrors),
    /// A call is already outstanding for this form.
    Busy,
}

/// Result of pressing submit on a [`PredictionForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; errors are now shown beside the inputs.
    Invalid(FieldErrors),
    /// The call succeeded and the results view should be shown.
    Completed(ResultSummary),
    /// The call failed; the form stays where it is.
    Failed(PredictionError),
    /// Submit was pressed while a call was outstanding; nothing was sent.
    Busy,
}

/// One interactive form: its state, the submitting flag, and the last result.
///
/// A submission is split in two so the flag can be read while the call is
/// outstanding: [`begin_submit`](Self::begin_submit) validates and raises
/// it, [`finish_submit`](Self::finish_submit) records the outcome and lowers
/// it. [`submit`](Self::submit) runs both around one call.
#[derive(Debug, Default)]
pub struct PredictionForm {
    state: FormState,
    submitting: bool,
    last_result: Option<ResultSummary>,
}

impl PredictionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) {
        self.state.set_value(field, value);
    }

    /// Whether the submit control should be disabled.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.submitting {
            return SubmitStart::Busy;
        }

        match PredictionRequest::from_form(&self.state) {
            Ok(request) => {
                self.state.clear_errors();
                self.submitting = true;
                SubmitStart::Dispatch(request)
            }
            Err(errors) => {
                self.state.apply_errors(&errors);
                SubmitStart::Invalid(errors)
            }
        }
    }

    pub fn finish_submit(
        &mut self,
        result: Result<PredictionResponse, PredictionError>,
    ) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(response) => {
                let summary = ResultSummary::from_response(&response);
                self.last_result = Some(summary.clone());
                SubmitOutcome::Completed(summary)
            }
            Err(error) => {
                debug!(kind = error.kind(), "form submission failed");
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Lower the flag without recording anything, for a caller that stopped
    /// waiting on the call.
    pub fn abandon_submit(&mut self) {
        self.submitting = false;
    }

    /// Validate, make exactly one call through the workflow, and record it.
    pub async fn submit<S>(&mut self, workflow: &PredictionWorkflow<S>) -> SubmitOutcome
    where
        S: PredictionService + 'static,
    {
        let request = match self.begin_submit() {
            SubmitStart::Dispatch(request) => request,
            SubmitStart::Invalid(errors) => return SubmitOutcome::Invalid(errors),
            SubmitStart::Busy => return SubmitOutcome::Busy,
        };
        let result = workflow.dispatch(&request).await;
        self.finish_submit(result)
    }

    /// What the results view shows for this form.
    pub fn result_view(&self) -> ResultView {
        match &self.last_result {
            Some(summary) => ResultView::Ready(summary.clone()),
            None => ResultView::missing(),
        }
    }
}

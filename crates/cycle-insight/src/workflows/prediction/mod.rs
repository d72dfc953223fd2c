//! Menstrual cycle irregularity prediction: intake validation, the wire
//! contract with the prediction service, and presentation of its result.
//!
//! Data flows one way: a [`FormState`] is checked against the constraint
//! table in [`fields`], converted into a [`PredictionRequest`], sent through
//! a [`PredictionService`], and the response is turned into a
//! [`ResultView`].

pub mod client;
pub mod domain;
pub mod fields;
pub mod form;
pub(crate) mod presenter;
pub(crate) mod request;
pub mod router;
pub mod service;
pub mod session;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{
    HttpPredictionClient, PredictionError, PredictionService, CLIENT_FAULT_MESSAGE,
    DEFAULT_BASE_URL, REJECTED_FALLBACK_MESSAGE, REQUEST_TIMEOUT, UNREACHABLE_MESSAGE,
};
pub use domain::{
    CycleClassification, LifeStage, PredictionRequest, PredictionResponse, ServiceErrorBody,
};
pub use fields::{spec_for, Bounds, FieldKind, FieldName, FieldSpec, UnknownField, FIELD_SPECS};
pub use form::FormState;
pub use presenter::{
    ResultSummary, ResultView, RiskAssessment, RiskTier, MISSING_RESULT_ACTION,
    MISSING_RESULT_MESSAGE, MISSING_RESULT_TITLE,
};
pub use router::{backend_router, prediction_router};
pub use service::{PredictionWorkflow, ResultId, SubmissionError, SubmittedResult};
pub use session::{PredictionForm, SubmitOutcome, SubmitStart};
pub use validation::{validate, FieldError, FieldErrors, FieldValue};

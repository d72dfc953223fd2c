use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::domain::LifeStage;
use super::fields::{FieldKind, FieldName, FieldSpec};
use super::form::FormState;

/// Reason a single field failed its constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{subject} is required")]
    Missing { subject: &'static str },
    #[error("{subject} must be a number")]
    NotANumber { subject: &'static str },
    #[error("{subject} must be a whole number")]
    NotAWholeNumber { subject: &'static str },
    #[error("{message}")]
    OutOfRange { value: f64, message: String },
    #[error("{message}")]
    UnknownChoice { value: String, message: String },
}

/// Typed value of a field that passed its constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Decimal(f64),
    Whole(i64),
    Stage(LifeStage),
}

/// Failing fields keyed by name, in display order. Empty means admissible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<FieldName, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldError)> {
        self.0.iter().map(|(name, error)| (*name, error))
    }

    /// Field name to rendered message, the shape shown inline beside inputs.
    pub fn messages(&self) -> BTreeMap<FieldName, String> {
        self.0
            .iter()
            .map(|(name, error)| (*name, error.to_string()))
            .collect()
    }

    pub(crate) fn insert(&mut self, field: FieldName, error: FieldError) {
        self.0.insert(field, error);
    }
}

impl Serialize for FieldErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.0
                .iter()
                .map(|(name, error)| (name.as_str(), error.to_string())),
        )
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(name, error)| format!("{name}: {error}"))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// Parse one raw input according to its spec.
///
/// Emptiness is judged on the trimmed text, so `"0"` is always a present
/// value and only fails when the range excludes it.
pub fn parse_field(spec: &FieldSpec, raw: &str) -> Result<FieldValue, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Missing {
            subject: spec.subject,
        });
    }

    match spec.kind {
        FieldKind::Decimal(bounds) => {
            let value = parse_finite(trimmed).ok_or(FieldError::NotANumber {
                subject: spec.subject,
            })?;
            if !bounds.contains(value) {
                return Err(out_of_range(spec, value));
            }
            Ok(FieldValue::Decimal(value))
        }
        FieldKind::Whole(bounds) => {
            let value = parse_finite(trimmed).ok_or(FieldError::NotANumber {
                subject: spec.subject,
            })?;
            if value.fract() != 0.0 {
                return Err(FieldError::NotAWholeNumber {
                    subject: spec.subject,
                });
            }
            if !bounds.contains(value) {
                return Err(out_of_range(spec, value));
            }
            // Bounded by the table, so the cast cannot saturate.
            Ok(FieldValue::Whole(value as i64))
        }
        FieldKind::Choice { choices } => choices
            .iter()
            .copied()
            .find(|stage| stage.as_str() == trimmed)
            .map(FieldValue::Stage)
            .ok_or_else(|| FieldError::UnknownChoice {
                value: trimmed.to_string(),
                message: spec.range_message(),
            }),
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn out_of_range(spec: &FieldSpec, value: f64) -> FieldError {
    FieldError::OutOfRange {
        value,
        message: spec.range_message(),
    }
}

/// Check every field of the form against the constraint table.
pub fn validate(form: &FormState) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for (spec, raw) in form.entries() {
        if let Err(error) = parse_field(spec, raw) {
            errors.insert(spec.name, error);
        }
    }
    errors
}

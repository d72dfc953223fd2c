use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::fields::{spec_for, FieldName, FieldSpec, FIELD_SPECS};
use super::validation::{self, FieldErrors};

/// Raw, user-edited values of every field plus the errors shown beside them.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: BTreeMap<FieldName, String>,
    errors: BTreeMap<FieldName, String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Every field empty except `life_stage`, which starts at its default.
    pub fn new() -> Self {
        let values = FIELD_SPECS
            .iter()
            .map(|spec| (spec.name, spec.default_value().to_string()))
            .collect();

        Self {
            values,
            errors: BTreeMap::new(),
        }
    }

    /// Build a form from `(name, value)` pairs keyed by wire name. Unknown
    /// names are returned instead of being silently dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, super::fields::UnknownField>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::new();
        for (name, value) in pairs {
            let field = name.as_ref().parse::<FieldName>()?;
            form.set_value(field, value);
        }
        Ok(form)
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Store a new raw value and clear any error previously shown for it.
    pub fn set_value(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.errors.remove(&field);
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<FieldName, String> {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        self.errors = errors.messages();
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Each spec paired with its current raw value, in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |name| (spec_for(name), self.value(name)))
    }

    pub fn validate(&self) -> FieldErrors {
        validation::validate(self)
    }
}

impl Serialize for FormState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(
            self.values
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )
    }
}

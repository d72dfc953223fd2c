use super::domain::{LifeStage, PredictionRequest};
use super::fields::FieldName;
use super::form::FormState;
use super::validation::{parse_field, FieldError, FieldErrors, FieldValue};

/// Reads typed values out of a form, recording failures instead of
/// short-circuiting so the caller sees every failing field at once.
struct FieldReader<'a> {
    form: &'a FormState,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn new(form: &'a FormState) -> Self {
        Self {
            form,
            errors: FieldErrors::default(),
        }
    }

    fn read(&mut self, field: FieldName) -> Option<FieldValue> {
        match parse_field(field.spec(), self.form.value(field)) {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.insert(field, error);
                None
            }
        }
    }

    fn mismatch(&mut self, field: FieldName) {
        self.errors.insert(
            field,
            FieldError::NotANumber {
                subject: field.spec().subject,
            },
        );
    }

    fn decimal(&mut self, field: FieldName) -> f64 {
        match self.read(field) {
            Some(FieldValue::Decimal(value)) => value,
            Some(_) => {
                self.mismatch(field);
                0.0
            }
            None => 0.0,
        }
    }

    fn whole(&mut self, field: FieldName) -> i64 {
        match self.read(field) {
            Some(FieldValue::Whole(value)) => value,
            Some(_) => {
                self.mismatch(field);
                0
            }
            None => 0,
        }
    }

    fn stage(&mut self, field: FieldName) -> LifeStage {
        match self.read(field) {
            Some(FieldValue::Stage(stage)) => stage,
            Some(_) => {
                self.mismatch(field);
                LifeStage::default()
            }
            None => LifeStage::default(),
        }
    }
}

impl PredictionRequest {
    /// Convert a form into the wire payload.
    ///
    /// Parses with the same per-field step as the validator. If any field
    /// fails, the full error set is returned and no request escapes.
    pub fn from_form(form: &FormState) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(form);

        let request = Self {
            age: reader.decimal(FieldName::Age),
            bmi: reader.decimal(FieldName::Bmi),
            life_stage: reader.stage(FieldName::LifeStage),
            tracking_duration_months: reader.whole(FieldName::TrackingDurationMonths),
            pain_score: reader.decimal(FieldName::PainScore),
            avg_cycle_length: reader.decimal(FieldName::AvgCycleLength),
            cycle_length_variation: reader.decimal(FieldName::CycleLengthVariation),
            avg_bleeding_days: reader.decimal(FieldName::AvgBleedingDays),
            bleeding_volume_score: reader.decimal(FieldName::BleedingVolumeScore),
            intermenstrual_episodes: reader.whole(FieldName::IntermenstrualEpisodes),
            cycle_variation_coeff: reader.decimal(FieldName::CycleVariationCoeff),
            pattern_disruption_score: reader.decimal(FieldName::PatternDisruptionScore),
        };

        if reader.errors.is_empty() {
            Ok(request)
        } else {
            Err(reader.errors)
        }
    }
}

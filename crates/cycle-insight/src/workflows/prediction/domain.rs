use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reproductive life stage selected on the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    Reproductive,
    Perimenopausal,
    Postmenopausal,
    Adolescent,
}

impl LifeStage {
    pub const ALL: [LifeStage; 4] = [
        LifeStage::Reproductive,
        LifeStage::Perimenopausal,
        LifeStage::Postmenopausal,
        LifeStage::Adolescent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifeStage::Reproductive => "reproductive",
            LifeStage::Perimenopausal => "perimenopausal",
            LifeStage::Postmenopausal => "postmenopausal",
            LifeStage::Adolescent => "adolescent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifeStage::Reproductive => "Reproductive Age",
            LifeStage::Perimenopausal => "Perimenopausal",
            LifeStage::Postmenopausal => "Postmenopausal",
            LifeStage::Adolescent => "Adolescent",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown life stage '{0}'")]
pub struct UnknownLifeStage(pub String);

impl FromStr for LifeStage {
    type Err = UnknownLifeStage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        LifeStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == trimmed)
            .ok_or_else(|| UnknownLifeStage(trimmed.to_string()))
    }
}

/// Payload posted to the prediction service. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub age: f64,
    pub bmi: f64,
    pub life_stage: LifeStage,
    pub tracking_duration_months: i64,
    pub pain_score: f64,
    pub avg_cycle_length: f64,
    pub cycle_length_variation: f64,
    pub avg_bleeding_days: f64,
    pub bleeding_volume_score: f64,
    pub intermenstrual_episodes: i64,
    pub cycle_variation_coeff: f64,
    pub pattern_disruption_score: f64,
}

/// Binary classification returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum CycleClassification {
    Regular,
    Irregular,
}

impl From<CycleClassification> for u8 {
    fn from(value: CycleClassification) -> Self {
        match value {
            CycleClassification::Regular => 0,
            CycleClassification::Irregular => 1,
        }
    }
}

/// Successful response body from the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPredictionResponse")]
pub struct PredictionResponse {
    pub prediction: CycleClassification,
    pub probability: f64,
    pub irregularity_types: Vec<String>,
}

impl PredictionResponse {
    pub fn is_irregular(&self) -> bool {
        self.prediction == CycleClassification::Irregular
    }
}

#[derive(Debug, Deserialize)]
struct RawPredictionResponse {
    prediction: i64,
    probability: f64,
    #[serde(default)]
    irregularity_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResponseContractError {
    #[error("prediction must be 0 or 1, found {0}")]
    UnknownClassification(i64),
    #[error("probability must lie within [0, 1], found {0}")]
    ProbabilityOutOfRange(f64),
}

impl TryFrom<RawPredictionResponse> for PredictionResponse {
    type Error = ResponseContractError;

    fn try_from(raw: RawPredictionResponse) -> Result<Self, Self::Error> {
        let prediction = match raw.prediction {
            0 => CycleClassification::Regular,
            1 => CycleClassification::Irregular,
            other => return Err(ResponseContractError::UnknownClassification(other)),
        };

        if !raw.probability.is_finite() || !(0.0..=1.0).contains(&raw.probability) {
            return Err(ResponseContractError::ProbabilityOutOfRange(raw.probability));
        }

        Ok(Self {
            prediction,
            probability: raw.probability,
            irregularity_types: raw.irregularity_types.unwrap_or_default(),
        })
    }
}

/// Error body returned by the prediction service on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

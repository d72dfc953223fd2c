use serde::Serialize;

use super::domain::PredictionResponse;

const MEDIUM_RISK_FLOOR: f64 = 0.30;
const HIGH_RISK_FLOOR: f64 = 0.70;

/// Display tier for the irregularity probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Closed-open bands on the unrounded probability: `[0, 0.30)` low,
    /// `[0.30, 0.70)` medium, `[0.70, 1]` high.
    pub fn from_probability(probability: f64) -> Self {
        if probability < MEDIUM_RISK_FLOOR {
            RiskTier::Low
        } else if probability < HIGH_RISK_FLOOR {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low probability of irregularity. Continue monitoring your cycle.",
            RiskTier::Medium => {
                "Moderate indicators present. Consider consulting a healthcare provider."
            }
            RiskTier::High => {
                "Strong indicators of irregularity. Please consult a healthcare professional."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub percent: f64,
    pub is_irregular: bool,
}

impl RiskAssessment {
    pub fn from_response(response: &PredictionResponse) -> Self {
        Self {
            tier: RiskTier::from_probability(response.probability),
            percent: round_to_tenth(response.probability * 100.0),
            is_irregular: response.is_irregular(),
        }
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Everything the results view renders for a completed prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub assessment: RiskAssessment,
    pub headline: &'static str,
    pub summary: &'static str,
    pub guidance: &'static str,
    /// Present only for irregular results that name at least one type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irregularity_types: Option<Vec<String>>,
}

impl ResultSummary {
    pub fn from_response(response: &PredictionResponse) -> Self {
        let assessment = RiskAssessment::from_response(response);

        let (headline, summary) = if assessment.is_irregular {
            (
                "Irregular Cycle Detected",
                "Your analysis indicates potential menstrual cycle irregularities",
            )
        } else {
            (
                "Regular Cycle",
                "Your analysis indicates a regular menstrual cycle pattern",
            )
        };

        let irregularity_types = (assessment.is_irregular
            && !response.irregularity_types.is_empty())
        .then(|| response.irregularity_types.clone());

        Self {
            assessment,
            headline,
            summary,
            guidance: assessment.tier.guidance(),
            irregularity_types,
        }
    }

    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.assessment.percent)
    }
}

pub const MISSING_RESULT_TITLE: &str = "No Results Available";
pub const MISSING_RESULT_MESSAGE: &str = "Please complete the prediction form first.";
pub const MISSING_RESULT_ACTION: &str = "Go to Prediction Form";

/// What the results view shows: a completed prediction or the guided
/// prompt back to the form when nothing has been submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultView {
    Ready(ResultSummary),
    Missing {
        title: &'static str,
        message: &'static str,
        action: &'static str,
    },
}

impl ResultView {
    pub fn from_response(response: Option<&PredictionResponse>) -> Self {
        match response {
            Some(response) => ResultView::Ready(ResultSummary::from_response(response)),
            None => ResultView::missing(),
        }
    }

    pub fn missing() -> Self {
        ResultView::Missing {
            title: MISSING_RESULT_TITLE,
            message: MISSING_RESULT_MESSAGE,
            action: MISSING_RESULT_ACTION,
        }
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        match self {
            ResultView::Ready(summary) => Some(summary),
            ResultView::Missing { .. } => None,
        }
    }
}

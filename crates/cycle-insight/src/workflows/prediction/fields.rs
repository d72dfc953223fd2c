use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::domain::LifeStage;

/// Identifier of every input collected by the prediction form.
///
/// Variant order is the display order, so ordered maps keyed by `FieldName`
/// iterate the way the form renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Age,
    Bmi,
    LifeStage,
    TrackingDurationMonths,
    PainScore,
    AvgCycleLength,
    CycleLengthVariation,
    AvgBleedingDays,
    BleedingVolumeScore,
    IntermenstrualEpisodes,
    CycleVariationCoeff,
    PatternDisruptionScore,
}

impl FieldName {
    pub const ALL: [FieldName; 12] = [
        FieldName::Age,
        FieldName::Bmi,
        FieldName::LifeStage,
        FieldName::TrackingDurationMonths,
        FieldName::PainScore,
        FieldName::AvgCycleLength,
        FieldName::CycleLengthVariation,
        FieldName::AvgBleedingDays,
        FieldName::BleedingVolumeScore,
        FieldName::IntermenstrualEpisodes,
        FieldName::CycleVariationCoeff,
        FieldName::PatternDisruptionScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Age => "age",
            FieldName::Bmi => "bmi",
            FieldName::LifeStage => "life_stage",
            FieldName::TrackingDurationMonths => "tracking_duration_months",
            FieldName::PainScore => "pain_score",
            FieldName::AvgCycleLength => "avg_cycle_length",
            FieldName::CycleLengthVariation => "cycle_length_variation",
            FieldName::AvgBleedingDays => "avg_bleeding_days",
            FieldName::BleedingVolumeScore => "bleeding_volume_score",
            FieldName::IntermenstrualEpisodes => "intermenstrual_episodes",
            FieldName::CycleVariationCoeff => "cycle_variation_coeff",
            FieldName::PatternDisruptionScore => "pattern_disruption_score",
        }
    }

    pub fn spec(&self) -> &'static FieldSpec {
        spec_for(*self)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == trimmed)
            .ok_or_else(|| UnknownField(trimmed.to_string()))
    }
}

/// Inclusive numeric range accepted for a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Value type of a field together with the constraint that applies to it.
///
/// Enumerated fields carry their choices and never carry bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Decimal(Bounds),
    Whole(Bounds),
    Choice { choices: &'static [LifeStage] },
}

impl FieldKind {
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            FieldKind::Decimal(bounds) | FieldKind::Whole(bounds) => Some(*bounds),
            FieldKind::Choice { .. } => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Decimal(_) => "float",
            FieldKind::Whole(_) => "int",
            FieldKind::Choice { .. } => "enum",
        }
    }
}

/// Declarative constraint and rendering hints for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: &'static str,
    /// Sentence subject used when reporting a range violation.
    #[serde(skip)]
    pub subject: &'static str,
    #[serde(skip)]
    pub unit: Option<&'static str>,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl FieldSpec {
    pub fn range_message(&self) -> String {
        match self.kind.bounds() {
            Some(bounds) => match self.unit {
                Some(unit) => format!(
                    "{} must be between {} and {} {}",
                    self.subject, bounds.min, bounds.max, unit
                ),
                None => format!(
                    "{} must be between {} and {}",
                    self.subject, bounds.min, bounds.max
                ),
            },
            None => format!(
                "{} must be one of: {}",
                self.subject,
                LifeStage::ALL
                    .iter()
                    .map(LifeStage::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    /// Value a freshly initialised form holds for this field.
    pub fn default_value(&self) -> &'static str {
        match self.kind {
            FieldKind::Choice { .. } => LifeStage::default().as_str(),
            _ => "",
        }
    }
}

const fn numeric(
    name: FieldName,
    label: &'static str,
    subject: &'static str,
    unit: Option<&'static str>,
    kind: FieldKind,
    step: &'static str,
    placeholder: &'static str,
    hint: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        subject,
        unit,
        kind,
        required: true,
        step: Some(step),
        placeholder: Some(placeholder),
        hint: Some(hint),
    }
}

/// The constraint table. Entries appear in display order.
pub static FIELD_SPECS: [FieldSpec; 12] = [
    numeric(
        FieldName::Age,
        "Age",
        "Age",
        None,
        FieldKind::Decimal(Bounds::new(10.0, 60.0)),
        "1",
        "e.g., 28",
        "10-60 years",
    ),
    numeric(
        FieldName::Bmi,
        "BMI (Body Mass Index)",
        "BMI",
        None,
        FieldKind::Decimal(Bounds::new(10.0, 50.0)),
        "0.1",
        "e.g., 22.5",
        "10-50",
    ),
    FieldSpec {
        name: FieldName::LifeStage,
        label: "Life Stage",
        subject: "Life stage",
        unit: None,
        kind: FieldKind::Choice {
            choices: &LifeStage::ALL,
        },
        required: true,
        step: None,
        placeholder: None,
        hint: None,
    },
    numeric(
        FieldName::TrackingDurationMonths,
        "Tracking Duration (Months)",
        "Tracking duration",
        Some("months"),
        FieldKind::Whole(Bounds::new(1.0, 120.0)),
        "1",
        "e.g., 12",
        "1-120 months",
    ),
    numeric(
        FieldName::PainScore,
        "Pain Score",
        "Pain score",
        None,
        FieldKind::Decimal(Bounds::new(0.0, 10.0)),
        "0.1",
        "e.g., 5.0",
        "0-10 scale",
    ),
    numeric(
        FieldName::AvgCycleLength,
        "Average Cycle Length (Days)",
        "Average cycle length",
        Some("days"),
        FieldKind::Decimal(Bounds::new(15.0, 60.0)),
        "1",
        "e.g., 28",
        "15-60 days",
    ),
    numeric(
        FieldName::CycleLengthVariation,
        "Cycle Length Variation (Days)",
        "Cycle length variation",
        Some("days"),
        FieldKind::Decimal(Bounds::new(0.0, 30.0)),
        "1",
        "e.g., 3",
        "0-30 days",
    ),
    numeric(
        FieldName::AvgBleedingDays,
        "Average Bleeding Days",
        "Average bleeding days",
        None,
        FieldKind::Decimal(Bounds::new(1.0, 15.0)),
        "1",
        "e.g., 5",
        "1-15 days",
    ),
    numeric(
        FieldName::BleedingVolumeScore,
        "Bleeding Volume Score",
        "Bleeding volume score",
        None,
        FieldKind::Decimal(Bounds::new(1.0, 5.0)),
        "1",
        "e.g., 3",
        "1-5 scale",
    ),
    numeric(
        FieldName::IntermenstrualEpisodes,
        "Intermenstrual Episodes",
        "Intermenstrual episodes",
        None,
        FieldKind::Whole(Bounds::new(0.0, 20.0)),
        "1",
        "e.g., 0",
        "0-20 episodes",
    ),
    numeric(
        FieldName::CycleVariationCoeff,
        "Cycle Variation Coefficient",
        "Cycle variation coefficient",
        None,
        FieldKind::Decimal(Bounds::new(0.0, 1.0)),
        "0.01",
        "e.g., 0.15",
        "0-1 range",
    ),
    numeric(
        FieldName::PatternDisruptionScore,
        "Pattern Disruption Score",
        "Pattern disruption score",
        None,
        FieldKind::Decimal(Bounds::new(0.0, 10.0)),
        "0.1",
        "e.g., 2.5",
        "0-10 scale",
    ),
];

pub fn spec_for(name: FieldName) -> &'static FieldSpec {
    // FIELD_SPECS is declared in FieldName order.
    &FIELD_SPECS[name as usize]
}

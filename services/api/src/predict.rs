use clap::Args;
use cycle_insight::config::AppConfig;
use cycle_insight::error::AppError;
use cycle_insight::telemetry::{self, LogSink};
use cycle_insight::workflows::prediction::{
    FieldName, FormState, LifeStage, PredictionError, PredictionForm, ResultSummary, SubmitOutcome,
    FIELD_SPECS,
};
use std::io::Write as _;

use crate::infra::http_workflow;

/// Raw inputs, passed to the validator exactly as typed.
#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Age in years (10-60)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) age: Option<String>,
    /// Body mass index (10-50)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) bmi: Option<String>,
    /// Life stage: reproductive, perimenopausal, postmenopausal, or adolescent
    #[arg(long, default_value = "reproductive")]
    pub(crate) life_stage: String,
    /// Months of cycle tracking (1-120)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) tracking_duration_months: Option<String>,
    /// Pain score (0-10)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) pain_score: Option<String>,
    /// Average cycle length in days (15-60)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) avg_cycle_length: Option<String>,
    /// Cycle length variation in days (0-30)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) cycle_length_variation: Option<String>,
    /// Average bleeding days (1-15)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) avg_bleeding_days: Option<String>,
    /// Bleeding volume score (1-5)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) bleeding_volume_score: Option<String>,
    /// Intermenstrual episodes (0-20)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) intermenstrual_episodes: Option<String>,
    /// Cycle variation coefficient (0-1)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) cycle_variation_coeff: Option<String>,
    /// Pattern disruption score (0-10)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) pattern_disruption_score: Option<String>,
    /// Prediction service base address; overrides PREDICTION_API_URL
    #[arg(long)]
    pub(crate) backend: Option<String>,
    /// Print the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl PredictArgs {
    /// Inputs that were supplied, keyed by field. Omitted flags stay empty.
    fn inputs(&self) -> Vec<(FieldName, &str)> {
        [
            (FieldName::Age, self.age.as_deref()),
            (FieldName::Bmi, self.bmi.as_deref()),
            (FieldName::LifeStage, Some(self.life_stage.as_str())),
            (
                FieldName::TrackingDurationMonths,
                self.tracking_duration_months.as_deref(),
            ),
            (FieldName::PainScore, self.pain_score.as_deref()),
            (FieldName::AvgCycleLength, self.avg_cycle_length.as_deref()),
            (
                FieldName::CycleLengthVariation,
                self.cycle_length_variation.as_deref(),
            ),
            (FieldName::AvgBleedingDays, self.avg_bleeding_days.as_deref()),
            (
                FieldName::BleedingVolumeScore,
                self.bleeding_volume_score.as_deref(),
            ),
            (
                FieldName::IntermenstrualEpisodes,
                self.intermenstrual_episodes.as_deref(),
            ),
            (
                FieldName::CycleVariationCoeff,
                self.cycle_variation_coeff.as_deref(),
            ),
            (
                FieldName::PatternDisruptionScore,
                self.pattern_disruption_score.as_deref(),
            ),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }
}

pub(crate) async fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let base_url = args
        .backend
        .as_deref()
        .unwrap_or(&config.prediction.base_url);
    let workflow = http_workflow(base_url)?;

    let mut form = PredictionForm::new();
    for (field, value) in args.inputs() {
        form.set_value(field, value);
    }

    match form.submit(workflow.as_ref()).await {
        SubmitOutcome::Completed(summary) => {
            if args.json {
                let mut stdout = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut stdout, &summary).map_err(std::io::Error::from)?;
                writeln!(stdout)?;
            } else {
                print!("{}", render_summary(&summary));
            }
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            eprint!("{}", render_field_errors(form.state()));
            Err(errors.into())
        }
        SubmitOutcome::Failed(error) => Err(error.into()),
        SubmitOutcome::Busy => Err(PredictionError::ClientFault {
            detail: "a submission is already outstanding for this form".to_string(),
        }
        .into()),
    }
}

pub(crate) fn run_fields() {
    print!("{}", render_fields_table());
}

pub(crate) fn render_summary(summary: &ResultSummary) -> String {
    let mut out = format!(
        "{}\n{}\nIrregularity probability: {} ({} risk)\n{}\n",
        summary.headline,
        summary.summary,
        summary.percent_label(),
        summary.assessment.tier.label(),
        summary.guidance
    );

    if let Some(types) = &summary.irregularity_types {
        out.push_str("Detected irregularity types:\n");
        for kind in types {
            out.push_str(&format!("  - {kind}\n"));
        }
    }
    out
}

/// One line per failing input, in display order, with the value as typed.
pub(crate) fn render_field_errors(state: &FormState) -> String {
    let mut out = String::from("Please correct the following inputs:\n");
    for (spec, value) in state.entries() {
        if let Some(message) = state.error(spec.name) {
            out.push_str(&format!("  {:<32} {message} (got '{value}')\n", spec.label));
        }
    }
    out
}

pub(crate) fn render_fields_table() -> String {
    let mut out = format!(
        "{:<28} {:<34} {:<6} {}\n",
        "FIELD", "LABEL", "TYPE", "ALLOWED"
    );
    for spec in FIELD_SPECS.iter() {
        let allowed = match spec.kind.bounds() {
            Some(bounds) => format!("{} to {}", bounds.min, bounds.max),
            None => LifeStage::ALL
                .iter()
                .map(LifeStage::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        };
        out.push_str(&format!(
            "{:<28} {:<34} {:<6} {}\n",
            spec.name.as_str(),
            spec.label,
            spec.kind.label(),
            allowed
        ));
    }
    out
}

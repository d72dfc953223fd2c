use super::common::*;
use crate::workflows::prediction::{
    ResultSummary, ResultView, RiskAssessment, RiskTier, MISSING_RESULT_MESSAGE,
};

#[test]
fn irregular_high_probability_shows_types() {
    let response = response(1, 0.85, &["Oligomenorrhea"]);

    let assessment = RiskAssessment::from_response(&response);
    assert!(assessment.is_irregular);
    assert_eq!(assessment.percent, 85.0);
    assert_eq!(assessment.tier, RiskTier::High);

    let summary = ResultSummary::from_response(&response);
    assert_eq!(summary.headline, "Irregular Cycle Detected");
    assert_eq!(
        summary.irregularity_types,
        Some(vec!["Oligomenorrhea".to_string()])
    );
    assert_eq!(summary.percent_label(), "85.0%");
}

#[test]
fn regular_low_probability_hides_types() {
    let response = response(0, 0.12, &[]);

    let assessment = RiskAssessment::from_response(&response);
    assert!(!assessment.is_irregular);
    assert_eq!(assessment.percent, 12.0);
    assert_eq!(assessment.tier, RiskTier::Low);

    let summary = ResultSummary::from_response(&response);
    assert_eq!(summary.headline, "Regular Cycle");
    assert!(summary.irregularity_types.is_none());
}

#[test]
fn tier_boundaries_are_closed_open() {
    assert_eq!(RiskTier::from_probability(0.29999), RiskTier::Low);
    assert_eq!(RiskTier::from_probability(0.30), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(0.69999), RiskTier::Medium);
    assert_eq!(RiskTier::from_probability(0.70), RiskTier::High);
    assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
}

#[test]
fn tier_uses_unrounded_probability() {
    // 0.2996 displays as 30.0% but stays in the low band.
    let response = response(0, 0.2996, &[]);
    let assessment = RiskAssessment::from_response(&response);
    assert_eq!(assessment.percent, 30.0);
    assert_eq!(assessment.tier, RiskTier::Low);
}

#[test]
fn regular_result_never_lists_types() {
    let response = response(0, 0.4, &["Polymenorrhea"]);
    let summary = ResultSummary::from_response(&response);
    assert!(summary.irregularity_types.is_none());
    assert_eq!(summary.assessment.tier, RiskTier::Medium);
}

#[test]
fn irregularity_types_keep_their_order() {
    let response = response(1, 0.91, &["Menorrhagia", "Oligomenorrhea", "Amenorrhea"]);
    let summary = ResultSummary::from_response(&response);
    assert_eq!(
        summary.irregularity_types.expect("types shown"),
        vec!["Menorrhagia", "Oligomenorrhea", "Amenorrhea"]
    );
}

#[test]
fn absent_response_is_the_missing_state() {
    let view = ResultView::from_response(None);
    assert!(view.summary().is_none());
    match view {
        ResultView::Missing { message, action, .. } => {
            assert_eq!(message, MISSING_RESULT_MESSAGE);
            assert_eq!(action, "Go to Prediction Form");
        }
        ResultView::Ready(_) => panic!("no response should not be ready"),
    }
}

#[test]
fn result_view_serializes_with_status_tag() {
    let view = ResultView::from_response(Some(&response(1, 0.85, &["Oligomenorrhea"])));
    let value = serde_json::to_value(&view).expect("serializes");
    assert_eq!(value["status"], "ready");
    assert_eq!(value["assessment"]["tier"], "high");

    let missing = serde_json::to_value(ResultView::missing()).expect("serializes");
    assert_eq!(missing["status"], "missing");
}

//! Tests for exo-model types.

use exo_model::{
    ClassificationReport, DispositionSummary, Feature, Label, Prediction, PredictionResult,
};

#[test]
fn disposition_summary_serializes() {
    let mut summary = DispositionSummary::default();
    for raw in ["CONFIRMED", "FALSE POSITIVE", "NOT DISPOSITIONED"] {
        summary.record(raw);
    }
    insta::assert_json_snapshot!(summary, @r#"
    {
      "rows_read": 3,
      "rows_retained": 2,
      "rows_dropped": 1,
      "planets": 1,
      "non_planets": 1,
      "unknown_values": [
        "NOT DISPOSITIONED"
      ]
    }
    "#);
}

#[test]
fn feature_serializes_as_column_name() {
    for feature in Feature::ALL {
        let json = serde_json::to_string(&feature).expect("serialize feature");
        assert_eq!(json, format!("\"{}\"", feature.column_name()));
    }
}

#[test]
fn label_class_round_trips() {
    for label in [Label::Planet, Label::NonPlanet] {
        assert_eq!(Label::from_class(label.class()), Some(label));
    }
    assert_eq!(Label::from_class(2), None);
}

#[test]
fn prediction_result_accessors() {
    let result = PredictionResult::new(vec![
        Prediction {
            label: Label::Planet,
            confidence: 0.8,
        },
        Prediction {
            label: Label::NonPlanet,
            confidence: 0.3,
        },
    ]);
    assert_eq!(result.len(), 2);
    assert_eq!(result.labels(), vec![1, 0]);
    assert_eq!(result.confidences(), vec![0.8, 0.3]);
    assert_eq!(result.planet_count(), 1);
}

#[test]
fn report_over_empty_input_is_zeroed() {
    let report = ClassificationReport::from_predictions(&[], &[]);
    assert_eq!(report.support(), 0);
    assert_eq!(report.accuracy, 0.0);
    assert_eq!(report.weighted_avg.f1, 0.0);
}

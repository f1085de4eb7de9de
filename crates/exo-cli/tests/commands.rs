//! Integration tests for the command layer.

use std::fs;

use exo_cli::commands::{run_predict, run_train};
use exo_cli::summary::prediction_table;
use exo_model::Label;
use exo_train::{FittedPipeline, TrainingOptions};
use tempfile::TempDir;

#[test]
fn predict_appends_prediction_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("batch.csv");
    fs::write(&input, "kepid,snr\n1,50\n2,250\n3,120\n4,\n").unwrap();
    let output = dir.path().join("out").join("scored.csv");

    let report = run_predict(&input, Some(&output)).expect("predict succeeds");
    assert!(report.has_snr);
    assert_eq!(report.rows.len(), 4);
    assert_eq!(report.planet_count(), 2);
    assert_eq!(report.rows[3].snr, None);
    assert_eq!(report.rows[3].prediction.label, Label::NonPlanet);

    let written = fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written, @r"
    kepid,snr,prediction,probability
    1,50,0,0.4750
    2,250,1,0.6250
    3,120,1,0.5600
    4,,0,0.5000
    ");
}

#[test]
fn predict_without_snr_defaults_every_row() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("no_snr.csv");
    fs::write(&input, "kepid,planet_radius\n1,2.0\n2,3.5\n").unwrap();

    let report = run_predict(&input, None).unwrap();
    assert!(!report.has_snr);
    assert_eq!(report.rows.len(), 2);
    for row in &report.rows {
        assert_eq!(row.prediction.label, Label::NonPlanet);
        assert!((row.prediction.confidence - 0.5).abs() < 1e-12);
    }
    assert_eq!(prediction_table(&report).row_count(), 2);
}

#[test]
fn predict_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.csv");
    let error = run_predict(&missing, None).unwrap_err();
    assert!(format!("{error:#}").contains("missing.csv"));
}

#[test]
fn train_writes_artifact_at_model_path() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("combined.csv");
    let mut csv = String::from("disposition,snr,planet_radius\n");
    for i in 0..20 {
        csv.push_str(&format!("CONFIRMED,{},{}\n", 200 + i * 10, 2.0 + i as f64 * 0.1));
        csv.push_str(&format!("FALSE POSITIVE,{},{}\n", 10 + i, 14.0 + i as f64 * 0.1));
    }
    fs::write(&data, csv).unwrap();
    let model_path = dir.path().join("model").join("pipeline.json");

    let outcome = run_train(
        &TrainingOptions::new(&data)
            .with_model_path(&model_path)
            .with_trees(10),
    )
    .expect("training succeeds");
    assert_eq!(outcome.summary.rows_dropped, 0);
    assert_eq!(outcome.test_rows, 8);
    let loaded = FittedPipeline::load(&model_path).unwrap();
    assert_eq!(loaded.forest.n_trees(), 10);
}

#[test]
fn train_without_disposition_fails_with_context() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("unlabelled.csv");
    fs::write(&data, "snr,planet_radius\n120,2.0\n").unwrap();
    let error = run_train(&TrainingOptions::new(&data).with_model_path(dir.path().join("m.json")))
        .unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("train on"));
    assert!(message.contains("disposition"));
}

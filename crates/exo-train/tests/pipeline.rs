use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use exo_ingest::load_labelled_dataset;
use exo_model::Label;
use exo_train::{
    FittedPipeline, ForestParams, TrainError, TrainingOptions, run_training, select,
    stratified_split, train_and_evaluate,
};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Forty candidates per class; planets have strong signals and larger radii.
fn candidate_csv() -> String {
    let mut csv = String::from("kepid,disposition,orbital_period,planet_radius,snr\n");
    for i in 0..40 {
        let disposition = if i % 2 == 0 { "CONFIRMED" } else { "CANDIDATE" };
        let radius = if i % 9 == 0 {
            String::new()
        } else {
            format!("{:.2}", 1.5 + (i % 5) as f64 * 0.3)
        };
        writeln!(
            csv,
            "{},{disposition},{:.1},{radius},{:.1}",
            1000 + i,
            3.0 + i as f64,
            180.0 + i as f64 * 7.0
        )
        .unwrap();
    }
    for i in 0..40 {
        let disposition = if i % 2 == 0 { "FALSE POSITIVE" } else { "fp" };
        writeln!(
            csv,
            "{},{disposition},{:.1},{:.2},{:.1}",
            2000 + i,
            0.5 + i as f64 * 0.1,
            12.0 + (i % 4) as f64,
            5.0 + i as f64
        )
        .unwrap();
    }
    csv.push_str("3000,REFUTED,4.0,2.0,90.0\n");
    csv
}

fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("combined.csv");
    fs::write(&path, contents).expect("write csv");
    path
}

fn small_forest() -> ForestParams {
    ForestParams::default().with_trees(15)
}

#[test]
fn training_run_writes_loadable_artifact() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, &candidate_csv());
    let model_path = dir.path().join("model").join("pipeline.json");
    let options = TrainingOptions::new(&data)
        .with_model_path(&model_path)
        .with_trees(15);

    let outcome = run_training(&options).expect("training succeeds");
    assert_eq!(outcome.summary.rows_dropped, 1);
    assert_eq!(outcome.train_rows + outcome.test_rows, 80);
    assert_eq!(outcome.test_rows, 16);
    assert_eq!(outcome.report.support(), 16);
    assert!(outcome.report.accuracy > 0.8);
    assert!(model_path.exists());

    let loaded = FittedPipeline::load(&model_path).expect("artifact loads");
    assert_eq!(loaded, outcome.pipeline);
    assert_eq!(loaded.metadata.training_rows, outcome.train_rows);
    assert_eq!(
        loaded.metadata.dataset_sha256.as_deref().map(str::len),
        Some(64)
    );

    let dataset = load_labelled_dataset(&data).unwrap();
    assert_eq!(
        loaded.predict_proba(&dataset.rows).unwrap(),
        outcome.pipeline.predict_proba(&dataset.rows).unwrap()
    );
}

#[test]
fn retraining_overwrites_existing_artifact() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, &candidate_csv());
    let model_path = dir.path().join("model").join("pipeline.json");
    let options = TrainingOptions::new(&data)
        .with_model_path(&model_path)
        .with_trees(3);
    run_training(&options).unwrap();
    let outcome = run_training(&options.with_trees(5)).unwrap();
    let loaded = FittedPipeline::load(&model_path).unwrap();
    assert_eq!(loaded.forest.n_trees(), 5);
    assert_eq!(loaded.forest, outcome.pipeline.forest);
}

#[test]
fn fixed_seed_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let dataset = load_labelled_dataset(&write_csv(&dir, &candidate_csv())).unwrap();
    let first = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap();
    let second = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap();
    assert_eq!(first.pipeline.imputer, second.pipeline.imputer);
    assert_eq!(first.pipeline.scaler, second.pipeline.scaler);
    assert_eq!(first.pipeline.forest, second.pipeline.forest);
    assert_eq!(first.report, second.report);
}

#[test]
fn imputer_sees_training_rows_only() {
    let dir = TempDir::new().unwrap();
    let dataset = load_labelled_dataset(&write_csv(&dir, &candidate_csv())).unwrap();
    let evaluated = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap();

    let split = stratified_split(&dataset.labels, 0.2, small_forest().seed);
    let train_rows = select(&dataset.rows, &split.train);
    let snr_column = dataset.features.len() - 1;
    let mut observed: Vec<f64> = train_rows.iter().filter_map(|row| row[snr_column]).collect();
    observed.sort_by(f64::total_cmp);
    let mid = observed.len() / 2;
    let expected = if observed.len() % 2 == 0 {
        (observed[mid - 1] + observed[mid]) / 2.0
    } else {
        observed[mid]
    };
    assert_eq!(evaluated.pipeline.imputer.medians[snr_column], expected);
    assert_eq!(evaluated.pipeline.metadata.training_rows, split.train.len());
}

#[test]
fn missing_disposition_is_fatal() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, "kepid,snr\n1,120\n2,30\n");
    let model_path = dir.path().join("pipeline.json");
    let err = run_training(&TrainingOptions::new(&data).with_model_path(&model_path))
        .expect_err("must fail");
    assert!(matches!(err, TrainError::Ingest(ref inner) if inner.is_missing_column()));
    assert!(!model_path.exists());
}

#[test]
fn single_class_training_split_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, "disposition,snr\nCONFIRMED,120\nPC,300\nKP,180\n");
    let dataset = load_labelled_dataset(&data).unwrap();
    let err = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap_err();
    assert!(matches!(err, TrainError::MissingClass { ref class } if class == "non-planet"));
}

#[test]
fn dataset_without_features_is_rejected() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, "disposition,kepid\nCONFIRMED,1\nFP,2\n");
    let dataset = load_labelled_dataset(&data).unwrap();
    assert!(matches!(
        train_and_evaluate(&dataset, 0.2, small_forest()),
        Err(TrainError::NoFeatures { .. })
    ));
}

#[test]
fn predictions_use_label_vocabulary() {
    let dir = TempDir::new().unwrap();
    let dataset = load_labelled_dataset(&write_csv(&dir, &candidate_csv())).unwrap();
    let evaluated = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap();
    let strong = vec![vec![Some(20.0), Some(2.0), Some(400.0)]];
    let weak = vec![vec![Some(1.0), Some(13.0), Some(10.0)]];
    assert_eq!(evaluated.pipeline.predict(&strong).unwrap(), vec![Label::Planet]);
    assert_eq!(evaluated.pipeline.predict(&weak).unwrap(), vec![Label::NonPlanet]);
    assert!(matches!(
        evaluated.pipeline.predict(&[vec![Some(1.0)]]),
        Err(TrainError::FeatureMismatch { expected: 3, found: 1 })
    ));
}

#[test]
fn too_few_rows_to_hold_out_fails_before_fit() {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, "disposition,snr\nCONFIRMED,300\nPC,250\nFP,10\nFP,20\n");
    let dataset = load_labelled_dataset(&data).unwrap();
    let err = train_and_evaluate(&dataset, 0.2, small_forest()).unwrap_err();
    assert!(matches!(err, TrainError::MissingTestClass { ref class } if class == "non-planet"));

    let model_path = dir.path().join("model").join("pipeline.json");
    let err = run_training(&TrainingOptions::new(&data).with_model_path(&model_path)).unwrap_err();
    assert!(matches!(err, TrainError::MissingTestClass { .. }));
    assert!(!model_path.exists());
}

/// Train a one-tree artifact, edit its JSON and try to load it back.
fn load_edited_artifact(edit: impl FnOnce(&mut Value)) -> exo_train::Result<FittedPipeline> {
    let dir = TempDir::new().unwrap();
    let data = write_csv(&dir, &candidate_csv());
    let model_path = dir.path().join("pipeline.json");
    run_training(
        &TrainingOptions::new(&data)
            .with_model_path(&model_path)
            .with_trees(1),
    )
    .unwrap();
    let mut artifact: Value = serde_json::from_slice(&fs::read(&model_path).unwrap()).unwrap();
    edit(&mut artifact);
    fs::write(&model_path, serde_json::to_vec(&artifact).unwrap()).unwrap();
    FittedPipeline::load(&model_path)
}

fn first_split(artifact: &mut Value) -> &mut Value {
    artifact["forest"]["trees"][0]["nodes"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|node| node["kind"] == "split")
        .expect("tree has a split")
}

fn assert_rejected(case: &str, edit: impl FnOnce(&mut Value)) {
    let err = load_edited_artifact(edit).expect_err(case);
    assert!(matches!(err, TrainError::ArtifactInvalid { .. }), "{case}: {err}");
}

#[test]
fn untouched_artifact_loads() {
    let pipeline = load_edited_artifact(|_| {}).expect("artifact loads");
    assert_eq!(pipeline.forest.n_trees(), 1);
}

#[test]
fn corrupt_artifacts_are_rejected_on_load() {
    assert_rejected("child out of range", |a| first_split(a)["left"] = json!(999));
    assert_rejected("child loops back", |a| first_split(a)["right"] = json!(0));
    assert_rejected("feature out of range", |a| first_split(a)["feature"] = json!(7));
    assert_rejected("no trees", |a| a["forest"]["trees"] = json!([]));
    assert_rejected("imputer too narrow", |a| {
        a["imputer"]["medians"].as_array_mut().unwrap().pop();
    });
    assert_rejected("zero scale", |a| a["scaler"]["scales"][0] = json!(0.0));
}

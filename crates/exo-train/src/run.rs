//! End-to-end training run: ingest, split, fit, evaluate, persist.

use std::path::PathBuf;
use std::time::Instant;

use exo_ingest::{LabelledDataset, file_sha256, load_labelled_dataset};
use exo_model::{ClassificationReport, DispositionSummary, Feature, Label};
use tracing::{debug, info, info_span};

use crate::error::{Result, TrainError};
use crate::forest::ForestParams;
use crate::options::TrainingOptions;
use crate::pipeline::FittedPipeline;
use crate::split::{select, stratified_split};

/// What a completed training run produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub summary: DispositionSummary,
    pub features: Vec<Feature>,
    pub train_rows: usize,
    pub test_rows: usize,
    pub report: ClassificationReport,
    pub model_path: PathBuf,
    pub pipeline: FittedPipeline,
}

/// Fitted pipeline plus its held-out evaluation, before persistence.
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub pipeline: FittedPipeline,
    pub report: ClassificationReport,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Run the full training workflow described by `options`.
pub fn run_training(options: &TrainingOptions) -> Result<TrainingOutcome> {
    options.validate()?;
    let training_span = info_span!(
        "training",
        data = %options.data_path.display(),
        seed = options.seed,
        trees = options.n_trees
    );
    let _training_guard = training_span.enter();
    let run_start = Instant::now();

    let (dataset, checksum) = info_span!("ingest").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let dataset = load_labelled_dataset(&options.data_path)?;
        let checksum = file_sha256(&options.data_path)?;
        info!(
            rows = dataset.len(),
            dropped = dataset.summary.rows_dropped,
            features = dataset.features.len(),
            duration_ms = start.elapsed().as_millis(),
            "ingest complete"
        );
        Ok((dataset, checksum))
    })?;

    let mut evaluated = train_and_evaluate(&dataset, options.test_fraction, options.forest_params())?;
    evaluated.pipeline.metadata.dataset_sha256 = Some(checksum);

    info_span!("persist").in_scope(|| -> Result<()> {
        let start = Instant::now();
        evaluated.pipeline.save(&options.model_path)?;
        debug!(
            path = %options.model_path.display(),
            duration_ms = start.elapsed().as_millis(),
            "persist complete"
        );
        Ok(())
    })?;

    info!(
        accuracy = evaluated.report.accuracy,
        duration_ms = run_start.elapsed().as_millis(),
        "training complete"
    );
    Ok(TrainingOutcome {
        summary: dataset.summary,
        features: dataset.features,
        train_rows: evaluated.train_rows,
        test_rows: evaluated.test_rows,
        report: evaluated.report,
        model_path: options.model_path.clone(),
        pipeline: evaluated.pipeline,
    })
}

/// Split, fit on the training side and score the held-out side.
pub fn train_and_evaluate(
    dataset: &LabelledDataset,
    test_fraction: f64,
    params: ForestParams,
) -> Result<Evaluated> {
    if dataset.features.is_empty() {
        let expected = Feature::ALL
            .iter()
            .map(|feature| feature.column_name())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(TrainError::NoFeatures { expected });
    }

    let split = info_span!("split").in_scope(|| {
        let start = Instant::now();
        let split = stratified_split(&dataset.labels, test_fraction, params.seed);
        info!(
            train = split.train.len(),
            test = split.test.len(),
            duration_ms = start.elapsed().as_millis(),
            "split complete"
        );
        split
    });

    let train_rows = select(&dataset.rows, &split.train);
    let train_labels = select(&dataset.labels, &split.train);
    let test_labels = select(&dataset.labels, &split.test);
    for label in [Label::NonPlanet, Label::Planet] {
        if !train_labels.contains(&label) {
            return Err(TrainError::MissingClass {
                class: label.to_string(),
            });
        }
    }
    for label in [Label::NonPlanet, Label::Planet] {
        if !test_labels.contains(&label) {
            return Err(TrainError::MissingTestClass {
                class: label.to_string(),
            });
        }
    }

    let pipeline = info_span!("fit").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let pipeline = FittedPipeline::fit(&dataset.features, &train_rows, &train_labels, params)?;
        info!(
            trees = pipeline.forest.n_trees(),
            rows = train_rows.len(),
            duration_ms = start.elapsed().as_millis(),
            "fit complete"
        );
        Ok(pipeline)
    })?;

    let report = info_span!("evaluate").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let test_rows = select(&dataset.rows, &split.test);
        let predicted = pipeline.predict(&test_rows)?;
        let report = ClassificationReport::from_predictions(&test_labels, &predicted);
        info!(
            accuracy = report.accuracy,
            support = report.support(),
            duration_ms = start.elapsed().as_millis(),
            "evaluate complete"
        );
        Ok(report)
    })?;

    Ok(Evaluated {
        pipeline,
        report,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

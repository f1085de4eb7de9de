use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use exo_ingest::{column_f64, read_csv_table, table_frame};
use exo_model::Feature;
use exo_predict::{predict_frame, write_predictions_csv};
use exo_train::{TrainingOptions, TrainingOutcome, run_training};
use exo_web::WebConfig;
use rand::RngCore;
use tracing::{info, info_span, warn};

use crate::types::{PredictedRow, PredictionReport};

/// Bytes of randomness in a generated secret key.
const GENERATED_SECRET_BYTES: usize = 32;

pub fn run_train(options: &TrainingOptions) -> Result<TrainingOutcome> {
    run_training(options).with_context(|| format!("train on {}", options.data_path.display()))
}

pub fn run_predict(input: &Path, output: Option<&Path>) -> Result<PredictionReport> {
    let span = info_span!("predict", source = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let table = read_csv_table(input).with_context(|| format!("read {}", input.display()))?;
    let origin = input.display().to_string();
    let frame = table_frame(&origin, &table).with_context(|| format!("load {origin}"))?;
    let result = predict_frame(&frame);
    let snr = column_f64(&frame, Feature::Snr.column_name());
    let has_snr = snr.is_some();
    let snr = snr.unwrap_or_else(|| vec![None; result.len()]);

    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        write_predictions_csv(BufWriter::new(file), &table, &result)
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), rows = result.len(), "predictions written");
    }

    let rows = result
        .predictions
        .iter()
        .zip(snr)
        .enumerate()
        .map(|(index, (prediction, snr))| PredictedRow {
            row: index + 1,
            snr,
            prediction: *prediction,
        })
        .collect();
    info!(
        rows = result.len(),
        planets = result.planet_count(),
        duration_ms = start.elapsed().as_millis(),
        "prediction complete"
    );
    Ok(PredictionReport {
        source: input.to_path_buf(),
        rows,
        has_snr,
        output: output.map(Path::to_path_buf),
    })
}

pub fn run_serve(mut config: WebConfig) -> Result<()> {
    if config.secret_key.trim().is_empty() {
        warn!("no secret key configured; generating an ephemeral key");
        config.secret_key = generate_secret_key();
    }
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime
        .block_on(exo_web::serve(config))
        .context("run web server")
}

/// Random hex string suitable as a per-process secret.
pub fn generate_secret_key() -> String {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

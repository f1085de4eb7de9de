use std::fs;
use std::path::PathBuf;

use exo_ingest::{IngestError, file_sha256, load_labelled_dataset, read_csv_table};
use exo_model::{Feature, Label};
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn known_vocabulary_drops_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "combined.csv",
        "disposition,snr,orbital_period\n\
         CONFIRMED,120,3.5\n\
         false positive,8,1.2\n\
         PC,,40\n\
         fp,15,\n\
         Kp,300,9\n\
         candidate,99,2\n",
    );
    let dataset = load_labelled_dataset(&path).expect("load dataset");
    assert_eq!(dataset.summary.rows_dropped, 0);
    assert_eq!(dataset.len(), 6);
    assert_eq!(
        dataset.features,
        vec![Feature::OrbitalPeriod, Feature::Snr]
    );
    assert_eq!(
        dataset.labels,
        vec![
            Label::Planet,
            Label::NonPlanet,
            Label::Planet,
            Label::NonPlanet,
            Label::Planet,
            Label::Planet
        ]
    );
    assert_eq!(dataset.rows[2], vec![Some(40.0), None]);
    assert_eq!(
        dataset.missing_counts(),
        vec![(Feature::OrbitalPeriod, 1), (Feature::Snr, 1)]
    );
}

#[test]
fn unknown_dispositions_are_exactly_the_dropped_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "combined.csv",
        "disposition,snr\n\
         CONFIRMED,120\n\
         REFUTED,5\n\
         FP,7\n\
         ,9\n\
         APC,11\n\
         \x20CONFIRMED,13\n",
    );
    let dataset = load_labelled_dataset(&path).expect("load dataset");
    assert_eq!(dataset.summary.rows_read, 6);
    assert_eq!(dataset.summary.rows_dropped, 4);
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.rows,
        vec![vec![Some(120.0)], vec![Some(7.0)]]
    );
    let unknown: Vec<&str> = dataset
        .summary
        .unknown_values
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(unknown, vec!["", " CONFIRMED", "APC", "REFUTED"]);
}

#[test]
fn missing_disposition_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "nolabel.csv", "snr,planet_radius\n10,1\n");
    let err = load_labelled_dataset(&path).unwrap_err();
    assert!(err.is_missing_column());
    assert!(err.to_string().contains("disposition"));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let err = read_csv_table(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn fingerprint_is_stable() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "a.csv", "abc");
    let hash = file_sha256(&path).unwrap();
    assert_eq!(
        hash,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

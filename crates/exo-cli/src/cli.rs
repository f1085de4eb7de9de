//! CLI argument definitions for `exoclass`.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use exo_train::{DEFAULT_MODEL_PATH, DEFAULT_SEED, DEFAULT_TEST_FRACTION, DEFAULT_TREE_COUNT};
use exo_web::{DEFAULT_LISTEN_ADDR, DEFAULT_MAX_UPLOAD_BYTES};

#[derive(Parser)]
#[command(
    name = "exoclass",
    version,
    about = "Exoplanet candidate classifier - train, predict and serve",
    long_about = "Classify transit candidates as exoplanet candidates or non-planets.\n\n\
                  Trains an imputation + scaling + random forest pipeline from a labelled\n\
                  catalogue, and scores tables with a signal-to-noise heuristic."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train the classification pipeline from a labelled CSV.
    Train(TrainArgs),

    /// Score a CSV with the signal-to-noise heuristic.
    Predict(PredictArgs),

    /// Run the web front end.
    Serve(ServeArgs),
}

#[derive(Parser)]
pub struct TrainArgs {
    /// CSV with a `disposition` column and candidate features.
    #[arg(value_name = "DATA_CSV")]
    pub data: PathBuf,

    /// Where to write the fitted pipeline.
    #[arg(long = "model-path", value_name = "PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Seed for the stratified split and the forest.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of trees in the forest.
    #[arg(long, default_value_t = DEFAULT_TREE_COUNT)]
    pub trees: usize,

    /// Fraction of each class held out for evaluation.
    #[arg(long = "test-size", default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_size: f64,

    /// Maximum tree depth (unlimited when omitted).
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// CSV to score; only the `snr` column is used.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Write the table with `prediction` and `probability` columns appended.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, value_name = "ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Application secret (a random one is generated when omitted).
    #[arg(long = "secret-key", env = "EXOCLASS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Largest accepted upload, in bytes.
    #[arg(long = "max-upload-bytes", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn train_defaults() {
        let cli = Cli::try_parse_from(["exoclass", "train", "data.csv"]).unwrap();
        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.seed, 42);
        assert_eq!(args.trees, 200);
        assert_eq!(args.model_path, PathBuf::from("model/pipeline.json"));
        assert!((args.test_size - 0.2).abs() < f64::EPSILON);
        assert_eq!(args.max_depth, None);
    }

    #[test]
    fn serve_defaults_to_local_port_5000() {
        let cli = Cli::try_parse_from(["exoclass", "serve", "--secret-key", "k"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.listen, "127.0.0.1:5000".parse::<SocketAddr>().unwrap());
        assert_eq!(args.secret_key.as_deref(), Some("k"));
    }
}

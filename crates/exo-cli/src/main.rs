//! Exoplanet candidate classifier CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use exo_cli::commands::{run_predict, run_serve, run_train};
use exo_cli::logging::{LogConfig, LogFormat, init_logging};
use exo_cli::summary::{print_predictions, print_training_summary};
use exo_train::TrainingOptions;
use exo_web::WebConfig;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, TrainArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Train(args) => match run_train(&training_options(args)) {
            Ok(outcome) => {
                print_training_summary(&outcome);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Predict(args) => match run_predict(&args.input, args.output.as_deref()) {
            Ok(report) => {
                print_predictions(&report);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Serve(args) => {
            let config = WebConfig::new(args.listen, args.secret_key.unwrap_or_default())
                .with_max_upload_bytes(args.max_upload_bytes);
            match run_serve(config) {
                Ok(()) => 0,
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
}

fn training_options(args: TrainArgs) -> TrainingOptions {
    TrainingOptions::new(args.data)
        .with_model_path(args.model_path)
        .with_seed(args.seed)
        .with_trees(args.trees)
        .with_test_fraction(args.test_size)
        .with_max_depth(args.max_depth)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

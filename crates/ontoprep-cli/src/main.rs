//! ontoprep command-line interface.

use clap::{ColorChoice, Parser};
use ontoprep_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_clean, run_clean_uris, run_config, run_convert, run_pipeline_command, run_taxonomy,
    run_uniquify, run_verify,
};
use crate::summary::{
    print_clean, print_clean_uris, print_config, print_convert, print_pipeline, print_taxonomy,
    print_uniquify, print_verify,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::Clean(args) => {
            run_clean(args).map(|stats| print_clean(&args.output, &stats))
        }
        Command::Convert(args) => {
            run_convert(args).map(|rows| print_convert(&args.output, rows))
        }
        Command::Uniquify(args) => {
            run_uniquify(args).map(|report| print_uniquify(&args.output, &report))
        }
        Command::Taxonomy(args) => run_taxonomy(args).map(|result| print_taxonomy(&result)),
        Command::CleanUris(args) => run_clean_uris(args)
            .map(|(output, replacements)| print_clean_uris(&output, replacements)),
        Command::Verify(args) => run_verify(args).map(|result| print_verify(&result)),
        Command::Pipeline(args) => run_pipeline_command(args).and_then(|result| {
            print_pipeline(&result);
            match result.run.error() {
                Some(error) => Err(anyhow::anyhow!("stage {} failed", error.stage())),
                None => Ok(()),
            }
        }),
        Command::Config(args) => run_config(args).map(|result| print_config(&result)),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
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
    config.with_span_close = config.level_filter >= LevelFilter::DEBUG;
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}

//! Command line entry point for facet community analysis

use anyhow::{Context, Result};
use clap::Parser;
use facet_communities::{
    config::{CliOverrides, Settings},
    run_analysis, AnalysisError,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "facet_communities")]
#[command(about = "Group the facets of a logic program by the consequences they force")]
#[command(version)]
struct Cli {
    /// Ground logic program
    program: PathBuf,

    /// Id map with `c <code> <name>` lines
    id_map: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run_command(cli.program, cli.id_map) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 for unusable inputs, 1 for everything else
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AnalysisError>() {
        Some(analysis_err) if analysis_err.is_input_error() => 2,
        _ => 1,
    }
}

fn run_command(program: PathBuf, id_map: PathBuf) -> Result<()> {
    let mut settings = Settings::default();
    settings.merge_with_cli(&CliOverrides {
        program_file: Some(program),
        id_map_file: Some(id_map),
    });
    settings.validate().context("Invalid input files")?;

    let report = run_analysis(settings)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write report")?;
    Ok(())
}

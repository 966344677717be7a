use clap::{Parser, Subcommand};
use serde::Serialize;

mod commands;

use commands::{download, filename, run_step, setup, treemaker};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "svj-jobs")]
#[command(version = VERSION)]
#[command(about = "Orchestrate semi-visible jet signal production through CMSSW")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical rootfile name for a step
    Filename(filename::FilenameArgs),
    /// Print the madgraph gridpack tarball name
    GridpackFilename(filename::GridpackFilenameArgs),
    /// Fetch the gridpack tarball into the release working area
    DownloadTarball(download::DownloadArgs),
    /// Run one step of the SVJProductions chain
    RunStep(run_step::RunStepArgs),
    /// Run TreeMaker ntuplization over a rootfile
    Treemaker(treemaker::TreemakerArgs),
    /// Materialize a CMSSW release from a remote archive
    Setup(setup::SetupArgs),
}

fn dispatch(command: Commands) -> svj_jobs::Result<serde_json::Value> {
    match command {
        Commands::Filename(args) => to_value(filename::run(args)?),
        Commands::GridpackFilename(args) => to_value(filename::run_gridpack(args)?),
        Commands::DownloadTarball(args) => to_value(download::run(args)?),
        Commands::RunStep(args) => to_value(run_step::run(args)?),
        Commands::Treemaker(args) => to_value(treemaker::run(args)?),
        Commands::Setup(args) => to_value(setup::run(args)?),
    }
}

fn to_value<T: Serialize>(output: T) -> svj_jobs::Result<serde_json::Value> {
    Ok(serde_json::to_value(output)?)
}

fn main() {
    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
        }
        Err(err) => {
            let response = serde_json::json!({
                "error": {
                    "code": err.code(),
                    "message": err.to_string(),
                }
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&response).unwrap_or_default()
            );
            std::process::exit(1);
        }
    }
}

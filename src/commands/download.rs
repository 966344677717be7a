use clap::Args;
use serde::Serialize;

use svj_jobs::cmssw::Cmssw;
use svj_jobs::jobs;
use svj_jobs::storage::XrootdStorage;

use super::{expand_path, CmdResult, PhysicsArgs};

#[derive(Args)]
pub struct DownloadArgs {
    /// Path to the CMSSW release directory
    #[arg(long)]
    pub cmssw: String,

    /// Storage-element directory holding the gridpack tarballs
    #[arg(long = "search-path")]
    pub search_path: Option<String>,

    #[command(flatten)]
    pub physics: PhysicsArgs,
}

#[derive(Serialize)]
pub struct DownloadOutput {
    pub destination: String,
}

pub fn run(args: DownloadArgs) -> CmdResult<DownloadOutput> {
    let physics = args.physics.to_physics()?;
    let cmssw = Cmssw::new(expand_path(&args.cmssw));
    let destination = jobs::download_madgraph_tarball(
        &cmssw,
        &XrootdStorage,
        &physics,
        args.search_path.as_deref(),
    )?;
    Ok(DownloadOutput {
        destination: destination.to_string_lossy().to_string(),
    })
}

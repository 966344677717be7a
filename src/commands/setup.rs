use std::path::Path;

use clap::Args;
use serde::Serialize;

use svj_jobs::cmssw::Cmssw;

use super::{expand_path, CmdResult};

#[derive(Args)]
pub struct SetupArgs {
    /// URL (or storage reference) of the release archive
    #[arg(long)]
    pub url: String,

    /// Directory to extract the release into
    #[arg(long, default_value = ".")]
    pub dest: String,
}

#[derive(Serialize)]
pub struct SetupOutput {
    pub release_path: String,
}

pub fn run(args: SetupArgs) -> CmdResult<SetupOutput> {
    let dest = expand_path(&args.dest);
    let cmssw = Cmssw::from_tarball(&args.url, Path::new(&dest))?;
    Ok(SetupOutput {
        release_path: cmssw.path.to_string_lossy().to_string(),
    })
}

use clap::Args;
use serde::Serialize;

use svj_jobs::cmssw::Cmssw;
use svj_jobs::jobs;

use super::{expand_path, CmdResult};

#[derive(Args)]
pub struct TreemakerArgs {
    /// Path to the CMSSW release directory (with TreeMaker checked out)
    #[arg(long)]
    pub cmssw: String,

    /// MiniAOD rootfile to ntuplize
    #[arg(long)]
    pub rootfile: String,

    #[arg(long, default_value_t = 2018)]
    pub year: i32,

    #[arg(long = "outfile-tag", default_value = "out")]
    pub outfile_tag: String,
}

#[derive(Serialize)]
pub struct TreemakerOutput {
    pub outfile: String,
    pub exists: bool,
}

pub fn run(args: TreemakerArgs) -> CmdResult<TreemakerOutput> {
    let cmssw = Cmssw::new(expand_path(&args.cmssw));
    let outfile = jobs::run_treemaker(&cmssw, &args.rootfile, args.year, &args.outfile_tag)?;
    Ok(TreemakerOutput {
        exists: outfile.is_file(),
        outfile: outfile.to_string_lossy().to_string(),
    })
}

use clap::Args;
use serde::Serialize;

use svj_jobs::cmssw::Cmssw;
use svj_jobs::jobs::{self, StepOptions};
use svj_jobs::storage::XrootdStorage;

use super::{expand_path, CmdResult, PhysicsArgs};

#[derive(Args)]
pub struct RunStepArgs {
    /// Path to the CMSSW release directory
    #[arg(long)]
    pub cmssw: String,

    /// Step tag to run (e.g. step_LHE-GEN, step_SIM)
    #[arg(long)]
    pub step: String,

    /// Rootfile to stage as the step input (local path or root:// reference)
    #[arg(long = "input-rootfile")]
    pub input_rootfile: Option<String>,

    /// Copy a local input rootfile into place instead of moving it
    #[arg(long)]
    pub copy: bool,

    /// Step tag of the input file (defaults to the INPRE placeholder)
    #[arg(long = "input-prefix")]
    pub input_prefix: Option<String>,

    /// Keep the staged input even after the step succeeds
    #[arg(long = "keep-input")]
    pub keep_input: bool,

    #[command(flatten)]
    pub physics: PhysicsArgs,
}

#[derive(Serialize)]
pub struct RunStepOutput {
    pub step: String,
    pub outfile: String,
    pub exists: bool,
}

pub fn run(args: RunStepArgs) -> CmdResult<RunStepOutput> {
    let physics = args.physics.to_physics()?;
    let cmssw = Cmssw::new(expand_path(&args.cmssw));
    let opts = StepOptions {
        input_rootfile: args.input_rootfile,
        move_input: !args.copy,
        input_prefix: args.input_prefix,
        delete_input: !args.keep_input,
    };
    let outfile = jobs::run_step(&cmssw, &XrootdStorage, &args.step, &physics, &opts)?;
    Ok(RunStepOutput {
        step: args.step,
        exists: outfile.is_file(),
        outfile: outfile.to_string_lossy().to_string(),
    })
}

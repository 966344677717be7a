use clap::Args;
use serde::Serialize;

use super::{CmdResult, PhysicsArgs};

#[derive(Args)]
pub struct FilenameArgs {
    /// Step tag (e.g. step_LHE-GEN, step_SIM)
    pub step: String,

    /// File extension
    #[arg(long, default_value = ".root")]
    pub ext: String,

    #[command(flatten)]
    pub physics: PhysicsArgs,
}

#[derive(Serialize)]
pub struct FilenameOutput {
    pub step: String,
    pub filename: String,
}

pub fn run(args: FilenameArgs) -> CmdResult<FilenameOutput> {
    let physics = args.physics.to_physics()?;
    let filename = physics.filename_with_ext(&args.step, &args.ext)?;
    Ok(FilenameOutput {
        step: args.step,
        filename,
    })
}

#[derive(Args)]
pub struct GridpackFilenameArgs {
    #[command(flatten)]
    pub physics: PhysicsArgs,
}

#[derive(Serialize)]
pub struct GridpackFilenameOutput {
    pub filename: String,
}

pub fn run_gridpack(args: GridpackFilenameArgs) -> CmdResult<GridpackFilenameOutput> {
    let physics = args.physics.to_physics()?;
    Ok(GridpackFilenameOutput {
        filename: physics.gridpack_filename()?,
    })
}

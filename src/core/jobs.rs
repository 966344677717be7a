//! The sequential production pipeline driver.
//!
//! Each invocation runs one step of the SVJProductions chain: stage the
//! expected input rootfile into the release working area, build the
//! `cmsRun runSVJ.py` command for the step, dispatch it to the release
//! environment, and hand back the expected output path. Steps never retry;
//! any hard failure propagates to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cmssw::Environment;
use crate::error::{Error, Result};
use crate::log_status;
use crate::physics::Physics;
use crate::storage::{has_protocol, StorageElement};

pub const PRODUCTION_TEST_DIR: &str = "SVJ/Production/test";
pub const TREEMAKER_TEST_DIR: &str = "TreeMaker/Production/test";

/// Step tag of the gridpack artifact, exempt from the input-presence check.
pub const GRIDPACK_STEP: &str = "step0_GRIDPACK";

/// Default placeholder tag for the expected input filename.
pub const INPUT_PREFIX: &str = "INPRE";

pub const DEFAULT_TARBALL_SEARCH_PATH: &str =
    "root://cmseos.fnal.gov//store/user/lpcdarkqcd/boosted/mgtarballs/2023MADPT";

#[derive(Debug, Clone)]
pub struct StepOptions {
    /// External rootfile to stage as the step input (local path or
    /// protocol-qualified storage reference).
    pub input_rootfile: Option<String>,
    /// Move rather than copy a local `input_rootfile` into place.
    pub move_input: bool,
    /// Step tag of the input file; defaults to [`INPUT_PREFIX`].
    pub input_prefix: Option<String>,
    /// Consider the staged input for deletion once the output exists.
    pub delete_input: bool,
}

impl Default for StepOptions {
    fn default() -> Self {
        StepOptions {
            input_rootfile: None,
            move_input: true,
            input_prefix: None,
            delete_input: true,
        }
    }
}

/// Run one step of the SVJProductions chain.
///
/// Returns the *expected* output path; the caller owns the existence
/// assertion (batch scripts defer it until after stage-out).
pub fn run_step(
    env: &dyn Environment,
    storage: &dyn StorageElement,
    step: &str,
    physics: &Physics,
    opts: &StepOptions,
) -> Result<PathBuf> {
    let input_prefix = opts.input_prefix.as_deref().unwrap_or(INPUT_PREFIX);
    let workdir = env.src().join(PRODUCTION_TEST_DIR);
    let input_path = workdir.join(physics.filename(input_prefix)?);

    if let Some(ref input_rootfile) = opts.input_rootfile {
        if !input_path.is_file() {
            log_status!(
                "step",
                "Staging input {} -> {}",
                input_rootfile,
                input_path.display()
            );
            stage_input(storage, input_rootfile, &input_path, opts.move_input)?;
        } else {
            log_status!(
                "step",
                "Would stage {} -> {}, but the target already exists \
                 (this is probably a debug session)",
                input_rootfile,
                input_path.display()
            );
        }
    }

    if step != GRIDPACK_STEP && input_prefix != GRIDPACK_STEP && !input_path.is_file() {
        return Err(Error::MissingInput {
            path: input_path.to_string_lossy().to_string(),
        });
    }

    let command = build_step_command(step, input_prefix, physics)?;
    env.run(&[format!("cd {}", PRODUCTION_TEST_DIR), command])?;

    let output_path = workdir.join(physics.filename(step)?);
    if output_path.is_file() && opts.delete_input && step != GRIDPACK_STEP {
        log_status!(
            "step",
            "Step succeeded; input rootfile {} is a deletion candidate",
            input_path.display()
        );
    }
    log_status!("step", "Outfile of step: {}", output_path.display());
    Ok(output_path)
}

/// The `cmsRun runSVJ.py` invocation for one step.
fn build_step_command(step: &str, input_prefix: &str, physics: &Physics) -> Result<String> {
    let mut command = format!(
        "cmsRun runSVJ.py year={year} madgraph=1 channel=s \
         outpre={step} config={step}",
        year = physics.year,
        step = step,
    );
    // Only claim a part the filename encodes
    if let Some(part) = physics.part.filter(|&p| p != 0) {
        command.push_str(&format!(" part={}", part));
    }
    command.push_str(&format!(
        " mMediator={mediator_mass:.0} mDark={dark_meson_mass:.0} \
         rinv={invisible_fraction} inpre={input_prefix}",
        mediator_mass = physics.mediator_mass,
        dark_meson_mass = physics.dark_meson_mass,
        invisible_fraction = physics.invisible_fraction_str(),
        input_prefix = input_prefix,
    ));
    if physics.max_events_in.is_some() || input_prefix == GRIDPACK_STEP {
        command.push_str(&format!(" maxEventsIn={}", physics.max_events_in.unwrap_or(10000)));
    }
    if let Some(pt) = physics.min_genjet_pt {
        command.push_str(&format!(" mingenjetpt={:.1}", pt));
    }
    command.push_str(&format!(" boost={:.0}", physics.boost));
    if let Some(ref variable) = physics.boost_variable {
        command.push_str(&format!(" boostvar={}", variable));
    }
    if let Some(n) = physics.max_events {
        command.push_str(&format!(" maxEvents={}", n));
    }
    Ok(command)
}

fn stage_input(
    storage: &dyn StorageElement,
    input_rootfile: &str,
    input_path: &Path,
    move_input: bool,
) -> Result<()> {
    if has_protocol(input_rootfile) {
        return storage.copy(input_rootfile, &input_path.to_string_lossy());
    }
    if let Some(parent) = input_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if move_input {
        // rename fails across filesystems; fall back to copy + remove
        if fs::rename(input_rootfile, input_path).is_err() {
            fs::copy(input_rootfile, input_path)?;
            fs::remove_file(input_rootfile)?;
        }
    } else {
        fs::copy(input_rootfile, input_path)?;
    }
    Ok(())
}

/// Run TreeMaker ntuplization over a (Mini)AOD rootfile.
pub fn run_treemaker(
    env: &dyn Environment,
    rootfile: &str,
    year: i32,
    outfile_tag: &str,
) -> Result<PathBuf> {
    let scenario = match year {
        2018 => "Summer20UL18sig",
        other => {
            return Err(Error::Config(format!(
                "No TreeMaker scenario known for year {}",
                other
            )))
        }
    };
    let dataset = if has_protocol(rootfile) || rootfile.starts_with("file:") {
        rootfile.to_string()
    } else {
        format!("file:{}", rootfile)
    };
    let command = format!(
        "_CONDOR_CHIRP_CONFIG=\"\" cmsRun runMakeTreeFromMiniAOD_cfg.py \
         numevents=-1 outfile={outfile_tag} scenario={scenario} \
         lostlepton=0 doZinv=0 systematics=0 deepAK8=0 deepDoubleB=0 \
         doPDFs=0 nestedVectors=False debugjets=0 splitLevel=99 \
         boostedsemivisible=1 dataset={dataset}",
        outfile_tag = outfile_tag,
        scenario = scenario,
        dataset = dataset,
    );
    env.run(&[format!("cd {}", TREEMAKER_TEST_DIR), command])?;

    let expected = env
        .src()
        .join(TREEMAKER_TEST_DIR)
        .join("out_RA2AnalysisTree.root");
    if !expected.is_file() {
        log_status!(
            "treemaker",
            "TreeMaker finished but expected outfile {} does not exist!",
            expected.display()
        );
    }
    Ok(expected)
}

/// Fetch the madgraph gridpack tarball into the release working area.
///
/// The tarball content does not depend on boost or the event count, but the
/// naming convention still encodes both; it never encodes `part`.
pub fn download_madgraph_tarball(
    env: &dyn Environment,
    storage: &dyn StorageElement,
    physics: &Physics,
    search_path: Option<&str>,
) -> Result<PathBuf> {
    let search_path = search_path.unwrap_or(DEFAULT_TARBALL_SEARCH_PATH);
    let tarball = physics.gridpack_filename()?;
    let dst = env.src().join(PRODUCTION_TEST_DIR).join(&tarball);
    if dst.is_file() {
        log_status!("download", "File {} already exists", dst.display());
        return Ok(dst);
    }
    let src = format!("{}/{}", search_path, tarball);
    if !storage.exists(&src)? {
        return Err(Error::MissingRemoteFile { path: src });
    }
    log_status!("download", "Downloading {} -> {}", src, dst.display());
    storage.copy(&src, &dst.to_string_lossy())?;
    Ok(dst)
}

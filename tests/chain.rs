//! Full production chain against mock collaborators: fetch the gridpack,
//! run the LHE-GEN step off it, then feed its output into the SIM step.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use svj_jobs::cmssw::Environment;
use svj_jobs::jobs::{
    self, StepOptions, DEFAULT_TARBALL_SEARCH_PATH, GRIDPACK_STEP, PRODUCTION_TEST_DIR,
};
use svj_jobs::physics::Physics;
use svj_jobs::storage::{has_protocol, StorageElement};
use svj_jobs::Result;

/// Fake release that "produces" the expected output file of each dispatched
/// step, the way cmsRun would.
struct FakeCmssw {
    src: PathBuf,
    physics: Physics,
    dispatched: RefCell<Vec<String>>,
}

impl FakeCmssw {
    fn new(root: &Path, physics: Physics) -> Self {
        let src = root.join("CMSSW_10_6_29_patch1/src");
        fs::create_dir_all(src.join(PRODUCTION_TEST_DIR)).unwrap();
        FakeCmssw {
            src,
            physics,
            dispatched: RefCell::new(Vec::new()),
        }
    }
}

impl Environment for FakeCmssw {
    fn src(&self) -> PathBuf {
        self.src.clone()
    }

    fn run(&self, commands: &[String]) -> Result<()> {
        let command = commands.join(" && ");
        if let Some(step) = command
            .split_whitespace()
            .find_map(|arg| arg.strip_prefix("outpre="))
        {
            let outfile = self
                .src
                .join(PRODUCTION_TEST_DIR)
                .join(self.physics.filename(step)?);
            fs::write(outfile, b"simulated events").unwrap();
        }
        self.dispatched.borrow_mut().push(command);
        Ok(())
    }
}

/// Storage element holding exactly the expected gridpack tarball.
struct FakeStorage {
    remote_tarball: String,
}

impl StorageElement for FakeStorage {
    fn exists(&self, path: &str) -> Result<bool> {
        Ok(path == self.remote_tarball)
    }

    fn copy(&self, src: &str, dst: &str) -> Result<()> {
        assert_eq!(src, self.remote_tarball);
        assert!(!has_protocol(dst));
        fs::write(dst, b"gridpack").unwrap();
        Ok(())
    }
}

fn physics() -> Physics {
    Physics {
        year: 2018,
        mediator_mass: 250.0,
        dark_meson_mass: 10.0,
        invisible_fraction: 0.3,
        boost: 0.0,
        max_events: Some(5),
        part: Some(1),
        ..Physics::default()
    }
}

#[test]
fn download_tarball() {
    let workdir = tempfile::tempdir().unwrap();
    let physics = physics();
    let cmssw = FakeCmssw::new(workdir.path(), physics.clone());
    let storage = FakeStorage {
        remote_tarball: format!(
            "{}/{}",
            DEFAULT_TARBALL_SEARCH_PATH,
            physics.gridpack_filename().unwrap()
        ),
    };

    let dst = jobs::download_madgraph_tarball(&cmssw, &storage, &physics, None).unwrap();
    assert!(dst.is_file());
}

#[test]
fn chain() {
    let workdir = tempfile::tempdir().unwrap();
    let physics = physics();
    let cmssw = FakeCmssw::new(workdir.path(), physics.clone());
    let storage = FakeStorage {
        remote_tarball: format!(
            "{}/{}",
            DEFAULT_TARBALL_SEARCH_PATH,
            physics.gridpack_filename().unwrap()
        ),
    };

    let mgtarball = jobs::download_madgraph_tarball(&cmssw, &storage, &physics, None).unwrap();
    assert!(mgtarball.is_file());

    let opts = StepOptions {
        input_prefix: Some(GRIDPACK_STEP.to_string()),
        ..StepOptions::default()
    };
    let rootfile = jobs::run_step(&cmssw, &storage, "step_LHE-GEN", &physics, &opts).unwrap();
    assert!(rootfile.is_file());

    let opts = StepOptions {
        input_rootfile: Some(rootfile.to_string_lossy().to_string()),
        ..StepOptions::default()
    };
    let rootfile = jobs::run_step(&cmssw, &storage, "step_SIM", &physics, &opts).unwrap();
    assert!(rootfile.is_file());

    assert_eq!(cmssw.dispatched.borrow().len(), 2);
}

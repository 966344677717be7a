//! Handle to an extracted CMSSW release.
//!
//! A `Cmssw` wraps a release directory on disk and knows how to run shell
//! commands inside its runtime environment. `from_tarball` materializes a
//! fresh release from a remote archive.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::exec::execute_local_command;
use crate::shell;
use crate::storage::{self, StorageElement, XrootdStorage};
use crate::log_status;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seam between the pipeline driver and the external release, so tests can
/// substitute a recording mock for actual cmsRun dispatch.
pub trait Environment {
    /// Path to the release source tree (`<release>/src`).
    fn src(&self) -> PathBuf;

    /// Run the commands in sequence inside the release environment.
    /// Fails on the first non-zero exit.
    fn run(&self, commands: &[String]) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Cmssw {
    pub path: PathBuf,
}

impl Cmssw {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Cmssw { path: path.into() }
    }

    /// Download (or copy) a release archive and extract it under `dest_dir`.
    pub fn from_tarball(url: &str, dest_dir: &Path) -> Result<Cmssw> {
        let archive_name = archive_basename(url)?;
        let release = release_dir_name(&archive_name)?;
        fs::create_dir_all(dest_dir)?;
        let archive_path = dest_dir.join(&archive_name);

        if !archive_path.is_file() {
            log_status!("cmssw", "Fetching {} -> {}", url, archive_path.display());
            fetch_archive(url, &archive_path)?;
        }

        log_status!("cmssw", "Extracting {}", archive_path.display());
        let extract_cmd = format!(
            "tar -xf {} -C {}",
            shell::quote_path(&archive_path.to_string_lossy()),
            shell::quote_path(&dest_dir.to_string_lossy()),
        );
        let out = execute_local_command(&extract_cmd);
        if !out.success {
            return Err(Error::CommandFailed {
                command: extract_cmd,
                exit_code: out.exit_code,
                stderr: out.stderr,
            });
        }

        Ok(Cmssw::new(dest_dir.join(release)))
    }
}

impl Environment for Cmssw {
    fn src(&self) -> PathBuf {
        self.path.join("src")
    }

    fn run(&self, commands: &[String]) -> Result<()> {
        let command = build_run_command(&self.src(), commands);
        let out = execute_local_command(&command);
        if !out.success {
            return Err(Error::CommandFailed {
                command,
                exit_code: out.exit_code,
                stderr: out.stderr,
            });
        }
        Ok(())
    }
}

/// Full shell line for running `commands` inside the release runtime.
fn build_run_command(src: &Path, commands: &[String]) -> String {
    let mut parts = vec![
        format!("cd {}", shell::quote_path(&src.to_string_lossy())),
        "eval $(scramv1 runtime -sh)".to_string(),
    ];
    parts.extend(commands.iter().cloned());
    parts.join(" && ")
}

fn archive_basename(url: &str) -> Result<String> {
    url.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| Error::Config(format!("Cannot derive archive name from '{}'", url)))
}

/// Release directory name encoded in the archive name
/// (`CMSSW_10_6_29_patch1.tar.xz` extracts to `CMSSW_10_6_29_patch1/`).
fn release_dir_name(archive_name: &str) -> Result<String> {
    for suffix in [".tar.xz", ".tar.gz", ".tar.bz2", ".tgz", ".tar"] {
        if let Some(stem) = archive_name.strip_suffix(suffix) {
            return Ok(stem.to_string());
        }
    }
    Err(Error::Config(format!(
        "Archive '{}' is not a recognized tarball",
        archive_name
    )))
}

fn fetch_archive(url: &str, dest: &Path) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        let client = reqwest::blocking::Client::builder()
            .user_agent(format!("svj-jobs/{}", VERSION))
            .timeout(std::time::Duration::from_secs(600))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        let bytes = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Http(e.to_string()))?
            .bytes()
            .map_err(|e| Error::Http(e.to_string()))?;
        fs::write(dest, &bytes)?;
    } else if storage::has_protocol(url) {
        XrootdStorage.copy(url, &dest.to_string_lossy())?;
    } else {
        fs::copy(url, dest)?;
    }
    Ok(())
}

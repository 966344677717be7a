//! Storage-element access.
//!
//! Paths are either plain local paths or protocol-qualified XRootD
//! references (`root://<mgm>//store/...`). The production implementation
//! shells out to the `xrdfs`/`xrdcp` client tools; the trait exists so the
//! pipeline driver can be exercised against an in-memory mock.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::exec::execute_local_command;
use crate::shell;

/// True iff the path carries a remote-storage scheme (`root://...`).
pub fn has_protocol(path: &str) -> bool {
    path.contains("://")
}

pub trait StorageElement {
    fn exists(&self, path: &str) -> Result<bool>;
    fn copy(&self, src: &str, dst: &str) -> Result<()>;
}

/// Storage element backed by the XRootD command-line tools, with plain
/// filesystem fallback for unqualified paths.
pub struct XrootdStorage;

impl StorageElement for XrootdStorage {
    fn exists(&self, path: &str) -> Result<bool> {
        if !has_protocol(path) {
            return Ok(Path::new(path).is_file());
        }
        let (mgm, remote_path) = split_mgm(path)?;
        let command = format!(
            "xrdfs {} stat {}",
            shell::quote_arg(&mgm),
            shell::quote_path(&remote_path),
        );
        // xrdfs stat exits non-zero for missing files
        Ok(execute_local_command(&command).success)
    }

    fn copy(&self, src: &str, dst: &str) -> Result<()> {
        if !has_protocol(src) && !has_protocol(dst) {
            if let Some(parent) = Path::new(dst).parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(src, dst)?;
            return Ok(());
        }
        let command = format!(
            "xrdcp -f {} {}",
            shell::quote_path(src),
            shell::quote_path(dst),
        );
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

/// Split a protocol-qualified path into the redirector and the storage path:
/// `root://cmseos.fnal.gov//store/x` -> (`root://cmseos.fnal.gov`, `/store/x`).
fn split_mgm(path: &str) -> Result<(String, String)> {
    let rest = path
        .strip_prefix("root://")
        .ok_or_else(|| Error::Config(format!("Not an XRootD path: '{}'", path)))?;
    let (host, remote) = rest
        .split_once("//")
        .ok_or_else(|| Error::Config(format!("No storage path in '{}'", path)))?;
    Ok((format!("root://{}", host), format!("/{}", remote)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_detection() {
        assert!(has_protocol("root://cmseos.fnal.gov//store/user/x.root"));
        assert!(!has_protocol("/tmp/x.root"));
        assert!(!has_protocol("file:/tmp/x.root"));
    }

    #[test]
    fn mgm_split() {
        let (mgm, path) = split_mgm("root://cmseos.fnal.gov//store/user/x.root").unwrap();
        assert_eq!(mgm, "root://cmseos.fnal.gov");
        assert_eq!(path, "/store/user/x.root");
        assert!(split_mgm("/tmp/x.root").is_err());
    }

    #[test]
    fn local_exists_and_copy() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.root");
        let dst = dir.path().join("staged/out.root");
        fs::write(&src, b"data").unwrap();

        let storage = XrootdStorage;
        assert!(storage.exists(src.to_str().unwrap()).unwrap());
        assert!(!storage.exists(dst.to_str().unwrap()).unwrap());

        storage
            .copy(src.to_str().unwrap(), dst.to_str().unwrap())
            .unwrap();
        assert!(dst.is_file());
    }
}

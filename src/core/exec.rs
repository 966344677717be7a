//! Local shell command execution.

use std::process::Command;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub exit_code: i32,
}

pub fn execute_local_command(command: &str) -> CommandOutput {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);

    match cmd.output() {
        Ok(out) => CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            success: out.status.success(),
            exit_code: out.status.code().unwrap_or(-1),
        },
        Err(e) => CommandOutput {
            stdout: String::new(),
            stderr: format!("Command error: {}", e),
            success: false,
            exit_code: -1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let out = execute_local_command("echo hello");
        assert!(out.success);
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn reports_nonzero_exit() {
        let out = execute_local_command("exit 3");
        assert!(!out.success);
        assert_eq!(out.exit_code, 3);
    }

    #[test]
    fn captures_stderr() {
        let out = execute_local_command("echo oops >&2; exit 1");
        assert!(!out.success);
        assert_eq!(out.stderr.trim(), "oops");
    }
}

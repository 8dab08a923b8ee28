use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{PlynkError, Result};

/// Captured streams and exit status of one finished external process.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Exit code, or `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Narrow seam around process spawning so tests can substitute scripted
/// outputs without real binaries.
pub trait ProcessRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput>;
}

/// Spawns the program directly, capturing both streams in full and
/// blocking until it exits. No timeout: a hung tool blocks the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput> {
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| PlynkError::Launch {
                source: e,
                program: program.to_path_buf(),
            })?;

        Ok(RunOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

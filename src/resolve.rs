use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{PlynkError, Result};
use crate::runner::ProcessRunner;

/// The two plink release lines. Their flag vocabularies overlap but are
/// not interchangeable, so the line is part of the resolved handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VersionLine {
    V1_9,
    #[default]
    V2_0,
}

impl VersionLine {
    /// Default executable name on the search path.
    pub fn binary_name(self) -> &'static str {
        match self {
            VersionLine::V1_9 => "plink",
            VersionLine::V2_0 => "plink2",
        }
    }

    /// Substring the probed version text must contain.
    pub fn version_tag(self) -> &'static str {
        match self {
            VersionLine::V1_9 => "1.9",
            VersionLine::V2_0 => "2.0",
        }
    }

    /// Parses a caller-facing alias ("1", "1.9", "2", "2.0").
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1" | "1.9" => Some(VersionLine::V1_9),
            "2" | "2.0" => Some(VersionLine::V2_0),
            _ => None,
        }
    }
}

impl fmt::Display for VersionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version_tag())
    }
}

/// A resolved plink executable. Only the resolver constructs these, and
/// only after version validation (except for explicit caller paths,
/// which carry no version tag).
#[derive(Debug, Clone)]
pub struct BinaryHandle {
    path: PathBuf,
    version: Option<VersionLine>,
}

impl BinaryHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> Option<VersionLine> {
        self.version
    }
}

/// The process search path, split into candidate directories.
pub fn default_search_path() -> Vec<PathBuf> {
    match env::var_os("PATH") {
        Some(paths) => env::split_paths(&paths).collect(),
        None => Vec::new(),
    }
}

fn find_in(name: &str, search_path: &[PathBuf]) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Resolves a version alias or a literal filesystem path to a runnable
/// binary. Aliases are probed and validated; explicit paths are returned
/// unchecked so callers can point at custom builds.
pub fn resolve(
    token: &str,
    search_path: &[PathBuf],
    runner: &dyn ProcessRunner,
) -> Result<BinaryHandle> {
    if let Some(line) = VersionLine::from_token(token) {
        return resolve_line(line, search_path, runner);
    }

    let path = PathBuf::from(token);
    if path.exists() {
        Ok(BinaryHandle {
            path,
            version: None,
        })
    } else {
        Err(PlynkError::NoSuchPath { path })
    }
}

/// Finds the default binary for a release line and checks its reported
/// version. A 1.x binary that is not 1.9 still resolves (with a warning,
/// since some flags may be missing); a plink2 that does not report 2.0
/// is rejected outright.
pub fn resolve_line(
    line: VersionLine,
    search_path: &[PathBuf],
    runner: &dyn ProcessRunner,
) -> Result<BinaryHandle> {
    let name = line.binary_name();
    let path = find_in(name, search_path).ok_or_else(|| PlynkError::BinaryNotFound {
        name: name.to_string(),
    })?;

    let reported = probe_version(&path, runner)?;
    if !reported.contains(line.version_tag()) {
        match line {
            VersionLine::V1_9 => {
                warn!("plink 1.x is installed, but not version 1.9; some functionality may be missing");
            }
            VersionLine::V2_0 => {
                return Err(PlynkError::VersionMismatch {
                    name: name.to_string(),
                    expected: line.version_tag(),
                    reported: reported.lines().next().unwrap_or_default().to_string(),
                });
            }
        }
    }

    Ok(BinaryHandle {
        path,
        version: Some(line),
    })
}

/// Runs the candidate with `--version` and returns its decoded output.
fn probe_version(path: &Path, runner: &dyn ProcessRunner) -> Result<String> {
    let output = runner.run(path, &["--version".to_string()])?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunOutput;
    use std::cell::RefCell;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

    /// Returns scripted version text and records every probe it serves.
    struct FakeRunner {
        version_text: &'static str,
        calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    }

    impl FakeRunner {
        fn reporting(version_text: &'static str) -> Self {
            Self {
                version_text,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn n_calls(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_path_buf(), args.to_vec()));
            Ok(RunOutput {
                status: Some(0),
                stdout: self.version_text.as_bytes().to_vec(),
                stderr: Vec::new(),
            })
        }
    }

    fn bin_dir(names: &[&str]) -> PathBuf {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir()
            .join("plynk-resolve-tests")
            .join(format!("{}-{}", std::process::id(), id));
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"#!/bin/sh\n").unwrap();
        }
        dir
    }

    #[test]
    fn missing_binary_is_not_found() {
        let dir = bin_dir(&[]);
        let runner = FakeRunner::reporting("");
        let err = resolve_line(VersionLine::V2_0, &[dir], &runner).unwrap_err();
        match err {
            PlynkError::BinaryNotFound { name } => assert_eq!(name, "plink2"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(runner.n_calls(), 0);
    }

    #[test]
    fn matching_v2_resolves_with_version_tag() {
        let dir = bin_dir(&["plink2"]);
        let runner = FakeRunner::reporting("PLINK v2.0.0-a.6.9LM 64-bit (2 Oct 2024)");
        let handle = resolve_line(VersionLine::V2_0, &[dir.clone()], &runner).unwrap();
        assert_eq!(handle.path(), dir.join("plink2"));
        assert_eq!(handle.version(), Some(VersionLine::V2_0));
        assert_eq!(runner.n_calls(), 1);
    }

    #[test]
    fn v2_version_mismatch_is_fatal() {
        let dir = bin_dir(&["plink2"]);
        let runner = FakeRunner::reporting("PLINK v1.90b7 64-bit (16 Jan 2023)");
        let err = resolve_line(VersionLine::V2_0, &[dir], &runner).unwrap_err();
        match err {
            PlynkError::VersionMismatch {
                name,
                expected,
                reported,
            } => {
                assert_eq!(name, "plink2");
                assert_eq!(expected, "2.0");
                assert_eq!(reported, "PLINK v1.90b7 64-bit (16 Jan 2023)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn v1_version_mismatch_resolves_anyway() {
        let dir = bin_dir(&["plink"]);
        let runner = FakeRunner::reporting("PLINK v1.07 64-bit");
        let handle = resolve_line(VersionLine::V1_9, &[dir], &runner).unwrap();
        assert_eq!(handle.version(), Some(VersionLine::V1_9));
    }

    #[test]
    fn alias_tokens_map_to_lines() {
        assert_eq!(VersionLine::from_token("1"), Some(VersionLine::V1_9));
        assert_eq!(VersionLine::from_token("1.9"), Some(VersionLine::V1_9));
        assert_eq!(VersionLine::from_token("2"), Some(VersionLine::V2_0));
        assert_eq!(VersionLine::from_token("2.0"), Some(VersionLine::V2_0));
        assert_eq!(VersionLine::from_token("3"), None);
    }

    #[test]
    fn explicit_path_skips_the_version_probe() {
        let dir = bin_dir(&["my-plink"]);
        let path = dir.join("my-plink");
        let runner = FakeRunner::reporting("irrelevant");
        let handle = resolve(path.to_str().unwrap(), &[], &runner).unwrap();
        assert_eq!(handle.path(), path);
        assert_eq!(handle.version(), None);
        assert_eq!(runner.n_calls(), 0);
    }

    #[test]
    fn missing_explicit_path_is_not_found() {
        let runner = FakeRunner::reporting("");
        let err = resolve("/nonexistent/plink-build", &[], &runner).unwrap_err();
        match err {
            PlynkError::NoSuchPath { path } => {
                assert_eq!(path, PathBuf::from("/nonexistent/plink-build"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

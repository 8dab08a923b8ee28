use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{info, warn};

use crate::command::{self, Invocation, OptValue, PlinkArgs, posix, resolve_out};
use crate::error::{PlynkError, Result};
use crate::resolve::{self, BinaryHandle, VersionLine};
use crate::runner::{ProcessRunner, SystemRunner};

/// Captured result of one plink run: raw stdout plus the resolved
/// parameter mapping that produced the call.
#[derive(Debug, Clone)]
pub struct InspectionView {
    stdout: Vec<u8>,
    params: PlinkArgs,
}

impl InspectionView {
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn params(&self) -> &PlinkArgs {
        &self.params
    }
}

/// One plink run: the input file-set prefix, the output name, the release
/// line to invoke, and the free-form keyword options.
#[derive(Debug, Clone, Default)]
pub struct RunSpec {
    bfile: Option<PathBuf>,
    out: Option<String>,
    version: VersionLine,
    options: PlinkArgs,
}

impl RunSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input file-set prefix, emitted as `--bfile`.
    pub fn bfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.bfile = Some(path.into());
        self
    }

    /// Output name, emitted as `--out` (resolved against the session's
    /// working directory when one is configured).
    pub fn out(mut self, name: impl Into<String>) -> Self {
        self.out = Some(name.into());
        self
    }

    pub fn version(mut self, line: VersionLine) -> Self {
        self.version = line;
        self
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<OptValue>) -> Self {
        self.options = self.options.set(name, value);
        self
    }

    pub fn switch(mut self, name: impl Into<String>) -> Self {
        self.options = self.options.switch(name);
        self
    }

    pub fn list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.list(name, values);
        self
    }

    /// Replaces the whole option mapping at once.
    pub fn options(mut self, options: PlinkArgs) -> Self {
        self.options = options;
        self
    }
}

/// Entrypoint to plink. Holds the working directory and the binaries
/// resolved at construction; safe to reuse across sequential runs.
#[derive(Debug)]
pub struct Plink<R = SystemRunner> {
    workdir: Option<PathBuf>,
    plink1: Option<BinaryHandle>,
    plink2: BinaryHandle,
    runner: R,
}

impl Plink<SystemRunner> {
    /// Resolves plink binaries from the process search path. `workdir` is
    /// where plink should run; `None` means the current directory.
    pub fn new(workdir: Option<impl AsRef<Path>>) -> Result<Self> {
        let search_path = resolve::default_search_path();
        Self::with_runner(workdir, &search_path, SystemRunner)
    }
}

impl<R: ProcessRunner> Plink<R> {
    /// Construction seam with an explicit search path and process runner,
    /// so tests and embedders can avoid touching the real environment.
    ///
    /// plink2 is required. The 1.9 binary is optional: its absence is
    /// logged and v2-only sessions still construct.
    pub fn with_runner(
        workdir: Option<impl AsRef<Path>>,
        search_path: &[PathBuf],
        runner: R,
    ) -> Result<Self> {
        let workdir = match workdir {
            Some(dir) => {
                let dir = dir.as_ref().to_path_buf();
                if !dir.exists() {
                    return Err(PlynkError::NoSuchWorkdir { path: dir });
                }
                Some(dir)
            }
            None => None,
        };

        let plink2 = resolve::resolve_line(VersionLine::V2_0, search_path, &runner)?;
        let plink1 = match resolve::resolve_line(VersionLine::V1_9, search_path, &runner) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("plink 1.9 unavailable: {e}");
                None
            }
        };

        Ok(Self {
            workdir,
            plink1,
            plink2,
            runner,
        })
    }

    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    pub fn binary(&self, line: VersionLine) -> Option<&BinaryHandle> {
        match line {
            VersionLine::V1_9 => self.plink1.as_ref(),
            VersionLine::V2_0 => Some(&self.plink2),
        }
    }

    /// Runs a plink command with the parameters passed, blocking until the
    /// tool exits.
    pub fn run(&self, spec: RunSpec) -> Result<InspectionView> {
        let binary = self
            .binary(spec.version)
            .ok_or_else(|| PlynkError::VersionUnavailable {
                line: spec.version.to_string(),
            })?;

        let invocation = command::build(
            binary.path(),
            spec.bfile.as_deref(),
            spec.out.as_deref(),
            self.workdir.as_deref(),
            &spec.options,
        );

        // Fold bfile/out into the mapping reported back to the caller, with
        // out in its resolved form.
        let mut params = spec.options.clone();
        if let Some(bfile) = &spec.bfile {
            params.insert("bfile", OptValue::Scalar(posix(bfile)));
        }
        if let Some(out) = &spec.out {
            params.insert(
                "out",
                OptValue::Scalar(resolve_out(self.workdir.as_deref(), out)),
            );
        }

        invoke(&self.runner, &invocation, params)
    }
}

impl<R> fmt::Display for Plink<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.workdir {
            Some(dir) => write!(f, "Plink(workdir={})", posix(dir)),
            None => write!(f, "Plink(workdir=None)"),
        }
    }
}

/// Executes a built command as a single complete-or-fail step. A nonzero
/// exit surfaces the tool's stderr verbatim; there is no retry.
pub fn invoke(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
    params: PlinkArgs,
) -> Result<InspectionView> {
    info!("running: {}", invocation.tokens().iter().join(" "));

    let output = runner.run(Path::new(invocation.program()), invocation.args())?;
    if !output.success() {
        return Err(PlynkError::ToolFailed {
            stderr: output.stderr_text(),
        });
    }

    Ok(InspectionView {
        stdout: output.stdout,
        params,
    })
}

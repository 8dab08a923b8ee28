use std::path::Path;

use indexmap::IndexMap;

/// A keyword option value. The tag decides how the flag is emitted, so
/// callers never rely on runtime type sniffing.
#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    /// `true` emits a bare `--flag`; `false` emits nothing.
    Switch(bool),
    /// Emits `--flag <value>`.
    Scalar(String),
    /// Emits `--flag` followed by each element as its own token.
    List(Vec<String>),
}

impl From<bool> for OptValue {
    fn from(value: bool) -> Self {
        OptValue::Switch(value)
    }
}

impl From<&str> for OptValue {
    fn from(value: &str) -> Self {
        OptValue::Scalar(value.to_string())
    }
}

impl From<String> for OptValue {
    fn from(value: String) -> Self {
        OptValue::Scalar(value)
    }
}

/// Free-form plink options, ordered. Insertion order is the order flags
/// reach the command line; some plink flags are order sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlinkArgs {
    opts: IndexMap<String, OptValue>,
}

impl PlinkArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an option, keeping insertion order.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<OptValue>) -> Self {
        self.opts.insert(name.into(), value.into());
        self
    }

    /// Shorthand for an enabled boolean flag.
    pub fn switch(self, name: impl Into<String>) -> Self {
        self.set(name, OptValue::Switch(true))
    }

    pub fn list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.opts.insert(name.into(), OptValue::List(values));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: OptValue) {
        self.opts.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&OptValue> {
        self.opts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptValue)> {
        self.opts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.opts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opts.is_empty()
    }
}

/// A fully built command line. The first token is always the binary path.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    tokens: Vec<String>,
}

impl Invocation {
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Renders a path in forward-slash form, matching what plink itself
/// accepts on every platform.
pub(crate) fn posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Joins `out` against the working directory when one is configured;
/// otherwise the name passes through untouched. The asymmetry is part of
/// the contract, not an oversight.
pub(crate) fn resolve_out(workdir: Option<&Path>, out: &str) -> String {
    match workdir {
        Some(dir) => posix(&dir.join(out)),
        None => out.to_string(),
    }
}

/// Translates keyword options into plink's flag syntax. Underscores in
/// option names become hyphens; everything else is passed through as is.
pub fn build(
    binary: &Path,
    bfile: Option<&Path>,
    out: Option<&str>,
    workdir: Option<&Path>,
    options: &PlinkArgs,
) -> Invocation {
    let mut tokens = vec![posix(binary)];

    if let Some(bfile) = bfile {
        tokens.push("--bfile".to_string());
        tokens.push(posix(bfile));
    }
    if let Some(out) = out {
        tokens.push("--out".to_string());
        tokens.push(resolve_out(workdir, out));
    }

    for (name, value) in options.iter() {
        let flag = format!("--{}", name.replace('_', "-"));
        match value {
            OptValue::Switch(true) => tokens.push(flag),
            OptValue::Switch(false) => {}
            OptValue::Scalar(v) => {
                tokens.push(flag);
                tokens.push(v.clone());
            }
            OptValue::List(values) => {
                tokens.push(flag);
                tokens.extend(values.iter().cloned());
            }
        }
    }

    Invocation { tokens }
}

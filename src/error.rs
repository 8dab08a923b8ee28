use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlynkError {
    #[error("`{name}` is not on the path")]
    BinaryNotFound { name: String },

    #[error("no such file: {path}")]
    NoSuchPath { path: std::path::PathBuf },

    #[error("no such directory: {path}")]
    NoSuchWorkdir { path: std::path::PathBuf },

    #[error("`{name}` does not reference plink {expected} (reported: {reported})")]
    VersionMismatch {
        name: String,
        expected: &'static str,
        reported: String,
    },

    #[error("cannot use plink {line} if not installed")]
    VersionUnavailable { line: String },

    #[error("could not launch {program}")]
    Launch {
        #[source]
        source: std::io::Error,
        program: std::path::PathBuf,
    },

    #[error("{stderr}")]
    ToolFailed { stderr: String },

    #[error("could not read CSV from {path}")]
    CsvRead {
        #[source]
        source: csv::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write CSV to {path}")]
    CsvWrite {
        #[source]
        source: csv::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("expected {expected} fields (got {n_fields}) in line {line_num}")]
    FieldCount {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("could not parse `{field}` as {kind} in line {line_num}")]
    FieldParse {
        field: String,
        kind: &'static str,
        line_num: usize,
    },
}

pub type Result<T> = std::result::Result<T, PlynkError>;

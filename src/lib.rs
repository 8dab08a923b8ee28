//! Thin wrapper around the plink 1.9/2.0 command-line tools: binary
//! discovery and version validation, keyword-to-flag translation,
//! blocking subprocess invocation, and typed CSV I/O for the plink text
//! table conventions. All genomic computation stays in plink itself.

pub mod command;
pub mod error;
pub mod resolve;
pub mod runner;
pub mod session;
pub mod table;

pub use command::{Invocation, OptValue, PlinkArgs};
pub use error::{PlynkError, Result};
pub use resolve::{BinaryHandle, VersionLine};
pub use runner::{ProcessRunner, RunOutput, SystemRunner};
pub use session::{InspectionView, Plink, RunSpec};
pub use table::{Cell, Column, ColumnKind, Table, read_typed_csv, schema, write_typed_csv};

use std::path::PathBuf;

/// Everything that can go wrong while building the scene from catalog data.
/// Any one of these aborts construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: field `{field}` is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error("line {line}: not a colour: {value:?}")]
    InvalidColor { line: usize, value: String },
    #[error("line {line}: parent {parent:?} has not been defined")]
    UnknownParent { line: usize, parent: String },
    #[error("line {line}: unknown shell kind {value:?}")]
    UnknownShell { line: usize, value: String },
    #[error("body {name:?}: `{field}` must be {requirement}, got {value}")]
    OutOfRange {
        name: String,
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("duplicate name {name:?} among siblings")]
    DuplicateName { name: String },
}

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum FrameError {
    #[error("Plan error: {0}")]
    #[diagnostic(
        code("RP-001"),
        help("Please check your bench plan YAML syntax and structure.")
    )]
    ConfigError(#[source] serde_yaml::Error, #[label("here")] Option<SourceSpan>),

    #[error("I/O error: {0}")]
    #[diagnostic(code("RP-002"), help("Check file paths and permissions."))]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    #[diagnostic(
        code("RP-003"),
        help("An error occurred within the reference engine.")
    )]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("Report error: {0}")]
    #[diagnostic(code("RP-004"), help("The bench report could not be serialized."))]
    ReportError(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    #[diagnostic(code("RP-005"), help("Check the pattern passed to read_csv_by_glob."))]
    PatternError(#[from] glob::PatternError),

    #[error("Glob traversal failed: {0}")]
    #[diagnostic(code("RP-006"))]
    GlobError(#[from] glob::GlobError),

    #[error("Input has no header row: {0}")]
    #[diagnostic(
        code("RP-007"),
        help("CSV inputs need at least a header line.")
    )]
    EmptyInput(String),

    #[error("Line {line} has {found} fields, header has {expected}")]
    #[diagnostic(
        code("RP-008"),
        help("Rows may be shorter than the header (padded with NaN) but never longer.")
    )]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Length mismatch: expected {expected}, found {found}")]
    #[diagnostic(code("RP-009"))]
    LengthMismatch { expected: usize, found: usize },

    #[error("Index {index} out of bounds for length {len}")]
    #[diagnostic(code("RP-010"))]
    OutOfBounds { index: usize, len: usize },

    #[error("Column not found: {0}")]
    #[diagnostic(code("RP-011"))]
    ColumnNotFound(String),

    #[error("Invalid axis {0}, expected 0 (columns) or 1 (rows)")]
    #[diagnostic(code("RP-012"))]
    InvalidAxis(usize),

    #[error(transparent)]
    #[diagnostic(code("RP-000"))]
    Unknown(#[from] anyhow::Error),
}

pub type FrameResult<T> = Result<T, FrameError>;

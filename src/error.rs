use std::fmt;

use crate::diagnostic::SpecDiagnostic;
use crate::spec::INSTRUCTION_WIDTH_BITS;

/// Represents any failure that can occur while loading, validating, or
/// synthesizing encodings from a specification model.
#[derive(Debug)]
pub enum SpecError {
    /// The model violates structural invariants; synthesis refuses to run.
    /// All violations in the model are collected, not just the first.
    Validation { diagnostics: Vec<SpecDiagnostic> },
    /// An explicit modifier width cannot hold its enum.
    WidthOverflow {
        path: String,
        declared: u32,
        required: u32,
    },
    /// A leaf's field widths sum past the fixed instruction word.
    BitBudgetExceeded {
        leaf: String,
        used: u64,
        overflow: u64,
    },
    Json(serde_json::Error),
}

impl From<serde_json::Error> for SpecError {
    fn from(err: serde_json::Error) -> Self {
        SpecError::Json(err)
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::Validation { diagnostics } => {
                write!(f, "specification has {} violation(s)", diagnostics.len())?;
                for diag in diagnostics {
                    write!(f, "\n  {diag}")?;
                }
                Ok(())
            }
            SpecError::WidthOverflow {
                path,
                declared,
                required,
            } => write!(
                f,
                "{path}: declared width of {declared} bit(s) cannot hold enum needing {required}"
            ),
            SpecError::BitBudgetExceeded {
                leaf,
                used,
                overflow,
            } => write!(
                f,
                "leaf '{leaf}' needs {used} bits, exceeding the {INSTRUCTION_WIDTH_BITS}-bit word by {overflow}"
            ),
            SpecError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for SpecError {}

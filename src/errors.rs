use std::io;
use thiserror::Error;

/// Failures raised while preparing a command line for execution.
///
/// Only the redirection seam produces structured errors; everything that
/// happens after dispatch travels as `anyhow` errors and is folded into an
/// [`EvalResult`](crate::command::EvalResult) by the interpreter.
#[derive(Error, Debug)]
pub enum ShellError {
    /// A redirection operator appeared with no filename after it.
    #[error("syntax error: expected filename after `{op}`")]
    Syntax { op: String },

    /// A redirection target could not be opened.
    #[error("{path}: {source}")]
    Open { path: String, source: io::Error },
}

impl ShellError {
    pub fn syntax(op: &str) -> Self {
        Self::Syntax { op: op.to_string() }
    }

    pub fn open(path: &str, source: io::Error) -> Self {
        Self::Open {
            path: path.to_string(),
            source,
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Role;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Fatal conditions raised while loading the dataset.
///
/// Per-row problems (unparseable dates, undecodable records) are not errors;
/// the loader drops those rows and records them in `Dataset::dropped`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{}", ambiguous_message(.role, .candidates))]
    AmbiguousSchema { role: Role, candidates: Vec<String> },

    #[error("Failed to open CSV '{}': {source}", .path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV headers: {0}")]
    Header(#[from] csv::Error),
}

fn ambiguous_message(role: &Role, candidates: &[String]) -> String {
    if candidates.is_empty() {
        format!(
            "Cannot resolve the {} column: no header contains any of {}.",
            role.name(),
            role.keyword_list(),
        )
    } else {
        format!(
            "Cannot resolve the {} column: {} headers match ({}); rename all but one.",
            role.name(),
            candidates.len(),
            candidates.join(", "),
        )
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(2, err.to_string())
    }
}

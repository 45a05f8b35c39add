// Field-scoped failure markers

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Human-readable failure embedded in place of data that could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorNote {
    pub error: String,
}

impl ErrorNote {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<ProbeError> for ErrorNote {
    fn from(e: ProbeError) -> Self {
        ErrorNote::new(e.to_string())
    }
}

/// Either probed data or the note explaining why it is missing.
/// Serializes as the bare data object or as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Probed<T> {
    Failed(ErrorNote),
    Ok(T),
}

impl<T> Probed<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Probed::Failed(_))
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            Probed::Ok(v) => Some(v),
            Probed::Failed(_) => None,
        }
    }

    pub fn as_failed(&self) -> Option<&ErrorNote> {
        match self {
            Probed::Failed(note) => Some(note),
            Probed::Ok(_) => None,
        }
    }
}

impl<T> From<Result<T, ProbeError>> for Probed<T> {
    fn from(r: Result<T, ProbeError>) -> Self {
        match r {
            Ok(v) => Probed::Ok(v),
            Err(e) => Probed::Failed(e.into()),
        }
    }
}

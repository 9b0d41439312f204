use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::ResponderId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("report must be a JSON object")]
    NotAnObject,
    #[error("report is missing required field: {0}")]
    MissingField(&'static str),
    #[error("report location is not a scalar value: {0}")]
    InvalidLocation(String),
    #[error("report severity is not an integer: {0}")]
    InvalidSeverity(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid report: {0}")]
    Validation(#[from] ValidationError),
    #[error("no responder available")]
    NoResponderAvailable,
    #[error("unknown responder: {0}")]
    UnknownResponder(ResponderId),
    #[error("selection policy chose responder outside the available set: {0}")]
    InvalidSelection(ResponderId),
}

/// Coarse failure category, stable across error message changes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NoResponderAvailable,
    UnknownResponder,
    InvalidSelection,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::Validation(_) => ErrorKind::Validation,
            DispatchError::NoResponderAvailable => ErrorKind::NoResponderAvailable,
            DispatchError::UnknownResponder(_) => ErrorKind::UnknownResponder,
            DispatchError::InvalidSelection(_) => ErrorKind::InvalidSelection,
        }
    }
}

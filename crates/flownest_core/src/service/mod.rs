//! Core use-case services, one per collection.
//!
//! # Responsibility
//! - Turn widget actions (add, toggle, edit, delete, list) into repository
//!   calls.
//! - Keep CLI and other callers decoupled from storage details.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Submitting an empty form is a no-op that returns `Ok(None)`.
//! - No retries: a failed write is reported once and left to the caller.

use crate::model::{RecordId, ValidationError};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod calendar_service;
pub mod goal_service;
pub mod habit_service;
pub mod reflection_service;
pub mod task_service;
pub mod time_block_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error shared by collection use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input failed field validation.
    Validation(ValidationError),
    /// Target record does not exist for this owner.
    NotFound(RecordId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Trims form input; `None` when nothing is left.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

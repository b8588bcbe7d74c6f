//! Operations behind each endpoint
//!
//! Every action takes already-validated input and a storage handle, so the
//! same code runs under the HTTP layer and directly from tests.

pub mod day;
pub mod habit;

pub use day::*;
pub use habit::*;

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors an action can fail with once its input passed validation
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

//! Error taxonomy shared by the catalog backends and the table controller.

use thiserror::Error;

use crate::models::ServiceId;

/// Failure reported by a catalog backend for a single call.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("catalog responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode catalog response: {0}")]
    Decode(String),
    #[error("service {0} not found")]
    NotFound(ServiceId),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}

/// One deletion that failed during a bulk delete.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedDeletion {
    pub id: ServiceId,
    pub message: String,
}

/// Failures surfaced by table operations. None of them leave the controller
/// mid-transition: the store keeps its last good contents and the edit
/// session lands back in a defined state.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to load services: {0}")]
    Fetch(#[source] CatalogError),
    #[error("failed to save service: {0}")]
    Write(#[source] CatalogError),
    #[error("{} of {total} deletions failed", .failed.len())]
    PartialBulkDelete {
        failed: Vec<FailedDeletion>,
        total: usize,
    },
    #[error("a save is already in progress")]
    SessionBusy,
    #[error("no service is being edited")]
    NoSession,
    #[error("no services selected")]
    NothingSelected,
    #[error("a bulk delete is already running")]
    BulkDeleteInFlight,
}

pub type TableResult<T> = Result<T, TableError>;

//! Backends the table controller talks to. The controller only ever sees the
//! `CatalogClient` trait, so the HTTP store and the local SQLite store are
//! interchangeable.

mod http;
mod sqlite;

pub use http::HttpCatalog;
pub use sqlite::{default_db_path, SqliteCatalog};
pub(crate) use sqlite::DATA_DIR_NAME;

use crate::error::CatalogError;
use crate::models::{NewService, Service, ServiceDraft, ServiceId};

/// Request/response access to the authoritative record store. There are no
/// push updates; callers resynchronize by listing again.
pub trait CatalogClient {
    /// Fetch every record. Order is not guaranteed.
    fn list(&self) -> Result<Vec<Service>, CatalogError>;

    /// Insert a record and return it with its store-assigned id.
    fn create(&self, service: &NewService) -> Result<Service, CatalogError>;

    /// Replace the fields of an existing record.
    fn update(&self, id: &ServiceId, draft: &ServiceDraft) -> Result<Service, CatalogError>;

    fn delete(&self, id: &ServiceId) -> Result<(), CatalogError>;
}

impl<C: CatalogClient + ?Sized> CatalogClient for Box<C> {
    fn list(&self) -> Result<Vec<Service>, CatalogError> {
        (**self).list()
    }

    fn create(&self, service: &NewService) -> Result<Service, CatalogError> {
        (**self).create(service)
    }

    fn update(&self, id: &ServiceId, draft: &ServiceDraft) -> Result<Service, CatalogError> {
        (**self).update(id, draft)
    }

    fn delete(&self, id: &ServiceId) -> Result<(), CatalogError> {
        (**self).delete(id)
    }
}

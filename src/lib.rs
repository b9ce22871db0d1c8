//! Core library surface for the services table.
//!
//! `table` holds the client-side state (list store, projection, selection,
//! edit session, bulk delete); `catalog` holds the backends it synchronizes
//! with; `ui` draws it all in the terminal.
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod table;
pub mod ui;

pub use catalog::{CatalogClient, HttpCatalog, SqliteCatalog};
pub use config::{Backend, Config};
pub use error::{CatalogError, TableError};
pub use models::{DraftUpdate, NewService, Service, ServiceDraft, ServiceId};
pub use table::{RowIntent, ServicesTable};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

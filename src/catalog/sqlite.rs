use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::CatalogClient;
use crate::error::CatalogError;
use crate::models::{NewService, Service, ServiceDraft, ServiceId};

/// Folder name used beneath the user's home directory for application data.
pub(crate) const DATA_DIR_NAME: &str = ".services-table";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "services.sqlite";

/// Local catalog used when no remote API is configured. It behaves like the
/// remote store: ids are assigned here, never by the table.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (or create) the database file, making parent directories as
    /// needed, and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS services (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL
            )",
            [],
        )
        .context("failed to create services table")?;

        Ok(Self { conn })
    }

    fn fetch_one(&self, id: i64) -> Result<Option<Service>, CatalogError> {
        let service = self
            .conn
            .query_row(
                "SELECT id, name, price FROM services WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Service {
                        id: ServiceId::from(row.get::<_, i64>(0)?),
                        name: row.get(1)?,
                        price: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(service)
    }
}

/// Resolve the default database path inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

/// Local ids are integers; anything else cannot name a row here.
fn row_id(id: &ServiceId) -> Result<i64, CatalogError> {
    id.as_str()
        .parse::<i64>()
        .map_err(|_| CatalogError::NotFound(id.clone()))
}

impl CatalogClient for SqliteCatalog {
    fn list(&self) -> Result<Vec<Service>, CatalogError> {
        let mut stmt = self.conn.prepare("SELECT id, name, price FROM services")?;

        let services = stmt
            .query_map([], |row| {
                Ok(Service {
                    id: ServiceId::from(row.get::<_, i64>(0)?),
                    name: row.get(1)?,
                    price: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("event=catalog_list module=sqlite count={}", services.len());
        Ok(services)
    }

    fn create(&self, service: &NewService) -> Result<Service, CatalogError> {
        self.conn.execute(
            "INSERT INTO services (name, price) VALUES (?1, ?2)",
            params![service.name, service.price],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(Service {
            id: ServiceId::from(id),
            name: service.name.clone(),
            price: service.price,
        })
    }

    fn update(&self, id: &ServiceId, draft: &ServiceDraft) -> Result<Service, CatalogError> {
        let key = row_id(id)?;
        let updated = self.conn.execute(
            "UPDATE services SET name = ?1, price = ?2 WHERE id = ?3",
            params![draft.name, draft.price, key],
        )?;

        if updated == 0 {
            return Err(CatalogError::NotFound(id.clone()));
        }
        self.fetch_one(key)?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    fn delete(&self, id: &ServiceId) -> Result<(), CatalogError> {
        let key = row_id(id)?;
        let deleted = self
            .conn
            .execute("DELETE FROM services WHERE id = ?1", params![key])?;

        if deleted == 0 {
            Err(CatalogError::NotFound(id.clone()))
        } else {
            Ok(())
        }
    }
}

use std::collections::HashSet;

use log::{debug, warn};

use super::collation::compare_names;
use crate::catalog::CatalogClient;
use crate::error::{TableError, TableResult};
use crate::models::{Service, ServiceId};

/// Canonical in-memory copy of the catalog. Everything the table shows is
/// derived from here; nothing writes to it except a full refresh.
#[derive(Debug, Default)]
pub struct ListStore {
    records: Vec<Service>,
    loaded: bool,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the complete collection, sort it by name and swap it in. On
    /// failure the previous contents stay untouched.
    pub fn refresh<C: CatalogClient + ?Sized>(&mut self, client: &C) -> TableResult<usize> {
        let fetched = client.list().map_err(|err| {
            warn!("event=store_refresh module=table status=error error={err}");
            TableError::Fetch(err)
        })?;

        self.replace(fetched);
        debug!(
            "event=store_refresh module=table status=ok count={}",
            self.records.len()
        );
        Ok(self.records.len())
    }

    /// Sort and install a freshly fetched collection in one assignment.
    pub fn replace(&mut self, fetched: Vec<Service>) {
        let mut seen = HashSet::with_capacity(fetched.len());
        let mut records: Vec<Service> = fetched
            .into_iter()
            .filter(|service| {
                let fresh = seen.insert(service.id.clone());
                if !fresh {
                    warn!(
                        "event=store_refresh module=table status=duplicate id={}",
                        service.id
                    );
                }
                fresh
            })
            .collect();
        records.sort_by(|a, b| compare_names(&a.name, &b.name));

        self.records = records;
        self.loaded = true;
    }

    pub fn records(&self) -> &[Service] {
        &self.records
    }

    /// Whether at least one fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ServiceId) -> Option<&Service> {
        self.records.iter().find(|service| &service.id == id)
    }

    /// Identifiers of every loaded record, in display order.
    pub fn ids(&self) -> impl Iterator<Item = &ServiceId> {
        self.records.iter().map(|service| &service.id)
    }

    /// The set of loaded identifiers.
    pub fn universe(&self) -> HashSet<ServiceId> {
        self.ids().cloned().collect()
    }
}

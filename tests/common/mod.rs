#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use services_table::{CatalogClient, CatalogError, NewService, Service, ServiceDraft, ServiceId};

/// Remote call recorded by `FakeCatalog`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List,
    Create(String),
    Update(ServiceId, ServiceDraft),
    Delete(ServiceId),
}

/// In-memory stand-in for the remote store with switchable failures.
#[derive(Default)]
pub struct FakeCatalog {
    pub records: RefCell<Vec<Service>>,
    pub calls: RefCell<Vec<Call>>,
    pub fail_list: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_delete: RefCell<HashSet<ServiceId>>,
    next_id: Cell<i64>,
}

impl FakeCatalog {
    pub fn with(records: Vec<Service>) -> Self {
        let next = records.len() as i64 + 1000;
        let catalog = Self::default();
        *catalog.records.borrow_mut() = records;
        catalog.next_id.set(next);
        catalog
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn write_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| !matches!(call, Call::List))
            .count()
    }

    pub fn list_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::List))
            .count()
    }

    pub fn fail_delete_of(&self, id: impl Into<ServiceId>) {
        self.fail_delete.borrow_mut().insert(id.into());
    }

    /// Simulate another change on the server side.
    pub fn push_remote(&self, service: Service) {
        self.records.borrow_mut().push(service);
    }
}

impl CatalogClient for FakeCatalog {
    fn list(&self) -> Result<Vec<Service>, CatalogError> {
        self.calls.borrow_mut().push(Call::List);
        if self.fail_list.get() {
            return Err(CatalogError::Network("connection refused".into()));
        }
        Ok(self.records.borrow().clone())
    }

    fn create(&self, service: &NewService) -> Result<Service, CatalogError> {
        self.calls
            .borrow_mut()
            .push(Call::Create(service.name.clone()));
        if self.fail_create.get() {
            return Err(CatalogError::Status {
                status: 500,
                message: "insert failed".into(),
            });
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let created = Service::new(id, service.name.clone(), service.price);
        self.records.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update(&self, id: &ServiceId, draft: &ServiceDraft) -> Result<Service, CatalogError> {
        self.calls
            .borrow_mut()
            .push(Call::Update(id.clone(), draft.clone()));
        if self.fail_update.get() {
            return Err(CatalogError::Network("timed out".into()));
        }
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|service| &service.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        record.name = draft.name.clone();
        record.price = draft.price;
        Ok(record.clone())
    }

    fn delete(&self, id: &ServiceId) -> Result<(), CatalogError> {
        self.calls.borrow_mut().push(Call::Delete(id.clone()));
        if self.fail_delete.borrow().contains(id) {
            return Err(CatalogError::Status {
                status: 409,
                message: "service is in use".into(),
            });
        }
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|service| &service.id != id);
        if records.len() == before {
            return Err(CatalogError::NotFound(id.clone()));
        }
        Ok(())
    }
}

pub fn salon() -> Vec<Service> {
    vec![
        Service::new(1, "Haircut", Some(30.0)),
        Service::new(2, "Coloring", None),
    ]
}

pub fn names(table: &services_table::ServicesTable) -> Vec<String> {
    table
        .store()
        .records()
        .iter()
        .map(|service| service.name.clone())
        .collect()
}

use log::{debug, warn};

use crate::catalog::CatalogClient;
use crate::error::{FailedDeletion, TableError};
use crate::models::ServiceId;

/// Outcome of deleting a batch of ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<ServiceId>,
    pub failed: Vec<FailedDeletion>,
}

impl BulkDeleteReport {
    pub fn total(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// The report itself when every deletion went through, otherwise the
    /// aggregate diagnostic.
    pub fn into_result(self) -> Result<Self, TableError> {
        if self.is_complete() {
            return Ok(self);
        }
        let total = self.total();
        Err(TableError::PartialBulkDelete {
            failed: self.failed,
            total,
        })
    }
}

/// Issue one delete per id. Every id is attempted; a failure never stops the
/// rest of the batch.
pub fn delete_each<C: CatalogClient + ?Sized>(client: &C, ids: &[ServiceId]) -> BulkDeleteReport {
    let mut report = BulkDeleteReport::default();

    for id in ids {
        match client.delete(id) {
            Ok(()) => {
                debug!("event=bulk_delete module=table status=ok id={id}");
                report.deleted.push(id.clone());
            }
            Err(err) => {
                warn!("event=bulk_delete module=table status=error id={id} error={err}");
                report.failed.push(FailedDeletion {
                    id: id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    report
}

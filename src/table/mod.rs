//! Client-side state for the services table.
//!
//! `ServicesTable` owns the list store, the selection, the edit session and
//! the pagination/search inputs. It is the only place that talks to a
//! `CatalogClient`, and every write is followed by a full refetch.

mod bulk;
mod collation;
mod edit;
mod projection;
mod selection;
mod store;

pub use bulk::{delete_each, BulkDeleteReport};
pub use collation::{compare_names, name_matches};
pub use edit::{EditSession, SaveRequest};
pub use projection::{
    filter, project, Pagination, Projection, DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS,
};
pub use selection::SelectionTracker;
pub use store::ListStore;

use log::{info, warn};

use crate::catalog::CatalogClient;
use crate::error::{TableError, TableResult};
use crate::models::{DraftUpdate, NewService, Service, ServiceId};

/// What a row interaction means. A checkbox click and a row click are
/// separate intents, so selecting a row can never open the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIntent {
    Select(ServiceId),
    EditRequest(ServiceId),
}

#[derive(Debug, Default)]
pub struct ServicesTable {
    store: ListStore,
    selection: SelectionTracker,
    edit: EditSession,
    pagination: Pagination,
    query: String,
    bulk_in_flight: bool,
    stale: bool,
}

impl ServicesTable {
    pub fn new(per_page: usize) -> Self {
        Self {
            pagination: Pagination::new(per_page),
            ..Self::default()
        }
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// True when the last refresh failed and the list shows older data.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Refetch everything and reset the selection. A failed fetch keeps the
    /// current list and selection.
    pub fn refresh<C: CatalogClient + ?Sized>(&mut self, client: &C) -> TableResult<usize> {
        match self.store.refresh(client) {
            Ok(count) => {
                self.selection.clear();
                self.stale = false;
                self.clamp_page();
                Ok(count)
            }
            Err(err) => {
                self.stale = true;
                Err(err)
            }
        }
    }

    /// Refresh after a write that already succeeded. A fetch failure here is
    /// logged and flagged as stale rather than reported as a write failure.
    fn resync<C: CatalogClient + ?Sized>(&mut self, client: &C) {
        if let Err(err) = self.refresh(client) {
            warn!("event=resync module=table status=stale error={err}");
        }
    }

    /// The page currently on screen. The page index is clamped against the
    /// filtered count so an out-of-range page is never rendered.
    pub fn projection(&self) -> Projection<'_> {
        let mut pagination = self.pagination;
        pagination.clamp(filter(self.store.records(), &self.query).len());
        project(self.store.records(), &self.query, pagination)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pagination.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.pagination.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.pagination.page.saturating_sub(1));
    }

    pub fn set_rows_per_page(&mut self, per_page: usize) {
        self.pagination.set_per_page(per_page);
    }

    pub fn cycle_rows_per_page(&mut self) {
        self.pagination.cycle_per_page();
    }

    fn clamp_page(&mut self) {
        let count = filter(self.store.records(), &self.query).len();
        self.pagination.clamp(count);
    }

    /// Whether the header checkbox is checked.
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(&self.store.universe())
    }

    pub fn is_selected(&self, id: &ServiceId) -> bool {
        self.selection.contains(id)
    }

    /// Flip one row's selection. Ids that are not loaded do not stick.
    pub fn toggle_selection(&mut self, id: &ServiceId) -> bool {
        let selected = self.selection.toggle(id);
        self.selection.retain_universe(&self.store.universe());
        selected && self.selection.contains(id)
    }

    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(self.store.ids());
    }

    /// Route a row interaction. Returns true when state changed.
    pub fn dispatch(&mut self, intent: RowIntent) -> bool {
        match intent {
            RowIntent::Select(id) => {
                let before = self.selection.len();
                self.toggle_selection(&id);
                before != self.selection.len()
            }
            RowIntent::EditRequest(id) => self.open_edit(&id),
        }
    }

    /// Open the editor for a loaded record, replacing any open session.
    pub fn open_edit(&mut self, id: &ServiceId) -> bool {
        match self.store.get(id) {
            Some(record) => {
                self.edit.open(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn update_draft(&mut self, update: DraftUpdate) -> bool {
        self.edit.update(update)
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    /// Send the draft, then refetch and close. On failure the session goes
    /// back to editing with the draft intact.
    pub fn submit_edit<C: CatalogClient + ?Sized>(&mut self, client: &C) -> TableResult<Service> {
        let request = self.edit.begin_save()?;

        match client.update(&request.id, &request.draft) {
            Ok(updated) => {
                info!("event=edit_submit module=table status=ok id={}", request.id);
                self.resync(client);
                self.edit.finish_save(true);
                Ok(updated)
            }
            Err(err) => {
                warn!(
                    "event=edit_submit module=table status=error id={} error={err}",
                    request.id
                );
                self.edit.finish_save(false);
                Err(TableError::Write(err))
            }
        }
    }

    /// Create a record through the catalog and refetch on success.
    pub fn create_service<C: CatalogClient + ?Sized>(
        &mut self,
        client: &C,
        service: &NewService,
    ) -> TableResult<Service> {
        let created = client.create(service).map_err(|err| {
            warn!("event=create module=table status=error error={err}");
            TableError::Write(err)
        })?;
        info!("event=create module=table status=ok id={}", created.id);
        self.resync(client);
        Ok(created)
    }

    /// Claim the current selection for a bulk delete, in display order.
    pub fn begin_bulk_delete(&mut self) -> TableResult<Vec<ServiceId>> {
        if self.bulk_in_flight {
            return Err(TableError::BulkDeleteInFlight);
        }
        if self.selection.is_empty() {
            return Err(TableError::NothingSelected);
        }

        self.bulk_in_flight = true;
        Ok(self
            .store
            .ids()
            .filter(|id| self.selection.contains(id))
            .cloned()
            .collect())
    }

    /// Refetch after the whole batch settled, whatever its outcome, then
    /// report an aggregate failure if any deletion failed.
    pub fn finish_bulk_delete<C: CatalogClient + ?Sized>(
        &mut self,
        client: &C,
        report: BulkDeleteReport,
    ) -> TableResult<BulkDeleteReport> {
        self.bulk_in_flight = false;
        self.resync(client);

        info!(
            "event=bulk_delete module=table deleted={} failed={}",
            report.deleted.len(),
            report.failed.len()
        );
        report.into_result()
    }

    /// Delete every selected record and resynchronize.
    pub fn delete_selected<C: CatalogClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> TableResult<BulkDeleteReport> {
        let ids = self.begin_bulk_delete()?;
        let report = delete_each(client, &ids);
        self.finish_bulk_delete(client, report)
    }

    pub fn is_bulk_delete_in_flight(&self) -> bool {
        self.bulk_in_flight
    }
}

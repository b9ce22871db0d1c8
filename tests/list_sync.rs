mod common;

use common::{names, salon, Call, FakeCatalog};
use services_table::table::{EditSession, Pagination};
use services_table::{DraftUpdate, NewService, RowIntent, Service, ServiceId, ServicesTable, TableError};

fn loaded(catalog: &FakeCatalog) -> ServicesTable {
    let mut table = ServicesTable::new(10);
    table.refresh(catalog).unwrap();
    table
}

#[test]
fn initial_page_is_sorted_with_formatted_prices() {
    let catalog = FakeCatalog::with(salon());
    let table = loaded(&catalog);

    let projection = table.projection();
    let rows: Vec<(&str, String)> = projection
        .rows
        .iter()
        .map(|service| (service.name.as_str(), service.display_price()))
        .collect();
    assert_eq!(
        rows,
        vec![("Coloring", "-".to_string()), ("Haircut", "30.00 zł".to_string())]
    );
    assert_eq!(table.pagination(), Pagination { page: 0, per_page: 10 });
}

#[test]
fn select_all_flag_follows_selection_and_resets_on_refresh() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    table.dispatch(RowIntent::Select(ServiceId::from(2)));
    assert!(!table.all_selected());
    table.dispatch(RowIntent::Select(ServiceId::from(1)));
    assert!(table.all_selected());

    table.refresh(&catalog).unwrap();
    assert!(table.selection().is_empty());
    assert!(!table.all_selected());
}

#[test]
fn bulk_delete_refreshes_even_when_some_deletions_fail() {
    let catalog = FakeCatalog::with(salon());
    catalog.fail_delete_of(1);
    let mut table = loaded(&catalog);
    table.toggle_all();

    let err = table.delete_selected(&catalog).unwrap_err();
    match err {
        TableError::PartialBulkDelete { failed, total } => {
            assert_eq!(total, 2);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].id, ServiceId::from(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert_eq!(names(&table), vec!["Haircut"]);
    assert!(table.selection().is_empty());
    assert!(!table.is_bulk_delete_in_flight());
    assert_eq!(catalog.calls().last(), Some(&Call::List));
}

#[test]
fn bulk_delete_attempts_every_id() {
    let records = vec![
        Service::new(1, "A", None),
        Service::new(2, "B", None),
        Service::new(3, "C", None),
    ];
    let catalog = FakeCatalog::with(records);
    catalog.fail_delete_of(1);
    catalog.fail_delete_of(2);
    let mut table = loaded(&catalog);
    table.toggle_all();

    let _ = table.delete_selected(&catalog);
    let deletes = catalog
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Delete(_)))
        .count();
    assert_eq!(deletes, 3);
    assert_eq!(names(&table), vec!["A", "B"]);
}

#[test]
fn bulk_delete_needs_a_selection() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    assert!(matches!(
        table.delete_selected(&catalog),
        Err(TableError::NothingSelected)
    ));
    assert_eq!(catalog.write_calls(), 0);
}

#[test]
fn second_bulk_delete_is_rejected_while_one_is_running() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);
    table.toggle_all();

    let ids = table.begin_bulk_delete().unwrap();
    assert_eq!(ids, vec![ServiceId::from(2), ServiceId::from(1)]);
    assert!(matches!(
        table.begin_bulk_delete(),
        Err(TableError::BulkDeleteInFlight)
    ));

    let report = services_table::table::delete_each(&catalog, &ids);
    let report = table.finish_bulk_delete(&catalog, report).unwrap();
    assert_eq!(report.deleted.len(), 2);
    assert!(table.store().is_empty());
}

#[test]
fn failed_fetch_keeps_last_good_list_and_selection() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);
    table.toggle_selection(&ServiceId::from(1));

    catalog.fail_list.set(true);
    let err = table.refresh(&catalog).unwrap_err();
    assert!(matches!(err, TableError::Fetch(_)));
    assert_eq!(names(&table), vec!["Coloring", "Haircut"]);
    assert!(table.is_selected(&ServiceId::from(1)));
    assert!(table.is_stale());

    catalog.fail_list.set(false);
    table.refresh(&catalog).unwrap();
    assert!(!table.is_stale());
}

#[test]
fn failed_initial_fetch_leaves_an_empty_table() {
    let catalog = FakeCatalog::with(salon());
    catalog.fail_list.set(true);
    let mut table = ServicesTable::new(10);

    assert!(table.refresh(&catalog).is_err());
    assert!(table.store().is_empty());
    assert!(!table.store().is_loaded());
    assert!(!table.all_selected());
}

#[test]
fn edit_submit_updates_remote_and_refetches() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    assert!(table.dispatch(RowIntent::EditRequest(ServiceId::from(1))));
    table.update_draft(DraftUpdate::Price(Some(35.5)));
    let updated = table.submit_edit(&catalog).unwrap();

    assert_eq!(updated.price, Some(35.5));
    assert_eq!(*table.edit_session(), EditSession::Closed);
    assert_eq!(
        catalog.calls()[1],
        Call::Update(
            ServiceId::from(1),
            services_table::ServiceDraft {
                name: "Haircut".into(),
                price: Some(35.5),
            }
        )
    );
    assert_eq!(catalog.calls().last(), Some(&Call::List));
    assert_eq!(table.store().get(&ServiceId::from(1)).unwrap().price, Some(35.5));
}

#[test]
fn edit_submit_failure_keeps_draft_open() {
    let catalog = FakeCatalog::with(salon());
    catalog.fail_update.set(true);
    let mut table = loaded(&catalog);

    table.open_edit(&ServiceId::from(2));
    table.update_draft(DraftUpdate::Name("Full coloring".into()));
    let lists_before = catalog.list_calls();

    let err = table.submit_edit(&catalog).unwrap_err();
    assert!(matches!(err, TableError::Write(_)));
    match table.edit_session() {
        EditSession::Editing { draft, record } => {
            assert_eq!(draft.name, "Full coloring");
            assert_eq!(record.id, ServiceId::from(2));
        }
        other => panic!("expected Editing, got {other:?}"),
    }
    assert_eq!(catalog.list_calls(), lists_before);
}

#[test]
fn cancelling_an_edit_makes_no_remote_call() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    table.open_edit(&ServiceId::from(1));
    table.update_draft(DraftUpdate::Name("changed".into()));
    table.cancel_edit();

    assert_eq!(*table.edit_session(), EditSession::Closed);
    assert_eq!(catalog.write_calls(), 0);
    assert_eq!(names(&table), vec!["Coloring", "Haircut"]);
}

#[test]
fn select_intent_never_opens_the_editor() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    table.dispatch(RowIntent::Select(ServiceId::from(1)));
    assert!(!table.edit_session().is_open());

    table.dispatch(RowIntent::EditRequest(ServiceId::from(1)));
    assert!(table.edit_session().is_open());
    assert!(table.is_selected(&ServiceId::from(1)));
}

#[test]
fn unknown_ids_are_ignored() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);

    assert!(!table.dispatch(RowIntent::Select(ServiceId::from(42))));
    assert!(table.selection().is_empty());
    assert!(!table.dispatch(RowIntent::EditRequest(ServiceId::from(42))));
    assert!(!table.edit_session().is_open());
}

#[test]
fn create_refetches_and_picks_up_remote_changes() {
    let catalog = FakeCatalog::with(salon());
    let mut table = loaded(&catalog);
    table.toggle_all();
    catalog.push_remote(Service::new(50, "Blow dry", Some(20.0)));

    let created = table
        .create_service(
            &catalog,
            &NewService {
                name: "Manicure".into(),
                price: Some(40.0),
            },
        )
        .unwrap();

    assert_eq!(created.name, "Manicure");
    assert_eq!(names(&table), vec!["Blow dry", "Coloring", "Haircut", "Manicure"]);
    assert!(table.selection().is_empty());
}

#[test]
fn create_failure_leaves_store_untouched() {
    let catalog = FakeCatalog::with(salon());
    catalog.fail_create.set(true);
    let mut table = loaded(&catalog);

    let err = table
        .create_service(
            &catalog,
            &NewService {
                name: "Manicure".into(),
                price: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, TableError::Write(_)));
    assert_eq!(table.store().len(), 2);
}

#[test]
fn search_resets_page_and_clamps_out_of_range_pages() {
    let records = (0..25)
        .map(|i| Service::new(i, format!("Service {i:02}"), None))
        .collect();
    let catalog = FakeCatalog::with(records);
    let mut table = loaded(&catalog);

    table.set_page(2);
    assert_eq!(table.pagination().page, 2);
    assert_eq!(table.projection().rows.len(), 5);

    table.set_query("service 1");
    assert_eq!(table.pagination().page, 0);
    assert_eq!(table.projection().filtered_count, 10);

    table.set_query("");
    table.set_page(2);
    catalog.records.borrow_mut().truncate(12);
    table.refresh(&catalog).unwrap();
    assert_eq!(table.pagination().page, 1);
    assert_eq!(table.projection().rows.len(), 2);
}

#[test]
fn select_all_covers_rows_outside_the_current_page() {
    let records = (0..15)
        .map(|i| Service::new(i, format!("Service {i:02}"), None))
        .collect();
    let catalog = FakeCatalog::with(records);
    let mut table = loaded(&catalog);
    table.set_query("Service 0");

    table.toggle_all();
    assert_eq!(table.selection().len(), 15);
    assert!(table.all_selected());

    table.toggle_all();
    assert!(table.selection().is_empty());
}

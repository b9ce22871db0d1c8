use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::TableError;
use crate::table::Projection;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Footer text for a table operation failure.
pub(crate) fn describe_table_error(err: &TableError) -> String {
    match err {
        TableError::PartialBulkDelete { failed, total } => {
            let ids = failed
                .iter()
                .map(|failure| failure.id.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Could not delete {} of {total} services (ids: {ids}). The list was reloaded.",
                failed.len()
            )
        }
        other => other.to_string(),
    }
}

pub(crate) fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Pagination footer, e.g. `Rows per page: 10   11–20 of 23`.
pub(crate) fn page_summary(projection: &Projection<'_>, per_page: usize) -> String {
    let range = if projection.filtered_count == 0 {
        "0 of 0".to_string()
    } else {
        format!(
            "{}–{} of {}",
            projection.offset + 1,
            projection.offset + projection.rows.len(),
            projection.filtered_count
        )
    };
    format!(
        "Rows per page: {per_page}   {range}   Page {}/{}",
        projection.page + 1,
        projection.page_count
    )
}

use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::catalog::CatalogClient;
use crate::error::TableError;
use crate::models::{DraftUpdate, NewService, ServiceId};
use crate::table::{RowIntent, ServicesTable};

use super::forms::{ConfirmBulkDelete, ServiceField, ServiceForm};
use super::helpers::{
    centered_rect, checkbox, describe_table_error, page_summary, surface_error,
};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the search box above the table.
const SEARCH_HEIGHT: u16 = 3;
/// Width of the checkbox column.
const CHECKBOX_WIDTH: u16 = 5;
/// Width of the price column.
const PRICE_WIDTH: u16 = 16;

/// Overlay currently shown on top of the table.
enum Mode {
    Normal,
    Searching,
    EditingService(ServiceForm),
    CreatingService(ServiceForm),
    ConfirmBulkDelete(ConfirmBulkDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state: the table controller, the catalog it syncs with, and
/// the bits of UI state that only matter for drawing.
pub struct App {
    client: Box<dyn CatalogClient>,
    table: ServicesTable,
    /// Highlighted row within the current page.
    cursor: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(client: Box<dyn CatalogClient>, rows_per_page: usize) -> Self {
        Self {
            client,
            table: ServicesTable::new(rows_per_page),
            cursor: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn table(&self) -> &ServicesTable {
        &self.table
    }

    /// Initial fetch. A failure is shown in the footer and the table stays
    /// empty; the user can retry with `g`.
    pub fn load(&mut self) {
        self.reload();
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching => self.handle_search(code),
            Mode::EditingService(form) => self.handle_edit_service(code, form),
            Mode::CreatingService(form) => self.handle_create_service(code, form),
            Mode::ConfirmBulkDelete(confirm) => self.handle_confirm_bulk_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible_rows().saturating_sub(1),
            KeyCode::Left | KeyCode::PageUp => {
                self.table.previous_page();
                self.cursor = 0;
            }
            KeyCode::Right | KeyCode::PageDown => {
                self.table.next_page();
                self.cursor = 0;
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.current_id() {
                    self.table.dispatch(RowIntent::Select(id));
                }
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(id) = self.current_id() {
                    self.clear_status();
                    if self.table.dispatch(RowIntent::EditRequest(id)) {
                        if let Some(draft) = self.table.edit_session().draft() {
                            return Mode::EditingService(ServiceForm::from_draft(draft));
                        }
                    }
                } else {
                    self.set_status("No service selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.table.toggle_all(),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                if self.table.store().is_empty() {
                    self.set_status("There are no services to search.", StatusKind::Error);
                } else {
                    return Mode::Searching;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.table.cycle_rows_per_page();
                self.cursor = 0;
            }
            KeyCode::Char('g') | KeyCode::Char('G') => self.reload(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('+') => {
                self.clear_status();
                return Mode::CreatingService(ServiceForm::default());
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('-') | KeyCode::Delete => {
                let count = self.table.selection().len();
                if count == 0 {
                    self.set_status("Select services with Space first.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Mode::ConfirmBulkDelete(ConfirmBulkDelete { count });
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.table.set_query("");
                self.cursor = 0;
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Backspace => {
                let mut query = self.table.query().to_string();
                query.pop();
                self.table.set_query(query);
                self.cursor = 0;
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                let mut query = self.table.query().to_string();
                query.push(ch);
                self.table.set_query(query);
                self.cursor = 0;
            }
            _ => {}
        }
        Mode::Searching
    }

    fn handle_edit_service(&mut self, code: KeyCode, mut form: ServiceForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.table.cancel_edit();
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => {
                form.backspace();
                self.sync_draft(&mut form);
            }
            KeyCode::Enter => {
                if self.table.edit_session().is_saving() {
                    self.set_status("Still saving…", StatusKind::Error);
                    return Mode::EditingService(form);
                }
                if let Err(err) = form.parse_inputs() {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                    return Mode::EditingService(form);
                }
                self.sync_draft(&mut form);

                match self.table.submit_edit(self.client.as_ref()) {
                    Ok(updated) => {
                        self.cursor = 0;
                        self.report_saved(format!("Updated {}.", updated.name));
                        return Mode::Normal;
                    }
                    Err(TableError::NoSession) => return Mode::Normal,
                    Err(err) => {
                        let message = describe_table_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                    self.sync_draft(&mut form);
                }
            }
            _ => {}
        }
        Mode::EditingService(form)
    }

    /// Mirror the form's fields into the edit session's draft.
    fn sync_draft(&mut self, form: &mut ServiceForm) {
        match form.active {
            ServiceField::Name => {
                self.table
                    .update_draft(DraftUpdate::Name(form.name.trim().to_string()));
            }
            ServiceField::Price => match form.parse_price() {
                Ok(price) => {
                    self.table.update_draft(DraftUpdate::Price(price));
                }
                Err(err) => form.error = Some(surface_error(&err)),
            },
        }
    }

    fn handle_create_service(&mut self, code: KeyCode, mut form: ServiceForm) -> Mode {
        match code {
            KeyCode::Esc => {
                // Closing the form always resynchronizes, even without a save.
                self.set_status("Add service cancelled.", StatusKind::Info);
                self.reload_quietly();
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let (name, price) = match form.parse_inputs() {
                    Ok(values) => values,
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                        return Mode::CreatingService(form);
                    }
                };

                let service = NewService { name, price };
                match self.table.create_service(self.client.as_ref(), &service) {
                    Ok(created) => {
                        self.focus(&created.id);
                        self.report_saved(format!("Added {}.", created.name));
                        return Mode::Normal;
                    }
                    Err(err) => {
                        let message = describe_table_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::CreatingService(form)
    }

    fn handle_confirm_bulk_delete(&mut self, code: KeyCode, confirm: ConfirmBulkDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.table.delete_selected(self.client.as_ref()) {
                    Ok(report) => {
                        self.report_saved(format!("Deleted {} services.", report.deleted.len()));
                    }
                    Err(err) => self.set_status(describe_table_error(&err), StatusKind::Error),
                }
                self.clamp_cursor();
                Mode::Normal
            }
            _ => Mode::ConfirmBulkDelete(confirm),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_table(frame, chunks[1], chunks[2]);
        self.draw_footer(frame, chunks[3]);

        match &self.mode {
            Mode::EditingService(form) => self.draw_service_form(frame, area, "Edit Service", form),
            Mode::CreatingService(form) => self.draw_service_form(frame, area, "Add Service", form),
            Mode::ConfirmBulkDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching | Mode::Normal => {}
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = matches!(self.mode, Mode::Searching);
        let border_style = if searching {
            Style::default().fg(Color::Yellow)
        } else if self.table.store().is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search services");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", self.table.query())))
            .block(block.clone());
        frame.render_widget(paragraph, area);

        if searching {
            let inner = block.inner(area);
            let cursor_x =
                inner.x + "Search: ".len() as u16 + self.table.query().chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, pager_area: Rect) {
        let projection = self.table.projection();
        let header_style = Style::default().add_modifier(Modifier::BOLD);

        let header = Row::new(vec![
            Cell::from(checkbox(self.table.all_selected())),
            Cell::from("Service name"),
            Cell::from("Price"),
        ])
        .style(header_style);

        let rows = projection.rows.iter().map(|service| {
            Row::new(vec![
                Cell::from(checkbox(self.table.is_selected(&service.id))),
                Cell::from(service.name.clone()),
                Cell::from(service.display_price()),
            ])
        });

        let title = self.table_title();
        let table = Table::new(
            rows,
            [
                Constraint::Length(CHECKBOX_WIDTH),
                Constraint::Min(10),
                Constraint::Length(PRICE_WIDTH),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));

        let mut state = TableState::default();
        if !projection.is_empty() {
            state.select(Some(self.cursor.min(projection.rows.len() - 1)));
        }
        frame.render_stateful_widget(table, area, &mut state);

        let summary = page_summary(&projection, self.table.pagination().per_page);
        frame.render_widget(
            Paragraph::new(summary).alignment(Alignment::Right),
            pager_area,
        );
    }

    fn table_title(&self) -> String {
        let mut title = String::from("Services");
        if !self.table.store().is_loaded() {
            title.push_str(" (not loaded)");
        } else if self.table.is_stale() {
            title.push_str(" (out of date)");
        }
        title
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from(format!("{} selected", self.table.selection().len()))
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Searching => Line::from(vec![
                Span::styled("[Type]", key_style),
                Span::raw(" Filter   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Keep   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear"),
            ]),
            Mode::EditingService(_) | Mode::CreatingService(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmBulkDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[Space]", key_style),
                Span::raw(" Select   "),
                Span::styled("[A]", key_style),
                Span::raw(" All   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[N]", key_style),
                Span::raw(" New   "),
                Span::styled("[D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[/]", key_style),
                Span::raw(" Search   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Page   "),
                Span::styled("[R]", key_style),
                Span::raw(" Rows   "),
                Span::styled("[G]", key_style),
                Span::raw(" Reload   "),
                Span::styled("[Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_service_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &ServiceForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let name_line = form.build_line("Name", ServiceField::Name);
        let price_line = form.build_line("Price", ServiceField::Price);
        let preview = Line::from(Span::styled(
            format!("Shown as: {}", form.price_preview()),
            Style::default().fg(Color::Gray),
        ));

        let mut lines = vec![name_line, price_line, preview, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            ServiceField::Name => (
                inner.x + "Name: ".len() as u16 + form.value_len(ServiceField::Name) as u16,
                inner.y,
            ),
            ServiceField::Price => (
                inner.x + "Price: ".len() as u16 + form.value_len(ServiceField::Price) as u16,
                inner.y + 1,
            ),
        };
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBulkDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let noun = if confirm.count == 1 { "service" } else { "services" };
        let lines = vec![
            Line::from(format!("Delete {} selected {noun}?", confirm.count)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Success message, downgraded to a warning when the refetch after the
    /// write failed.
    fn report_saved(&mut self, message: String) {
        if self.table.is_stale() {
            self.set_status(
                format!("{message} Reloading the list failed; press G to retry."),
                StatusKind::Error,
            );
        } else {
            self.set_status(message, StatusKind::Info);
        }
    }

    fn reload(&mut self) {
        match self.table.refresh(self.client.as_ref()) {
            Ok(count) => self.set_status(format!("Loaded {count} services."), StatusKind::Info),
            Err(err) => self.set_status(describe_table_error(&err), StatusKind::Error),
        }
        self.clamp_cursor();
    }

    fn reload_quietly(&mut self) {
        if let Err(err) = self.table.refresh(self.client.as_ref()) {
            self.set_status(describe_table_error(&err), StatusKind::Error);
        }
        self.clamp_cursor();
    }

    /// Move to the page holding `id` and highlight it.
    fn focus(&mut self, id: &ServiceId) {
        let per_page = self.table.pagination().per_page.max(1);
        let position = crate::table::filter(self.table.store().records(), self.table.query())
            .iter()
            .position(|service| &service.id == id);
        if let Some(idx) = position {
            self.table.set_page(idx / per_page);
            self.cursor = idx % per_page;
        } else {
            self.clamp_cursor();
        }
    }

    fn visible_rows(&self) -> usize {
        self.table.projection().rows.len()
    }

    fn current_id(&self) -> Option<ServiceId> {
        self.table
            .projection()
            .rows
            .get(self.cursor)
            .map(|service| service.id.clone())
    }

    fn move_cursor(&mut self, offset: isize) {
        let rows = self.visible_rows();
        if rows == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + offset).clamp(0, rows as isize - 1);
        self.cursor = next as usize;
    }

    fn clamp_cursor(&mut self) {
        let rows = self.visible_rows();
        if self.cursor >= rows {
            self.cursor = rows.saturating_sub(1);
        }
    }
}

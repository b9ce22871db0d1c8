use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{format_price, parse_price, ServiceDraft};

/// Text buffers behind the create/edit service dialog.
#[derive(Default, Clone)]
pub(crate) struct ServiceForm {
    pub(crate) name: String,
    pub(crate) price: String,
    pub(crate) active: ServiceField,
    pub(crate) error: Option<String>,
}

/// Fields available within the service form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ServiceField {
    #[default]
    Name,
    Price,
}

impl ServiceForm {
    /// Populate the form from the edit session's draft.
    pub(crate) fn from_draft(draft: &ServiceDraft) -> Self {
        Self {
            name: draft.name.clone(),
            price: draft.price.map(format_plain_price).unwrap_or_default(),
            active: ServiceField::Name,
            error: None,
        }
    }

    /// Swap focus between the name and price fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ServiceField::Name => ServiceField::Price,
            ServiceField::Price => ServiceField::Name,
        };
    }

    /// Append a character to the active field. The price only takes digits
    /// and a single decimal separator.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            ServiceField::Name => {
                if !ch.is_control() {
                    self.name.push(ch);
                    true
                } else {
                    false
                }
            }
            ServiceField::Price => {
                let has_separator = self.price.contains(['.', ',']);
                if ch.is_ascii_digit() || (matches!(ch, '.' | ',') && !has_separator) {
                    self.price.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            ServiceField::Name => {
                self.name.pop();
            }
            ServiceField::Price => {
                self.price.pop();
            }
        }
    }

    /// Typed price, `None` when the field is blank.
    pub(crate) fn parse_price(&self) -> Result<Option<f64>> {
        parse_price(&self.price).map_err(|_| anyhow!("Price must be a number."))
    }

    /// Values ready to send to the catalog.
    pub(crate) fn parse_inputs(&self) -> Result<(String, Option<f64>)> {
        let price = self.parse_price()?;
        Ok((self.name.trim().to_string(), price))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: ServiceField) -> Line<'static> {
        let value = match field {
            ServiceField::Name => &self.name,
            ServiceField::Price => &self.price,
        };
        let is_active = self.active == field;

        let display = if value.is_empty() {
            match field {
                ServiceField::Name => "<name>".to_string(),
                ServiceField::Price => "<none>".to_string(),
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: ServiceField) -> usize {
        match field {
            ServiceField::Name => self.name.chars().count(),
            ServiceField::Price => self.price.chars().count(),
        }
    }

    /// How the price will be shown once saved.
    pub(crate) fn price_preview(&self) -> String {
        format_price(self.parse_price().ok().flatten())
    }
}

/// Editable text for a price, without the currency suffix.
fn format_plain_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Pending bulk delete awaiting confirmation.
#[derive(Clone)]
pub(crate) struct ConfirmBulkDelete {
    pub(crate) count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_field_rejects_letters_and_second_separator() {
        let mut form = ServiceForm::default();
        form.toggle_field();

        assert!(form.push_char('1'));
        assert!(form.push_char(','));
        assert!(!form.push_char('.'));
        assert!(!form.push_char('x'));
        assert!(form.push_char('5'));
        assert_eq!(form.parse_price().unwrap(), Some(1.5));
        assert_eq!(form.price_preview(), "1.50 zł");
    }

    #[test]
    fn draft_prefills_both_fields() {
        let form = ServiceForm::from_draft(&ServiceDraft {
            name: "Haircut".into(),
            price: Some(30.0),
        });
        assert_eq!(form.name, "Haircut");
        assert_eq!(form.price, "30.00");

        let empty = ServiceForm::from_draft(&ServiceDraft {
            name: "Coloring".into(),
            price: None,
        });
        assert_eq!(empty.price, "");
        assert_eq!(empty.parse_inputs().unwrap(), ("Coloring".to_string(), None));
    }

    #[test]
    fn backspace_edits_active_field_only() {
        let mut form = ServiceForm::from_draft(&ServiceDraft {
            name: "Cut".into(),
            price: Some(10.0),
        });
        form.backspace();
        assert_eq!(form.name, "Cu");
        assert_eq!(form.price, "10.00");
    }
}

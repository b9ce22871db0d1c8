//! Domain models exchanged with the catalog backends and rendered by the TUI.
//! The types stay light-weight data holders; ordering, filtering and
//! selection live in the `table` module.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder shown in the price column when no price is set.
pub const PRICE_PLACEHOLDER: &str = "-";
/// Currency suffix appended to formatted prices.
pub const CURRENCY_SUFFIX: &str = "zł";

/// Opaque identifier assigned by the remote store. The client never mints
/// one; it only echoes back what the store handed out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! impl_id_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ServiceId {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

impl_id_from_int!(i32, i64, u32, u64);

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ServiceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Stores disagree on whether keys are integers or strings (UUIDs).
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(value) => ServiceId::from(value),
            RawId::Text(value) => ServiceId(value),
        })
    }
}

/// A single catalog entry as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    /// Display name; sorted and searched case-insensitively.
    #[serde(rename = "nazwa")]
    pub name: String,
    /// `None` means "no price set".
    #[serde(rename = "cena", default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,
}

impl Service {
    pub fn new(id: impl Into<ServiceId>, name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Price column text, e.g. `30.00 zł` or `-`.
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fields of a service that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewService {
    #[serde(rename = "nazwa")]
    pub name: String,
    #[serde(rename = "cena")]
    pub price: Option<f64>,
}

/// Editable payload sent with an update. Always carries every field so the
/// store receives the full draft.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ServiceDraft {
    #[serde(rename = "nazwa")]
    pub name: String,
    #[serde(rename = "cena")]
    pub price: Option<f64>,
}

impl ServiceDraft {
    pub fn from_service(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            price: service.price,
        }
    }

    /// Merge a single field change, leaving the other field untouched.
    pub fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Name(name) => self.name = name,
            DraftUpdate::Price(price) => self.price = price,
        }
    }
}

/// One field-level change to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    Name(String),
    Price(Option<f64>),
}

/// Render a price with two decimals and the currency suffix, or the
/// placeholder glyph when it is missing or not a finite number. Halves round
/// away from zero (`2.125` shows as `2.13`); values whose binary form sits
/// just under a half still round down.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) if value.is_finite() => {
            let rounded = (value * 100.0).round() / 100.0;
            format!("{rounded:.2} {CURRENCY_SUFFIX}")
        }
        _ => PRICE_PLACEHOLDER.to_string(),
    }
}

/// Parse user or wire text into a price. Blank text means "no price"; a comma
/// is accepted as the decimal separator.
pub fn parse_price(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed.replace(',', ".").parse::<f64>()?;
    Ok(Some(value))
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    // Decimal columns often come back as strings ("30.00"); unparseable text
    // degrades to "no price" instead of failing the whole listing.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RawPrice>::deserialize(deserializer)? {
        None => None,
        Some(RawPrice::Number(value)) => Some(value),
        Some(RawPrice::Text(text)) => parse_price(&text).ok().flatten(),
    })
}

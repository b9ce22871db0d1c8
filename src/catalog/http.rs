//! JSON-over-HTTP catalog client.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, USER_AGENT};

use super::CatalogClient;
use crate::error::CatalogError;
use crate::models::{NewService, Service, ServiceDraft, ServiceId};

/// Collection path relative to the configured base URL.
const SERVICES_PATH: &str = "/api/uslugi";

/// Client for the remote services endpoint.
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Build a client with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogError::from)?;

        Ok(Self::with_client(base_url, client))
    }

    /// Wrap an already configured client.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{SERVICES_PATH}", self.base_url)
    }

    fn item_url(&self, id: &ServiceId) -> String {
        format!("{}{SERVICES_PATH}/{id}", self.base_url)
    }

    fn user_agent() -> String {
        format!("services-table/{}", env!("CARGO_PKG_VERSION"))
    }
}

/// Turn non-2xx responses into `CatalogError::Status`, keeping the body as
/// the message when the server sent one.
fn check_status(response: Response, id: Option<&ServiceId>) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 404 {
        if let Some(id) = id {
            return Err(CatalogError::NotFound(id.clone()));
        }
    }

    let message = response
        .text()
        .ok()
        .filter(|body| !body.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    warn!("event=catalog_http module=catalog status=error code={}", status.as_u16());
    Err(CatalogError::Status {
        status: status.as_u16(),
        message,
    })
}

impl CatalogClient for HttpCatalog {
    fn list(&self) -> Result<Vec<Service>, CatalogError> {
        debug!("event=catalog_list module=catalog url={}", self.collection_url());
        let response = self
            .client
            .get(self.collection_url())
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        let services = check_status(response, None)?.json::<Vec<Service>>()?;
        Ok(services)
    }

    fn create(&self, service: &NewService) -> Result<Service, CatalogError> {
        debug!("event=catalog_create module=catalog");
        let response = self
            .client
            .post(self.collection_url())
            .header(USER_AGENT, Self::user_agent())
            .json(service)
            .send()?;
        Ok(check_status(response, None)?.json::<Service>()?)
    }

    fn update(&self, id: &ServiceId, draft: &ServiceDraft) -> Result<Service, CatalogError> {
        debug!("event=catalog_update module=catalog id={id}");
        let response = self
            .client
            .put(self.item_url(id))
            .header(USER_AGENT, Self::user_agent())
            .json(draft)
            .send()?;
        let response = check_status(response, Some(id))?;

        // Some deployments answer updates with an empty body; the list refetch
        // that follows is what the table trusts anyway.
        let body = response.text()?;
        if body.trim().is_empty() {
            return Ok(Service {
                id: id.clone(),
                name: draft.name.clone(),
                price: draft.price,
            });
        }
        serde_json::from_str(&body).map_err(|err| CatalogError::Decode(err.to_string()))
    }

    fn delete(&self, id: &ServiceId) -> Result<(), CatalogError> {
        debug!("event=catalog_delete module=catalog id={id}");
        let response = self
            .client
            .delete(self.item_url(id))
            .header(USER_AGENT, Self::user_agent())
            .send()?;
        check_status(response, Some(id))?;
        Ok(())
    }
}

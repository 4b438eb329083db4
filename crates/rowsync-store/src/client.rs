//! PocketBase-style record store client.
//!
//! Thin authenticated wrapper over the store's JSON CRUD API. All calls are
//! blocking with a fixed timeout; a timeout is reported like any other
//! transport failure.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use rowsync_model::{LookupMatch, RecordStore, RemoteRecord, StoreError, StoreResult};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<RemoteRecord>,
}

/// Client for one record store instance.
pub struct StoreClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl StoreClient {
    /// Creates an unauthenticated client for the given base URL.
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Logs in as an admin and applies the returned bearer token to all
    /// subsequent calls. A 2xx response without a token is an auth error.
    pub fn authenticate(&mut self, identity: &str, password: &str) -> StoreResult<()> {
        let url = format!("{}/api/admins/auth-with-password", self.base_url);
        debug!(url = %url, identity = %identity, "authenticating");
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "identity": identity, "password": password }))
            .send()
            .map_err(|err| StoreError::Auth(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(StoreError::Auth(format!("status {status}: {body}")));
        }
        let auth: AuthResponse = response
            .json()
            .map_err(|err| StoreError::Auth(err.to_string()))?;
        match auth.token {
            Some(token) if !token.is_empty() => {
                self.token = Some(token);
                Ok(())
            }
            _ => Err(StoreError::Auth(
                "login succeeded but token missing".to_string(),
            )),
        }
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{collection}/records", self.base_url)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .with_auth(builder)
            .send()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            Err(StoreError::Api { status, body })
        }
    }
}

/// Builds the store's exact or substring filter expression for one field.
pub(crate) fn filter_expr(field: &str, value: &str, match_mode: LookupMatch) -> String {
    let operator = match match_mode {
        LookupMatch::Exact => "=",
        LookupMatch::Contains => "~",
    };
    format!("{field}{operator}\"{}\"", escape_filter_value(value))
}

/// Escapes backslashes and double quotes so the probe value cannot break
/// out of the quoted filter literal.
pub(crate) fn escape_filter_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

impl RecordStore for StoreClient {
    fn find(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        match_mode: LookupMatch,
    ) -> StoreResult<Option<RemoteRecord>> {
        let filter = filter_expr(field, value, match_mode);
        debug!(collection = %collection, filter = %filter, "lookup");
        let response = self.send(
            self.client
                .get(self.records_url(collection))
                .query(&[("filter", filter.as_str()), ("perPage", "1")]),
        )?;
        let list: ListResponse = response
            .json()
            .map_err(|err| StoreError::Network(err.to_string()))?;
        Ok(list.items.into_iter().next())
    }

    fn create(&self, collection: &str, payload: &Map<String, Value>) -> StoreResult<RemoteRecord> {
        debug!(collection = %collection, fields = payload.len(), "create");
        let response = self.send(self.client.post(self.records_url(collection)).json(payload))?;
        response
            .json()
            .map_err(|err| StoreError::Network(err.to_string()))
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<RemoteRecord> {
        debug!(collection = %collection, id = %id, fields = fields.len(), "update");
        let url = format!("{}/{id}", self.records_url(collection));
        let response = self.send(self.client.patch(url).json(fields))?;
        response
            .json()
            .map_err(|err| StoreError::Network(err.to_string()))
    }
}

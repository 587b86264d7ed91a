//! REST client for the table-settings endpoints.
//!
//! Each view family has its own endpoint:
//!
//! ```text
//! GET    {base}/{path}?userId=..&pageId=..   -> [row, ...] or {"data": [row, ...]}
//! POST   {base}/{path}                       -> {"insertId": ..}
//! PUT    {base}/{path}/{id}
//! DELETE {base}/{path}/{id}
//! ```
//!
//! Filter-family lists also send `tf_active=1` and creates carry
//! `tf_active: 1`, so only active filter views come back.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use gridview_core::snapshot::{NewSnapshot, SnapshotPatch, ViewKind, ViewSnapshot};
use gridview_core::types::{DbId, UserId};
use gridview_core::wire;

use crate::backend::{BackendError, SettingsBackend};
use crate::config::ClientConfig;

/// HTTP client for one settings API deployment.
pub struct HttpSettingsBackend {
    client: reqwest::Client,
    api_url: String,
    column_path: String,
    filter_path: String,
}

/// List responses come back either bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse {
    Rows(Vec<ViewSnapshot>),
    Wrapped { data: Vec<ViewSnapshot> },
}

impl ListResponse {
    fn into_rows(self) -> Vec<ViewSnapshot> {
        match self {
            ListResponse::Rows(rows) | ListResponse::Wrapped { data: rows } => rows,
        }
    }
}

/// Response returned by the create endpoint.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(rename = "insertId", alias = "id", deserialize_with = "wire::id")]
    insert_id: DbId,
}

impl HttpSettingsBackend {
    /// Create a client from configuration, applying the configured
    /// request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            column_path: config.path_for(ViewKind::Columns).trim_matches('/').to_string(),
            filter_path: config.path_for(ViewKind::Filters).trim_matches('/').to_string(),
        }
    }

    fn endpoint(&self, kind: ViewKind) -> String {
        let path = match kind {
            ViewKind::Columns => &self.column_path,
            ViewKind::Filters => &self.filter_path,
        };
        format!("{}/{}", self.api_url, path)
    }

    fn row_url(&self, kind: ViewKind, id: DbId) -> String {
        format!("{}/{}", self.endpoint(kind), id)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`BackendError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), BackendError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// JSON body for a create call. Filter rows are created active.
fn create_body(kind: ViewKind, snapshot: &NewSnapshot) -> Result<Value, BackendError> {
    let mut body = serde_json::to_value(snapshot).map_err(BackendError::Encode)?;
    if let (ViewKind::Filters, Value::Object(map)) = (kind, &mut body) {
        map.insert("tf_active".into(), Value::from(1));
    }
    Ok(body)
}

#[async_trait]
impl SettingsBackend for HttpSettingsBackend {
    async fn list(
        &self,
        kind: ViewKind,
        owner_id: UserId,
        page_id: &str,
    ) -> Result<Vec<ViewSnapshot>, BackendError> {
        let url = self.endpoint(kind);
        let owner = owner_id.to_string();
        let mut query = vec![("userId", owner.as_str()), ("pageId", page_id)];
        if kind == ViewKind::Filters {
            query.push(("tf_active", "1"));
        }
        tracing::debug!(%url, %kind, owner_id, page_id, "Listing saved views");

        let response = self.client.get(&url).query(&query).send().await?;
        let rows = Self::parse_response::<ListResponse>(response).await?.into_rows();
        Ok(rows)
    }

    async fn create(&self, kind: ViewKind, snapshot: &NewSnapshot) -> Result<DbId, BackendError> {
        let url = self.endpoint(kind);
        let body = create_body(kind, snapshot)?;
        tracing::debug!(%url, %kind, page_id = %snapshot.page_id, "Creating saved view");

        let response = self.client.post(&url).json(&body).send().await?;
        let created: CreateResponse = Self::parse_response(response).await?;
        Ok(created.insert_id)
    }

    async fn update(
        &self,
        kind: ViewKind,
        id: DbId,
        patch: &SnapshotPatch,
    ) -> Result<(), BackendError> {
        let url = self.row_url(kind, id);
        tracing::debug!(%url, %kind, id, "Updating saved view");

        let response = self.client.put(&url).json(patch).send().await?;
        Self::check_status(response).await
    }

    async fn delete(&self, kind: ViewKind, id: DbId) -> Result<(), BackendError> {
        let url = self.row_url(kind, id);
        tracing::debug!(%url, %kind, id, "Deleting saved view");

        let response = self.client.delete(&url).send().await?;
        Self::check_status(response).await
    }
}

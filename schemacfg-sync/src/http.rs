//! HTTP implementation of [`SchemaClient`].
//!
//! Talks to the REST schema endpoints of a connector:
//! - `GET    {base}/v1/connectors/{id}/schemas`
//! - `POST   {base}/v1/connectors/{id}/schemas/reload`
//! - `PATCH  {base}/v1/connectors/{id}/schemas`
//!
//! `{id}` is percent-encoded as a single path segment.
//!
//! Credentials are not handled here; pass a pre-configured `reqwest::Client`
//! through [`HttpSchemaClient::with_client`] when the API requires them.

use crate::client::SchemaClient;
use crate::error::{SyncError, SyncResult};
use crate::remote::{
    ApiResponse, NOT_FOUND_SCHEMA_CONFIG, ReloadExcludeMode, ReloadRequest, RemoteSchemaConfig,
    SchemaPatch,
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the HTTP schema client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Base URL of the remote API (e.g. `https://api.fivetran.com`).
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.fivetran.com".to_string(),
            timeout_secs: 60,
            user_agent: concat!("schemacfg/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Schema client backed by `reqwest`.
pub struct HttpSchemaClient {
    config: HttpClientConfig,
    client: Client,
}

impl HttpSchemaClient {
    /// Creates a client with its own connection pool.
    pub fn new(config: HttpClientConfig) -> SyncResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    /// Creates a client around an existing `reqwest::Client`.
    pub fn with_client(config: HttpClientConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn schemas_url(&self, connector_id: &str) -> String {
        format!(
            "{}/v1/connectors/{}/schemas",
            self.config.api_base_url.trim_end_matches('/'),
            urlencoding::encode(connector_id)
        )
    }

    /// Maps a non-success response to the matching error, keeping the remote
    /// code and message.
    async fn error_from(response: Response) -> SyncError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        {
            Ok(envelope) => (envelope.code, envelope.message.unwrap_or_default()),
            Err(_) => (status.as_str().to_string(), body),
        };

        if code == NOT_FOUND_SCHEMA_CONFIG {
            return SyncError::SchemaConfigNotInitialized { code, message };
        }
        SyncError::Remote {
            status: status.as_u16(),
            code,
            message,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        envelope.data.ok_or_else(|| {
            SyncError::MalformedResponse(format!("response {} has no data", envelope.code))
        })
    }

    async fn expect_success(response: Response) -> SyncResult<()> {
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaClient for HttpSchemaClient {
    async fn fetch_schema_config(&self, connector_id: &str) -> SyncResult<RemoteSchemaConfig> {
        let url = self.schemas_url(connector_id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn reload_schema_config(
        &self,
        connector_id: &str,
        exclude_mode: ReloadExcludeMode,
    ) -> SyncResult<()> {
        let url = format!("{}/reload", self.schemas_url(connector_id));
        info!("Reloading schema config for connector {}", connector_id);
        let response = self
            .client
            .post(&url)
            .json(&ReloadRequest { exclude_mode })
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn apply_patch(&self, connector_id: &str, patch: &SchemaPatch) -> SyncResult<()> {
        let url = self.schemas_url(connector_id);
        debug!("PATCH {} ({} entries)", url, patch.entry_count());
        let response = self.client.patch(&url).json(patch).send().await?;
        if let Err(e) = Self::expect_success(response).await {
            warn!("Schema patch for connector {} failed: {}", connector_id, e);
            return Err(e);
        }
        Ok(())
    }
}

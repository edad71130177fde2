//! Portainer implementation of [`ContainerApi`].
//!
//! Talks to the Docker API that Portainer proxies under
//! `{base}/endpoints/{endpoint}/docker`, authenticating every request with
//! the `X-API-Key` header.

use fleetctl_common::config::FleetConfig;
use fleetctl_common::constants::API_KEY_HEADER;
use fleetctl_common::error::{FleetError, Result};
use fleetctl_common::types::{Action, ContainerId};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::api::{ActionResponse, ContainerApi, ContainerSummary};
use crate::error::ActionRequestError;

/// Blocking HTTP client for one Portainer endpoint.
#[derive(Debug, Clone)]
pub struct PortainerClient {
    http: Client,
    docker_url: String,
}

impl PortainerClient {
    /// Creates a client for the endpoint named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn new(config: &FleetConfig) -> Result<Self> {
        Self::with_builder(config, Client::builder())
    }

    /// Creates a client on top of a caller-supplied builder.
    ///
    /// The API key header and the configured timeout are added to `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be built.
    pub fn with_builder(config: &FleetConfig, builder: ClientBuilder) -> Result<Self> {
        let mut key = HeaderValue::from_str(config.api_key.expose())
            .map_err(|_| FleetError::config("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);

        let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
            .map_err(|e| FleetError::config(format!("invalid header name: {e}")))?;
        let mut headers = HeaderMap::new();
        let _ = headers.insert(name, key);

        let mut builder = builder.default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FleetError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            docker_url: format!(
                "{}/endpoints/{}/docker",
                config.base_url, config.endpoint_id
            ),
        })
    }

    /// URL listing every container, stopped ones included.
    #[must_use]
    pub fn containers_url(&self) -> String {
        format!("{}/containers/json?all=true", self.docker_url)
    }

    /// URL performing `action` on the container `id`.
    #[must_use]
    pub fn action_url(&self, id: &ContainerId, action: Action) -> String {
        format!("{}/containers/{id}/{action}", self.docker_url)
    }
}

impl ContainerApi for PortainerClient {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let url = self.containers_url();
        tracing::debug!(url = %url, "listing containers");

        let transport = |e: reqwest::Error| FleetError::Transport {
            url: url.clone(),
            message: e.to_string(),
        };

        let response = self.http.get(&url).send().map_err(transport)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;

        if !status.is_success() {
            return Err(FleetError::Retrieval {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn container_action(
        &self,
        id: &ContainerId,
        action: Action,
    ) -> std::result::Result<ActionResponse, ActionRequestError> {
        let url = self.action_url(id, action);
        tracing::debug!(url = %url, "sending container action");

        let transport = |e: reqwest::Error| ActionRequestError::Transport {
            message: e.to_string(),
        };

        let response = self.http.post(&url).send().map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;
        Ok(ActionResponse { status, body })
    }
}

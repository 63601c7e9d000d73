//! HTTP catalog provider.

use crate::config::{ClientConfig, ClientError};
use std::future::Future;
use std::pin::Pin;
use studio_booking_core::gateway::{CatalogError, CatalogProvider, CatalogResult};
use studio_booking_core::types::{Formation, Service};

/// Catalog provider backed by the booking backend's REST API
///
/// Loads the full offering set in one request per kind; there is no
/// pagination. Inactive offerings are filtered out client-side, so a
/// backend that returns them anyway never reaches the flow.
#[derive(Clone, Debug)]
pub struct HttpCatalogProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogProvider {
    /// Creates a provider for the configured backend
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: config.build_http_client()?,
            base_url: config.base_url.clone(),
        })
    }

    async fn fetch<T>(client: reqwest::Client, url: String) -> CatalogResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| CatalogError::Unreachable {
                message: error.to_string(),
            })?;

        response
            .json::<Vec<T>>()
            .await
            .map_err(|error| CatalogError::Malformed {
                message: error.to_string(),
            })
    }
}

impl CatalogProvider for HttpCatalogProvider {
    fn list_services(&self) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Service>>> + Send>> {
        let client = self.client.clone();
        let url = format!("{}/api/services", self.base_url);

        Box::pin(async move {
            let services = Self::fetch::<Service>(client, url).await?;
            let services: Vec<Service> = services.into_iter().filter(|s| s.is_active).collect();
            tracing::debug!(count = services.len(), "services loaded");
            Ok(services)
        })
    }

    fn list_formations(
        &self,
    ) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Formation>>> + Send>> {
        let client = self.client.clone();
        let url = format!("{}/api/formations", self.base_url);

        Box::pin(async move {
            let formations = Self::fetch::<Formation>(client, url).await?;
            let formations: Vec<Formation> =
                formations.into_iter().filter(|f| f.is_active).collect();
            tracing::debug!(count = formations.len(), "formations loaded");
            Ok(formations)
        })
    }
}

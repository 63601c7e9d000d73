//! HTTP submission gateway.

use crate::config::{ClientConfig, ClientError};
use std::future::Future;
use std::pin::Pin;
use studio_booking_core::gateway::{
    SubmissionError, SubmissionGateway, SubmissionRequest, SubmissionResult,
};
use studio_booking_core::types::ReservationConfirmation;

/// Header carrying the client-generated idempotency key
///
/// The key is stable across retries of the same draft, so the backend can
/// deduplicate a reservation that was accepted just before a network
/// failure.
const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Submission gateway backed by the booking backend's REST API
///
/// The request timeout configured on the client bounds an in-flight
/// submission: when it elapses the call resolves to
/// [`SubmissionError::Timeout`] and the flow stays at the confirm step with
/// a retry affordance.
#[derive(Clone, Debug)]
pub struct HttpSubmissionGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSubmissionGateway {
    /// Creates a gateway for the configured backend
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
}

impl SubmissionGateway for HttpSubmissionGateway {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Pin<Box<dyn Future<Output = SubmissionResult> + Send>> {
        let client = self.client.clone();
        let url = format!("{}/api/reservations", self.base_url);

        Box::pin(async move {
            let response = client
                .post(&url)
                .header(
                    IDEMPOTENCY_KEY_HEADER,
                    request.idempotency_key.to_string(),
                )
                .json(&request.draft)
                .send()
                .await
                .map_err(|error| {
                    if error.is_timeout() {
                        SubmissionError::Timeout
                    } else {
                        SubmissionError::Network {
                            message: error.to_string(),
                        }
                    }
                })?;

            let status = response.status();
            if status.is_success() {
                let confirmation: ReservationConfirmation =
                    response
                        .json()
                        .await
                        .map_err(|error| SubmissionError::Network {
                            message: error.to_string(),
                        })?;
                tracing::info!(
                    idempotency_key = %request.idempotency_key,
                    reference = %confirmation.reference,
                    "reservation accepted"
                );
                return Ok(confirmation);
            }

            tracing::warn!(
                idempotency_key = %request.idempotency_key,
                status = %status,
                "reservation refused"
            );
            if status.is_client_error() {
                let reason = response
                    .text()
                    .await
                    .unwrap_or_else(|_| status.to_string());
                Err(SubmissionError::Rejected { reason })
            } else {
                Err(SubmissionError::Unavailable)
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use studio_booking_core::types::ReservationDraft;
    use uuid::Uuid;

    #[tokio::test]
    async fn unreachable_backend_maps_to_network_error() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 1,
            ..ClientConfig::default()
        };
        let gateway = HttpSubmissionGateway::new(&config).unwrap();

        let error = gateway
            .submit(SubmissionRequest {
                draft: ReservationDraft::default(),
                idempotency_key: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            SubmissionError::Network { .. } | SubmissionError::Timeout
        ));
    }
}

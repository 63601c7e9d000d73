//! Collaborator interfaces at the boundary of the reservation flow.
//!
//! Two external collaborators exist: the catalog provider, which supplies
//! the bookable offerings, and the submission gateway, which accepts a
//! finalized draft. Both are abstracted behind traits with boxed-future
//! methods so the engine can run against HTTP implementations in production
//! and scripted mocks in tests.

use crate::types::{Formation, ReservationConfirmation, ReservationDraft, Service};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

/// Catalog provider result
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Submission gateway result
pub type SubmissionResult = Result<ReservationConfirmation, SubmissionError>;

/// Error loading the offering catalog
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The catalog endpoint could not be reached
    #[error("catalog unreachable: {message}")]
    Unreachable {
        /// Transport-level detail
        message: String,
    },
    /// The catalog payload could not be decoded
    #[error("malformed catalog payload: {message}")]
    Malformed {
        /// Decoding detail
        message: String,
    },
}

/// Error submitting a finalized reservation draft
///
/// Every variant is recoverable by retry from the confirm step; none of them
/// advances the flow.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The backend rejected the draft
    #[error("reservation rejected: {reason}")]
    Rejected {
        /// Rejection reason communicated to the visitor
        reason: String,
    },
    /// The gateway did not answer in time
    #[error("submission timed out")]
    Timeout,
    /// Transport-level failure
    #[error("network error: {message}")]
    Network {
        /// Transport detail
        message: String,
    },
    /// The backend is temporarily unavailable
    #[error("booking service unavailable")]
    Unavailable,
}

/// A finalized draft plus the retry-safety key
///
/// The idempotency key is generated client-side when a draft is first
/// submitted and reused verbatim on every retry of the same draft, so a
/// reservation that was accepted just before a network failure is not
/// duplicated by the retry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// The reservation draft being submitted
    pub draft: ReservationDraft,
    /// Client-generated idempotency key, stable across retries
    pub idempotency_key: Uuid,
}

/// Catalog provider trait
///
/// Supplies the bookable offerings. Implementations return active offerings
/// only; inactive ones must never be offered for new bookings. The full set
/// is loaded at once - there is no pagination contract.
pub trait CatalogProvider: Send + Sync {
    /// Lists the active services
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be loaded.
    fn list_services(&self) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Service>>> + Send>>;

    /// Lists the active formations
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the catalog cannot be loaded.
    fn list_formations(
        &self,
    ) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Formation>>> + Send>>;
}

/// Submission gateway trait
///
/// Accepts a finalized reservation. A call either resolves to a
/// [`ReservationConfirmation`] or to a [`SubmissionError`]; the flow stays
/// at the confirm step and offers a retry on error.
pub trait SubmissionGateway: Send + Sync {
    /// Submits a finalized reservation draft
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError`] when the reservation was not accepted.
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Pin<Box<dyn Future<Output = SubmissionResult> + Send>>;
}

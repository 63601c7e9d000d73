//! Mock implementations of the collaborator traits.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use studio_booking_core::environment::Clock;
use studio_booking_core::gateway::{
    CatalogProvider, CatalogResult, SubmissionError, SubmissionGateway, SubmissionRequest,
    SubmissionResult,
};
use studio_booking_core::types::{Formation, ReservationConfirmation, Service};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making availability windows reproducible.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// The reference instant of the scenario tests: Tuesday 2025-06-10, 08:00 UTC
///
/// # Panics
///
/// Never in practice; the hardcoded timestamp always parses.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_clock() -> FixedClock {
    FixedClock::new(
        DateTime::parse_from_rfc3339("2025-06-10T08:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc),
    )
}

/// Catalog provider over a fixed offering list
///
/// Inactive offerings are filtered out on every listing, like a real
/// provider would.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    services: Vec<Service>,
    formations: Vec<Formation>,
}

impl InMemoryCatalog {
    /// Creates a catalog over the given offerings
    #[must_use]
    pub const fn new(services: Vec<Service>, formations: Vec<Formation>) -> Self {
        Self {
            services,
            formations,
        }
    }
}

impl CatalogProvider for InMemoryCatalog {
    fn list_services(&self) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Service>>> + Send>> {
        let services: Vec<Service> = self
            .services
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        Box::pin(async move { Ok(services) })
    }

    fn list_formations(
        &self,
    ) -> Pin<Box<dyn Future<Output = CatalogResult<Vec<Formation>>> + Send>> {
        let formations: Vec<Formation> = self
            .formations
            .iter()
            .filter(|f| f.is_active)
            .cloned()
            .collect();
        Box::pin(async move { Ok(formations) })
    }
}

/// Scriptable submission gateway
///
/// Pops scripted outcomes first, then falls back to the configured default
/// (success unless built with [`MockSubmissionGateway::failing`]). Every
/// received request is recorded for assertions. Clones share the script and
/// the request log.
#[derive(Clone, Debug)]
pub struct MockSubmissionGateway {
    scripted: Arc<Mutex<VecDeque<SubmissionResult>>>,
    requests: Arc<Mutex<Vec<SubmissionRequest>>>,
    fallback: Option<SubmissionError>,
    latency: Option<Duration>,
}

impl MockSubmissionGateway {
    /// A gateway that accepts every submission
    #[must_use]
    pub fn succeeding() -> Self {
        Self {
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fallback: None,
            latency: None,
        }
    }

    /// A gateway that refuses every submission with `error`
    #[must_use]
    pub fn failing(error: SubmissionError) -> Self {
        Self {
            fallback: Some(error),
            ..Self::succeeding()
        }
    }

    /// Prepends scripted outcomes consumed before the fallback applies
    #[must_use]
    pub fn with_scripted(self, outcomes: impl IntoIterator<Item = SubmissionResult>) -> Self {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(outcomes);
        self
    }

    /// Adds artificial latency before each answer
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Wraps this gateway for sharing as a trait object
    #[must_use]
    pub fn shared(self) -> Arc<dyn SubmissionGateway> {
        Arc::new(self)
    }

    /// Every request received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_outcome(&self, sequence: usize) -> SubmissionResult {
        let scripted = self
            .scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        scripted.unwrap_or_else(|| match &self.fallback {
            Some(error) => Err(error.clone()),
            None => Ok(ReservationConfirmation {
                reference: format!("RES-{sequence:04}"),
                received_at: test_clock().now(),
            }),
        })
    }
}

impl SubmissionGateway for MockSubmissionGateway {
    fn submit(
        &self,
        request: SubmissionRequest,
    ) -> Pin<Box<dyn Future<Output = SubmissionResult> + Send>> {
        let sequence = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(request);
            requests.len()
        };
        let outcome = self.next_outcome(sequence);
        let latency = self.latency;

        Box::pin(async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            outcome
        })
    }
}

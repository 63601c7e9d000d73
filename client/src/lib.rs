//! # Studio Booking Client
//!
//! HTTP implementations of the collaborator traits defined in
//! `studio-booking-core`:
//!
//! - [`catalog::HttpCatalogProvider`]: loads services and formations from
//!   the booking backend
//! - [`submission::HttpSubmissionGateway`]: submits finalized reservation
//!   drafts, carrying the client idempotency key so retries are safe
//!
//! Both are configured through [`config::ClientConfig`], loaded from
//! environment variables with development defaults.

pub mod catalog;
pub mod config;
pub mod submission;

pub use catalog::HttpCatalogProvider;
pub use config::{ClientConfig, ClientError};
pub use submission::HttpSubmissionGateway;

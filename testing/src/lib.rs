//! # Studio Booking Testing
//!
//! Testing utilities for the studio booking engine:
//!
//! - [`mocks::FixedClock`]: deterministic time, pinned to the reference
//!   date the scenario tests are written against
//! - [`mocks::InMemoryCatalog`]: a catalog provider over fixed offerings
//! - [`mocks::MockSubmissionGateway`]: a scriptable gateway that records
//!   every request it receives
//! - [`fixtures`]: ready-made offerings and contact details
//!
//! ## Example
//!
//! ```ignore
//! use studio_booking_testing::{fixtures, test_clock};
//! use studio_booking_testing::mocks::{InMemoryCatalog, MockSubmissionGateway};
//!
//! let gateway = MockSubmissionGateway::succeeding();
//! let env = FlowEnvironment::new(
//!     Arc::new(test_clock()),
//!     Arc::new(InMemoryCatalog::new(vec![fixtures::service()], vec![])),
//!     gateway.clone().shared(),
//!     AvailabilityCalendar::default(),
//! );
//! // ... drive the flow, then assert on gateway.requests()
//! ```

pub mod fixtures;
pub mod mocks;

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};

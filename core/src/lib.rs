//! # Studio Booking Core
//!
//! Domain model and pure business rules for the studio reservation flow.
//!
//! This crate holds everything the reservation engine reasons about without
//! performing I/O:
//!
//! - **Catalog types**: [`types::Service`] and [`types::Formation`], the two
//!   mutually exclusive bookable offerings, unified by [`types::Selection`]
//! - **Availability**: [`availability::AvailabilityCalendar`], a pure
//!   calculator mapping a calendar date to bookability and open time slots
//! - **Draft**: [`types::ReservationDraft`], the aggregate a visitor builds
//!   step by step and finally submits
//! - **Collaborator traits**: [`environment::Clock`],
//!   [`gateway::CatalogProvider`], and [`gateway::SubmissionGateway`] — the
//!   seams where the engine touches the outside world
//!
//! ## Design principles
//!
//! - No wall-clock access: every date computation takes an explicit
//!   reference date, obtained through [`environment::Clock`] by callers
//! - Invalid states are unrepresentable where practical: a draft can hold a
//!   service or a formation, never both
//! - All errors are typed and recoverable; nothing in this crate panics

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};

pub mod availability;
pub mod environment;
pub mod gateway;
pub mod types;

pub use availability::{AvailabilityCalendar, SlotCatalog, TimeSlot};
pub use environment::Clock;
pub use gateway::{
    CatalogError, CatalogProvider, SubmissionError, SubmissionGateway, SubmissionRequest,
};
pub use types::{
    ContactInfo, DateTimeChoice, Formation, FormationId, FormationLevel, Money,
    ReservationConfirmation, ReservationDraft, Selection, Service, ServiceId, ValidationError,
};

//! Domain types for the studio reservation flow.
//!
//! This module contains the value objects and entities a visitor manipulates
//! while booking: the two offering kinds ([`Service`] and [`Formation`]),
//! the mutually exclusive [`Selection`] over them, the date/time choice, the
//! contact details, and the [`ReservationDraft`] aggregate that is finally
//! handed to the submission gateway.

use crate::availability::TimeSlot;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a bookable service
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Creates a new random `ServiceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ServiceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a formation (course offering)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormationId(Uuid);

impl FormationId {
    /// Creates a new random `FormationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `FormationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FormationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FormationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money
// ============================================================================

/// Monetary amount in euro cents
///
/// Non-negative by construction. Arithmetic is checked; prices never wrap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole euros with overflow checking
    #[must_use]
    pub const fn checked_from_euros(euros: u64) -> Option<Self> {
        match euros.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} €", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Offerings
// ============================================================================

/// A one-time bookable offering with a fixed price and duration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: ServiceId,
    /// Display label
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Price of one session
    pub price: Money,
    /// Session length in minutes (positive)
    pub duration_minutes: u32,
    /// Inactive services must not be offered for new bookings
    pub is_active: bool,
}

/// Skill level a formation is aimed at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormationLevel {
    /// No prior experience expected
    Beginner,
    /// Comfortable with the basics
    Intermediate,
    /// Professional-track students
    Advanced,
}

impl fmt::Display for FormationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// A scheduled, capacity-limited course offering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    /// Unique identifier
    pub id: FormationId,
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Price of the full course
    pub price: Money,
    /// Course length in hours (positive)
    pub duration_hours: u32,
    /// Targeted skill level
    pub level: FormationLevel,
    /// Maximum number of students (positive)
    pub max_students: u32,
    /// Inactive formations must not be offered for new bookings
    pub is_active: bool,
}

// ============================================================================
// Selection
// ============================================================================

/// The visitor's current offering choice
///
/// Exactly one of service or formation can be bound at a time; binding one
/// replaces the other. The XOR invariant of the reservation flow is enforced
/// by this representation rather than by convention.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing chosen yet
    #[default]
    None,
    /// A service session was chosen
    Service(Service),
    /// A formation course was chosen
    Formation(Formation),
}

impl Selection {
    /// Whether an offering is bound
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Price of the bound offering, zero when nothing is bound
    #[must_use]
    pub const fn price(&self) -> Money {
        match self {
            Self::None => Money::from_cents(0),
            Self::Service(s) => s.price,
            Self::Formation(f) => f.price,
        }
    }

    /// Duration of the bound offering in minutes, zero when nothing is bound
    ///
    /// Formations advertise whole hours; they are converted here.
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Service(s) => s.duration_minutes,
            Self::Formation(f) => f.duration_hours * 60,
        }
    }

    /// Display label of the bound offering
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Service(s) => Some(&s.name),
            Self::Formation(f) => Some(&f.title),
        }
    }

    /// Whether `other` binds the same offering as `self`
    #[must_use]
    pub fn same_offering(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Service(a), Self::Service(b)) => a.id == b.id,
            (Self::Formation(a), Self::Formation(b)) => a.id == b.id,
            _ => false,
        }
    }
}

// ============================================================================
// Date/time choice
// ============================================================================

/// The visitor's chosen date and time slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeChoice {
    /// Calendar date on the local business calendar
    pub date: NaiveDate,
    /// Time slot from the master catalog
    pub slot: TimeSlot,
}

// ============================================================================
// Contact details
// ============================================================================

/// Errors produced by draft validation
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required contact field is empty after trimming
    #[error("required field `{field}` is empty")]
    MissingField {
        /// Name of the empty field
        field: &'static str,
    },
    /// No offering is bound to the draft
    #[error("no service or formation selected")]
    NoSelection,
    /// No date/time has been chosen
    #[error("no date and time chosen")]
    NoDateTime,
}

/// Contact details entered on the third step
///
/// The four required fields are validated as trimmed-non-empty only. Email
/// format is deliberately not checked here; the reservation flow accepts any
/// non-empty value, as the reference behavior does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Given name (required)
    pub first_name: String,
    /// Family name (required)
    pub last_name: String,
    /// Email address (required, presence only)
    pub email: String,
    /// Phone number (required, no format validation)
    pub phone: String,
    /// Optional free-text message to the artist
    pub message: Option<String>,
}

impl ContactInfo {
    /// Validates that every required field is non-empty after trimming
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first empty
    /// required field, in declaration order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Reservation draft
// ============================================================================

/// The in-progress reservation a visitor builds step by step
///
/// Created empty when the flow starts, mutated in place as steps complete,
/// and serialized as-is to the submission gateway at the end. It is never
/// auto-expired; only an explicit start-over discards it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// Chosen offering (service XOR formation)
    pub selection: Selection,
    /// Chosen date and time slot
    pub date_time: Option<DateTimeChoice>,
    /// Contact details
    pub contact: ContactInfo,
}

impl ReservationDraft {
    /// Creates an empty draft
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets every field to its initial empty value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Derived price of the draft
    #[must_use]
    pub const fn price(&self) -> Money {
        self.selection.price()
    }

    /// Derived duration of the draft in minutes
    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.selection.duration_minutes()
    }

    /// Validates the draft is complete enough to submit
    ///
    /// # Errors
    ///
    /// Returns the first failing check: missing selection, missing
    /// date/time, then contact field presence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.selection.is_bound() {
            return Err(ValidationError::NoSelection);
        }
        if self.date_time.is_none() {
            return Err(ValidationError::NoDateTime);
        }
        self.contact.validate()
    }
}

// ============================================================================
// Confirmation
// ============================================================================

/// Acknowledgment returned by the submission gateway on success
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    /// Booking reference communicated to the visitor
    pub reference: String,
    /// When the reservation was accepted
    pub received_at: DateTime<Utc>,
}

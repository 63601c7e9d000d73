//! Actions driving the reservation flow.
//!
//! Commands are what the UI sends; events are what effects feed back
//! (catalog loads and gateway answers). The reducer processes both through
//! the same entry point.

use chrono::NaiveDate;
use studio_booking_core::availability::TimeSlot;
use studio_booking_core::gateway::{CatalogError, SubmissionError};
use studio_booking_core::types::{
    ContactInfo, Formation, FormationId, ReservationConfirmation, Service, ServiceId,
};
use uuid::Uuid;

/// All inputs to the reservation flow reducer
#[derive(Clone, Debug, PartialEq)]
pub enum FlowAction {
    // ========== Commands ==========
    /// Command: load the offering catalog
    LoadCatalog,

    /// Command: bind a service and advance to date selection
    SelectService {
        /// The chosen service
        id: ServiceId,
    },

    /// Command: bind a formation and advance to date selection
    SelectFormation {
        /// The chosen formation
        id: FormationId,
    },

    /// Command: record the date/time choice and advance to contact entry
    ChooseDateTime {
        /// Candidate date
        date: NaiveDate,
        /// Candidate slot
        slot: TimeSlot,
    },

    /// Command: record the contact details and advance to confirmation
    SubmitContact {
        /// Entered contact details
        contact: ContactInfo,
    },

    /// Command: submit the draft to the gateway
    Submit,

    /// Command: abandon the in-flight submission attempt
    CancelSubmission,

    /// Command: navigate one step back
    Back,

    /// Command: discard everything after Success and restart
    StartOver,

    // ========== Events ==========
    /// Event: the catalog provider answered
    CatalogLoaded {
        /// Active services
        services: Vec<Service>,
        /// Active formations
        formations: Vec<Formation>,
    },

    /// Event: the catalog provider failed
    CatalogFailed {
        /// What went wrong
        error: CatalogError,
    },

    /// Event: the gateway accepted a submission attempt
    SubmissionSucceeded {
        /// Attempt the answer belongs to
        attempt: Uuid,
        /// The acknowledgment
        confirmation: ReservationConfirmation,
    },

    /// Event: the gateway refused a submission attempt
    SubmissionFailed {
        /// Attempt the answer belongs to
        attempt: Uuid,
        /// What the gateway reported
        error: SubmissionError,
    },
}

impl FlowAction {
    /// Whether this action is an effect-produced event rather than a
    /// UI command
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::CatalogLoaded { .. }
                | Self::CatalogFailed { .. }
                | Self::SubmissionSucceeded { .. }
                | Self::SubmissionFailed { .. }
        )
    }
}

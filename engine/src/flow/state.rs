//! Flow state and the typed transition functions.
//!
//! Every named edge of the step machine is one method on [`FlowState`]
//! returning `Result<(), FlowError>`: a failed guard leaves the state
//! untouched and reports why, instead of silently no-oping. The reducer is
//! a thin dispatcher over these methods; tests can drive them directly.

use chrono::NaiveDate;
use studio_booking_core::availability::{AvailabilityCalendar, TimeSlot};
use studio_booking_core::gateway::{CatalogError, SubmissionError, SubmissionRequest};
use studio_booking_core::types::{
    ContactInfo, DateTimeChoice, Formation, FormationId, ReservationConfirmation,
    ReservationDraft, Selection, Service, ServiceId, ValidationError,
};
use uuid::Uuid;

/// The five ordered steps of the reservation flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    /// Step 1: choose a service or a formation
    #[default]
    SelectOffering,
    /// Step 2: choose a date and a time slot
    SelectDateTime,
    /// Step 3: enter contact details
    EnterContact,
    /// Step 4: review and submit
    Confirm,
    /// Step 5: terminal confirmation screen
    Success,
}

impl Step {
    /// One-based position, matching how the steps are numbered on screen
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::SelectOffering => 1,
            Self::SelectDateTime => 2,
            Self::EnterContact => 3,
            Self::Confirm => 4,
            Self::Success => 5,
        }
    }

    /// The step a back action returns to, if any
    const fn previous(self) -> Option<Self> {
        match self {
            Self::SelectOffering | Self::Success => None,
            Self::SelectDateTime => Some(Self::SelectOffering),
            Self::EnterContact => Some(Self::SelectDateTime),
            Self::Confirm => Some(Self::EnterContact),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectOffering => write!(f, "select-offering"),
            Self::SelectDateTime => write!(f, "select-date-time"),
            Self::EnterContact => write!(f, "enter-contact"),
            Self::Confirm => write!(f, "confirm"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// Why a transition was refused or an external call failed
///
/// Everything here is recoverable: the visitor stays on the current step
/// and can correct the input, retry, or navigate back.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The action is not valid at the current step
    #[error("action not allowed at step {step}")]
    WrongStep {
        /// The step the flow was at
        step: Step,
    },
    /// Draft content failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The chosen date accepts no bookings
    #[error("{date} is not available for booking")]
    DateUnavailable {
        /// The refused date
        date: NaiveDate,
    },
    /// The chosen slot is not open on the chosen date
    #[error("{slot} is not open on {date}")]
    SlotNotOpen {
        /// The date the slot was checked against
        date: NaiveDate,
        /// The refused slot
        slot: TimeSlot,
    },
    /// The service is unknown or no longer offered
    #[error("service {id} is not available")]
    UnknownService {
        /// The requested id
        id: ServiceId,
    },
    /// The formation is unknown or no longer offered
    #[error("formation {id} is not available")]
    UnknownFormation {
        /// The requested id
        id: FormationId,
    },
    /// Offerings have not been loaded yet
    #[error("offering catalog not loaded")]
    CatalogNotLoaded,
    /// The catalog provider failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The submission gateway refused the reservation
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    /// A submission is already in flight
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    /// No submission is in flight to cancel
    #[error("no submission in flight")]
    NoSubmissionInFlight,
    /// A gateway answer arrived for a cancelled or superseded attempt
    #[error("stale submission attempt {attempt}")]
    StaleAttempt {
        /// The attempt the answer belonged to
        attempt: Uuid,
    },
}

/// Offerings loaded from the catalog provider
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// Active services, in provider order
    pub services: Vec<Service>,
    /// Active formations, in provider order
    pub formations: Vec<Formation>,
}

impl CatalogSnapshot {
    /// Looks up an active service by id
    #[must_use]
    pub fn service(&self, id: ServiceId) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id && s.is_active)
    }

    /// Looks up an active formation by id
    #[must_use]
    pub fn formation(&self, id: FormationId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == id && f.is_active)
    }
}

/// Transient sub-state of the confirm step
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Nothing submitted, submit control armed
    #[default]
    Idle,
    /// A submission is awaiting the gateway's answer
    InFlight {
        /// Correlation id of this attempt
        attempt: Uuid,
    },
    /// The previous attempt failed; the visitor may retry
    Failed {
        /// What the gateway reported
        error: SubmissionError,
    },
}

/// Full state of one visitor's reservation flow
#[derive(Clone, Debug, Default)]
pub struct FlowState {
    /// Current step
    pub step: Step,
    /// The in-progress reservation
    pub draft: ReservationDraft,
    /// Offerings, once loaded
    pub catalog: Option<CatalogSnapshot>,
    /// Submission sub-state of the confirm step
    pub submission: SubmissionPhase,
    /// Idempotency key of the current draft, created on first submit and
    /// stable across retries
    pub idempotency_key: Option<Uuid>,
    /// Gateway acknowledgment, set when the flow reaches Success
    pub confirmation: Option<ReservationConfirmation>,
    /// Most recent guard or collaborator failure, cleared by the next
    /// successful transition
    pub last_error: Option<FlowError>,
}

impl FlowState {
    /// Stores the loaded offerings
    pub fn install_catalog(&mut self, services: Vec<Service>, formations: Vec<Formation>) {
        self.catalog = Some(CatalogSnapshot {
            services,
            formations,
        });
    }

    /// Edge 1→2 with a service: binds the offering and advances
    ///
    /// Binding a different offering than the current one discards any
    /// previously chosen date/time; a slot picked for one offering is never
    /// carried over to another.
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside step 1, [`FlowError::UnknownService`]
    /// for an inactive service.
    pub fn bind_service(&mut self, service: Service) -> Result<(), FlowError> {
        if self.step != Step::SelectOffering {
            return Err(FlowError::WrongStep { step: self.step });
        }
        if !service.is_active {
            return Err(FlowError::UnknownService { id: service.id });
        }
        self.bind_selection(Selection::Service(service));
        Ok(())
    }

    /// Edge 1→2 with a formation: binds the offering and advances
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside step 1,
    /// [`FlowError::UnknownFormation`] for an inactive formation.
    pub fn bind_formation(&mut self, formation: Formation) -> Result<(), FlowError> {
        if self.step != Step::SelectOffering {
            return Err(FlowError::WrongStep { step: self.step });
        }
        if !formation.is_active {
            return Err(FlowError::UnknownFormation { id: formation.id });
        }
        self.bind_selection(Selection::Formation(formation));
        Ok(())
    }

    fn bind_selection(&mut self, selection: Selection) {
        if !self.draft.selection.same_offering(&selection) {
            self.draft.date_time = None;
        }
        self.draft.selection = selection;
        self.step = Step::SelectDateTime;
    }

    /// Edge 2→3: records the date/time choice and advances
    ///
    /// The choice is validated against the availability rules at the moment
    /// of the transition; a stale calendar widget cannot push an
    /// unavailable combination through.
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside step 2,
    /// [`FlowError::DateUnavailable`] or [`FlowError::SlotNotOpen`] when the
    /// calculator refuses the combination.
    pub fn confirm_date_time(
        &mut self,
        date: NaiveDate,
        slot: TimeSlot,
        today: NaiveDate,
        calendar: &AvailabilityCalendar,
    ) -> Result<(), FlowError> {
        if self.step != Step::SelectDateTime {
            return Err(FlowError::WrongStep { step: self.step });
        }
        if calendar.is_unavailable(date, today) {
            return Err(FlowError::DateUnavailable { date });
        }
        if !calendar.is_slot_open(date, today, slot) {
            return Err(FlowError::SlotNotOpen { date, slot });
        }
        self.draft.date_time = Some(DateTimeChoice { date, slot });
        self.step = Step::EnterContact;
        Ok(())
    }

    /// Edge 3→4: records the contact details and advances
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside step 3,
    /// [`FlowError::Validation`] when a required field is empty.
    pub fn confirm_contact(&mut self, contact: ContactInfo) -> Result<(), FlowError> {
        if self.step != Step::EnterContact {
            return Err(FlowError::WrongStep { step: self.step });
        }
        contact.validate()?;
        self.draft.contact = contact;
        self.step = Step::Confirm;
        Ok(())
    }

    /// Edge 4→(submitting): opens a submission attempt
    ///
    /// Creates the idempotency key on the first attempt of a draft and
    /// reuses it on retries. Returns the request to hand to the gateway and
    /// the attempt id its answer must carry.
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside step 4,
    /// [`FlowError::SubmissionInFlight`] while an attempt is pending.
    pub fn begin_submission(&mut self) -> Result<(SubmissionRequest, Uuid), FlowError> {
        if self.step != Step::Confirm {
            return Err(FlowError::WrongStep { step: self.step });
        }
        if matches!(self.submission, SubmissionPhase::InFlight { .. }) {
            return Err(FlowError::SubmissionInFlight);
        }
        let attempt = Uuid::new_v4();
        let idempotency_key = *self.idempotency_key.get_or_insert_with(Uuid::new_v4);
        self.submission = SubmissionPhase::InFlight { attempt };
        Ok((
            SubmissionRequest {
                draft: self.draft.clone(),
                idempotency_key,
            },
            attempt,
        ))
    }

    /// Edge 4→5: the gateway accepted the current attempt
    ///
    /// # Errors
    ///
    /// [`FlowError::StaleAttempt`] when the answer belongs to a cancelled or
    /// superseded attempt; the state is left untouched.
    pub fn complete_submission(
        &mut self,
        attempt: Uuid,
        confirmation: ReservationConfirmation,
    ) -> Result<(), FlowError> {
        self.check_current_attempt(attempt)?;
        self.submission = SubmissionPhase::Idle;
        self.confirmation = Some(confirmation);
        self.step = Step::Success;
        Ok(())
    }

    /// The gateway refused the current attempt: stay at Confirm, record
    /// the failure, keep the draft intact so the visitor can retry
    ///
    /// # Errors
    ///
    /// [`FlowError::StaleAttempt`] when the answer belongs to a cancelled or
    /// superseded attempt; the failure is not recorded then.
    pub fn fail_submission(
        &mut self,
        attempt: Uuid,
        error: SubmissionError,
    ) -> Result<(), FlowError> {
        self.check_current_attempt(attempt)?;
        self.submission = SubmissionPhase::Failed { error };
        Ok(())
    }

    /// Cancels the in-flight attempt and re-arms the submit control
    ///
    /// The gateway's eventual answer for the cancelled attempt no longer
    /// matches the current attempt id and is dropped.
    ///
    /// # Errors
    ///
    /// [`FlowError::NoSubmissionInFlight`] when nothing is pending.
    pub fn cancel_submission(&mut self) -> Result<(), FlowError> {
        if !matches!(self.submission, SubmissionPhase::InFlight { .. }) {
            return Err(FlowError::NoSubmissionInFlight);
        }
        self.submission = SubmissionPhase::Idle;
        Ok(())
    }

    /// Backward edge n→n−1 for steps 2 to 4
    ///
    /// Leaving the confirm step abandons any in-flight attempt. Entered
    /// data is kept; returning forward re-validates it anyway.
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] at step 1 (leaving the flow is the
    /// embedding page's concern) and at Success.
    pub fn step_back(&mut self) -> Result<(), FlowError> {
        let previous = self
            .step
            .previous()
            .ok_or(FlowError::WrongStep { step: self.step })?;
        if self.step == Step::Confirm {
            self.submission = SubmissionPhase::Idle;
        }
        self.step = previous;
        Ok(())
    }

    /// Edge 5→1: discards everything and restarts the flow
    ///
    /// The loaded catalog survives; the draft, the idempotency key, the
    /// confirmation, and any error do not.
    ///
    /// # Errors
    ///
    /// [`FlowError::WrongStep`] outside Success.
    pub fn start_over(&mut self) -> Result<(), FlowError> {
        if self.step != Step::Success {
            return Err(FlowError::WrongStep { step: self.step });
        }
        self.draft.reset();
        self.submission = SubmissionPhase::Idle;
        self.idempotency_key = None;
        self.confirmation = None;
        self.last_error = None;
        self.step = Step::SelectOffering;
        Ok(())
    }

    fn check_current_attempt(&self, attempt: Uuid) -> Result<(), FlowError> {
        match self.submission {
            SubmissionPhase::InFlight { attempt: current } if current == attempt => Ok(()),
            _ => Err(FlowError::StaleAttempt { attempt }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use studio_booking_core::availability::SlotCatalog;
    use studio_booking_core::types::Money;

    fn service() -> Service {
        Service {
            id: ServiceId::new(),
            name: "Maquillage soirée".to_string(),
            description: String::new(),
            price: Money::from_cents(8000),
            duration_minutes: 60,
            is_active: true,
        }
    }

    fn contact() -> ContactInfo {
        ContactInfo {
            first_name: "Marie".to_string(),
            last_name: "Dupont".to_string(),
            email: "marie@example.com".to_string(),
            phone: "0612345678".to_string(),
            message: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn calendar() -> AvailabilityCalendar {
        AvailabilityCalendar::new(SlotCatalog::business_default())
    }

    fn state_at_confirm() -> FlowState {
        let mut state = FlowState::default();
        state.bind_service(service()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        state
            .confirm_date_time(date, TimeSlot::parse("10:00").unwrap(), today(), &calendar())
            .unwrap();
        state.confirm_contact(contact()).unwrap();
        state
    }

    #[test]
    fn steps_are_ordered_one_to_five() {
        assert_eq!(Step::SelectOffering.index(), 1);
        assert_eq!(Step::Success.index(), 5);
        assert!(Step::SelectOffering < Step::Confirm);
    }

    #[test]
    fn binding_advances_and_inactive_offering_is_refused() {
        let mut state = FlowState::default();
        let mut inactive = service();
        inactive.is_active = false;

        let err = state.bind_service(inactive.clone()).unwrap_err();
        assert_eq!(err, FlowError::UnknownService { id: inactive.id });
        assert_eq!(state.step, Step::SelectOffering);

        state.bind_service(service()).unwrap();
        assert_eq!(state.step, Step::SelectDateTime);
        assert!(state.draft.selection.is_bound());
    }

    #[test]
    fn rebinding_a_different_offering_clears_date_time() {
        let mut state = FlowState::default();
        let first = service();
        state.bind_service(first.clone()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        state
            .confirm_date_time(date, TimeSlot::parse("10:00").unwrap(), today(), &calendar())
            .unwrap();

        // Back to step 1, pick a different offering: the old slot is stale.
        state.step_back().unwrap();
        state.step_back().unwrap();
        state.bind_service(service()).unwrap();
        assert_eq!(state.draft.date_time, None);

        // Re-binding the same offering keeps the choice.
        let mut state = FlowState::default();
        state.bind_service(first.clone()).unwrap();
        state
            .confirm_date_time(date, TimeSlot::parse("10:00").unwrap(), today(), &calendar())
            .unwrap();
        state.step_back().unwrap();
        state.step_back().unwrap();
        state.bind_service(first).unwrap();
        assert!(state.draft.date_time.is_some());
    }

    #[test]
    fn date_time_guard_refuses_unavailable_and_closed() {
        let mut state = FlowState::default();
        state.bind_service(service()).unwrap();

        let sunday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let err = state
            .confirm_date_time(sunday, TimeSlot::parse("10:00").unwrap(), today(), &calendar())
            .unwrap_err();
        assert_eq!(err, FlowError::DateUnavailable { date: sunday });
        assert_eq!(state.step, Step::SelectDateTime);

        // 09:30 is an odd catalog index: closed on Saturdays.
        let saturday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        let slot = TimeSlot::parse("09:30").unwrap();
        let err = state
            .confirm_date_time(saturday, slot, today(), &calendar())
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::SlotNotOpen {
                date: saturday,
                slot
            }
        );
    }

    #[test]
    fn contact_guard_refuses_missing_fields() {
        let mut state = FlowState::default();
        state.bind_service(service()).unwrap();
        state
            .confirm_date_time(
                NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
                TimeSlot::parse("10:00").unwrap(),
                today(),
                &calendar(),
            )
            .unwrap();

        let mut incomplete = contact();
        incomplete.email = String::new();
        let err = state.confirm_contact(incomplete).unwrap_err();
        assert_eq!(
            err,
            FlowError::Validation(ValidationError::MissingField { field: "email" })
        );
        assert_eq!(state.step, Step::EnterContact);
    }

    #[test]
    fn submission_blocks_a_second_in_flight_attempt() {
        let mut state = state_at_confirm();
        let (request, _attempt) = state.begin_submission().unwrap();
        assert_eq!(request.draft.price().cents(), 8000);

        assert_eq!(
            state.begin_submission().unwrap_err(),
            FlowError::SubmissionInFlight
        );
    }

    #[test]
    fn retry_reuses_the_idempotency_key() {
        let mut state = state_at_confirm();
        let (first, attempt) = state.begin_submission().unwrap();
        state
            .fail_submission(attempt, SubmissionError::Timeout)
            .unwrap();

        let (second, _) = state.begin_submission().unwrap();
        assert_eq!(first.idempotency_key, second.idempotency_key);
    }

    #[test]
    fn stale_gateway_answers_are_rejected() {
        let mut state = state_at_confirm();
        let (_, attempt) = state.begin_submission().unwrap();
        state.cancel_submission().unwrap();

        let confirmation = ReservationConfirmation {
            reference: "RES-1".to_string(),
            received_at: chrono::Utc::now(),
        };
        let err = state
            .complete_submission(attempt, confirmation)
            .unwrap_err();
        assert_eq!(err, FlowError::StaleAttempt { attempt });
        assert_eq!(state.step, Step::Confirm);
        assert_eq!(state.submission, SubmissionPhase::Idle);
    }

    #[test]
    fn failure_keeps_the_draft_and_the_step() {
        let mut state = state_at_confirm();
        let draft_before = state.draft.clone();
        let (_, attempt) = state.begin_submission().unwrap();

        state
            .fail_submission(attempt, SubmissionError::Unavailable)
            .unwrap();
        assert_eq!(state.step, Step::Confirm);
        assert_eq!(state.draft, draft_before);
        assert_eq!(
            state.submission,
            SubmissionPhase::Failed {
                error: SubmissionError::Unavailable
            }
        );
    }

    #[test]
    fn back_from_confirm_abandons_the_attempt() {
        let mut state = state_at_confirm();
        let (_, attempt) = state.begin_submission().unwrap();

        state.step_back().unwrap();
        assert_eq!(state.step, Step::EnterContact);
        assert_eq!(state.submission, SubmissionPhase::Idle);
        assert!(matches!(
            state.complete_submission(
                attempt,
                ReservationConfirmation {
                    reference: "RES-2".to_string(),
                    received_at: chrono::Utc::now(),
                }
            ),
            Err(FlowError::StaleAttempt { .. })
        ));
    }

    #[test]
    fn back_from_step_one_is_refused() {
        let mut state = FlowState::default();
        assert_eq!(
            state.step_back().unwrap_err(),
            FlowError::WrongStep {
                step: Step::SelectOffering
            }
        );
    }

    #[test]
    fn start_over_resets_everything_but_the_catalog() {
        let mut state = state_at_confirm();
        state.install_catalog(vec![service()], vec![]);
        let (_, attempt) = state.begin_submission().unwrap();
        state
            .complete_submission(
                attempt,
                ReservationConfirmation {
                    reference: "RES-3".to_string(),
                    received_at: chrono::Utc::now(),
                },
            )
            .unwrap();
        assert_eq!(state.step, Step::Success);

        state.start_over().unwrap();
        assert_eq!(state.step, Step::SelectOffering);
        assert_eq!(state.draft, ReservationDraft::default());
        assert_eq!(state.submission, SubmissionPhase::Idle);
        assert_eq!(state.idempotency_key, None);
        assert_eq!(state.confirmation, None);
        assert_eq!(state.last_error, None);
        assert!(state.catalog.is_some());
    }

    #[test]
    fn start_over_is_only_reachable_from_success() {
        let mut state = state_at_confirm();
        assert_eq!(
            state.start_over().unwrap_err(),
            FlowError::WrongStep {
                step: Step::Confirm
            }
        );
    }
}

//! The reservation flow reducer and its environment.

use crate::effect::Effect;
use crate::flow::actions::FlowAction;
use crate::flow::state::{FlowError, FlowState};
use crate::reducer::Reducer;
use std::sync::Arc;
use studio_booking_core::availability::AvailabilityCalendar;
use studio_booking_core::environment::Clock;
use studio_booking_core::gateway::{CatalogProvider, SubmissionGateway};

/// Injected dependencies of the reservation flow
#[derive(Clone)]
pub struct FlowEnvironment {
    /// Clock supplying the availability reference date
    pub clock: Arc<dyn Clock>,
    /// Offering catalog collaborator
    pub catalog: Arc<dyn CatalogProvider>,
    /// Reservation submission collaborator
    pub gateway: Arc<dyn SubmissionGateway>,
    /// Blackout list and slot catalog
    pub calendar: AvailabilityCalendar,
}

impl FlowEnvironment {
    /// Creates a new `FlowEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        catalog: Arc<dyn CatalogProvider>,
        gateway: Arc<dyn SubmissionGateway>,
        calendar: AvailabilityCalendar,
    ) -> Self {
        Self {
            clock,
            catalog,
            gateway,
            calendar,
        }
    }
}

/// Reducer for the reservation flow
///
/// Dispatches every action to the matching typed transition on
/// [`FlowState`]. Refused transitions surface on `last_error` and produce
/// no effects; only catalog loading and submission produce futures.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowReducer;

impl FlowReducer {
    /// Creates a new `FlowReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies a transition outcome to the state
    ///
    /// Successful transitions clear the previous error. Stale gateway
    /// answers are dropped without touching `last_error`; they belong to an
    /// attempt the visitor already cancelled or superseded.
    fn record(state: &mut FlowState, result: Result<(), FlowError>) {
        match result {
            Ok(()) => state.last_error = None,
            Err(FlowError::StaleAttempt { attempt }) => {
                tracing::debug!(%attempt, "dropping stale gateway answer");
            },
            Err(error) => {
                tracing::debug!(%error, step = %state.step, "transition refused");
                state.last_error = Some(error);
            },
        }
    }
}

impl Reducer for FlowReducer {
    type State = FlowState;
    type Action = FlowAction;
    type Environment = FlowEnvironment;

    fn reduce(
        &self,
        state: &mut FlowState,
        action: FlowAction,
        env: &FlowEnvironment,
    ) -> Vec<Effect<FlowAction>> {
        match action {
            FlowAction::LoadCatalog => {
                let services = env.catalog.list_services();
                let formations = env.catalog.list_formations();
                vec![Effect::future(async move {
                    let (services, formations) =
                        futures::future::join(services, formations).await;
                    Some(match (services, formations) {
                        (Ok(services), Ok(formations)) => FlowAction::CatalogLoaded {
                            services,
                            formations,
                        },
                        (Err(error), _) | (_, Err(error)) => FlowAction::CatalogFailed { error },
                    })
                })]
            },

            FlowAction::CatalogLoaded {
                services,
                formations,
            } => {
                tracing::debug!(
                    services = services.len(),
                    formations = formations.len(),
                    "catalog loaded"
                );
                state.install_catalog(services, formations);
                Self::record(state, Ok(()));
                vec![Effect::None]
            },

            FlowAction::CatalogFailed { error } => {
                tracing::warn!(%error, "catalog load failed");
                state.last_error = Some(error.into());
                vec![Effect::None]
            },

            FlowAction::SelectService { id } => {
                let service = match state.catalog.as_ref() {
                    None => Err(FlowError::CatalogNotLoaded),
                    Some(catalog) => catalog
                        .service(id)
                        .cloned()
                        .ok_or(FlowError::UnknownService { id }),
                };
                let result = service.and_then(|service| state.bind_service(service));
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::SelectFormation { id } => {
                let formation = match state.catalog.as_ref() {
                    None => Err(FlowError::CatalogNotLoaded),
                    Some(catalog) => catalog
                        .formation(id)
                        .cloned()
                        .ok_or(FlowError::UnknownFormation { id }),
                };
                let result = formation.and_then(|formation| state.bind_formation(formation));
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::ChooseDateTime { date, slot } => {
                let today = env.clock.today();
                let result = state.confirm_date_time(date, slot, today, &env.calendar);
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::SubmitContact { contact } => {
                let result = state.confirm_contact(contact);
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::Submit => match state.begin_submission() {
                Ok((request, attempt)) => {
                    state.last_error = None;
                    tracing::info!(
                        %attempt,
                        idempotency_key = %request.idempotency_key,
                        price_cents = request.draft.price().cents(),
                        duration_minutes = request.draft.duration_minutes(),
                        "submitting reservation"
                    );
                    let submit = env.gateway.submit(request);
                    vec![Effect::future(async move {
                        Some(match submit.await {
                            Ok(confirmation) => FlowAction::SubmissionSucceeded {
                                attempt,
                                confirmation,
                            },
                            Err(error) => FlowAction::SubmissionFailed { attempt, error },
                        })
                    })]
                },
                Err(error) => {
                    Self::record(state, Err(error));
                    vec![Effect::None]
                },
            },

            FlowAction::SubmissionSucceeded {
                attempt,
                confirmation,
            } => {
                let result = state.complete_submission(attempt, confirmation);
                if result.is_ok() {
                    tracing::info!(%attempt, "reservation confirmed");
                }
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::SubmissionFailed { attempt, error } => {
                match state.fail_submission(attempt, error.clone()) {
                    Ok(()) => {
                        tracing::warn!(%attempt, %error, "submission failed");
                        state.last_error = Some(FlowError::Submission(error));
                    },
                    Err(stale) => Self::record(state, Err(stale)),
                }
                vec![Effect::None]
            },

            FlowAction::CancelSubmission => {
                let result = state.cancel_submission();
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::Back => {
                let result = state.step_back();
                Self::record(state, result);
                vec![Effect::None]
            },

            FlowAction::StartOver => {
                let result = state.start_over();
                Self::record(state, result);
                vec![Effect::None]
            },
        }
    }
}

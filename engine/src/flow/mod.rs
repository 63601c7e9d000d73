//! The reservation flow: a five-step state machine taking a visitor from
//! offering selection to a confirmed booking.
//!
//! ```text
//! ┌─────────────────┐
//! │ SelectOffering  │◄──────────── StartOver ────────────┐
//! └───────┬─────────┘                                    │
//!         │ SelectService / SelectFormation              │
//!         ▼                                              │
//! ┌─────────────────┐                                    │
//! │ SelectDateTime  │  date bookable, slot open          │
//! └───────┬─────────┘                                    │
//!         │ ChooseDateTime                               │
//!         ▼                                              │
//! ┌─────────────────┐                                    │
//! │ EnterContact    │  four required fields non-empty    │
//! └───────┬─────────┘                                    │
//!         │ SubmitContact                                │
//!         ▼                                              │
//! ┌─────────────────┐   Submit ──► gateway ──┐           │
//! │ Confirm         │◄── SubmissionFailed ───┤           │
//! └───────┬─────────┘                        │           │
//!         │ SubmissionSucceeded ◄────────────┘           │
//!         ▼                                              │
//! ┌─────────────────┐                                    │
//! │ Success         │────────────────────────────────────┘
//! └─────────────────┘
//! ```
//!
//! Back navigation is always allowed between steps 2 and 4. Guard failures
//! never advance the step; they surface on [`state::FlowState::last_error`].
//! While a submission is in flight, forward re-submission is blocked and the
//! gateway's answer is matched against the attempt id, so a cancelled or
//! superseded attempt can never corrupt the draft.

pub mod actions;
pub mod reducer;
pub mod state;

pub use actions::FlowAction;
pub use reducer::{FlowEnvironment, FlowReducer};
pub use state::{CatalogSnapshot, FlowError, FlowState, Step, SubmissionPhase};

//! # Studio Booking Engine
//!
//! The reservation flow state machine and the runtime that drives it.
//!
//! The engine follows the reducer architecture: all business logic lives in
//! a pure function `(State, Action, Environment) → (State, Effects)`, side
//! effects are returned as descriptions rather than executed inline, and a
//! [`store::Store`] owns the state and runs the effects, feeding the actions
//! they produce back into the reducer.
//!
//! ## Crate layout
//!
//! - [`reducer`]: the [`reducer::Reducer`] trait
//! - [`effect`]: the [`effect::Effect`] description type
//! - [`store`]: the Store runtime, effect execution, and completion handles
//! - [`flow`]: the reservation flow itself - step state machine, actions,
//!   guards, and the submission round trip
//!
//! ## Example
//!
//! ```ignore
//! use studio_booking_engine::flow::{FlowAction, FlowEnvironment, FlowReducer, FlowState};
//! use studio_booking_engine::store::Store;
//!
//! let store = Store::new(FlowState::default(), FlowReducer::new(), environment);
//! store.send(FlowAction::LoadCatalog).await;
//! store.send(FlowAction::SelectService { id }).await;
//! ```

pub mod effect;
pub mod flow;
pub mod reducer;
pub mod store;

pub use effect::Effect;
pub use reducer::Reducer;
pub use store::{EffectHandle, Store, StoreError};

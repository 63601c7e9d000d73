//! Side effect descriptions returned by reducers.

use std::future::Future;
use std::pin::Pin;

/// A description of a side effect to be executed by the Store
///
/// Effects are values, not executions: a reducer returns them and the Store
/// runtime spawns them. A future effect may resolve to a follow-up action,
/// which the Store feeds back into the reducer - this is how the submission
/// gateway's answer re-enters the flow.
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Arbitrary async computation
    ///
    /// Returns `Option<Action>` - if `Some`, the action is fed back into
    /// the reducer.
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

impl<Action> Effect<Action> {
    /// Wraps a future into an effect
    pub fn future<F>(fut: F) -> Self
    where
        F: Future<Output = Option<Action>> + Send + 'static,
    {
        Self::Future(Box::pin(fut))
    }
}

// Manual Debug implementation since Future doesn't implement Debug
impl<Action> std::fmt::Debug for Effect<Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "Effect::None"),
            Self::Future(_) => write!(f, "Effect::Future(<future>)"),
        }
    }
}

//! The core trait for the flow's business logic.

use crate::effect::Effect;

/// The Reducer trait - pure business logic over owned state
///
/// A reducer validates an action against the current state, updates the
/// state in place, and returns descriptions of the side effects to run. It
/// never performs I/O itself; everything external arrives through the
/// injected environment and leaves as an [`Effect`].
///
/// # Example
///
/// ```ignore
/// impl Reducer for FlowReducer {
///     type State = FlowState;
///     type Action = FlowAction;
///     type Environment = FlowEnvironment;
///
///     fn reduce(
///         &self,
///         state: &mut FlowState,
///         action: FlowAction,
///         env: &FlowEnvironment,
///     ) -> Vec<Effect<FlowAction>> {
///         // guards and transitions here
///         vec![]
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects
    ///
    /// Must be deterministic given `(state, action, env)` and must not
    /// block; long-running work belongs in the returned effects.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>>;
}

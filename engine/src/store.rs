//! Store runtime for coordinating reducer execution and effect handling.
//!
//! The Store manages:
//! 1. State (behind `RwLock` for concurrent access)
//! 2. Reducer (business logic)
//! 3. Environment (injected dependencies)
//! 4. Effect execution (with action feedback loop)
//!
//! One Store holds one visitor's reservation flow; transitions serialize at
//! the reducer level, so there is exactly one writer at a time.

use crate::effect::Effect;
use crate::reducer::Reducer;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Errors that can occur during Store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Timeout waiting for a terminal action
    ///
    /// Returned by `send_and_wait_for` when the timeout expires before a
    /// matching action is received.
    #[error("timeout waiting for action")]
    Timeout,

    /// Action broadcast channel closed
    #[error("action broadcast channel closed")]
    ChannelClosed,
}

/// Handle for waiting on effect completion
///
/// Returned by [`Store::send`]. Awaiting it guarantees every effect spawned
/// by that action has finished (including the actions those effects fed
/// back, which are processed synchronously before the counter drops).
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };
        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());
        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects spawned by the action to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for all effects to complete, bounded by `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] when the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: completion tracking shared by an action's effects
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// The counter is updated even when the effect's future panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// The Store - runtime coordinator for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
///
/// # Example
///
/// ```ignore
/// let store = Store::new(FlowState::default(), FlowReducer, environment);
/// let handle = store.send(FlowAction::LoadCatalog).await;
/// handle.wait().await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    /// Actions produced by effects are broadcast here once the reducer has
    /// processed them. This is what request/response callers and UI
    /// observers subscribe to.
    action_broadcast: broadcast::Sender<A>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            action_broadcast: self.action_broadcast.clone(),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Send + Clone + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        let (action_broadcast, _) = broadcast::channel(16);
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            action_broadcast,
        }
    }

    /// Send an action to the store
    ///
    /// Acquires the state write lock, runs the reducer, then spawns the
    /// returned effects. Returns once the effects have been started, not
    /// once they finish; use the returned [`EffectHandle`] to wait.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> EffectHandle {
        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;
            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());
            effects
        };

        tracing::trace!(effects = effects.len(), "reducer completed");
        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        handle
    }

    /// Send an action and wait for a matching result action
    ///
    /// Designed for request/response interactions: subscribe to the action
    /// broadcast before sending (no race with fast effects), send, then
    /// return the first effect-produced action matching the predicate.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: the store dropped its broadcast
    ///
    /// # Example
    ///
    /// ```ignore
    /// let outcome = store
    ///     .send_and_wait_for(
    ///         FlowAction::Submit,
    ///         |a| matches!(a, FlowAction::SubmissionSucceeded { .. } | FlowAction::SubmissionFailed { .. }),
    ///         Duration::from_secs(10),
    ///     )
    ///     .await?;
    /// ```
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe BEFORE sending to avoid missing a fast effect.
        let mut rx = self.action_broadcast.subscribe();
        let _handle = self.send(action).await;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        })
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let step = store.state(|s| s.step).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribe to all actions produced by effects
    ///
    /// Initial actions sent via [`Store::send`] are not broadcast; only the
    /// actions that effects feed back are, and only after the reducer has
    /// processed them.
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.action_broadcast.subscribe()
    }

    /// Execute one effect with completion tracking
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Future(fut) => {
                metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                tracking.increment();

                let store = self.clone();
                tokio::spawn(async move {
                    let _guard = DecrementGuard(tracking);
                    if let Some(action) = fut.await {
                        // Feed the action back first: an observer that sees
                        // the broadcast can rely on the state already
                        // reflecting it.
                        let mut handle = store.send(action.clone()).await;
                        handle.wait().await;
                        let _ = store.action_broadcast.send(action);
                    }
                });
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default)]
    struct PingState {
        pings: u32,
        pongs: u32,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum PingAction {
        Ping,
        Pong,
    }

    #[derive(Clone)]
    struct PingReducer;

    impl Reducer for PingReducer {
        type State = PingState;
        type Action = PingAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut PingState,
            action: PingAction,
            _env: &(),
        ) -> Vec<Effect<PingAction>> {
            match action {
                PingAction::Ping => {
                    state.pings += 1;
                    vec![Effect::future(async { Some(PingAction::Pong) })]
                },
                PingAction::Pong => {
                    state.pongs += 1;
                    vec![Effect::None]
                },
            }
        }
    }

    #[tokio::test]
    async fn effects_feed_actions_back() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let mut handle = store.send(PingAction::Ping).await;
        handle.wait().await;

        let (pings, pongs) = store.state(|s| (s.pings, s.pongs)).await;
        assert_eq!(pings, 1);
        assert_eq!(pongs, 1);
    }

    #[tokio::test]
    async fn send_and_wait_for_matches_effect_actions() {
        let store = Store::new(PingState::default(), PingReducer, ());

        let result = store
            .send_and_wait_for(
                PingAction::Ping,
                |a| matches!(a, PingAction::Pong),
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(result, PingAction::Pong);
    }

    #[tokio::test]
    async fn wait_with_timeout_reports_slow_effects() {
        #[derive(Clone)]
        struct SlowReducer;

        impl Reducer for SlowReducer {
            type State = ();
            type Action = ();
            type Environment = ();

            fn reduce(&self, _state: &mut (), _action: (), _env: &()) -> Vec<Effect<()>> {
                vec![Effect::future(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    None
                })]
            }
        }

        let store = Store::new((), SlowReducer, ());
        let mut handle = store.send(()).await;
        assert!(matches!(
            handle.wait_with_timeout(Duration::from_millis(20)).await,
            Err(StoreError::Timeout)
        ));
    }

    #[tokio::test]
    async fn completed_handle_resolves_immediately() {
        let mut handle = EffectHandle::completed();
        handle
            .wait_with_timeout(Duration::from_millis(10))
            .await
            .unwrap();
    }
}

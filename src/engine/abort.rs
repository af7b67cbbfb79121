//! Cooperative cancellation with a tagged reason.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Why a run was aborted. Compared by variant, never by message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The bridge stopped the engine's loop after its first round.
    RoundBoundary,
    /// The caller fired its own abort signal.
    CallerRequested { reason: Option<String> },
}

impl AbortReason {
    pub fn caller(reason: Option<String>) -> Self {
        Self::CallerRequested { reason }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundBoundary => f.write_str("round boundary reached"),
            Self::CallerRequested { reason: Some(reason) } => {
                write!(f, "caller requested abort ({reason})")
            }
            Self::CallerRequested { reason: None } => f.write_str("caller requested abort"),
        }
    }
}

struct SignalState {
    token: CancellationToken,
    reason: Mutex<Option<AbortReason>>,
    parent: Option<AbortSignal>,
}

/// Read side of an [`AbortController`]. Cheap to clone.
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<SignalState>,
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        self.state.token.is_cancelled()
    }

    /// The reason the signal fired, inherited from the parent when the
    /// abort came from there.
    pub fn reason(&self) -> Option<AbortReason> {
        let own = self
            .state
            .reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match (own, &self.state.parent) {
            (Some(reason), _) => Some(reason),
            (None, Some(parent)) if self.is_aborted() => parent.reason(),
            (None, _) => None,
        }
    }

    /// Resolves once the signal fires.
    pub async fn aborted(&self) {
        self.state.token.cancelled().await;
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .field("reason", &self.reason())
            .finish()
    }
}

/// Write side of a cancellation handle.
///
/// The first reason to land wins; later aborts are no-ops.
#[derive(Debug)]
pub struct AbortController {
    signal: AbortSignal,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    pub fn new() -> Self {
        Self::with_parts(CancellationToken::new(), None)
    }

    /// A controller that also fires when `parent` fires, reporting the
    /// parent's reason in that case.
    pub fn child_of(parent: &AbortSignal) -> Self {
        Self::with_parts(parent.state.token.child_token(), Some(parent.clone()))
    }

    fn with_parts(token: CancellationToken, parent: Option<AbortSignal>) -> Self {
        Self {
            signal: AbortSignal {
                state: Arc::new(SignalState {
                    token,
                    reason: Mutex::new(None),
                    parent,
                }),
            },
        }
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Fire the signal. Returns `false` when it had already fired.
    pub fn abort(&self, reason: AbortReason) -> bool {
        let state = &self.signal.state;
        let mut slot = state.reason.lock().unwrap_or_else(PoisonError::into_inner);
        if state.token.is_cancelled() {
            return false;
        }
        *slot = Some(reason);
        state.token.cancel();
        true
    }

    pub fn is_aborted(&self) -> bool {
        self.signal.is_aborted()
    }

    pub fn reason(&self) -> Option<AbortReason> {
        self.signal.reason()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reason_wins() {
        let controller = AbortController::new();
        assert_eq!(controller.reason(), None);
        assert!(controller.abort(AbortReason::RoundBoundary));
        assert!(!controller.abort(AbortReason::caller(Some("late".into()))));
        assert_eq!(controller.reason(), Some(AbortReason::RoundBoundary));
    }

    #[test]
    fn child_inherits_parent_reason() {
        let caller = AbortController::new();
        let child = AbortController::child_of(&caller.signal());
        caller.abort(AbortReason::caller(Some("stop".into())));

        assert!(child.is_aborted());
        assert_eq!(child.reason(), Some(AbortReason::caller(Some("stop".into()))));
        assert!(!child.abort(AbortReason::RoundBoundary));
        assert_eq!(child.reason(), Some(AbortReason::caller(Some("stop".into()))));
    }

    #[test]
    fn child_abort_does_not_reach_parent() {
        let caller = AbortController::new();
        let child = AbortController::child_of(&caller.signal());
        child.abort(AbortReason::RoundBoundary);

        assert!(!caller.is_aborted());
        assert_eq!(child.reason(), Some(AbortReason::RoundBoundary));
    }

    #[tokio::test]
    async fn aborted_resolves_after_abort() {
        let controller = AbortController::new();
        let signal = controller.signal();
        let waiter = tokio::spawn(async move {
            signal.aborted().await;
            signal.reason()
        });
        controller.abort(AbortReason::RoundBoundary);
        assert_eq!(waiter.await.unwrap(), Some(AbortReason::RoundBoundary));
    }
}

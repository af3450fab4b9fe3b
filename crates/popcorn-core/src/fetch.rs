//! Shared plumbing for the remote fetchers.
//!
//! Each fetcher publishes a [`FetchState`] through a `tokio::sync::watch`
//! channel. A request runs as a spawned task holding a
//! [`CancellationToken`]; superseding the request cancels the token, and the
//! task re-checks the token under the channel's write lock before it commits.
//! A superseded response therefore never reaches the state, no matter when
//! it arrives.

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Outcome of the most recent request, superseded wholesale by the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState<T> {
    pub is_loading: bool,
    pub error: Option<String>,
    pub data: T,
}

/// Tracks the token of the one request allowed to commit.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    token: Option<CancellationToken>,
}

impl InFlight {
    /// Cancel whatever is running and hand out a token for its successor.
    pub(crate) fn supersede(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        token
    }

    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `work` unless `token` fires first. `None` means the request was
/// superseded; that is not an error and callers drop it silently.
pub(crate) async fn cancellable<F, T>(token: &CancellationToken, work: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = work => Some(out),
    }
}

/// Apply `commit` to the published state only if `token` is still live.
/// Returns whether the state changed.
pub(crate) fn commit_if_current<S>(
    tx: &watch::Sender<S>,
    token: &CancellationToken,
    commit: impl FnOnce(&mut S) -> bool,
) -> bool {
    tx.send_if_modified(|state| {
        if token.is_cancelled() {
            return false;
        }
        commit(state)
    })
}

/// Resolve once `state` leaves the loading phase.
pub(crate) fn settled<S, F>(
    tx: &watch::Sender<S>,
    is_loading: F,
) -> impl Future<Output = ()> + Send + 'static
where
    S: Send + Sync + 'static,
    F: Fn(&S) -> bool + Send + Sync + 'static,
{
    let mut rx = tx.subscribe();
    async move {
        let _ = rx.wait_for(move |s| !is_loading(s)).await;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_supersede_cancels_previous() {
        let mut inflight = InFlight::default();
        let first = inflight.supersede();
        let second = inflight.supersede();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        drop(inflight);
        assert!(second.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_commit_is_ignored() {
        let (tx, _rx) = watch::channel(0u32);
        let token = CancellationToken::new();

        assert!(commit_if_current(&tx, &token, |s| {
            *s = 1;
            true
        }));
        token.cancel();
        assert!(!commit_if_current(&tx, &token, |s| {
            *s = 2;
            true
        }));
        assert_eq!(*tx.borrow(), 1);
    }

    #[tokio::test]
    async fn test_cancellable_returns_none_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let out = cancellable(&token, std::future::pending::<u32>()).await;
        assert!(out.is_none());

        let live = CancellationToken::new();
        assert_eq!(cancellable(&live, async { 5 }).await, Some(5));
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn test_settled_waits_for_loading_to_end() {
        let (tx, _rx) = watch::channel(FetchState {
            is_loading: true,
            error: None,
            data: 0u32,
        });

        let done = settled(&tx, |s: &FetchState<u32>| s.is_loading);
        assert_send(&done);
        let waiter = tokio::spawn(done);

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        tx.send_modify(|s| {
            s.is_loading = false;
            s.data = 7;
        });
        waiter.await.unwrap();
        assert_eq!(tx.borrow().data, 7);
    }

    #[tokio::test]
    async fn test_settled_resolves_immediately_when_idle() {
        let (tx, _rx) = watch::channel(FetchState::<u32>::default());
        settled(&tx, |s: &FetchState<u32>| s.is_loading).await;
    }
}

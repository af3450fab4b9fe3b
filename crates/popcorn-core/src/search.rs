//! Debounced, cancellable title search.
//!
//! [`SearchFetcher::observe`] is called with the current (query, page) pair
//! every time the view changes it. Each change supersedes the request in
//! flight; only the request for the latest pair may commit.

use std::sync::Arc;
use std::time::Duration;

use popcorn_api::{MovieService, SearchPage};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::fetch::{self, FetchState, InFlight};

/// Published search state: `data.results` and `data.total_results` are the
/// current hits and the total count reported by the service.
pub type SearchState = FetchState<SearchPage>;

/// Tuning knobs for [`SearchFetcher`].
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Queries shorter than this (in characters) never hit the network.
    pub min_query_len: usize,
    /// Quiet period between a change and the request it triggers.
    pub debounce: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce: Duration::ZERO,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            min_query_len: config.min_query_len,
            debounce: Duration::from_millis(config.debounce_ms),
        }
    }
}

pub struct SearchFetcher<S: MovieService> {
    service: Arc<S>,
    options: SearchOptions,
    runtime: Handle,
    tx: watch::Sender<SearchState>,
    inflight: InFlight,
    current: Option<(String, u32)>,
}

impl<S: MovieService> SearchFetcher<S> {
    pub fn new(service: Arc<S>, options: SearchOptions, runtime: Handle) -> Self {
        let (tx, _rx) = watch::channel(SearchState::default());
        Self {
            service,
            options,
            runtime,
            tx,
            inflight: InFlight::default(),
            current: None,
        }
    }

    /// React to the current (query, page) pair. Repeating the pair already
    /// being observed does nothing.
    pub fn observe(&mut self, query: &str, page: u32) {
        let page = page.max(1);
        if self
            .current
            .as_ref()
            .is_some_and(|(q, p)| q == query && *p == page)
        {
            return;
        }
        self.current = Some((query.to_string(), page));

        if query.chars().count() < self.options.min_query_len {
            self.inflight.cancel();
            self.tx.send_modify(|state| *state = SearchState::default());
            return;
        }

        let token = self.inflight.supersede();
        self.tx.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
            state.data.results.clear();
        });

        self.runtime.spawn(run_search(
            Arc::clone(&self.service),
            self.tx.clone(),
            token,
            query.to_string(),
            page,
            self.options.debounce,
        ));
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SearchState {
        self.tx.borrow().clone()
    }

    /// Resolves once no request is loading. Safe to hold across later
    /// `observe` calls; it then waits for the newest request instead.
    pub fn settled(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        fetch::settled(&self.tx, |s: &SearchState| s.is_loading)
    }
}

async fn run_search<S: MovieService>(
    service: Arc<S>,
    tx: watch::Sender<SearchState>,
    token: CancellationToken,
    query: String,
    page: u32,
    debounce: Duration,
) {
    let request = async {
        if !debounce.is_zero() {
            tokio::time::sleep(debounce).await;
        }
        service.search(&query, page).await
    };

    let Some(outcome) = fetch::cancellable(&token, request).await else {
        tracing::debug!(query = %query, page, "search superseded");
        return;
    };

    if let Err(e) = &outcome {
        tracing::warn!(query = %query, page, "search failed: {e}");
    }

    fetch::commit_if_current(&tx, &token, |state| {
        state.is_loading = false;
        match outcome {
            Ok(found) => {
                state.error = None;
                state.data = found;
            }
            Err(e) => {
                state.error = Some(e.to_string());
                state.data.results.clear();
            }
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedService, TestError};
    use popcorn_api::{MediaKind, SearchResult};

    fn hit(id: &str, title: &str) -> SearchResult {
        SearchResult {
            id: id.into(),
            title: title.into(),
            year: "2010".into(),
            poster_url: None,
            kind: MediaKind::Movie,
        }
    }

    fn page_of(hits: Vec<SearchResult>, total: u32) -> SearchPage {
        SearchPage {
            results: hits,
            total_results: total,
        }
    }

    fn fetcher(service: &Arc<ScriptedService>) -> SearchFetcher<ScriptedService> {
        SearchFetcher::new(Arc::clone(service), SearchOptions::default(), Handle::current())
    }

    #[tokio::test]
    async fn test_short_query_makes_no_request() {
        let service = Arc::new(ScriptedService::new());
        let mut search = fetcher(&service);

        search.observe("ba", 1);
        search.settled().await;

        let state = search.snapshot();
        assert!(service.calls().is_empty());
        assert!(state.data.results.is_empty());
        assert_eq!(state.data.total_results, 0);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_successful_search() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_search("inception");
        let mut search = fetcher(&service);

        search.observe("inception", 1);
        assert!(search.snapshot().is_loading);

        gate.send(Ok(page_of(vec![hit("tt1375666", "Inception")], 1)))
            .unwrap();
        search.settled().await;

        let state = search.snapshot();
        assert_eq!(state.data.results.len(), 1);
        assert_eq!(state.data.total_results, 1);
        assert!(state.error.is_none());
        assert!(!state.is_loading);
        assert_eq!(service.calls(), vec!["inception#1"]);
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let service = Arc::new(ScriptedService::new());
        let bat = service.gate_search("bat");
        let batman = service.gate_search("batman");
        let mut search = fetcher(&service);

        search.observe("bat", 1);
        tokio::task::yield_now().await;
        search.observe("batman", 1);

        batman
            .send(Ok(page_of(vec![hit("tt0372784", "Batman Begins")], 1)))
            .unwrap();
        search.settled().await;

        // The older request resolves last.
        let _ = bat.send(Ok(page_of(vec![hit("tt0000bat", "Bat*21")], 40)));
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let state = search.snapshot();
        assert_eq!(state.data.results.len(), 1);
        assert_eq!(state.data.results[0].title, "Batman Begins");
        assert_eq!(state.data.total_results, 1);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_sets_error() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_search("zzzzzz");
        let mut search = fetcher(&service);

        search.observe("zzzzzz", 1);
        gate.send(Err(TestError("Movie not found!".into()))).unwrap();
        search.settled().await;

        let state = search.snapshot();
        assert_eq!(state.error.as_deref(), Some("Movie not found!"));
        assert!(state.data.results.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_success_clears_previous_error() {
        let service = Arc::new(ScriptedService::new());
        let mut search = fetcher(&service);

        let gate = service.gate_search("qqqq");
        search.observe("qqqq", 1);
        gate.send(Err(TestError("Movie not found!".into()))).unwrap();
        search.settled().await;
        assert!(search.snapshot().error.is_some());

        let gate = service.gate_search("alien");
        search.observe("alien", 1);
        gate.send(Ok(page_of(vec![hit("tt0078748", "Alien")], 23)))
            .unwrap();
        search.settled().await;

        let state = search.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.data.total_results, 23);
    }

    #[tokio::test]
    async fn test_page_change_issues_new_request() {
        let service = Arc::new(ScriptedService::new());
        let mut search = fetcher(&service);

        let gate = service.gate_search("star");
        search.observe("star", 1);
        gate.send(Ok(page_of(vec![hit("a", "Star A")], 95))).unwrap();
        search.settled().await;

        // Same pair again: nothing new.
        search.observe("star", 1);
        assert!(!search.snapshot().is_loading);

        let gate = service.gate_search("star");
        search.observe("star", 2);
        let loading = search.snapshot();
        assert!(loading.is_loading);
        assert_eq!(loading.data.total_results, 95);

        gate.send(Ok(page_of(vec![hit("b", "Star B")], 95))).unwrap();
        search.settled().await;

        assert_eq!(service.calls(), vec!["star#1", "star#2"]);
        assert_eq!(search.snapshot().data.results[0].title, "Star B");
    }

    #[tokio::test]
    async fn test_shortening_query_cancels_and_clears() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_search("dune");
        let mut search = fetcher(&service);

        search.observe("dune", 1);
        search.observe("du", 1);
        let _ = gate.send(Ok(page_of(vec![hit("tt1160419", "Dune")], 1)));
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        let state = search.snapshot();
        assert!(state.data.results.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_skips_intermediate_queries() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_search("alien");
        let mut search = SearchFetcher::new(
            Arc::clone(&service),
            SearchOptions {
                min_query_len: 3,
                debounce: Duration::from_millis(300),
            },
            Handle::current(),
        );

        search.observe("ali", 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.observe("alie", 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.observe("alien", 1);

        gate.send(Ok(page_of(vec![hit("tt0078748", "Alien")], 1)))
            .unwrap();
        search.settled().await;

        assert_eq!(service.calls(), vec!["alien#1"]);
        assert_eq!(search.snapshot().data.results.len(), 1);
    }
}

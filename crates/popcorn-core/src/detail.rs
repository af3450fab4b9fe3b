//! Detail panel for the selected title.
//!
//! A response is committed only while its id is still the selected one, so a
//! slow answer for a title the user already moved away from is dropped. While
//! a loaded title is shown the window title reads `Movie | <title>`; it
//! reverts when the selection changes, the panel closes, or the fetcher is
//! dropped.
//!
//! Lock order is watch channel, then title slot, then title registry. Every
//! change to the title slot happens inside a `send_modify`/`send_if_modified`
//! closure so a late commit can never resurrect a title after `close`.

use std::sync::{Arc, Mutex};

use popcorn_api::{MovieDetail, MovieService};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::fetch::{self, FetchState, InFlight};
use crate::models::WatchedEntry;
use crate::title::{TitleOverride, TitleRegistry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub selected: Option<String>,
    pub fetch: FetchState<Option<MovieDetail>>,
    /// Rating picked for the shown title; 0 until the user rates it.
    pub user_rating: u8,
}

impl DetailState {
    pub fn movie(&self) -> Option<&MovieDetail> {
        self.fetch.data.as_ref()
    }
}

type TitleSlot = Arc<Mutex<Option<TitleOverride>>>;

pub struct DetailFetcher<S: MovieService> {
    service: Arc<S>,
    runtime: Handle,
    tx: watch::Sender<DetailState>,
    inflight: InFlight,
    titles: TitleRegistry,
    title_slot: TitleSlot,
    max_rating: u8,
}

impl<S: MovieService> DetailFetcher<S> {
    pub fn new(service: Arc<S>, titles: TitleRegistry, max_rating: u8, runtime: Handle) -> Self {
        let (tx, _rx) = watch::channel(DetailState::default());
        Self {
            service,
            runtime,
            tx,
            inflight: InFlight::default(),
            titles,
            title_slot: Arc::new(Mutex::new(None)),
            max_rating: max_rating.max(1),
        }
    }

    pub fn selected(&self) -> Option<String> {
        self.tx.borrow().selected.clone()
    }

    /// Show `id`, or close the panel with `None`. Selecting the id that is
    /// already shown does nothing.
    pub fn select(&mut self, id: Option<String>) {
        if self.tx.borrow().selected == id {
            return;
        }

        let token = self.inflight.supersede();
        let slot = Arc::clone(&self.title_slot);
        let loading = id.is_some();
        let selected = id.clone();
        self.tx.send_modify(move |state| {
            *state = DetailState {
                selected,
                fetch: FetchState {
                    is_loading: loading,
                    ..FetchState::default()
                },
                user_rating: 0,
            };
            let _previous = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        });

        let Some(id) = id else {
            self.inflight.cancel();
            return;
        };
        self.runtime.spawn(run_detail(
            Arc::clone(&self.service),
            self.tx.clone(),
            token,
            id,
            self.titles.clone(),
            Arc::clone(&self.title_slot),
        ));
    }

    /// Select `id`, or close the panel if it is already selected.
    pub fn toggle(&mut self, id: &str) {
        if self.tx.borrow().selected.as_deref() == Some(id) {
            self.select(None);
        } else {
            self.select(Some(id.to_string()));
        }
    }

    pub fn close(&mut self) {
        self.select(None);
    }

    /// Set the user's rating, clamped to `1..=max_rating`. Every actual
    /// change bumps the shown title's `rating_revisions`. Returns the stored
    /// rating.
    pub fn rate(&mut self, stars: u8) -> u8 {
        let stars = stars.clamp(1, self.max_rating);
        self.tx.send_if_modified(|state| {
            let Some(movie) = state.fetch.data.as_mut() else {
                return false;
            };
            if state.user_rating == stars {
                return false;
            }
            state.user_rating = stars;
            movie.rating_revisions += 1;
            true
        });
        self.tx.borrow().user_rating
    }

    /// Build the watched-list entry for the shown title. `None` until a
    /// title is loaded and rated.
    pub fn confirm(&self) -> Option<WatchedEntry> {
        let state = self.tx.borrow();
        if state.user_rating == 0 {
            return None;
        }
        let movie = state.fetch.data.clone()?;
        Some(WatchedEntry::new(movie, state.user_rating))
    }

    pub fn snapshot(&self) -> DetailState {
        self.tx.borrow().clone()
    }

    pub fn settled(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        fetch::settled(&self.tx, |s: &DetailState| s.fetch.is_loading)
    }
}

impl<S: MovieService> Drop for DetailFetcher<S> {
    fn drop(&mut self) {
        self.inflight.cancel();
        let slot = Arc::clone(&self.title_slot);
        self.tx.send_modify(move |_| {
            let _previous = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        });
    }
}

async fn run_detail<S: MovieService>(
    service: Arc<S>,
    tx: watch::Sender<DetailState>,
    token: CancellationToken,
    id: String,
    titles: TitleRegistry,
    slot: TitleSlot,
) {
    let Some(outcome) = fetch::cancellable(&token, service.movie_detail(&id)).await else {
        tracing::debug!(id = %id, "detail request superseded");
        return;
    };

    if let Err(e) = &outcome {
        tracing::warn!(id = %id, "detail request failed: {e}");
    }

    fetch::commit_if_current(&tx, &token, |state| {
        if state.selected.as_deref() != Some(id.as_str()) {
            return false;
        }
        state.fetch.is_loading = false;
        match outcome {
            Ok(mut movie) => {
                movie.rating_revisions = 0;
                let title = (!movie.title.is_empty())
                    .then(|| titles.acquire(format!("Movie | {}", movie.title)));
                *slot.lock().unwrap_or_else(|e| e.into_inner()) = title;
                state.fetch.error = None;
                state.fetch.data = Some(movie);
            }
            Err(e) => {
                state.fetch.error = Some(e.to_string());
                state.fetch.data = None;
            }
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ScriptedService, TestError};
    use crate::models::WatchedList;

    const DEFAULT_TITLE: &str = "usePopcorn";

    fn inception() -> MovieDetail {
        MovieDetail {
            id: "tt1375666".into(),
            title: "Inception".into(),
            imdb_rating: 8.8,
            runtime_minutes: 148,
            ..Default::default()
        }
    }

    fn named(id: &str, title: &str) -> MovieDetail {
        MovieDetail {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    fn fetcher(service: &Arc<ScriptedService>) -> (DetailFetcher<ScriptedService>, TitleRegistry) {
        let titles = TitleRegistry::new(DEFAULT_TITLE);
        let detail = DetailFetcher::new(
            Arc::clone(service),
            titles.clone(),
            10,
            Handle::current(),
        );
        (detail, titles)
    }

    async fn drain() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_loads_detail_and_sets_title() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt1375666");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt1375666".into()));
        assert!(detail.snapshot().fetch.is_loading);
        assert_eq!(titles.current(), DEFAULT_TITLE);

        gate.send(Ok(inception())).unwrap();
        detail.settled().await;

        let state = detail.snapshot();
        let movie = state.movie().unwrap();
        assert_eq!(movie.imdb_rating, 8.8);
        assert_eq!(movie.runtime_minutes, 148);
        assert!(state.fetch.error.is_none());
        assert_eq!(titles.current(), "Movie | Inception");
    }

    #[tokio::test]
    async fn test_stale_id_is_discarded() {
        let service = Arc::new(ScriptedService::new());
        let first = service.gate_detail("tt0078748");
        let second = service.gate_detail("tt0090605");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt0078748".into()));
        tokio::task::yield_now().await;
        detail.select(Some("tt0090605".into()));

        second.send(Ok(named("tt0090605", "Aliens"))).unwrap();
        detail.settled().await;
        let _ = first.send(Ok(named("tt0078748", "Alien")));
        drain().await;

        let state = detail.snapshot();
        assert_eq!(state.selected.as_deref(), Some("tt0090605"));
        assert_eq!(state.movie().unwrap().title, "Aliens");
        assert_eq!(titles.current(), "Movie | Aliens");
    }

    #[tokio::test]
    async fn test_close_reverts_title() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt1375666");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt1375666".into()));
        gate.send(Ok(inception())).unwrap();
        detail.settled().await;
        assert_eq!(titles.current(), "Movie | Inception");

        detail.close();
        assert_eq!(titles.current(), DEFAULT_TITLE);
        assert!(detail.snapshot().movie().is_none());
        assert!(detail.selected().is_none());
    }

    #[tokio::test]
    async fn test_close_while_loading_drops_late_response() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt1375666");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt1375666".into()));
        tokio::task::yield_now().await;
        detail.close();
        let _ = gate.send(Ok(inception()));
        drain().await;

        assert!(detail.snapshot().movie().is_none());
        assert_eq!(titles.current(), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_drop_reverts_title() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt1375666");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt1375666".into()));
        gate.send(Ok(inception())).unwrap();
        detail.settled().await;

        drop(detail);
        assert_eq!(titles.current(), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_toggle_same_id_closes() {
        let service = Arc::new(ScriptedService::new());
        let _gate = service.gate_detail("tt1375666");
        let (mut detail, _titles) = fetcher(&service);

        detail.toggle("tt1375666");
        assert_eq!(detail.selected().as_deref(), Some("tt1375666"));
        detail.toggle("tt1375666");
        assert!(detail.selected().is_none());
        assert!(!detail.snapshot().fetch.is_loading);
    }

    #[tokio::test]
    async fn test_rate_then_confirm() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt1375666");
        let (mut detail, _titles) = fetcher(&service);

        detail.select(Some("tt1375666".into()));
        assert!(detail.confirm().is_none());
        gate.send(Ok(inception())).unwrap();
        detail.settled().await;
        assert!(detail.confirm().is_none());

        assert_eq!(detail.rate(6), 6);
        assert_eq!(detail.rate(6), 6);
        assert_eq!(detail.rate(8), 8);
        assert_eq!(detail.rate(99), 10);
        assert_eq!(detail.rate(8), 8);

        let entry = detail.confirm().unwrap();
        assert_eq!(entry.user_rating, 8);
        assert_eq!(entry.movie.rating_revisions, 4);

        let mut watched = WatchedList::new();
        watched.upsert(entry);
        assert_eq!(watched.rating_for("tt1375666"), Some(8));
    }

    #[tokio::test]
    async fn test_rate_without_movie_is_ignored() {
        let service = Arc::new(ScriptedService::new());
        let (mut detail, _titles) = fetcher(&service);
        assert_eq!(detail.rate(5), 0);
    }

    #[tokio::test]
    async fn test_failure_is_surfaced() {
        let service = Arc::new(ScriptedService::new());
        let gate = service.gate_detail("tt0000000");
        let (mut detail, titles) = fetcher(&service);

        detail.select(Some("tt0000000".into()));
        gate.send(Err(TestError("Incorrect IMDb ID.".into())))
            .unwrap();
        detail.settled().await;

        let state = detail.snapshot();
        assert_eq!(state.fetch.error.as_deref(), Some("Incorrect IMDb ID."));
        assert!(state.movie().is_none());
        assert!(!state.fetch.is_loading);
        assert_eq!(titles.current(), DEFAULT_TITLE);
    }
}

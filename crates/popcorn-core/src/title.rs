//! Window title as a scoped resource.
//!
//! Whoever wants a custom title acquires a [`TitleOverride`]; the title
//! reverts to the application default when that guard is dropped, however
//! the owner goes away. A newer override replaces an older one, and the
//! older guard's drop then leaves the newer title alone.

use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct TitleInner {
    default: String,
    current: Option<(u64, String)>,
    next_id: u64,
}

/// Cloneable handle to the shared title.
#[derive(Debug, Clone)]
pub struct TitleRegistry {
    inner: Arc<Mutex<TitleInner>>,
}

impl TitleRegistry {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TitleInner {
                default: default.into(),
                current: None,
                next_id: 0,
            })),
        }
    }

    /// The title that should be shown right now.
    pub fn current(&self) -> String {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .current
            .as_ref()
            .map(|(_, title)| title.clone())
            .unwrap_or_else(|| inner.default.clone())
    }

    pub fn acquire(&self, title: impl Into<String>) -> TitleOverride {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner.current = Some((id, title.into()));
        TitleOverride {
            id,
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Holds the title until dropped.
#[derive(Debug)]
pub struct TitleOverride {
    id: u64,
    inner: Arc<Mutex<TitleInner>>,
}

impl Drop for TitleOverride {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.current.as_ref().is_some_and(|(id, _)| *id == self.id) {
            inner.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_reverts_on_drop() {
        let titles = TitleRegistry::new("usePopcorn");
        assert_eq!(titles.current(), "usePopcorn");

        let guard = titles.acquire("Movie | Inception");
        assert_eq!(titles.current(), "Movie | Inception");

        drop(guard);
        assert_eq!(titles.current(), "usePopcorn");
    }

    #[test]
    fn test_stale_guard_does_not_clobber_newer_title() {
        let titles = TitleRegistry::new("usePopcorn");
        let first = titles.acquire("Movie | Alien");
        let second = titles.acquire("Movie | Aliens");

        drop(first);
        assert_eq!(titles.current(), "Movie | Aliens");

        drop(second);
        assert_eq!(titles.current(), "usePopcorn");
    }

    #[test]
    fn test_reverts_when_owner_unwinds() {
        let titles = TitleRegistry::new("usePopcorn");
        let handle = titles.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = handle.acquire("Movie | Heat");
            panic!("view torn down");
        });
        assert!(result.is_err());
        assert_eq!(titles.current(), "usePopcorn");
    }
}

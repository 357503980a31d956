//! Serve-or-generate over a page store.

use std::future::Future;

use crate::clock::{Clock, SystemClock};
use crate::page::{PageKey, RenderedPage, StaticPage};
use crate::policy::{CacheStatus, RevalidatePolicy};
use crate::store::PageStore;

/// A page together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ServedPage {
    pub page: StaticPage,
    pub status: CacheStatus,
}

/// What the store holds for a key right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Within its revalidation interval.
    Fresh(StaticPage),
    /// Past its revalidation interval.
    Stale(StaticPage),
    /// Nothing stored, or the stored entry could not be read.
    Missing,
}

/// Incremental static regeneration over a [`PageStore`].
///
/// Store failures never fail a request: a read error is treated as a
/// missing page and a write error only means the page is generated again
/// next time. Both are logged.
pub struct IncrementalCache<S: PageStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: PageStore> IncrementalCache<S> {
    /// Create a cache using wall-clock time.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: PageStore, C: Clock> IncrementalCache<S, C> {
    /// Create a cache with an explicit clock.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The clock page ages are measured with.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Look a page up without generating anything.
    pub fn lookup(&self, key: &PageKey) -> Lookup {
        match self.store.get(key) {
            Ok(Some(page)) if page.is_fresh(self.clock.now_secs()) => Lookup::Fresh(page),
            Ok(Some(page)) => Lookup::Stale(page),
            Ok(None) => Lookup::Missing,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "page store read failed");
                Lookup::Missing
            }
        }
    }

    /// Stamp and store a rendered page.
    pub fn store_page(
        &self,
        key: &PageKey,
        rendered: RenderedPage,
        policy: &RevalidatePolicy,
    ) -> StaticPage {
        let page = StaticPage::from_rendered(rendered, policy, self.clock.now_secs());
        if let Err(e) = self.store.set(key, &page) {
            tracing::warn!(key = %key, error = %e, "page store write failed");
        }
        page
    }

    /// Drop a stored page so the next request regenerates it.
    pub fn invalidate(&self, key: &PageKey) {
        if let Err(e) = self.store.delete(key) {
            tracing::warn!(key = %key, error = %e, "page store delete failed");
        }
    }

    /// Serve a page, generating it when missing or past its interval.
    ///
    /// - fresh: served as stored (`HIT`), `generate` is not called
    /// - stale: regenerated; stored and served on success (`REVALIDATED`),
    ///   the old page is served on failure (`STALE`)
    /// - missing: generated (`MISS`); a failure is returned and nothing is stored
    pub async fn serve<F, Fut, E>(
        &self,
        key: &PageKey,
        policy: &RevalidatePolicy,
        generate: F,
    ) -> Result<ServedPage, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RenderedPage, E>>,
        E: std::fmt::Display,
    {
        match self.lookup(key) {
            Lookup::Fresh(page) => Ok(ServedPage {
                page,
                status: CacheStatus::Hit,
            }),
            Lookup::Stale(old) => match generate().await {
                Ok(rendered) => Ok(ServedPage {
                    page: self.store_page(key, rendered, policy),
                    status: CacheStatus::Revalidated,
                }),
                Err(e) => {
                    tracing::warn!(
                        key = %key,
                        error = %e,
                        age = old.age(self.clock.now_secs()),
                        "regeneration failed, serving stale page"
                    );
                    Ok(ServedPage {
                        page: old,
                        status: CacheStatus::Stale,
                    })
                }
            },
            Lookup::Missing => {
                let rendered = generate().await?;
                Ok(ServedPage {
                    page: self.store_page(key, rendered, policy),
                    status: CacheStatus::Miss,
                })
            }
        }
    }
}

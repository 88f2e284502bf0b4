//! Debounced fetch orchestration over a [`ProductSource`].
//!
//! [`Browser`] owns the [`FilterStore`], the [`ResultAccumulator`] and the
//! injected source/notifier. It registers itself as a store listener: every
//! change to a semantic filter key schedules a delayed fetch, and a newer
//! change supersedes the pending one, so a burst of edits inside the
//! quiescence window produces exactly one request for the final criteria.
//!
//! ## Response ordering
//!
//! Each fetch takes a monotonically increasing sequence number when it is
//! issued. A response is applied only if no newer fetch was issued after
//! it; otherwise it is dropped. A slow response can therefore never
//! overwrite the result of a request issued later.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use storefront_api::{ApiError, ProductSource};
use storefront_core::criteria::DEFAULT_PAGE;
use storefront_core::{
    refine, AppConfig, Brand, Category, FacetMetadata, FilterChange, FilterCriteria, FilterEvent,
    FilterKey, FilterStore, ListenerId, Pagination, ProductSummary, Refinement, ResultPage,
};
use tokio::task::JoinHandle;

use crate::accumulator::ResultAccumulator;
use crate::notify::{Notifier, Toast};

/// Default quiescence window between the last filter change and the fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct BrowseSettings {
    pub debounce: Duration,
    /// Criteria the store starts from and restores on clear-all.
    pub defaults: FilterCriteria,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            defaults: FilterCriteria::default(),
        }
    }
}

impl BrowseSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: config.debounce(),
            defaults: FilterCriteria::with_per_page(config.per_page),
        }
    }
}

/// What happened to one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page 1 response replaced the result set.
    Replaced,
    /// Later page appended to the result set.
    Appended,
    /// A newer fetch was issued while this one was in flight; the response
    /// was dropped.
    Superseded,
    /// The fetch failed; a toast was sent and the results are unchanged.
    Failed,
}

/// Point-in-time copy of the accumulated results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSnapshot {
    pub products: Vec<ProductSummary>,
    pub pagination: Option<Pagination>,
    pub facets: Option<FacetMetadata>,
    pub has_more: bool,
    pub loading: bool,
}

/// Categories and brands loaded alongside the first listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTaxonomy {
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

struct BrowseState {
    store: FilterStore,
    results: ResultAccumulator,
    taxonomy: CatalogTaxonomy,
    /// Sequence number of the most recently issued fetch.
    issued: u64,
    in_flight: Option<u64>,
}

struct Inner<S, N> {
    source: S,
    notifier: N,
    state: Mutex<BrowseState>,
    debounce: Duration,
    /// Bumped on every schedule; a woken timer only fetches if it still
    /// holds the latest value.
    debounce_generation: AtomicU64,
    /// Set while a debounced refetch is waiting out its window. Written only
    /// with `state` locked.
    refetch_scheduled: AtomicBool,
    pending: Mutex<Option<JoinHandle<Option<FetchOutcome>>>>,
}

/// Filtered, paginated product browsing session.
///
/// Cloning yields another handle to the same session. Filter mutators must be
/// called from within a Tokio runtime, since they schedule the debounced
/// fetch on it.
pub struct Browser<S, N> {
    inner: Arc<Inner<S, N>>,
}

impl<S, N> Clone for Browser<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, N> Browser<S, N>
where
    S: ProductSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, settings: BrowseSettings) -> Self {
        let inner = Arc::new(Inner {
            source,
            notifier,
            state: Mutex::new(BrowseState {
                store: FilterStore::new(settings.defaults),
                results: ResultAccumulator::new(),
                taxonomy: CatalogTaxonomy::default(),
                issued: 0,
                in_flight: None,
            }),
            debounce: settings.debounce,
            debounce_generation: AtomicU64::new(0),
            refetch_scheduled: AtomicBool::new(false),
            pending: Mutex::new(None),
        });

        let weak = Arc::downgrade(&inner);
        inner.state.lock().store.subscribe(move |event| {
            if event.touches_filters() {
                if let Some(inner) = weak.upgrade() {
                    Inner::schedule_refetch(&inner);
                }
            }
        });

        Self { inner }
    }

    /// Replaces one filter entry. See [`FilterStore::set_filter`].
    pub fn set_filter(&self, change: FilterChange) {
        self.inner.state.lock().store.set_filter(change);
    }

    /// Merges several filter entries. See [`FilterStore::set_filters`].
    pub fn set_filters<I>(&self, changes: I)
    where
        I: IntoIterator<Item = FilterChange>,
    {
        self.inner.state.lock().store.set_filters(changes);
    }

    pub fn clear_filter(&self, key: FilterKey) {
        self.inner.state.lock().store.clear_filter(key);
    }

    pub fn clear_all_filters(&self) {
        self.inner.state.lock().store.clear_all_filters();
    }

    /// Registers an additional filter-change listener.
    ///
    /// Listeners run while the session state is locked and must not call
    /// back into this `Browser`.
    pub fn subscribe_filters<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&FilterEvent) + Send + Sync + 'static,
    {
        self.inner.state.lock().store.subscribe(listener)
    }

    pub fn unsubscribe_filters(&self, id: ListenerId) -> bool {
        self.inner.state.lock().store.unsubscribe(id)
    }

    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        self.inner.state.lock().store.criteria().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> ResultSnapshot {
        let state = self.inner.state.lock();
        ResultSnapshot {
            products: state.results.products().to_vec(),
            pagination: state.results.pagination(),
            facets: state.results.facets().cloned(),
            has_more: state.results.has_more(),
            loading: state.in_flight.is_some(),
        }
    }

    #[must_use]
    pub fn taxonomy(&self) -> CatalogTaxonomy {
        self.inner.state.lock().taxonomy.clone()
    }

    /// Accumulated products after client-side refinement.
    #[must_use]
    pub fn display_list(&self, refinement: &Refinement) -> Vec<ProductSummary> {
        refine(self.inner.state.lock().results.products(), refinement)
    }

    /// Fetches immediately for the current criteria, bypassing the debounce.
    ///
    /// `page` overrides the stored page and defaults to 1. Page 1 replaces
    /// the results, anything higher appends.
    pub async fn load_results(&self, page: Option<u32>) -> FetchOutcome {
        let (criteria, seq) = {
            let mut state = self.inner.state.lock();
            Inner::<S, N>::issue(&mut state, page.unwrap_or(DEFAULT_PAGE))
        };
        self.inner.run(criteria, seq).await
    }

    /// Requests the page after the last one loaded.
    ///
    /// Returns `None` without fetching while another fetch is in flight,
    /// while a filter change is waiting for its debounced refetch, or when no
    /// further page exists.
    pub async fn load_more(&self) -> Option<FetchOutcome> {
        let (criteria, seq) = {
            let mut state = self.inner.state.lock();
            if state.in_flight.is_some() {
                tracing::debug!("load more ignored: fetch already in flight");
                return None;
            }
            if self.inner.refetch_scheduled.load(Ordering::SeqCst) {
                tracing::debug!("load more ignored: refetch for new filters pending");
                return None;
            }
            let next = state.results.next_page()?;
            Inner::<S, N>::issue(&mut state, next)
        };
        Some(self.inner.run(criteria, seq).await)
    }

    /// Loads categories, brands and the first listing page concurrently.
    ///
    /// Each failure is toasted on its own; the listing outcome is returned.
    pub async fn load_catalog(&self) -> FetchOutcome {
        let (categories, brands, outcome) = tokio::join!(
            self.inner.source.fetch_categories(),
            self.inner.source.fetch_brands(),
            self.load_results(None),
        );

        let mut failures = Vec::new();
        {
            let mut state = self.inner.state.lock();
            match categories {
                Ok(categories) => state.taxonomy.categories = categories,
                Err(err) => failures.push(err),
            }
            match brands {
                Ok(brands) => state.taxonomy.brands = brands,
                Err(err) => failures.push(err),
            }
        }
        for err in &failures {
            self.inner.report(err);
        }

        outcome
    }

    /// Waits for the pending debounced fetch, if any, to finish.
    ///
    /// Returns the outcome of the last debounced fetch that actually ran, or
    /// `None` when nothing was pending or the pending timer was superseded.
    pub async fn settle(&self) -> Option<FetchOutcome> {
        let mut last = None;
        loop {
            let Some(handle) = self.inner.pending.lock().take() else {
                break;
            };
            match handle.await {
                Ok(outcome) => last = outcome.or(last),
                Err(err) => tracing::warn!(error = %err, "debounced fetch task failed"),
            }
        }
        last
    }
}

impl<S, N> Inner<S, N>
where
    S: ProductSource,
    N: Notifier,
{
    fn schedule_refetch(this: &Arc<Self>) {
        let generation = this.debounce_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("filter changed outside a Tokio runtime; refetch not scheduled");
            return;
        };

        this.refetch_scheduled.store(true, Ordering::SeqCst);

        let weak: Weak<Self> = Arc::downgrade(this);
        let delay = this.debounce;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let inner = weak.upgrade()?;
            let (criteria, seq) = {
                let mut state = inner.state.lock();
                if inner.debounce_generation.load(Ordering::SeqCst) != generation {
                    tracing::trace!(generation, "debounced fetch superseded");
                    return None;
                }
                inner.refetch_scheduled.store(false, Ordering::SeqCst);
                // New filters always start over from the first page.
                Self::issue(&mut state, DEFAULT_PAGE)
            };
            Some(inner.run(criteria, seq).await)
        });

        *this.pending.lock() = Some(handle);
    }

    /// Moves the store to `page`, snapshots the criteria for a new fetch and
    /// marks it as the latest.
    fn issue(state: &mut BrowseState, page: u32) -> (FilterCriteria, u64) {
        state.store.set_filter(FilterChange::Page(page));
        state.issued += 1;
        state.in_flight = Some(state.issued);
        (state.store.criteria().clone(), state.issued)
    }

    async fn run(&self, criteria: FilterCriteria, seq: u64) -> FetchOutcome {
        let _in_flight = InFlight {
            state: &self.state,
            seq,
        };
        tracing::debug!(seq, page = criteria.page, "issuing product fetch");
        let result = self.source.fetch_products(&criteria).await;
        match self.apply(&criteria, seq, result) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.report(&err);
                FetchOutcome::Failed
            }
        }
    }

    fn apply(
        &self,
        criteria: &FilterCriteria,
        seq: u64,
        result: Result<ResultPage, ApiError>,
    ) -> Result<FetchOutcome, ApiError> {
        let mut state = self.state.lock();
        if state.issued != seq {
            tracing::debug!(seq, latest = state.issued, "dropping superseded response");
            return Ok(FetchOutcome::Superseded);
        }
        state.in_flight = None;

        let page = result?;
        if criteria.page <= 1 {
            state.results.replace(page, criteria.per_page);
            Ok(FetchOutcome::Replaced)
        } else {
            let added = state
                .results
                .append(page, criteria.page, criteria.per_page);
            tracing::debug!(page = criteria.page, added, "appended listing page");
            Ok(FetchOutcome::Appended)
        }
    }

    fn report(&self, err: &ApiError) {
        tracing::warn!(error = %err, "catalog request failed");
        self.notifier.notify(Toast::error(err.display_message()));
    }
}

/// Clears the in-flight marker when a fetch future is dropped before its
/// response was applied, so an abandoned fetch does not block `load_more`.
struct InFlight<'a> {
    state: &'a Mutex<BrowseState>,
    seq: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.in_flight == Some(self.seq) {
            state.in_flight = None;
        }
    }
}

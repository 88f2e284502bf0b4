//! Filtered product browsing: debounced refetching, result accumulation and
//! client-side refinement over a [`storefront_api::ProductSource`].
//!
//! [`Browser`] is the entry point. It owns the filter store, listens to its
//! changes, coalesces them into one remote query per quiescence window, and
//! reports failures to a [`Notifier`].

pub mod accumulator;
pub mod browser;
pub mod notify;

pub use accumulator::ResultAccumulator;
pub use browser::{BrowseSettings, Browser, CatalogTaxonomy, FetchOutcome, ResultSnapshot};
pub use notify::{Notifier, Toast, ToastVariant, TracingNotifier};

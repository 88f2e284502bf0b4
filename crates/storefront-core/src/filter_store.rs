//! Mutable filter state with explicit change listeners.
//!
//! [`FilterStore`] owns the current [`FilterCriteria`] and the defaults it
//! restores on [`FilterStore::clear_all_filters`]. Every mutator reports the
//! keys whose value actually changed to the registered listeners; a mutation
//! that changes nothing is silent.

use std::fmt;

use crate::criteria::{FilterChange, FilterCriteria, FilterKey, DEFAULT_PAGE};

/// Handle returned by [`FilterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Notification delivered to listeners after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEvent {
    /// Snapshot of the criteria after the mutation.
    pub criteria: FilterCriteria,
    /// Keys whose value differs from before the mutation.
    pub changed: Vec<FilterKey>,
}

impl FilterEvent {
    /// `true` if any changed key is a semantic filter rather than a page cursor.
    #[must_use]
    pub fn touches_filters(&self) -> bool {
        self.changed.iter().any(|key| !key.is_pagination())
    }
}

type Listener = Box<dyn Fn(&FilterEvent) + Send + Sync>;

pub struct FilterStore {
    criteria: FilterCriteria,
    defaults: FilterCriteria,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("criteria", &self.criteria)
            .field("defaults", &self.defaults)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl FilterStore {
    /// Creates a store whose current and default criteria are `defaults`.
    #[must_use]
    pub fn new(defaults: FilterCriteria) -> Self {
        Self {
            criteria: defaults.clone(),
            defaults,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn defaults(&self) -> &FilterCriteria {
        &self.defaults
    }

    /// Registers `listener` for every subsequent change notification.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&FilterEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Replaces one entry. Any key other than `page`/`per_page` resets the
    /// page to 1.
    pub fn set_filter(&mut self, change: FilterChange) -> Vec<FilterKey> {
        let changed = self.criteria.apply(change);
        self.emit(changed)
    }

    /// Merges several entries under the same reset rule, with one
    /// notification for the batch.
    ///
    /// Semantic keys are applied before pagination keys, so an explicit
    /// `Page` in the batch survives the reset caused by its siblings.
    pub fn set_filters<I>(&mut self, changes: I) -> Vec<FilterKey>
    where
        I: IntoIterator<Item = FilterChange>,
    {
        let (cursor, semantic): (Vec<_>, Vec<_>) = changes
            .into_iter()
            .partition(|change| change.key().is_pagination());

        let mut changed = Vec::new();
        for change in semantic.into_iter().chain(cursor) {
            for key in self.criteria.apply(change) {
                if !changed.contains(&key) {
                    changed.push(key);
                }
            }
        }
        self.emit(changed)
    }

    /// Restores one entry to its default and resets the page to 1.
    pub fn clear_filter(&mut self, key: FilterKey) -> Vec<FilterKey> {
        let mut changed = self
            .criteria
            .apply(FilterCriteria::reset_change(&self.defaults, key));
        if self.criteria.page != DEFAULT_PAGE {
            self.criteria.page = DEFAULT_PAGE;
            changed.push(FilterKey::Page);
        }
        self.emit(changed)
    }

    /// Restores the default criteria wholesale.
    pub fn clear_all_filters(&mut self) -> Vec<FilterKey> {
        let changed = self.criteria.restore(&self.defaults);
        self.emit(changed)
    }

    fn emit(&self, changed: Vec<FilterKey>) -> Vec<FilterKey> {
        if changed.is_empty() || self.listeners.is_empty() {
            return changed;
        }
        let event = FilterEvent {
            criteria: self.criteria.clone(),
            changed,
        };
        for (_, listener) in &self.listeners {
            listener(&event);
        }
        event.changed
    }
}

#[cfg(test)]
#[path = "filter_store_test.rs"]
mod tests;

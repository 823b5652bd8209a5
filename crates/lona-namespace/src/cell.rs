// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Atomically replaceable reference to an immutable snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Holds the current version of an immutable value.
///
/// Readers get the published `Arc` and keep it alive for as long as they
/// need. Writers build a new version from a snapshot and publish it with
/// [`AtomicRef::compare_and_set`], which only succeeds if nobody else
/// published in between (compared by `Arc` identity).
pub(crate) struct AtomicRef<T> {
    current: ArcSwap<T>,
}

impl<T> AtomicRef<T> {
    pub(crate) fn new(value: Arc<T>) -> Self {
        Self {
            current: ArcSwap::new(value),
        }
    }

    /// The currently published version.
    pub(crate) fn get(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Publish `new` if `expected` is still the current version.
    pub(crate) fn compare_and_set(&self, expected: &Arc<T>, new: Arc<T>) -> bool {
        let previous = self.current.compare_and_swap(expected, new);
        Arc::ptr_eq(&*previous, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_and_set_requires_identity() {
        let first = Arc::new(1);
        let cell = AtomicRef::new(Arc::clone(&first));

        // Equal value, different allocation
        assert!(!cell.compare_and_set(&Arc::new(1), Arc::new(2)));
        assert_eq!(*cell.get(), 1);

        assert!(cell.compare_and_set(&first, Arc::new(3)));
        assert_eq!(*cell.get(), 3);

        // Stale snapshot no longer matches
        assert!(!cell.compare_and_set(&first, Arc::new(4)));
        assert_eq!(*cell.get(), 3);
    }
}

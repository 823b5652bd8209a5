// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Merge cache for re-exporting one namespace into another.
//!
//! Every new namespace re-exports the public vars of `lona.core`. Building
//! that merged table from scratch for each namespace would cost a full scan
//! per importer, so the most recent result is cached and keyed by the
//! identity of the source's mapping snapshot:
//!
//! ```text
//! last_source ── same snapshot as source? ──► reuse last_merged
//!                        │ no
//!                        ▼
//!             last_merged + new public vars of source
//! ```
//!
//! An importer with no local entries yet (its table is still the
//! default-imports baseline) adopts `last_merged` as is, so all such
//! importers share one snapshot.

use std::sync::{Arc, Weak};

use super::{Mappings, Namespace};
use crate::value::Mapping;

/// Single-slot memo of the last merge.
#[derive(Default)]
pub(crate) struct MergeCache {
    source: Weak<Namespace>,
    last_source: Option<Arc<Mappings>>,
    last_merged: Option<Arc<Mappings>>,
}

impl MergeCache {
    /// Merged table for `source`'s current snapshot `ms`.
    fn refresh(
        &mut self,
        source: &Arc<Namespace>,
        ms: &Arc<Mappings>,
        baseline: &Arc<Mappings>,
    ) -> Arc<Mappings> {
        let same_source = self.source.upgrade().is_some_and(|s| Arc::ptr_eq(&s, source));
        if same_source {
            if let (Some(last), Some(merged)) = (&self.last_source, &self.last_merged) {
                if Arc::ptr_eq(last, ms) {
                    tracing::trace!(source = %source.name(), "merge cache hit");
                    return Arc::clone(merged);
                }
            }
        }

        // Additive over the previous result for the same source.
        let previous = match (&self.last_merged, same_source) {
            (Some(merged), true) => Arc::clone(merged),
            _ => Arc::clone(baseline),
        };
        let mut merge = Mappings::clone(&previous);
        let mut added = 0_usize;
        for (sym, mapping) in ms.iter() {
            let Mapping::Var(var) = mapping else {
                continue;
            };
            if !var.is_owned_by(source) || !var.is_public() {
                continue;
            }
            if merge.get(sym).is_some_and(|current| current.is_identical(mapping)) {
                continue;
            }
            merge.insert(sym.clone(), mapping.clone());
            added += 1;
        }
        tracing::trace!(source = %source.name(), added, "merge cache recomputed");

        let merged = if added == 0 {
            previous
        } else {
            Arc::new(merge)
        };
        self.source = Arc::downgrade(source);
        self.last_source = Some(Arc::clone(ms));
        self.last_merged = Some(Arc::clone(&merged));
        merged
    }
}

impl Namespace {
    /// Merge `source`'s public vars into this namespace.
    ///
    /// Entries this namespace already has take precedence over the merged
    /// exports. Returns false if another thread changed this namespace's
    /// mappings concurrently, in which case nothing was published.
    pub fn init_with(&self, source: &Arc<Self>) -> bool {
        let mut cache = self.env.merge_cache().lock();

        let ms = source.mappings.get();
        let tm = self.mappings.get();
        let baseline = self.env.default_imports();
        let merged = cache.refresh(source, &ms, baseline);

        if Arc::ptr_eq(&tm, baseline) {
            tracing::trace!(ns = %self.name, source = %source.name(), "adopting merged exports");
            return self.mappings.compare_and_set(&tm, merged);
        }

        let mut combined = Mappings::clone(&merged);
        for (sym, mapping) in tm.iter() {
            if !combined.get(sym).is_some_and(|current| current.is_identical(mapping)) {
                combined.insert(sym.clone(), mapping.clone());
            }
        }
        tracing::trace!(ns = %self.name, source = %source.name(), "overlaying local mappings");
        self.mappings.compare_and_set(&tm, Arc::new(combined))
    }
}

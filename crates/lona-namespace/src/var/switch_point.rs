// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! One-way invalidation token for specialized call sites.

use core::sync::atomic::{AtomicBool, Ordering};

/// A trip-wire shared between a var and the call sites specialized to it.
///
/// Starts valid. [`SwitchPoint::invalidate`] is permanent: there is no way
/// to make a tripped switch point valid again. A var that is rebound installs
/// a fresh switch point for call sites built afterwards.
#[derive(Debug, Default)]
pub struct SwitchPoint {
    invalidated: AtomicBool,
}

impl SwitchPoint {
    /// Create a valid switch point.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            invalidated: AtomicBool::new(false),
        }
    }

    /// True until the switch point is tripped.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.invalidated.load(Ordering::Acquire)
    }

    /// Trip the switch point. Idempotent.
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch priorities.

/// The band a work item is queued in.
///
/// The owner loop always services the highest non-empty band first, and runs
/// items within a band in submission order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Runs when nothing else is queued.
    Background,
    /// Input processing.
    Input,
    /// Ordinary marshaled calls. Used by [`Dispatcher::invoke`](crate::Dispatcher::invoke).
    #[default]
    Normal,
    /// Runs ahead of everything else.
    Send,
}

impl Priority {
    /// Number of priority bands.
    pub(crate) const COUNT: usize = 4;

    /// All priorities, highest first.
    pub(crate) const DESCENDING: [Self; Self::COUNT] =
        [Self::Send, Self::Normal, Self::Input, Self::Background];

    /// Index of this priority's band.
    #[inline]
    pub(crate) fn band(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Input => 1,
            Self::Normal => 2,
            Self::Send => 3,
        }
    }
}

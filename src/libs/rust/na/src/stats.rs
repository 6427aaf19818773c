/*
 * Copyright (C) 2024 Nils Asmussen, Barkhausen Institut
 *
 * This file is part of M3 (Microkernel-based SysteM for Heterogeneous Manycores).
 *
 * M3 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License version 2 as
 * published by the Free Software Foundation.
 *
 * M3 is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * General Public License version 2 for more details.
 */

//! Counters for the observability of the packet engine

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

macro_rules! stats {
    ($($(#[$doc:meta])* $name:ident,)*) => {
        /// The counters of a device; all of them only increase
        #[derive(Debug, Default)]
        pub struct NaStats {
            $($name: AtomicU64,)*
        }

        /// A consistent-enough copy of the counters
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct StatsSnapshot {
            $($(#[$doc])* pub $name: u64,)*
        }

        impl NaStats {
            /// Returns a copy of all counters
            pub fn snapshot(&self) -> StatsSnapshot {
                StatsSnapshot {
                    $($name: self.$name.load(Ordering::Relaxed),)*
                }
            }
        }

        impl fmt::Display for StatsSnapshot {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                $(writeln!(f, "{:>16}: {}", stringify!($name), self.$name)?;)*
                Ok(())
            }
        }
    };
}

stats! {
    /// Received packets (valid length)
    packets,
    /// Received words (including headers, excluding length words)
    words,
    /// Packets that were drained because their length exceeded the maximum
    oversized,
    /// Packets that were dropped because their class had no handler
    unknown_class,
    /// Packets that were dropped because the receive ring was full
    ring_drops,
    /// Domain readiness updates
    ready_updates,
    /// Ready messages with an unknown tile or an endpoint out of range
    invalid_ready,
    /// Interrupts that found nothing to do
    spurious_irqs,
    /// Sent packets
    sent_packets,
    /// Sent payload words
    sent_words,
}

impl NaStats {
    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn packet(&self, words: usize) {
        Self::add(&self.packets, 1);
        Self::add(&self.words, words as u64);
    }

    pub(crate) fn oversized(&self) {
        Self::add(&self.oversized, 1);
    }

    pub(crate) fn unknown_class(&self) {
        Self::add(&self.unknown_class, 1);
    }

    pub(crate) fn ring_drop(&self) {
        Self::add(&self.ring_drops, 1);
    }

    pub(crate) fn ready_update(&self) {
        Self::add(&self.ready_updates, 1);
    }

    pub(crate) fn invalid_ready(&self) {
        Self::add(&self.invalid_ready, 1);
    }

    pub(crate) fn spurious_irq(&self) {
        Self::add(&self.spurious_irqs, 1);
    }

    pub(crate) fn sent(&self, words: usize) {
        Self::add(&self.sent_packets, 1);
        Self::add(&self.sent_words, words as u64);
    }
}

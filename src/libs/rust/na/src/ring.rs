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

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::errors::{Code, Error};

/// The result of a push into a [`WordRing`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Push {
    /// The word has been stored
    Accepted,
    /// The ring was full and the word has been dropped
    Dropped,
}

/// A single-producer/single-consumer ringbuffer of words
///
/// The producer only advances `tail` and the consumer only advances `head`. One slot always stays
/// free to distinguish a full from an empty ring, so that a ring with capacity `C` holds at most
/// `C - 1` words. A push into a full ring never overwrites unread words.
#[derive(Debug)]
pub struct WordRing {
    buf: Box<[AtomicU32]>,
    head: AtomicUsize,
    tail: AtomicUsize,
}

impl WordRing {
    /// Creates a new ring with `capacity` slots
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) if the capacity is below 2 and with
    /// [`OutOfMem`](Code::OutOfMem) if the slots could not be allocated.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity < 2 {
            return Err(Error::new(Code::InvArgs));
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| Error::new(Code::OutOfMem))?;
        buf.resize_with(capacity, || AtomicU32::new(0));

        Ok(Self {
            buf: buf.into_boxed_slice(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        })
    }

    /// Returns the number of slots
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of words that are ready to be popped
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail + self.capacity() - head) % self.capacity()
    }

    /// Returns true if there is nothing to pop
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Returns the number of words that can be pushed without dropping
    pub fn free(&self) -> usize {
        self.capacity() - 1 - self.len()
    }

    /// Appends `word` to the ring (producer side)
    pub fn push(&self, word: u32) -> Push {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) % self.capacity();
        if next == self.head.load(Ordering::Acquire) {
            return Push::Dropped;
        }

        self.buf[tail].store(word, Ordering::Relaxed);
        // publish the word to the consumer
        self.tail.store(next, Ordering::Release);
        Push::Accepted
    }

    /// Removes the oldest word from the ring (consumer side)
    pub fn pop(&self) -> Option<u32> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        let word = self.buf[head].load(Ordering::Relaxed);
        // hand the slot back to the producer
        self.head
            .store((head + 1) % self.capacity(), Ordering::Release);
        Some(word)
    }
}

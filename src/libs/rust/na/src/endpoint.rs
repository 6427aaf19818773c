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

//! The per-endpoint receive state

use std::iter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use crate::errors::{Code, Error};
use crate::io::LogFlags;
use crate::na::EpId;
use crate::ring::{Push, WordRing};

#[derive(Debug, Default)]
struct WaitState {
    new_data: bool,
    interrupted: bool,
}

/// The bytes of a partially consumed word
#[derive(Debug)]
pub(crate) struct Leftover {
    bytes: [u8; 4],
    off: usize,
}

impl Leftover {
    const fn new() -> Self {
        Self {
            bytes: [0; 4],
            off: 4,
        }
    }

    pub(crate) fn set(&mut self, word: u32) {
        self.bytes = word.to_be_bytes();
        self.off = 0;
    }

    pub(crate) fn remaining(&self) -> &[u8] {
        &self.bytes[self.off..]
    }

    pub(crate) fn consume(&mut self, amount: usize) {
        self.off += amount;
        debug_assert!(self.off <= 4);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // the protected state stays consistent even if a holder panicked
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The receive state of one session on an endpoint
///
/// Every [`Endpoint::open`] creates a new session, so that a reader of a closed session never
/// shares state with the next one.
#[derive(Debug)]
pub(crate) struct Session {
    ring: WordRing,
    leftover: Mutex<Leftover>,
}

impl Session {
    /// Locks the consumer state; there is at most one reader at a time
    pub(crate) fn reader(&self) -> MutexGuard<'_, Leftover> {
        lock(&self.leftover)
    }
}

/// An endpoint of the network adapter as seen by sessions and the interrupt pump
#[derive(Debug)]
pub struct Endpoint {
    id: EpId,
    open: AtomicBool,
    session: Mutex<Option<Arc<Session>>>,
    wait: Mutex<WaitState>,
    cond: Condvar,
}

impl Endpoint {
    pub(crate) fn new(id: EpId) -> Self {
        Self {
            id,
            open: AtomicBool::new(false),
            session: Mutex::new(None),
            wait: Mutex::new(WaitState::default()),
            cond: Condvar::new(),
        }
    }

    /// Returns the id of the endpoint
    pub fn id(&self) -> EpId {
        self.id
    }

    /// Returns true if a session currently has the endpoint open
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Returns the number of buffered words
    pub fn buffered(&self) -> usize {
        lock(&self.session)
            .as_ref()
            .map(|s| s.ring.len())
            .unwrap_or(0)
    }

    /// Claims the endpoint for a session and allocates its receive ring with `capacity` words
    pub(crate) fn open(&self, capacity: usize) -> Result<(), Error> {
        if self
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::new(Code::Busy));
        }

        let ring = match WordRing::new(capacity) {
            Ok(r) => r,
            Err(e) => {
                // leave nothing behind
                self.open.store(false, Ordering::Release);
                return Err(e);
            },
        };

        *lock(&self.wait) = WaitState::default();
        *lock(&self.session) = Some(Arc::new(Session {
            ring,
            leftover: Mutex::new(Leftover::new()),
        }));

        log!(LogFlags::NaEps, "ep{}: opened with {} words", self.id, capacity);
        Ok(())
    }

    /// Releases the endpoint and frees its receive ring
    ///
    /// A reader that is blocked on the closed session is woken up and fails with
    /// [`InvState`](Code::InvState).
    pub(crate) fn close(&self) -> Result<(), Error> {
        if !self.is_open() {
            return Err(Error::new(Code::InvState));
        }

        let old = lock(&self.session).take();
        self.open.store(false, Ordering::Release);

        {
            let _st = lock(&self.wait);
            self.cond.notify_all();
        }

        log!(
            LogFlags::NaEps,
            "ep{}: closed, dropping {} buffered words",
            self.id,
            old.map(|s| s.ring.len()).unwrap_or(0)
        );
        Ok(())
    }

    /// Returns the current session, if the endpoint is open
    pub(crate) fn session(&self) -> Option<Arc<Session>> {
        lock(&self.session).clone()
    }

    fn is_current(&self, sess: &Arc<Session>) -> bool {
        lock(&self.session)
            .as_ref()
            .map_or(false, |cur| Arc::ptr_eq(cur, sess))
    }

    /// Appends the given packet including its length word to the receive ring
    ///
    /// Returns `None` if no session has the endpoint open and `Some(false)` if the ring cannot hold
    /// the whole packet. In the latter case, nothing is appended.
    pub(crate) fn deliver(&self, msg: &[u32]) -> Option<bool> {
        let sess = self.session()?;
        // we are the only producer, so that the free space can only grow meanwhile
        if sess.ring.free() < msg.len() + 1 {
            return Some(false);
        }

        for w in iter::once(msg.len() as u32).chain(msg.iter().copied()) {
            let _res = sess.ring.push(w);
            debug_assert!(_res == Push::Accepted);
        }

        self.notify();
        Some(true)
    }

    /// Signals new data to a waiting reader
    pub(crate) fn notify(&self) {
        let mut st = lock(&self.wait);
        st.new_data = true;
        self.cond.notify_all();
    }

    /// Aborts the current (or next) blocking wait of the reader
    pub fn interrupt(&self) {
        let mut st = lock(&self.wait);
        st.interrupted = true;
        self.cond.notify_all();
    }

    /// Pops the next word from the ring of `sess` and blocks while it is empty (consumer side)
    ///
    /// # Errors
    ///
    /// Fails with [`Interrupted`](Code::Interrupted) if [`Endpoint::interrupt`] was called and with
    /// [`InvState`](Code::InvState) if the session has been closed.
    pub(crate) fn pop_wait(&self, sess: &Arc<Session>) -> Result<u32, Error> {
        loop {
            // the data of a closed session is gone, even if the ring still holds some
            if !self.is_current(sess) {
                return Err(Error::new(Code::InvState));
            }
            if let Some(w) = sess.ring.pop() {
                return Ok(w);
            }

            let mut st = lock(&self.wait);
            loop {
                if st.interrupted {
                    st.interrupted = false;
                    return Err(Error::new(Code::Interrupted));
                }
                // close takes the session before it notifies us under this lock
                if !self.is_current(sess) {
                    return Err(Error::new(Code::InvState));
                }
                if st.new_data {
                    // spurious or stale wake-ups are fine; we recheck the ring above
                    st.new_data = false;
                    break;
                }
                st = self.cond.wait(st).unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}

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

//! The table of traffic-class handlers

use std::sync::{Arc, Mutex, PoisonError};

use crate::cfg;
use crate::errors::{Code, Error};
use crate::io::LogFlags;

/// A consumer of packets of one traffic class
///
/// Handlers are called synchronously by the interrupt pump and therefore must not block. If a
/// packet needs more processing, the handler has to hand it off to a queue or thread of its own.
pub trait ClassHandler: Send + Sync {
    /// Handles the given packet; `msg[0]` is the header
    fn handle(&self, msg: &[u32]);
}

impl<F> ClassHandler for F
where
    F: Fn(&[u32]) + Send + Sync,
{
    fn handle(&self, msg: &[u32]) {
        self(msg)
    }
}

/// The mapping from traffic class to handler
pub struct ClassTable {
    slots: Mutex<[Option<Arc<dyn ClassHandler>>; cfg::CLASS_NUM]>,
}

impl ClassTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Default::default()),
        }
    }

    /// Installs `handler` for the given class
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) if the class does not exist and with
    /// [`Exists`](Code::Exists) if the class has already a handler.
    pub fn register(&self, class: u8, handler: Arc<dyn ClassHandler>) -> Result<(), Error> {
        let idx = Self::index(class)?;
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots[idx].is_some() {
            return Err(Error::new(Code::Exists));
        }
        slots[idx] = Some(handler);
        log!(LogFlags::NaDisp, "class {}: handler registered", class);
        Ok(())
    }

    /// Removes the handler of the given class
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) if the class does not exist and with
    /// [`NotFound`](Code::NotFound) if the class has no handler.
    pub fn unregister(&self, class: u8) -> Result<(), Error> {
        let idx = Self::index(class)?;
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        match slots[idx].take() {
            Some(_) => {
                log!(LogFlags::NaDisp, "class {}: handler removed", class);
                Ok(())
            },
            None => Err(Error::new(Code::NotFound)),
        }
    }

    /// Returns the handler of the given class, if any
    ///
    /// The table lock is released before the handler is called, so that handlers can (un)register
    /// classes themselves.
    pub fn get(&self, class: u8) -> Option<Arc<dyn ClassHandler>> {
        let idx = Self::index(class).ok()?;
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)[idx].clone()
    }

    /// Returns true if the given class has a handler
    pub fn is_registered(&self, class: u8) -> bool {
        self.get(class).is_some()
    }

    fn index(class: u8) -> Result<usize, Error> {
        match class as usize {
            idx if idx < cfg::CLASS_NUM => Ok(idx),
            _ => Err(Error::new(Code::InvArgs)),
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

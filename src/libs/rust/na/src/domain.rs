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

//! The readiness of the endpoints in all domains

use core::sync::atomic::{AtomicU32, Ordering};

use crate::errors::{Code, Error};
use crate::na::EpId;

/// The number of endpoints per domain that can be tracked
pub const EPS_PER_DOMAIN: usize = 32;

/// One bitmask of ready endpoints per domain
///
/// The masks are only set by the interrupt pump, but can be read by everyone.
#[derive(Debug)]
pub struct DomainReadiness {
    masks: Box<[AtomicU32]>,
}

impl DomainReadiness {
    /// Creates the bitmaps for `domains` domains with no endpoint being ready
    pub fn new(domains: usize) -> Self {
        Self {
            masks: (0..domains).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    /// Returns the number of domains
    pub fn domains(&self) -> usize {
        self.masks.len()
    }

    /// Marks endpoint `ep` of domain `rank` as ready
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) if the domain or the endpoint is out of range.
    pub fn set_ready(&self, rank: usize, ep: EpId) -> Result<(), Error> {
        if ep >= EPS_PER_DOMAIN {
            return Err(Error::new(Code::InvArgs));
        }
        let mask = self.masks.get(rank).ok_or_else(|| Error::new(Code::InvArgs))?;
        mask.fetch_or(1 << ep, Ordering::Release);
        Ok(())
    }

    /// Returns the mask of ready endpoints of domain `rank`
    pub fn mask(&self, rank: usize) -> Option<u32> {
        self.masks.get(rank).map(|m| m.load(Ordering::Acquire))
    }

    /// Returns true if endpoint `ep` of domain `rank` is ready
    pub fn is_ready(&self, rank: usize, ep: EpId) -> bool {
        ep < EPS_PER_DOMAIN && self.mask(rank).map_or(false, |m| m & (1 << ep) != 0)
    }

    /// Forgets the readiness of all endpoints of domain `rank`
    pub fn clear(&self, rank: usize) -> Result<(), Error> {
        let mask = self.masks.get(rank).ok_or_else(|| Error::new(Code::InvArgs))?;
        mask.store(0, Ordering::Release);
        Ok(())
    }
}

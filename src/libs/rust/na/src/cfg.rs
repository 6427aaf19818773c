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

//! Contains the hardware constants and the runtime configuration of the network adapter

use static_assertions::const_assert;

use crate::errors::{Code, Error};
use crate::mmio::PhysAddr;

/// The physical address of the NA configuration region (tile id, core-tile list)
pub const NA_CONF_ADDR: PhysAddr = 0xE000_0000;
/// The size of the NA configuration region
pub const NA_CONF_SIZE: usize = 0x1000;

/// The configuration register that holds the local tile id
pub const REG_TILEID: usize = 0x0;
/// The configuration register that holds the number of compute tiles
pub const REG_CT_NUM: usize = 0x8;
/// The offset of the compute-tile list (one word per entry)
pub const CT_LIST_OFF: usize = 0x200;
/// The maximum number of entries in the compute-tile list
pub const MAX_CT: usize = (NA_CONF_SIZE - CT_LIST_OFF) / 4;

/// The physical address of the first endpoint of the message-passing NA
pub const EP_BASE: PhysAddr = 0xE010_0000;
/// The distance between the register windows of two endpoints
pub const EP_OFFSET: usize = 0x2000;
/// The offset of the send register within an endpoint window
pub const SEND_OFFSET: usize = 0x0;
/// The offset of the receive register within an endpoint window
pub const RECV_OFFSET: usize = 0x0;
/// The offset of the enable register within an endpoint window
pub const ENABLE_OFFSET: usize = 0x4;

/// The maximum number of words in a packet, including the header
pub const MAX_PACKET_WORDS: usize = 32;
/// The number of traffic classes
pub const CLASS_NUM: usize = 8;
/// The class that is reserved for domain-synchronization messages
pub const CLASS_DOMAIN: u8 = (CLASS_NUM - 1) as u8;

/// The maximum number of endpoints the NA can have
pub const MAX_ENDPOINTS: usize = 32;
/// The default number of endpoints
pub const DEF_ENDPOINTS: usize = 2;
/// The default capacity of the per-endpoint receive ring in words
pub const DEF_RING_CAPACITY: usize = 1024;
/// The default interrupt line of the NA
pub const DEF_IRQ: u32 = 5;

const_assert!(CLASS_NUM <= 8);
const_assert!(MAX_PACKET_WORDS >= 1);
const_assert!(ENABLE_OFFSET < EP_OFFSET);
const_assert!(DEF_ENDPOINTS <= MAX_ENDPOINTS);
// a ring needs to hold at least one packet including its length word
const_assert!(DEF_RING_CAPACITY > MAX_PACKET_WORDS + 1);

/// The runtime configuration of the network adapter
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NaConfig {
    endpoints: usize,
    ring_capacity: usize,
    irq: u32,
}

impl Default for NaConfig {
    fn default() -> Self {
        Self {
            endpoints: DEF_ENDPOINTS,
            ring_capacity: DEF_RING_CAPACITY,
            irq: DEF_IRQ,
        }
    }
}

impl NaConfig {
    /// Sets the number of endpoints
    pub fn endpoints(mut self, count: usize) -> Self {
        self.endpoints = count;
        self
    }

    /// Sets the capacity of the per-endpoint receive ring in words
    pub fn ring_capacity(mut self, words: usize) -> Self {
        self.ring_capacity = words;
        self
    }

    /// Sets the interrupt line
    pub fn irq(mut self, irq: u32) -> Self {
        self.irq = irq;
        self
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints
    }

    pub fn ring_words(&self) -> usize {
        self.ring_capacity
    }

    pub fn irq_line(&self) -> u32 {
        self.irq
    }

    /// Returns the size of the endpoint MMIO window for the configured endpoints
    pub fn ep_window_size(&self) -> usize {
        self.endpoints * EP_OFFSET
    }

    /// Checks whether the configuration can be used for a device
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoints == 0 || self.endpoints > MAX_ENDPOINTS {
            return Err(Error::new(Code::InvArgs));
        }
        if self.ring_capacity <= MAX_PACKET_WORDS + 1 {
            return Err(Error::new(Code::InvArgs));
        }
        Ok(())
    }
}

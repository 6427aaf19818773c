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

//! The register interface of the message-passing network adapter
//!
//! Every endpoint has its own register window at `EP_BASE + ep * EP_OFFSET`. Writing the send
//! register appends a word to the outgoing packet, reading the receive register pops a word from
//! the incoming FIFO. The first word of every incoming packet is its length in words; a length of
//! zero means that the FIFO is currently empty.

use derivative::Derivative;

use crate::cfg;
use crate::mmio::{Mmio, PhysAddr};

/// A NA register
pub type Reg = u32;
/// An endpoint id
pub type EpId = usize;
/// A tile id as used in packet headers and the compute-tile list
pub type TileId = u32;

/// The registers of all endpoints
#[derive(Derivative)]
#[derivative(Debug)]
pub struct NaRegs {
    #[derivative(Debug = "ignore")]
    mmio: Box<dyn Mmio>,
    endpoints: usize,
}

impl NaRegs {
    /// Creates the register interface for `endpoints` endpoints within the given mapping
    pub fn new(mmio: Box<dyn Mmio>, endpoints: usize) -> Self {
        debug_assert!(mmio.size() >= endpoints * cfg::EP_OFFSET);
        Self { mmio, endpoints }
    }

    /// Returns the number of endpoints
    pub fn endpoints(&self) -> usize {
        self.endpoints
    }

    /// Appends `word` to the outgoing packet of endpoint `ep`
    #[inline(always)]
    pub fn send(&self, ep: EpId, word: Reg) {
        self.mmio.write32(Self::ep_reg(ep, cfg::SEND_OFFSET), word);
    }

    /// Pops the next word from the incoming FIFO of endpoint `ep`
    ///
    /// Every call consumes a word. At a packet boundary, the value 0 means that no packet is
    /// pending.
    #[inline(always)]
    pub fn receive(&self, ep: EpId) -> Reg {
        self.mmio.read32(Self::ep_reg(ep, cfg::RECV_OFFSET))
    }

    /// Enables or disables the interrupt generation for endpoint `ep`
    pub fn set_enabled(&self, ep: EpId, enabled: bool) {
        self.mmio
            .write32(Self::ep_reg(ep, cfg::ENABLE_OFFSET), enabled as Reg);
    }

    /// Returns the physical address of the register at offset `reg` in the window of endpoint `ep`
    pub const fn reg_addr(ep: EpId, reg: usize) -> PhysAddr {
        cfg::EP_BASE + (ep * cfg::EP_OFFSET + reg) as PhysAddr
    }

    fn ep_reg(ep: EpId, reg: usize) -> usize {
        debug_assert!(ep < cfg::MAX_ENDPOINTS);
        ep * cfg::EP_OFFSET + reg
    }
}

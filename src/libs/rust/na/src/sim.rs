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

//! A software model of the message-passing network adapter
//!
//! The model implements the registers of the endpoints and the configuration region, so that the
//! driver can be used without hardware. Packets are injected into the receive FIFOs of the
//! endpoints and sent words are recorded per endpoint.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cfg;
use crate::errors::{Code, Error};
use crate::irq::{IrqFlags, IrqHandler, IrqId, IrqLine, IrqReturn};
use crate::mmio::{Mmio, MmioMapper, PhysAddr};
use crate::na::{EpId, TileId};

#[derive(Debug, Default)]
struct SimEp {
    rx: VecDeque<u32>,
    tx: Vec<u32>,
    enabled: bool,
    reads: usize,
}

#[derive(Debug)]
struct SimState {
    eps: Vec<SimEp>,
    tile: TileId,
    cts: Vec<TileId>,
}

/// The software network adapter
///
/// Cloning yields another handle to the same adapter.
#[derive(Clone, Debug)]
pub struct SimNoc {
    state: Arc<Mutex<SimState>>,
}

impl SimNoc {
    /// Creates an adapter for tile `tile` with the given compute-tile list
    pub fn new(tile: TileId, cts: &[TileId]) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                eps: (0..cfg::MAX_ENDPOINTS).map(|_| SimEp::default()).collect(),
                tile,
                cts: cts.to_vec(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends the packet `msg` including its length word to the receive FIFO of endpoint `ep`
    pub fn inject(&self, ep: EpId, msg: &[u32]) {
        let mut st = self.state();
        let rx = &mut st.eps[ep].rx;
        rx.push_back(msg.len() as u32);
        rx.extend(msg.iter().copied());
    }

    /// Appends the given words as they are to the receive FIFO of endpoint `ep`
    pub fn inject_raw(&self, ep: EpId, words: &[u32]) {
        self.state().eps[ep].rx.extend(words.iter().copied());
    }

    /// Returns the number of words in the receive FIFO of endpoint `ep`
    pub fn pending(&self, ep: EpId) -> usize {
        self.state().eps[ep].rx.len()
    }

    /// Returns the number of reads of the receive register of endpoint `ep` so far
    pub fn receive_count(&self, ep: EpId) -> usize {
        self.state().eps[ep].reads
    }

    /// Returns the words sent via endpoint `ep` so far
    pub fn sent(&self, ep: EpId) -> Vec<u32> {
        self.state().eps[ep].tx.clone()
    }

    /// Returns and forgets the words sent via endpoint `ep` so far
    pub fn take_sent(&self, ep: EpId) -> Vec<u32> {
        std::mem::take(&mut self.state().eps[ep].tx)
    }

    /// Returns whether endpoint `ep` is enabled
    pub fn is_enabled(&self, ep: EpId) -> bool {
        self.state().eps[ep].enabled
    }

    /// Replaces the compute-tile list
    pub fn set_tiles(&self, cts: &[TileId]) {
        self.state().cts = cts.to_vec();
    }

    fn read_reg(&self, addr: PhysAddr) -> u32 {
        let mut st = self.state();
        if let Some((ep, reg)) = ep_reg(addr) {
            let ep = &mut st.eps[ep];
            match reg {
                cfg::RECV_OFFSET => {
                    ep.reads += 1;
                    ep.rx.pop_front().unwrap_or(0)
                },
                cfg::ENABLE_OFFSET => ep.enabled as u32,
                _ => 0,
            }
        }
        else {
            match (addr - cfg::NA_CONF_ADDR) as usize {
                cfg::REG_TILEID => st.tile,
                cfg::REG_CT_NUM => st.cts.len() as u32,
                off if off >= cfg::CT_LIST_OFF => {
                    let idx = (off - cfg::CT_LIST_OFF) / 4;
                    st.cts.get(idx).copied().unwrap_or(0)
                },
                _ => 0,
            }
        }
    }

    fn write_reg(&self, addr: PhysAddr, val: u32) {
        let mut st = self.state();
        // the configuration region is read-only
        if let Some((ep, reg)) = ep_reg(addr) {
            let ep = &mut st.eps[ep];
            match reg {
                cfg::SEND_OFFSET => ep.tx.push(val),
                cfg::ENABLE_OFFSET => ep.enabled = val != 0,
                _ => {},
            }
        }
    }
}

fn ep_reg(addr: PhysAddr) -> Option<(EpId, usize)> {
    if addr < cfg::EP_BASE {
        return None;
    }
    let off = (addr - cfg::EP_BASE) as usize;
    Some((off / cfg::EP_OFFSET, off % cfg::EP_OFFSET))
}

fn within(phys: PhysAddr, size: usize, base: PhysAddr, limit: usize) -> bool {
    phys >= base && phys + size as PhysAddr <= base + limit as PhysAddr
}

impl MmioMapper for SimNoc {
    fn map(&self, phys: PhysAddr, size: usize) -> Result<Box<dyn Mmio>, Error> {
        if !within(phys, size, cfg::EP_BASE, cfg::MAX_ENDPOINTS * cfg::EP_OFFSET)
            && !within(phys, size, cfg::NA_CONF_ADDR, cfg::NA_CONF_SIZE)
        {
            return Err(Error::new(Code::MapFailed));
        }

        Ok(Box::new(SimRegion {
            noc: self.clone(),
            base: phys,
            size,
        }))
    }
}

struct SimRegion {
    noc: SimNoc,
    base: PhysAddr,
    size: usize,
}

impl Mmio for SimRegion {
    fn size(&self) -> usize {
        self.size
    }

    fn read32(&self, off: usize) -> u32 {
        debug_assert!(off + 4 <= self.size);
        self.noc.read_reg(self.base + off as PhysAddr)
    }

    fn write32(&self, off: usize, val: u32) {
        debug_assert!(off + 4 <= self.size);
        self.noc.write_reg(self.base + off as PhysAddr, val)
    }
}

struct Registration {
    id: IrqId,
    irq: u32,
    flags: IrqFlags,
    handler: Arc<dyn IrqHandler>,
}

/// A software interrupt controller
#[derive(Default)]
pub struct SimIrq {
    regs: Mutex<Vec<Registration>>,
    next_id: Mutex<IrqId>,
}

impl SimIrq {
    /// Creates a controller without handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of handlers registered for `irq`
    pub fn handlers(&self, irq: u32) -> usize {
        self.regs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.irq == irq)
            .count()
    }

    /// Raises interrupt `irq` and calls all handlers of the line
    ///
    /// Returns [`IrqReturn::Handled`] if any handler handled it.
    pub fn raise(&self, irq: u32) -> IrqReturn {
        let handlers: Vec<Arc<dyn IrqHandler>> = self
            .regs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.irq == irq)
            .map(|r| r.handler.clone())
            .collect();

        let mut res = IrqReturn::None;
        for h in handlers {
            if h.handle_irq() == IrqReturn::Handled {
                res = IrqReturn::Handled;
            }
        }
        res
    }
}

impl IrqLine for SimIrq {
    fn request(
        &self,
        irq: u32,
        flags: IrqFlags,
        handler: Arc<dyn IrqHandler>,
    ) -> Result<IrqId, Error> {
        let mut regs = self.regs.lock().unwrap_or_else(PoisonError::into_inner);
        // a line can only be shared if all handlers agree on that
        let conflict = regs.iter().any(|r| {
            r.irq == irq
                && !(r.flags.contains(IrqFlags::SHARED) && flags.contains(IrqFlags::SHARED))
        });
        if conflict {
            return Err(Error::new(Code::Busy));
        }

        let mut next = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *next;
        *next += 1;
        regs.push(Registration {
            id,
            irq,
            flags,
            handler,
        });
        Ok(id)
    }

    fn free(&self, id: IrqId) -> Result<(), Error> {
        let mut regs = self.regs.lock().unwrap_or_else(PoisonError::into_inner);
        match regs.iter().position(|r| r.id == id) {
            Some(idx) => {
                regs.remove(idx);
                Ok(())
            },
            None => Err(Error::new(Code::NotFound)),
        }
    }
}

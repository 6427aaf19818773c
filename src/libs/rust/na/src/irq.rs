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

//! The interrupt line capability and the interrupt pump

use std::sync::{Arc, PoisonError, Weak};

use bitflags::bitflags;
use num_enum::IntoPrimitive;

use crate::cfg;
use crate::dev::Device;
use crate::errors::{Code, Error};
use crate::header::Header;
use crate::io::LogFlags;
use crate::na::EpId;

/// The id of a registered interrupt handler
pub type IrqId = usize;

bitflags! {
    /// The properties of an interrupt registration
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct IrqFlags : u32 {
        /// The line is shared with other devices
        const SHARED        = 1 << 0;
        /// The line is level-triggered (active high)
        const TRIGGER_HIGH  = 1 << 1;
    }
}

/// The result of an interrupt handler
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoPrimitive)]
#[repr(u32)]
pub enum IrqReturn {
    /// The interrupt was not caused by this device
    None    = 0,
    /// The interrupt has been handled
    Handled = 1,
}

/// A handler that is called on every interrupt of the line it is registered for
pub trait IrqHandler: Send + Sync {
    fn handle_irq(&self) -> IrqReturn;
}

/// An interrupt line of the platform
pub trait IrqLine {
    /// Registers `handler` for interrupt `irq`
    fn request(
        &self,
        irq: u32,
        flags: IrqFlags,
        handler: Arc<dyn IrqHandler>,
    ) -> Result<IrqId, Error>;

    /// Removes the handler with the given id
    fn free(&self, id: IrqId) -> Result<(), Error>;
}

/// Forwards interrupts to a device without keeping it alive
struct Pump {
    dev: Weak<Device>,
}

impl IrqHandler for Pump {
    fn handle_irq(&self) -> IrqReturn {
        match self.dev.upgrade() {
            Some(dev) => dev.handle_irq(),
            None => IrqReturn::None,
        }
    }
}

impl Device {
    /// Registers the interrupt pump of this device at the given line
    ///
    /// The registration is shared and level-triggered, because the NA interrupt is shared with other
    /// devices on most platforms.
    pub fn attach_irq(self: &Arc<Self>, line: &dyn IrqLine) -> Result<IrqId, Error> {
        let pump = Arc::new(Pump {
            dev: Arc::downgrade(self),
        });
        let id = line.request(
            self.config().irq_line(),
            IrqFlags::SHARED | IrqFlags::TRIGGER_HIGH,
            pump,
        )?;
        log!(
            LogFlags::Info,
            "na: attached to irq {}",
            self.config().irq_line()
        );
        Ok(id)
    }

    /// The interrupt pump
    ///
    /// Drains the receive FIFOs of all endpoints until a whole pass finds all of them empty and
    /// routes every received packet. Returns [`IrqReturn::None`] if nothing was pending.
    pub fn handle_irq(&self) -> IrqReturn {
        let mut scratch = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        let count = self.regs.endpoints();
        let mut consumed = 0;
        let mut passes = 0;

        loop {
            let mut empty = 0;
            for ep in 0..count {
                let len = self.regs.receive(ep) as usize;
                if len == 0 {
                    empty += 1;
                    continue;
                }

                consumed += 1;
                if len > cfg::MAX_PACKET_WORDS {
                    // the FIFO has to be drained anyway to stay in sync
                    for _ in 0..len {
                        self.regs.receive(ep);
                    }
                    self.stats.oversized();
                    log!(
                        LogFlags::Error,
                        "ep{}: dropping packet with {} words (max {})",
                        ep,
                        len,
                        cfg::MAX_PACKET_WORDS
                    );
                    continue;
                }

                for w in scratch.iter_mut().take(len) {
                    *w = self.regs.receive(ep);
                }
                self.route(ep, &scratch[..len]);
            }

            passes += 1;
            if empty == count {
                break;
            }
        }

        log!(
            LogFlags::NaIrq,
            "irq: {} packets in {} passes",
            consumed,
            passes
        );

        if consumed == 0 {
            self.stats.spurious_irq();
            IrqReturn::None
        }
        else {
            IrqReturn::Handled
        }
    }

    fn route(&self, ep: EpId, msg: &[u32]) {
        let hd = Header::from_raw(msg[0]);
        self.stats.packet(msg.len());
        log!(LogFlags::NaRecv, "ep{}: received {:?} with {} words", ep, hd, msg.len());

        if hd.is_ready_msg() {
            self.mark_ready(hd);
            return;
        }

        match self.eps[ep].deliver(msg) {
            Some(true) => {},
            Some(false) => {
                self.stats.ring_drop();
                log!(
                    LogFlags::Error,
                    "ep{}: receive ring full, dropping {} words",
                    ep,
                    msg.len()
                );
            },
            None => self.dispatch(hd, msg),
        }
    }

    fn mark_ready(&self, hd: Header) {
        let res = match self.topo.tile_rank(hd.src()) {
            Some(rank) => self.domains.set_ready(rank, hd.endpoint()).map(|_| rank),
            None => Err(Error::new(Code::NotFound)),
        };

        match res {
            Ok(rank) => {
                self.stats.ready_update();
                log!(
                    LogFlags::NaDomain,
                    "domain {}: ep{} of tile {} is ready",
                    rank,
                    hd.endpoint(),
                    hd.src()
                );
            },
            Err(e) => {
                self.stats.invalid_ready();
                log!(
                    LogFlags::Error,
                    "ignoring ready message from tile {} ep{}: {}",
                    hd.src(),
                    hd.endpoint(),
                    e
                );
            },
        }
    }

    fn dispatch(&self, hd: Header, msg: &[u32]) {
        match self.classes.get(hd.class()) {
            Some(h) => {
                log!(LogFlags::NaDisp, "class {}: dispatching {} words", hd.class(), msg.len());
                h.handle(msg);
            },
            None => {
                self.stats.unknown_class();
                log!(
                    LogFlags::Error,
                    "class {}: no handler, dropping {:?}",
                    hd.class(),
                    hd
                );
            },
        }
    }
}

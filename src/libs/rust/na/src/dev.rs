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

//! The network-adapter device and the operations of its sessions

use core::cmp;

use std::sync::{Arc, Mutex, PoisonError};

use derivative::Derivative;

use crate::cfg::{self, NaConfig};
use crate::class::{ClassHandler, ClassTable};
use crate::domain::DomainReadiness;
use crate::endpoint::Endpoint;
use crate::errors::{Code, Error};
use crate::io::{LogFlags, Read, Write};
use crate::mmio::MmioMapper;
use crate::na::{EpId, NaRegs, TileId};
use crate::stats::{NaStats, StatsSnapshot};
use crate::topology::CoreTileTable;

/// The message-passing network adapter of the local tile
///
/// The device owns the register interface, one [`Endpoint`] per configured endpoint, the class
/// table and the domain readiness. Received packets are routed by the interrupt pump
/// ([`Device::handle_irq`]); sessions use [`open`](Device::open), [`read`](Device::read),
/// [`write`](Device::write) and [`close`](Device::close).
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Device {
    cfg: NaConfig,
    pub(crate) regs: NaRegs,
    pub(crate) topo: CoreTileTable,
    pub(crate) eps: Box<[Endpoint]>,
    #[derivative(Debug = "ignore")]
    pub(crate) classes: ClassTable,
    pub(crate) domains: DomainReadiness,
    pub(crate) scratch: Mutex<[u32; cfg::MAX_PACKET_WORDS]>,
    send_lock: Mutex<()>,
    pub(crate) stats: NaStats,
}

impl Device {
    /// Creates the device for the given configuration
    ///
    /// Maps the endpoint registers and the configuration region via `mapper`, sizes the domain
    /// readiness according to the compute-tile list and enables all endpoints.
    pub fn new(cfg: NaConfig, mapper: &dyn MmioMapper) -> Result<Arc<Self>, Error> {
        cfg.validate()?;

        let regs = NaRegs::new(
            mapper.map(cfg::EP_BASE, cfg.ep_window_size())?,
            cfg.endpoint_count(),
        );
        let topo = CoreTileTable::new(mapper.map(cfg::NA_CONF_ADDR, cfg::NA_CONF_SIZE)?);
        let domains = DomainReadiness::new(topo.len());

        let eps = (0..cfg.endpoint_count()).map(Endpoint::new).collect();
        for ep in 0..cfg.endpoint_count() {
            regs.set_enabled(ep, true);
        }

        log!(
            LogFlags::Info,
            "na: tile {} with {} endpoints, {} domains",
            topo.local_tile(),
            cfg.endpoint_count(),
            domains.domains()
        );

        Ok(Arc::new(Self {
            cfg,
            regs,
            topo,
            eps,
            classes: ClassTable::new(),
            domains,
            scratch: Mutex::new([0; cfg::MAX_PACKET_WORDS]),
            send_lock: Mutex::new(()),
            stats: NaStats::default(),
        }))
    }

    /// Returns the configuration of the device
    pub fn config(&self) -> &NaConfig {
        &self.cfg
    }

    /// Returns the id of the local tile
    pub fn local_tile(&self) -> TileId {
        self.topo.local_tile()
    }

    /// Returns the endpoint with the given id
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) if the endpoint does not exist.
    pub fn endpoint(&self, ep: EpId) -> Result<&Endpoint, Error> {
        self.eps.get(ep).ok_or_else(|| Error::new(Code::InvArgs))
    }

    /// Opens a session on endpoint `ep`
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) for unknown endpoints, with [`Busy`](Code::Busy) if
    /// the endpoint is already open and with [`OutOfMem`](Code::OutOfMem) if the receive ring
    /// could not be allocated.
    pub fn open(&self, ep: EpId) -> Result<(), Error> {
        self.endpoint(ep)?.open(self.cfg.ring_words())
    }

    /// Closes the session on endpoint `ep`; buffered data is dropped
    pub fn close(&self, ep: EpId) -> Result<(), Error> {
        self.endpoint(ep)?.close()
    }

    /// Aborts the current or next blocking read on endpoint `ep`
    pub fn interrupt(&self, ep: EpId) -> Result<(), Error> {
        self.endpoint(ep)?.interrupt();
        Ok(())
    }

    /// Reads `len` bytes received on endpoint `ep` into `dst`
    ///
    /// Blocks while the receive ring is empty. The words of the ring are transferred in big-endian
    /// byte order; bytes of a word that did not fit are kept for the next read. Every packet is
    /// preceded by a word holding its length in words, so that the byte stream looks like
    /// `len, header, payload..., len, header, ...`. The read stops early if `dst` fails to take
    /// more bytes, the reader is interrupted or the endpoint is closed, in which case the number
    /// of bytes transferred so far is returned.
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) for unknown endpoints, with
    /// [`InvState`](Code::InvState) if the endpoint is not open or gets closed before any byte
    /// was transferred and with [`Interrupted`](Code::Interrupted) if interrupted before any byte
    /// was transferred.
    pub fn read(&self, ep: EpId, dst: &mut dyn Write, len: usize) -> Result<usize, Error> {
        let ep = self.endpoint(ep)?;
        let sess = ep.session().ok_or_else(|| Error::new(Code::InvState))?;
        let mut left = sess.reader();

        let mut done = 0;
        while done < len {
            if left.remaining().is_empty() {
                match ep.pop_wait(&sess) {
                    Ok(w) => left.set(w),
                    Err(e) if done == 0 => return Err(e),
                    Err(_) => break,
                }
            }

            let amount = cmp::min(left.remaining().len(), len - done);
            match dst.write(&left.remaining()[..amount]) {
                Ok(n) if n > 0 => {
                    left.consume(n);
                    done += n;
                },
                _ => break,
            }
        }

        log!(LogFlags::NaRecv, "ep{}: read {} of {} bytes", ep.id(), done, len);
        Ok(done)
    }

    /// Sends `len` bytes from `src` as one packet via endpoint `ep`
    ///
    /// The bytes are packed into words in big-endian byte order; a trailing partial word is
    /// right-aligned. At most [`MAX_PACKET_WORDS`](cfg::MAX_PACKET_WORDS) words are sent. If `src`
    /// fails, the remaining words of the packet are sent as zero. Returns the number of bytes that
    /// were taken from `src`.
    ///
    /// # Errors
    ///
    /// Fails with [`InvArgs`](Code::InvArgs) for unknown endpoints.
    pub fn write(&self, ep: EpId, src: &mut dyn Read, len: usize) -> Result<usize, Error> {
        self.endpoint(ep)?;

        let len = cmp::min(len, cfg::MAX_PACKET_WORDS * 4);
        let words = (len + 3) / 4;
        if words == 0 {
            return Ok(0);
        }

        let _guard = self.send_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.regs.send(ep, words as u32);

        let mut sent = 0;
        let mut failed = false;
        for i in 0..words {
            let amount = cmp::min(4, len - i * 4);
            let mut bytes = [0u8; 4];
            if !failed {
                match src.read_exact(&mut bytes[4 - amount..]) {
                    Ok(()) => sent += amount,
                    Err(e) => {
                        log!(
                            LogFlags::Error,
                            "ep{}: source failed after {} bytes: {}",
                            ep,
                            sent,
                            e
                        );
                        bytes = [0; 4];
                        failed = true;
                    },
                }
            }
            self.regs.send(ep, u32::from_be_bytes(bytes));
        }

        self.stats.sent(words);
        log!(LogFlags::NaSend, "ep{}: sent {} words ({} bytes)", ep, words, sent);
        Ok(sent)
    }

    /// Installs `handler` for the given traffic class
    ///
    /// The handler is called from interrupt context and must not block.
    pub fn register_class(&self, class: u8, handler: Arc<dyn ClassHandler>) -> Result<(), Error> {
        self.classes.register(class, handler)
    }

    /// Removes the handler of the given traffic class
    pub fn unregister_class(&self, class: u8) -> Result<(), Error> {
        self.classes.unregister(class)
    }

    /// Returns the rank of the given tile in the compute-tile list
    pub fn tile_rank(&self, tile: TileId) -> Option<usize> {
        self.topo.tile_rank(tile)
    }

    /// Returns the compute-tile list
    pub fn topology(&self) -> &CoreTileTable {
        &self.topo
    }

    /// Returns the readiness of all domains
    pub fn domains(&self) -> &DomainReadiness {
        &self.domains
    }

    /// Returns true if endpoint `ep` of domain `rank` announced to be ready
    pub fn domain_ready(&self, rank: usize, ep: EpId) -> bool {
        self.domains.is_ready(rank, ep)
    }

    /// Returns the mask of ready endpoints of domain `rank`
    pub fn domain_mask(&self, rank: usize) -> Option<u32> {
        self.domains.mask(rank)
    }

    /// Returns the current counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        for ep in 0..self.regs.endpoints() {
            self.regs.set_enabled(ep, false);
        }
        log!(LogFlags::Info, "na: disabled {} endpoints", self.regs.endpoints());
    }
}

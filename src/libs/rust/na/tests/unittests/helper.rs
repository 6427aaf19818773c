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

use std::sync::{Arc, Mutex};

use na::cfg::NaConfig;
use na::class::ClassHandler;
use na::errors::{Code, Error};
use na::io::{Read, Write};
use na::na::TileId;
use na::sim::SimNoc;
use na::wv_assert_ok;
use na::Device;

/// The id of the local tile
pub const LOCAL: TileId = 7;
/// The compute-tile list of all tests
pub const TILES: [TileId; 4] = [3, 7, 12, 20];

pub fn setup(cfg: NaConfig) -> (SimNoc, Arc<Device>) {
    let noc = SimNoc::new(LOCAL, &TILES);
    let dev = wv_assert_ok!(Device::new(cfg, &noc));
    (noc, dev)
}

pub fn setup_default() -> (SimNoc, Arc<Device>) {
    setup(NaConfig::default())
}

/// A class handler that records all packets it receives
#[derive(Default)]
pub struct Recorder {
    msgs: Mutex<Vec<Vec<u32>>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn msgs(&self) -> Vec<Vec<u32>> {
        self.msgs.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.msgs.lock().unwrap().len()
    }
}

impl ClassHandler for Recorder {
    fn handle(&self, msg: &[u32]) {
        self.msgs.lock().unwrap().push(msg.to_vec());
    }
}

/// A destination buffer that fails after `limit` bytes
pub struct FaultyWriter {
    pub data: Vec<u8>,
    pub limit: usize,
}

impl Write for FaultyWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        if self.data.len() >= self.limit {
            return Err(Error::new(Code::WriteFailed));
        }
        let amount = buf.len().min(self.limit - self.data.len());
        self.data.extend_from_slice(&buf[..amount]);
        Ok(amount)
    }
}

/// A source buffer that fails after `limit` bytes
pub struct FaultyReader<'a> {
    pub data: &'a [u8],
    pub limit: usize,
}

impl Read for FaultyReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.limit == 0 {
            return Err(Error::new(Code::ReadFailed));
        }
        let amount = buf.len().min(self.limit).min(self.data.len());
        buf[..amount].copy_from_slice(&self.data[..amount]);
        self.data = &self.data[amount..];
        self.limit -= amount;
        Ok(amount)
    }
}

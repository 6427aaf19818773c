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

//! The compute-tile list of the system
//!
//! The list is filled by the hardware or the firmware before the driver starts. The index of a tile
//! in this list is its rank, which identifies its domain.

use core::cmp;

use derivative::Derivative;

use crate::cfg;
use crate::mmio::Mmio;
use crate::na::TileId;

/// Read-only view on the compute-tile list in the NA configuration region
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CoreTileTable {
    #[derivative(Debug = "ignore")]
    mmio: Box<dyn Mmio>,
}

impl CoreTileTable {
    /// Creates the view for the given mapping of the configuration region
    pub fn new(mmio: Box<dyn Mmio>) -> Self {
        Self { mmio }
    }

    /// Returns the id of the tile the driver runs on
    pub fn local_tile(&self) -> TileId {
        self.mmio.read32(cfg::REG_TILEID)
    }

    /// Returns the number of compute tiles
    pub fn len(&self) -> usize {
        cmp::min(self.mmio.read32(cfg::REG_CT_NUM) as usize, cfg::MAX_CT)
    }

    /// Returns true if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tile with rank `rank`
    pub fn tile(&self, rank: usize) -> Option<TileId> {
        if rank < self.len() {
            Some(self.entry(rank))
        }
        else {
            None
        }
    }

    /// Returns the rank of the given tile or `None` if it is no compute tile
    pub fn tile_rank(&self, tile: TileId) -> Option<usize> {
        (0..self.len()).find(|i| self.entry(*i) == tile)
    }

    fn entry(&self, rank: usize) -> TileId {
        self.mmio.read32(cfg::CT_LIST_OFF + rank * 4)
    }
}

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

//! The capabilities to access memory-mapped device registers

use crate::errors::Error;

/// A physical address
pub type PhysAddr = u64;

/// A mapped region of device registers
///
/// All offsets are in bytes and relative to the start of the region. Accesses are 32 bits wide and
/// have the side effects the device defines for them (e.g., a read of a receive register consumes
/// a FIFO entry).
pub trait Mmio: Send + Sync {
    /// Returns the size of the region in bytes
    fn size(&self) -> usize;

    /// Reads the 32-bit register at `off`
    fn read32(&self, off: usize) -> u32;

    /// Writes `val` to the 32-bit register at `off`
    fn write32(&self, off: usize, val: u32);
}

/// Creates mappings for physical device regions
pub trait MmioMapper {
    /// Maps `size` bytes starting at physical address `phys`
    fn map(&self, phys: PhysAddr, size: usize) -> Result<Box<dyn Mmio>, Error>;
}

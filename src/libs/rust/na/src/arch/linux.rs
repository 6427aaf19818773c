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

//! Maps physical device regions via `/dev/mem`

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::ptr;

use crate::errors::{Code, Error};
use crate::io::LogFlags;
use crate::mmio::{Mmio, MmioMapper, PhysAddr};

/// The physical memory of the machine
#[derive(Debug)]
pub struct DevMem {
    file: File,
}

impl DevMem {
    /// Opens `/dev/mem` for uncached accesses
    pub fn new() -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open("/dev/mem")
            .map_err(|e| {
                log!(LogFlags::Error, "unable to open /dev/mem: {}", e);
                Error::new(Code::MapFailed)
            })?;
        Ok(Self { file })
    }
}

impl MmioMapper for DevMem {
    fn map(&self, phys: PhysAddr, size: usize) -> Result<Box<dyn Mmio>, Error> {
        let base = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                self.file.as_raw_fd(),
                phys as libc::off_t,
            )
        };
        if base == libc::MAP_FAILED {
            log!(
                LogFlags::Error,
                "unable to map {:#x}..{:#x}",
                phys,
                phys + size as PhysAddr
            );
            return Err(Error::new(Code::MapFailed));
        }

        Ok(Box::new(MappedRegion {
            base: base as usize,
            size,
        }))
    }
}

/// A region mapped by [`DevMem`]; unmapped on drop
struct MappedRegion {
    base: usize,
    size: usize,
}

impl Mmio for MappedRegion {
    fn size(&self) -> usize {
        self.size
    }

    fn read32(&self, off: usize) -> u32 {
        assert!(off + 4 <= self.size && off % 4 == 0);
        // safety: the register is within our mapping and aligned
        unsafe { ptr::read_volatile((self.base + off) as *const u32) }
    }

    fn write32(&self, off: usize, val: u32) {
        assert!(off + 4 <= self.size && off % 4 == 0);
        // safety: see read32
        unsafe { ptr::write_volatile((self.base + off) as *mut u32, val) }
    }
}

impl Drop for MappedRegion {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.base as *mut libc::c_void, self.size);
        }
    }
}

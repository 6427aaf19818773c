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

//! The packet header codec

use core::fmt;
use core::mem;

use bitflags::bitflags;
use num_traits::PrimInt;

use crate::cfg;
use crate::na::{EpId, Reg, TileId};

/// The most significant bit of the destination field
pub const DEST_MSB: u32 = 31;
/// The least significant bit of the destination field
pub const DEST_LSB: u32 = 27;
/// The most significant bit of the class field
pub const CLASS_MSB: u32 = 26;
/// The least significant bit of the class field
pub const CLASS_LSB: u32 = 24;
/// The most significant bit of the source field
pub const SRC_MSB: u32 = 23;
/// The least significant bit of the source field
pub const SRC_LSB: u32 = 19;
/// The most significant bit of the endpoint field of domain-synchronization messages
pub const EP_MSB: u32 = 9;
/// The least significant bit of the endpoint field of domain-synchronization messages
pub const EP_LSB: u32 = 2;

bitflags! {
    /// The flags in the header of domain-synchronization messages
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct HeaderFlags : Reg {
        /// The sending endpoint is ready
        const READY         = 1 << 1;
    }
}

fn field_mask<T: PrimInt>(msb: u32, lsb: u32) -> T {
    let width = (msb - lsb + 1) as usize;
    if width >= mem::size_of::<T>() * 8 {
        !T::zero()
    }
    else {
        (T::one() << width) - T::one()
    }
}

/// Returns the bits `lsb..=msb` of `value`, shifted down to bit 0
pub fn extract<T: PrimInt>(value: T, msb: u32, lsb: u32) -> T {
    debug_assert!(msb >= lsb && (msb as usize) < mem::size_of::<T>() * 8);
    (value >> lsb as usize) & field_mask(msb, lsb)
}

/// Returns `value` with the bits `lsb..=msb` replaced by `field`
///
/// Bits of `field` that do not fit into the field are ignored.
pub fn deposit<T: PrimInt>(value: T, field: T, msb: u32, lsb: u32) -> T {
    debug_assert!(msb >= lsb && (msb as usize) < mem::size_of::<T>() * 8);
    let mask = field_mask::<T>(msb, lsb) << lsb as usize;
    (value & !mask) | ((field << lsb as usize) & mask)
}

/// The header word of a packet
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Header {
    raw: Reg,
}

impl Header {
    /// Creates a header for a packet from tile `src` to tile `dest` in the given class
    pub fn new(dest: TileId, class: u8, src: TileId) -> Self {
        let raw = deposit(0, dest, DEST_MSB, DEST_LSB);
        let raw = deposit(raw, class as Reg, CLASS_MSB, CLASS_LSB);
        Self {
            raw: deposit(raw, src, SRC_MSB, SRC_LSB),
        }
    }

    /// Creates a domain-synchronization header that announces that endpoint `ep` of tile `src`
    /// is ready
    pub fn new_ready(dest: TileId, src: TileId, ep: EpId) -> Self {
        let hd = Self::new(dest, cfg::CLASS_DOMAIN, src);
        let raw = deposit(hd.raw, ep as Reg, EP_MSB, EP_LSB);
        Self {
            raw: raw | HeaderFlags::READY.bits(),
        }
    }

    /// Interprets the given word as a header
    pub const fn from_raw(raw: Reg) -> Self {
        Self { raw }
    }

    /// Returns the raw header word
    pub const fn raw(&self) -> Reg {
        self.raw
    }

    /// Returns the destination tile
    pub fn dest(&self) -> TileId {
        extract(self.raw, DEST_MSB, DEST_LSB)
    }

    /// Returns the traffic class
    pub fn class(&self) -> u8 {
        extract(self.raw, CLASS_MSB, CLASS_LSB) as u8
    }

    /// Returns the source tile
    pub fn src(&self) -> TileId {
        extract(self.raw, SRC_MSB, SRC_LSB)
    }

    /// Returns the flags of domain-synchronization messages
    pub fn flags(&self) -> HeaderFlags {
        HeaderFlags::from_bits_truncate(self.raw)
    }

    /// Returns whether the ready flag is set
    pub fn ready(&self) -> bool {
        self.flags().contains(HeaderFlags::READY)
    }

    /// Returns the endpoint of domain-synchronization messages
    pub fn endpoint(&self) -> EpId {
        extract(self.raw, EP_MSB, EP_LSB) as EpId
    }

    /// Returns true if this is a domain-synchronization message that announces readiness
    pub fn is_ready_msg(&self) -> bool {
        self.class() == cfg::CLASS_DOMAIN && self.ready()
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Header[{:#010x}: dest={}, class={}, src={}",
            self.raw,
            self.dest(),
            self.class(),
            self.src()
        )?;
        if self.class() == cfg::CLASS_DOMAIN {
            write!(f, ", ep={}, ready={}", self.endpoint(), self.ready())?;
        }
        write!(f, "]")
    }
}

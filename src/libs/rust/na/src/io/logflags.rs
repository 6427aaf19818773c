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

use bitflags::bitflags;

use core::str;

bitflags! {
    /// All log flags of the network-adapter driver
    ///
    /// Logging is controlled at runtime via [`init`](crate::io::log::init) or the environment
    /// variable `NA_LOG` (see [`init_from_env`](crate::io::log::init_from_env)). Any part of the
    /// driver can then use the `log` macro to log something.
    ///
    /// There are three general flags: `Info`, `Debug`, and `Error`. Info and Error are enabled by
    /// default. The remaining flags control the logging of certain aspects of the driver. Note that
    /// these are logged from interrupt context and should stay disabled in production.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct LogFlags : u32 {
        /// General: informational output (enabled by default)
        const Info          = 1 << 0;
        /// General: debugging output (disable by default)
        const Debug         = 1 << 1;
        /// General: error output (enabled by default)
        const Error         = 1 << 2;

        #[doc(hidden)]
        const __na_start = 3;

        /// NA: interrupt pump passes
        const NaIrq         = 1 << (Self::__na_start.bits() + 0);
        /// NA: received packets
        const NaRecv        = 1 << (Self::__na_start.bits() + 1);
        /// NA: sent packets
        const NaSend        = 1 << (Self::__na_start.bits() + 2);
        /// NA: class dispatch
        const NaDisp        = 1 << (Self::__na_start.bits() + 3);
        /// NA: endpoint open/close
        const NaEps         = 1 << (Self::__na_start.bits() + 4);
        /// NA: domain readiness updates
        const NaDomain      = 1 << (Self::__na_start.bits() + 5);
    }
}

impl LogFlags {
    /// Returns the level used for records of this flag
    pub fn level(self) -> ::log::Level {
        if self.contains(LogFlags::Error) {
            ::log::Level::Error
        }
        else if self.contains(LogFlags::Info) {
            ::log::Level::Info
        }
        else if self.contains(LogFlags::Debug) {
            ::log::Level::Debug
        }
        else {
            ::log::Level::Trace
        }
    }
}

impl Default for LogFlags {
    fn default() -> Self {
        LogFlags::Info | LogFlags::Error
    }
}

impl str::FromStr for LogFlags {
    type Err = bitflags::parser::ParseError;

    fn from_str(flags: &str) -> Result<Self, Self::Err> {
        bitflags::parser::from_str(flags)
    }
}

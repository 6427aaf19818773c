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

//! Contains the logging and the byte-oriented I/O traits

pub mod log;
mod logflags;
mod rdwr;

pub use self::logflags::LogFlags;
pub use self::rdwr::{Read, Write};

/// Macro for logging
///
/// The arguments are formatted and handed to the `log` facade if $flag is enabled (see
/// [`LogFlags`](crate::io::LogFlags)). The level of the record is derived from the flag.
///
/// # Examples
///
/// ```
/// # use na::log;
/// # use na::io::LogFlags;
/// log!(LogFlags::NaEps, "my log entry: {}, {}", 1, "test");
/// ```
#[macro_export]
macro_rules! log {
    ($flag:expr, $($args:tt)+) => ({
        let flag: $crate::io::LogFlags = $flag;
        if $crate::io::log::enabled(flag) {
            $crate::__log::log!(
                target: "na",
                flag.level(),
                $($args)+
            );
        }
    });
}

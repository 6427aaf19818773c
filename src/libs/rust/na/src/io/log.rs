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

//! Contains the runtime log configuration

use core::sync::atomic::{AtomicU32, Ordering};

use std::env;

use crate::io::LogFlags;

/// The environment variable that holds the log flags
pub const ENV_VAR: &str = "NA_LOG";

static FLAGS: AtomicU32 = AtomicU32::new(LogFlags::Info.bits() | LogFlags::Error.bits());

/// Returns the currently enabled log flags
pub fn flags() -> LogFlags {
    LogFlags::from_bits_truncate(FLAGS.load(Ordering::Relaxed))
}

/// Returns true if any of the given flags is enabled
pub fn enabled(flags: LogFlags) -> bool {
    FLAGS.load(Ordering::Relaxed) & flags.bits() != 0
}

/// Enables exactly the given log flags
pub fn init(flags: LogFlags) {
    FLAGS.store(flags.bits(), Ordering::Relaxed);
}

/// Sets the log flags from the environment variable `NA_LOG`
///
/// The variable uses the `bitflags` text syntax (e.g., `Info | Error | NaIrq`). If the variable is
/// not set, the default flags are used. Returns the flags that are enabled afterwards.
pub fn init_from_env() -> LogFlags {
    let flags = match env::var(ENV_VAR) {
        Ok(s) => match s.parse::<LogFlags>() {
            Ok(f) => f,
            Err(e) => {
                ::log::warn!(target: "na", "ignoring invalid {}='{}': {}", ENV_VAR, s, e);
                LogFlags::default()
            },
        },
        Err(_) => LogFlags::default(),
    };
    init(flags);
    flags
}

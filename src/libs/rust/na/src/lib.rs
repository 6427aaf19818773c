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

//! The packet engine of the OpTiMSoC message-passing network adapter
//!
//! The crate moves packets between the receive/send FIFOs of the NA endpoints and software. The
//! interrupt pump ([`Device::handle_irq`](dev::Device::handle_irq)) drains all endpoints and routes
//! every packet either into the receive ring of an open endpoint, into the domain readiness
//! bitmap, or to the handler registered for its traffic class. Sessions read from and write to
//! endpoints via [`Device`](dev::Device).
//!
//! The platform provides the register mappings ([`MmioMapper`](mmio::MmioMapper)) and the
//! interrupt line ([`IrqLine`](irq::IrqLine)). Both are implemented by the software model in
//! [`sim`] and, with the feature `linux`, by [`arch::linux::DevMem`](arch).

// Macros
#[doc(hidden)]
pub use ::log as __log;
pub use static_assertions::const_assert;

#[macro_use]
pub mod io;

pub mod arch;
pub mod cfg;
pub mod class;
pub mod dev;
pub mod domain;
pub mod endpoint;
pub mod errors;
pub mod header;
pub mod irq;
pub mod mmio;
pub mod na;
pub mod ring;
pub mod sim;
pub mod stats;
pub mod topology;

pub use dev::Device;

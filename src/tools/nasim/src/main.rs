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

//! Drives the packet engine with the software network adapter
//!
//! The script contains one command per line; `#` starts a comment:
//!
//! ```text
//! tiles <tile>...          # the compute-tile list (first line only)
//! open <ep>                # opens a session on <ep>
//! <ep> <word>...           # injects a packet into the receive FIFO of <ep>
//! irq                      # raises the NA interrupt
//! ```
//!
//! The interrupt is raised once more at the end of the script.

mod error;

use log::{Level, Log, Metadata, Record};
use std::env;
use std::fs;
use std::process::exit;
use std::str::FromStr;
use std::sync::Arc;

use na::cfg::NaConfig;
use na::irq::IrqReturn;
use na::na::{EpId, TileId};
use na::sim::{SimIrq, SimNoc};
use na::Device;

struct Logger {
    level: Level,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let level_string = record.level().to_string();
            let target = if !record.target().is_empty() {
                record.target()
            }
            else {
                record.module_path().unwrap_or_default()
            };

            eprintln!("{:<5} [{}] {}", level_string, target, record.args());
        }
    }

    fn flush(&self) {
    }
}

enum Cmd {
    Tiles(Vec<TileId>),
    Open(EpId),
    Packet(EpId, Vec<u32>),
    Irq,
}

fn usage(prog: &str) -> ! {
    eprintln!("Usage: {} <script> [<endpoints>]", prog);
    exit(1)
}

fn parse_num(s: &str) -> Result<u32, error::Error> {
    let res = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    Ok(res?)
}

fn parse_script(script: &str) -> Result<Vec<Cmd>, error::Error> {
    let mut cmds = Vec::new();
    for (no, line) in script.lines().enumerate() {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            None => continue,
            Some("tiles") => Cmd::Tiles(words.map(parse_num).collect::<Result<_, _>>()?),
            Some("open") => match words.next() {
                Some(ep) => Cmd::Open(parse_num(ep)? as EpId),
                None => return Err(error::Error::Syntax(no + 1, "open needs an endpoint".into())),
            },
            Some("irq") => Cmd::Irq,
            Some(ep) => {
                let msg = words.map(parse_num).collect::<Result<Vec<_>, _>>()?;
                if msg.is_empty() {
                    return Err(error::Error::Syntax(no + 1, "empty packet".into()));
                }
                Cmd::Packet(parse_num(ep)? as EpId, msg)
            },
        };
        cmds.push(cmd);
    }
    Ok(cmds)
}

fn raise(irq: &SimIrq, line: u32) {
    match irq.raise(line) {
        IrqReturn::Handled => println!("irq {}: handled", line),
        IrqReturn::None => println!("irq {}: not for us", line),
    }
}

fn main() -> Result<(), error::Error> {
    let level = Level::from_str(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))?;
    log::set_boxed_logger(Box::new(Logger { level }))?;
    log::set_max_level(level.to_level_filter());
    na::io::log::init_from_env();

    let args: Vec<String> = env::args().collect();
    let script = match args.get(1) {
        Some(path) => fs::read_to_string(path)?,
        None => usage(&args[0]),
    };
    let mut cfg = NaConfig::default();
    if let Some(eps) = args.get(2) {
        cfg = cfg.endpoints(parse_num(eps)? as usize);
    }

    let cmds = parse_script(&script)?;
    let tiles = match cmds.first() {
        Some(Cmd::Tiles(t)) => t.clone(),
        _ => vec![0],
    };

    let noc = SimNoc::new(tiles.first().copied().unwrap_or(0), &tiles);
    let dev = Device::new(cfg, &noc)?;
    let irq = SimIrq::new();
    dev.attach_irq(&irq)?;

    for class in 0..na::cfg::CLASS_NUM as u8 {
        dev.register_class(
            class,
            Arc::new(move |msg: &[u32]| {
                println!("class {}: {:08x?}", class, msg);
            }),
        )?;
    }

    let line = dev.config().irq_line();
    for cmd in cmds {
        match cmd {
            Cmd::Tiles(_) => {},
            Cmd::Open(ep) => dev.open(ep)?,
            Cmd::Packet(ep, msg) => {
                if ep >= dev.config().endpoint_count() {
                    return Err(na::errors::Error::new(na::errors::Code::InvArgs).into());
                }
                noc.inject(ep, &msg);
            },
            Cmd::Irq => raise(&irq, line),
        }
    }
    raise(&irq, line);

    for ep in 0..dev.config().endpoint_count() {
        let ep = dev.endpoint(ep)?;
        if ep.is_open() {
            println!("ep{}: {} words buffered", ep.id(), ep.buffered());
        }
    }
    for rank in 0..dev.domains().domains() {
        if let Some(mask) = dev.domain_mask(rank) {
            println!("domain {}: ready mask {:#010x}", rank, mask);
        }
    }
    print!("{}", dev.stats());
    Ok(())
}

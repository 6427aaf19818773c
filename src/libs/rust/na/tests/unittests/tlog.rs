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

use na::errors::{Code, Error};
use na::io::{self, LogFlags, Read, Write};
use na::test::WvTester;
use na::{wv_assert, wv_assert_eq, wv_assert_err, wv_run_test};

pub fn run(t: &mut dyn WvTester) {
    wv_run_test!(t, parse_flags);
    wv_run_test!(t, enabled_flags);
    wv_run_test!(t, levels);
    wv_run_test!(t, error_codes);
    wv_run_test!(t, rdwr);
}

fn parse_flags(t: &mut dyn WvTester) {
    wv_assert_eq!(t, "Info".parse::<LogFlags>().ok(), Some(LogFlags::Info));
    wv_assert_eq!(
        t,
        "Info | NaIrq | NaDomain".parse::<LogFlags>().ok(),
        Some(LogFlags::Info | LogFlags::NaIrq | LogFlags::NaDomain)
    );
    wv_assert_eq!(t, "".parse::<LogFlags>().ok(), Some(LogFlags::empty()));
    wv_assert!(t, "Info | Bogus".parse::<LogFlags>().is_err());
    wv_assert_eq!(t, LogFlags::default(), LogFlags::Info | LogFlags::Error);
}

fn enabled_flags(t: &mut dyn WvTester) {
    let old = io::log::flags();

    io::log::init(LogFlags::NaEps | LogFlags::NaSend);
    wv_assert!(t, io::log::enabled(LogFlags::NaEps));
    wv_assert!(t, io::log::enabled(LogFlags::NaSend | LogFlags::NaRecv));
    wv_assert!(t, !io::log::enabled(LogFlags::NaRecv));
    wv_assert!(t, !io::log::enabled(LogFlags::Info));
    wv_assert_eq!(t, io::log::flags(), LogFlags::NaEps | LogFlags::NaSend);

    io::log::init(old);
    wv_assert_eq!(t, io::log::flags(), old);
}

fn levels(t: &mut dyn WvTester) {
    wv_assert_eq!(t, LogFlags::Error.level(), log::Level::Error);
    wv_assert_eq!(t, LogFlags::Info.level(), log::Level::Info);
    wv_assert_eq!(t, LogFlags::Debug.level(), log::Level::Debug);
    wv_assert_eq!(t, LogFlags::NaIrq.level(), log::Level::Trace);
}

fn error_codes(t: &mut dyn WvTester) {
    wv_assert_eq!(t, Code::from_raw(u32::from(Code::Busy)), Code::Busy);
    wv_assert_eq!(t, Code::from_raw(0xFFFF), Code::Unspecified);
    wv_assert_eq!(t, Error::new(Code::Busy).to_errno(), -16);
    wv_assert_eq!(t, Error::new(Code::Interrupted).to_errno(), -4);
    wv_assert_eq!(t, Error::new(Code::InvArgs).to_errno(), -22);
    wv_assert_eq!(t, Error::new(Code::OutOfMem).to_errno(), -12);
    wv_assert_eq!(t, Code::from(Err::<(), _>(Error::new(Code::NotFound))), Code::NotFound);
    wv_assert_eq!(t, Result::<(), Error>::from(Code::Success), Ok(()));
    wv_assert_eq!(t, format!("{}", Error::new(Code::Exists)), "Exists");
}

fn rdwr(t: &mut dyn WvTester) {
    let data = [1u8, 2, 3];
    let mut src = &data[..];
    let mut buf = [0u8; 2];
    wv_assert_eq!(t, src.read(&mut buf), Ok(2));
    wv_assert_eq!(t, buf, [1, 2]);
    wv_assert_err!(t, src.read_exact(&mut buf), Code::EndOfFile);

    let mut mem = [0u8; 4];
    let mut dst = &mut mem[..];
    wv_assert_eq!(t, dst.write(&[9, 8, 7]), Ok(3));
    wv_assert_err!(t, dst.write_all(&[6, 5]), Code::WriteFailed);
    wv_assert_eq!(t, mem, [9, 8, 7, 6]);

    let mut v = Vec::new();
    wv_assert_eq!(t, v.write(&data), Ok(3));
    wv_assert_eq!(t, v, vec![1, 2, 3]);
}

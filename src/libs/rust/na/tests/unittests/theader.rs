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

use na::cfg;
use na::header::{self, Header, HeaderFlags};
use na::test::WvTester;
use na::{wv_assert, wv_assert_eq, wv_run_test};

pub fn run(t: &mut dyn WvTester) {
    wv_run_test!(t, extract_fields);
    wv_run_test!(t, extract_widths);
    wv_run_test!(t, deposit);
    wv_run_test!(t, build);
    wv_run_test!(t, ready_msgs);
}

fn extract_fields(t: &mut dyn WvTester) {
    let raw = 0xABCD_1234u32;
    wv_assert_eq!(t, header::extract(raw, header::DEST_MSB, header::DEST_LSB), 21);
    wv_assert_eq!(t, header::extract(raw, header::CLASS_MSB, header::CLASS_LSB), 3);
    wv_assert_eq!(t, header::extract(raw, header::SRC_MSB, header::SRC_LSB), 25);
    wv_assert_eq!(t, header::extract(raw, header::EP_MSB, header::EP_LSB), 0x8D);

    let hd = Header::from_raw(raw);
    wv_assert_eq!(t, hd.dest(), 21);
    wv_assert_eq!(t, hd.class(), 3);
    wv_assert_eq!(t, hd.src(), 25);
    wv_assert!(t, !hd.ready());
    wv_assert_eq!(t, hd.raw(), raw);
}

fn extract_widths(t: &mut dyn WvTester) {
    let raw = 0xABCD_1234u32;
    // full width must not shift by the word size
    wv_assert_eq!(t, header::extract(raw, 31, 0), raw);
    wv_assert_eq!(t, header::extract(raw, 31, 31), 1);
    wv_assert_eq!(t, header::extract(raw, 0, 0), 0);
    wv_assert_eq!(t, header::extract(raw, 15, 0), 0x1234);
    wv_assert_eq!(t, header::extract(raw, 31, 16), 0xABCD);
    wv_assert_eq!(t, header::extract(raw, 7, 4), 0x3);

    for lsb in 0..32 {
        for msb in lsb..32 {
            let width = msb - lsb + 1;
            let expected = ((raw as u64 >> lsb) & ((1u64 << width) - 1)) as u32;
            wv_assert_eq!(
                t,
                header::extract(raw, msb, lsb),
                expected,
                "extract({:#x}, {}, {})",
                raw,
                msb,
                lsb
            );
        }
    }

    wv_assert_eq!(t, header::extract(u64::MAX, 63, 0), u64::MAX);
    wv_assert_eq!(t, header::extract(0x80u8, 7, 7), 1u8);
}

fn deposit(t: &mut dyn WvTester) {
    wv_assert_eq!(t, header::deposit(0u32, 0x1F, 31, 27), 0xF800_0000);
    wv_assert_eq!(t, header::deposit(0xFFFF_FFFFu32, 0, 26, 24), 0xF8FF_FFFF);
    // bits beyond the field are ignored
    wv_assert_eq!(t, header::deposit(0u32, 0xFF, 26, 24), 0x0700_0000);
    wv_assert_eq!(t, header::deposit(0u32, 0x1234_5678, 31, 0), 0x1234_5678);
}

fn build(t: &mut dyn WvTester) {
    let hd = Header::new(21, 3, 25);
    wv_assert_eq!(t, hd.dest(), 21);
    wv_assert_eq!(t, hd.class(), 3);
    wv_assert_eq!(t, hd.src(), 25);
    wv_assert_eq!(t, hd.raw(), 0xABC8_0000);
    wv_assert!(t, !hd.is_ready_msg());

    // too large values are cut to the field width
    let hd = Header::new(0x3F, 9, 0);
    wv_assert_eq!(t, hd.dest(), 0x1F);
    wv_assert_eq!(t, hd.class(), 1);
    wv_assert_eq!(t, hd.src(), 0);
}

fn ready_msgs(t: &mut dyn WvTester) {
    let hd = Header::new_ready(7, 12, 5);
    wv_assert_eq!(t, hd.dest(), 7);
    wv_assert_eq!(t, hd.class(), cfg::CLASS_DOMAIN);
    wv_assert_eq!(t, hd.src(), 12);
    wv_assert_eq!(t, hd.endpoint(), 5);
    wv_assert!(t, hd.ready());
    wv_assert_eq!(t, hd.flags(), HeaderFlags::READY);
    wv_assert!(t, hd.is_ready_msg());

    // the reserved class without the ready flag is no ready message
    let plain = Header::new(7, cfg::CLASS_DOMAIN, 12);
    wv_assert!(t, !plain.is_ready_msg());

    // neither is the ready flag in another class
    let other = Header::from_raw(Header::new(7, 2, 12).raw() | HeaderFlags::READY.bits());
    wv_assert!(t, other.ready());
    wv_assert!(t, !other.is_ready_msg());
}

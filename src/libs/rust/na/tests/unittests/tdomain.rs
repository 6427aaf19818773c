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

use na::domain::{DomainReadiness, EPS_PER_DOMAIN};
use na::errors::Code;
use na::test::WvTester;
use na::{wv_assert, wv_assert_eq, wv_assert_err, wv_assert_ok, wv_run_test};

pub fn run(t: &mut dyn WvTester) {
    wv_run_test!(t, set_and_query);
    wv_run_test!(t, out_of_range);
    wv_run_test!(t, clear);
}

fn set_and_query(t: &mut dyn WvTester) {
    let dom = DomainReadiness::new(3);
    wv_assert_eq!(t, dom.domains(), 3);
    for rank in 0..3 {
        wv_assert_eq!(t, dom.mask(rank), Some(0));
    }

    wv_assert_ok!(dom.set_ready(1, 0));
    wv_assert_ok!(dom.set_ready(1, 31));
    // setting twice is fine
    wv_assert_ok!(dom.set_ready(1, 31));

    wv_assert_eq!(t, dom.mask(0), Some(0));
    wv_assert_eq!(t, dom.mask(1), Some(0x8000_0001));
    wv_assert_eq!(t, dom.mask(2), Some(0));
    wv_assert!(t, dom.is_ready(1, 0));
    wv_assert!(t, dom.is_ready(1, 31));
    wv_assert!(t, !dom.is_ready(1, 1));
    wv_assert!(t, !dom.is_ready(0, 0));
}

fn out_of_range(t: &mut dyn WvTester) {
    let dom = DomainReadiness::new(2);
    wv_assert_err!(t, dom.set_ready(2, 0), Code::InvArgs);
    wv_assert_err!(t, dom.set_ready(0, EPS_PER_DOMAIN), Code::InvArgs);
    wv_assert_eq!(t, dom.mask(2), None);
    wv_assert!(t, !dom.is_ready(2, 0));
    wv_assert!(t, !dom.is_ready(0, EPS_PER_DOMAIN));
    wv_assert_eq!(t, dom.mask(0), Some(0));
    wv_assert_eq!(t, dom.mask(1), Some(0));

    let none = DomainReadiness::new(0);
    wv_assert_err!(t, none.set_ready(0, 0), Code::InvArgs);
    wv_assert_err!(t, none.clear(0), Code::InvArgs);
}

fn clear(t: &mut dyn WvTester) {
    let dom = DomainReadiness::new(2);
    wv_assert_ok!(dom.set_ready(0, 3));
    wv_assert_ok!(dom.set_ready(1, 4));
    wv_assert_ok!(dom.clear(0));
    wv_assert_eq!(t, dom.mask(0), Some(0));
    wv_assert_eq!(t, dom.mask(1), Some(1 << 4));
}

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

use na::errors::Code;
use na::ring::{Push, WordRing};
use na::test::WvTester;
use na::{wv_assert, wv_assert_eq, wv_assert_err, wv_assert_ok, wv_run_test};

pub fn run(t: &mut dyn WvTester) {
    wv_run_test!(t, create);
    wv_run_test!(t, fifo);
    wv_run_test!(t, full);
    wv_run_test!(t, wrap_around);
}

fn create(t: &mut dyn WvTester) {
    wv_assert_err!(t, WordRing::new(0), Code::InvArgs);
    wv_assert_err!(t, WordRing::new(1), Code::InvArgs);

    let ring = wv_assert_ok!(WordRing::new(2));
    wv_assert_eq!(t, ring.capacity(), 2);
    wv_assert_eq!(t, ring.len(), 0);
    wv_assert_eq!(t, ring.free(), 1);
    wv_assert!(t, ring.is_empty());
    wv_assert_eq!(t, ring.pop(), None);
}

fn fifo(t: &mut dyn WvTester) {
    let ring = wv_assert_ok!(WordRing::new(16));
    for i in 1..=5 {
        wv_assert_eq!(t, ring.push(i * 0x1111), Push::Accepted);
    }
    wv_assert_eq!(t, ring.len(), 5);

    for i in 1..=5 {
        wv_assert_eq!(t, ring.pop(), Some(i * 0x1111));
    }
    wv_assert!(t, ring.is_empty());
    wv_assert_eq!(t, ring.pop(), None);
}

fn full(t: &mut dyn WvTester) {
    let ring = wv_assert_ok!(WordRing::new(4));
    wv_assert_eq!(t, ring.push(1), Push::Accepted);
    wv_assert_eq!(t, ring.push(2), Push::Accepted);
    wv_assert_eq!(t, ring.push(3), Push::Accepted);
    wv_assert_eq!(t, ring.free(), 0);

    // a full ring keeps its content
    wv_assert_eq!(t, ring.push(4), Push::Dropped);
    wv_assert_eq!(t, ring.push(5), Push::Dropped);
    wv_assert_eq!(t, ring.len(), 3);

    wv_assert_eq!(t, ring.pop(), Some(1));
    wv_assert_eq!(t, ring.push(6), Push::Accepted);
    wv_assert_eq!(t, ring.push(7), Push::Dropped);

    wv_assert_eq!(t, ring.pop(), Some(2));
    wv_assert_eq!(t, ring.pop(), Some(3));
    wv_assert_eq!(t, ring.pop(), Some(6));
    wv_assert_eq!(t, ring.pop(), None);
}

fn wrap_around(t: &mut dyn WvTester) {
    let ring = wv_assert_ok!(WordRing::new(5));
    let mut next_push = 0u32;
    let mut next_pop = 0u32;
    let mut max_len = 0;

    for round in 0..100 {
        // push more than fits every few rounds
        let pushes = if round % 7 == 0 { 6 } else { 3 };
        for _ in 0..pushes {
            if ring.push(next_push) == Push::Accepted {
                next_push += 1;
            }
            max_len = max_len.max(ring.len());
        }

        while let Some(w) = ring.pop() {
            wv_assert_eq!(t, w, next_pop);
            next_pop += 1;
        }
    }

    wv_assert_eq!(t, max_len, 4);
    wv_assert_eq!(t, next_pop, next_push);
}

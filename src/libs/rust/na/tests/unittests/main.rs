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

mod helper;
mod tdomain;
mod theader;
mod tlog;
mod tring;

use na::io::{self, LogFlags};
use na::test::{DefaultWvTester, WvTester};
use na::wv_run_suite;

#[test]
fn unittests() {
    // the suites provoke errors on purpose
    io::log::init(LogFlags::empty());

    let mut tester = DefaultWvTester::default();
    wv_run_suite!(tester, tring::run);
    wv_run_suite!(tester, theader::run);
    wv_run_suite!(tester, ttopology::run);
    wv_run_suite!(tester, tdomain::run);
    wv_run_suite!(tester, tclass::run);
    wv_run_suite!(tester, tpump::run);
    wv_run_suite!(tester, tdev::run);
    wv_run_suite!(tester, tstats::run);
    wv_run_suite!(tester, tlog::run);
    println!("{}", tester);

    assert_eq!(tester.failures(), 0);
}

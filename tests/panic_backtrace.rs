// SPDX-License-Identifier: MIT OR Apache-2.0
use prettylog::{Level, ScopedHandler, get_logger};
use std::fs;
use std::panic::{self, AssertUnwindSafe};

// only test in this binary, so nothing else reads the environment while it changes
#[test]
fn failure_detail_has_a_backtrace_without_rust_backtrace() {
    // SAFETY: no other thread of this test binary touches the environment
    unsafe {
        std::env::remove_var("RUST_BACKTRACE");
        std::env::remove_var("RUST_LIB_BACKTRACE");
    }
    let logger = get_logger("panic_backtrace");
    logger.set_level(Some(Level::Info));
    logger.set_propagate(false);
    let dir = tempfile::tempdir().unwrap();

    let closure_log = dir.path().join("closure.log");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        ScopedHandler::file(&logger, &closure_log).run(|| -> u8 { panic!("disk on fire") })
    }));
    assert!(outcome.is_err());
    let written = fs::read_to_string(&closure_log).unwrap();
    assert!(written.contains("disk on fire"), "{written}");
    assert!(written.contains("panic_backtrace.rs"), "{written}");
    assert!(written.contains("stack backtrace:"), "{written}");

    let guard_log = dir.path().join("guard.log");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _scope = ScopedHandler::file(&logger, &guard_log).enter().unwrap();
        panic!("fan stopped");
    }));
    assert!(outcome.is_err());
    let written = fs::read_to_string(&guard_log).unwrap();
    assert!(written.starts_with("Unhandled panic while FileDestination was attached"));
    assert!(written.contains("fan stopped"), "{written}");
    assert!(written.contains("panic_backtrace.rs"), "{written}");
    assert!(written.contains("stack backtrace:"), "{written}");
}

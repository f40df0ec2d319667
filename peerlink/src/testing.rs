//! Helpers for testing services built on this crate.
//!
//! [`capture_logs`] installs a logger that keeps records per thread, so a
//! current-thread `#[tokio::test]` sees exactly what its own tasks logged.

use std::{cell::RefCell, sync::Once};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: log::Level,
    pub target: String,
    pub message: String,
}

struct Capture;
static CAPTURE: Capture = Capture;

thread_local! {
    static RECORDS: RefCell<Vec<Captured>> = const { RefCell::new(Vec::new()) };
}

impl log::Log for Capture {
    fn enabled(&self, md: &log::Metadata) -> bool {
        md.level() <= log::Level::Info
    }

    fn log(&self, rec: &log::Record) {
        if self.enabled(rec.metadata()) {
            let captured = Captured {
                level: rec.level(),
                target: rec.target().to_owned(),
                message: rec.args().to_string(),
            };
            RECORDS.with_borrow_mut(|r| r.push(captured));
        }
    }

    fn flush(&self) {}
}

/// Start capturing on this thread, dropping anything captured before.
///
/// Panics if some other logger was installed first.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CAPTURE).expect("another logger is already installed");
        log::set_max_level(log::LevelFilter::Info);
    });
    RECORDS.with_borrow_mut(Vec::clear);
}

/// Take the records logged on this thread under `target` (a module path
/// prefix) since the last call.
pub fn take_logs(target: &str) -> Vec<Captured> {
    RECORDS.with_borrow_mut(|r| {
        let (taken, rest): (Vec<_>, Vec<_>) =
            r.drain(..).partition(|c| c.target.starts_with(target));
        *r = rest;
        taken
    })
}

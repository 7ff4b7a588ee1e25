#![doc(test(attr(deny(warnings))))]

//! Santri Core offers the ledger, allocation, and document primitives that
//! power pesantren student-services administration workflows.

pub mod blob;
pub mod config;
pub mod domain;
pub mod errors;
pub mod format;
pub mod periode;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Santri Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}

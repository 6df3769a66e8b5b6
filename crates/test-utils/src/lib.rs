//! Mock DID registry, key fixtures and tracing setup for wallet tests.

mod fixtures;
mod registry;

use std::sync::Once;

pub use crate::fixtures::*;
pub use crate::registry::{MockRegistry, Mode};

static INIT: Once = Once::new();

/// Send `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracer() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#![doc(test(attr(deny(warnings))))]

//! MediPanel core holds the client-side behaviour shared by every entity view
//! of the MediPanel administrative panel: the multi-step record wizard, the
//! in-memory filter engine, and the entity declarations that drive both.

pub mod api;
pub mod config;
pub mod entities;
pub mod errors;
pub mod filter;
pub mod session;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("MediPanel core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}

#![doc(test(attr(deny(warnings))))]

//! BitTrip Core models trip planning: proportional budget allocation,
//! trip drafts with itineraries, and a gift-card wallet, plus the shell
//! that drives them.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod planner;
pub mod trip;
pub mod utils;
pub mod wallet;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("BitTrip Core tracing initialized.");
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

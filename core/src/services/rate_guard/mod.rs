//! Fixed-window rate guard for the issuance-adjacent endpoints
//!
//! Two independent counters are kept: generic request volume per client
//! address, and login attempts per target account. Counting relies entirely
//! on the store's atomic bounded increment, so any number of server
//! instances sharing a store admit at most the configured limit per window.

mod guard;

#[cfg(test)]
mod tests;

pub use guard::{RateDecision, RateGuard, RateScope};

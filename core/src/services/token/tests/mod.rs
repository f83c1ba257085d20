//! Unit tests for signing, issuance and validation

mod helpers;

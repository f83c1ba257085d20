//! Tests for the session facade

//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - An in-memory user directory for mocking persistence
//! - Recording diagnostics and a fixed issuer name provider
//! - A builder for HTTP-level app state

mod app_state_builder;
mod directory_mocks;
mod factories;

pub use app_state_builder::*;
pub use directory_mocks::*;
pub use factories::*;

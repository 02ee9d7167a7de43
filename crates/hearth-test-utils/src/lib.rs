//! Shared test utilities for the hearth workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`location`]: [`TestLocation`] builder for on-disk directory fixtures

pub mod location;

pub use location::TestLocation;

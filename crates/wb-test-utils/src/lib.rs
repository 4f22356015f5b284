//! Shared test utilities for the web-builder workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for on-disk project layouts
//! - [`workspace`]: multi-package workspace fixtures

pub mod project;
pub mod workspace;

pub use project::TestProject;

//! Shared test utilities for the gitbackup workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: history repository fixtures and inspection helpers
//! - [`archive`]: builders for the two-layer export artifact
//! - [`runtime`]: [`runtime::FakeRuntime`], a scripted export runtime

pub mod archive;
pub mod git;
pub mod runtime;

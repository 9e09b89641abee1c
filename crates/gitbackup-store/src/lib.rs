//! Document store access for gitbackup
//!
//! The platform keeps accounts in a `users` collection and projects in a
//! `projects` collection. This crate resolves an account email to its
//! internal id, answers whether that id may read a project, and lists the
//! projects it can read.
//!
//! [`DocumentStore`] is the seam the pipelines are written against;
//! [`MongoStore`] talks to the real database and [`MemoryStore`] serves
//! fixed data for tests.

pub mod address;
pub mod error;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod store;

pub use address::StoreAddress;
pub use error::{Error, Result};
pub use memory::{MemoryProject, MemoryStore};
pub use model::{ProjectId, ProjectSummary, UserId};
pub use mongo::{MongoStore, canonical_project_id};
pub use store::DocumentStore;

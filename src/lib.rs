//! A small, local, single-user version-control engine.
//!
//! Files are stored as content-addressed blobs, commits form a DAG keyed by
//! SHA-1 digest, and named branches point into that DAG. A single staging
//! area collects the changes for the next commit. Branches can be merged
//! with a three-way, file-level merge that writes textual conflict markers
//! when both sides changed the same file.
//!
//! The engine lives in [`Repository`], which works against any storage
//! [`Backend`](store::Backend). [`store::OnDisk`] keeps everything under a
//! `.twig` directory; [`store::InMemory`] is useful for tests.

pub mod commit;

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod graph;
pub mod object;

pub mod repository;
pub use repository::Repository;

pub mod staging;
pub mod store;

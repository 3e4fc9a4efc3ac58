//! Repository implementations module.
//!
//! This module contains the implementations of the `YardRepository` trait:
//! - `local`: In-memory implementation for unit testing and local development
//! - `file`: JSON document on disk, loaded into memory on open
pub mod file;
pub mod local;

pub use file::FileRepository;
pub use local::LocalRepository;

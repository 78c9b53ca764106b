//! Video record store.
//!
//! The upload paths only need two operations: load a record by id and write
//! back its URL fields. [`VideoRepository`] captures exactly that, with a
//! Postgres implementation for deployments and an in-memory one for
//! development and tests.

pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use postgres::PgVideoRepository;
pub use repository::VideoRepository;

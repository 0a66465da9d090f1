//! Objective Repository Module
//!
//! Split into specialized sub-modules:
//! - objective_repo: Document CRUD and partial updates
//! - objective_positioning: Batched, transactional order updates

mod objective_positioning;
mod objective_repo;

pub use objective_repo::SqliteObjectiveRepository;

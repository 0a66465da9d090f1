//! OKR Remote Store
//!
//! Layered architecture:
//! - domain: Objective tree entities and business rules
//! - repository: Document store contract and SQLite implementation

pub mod domain;
pub mod repository;

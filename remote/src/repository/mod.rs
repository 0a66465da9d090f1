//! Repository Layer
//!
//! Document store abstractions and implementations.

mod db;
mod objective;
mod traits;


pub use db::{init_db, DbState, SharedConnection};
pub use objective::SqliteObjectiveRepository;
pub use traits::{ObjectivePatch, ObjectiveRepository};

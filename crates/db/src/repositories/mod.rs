//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods used inside a
//! check-in transaction take the transaction instead.

pub mod checkpoint_repo;
pub mod guard_repo;
pub mod patrol_record_repo;

pub use checkpoint_repo::CheckpointRepo;
pub use guard_repo::GuardRepo;
pub use patrol_record_repo::PatrolRecordRepo;

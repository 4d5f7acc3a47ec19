//! Guardpost domain core.
//!
//! Pure domain logic shared by the database layer, the HTTP API and the
//! guard-side agent: the proximity engine, the check-in session state
//! machine, and the collaborator traits the session drives (record store,
//! position source, clock). Has no internal crate dependencies.

pub mod checkpoint;
pub mod clock;
pub mod error;
pub mod export;
pub mod geo;
pub mod memory;
pub mod position;
pub mod report;
pub mod roles;
pub mod session;
pub mod store;
pub mod types;

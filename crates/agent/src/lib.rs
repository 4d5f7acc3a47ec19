//! `guardpost-agent` library crate.
//!
//! Guard-side pieces of a check-in: an HTTP [`RecordStore`] talking to the
//! API, a file-backed [`PositionSource`], and the interactive checklist
//! prompt. The binary entrypoint lives in `main.rs`.
//!
//! [`RecordStore`]: guardpost_core::store::RecordStore
//! [`PositionSource`]: guardpost_core::position::PositionSource

pub mod checklist;
pub mod config;
pub mod position;
pub mod remote;

//! Well-known role names.
//!
//! These must match the `ck_guards_role` check constraint in
//! `20260301000002_create_guards_table.sql`. Supervisor accounts are only
//! seeded by migration; the API never creates one.

/// Field guard performing check-ins.
pub const ROLE_GUARD: &str = "guard";

pub mod auth;
pub mod checkpoints;
pub mod guards;
pub mod patrols;
pub mod reports;

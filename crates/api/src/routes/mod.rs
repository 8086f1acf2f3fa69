//! HTTP route handlers.

pub mod actions;
pub mod health;
pub mod profile;
pub mod risk;

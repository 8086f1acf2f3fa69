//! Shared utilities and common types for the Baltic Climate backend.
//!
//! This crate provides functionality used across the other crates:
//! - JWT claims and token validation (tokens are issued by the external
//!   identity service; this backend only verifies them)

pub mod jwt;

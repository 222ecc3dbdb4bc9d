//! Shared utilities and common types for the SplitLedger backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT access token issuing and validation
//! - Redaction of sensitive fields in logged payloads
//! - Common validation logic

pub mod jwt;
pub mod password;
pub mod redaction;
pub mod validation;

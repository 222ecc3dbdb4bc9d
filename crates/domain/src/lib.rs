//! Domain layer for the SplitLedger backend.
//!
//! This crate contains:
//! - Domain models (User, Group, Expense, ExpenseSplit)
//! - Request DTOs, patch structs and response projections
//! - The authorization policy for mutations

pub mod models;
pub mod services;

//! Repository implementations for database operations.

pub mod expense;
pub mod group;
pub mod user;

pub use expense::{ExpenseCreation, ExpenseRepository};
pub use group::GroupRepository;
pub use user::UserRepository;

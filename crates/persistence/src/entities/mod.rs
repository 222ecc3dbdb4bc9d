//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod expense;
pub mod group;
pub mod user;

pub use expense::{ExpenseEntity, ExpenseSplitEntity};
pub use group::{GroupEntity, MemberWithUserEntity};
pub use user::UserEntity;

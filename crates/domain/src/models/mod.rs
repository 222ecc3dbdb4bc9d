//! Domain models for SplitLedger.

pub mod expense;
pub mod group;
pub mod user;

pub use expense::{Expense, ExpenseSplit, ExpenseView, SplitView};
pub use group::{Group, GroupView};
pub use user::{User, UserPublic};

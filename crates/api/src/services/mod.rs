//! Domain operations composing repositories and the authorization policy.

pub mod error;
pub mod expenses;
pub mod groups;
pub mod users;
mod views;

pub use error::ServiceError;
pub use expenses::ExpenseService;
pub use groups::GroupService;
pub use users::UserService;

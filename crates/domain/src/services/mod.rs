//! Domain services for SplitLedger.
//!
//! Services contain business rules that operate on domain models.

pub mod authorization;

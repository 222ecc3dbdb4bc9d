//! Authorization policy for mutations.
//!
//! Every function is a pure decision over ids already loaded by the caller.
//! Reads are never gated.

use uuid::Uuid;

use crate::models::{Expense, Group};

/// A user may only modify or delete their own account.
pub fn can_modify_user(actor: Uuid, target_id: Uuid) -> bool {
    actor == target_id
}

/// Only the owner may rename or delete a group.
pub fn can_modify_group(actor: Uuid, group: &Group) -> bool {
    actor == group.owner_id
}

/// Only the owner may add or remove members.
pub fn can_manage_membership(actor: Uuid, group: &Group) -> bool {
    actor == group.owner_id
}

/// The payer and the group owner may modify or delete an expense.
pub fn can_modify_expense(actor: Uuid, expense: &Expense, group: &Group) -> bool {
    expense.paid_by_id == Some(actor) || actor == group.owner_id
}

/// The owner can never be removed from their own group.
pub fn can_remove_member(group: &Group, target: Uuid) -> bool {
    target != group.owner_id
}

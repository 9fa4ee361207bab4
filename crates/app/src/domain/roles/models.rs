//! Role Models

use jiff::Timestamp;
use percolate_core::role::Role;
use uuid::Uuid;

/// A role assignment for one user.
#[derive(Debug, Clone)]
pub struct UserRole {
    pub user_id: Uuid,
    pub role: Role,
    pub created_at: Timestamp,
}

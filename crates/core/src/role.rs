//! Roles
//!
//! An explicit ordered hierarchy (`user < moderator < admin`) with a single
//! comparison, instead of ad hoc string checks scattered across call sites.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access role attached to a user.
///
/// Declaration order defines the hierarchy; a higher role satisfies any
/// lower requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer. The default when no role has been assigned.
    User,
    /// Can manage orders.
    Moderator,
    /// Full access to the admin surface.
    Admin,
}

impl Role {
    /// Check whether this role satisfies a requirement.
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }

    /// The lowercase wire string for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

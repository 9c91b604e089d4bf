//! Assignee role kinds.
//!
//! The original application branched on role *display names* compared as
//! strings; this module replaces that with a closed variant so a typo in a
//! role label can no longer select the wrong table or behaviour.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kind of field assignee a route or visit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    /// Sales representative taking orders on the route.
    Seller,
    /// Merchandiser performing shelf and fixture checks.
    Merchandiser,
}

impl AssigneeRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Merchandiser => "merchandiser",
        }
    }
}

impl fmt::Display for AssigneeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for AssigneeRole {
    type Error = ParseAssigneeRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "seller" => Ok(Self::Seller),
            "merchandiser" => Ok(Self::Merchandiser),
            _ => Err(ParseAssigneeRoleError(value.to_owned())),
        }
    }
}

/// Error returned while parsing assignee roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignee role: {0}")]
pub struct ParseAssigneeRoleError(pub String);

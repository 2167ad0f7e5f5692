//! Permissions granted through roles

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ManageBooks,
    ManageBookshelves,
    ManageUsers,
    ManageRoles,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::ManageBooks,
        Permission::ManageBookshelves,
        Permission::ManageUsers,
        Permission::ManageRoles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageBooks => "MANAGE_BOOKS",
            Permission::ManageBookshelves => "MANAGE_BOOKSHELVES",
            Permission::ManageUsers => "MANAGE_USERS",
            Permission::ManageRoles => "MANAGE_ROLES",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown permission: {}", s)))
    }
}

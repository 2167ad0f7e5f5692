//! User model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{require_non_empty, Role};
use crate::error::AppResult;

/// A library user. Accounts are provisioned by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_restricted: bool,
    pub role: Option<Role>,
}

impl User {
    pub fn create(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> AppResult<Self> {
        let username = username.into();
        let email = email.into();
        require_non_empty(
            &[&username, &email],
            "Username and email are required to create a user.",
        )?;

        Ok(Self {
            id: id.into(),
            username,
            email,
            is_restricted: false,
            role: None,
        })
    }

    pub fn restricted(mut self, is_restricted: bool) -> Self {
        self.is_restricted = is_restricted;
        self
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }
}

/// Update user request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(skip)]
    pub id: String,
    #[validate(length(min = 1))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_restricted: Option<bool>,
}

/// Assign a role to a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    #[serde(skip)]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub role_id: String,
}

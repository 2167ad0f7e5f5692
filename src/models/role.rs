//! Role model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{require_non_empty, Permission};
use crate::error::AppResult;

/// A named set of permissions assigned to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn create(
        id: impl Into<String>,
        name: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> AppResult<Self> {
        let name = name.into();
        require_non_empty(&[&name], "Name is required to create a role.")?;

        let mut unique = Vec::with_capacity(permissions.len());
        for p in permissions {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }

        Ok(Self {
            id: id.into(),
            name,
            permissions: unique,
        })
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Create role request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Update role request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    #[serde(skip)]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub permissions: Option<Vec<Permission>>,
}

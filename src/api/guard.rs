//! Permission guard
//!
//! Each handler declares the permissions it needs as a [`RequiredPermissions`]
//! constant and calls [`authorize`] with the acting user before doing any work.

use crate::{
    error::{AppError, AppResult},
    models::{Permission, User},
};

/// Static permission requirement of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPermissions {
    pub operation: &'static str,
    pub permissions: &'static [Permission],
}

impl RequiredPermissions {
    /// Requirement that lets any authenticated user through
    pub const fn none(operation: &'static str) -> Self {
        Self {
            operation,
            permissions: &[],
        }
    }
}

/// Allow when every required permission is granted by the user's role
pub fn authorize(required: &RequiredPermissions, user: &User) -> AppResult<()> {
    if required.permissions.is_empty() {
        return Ok(());
    }

    let missing: Vec<&str> = match &user.role {
        Some(role) => required
            .permissions
            .iter()
            .filter(|p| !role.has_permission(**p))
            .map(|p| p.as_str())
            .collect(),
        None => required.permissions.iter().map(|p| p.as_str()).collect(),
    };

    if missing.is_empty() {
        return Ok(());
    }

    tracing::debug!(
        user_id = %user.id,
        operation = required.operation,
        missing = ?missing,
        "Permission denied"
    );
    Err(AppError::Forbidden(format!(
        "Missing permission(s) for {}: {}",
        required.operation,
        missing.join(", ")
    )))
}

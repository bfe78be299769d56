//! User Administration Use Case
//!
//! Admin-only user management. Authorization (admin role) is enforced
//! at the presentation layer; these operations assume it already
//! happened. Requesters cannot target their own account.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::UserRole;
use crate::error::{AuthError, AuthResult};

/// User administration use case
pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn update_role(
        &self,
        requester: UserId,
        user_id: UserId,
        role: UserRole,
    ) -> AuthResult<()> {
        if user_id == requester {
            return Err(AuthError::SelfActionForbidden);
        }

        let affected = self.user_repo.update_user_role(user_id, role).await?;
        if affected == 0 {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, role = %role, "User role updated");
        Ok(())
    }

    /// Delete a user. Refresh tokens, verification tokens, and 2FA
    /// enrollments go with the row via foreign key cascade.
    pub async fn delete(&self, requester: UserId, user_id: UserId) -> AuthResult<()> {
        if user_id == requester {
            return Err(AuthError::SelfActionForbidden);
        }

        let affected = self.user_repo.delete_user(user_id).await?;
        if affected == 0 {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}

//! Service layer for user management and role lookup.

use crate::identity::{
    domain::{IdentityDomainError, NewUser, Role, User, UserId, UserName},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a user.
///
/// Both fields are optional on the wire so that missing values surface as
/// validation errors rather than deserialisation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    name: Option<String>,
    role: Option<String>,
}

impl CreateUserRequest {
    /// Creates a request with both fields supplied.
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            role: Some(role.into()),
        }
    }

    fn validate(self) -> Result<(UserName, Role), IdentityDomainError> {
        let name = UserName::new(self.name.unwrap_or_default())?;
        let role = Role::try_from(self.role.as_deref().unwrap_or_default())?;
        Ok((name, role))
    }
}

/// Request payload for replacing a user's name and role.
pub type UpdateUserRequest = CreateUserRequest;

/// Service-level errors for identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] IdentityDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),

    /// Another user already holds the name.
    #[error("user name '{0}' is already taken")]
    NameTaken(UserName),

    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The user is still the assignee of tasks.
    #[error("cannot delete user {user}: {count} task(s) still assigned; reassign them first")]
    HasAssignedTasks {
        /// User that was to be deleted.
        user: UserId,
        /// Number of tasks still assigned.
        count: u64,
    },

    /// The caller attempted to delete their own account.
    #[error("Cannot delete your own account")]
    SelfDeletion,
}

impl From<UserRepositoryError> for IdentityError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateName(name) => Self::NameTaken(name),
            UserRepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for identity service operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// User directory orchestration service.
pub struct IdentityDirectoryService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for IdentityDirectoryService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> IdentityDirectoryService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Domain`] when the name or role is missing or
    /// invalid, and [`IdentityError::NameTaken`] when the name is in use.
    pub async fn create(&self, request: CreateUserRequest) -> IdentityResult<User> {
        let (name, role) = request.validate()?;
        if self.repository.find_by_name(&name).await?.is_some() {
            return Err(IdentityError::NameTaken(name));
        }
        let user = self
            .repository
            .insert(&NewUser::new(name, role, &*self.clock))
            .await?;
        info!(user_id = %user.id(), role = %user.role(), "user created");
        Ok(user)
    }

    /// Replaces a user's name and role.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Domain`] on invalid input,
    /// [`IdentityError::NotFound`] when the user does not exist, and
    /// [`IdentityError::NameTaken`] when a different user holds the name.
    pub async fn update(&self, id: UserId, request: UpdateUserRequest) -> IdentityResult<User> {
        let (name, role) = request.validate()?;
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(IdentityError::NotFound(id));
        }
        if let Some(holder) = self.repository.find_by_name(&name).await?
            && holder.id() != id
        {
            return Err(IdentityError::NameTaken(name));
        }
        let user = self.repository.update(id, &name, role).await?;
        info!(user_id = %id, role = %role, "user updated");
        Ok(user)
    }

    /// Removes a user on behalf of `requested_by`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::SelfDeletion`] when a user deletes
    /// themselves, [`IdentityError::HasAssignedTasks`] while tasks are still
    /// assigned to the user, and [`IdentityError::NotFound`] when the user
    /// does not exist.
    pub async fn delete(&self, id: UserId, requested_by: UserId) -> IdentityResult<()> {
        if id == requested_by {
            return Err(IdentityError::SelfDeletion);
        }
        let count = self.repository.count_assigned_tasks(id).await?;
        if count > 0 {
            return Err(IdentityError::HasAssignedTasks { user: id, count });
        }
        if !self.repository.delete(id).await? {
            return Err(IdentityError::NotFound(id));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Retrieves a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, id: UserId) -> IdentityResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Retrieves a user by identifier, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] when the user does not exist.
    pub async fn get(&self, id: UserId) -> IdentityResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id))
    }

    /// Retrieves a user by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Domain`] for a blank name and
    /// [`IdentityError::Repository`] when the lookup fails.
    pub async fn find_by_name(&self, name: &str) -> IdentityResult<Option<User>> {
        let lookup = UserName::new(name)?;
        Ok(self.repository.find_by_name(&lookup).await?)
    }

    /// Lists every user, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Repository`] when the lookup fails.
    pub async fn list_all(&self) -> IdentityResult<Vec<User>> {
        Ok(self.repository.list_all().await?)
    }

    /// Lists the users holding `role`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Domain`] for an unknown role.
    pub async fn list_by_role(&self, role: &str) -> IdentityResult<Vec<User>> {
        let parsed = Role::try_from(role)?;
        Ok(self.repository.list_by_role(parsed).await?)
    }

    /// Reports whether the user currently holds the administrator role.
    ///
    /// A missing user is not an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Repository`] when the lookup fails.
    pub async fn is_admin(&self, id: UserId) -> IdentityResult<bool> {
        let user = self.repository.find_by_id(id).await?;
        Ok(user.is_some_and(|found| found.is_admin()))
    }

    /// Seeds an administrator named `name` when no users exist yet.
    ///
    /// Returns the seeded user, or `None` when the directory was not empty.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the name is invalid or storage fails.
    pub async fn ensure_default_admin(&self, name: &str) -> IdentityResult<Option<User>> {
        if self.repository.count().await? > 0 {
            return Ok(None);
        }
        let admin_name = UserName::new(name)?;
        let user = self
            .repository
            .insert(&NewUser::new(admin_name, Role::Admin, &*self.clock))
            .await?;
        info!(user_id = %user.id(), name = %user.name(), "default administrator seeded");
        Ok(Some(user))
    }
}

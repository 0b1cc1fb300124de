//! Repository port for user persistence and lookup.

use crate::identity::domain::{NewUser, Role, User, UserId, UserName};
use crate::persistence::StorageFailure;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateName`] when the name is taken.
    async fn insert(&self, user: &NewUser) -> UserRepositoryResult<User>;

    /// Replaces the name and role of an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] when the user does not exist
    /// or [`UserRepositoryError::DuplicateName`] when another user already
    /// holds the name.
    async fn update(&self, id: UserId, name: &UserName, role: Role) -> UserRepositoryResult<User>;

    /// Removes a user. Returns `false` when no row was removed.
    ///
    /// Tasks created and updates written by the user survive with their
    /// creator or author cleared.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Referenced`] when tasks are still
    /// assigned to the user.
    async fn delete(&self, id: UserId) -> UserRepositoryResult<bool>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;

    /// Finds a user by exact name.
    async fn find_by_name(&self, name: &UserName) -> UserRepositoryResult<Option<User>>;

    /// Returns all users, newest first.
    async fn list_all(&self) -> UserRepositoryResult<Vec<User>>;

    /// Returns all users holding `role`, ordered by name.
    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>>;

    /// Returns the number of registered users.
    async fn count(&self) -> UserRepositoryResult<u64>;

    /// Returns the number of tasks currently assigned to the user.
    async fn count_assigned_tasks(&self, id: UserId) -> UserRepositoryResult<u64>;
}

/// Errors returned by user repository implementations.
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// Another user already holds the name.
    #[error("user with name '{0}' already exists")]
    DuplicateName(UserName),

    /// The user was not found.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// Tasks are still assigned to the user.
    #[error("user {0} is still assigned to tasks")]
    Referenced(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl StorageFailure for UserRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

//! In-memory user repository backed by the shared in-memory database.

use async_trait::async_trait;
use std::cmp::Reverse;

use crate::identity::{
    domain::{NewUser, PersistedUserData, Role, User, UserId, UserName},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::persistence::InMemoryDatabase;

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    database: InMemoryDatabase,
}

impl InMemoryUserRepository {
    /// Creates a repository over a fresh, empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository sharing tables with other adapters.
    #[must_use]
    pub const fn with_database(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;
        if tables.users.values().any(|existing| existing.name() == user.name()) {
            return Err(UserRepositoryError::DuplicateName(user.name().clone()));
        }
        let id = tables.next_user_id();
        let stored = user.clone().into_user(id);
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: UserId, name: &UserName, role: Role) -> UserRepositoryResult<User> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;
        let created_at = tables
            .users
            .get(&id)
            .map(User::created_at)
            .ok_or(UserRepositoryError::NotFound(id))?;
        let name_taken = tables
            .users
            .values()
            .any(|other| other.id() != id && other.name() == name);
        if name_taken {
            return Err(UserRepositoryError::DuplicateName(name.clone()));
        }
        let updated = User::from_persisted(PersistedUserData {
            id,
            name: name.clone(),
            role,
            created_at,
        });
        tables.users.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<bool> {
        let mut tables = self
            .database
            .write()
            .map_err(UserRepositoryError::persistence)?;
        if !tables.users.contains_key(&id) {
            return Ok(false);
        }
        if tables.is_user_assigned(id) {
            return Err(UserRepositoryError::Referenced(id));
        }
        Ok(tables.remove_user(id))
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &UserName) -> UserRepositoryResult<Option<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.name() == name)
            .cloned())
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|user| Reverse((user.created_at(), user.id())));
        Ok(users)
    }

    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|user| user.role() == role)
            .cloned()
            .collect();
        users.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(users)
    }

    async fn count(&self) -> UserRepositoryResult<u64> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables.users.len() as u64)
    }

    async fn count_assigned_tasks(&self, id: UserId) -> UserRepositoryResult<u64> {
        let tables = self
            .database
            .read()
            .map_err(UserRepositoryError::persistence)?;
        Ok(tables
            .tasks
            .values()
            .filter(|task| task.assigned_to() == Some(id))
            .count() as u64)
    }
}

//! `PostgreSQL` repository implementation for the identity directory.

use super::models::{NewUserRow, UserRow};
use crate::identity::{
    domain::{NewUser, PersistedUserData, Role, User, UserId, UserName},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use crate::persistence::{
    PgPool,
    postgres::run_blocking,
    schema::{tasks, users},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const NAME_UNIQUE_CONSTRAINT: &str = "users_name_unique";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let name = user.name().clone();
        let new_row = NewUserRow {
            name: name.as_str().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
        };

        run_blocking(&self.pool, move |connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(|err| map_write_error(err, &name))?;
            row_to_user(row)
        })
        .await
    }

    async fn update(&self, id: UserId, name: &UserName, role: Role) -> UserRepositoryResult<User> {
        let new_name = name.clone();
        run_blocking(&self.pool, move |connection| {
            let row = diesel::update(users::table.filter(users::id.eq(id.value())))
                .set((
                    users::name.eq(new_name.as_str()),
                    users::role.eq(role.as_str()),
                ))
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .optional()
                .map_err(|err| map_write_error(err, &new_name))?;
            row.map_or(Err(UserRepositoryError::NotFound(id)), row_to_user)
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<bool> {
        run_blocking(&self.pool, move |connection| {
            let removed = diesel::delete(users::table.filter(users::id.eq(id.value())))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        UserRepositoryError::Referenced(id)
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(removed > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_name(&self, name: &UserName) -> UserRepositoryResult<Option<User>> {
        let lookup = name.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::name.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        run_blocking(&self.pool, move |connection| {
            let rows = users::table
                .order((users::created_at.desc(), users::id.desc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>> {
        run_blocking(&self.pool, move |connection| {
            let rows = users::table
                .filter(users::role.eq(role.as_str()))
                .order(users::name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn count(&self) -> UserRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let total = users::table
                .count()
                .get_result::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            u64::try_from(total).map_err(UserRepositoryError::persistence)
        })
        .await
    }

    async fn count_assigned_tasks(&self, id: UserId) -> UserRepositoryResult<u64> {
        run_blocking(&self.pool, move |connection| {
            let total = tasks::table
                .filter(tasks::assigned_to.eq(id.value()))
                .count()
                .get_result::<i64>(connection)
                .map_err(UserRepositoryError::persistence)?;
            u64::try_from(total).map_err(UserRepositoryError::persistence)
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        name,
        role,
        created_at,
    } = row;
    let name = UserName::new(name).map_err(UserRepositoryError::persistence)?;
    let role = Role::try_from(role.as_str()).map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(id),
        name,
        role,
        created_at,
    }))
}

fn map_write_error(err: DieselError, name: &UserName) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_name_unique_violation(info.as_ref()) =>
        {
            UserRepositoryError::DuplicateName(name.clone())
        }
        _ => UserRepositoryError::persistence(err),
    }
}

fn is_name_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|constraint| constraint == NAME_UNIQUE_CONSTRAINT)
}

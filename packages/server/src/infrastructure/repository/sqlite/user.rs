//! SQLite UserRepository 実装

use async_trait::async_trait;
use rusqlite::{ErrorCode, OptionalExtension, params, types::Type};

use super::{Database, DatabaseError};
use crate::domain::{
    AccessToken, AuthorId, AuthorName, RepositoryError, Timestamp, User, UserRepository,
};

const SELECT_USER: &str = "SELECT id, name, muted, created_at FROM users";

/// SQLite UserRepository 実装
pub struct SqliteUserRepository {
    db: Database,
}

impl SqliteUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn backend(e: DatabaseError) -> RepositoryError {
    RepositoryError::Backend(e.to_string())
}

fn is_constraint_violation(e: &DatabaseError) -> bool {
    matches!(
        e,
        DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation
    )
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: User, token: AccessToken) -> Result<(), RepositoryError> {
        let name = user.name.as_str().to_string();
        self.db
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, token, muted, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        user.id.as_str(),
                        user.name.as_str(),
                        token.as_str(),
                        user.muted,
                        user.created_at.value(),
                    ],
                )
            })
            .await
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    RepositoryError::DuplicateName(name)
                } else {
                    backend(e)
                }
            })?;
        Ok(())
    }

    async fn verify_token(&self, token: &AccessToken) -> Result<Option<User>, RepositoryError> {
        let token = token.as_str().to_string();
        self.db
            .run(move |conn| {
                conn.query_row(
                    &format!("{SELECT_USER} WHERE token = ?1"),
                    params![token],
                    row_to_user,
                )
                .optional()
            })
            .await
            .map_err(backend)
    }

    async fn find_by_name(&self, name: &AuthorName) -> Result<Option<User>, RepositoryError> {
        let name = name.as_str().to_string();
        self.db
            .run(move |conn| {
                conn.query_row(
                    &format!("{SELECT_USER} WHERE name = ?1"),
                    params![name],
                    row_to_user,
                )
                .optional()
            })
            .await
            .map_err(backend)
    }

    async fn is_muted(&self, id: &AuthorId) -> Result<bool, RepositoryError> {
        let key = id.as_str().to_string();
        let muted = self
            .db
            .run(move |conn| {
                conn.query_row(
                    "SELECT muted FROM users WHERE id = ?1",
                    params![key],
                    |row| row.get::<_, bool>(0),
                )
                .optional()
            })
            .await
            .map_err(backend)?;

        muted.ok_or_else(|| RepositoryError::UserNotFound(id.as_str().to_string()))
    }

    async fn set_muted(&self, id: &AuthorId, muted: bool) -> Result<(), RepositoryError> {
        let key = id.as_str().to_string();
        let affected = self
            .db
            .run(move |conn| {
                conn.execute(
                    "UPDATE users SET muted = ?1 WHERE id = ?2",
                    params![muted, key],
                )
            })
            .await
            .map_err(backend)?;

        if affected == 0 {
            return Err(RepositoryError::UserNotFound(id.as_str().to_string()));
        }
        Ok(())
    }

    async fn clear_all_mutes(&self) -> Result<usize, RepositoryError> {
        self.db
            .run(|conn| conn.execute("UPDATE users SET muted = 0 WHERE muted != 0", []))
            .await
            .map_err(backend)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let invalid = |idx: usize| {
        move |e: crate::domain::ValueObjectError| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        }
    };

    Ok(User {
        id: AuthorId::new(row.get(0)?).map_err(invalid(0))?,
        name: AuthorName::new(row.get(1)?).map_err(invalid(1))?,
        muted: row.get(2)?,
        created_at: Timestamp::new(row.get(3)?),
    })
}

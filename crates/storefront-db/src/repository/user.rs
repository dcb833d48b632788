//! # User Repository
//!
//! Users are owned by the identity provider. This table mirrors id, email and
//! name so orders can be attributed and roles checked.
//!
//! ## Role Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  upsert(id, email, name)                                               │
//! │    new row      → role = 'customer'                                    │
//! │    existing row → email, name updated; role untouched                  │
//! │                                                                         │
//! │  set_role(id, role)  ← seeding / admin tooling only                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::{Role, User};

const USER_COLUMNS: &str = "id, email, name, role, created_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Inserts or refreshes the caller's row. Never changes an existing role.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email belongs to another user
    pub async fn upsert(&self, id: &str, email: &str, name: &str) -> DbResult<User> {
        debug!(user_id = %id, "Upserting user");

        let sql = format!(
            r#"
            INSERT INTO users (id, email, name, role, created_at)
            VALUES (?1, ?2, ?3, 'customer', ?4)
            ON CONFLICT (id) DO UPDATE SET
                email = excluded.email,
                name = excluded.name
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let result = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(email)
            .bind(name)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

        result.map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", email),
            other => other,
        })
    }

    /// Sets a user's role.
    pub async fn set_role(&self, id: &str, role: Role) -> DbResult<()> {
        info!(user_id = %id, ?role, "Setting user role");

        let result = sqlx::query("UPDATE users SET role = ?2 WHERE id = ?1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Returns the user's role, or `None` if the user has no row.
    pub async fn role_of(&self, id: &str) -> DbResult<Option<Role>> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role)
    }
}

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{User, UserRole};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(
        &self,
        login_id: &str,
        password_hash: &str,
        name: &str,
        role: UserRole,
    ) -> Result<User> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login_id, password_hash, name, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, login_id, password_hash, name, role, created_at, updated_at
            "#,
        )
        .bind(login_id)
        .bind(password_hash)
        .bind(name)
        .bind(role)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_login_id(&self, login_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login_id, password_hash, name, role, created_at, updated_at
            FROM users
            WHERE login_id = ?1
            "#,
        )
        .bind(login_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login_id, password_hash, name, role, created_at, updated_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Company, CompanyInput, PageQuery};
use crate::validation::normalize;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: SqlitePool,
}

impl CompanyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<(Vec<Company>, i64)> {
        let pattern = query.search_pattern();

        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, contact_person, email, phone, address, created_at, updated_at
            FROM companies
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR contact_person LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
            ORDER BY name, id
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(&pattern)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM companies
            WHERE ?1 IS NULL
                OR name LIKE ?1 ESCAPE '\'
                OR contact_person LIKE ?1 ESCAPE '\'
                OR email LIKE ?1 ESCAPE '\'
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((companies, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT id, name, contact_person, email, phone, address, created_at, updated_at FROM companies WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    pub async fn create(&self, input: CompanyInput) -> Result<Company> {
        let now = Utc::now();
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, contact_person, email, phone, address, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, name, contact_person, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.contact_person))
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(company)
    }

    pub async fn update(&self, id: i64, input: CompanyInput) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = ?1, contact_person = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
            WHERE id = ?7
            RETURNING id, name, contact_person, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(normalize(input.contact_person))
        .bind(normalize(input.email))
        .bind(normalize(input.phone))
        .bind(normalize(input.address))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    /// Fails with a foreign-key error while job types still reference the company.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

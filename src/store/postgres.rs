use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::{hash_password, Contact, ContactFields, ContactStore, CredentialStore, StoreError};

const SELECT_COLUMNS: &str = "id, name, email_address, number";

/// Contact store backed by PostgreSQL. Uniqueness of `email_address` is
/// enforced by the table's unique constraint; insert and update map a
/// unique violation to `StoreError::DuplicateEmail`.
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build a connection pool and bootstrap the schema.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    migrate(&pool).await?;
    info!("Connected to postgres contact store");
    Ok(pool)
}

async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS contacts (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email_address TEXT NOT NULL UNIQUE,
            number VARCHAR(15) NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS contacts_name_idx ON contacts (name)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS contacts_number_idx ON contacts (number)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password_sha256 TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Sqlx(err)
}

fn require_row(row: Option<Contact>) -> Result<Contact, StoreError> {
    row.ok_or(StoreError::NotFound)
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert(&self, fields: ContactFields) -> Result<Contact, StoreError> {
        let sql = format!(
            "INSERT INTO contacts (name, email_address, number) VALUES ($1, $2, $3) RETURNING {}",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, Contact>(&sql)
            .bind(&fields.name)
            .bind(&fields.email_address)
            .bind(&fields.number)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn get_by_id(&self, id: i64) -> Result<Contact, StoreError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        require_row(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Contact, StoreError> {
        let sql = format!(
            "SELECT {} FROM contacts WHERE email_address = $1",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        require_row(row)
    }

    async fn get_by_name(&self, name: &str) -> Result<Contact, StoreError> {
        // Names are not unique; lowest id is the documented tie-break.
        let sql = format!(
            "SELECT {} FROM contacts WHERE name = $1 ORDER BY id LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        require_row(row)
    }

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        let sql = format!("SELECT {} FROM contacts ORDER BY id", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, Contact>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: i64, fields: ContactFields) -> Result<Contact, StoreError> {
        let sql = format!(
            "UPDATE contacts SET name = $1, email_address = $2, number = $3 WHERE id = $4 RETURNING {}",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Contact>(&sql)
            .bind(&fields.name)
            .bind(&fields.email_address)
            .bind(&fields.number)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;
        require_row(row)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Credential store backed by the `users` table.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or replace a user row. Used to seed the configured
    /// admin credentials at startup.
    pub async fn upsert_user(&self, username: &str, password: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (username, password_sha256) VALUES ($1, $2)
             ON CONFLICT (username) DO UPDATE SET password_sha256 = EXCLUDED.password_sha256",
        )
        .bind(username)
        .bind(hash_password(password))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, StoreError> {
        let stored: Option<(String,)> =
            sqlx::query_as("SELECT password_sha256 FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(stored.is_some_and(|(digest,)| digest == hash_password(password)))
    }
}

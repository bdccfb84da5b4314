use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    migrate(&pool).await?;
    info!("database ready");
    Ok(pool)
}

/// Applied at every startup; both statements are idempotent.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL,
            department  TEXT    NOT NULL,
            salary      REAL    NOT NULL,
            is_active   BOOLEAN NOT NULL DEFAULT 1,
            created_at  TEXT    NOT NULL,
            updated_at  TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Uniqueness over active rows only; soft-deleted rows keep their name
    // free for reuse. The repository runs the same check application-side so
    // concurrent duplicates still surface as a Conflict rather than a raw
    // constraint error.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS ux_employees_name_department_active
        ON employees (name, department) WHERE is_active = 1
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

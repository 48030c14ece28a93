//! Database module: SeaORM connection handling and schema migrations.
//!
//! All persistence goes through a pooled [`DatabaseConnection`];
//! multi-statement operations open a transaction on it and every
//! transaction rolls back on drop unless explicitly committed.

use std::path::PathBuf;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod migrations;

pub use migrations::Migrator;

/// Connects to the given database URL and runs all pending migrations.
///
/// For `sqlite:` file URLs the parent directory is created first so a
/// fresh install works without manual setup.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    if let Some(path) = sqlite_file_path(url) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbErr::Custom(format!(
                    "Failed to create database directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let db = Database::connect(url).await?;
    Migrator::up(&db, None).await?;

    log::info!("Database connected, schema is current");

    Ok(db)
}

/// Connects to a fresh in-memory SQLite database and migrates it.
///
/// The pool is pinned to a single connection: every pooled connection
/// would otherwise get its own empty `:memory:` database.
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Returns the canonical database URL: a SQLite file under
/// `~/.agritrace/data/`.
pub fn default_database_url() -> Option<String> {
    dirs::home_dir().map(|home| {
        format!(
            "sqlite://{}?mode=rwc",
            home.join(".agritrace")
                .join("data")
                .join("agritrace.db")
                .display()
        )
    })
}

/// Extracts the file path from a `sqlite:` URL, if it points at a file.
fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    // ":memory:" and other non-file forms have no path to prepare.
    if rest.is_empty() || rest.starts_with(':') {
        return None;
    }
    let path = rest.split('?').next().unwrap_or(rest);
    Some(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn test_connect_in_memory_applies_migrations() {
        let db = connect_in_memory().await.unwrap();
        let result = db
            .query_one(Statement::from_string(
                db.get_database_backend(),
                "SELECT COUNT(*) AS n FROM seaql_migrations".to_string(),
            ))
            .await
            .unwrap();
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_connect_file_db_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let url = format!("sqlite://{}?mode=rwc", path.display());

        let db = connect(&url).await.unwrap();
        assert!(path.exists());
        drop(db);
    }

    #[test]
    fn test_sqlite_file_path_parsing() {
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/app/data.db?mode=rwc"),
            Some(PathBuf::from("/var/lib/app/data.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:data.db"),
            Some(PathBuf::from("data.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/app"), None);
    }

    #[test]
    fn test_default_database_url_points_under_home() {
        if let Some(url) = default_database_url() {
            assert!(url.starts_with("sqlite://"));
            assert!(url.contains(".agritrace"));
        }
    }
}

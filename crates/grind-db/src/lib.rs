//! # grind-db
//!
//! PostgreSQL database layer for grind.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for problems, categories, and analytics
//! - The "uncategorized" fallback guarantee: no problem is ever left
//!   without at least one category
//!
//! ## Example
//!
//! ```rust,ignore
//! use grind_db::{Database, Difficulty, NewProblem};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/grind").await?;
//!
//!     let problem_id = db.problems.upsert(NewProblem {
//!         leetcode_id: 1,
//!         slug: "two-sum".to_string(),
//!         title: "Two Sum".to_string(),
//!         description: None,
//!         difficulty: Difficulty::Easy,
//!         content: "// solution".to_string(),
//!     }).await?;
//!
//!     db.tags.add_to_problem("two-sum", "Array").await?;
//!
//!     println!("Stored problem: {}", problem_id);
//!     Ok(())
//! }
//! ```
pub mod analytics;
pub mod pool;
pub mod problems;
pub mod tags;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use grind_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export repository implementations
pub use analytics::PgAnalyticsRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use problems::PgProblemRepository;
pub use tags::PgCategoryRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Problem repository for import, listing, and navigation.
    pub problems: PgProblemRepository,
    /// Category repository with the fallback-tag bookkeeping.
    pub tags: PgCategoryRepository,
    /// Learning-status analytics.
    pub analytics: PgAnalyticsRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            problems: PgProblemRepository::new(pool.clone()),
            tags: PgCategoryRepository::new(pool.clone()),
            analytics: PgAnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Connect to test database (for integration tests).
    #[cfg(test)]
    pub async fn connect_test() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| crate::test_fixtures::DEFAULT_TEST_DATABASE_URL.to_string());
        Self::connect(&database_url).await
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            problems: PgProblemRepository::new(self.pool.clone()),
            tags: PgCategoryRepository::new(self.pool.clone()),
            analytics: PgAnalyticsRepository::new(self.pool.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_plain_text_unchanged() {
        assert_eq!(escape_like("two sum"), "two sum");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("two_sum"), "two\\_sum");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_like_backslash_first() {
        // The backslash pass must run before the wildcard passes or the
        // inserted escapes would themselves be escaped.
        assert_eq!(escape_like("\\%"), "\\\\\\%");
    }
}

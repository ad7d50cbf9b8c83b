//! Tag (category) repository implementation.
//!
//! Every mutation that can strand a problem without categories runs in a
//! single transaction and re-files affected problems under the
//! "uncategorized" fallback before committing, so the no-orphan guarantee
//! holds at every commit boundary.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row, Transaction};
use uuid::Uuid;

use grind_core::{
    is_uncategorized, normalize_slug, validate_tag_name, BulkAddOutcome, Category,
    CategoryRepository, CategoryWithCount, Error, Result, UNCATEGORIZED_NAME, UNCATEGORIZED_SLUG,
};

/// Insert the category if its slug is new, then read it back.
///
/// Safe to call for a name that already exists: the insert is suppressed
/// and the existing row is returned with its original casing.
async fn ensure_category_tx(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<Category> {
    let name = name.trim();
    let slug = normalize_slug(name);

    sqlx::query("INSERT INTO category (id, name, slug) VALUES ($1, $2, $3) ON CONFLICT (slug) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&slug)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

    let row = sqlx::query("SELECT id, name, slug FROM category WHERE slug = $1")
        .bind(&slug)
        .fetch_one(&mut **tx)
        .await
        .map_err(Error::Database)?;

    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
    })
}

/// Insert the fallback category if missing and return its id.
async fn ensure_uncategorized_tx(tx: &mut Transaction<'_, Postgres>) -> Result<Uuid> {
    let category = ensure_category_tx(tx, UNCATEGORIZED_NAME).await?;
    Ok(category.id)
}

async fn find_problem_id_tx(
    tx: &mut Transaction<'_, Postgres>,
    slug: &str,
) -> Result<Option<Uuid>> {
    sqlx::query_scalar("SELECT id FROM problem WHERE slug = $1")
        .bind(slug)
        .fetch_optional(&mut **tx)
        .await
        .map_err(Error::Database)
}

/// PostgreSQL implementation of CategoryRepository.
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    /// Create a tag, or return the existing row when the normalized slug
    /// is already taken. Creating twice is a no-op on the second call.
    async fn create(&self, name: &str) -> Result<Category> {
        validate_tag_name(name).map_err(Error::InvalidInput)?;

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let category = ensure_category_tx(&mut tx, name).await?;
        tx.commit().await.map_err(Error::Database)?;

        Ok(category)
    }

    /// List all tags with their problem counts, ordered by name.
    async fn list(&self) -> Result<Vec<CategoryWithCount>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.id,
                c.name,
                c.slug,
                COUNT(pc.problem_id) AS problem_count
            FROM category c
            LEFT JOIN problem_category pc ON pc.category_id = c.id
            GROUP BY c.id, c.name, c.slug
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let categories = rows
            .into_iter()
            .map(|row| CategoryWithCount {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
                problem_count: row.get("problem_count"),
            })
            .collect();

        Ok(categories)
    }

    /// List the tags attached to one problem, ordered by name.
    async fn get_for_problem(&self, problem_slug: &str) -> Result<Vec<Category>> {
        let problem_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM problem WHERE slug = $1")
            .bind(problem_slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        let problem_id = problem_id.ok_or_else(|| Error::ProblemNotFound(problem_slug.to_string()))?;

        let rows = sqlx::query(
            "SELECT c.id, c.name, c.slug \
             FROM category c \
             JOIN problem_category pc ON pc.category_id = c.id \
             WHERE pc.problem_id = $1 \
             ORDER BY c.name",
        )
        .bind(problem_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let categories = rows
            .into_iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            })
            .collect();

        Ok(categories)
    }

    /// Attach a tag to a problem, creating the tag if needed. Adding a
    /// real tag removes the fallback link in the same transaction.
    async fn add_to_problem(&self, problem_slug: &str, name: &str) -> Result<Category> {
        validate_tag_name(name).map_err(Error::InvalidInput)?;

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let problem_id = match find_problem_id_tx(&mut tx, problem_slug).await? {
            Some(id) => id,
            None => return Err(Error::ProblemNotFound(problem_slug.to_string())),
        };

        let category = ensure_category_tx(&mut tx, name).await?;

        // Link tag to problem
        sqlx::query(
            "INSERT INTO problem_category (id, problem_id, category_id) VALUES ($1, $2, $3)
             ON CONFLICT (problem_id, category_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(problem_id)
        .bind(category.id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        // A real tag displaces the fallback
        if !is_uncategorized(&category.slug) {
            sqlx::query(
                "DELETE FROM problem_category pc
                 USING category c
                 WHERE pc.category_id = c.id AND pc.problem_id = $1 AND c.slug = $2",
            )
            .bind(problem_id)
            .bind(UNCATEGORIZED_SLUG)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(category)
    }

    /// Detach a tag from a problem. Removing the last real tag re-files
    /// the problem under the fallback. Removing the fallback itself does
    /// not re-attach it; that is the one deliberate way to leave a
    /// problem untagged.
    async fn remove_from_problem(&self, problem_slug: &str, category_slug: &str) -> Result<()> {
        // Accept a display name as well as a slug; they normalize to the
        // same thing.
        let category_slug = normalize_slug(category_slug);

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let problem_id = match find_problem_id_tx(&mut tx, problem_slug).await? {
            Some(id) => id,
            None => return Err(Error::ProblemNotFound(problem_slug.to_string())),
        };

        let category_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM category WHERE slug = $1")
            .bind(&category_slug)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let category_id = match category_id {
            Some(id) => id,
            None => return Err(Error::CategoryNotFound(category_slug)),
        };

        sqlx::query("DELETE FROM problem_category WHERE problem_id = $1 AND category_id = $2")
            .bind(problem_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM problem_category WHERE problem_id = $1")
                .bind(problem_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;

        if remaining == 0 && !is_uncategorized(&category_slug) {
            let fallback_id = ensure_uncategorized_tx(&mut tx).await?;

            sqlx::query(
                "INSERT INTO problem_category (id, problem_id, category_id) VALUES ($1, $2, $3)
                 ON CONFLICT (problem_id, category_id) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(problem_id)
            .bind(fallback_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(())
    }

    /// Rename a tag. The slug is re-derived from the new name.
    async fn rename(&self, slug: &str, new_name: &str) -> Result<Category> {
        validate_tag_name(new_name).map_err(Error::InvalidInput)?;

        let new_name = new_name.trim();
        let new_slug = normalize_slug(new_name);

        let row = sqlx::query(
            "UPDATE category SET name = $1, slug = $2 WHERE slug = $3 RETURNING id, name, slug",
        )
        .bind(new_name)
        .bind(&new_slug)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(row) => Ok(Category {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            }),
            None => Err(Error::CategoryNotFound(slug.to_string())),
        }
    }

    /// Delete a tag. Problems that lose their last tag are re-filed
    /// under the fallback in one aggregate insert. Deleting the fallback
    /// itself recreates it for any problems it was covering.
    async fn delete(&self, slug: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let category_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM category WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let category_id = match category_id {
            Some(id) => id,
            // Already gone; deleting twice reports success both times.
            None => return Ok(()),
        };

        // Capture members before the cascade removes the links
        let affected: Vec<Uuid> =
            sqlx::query_scalar("SELECT problem_id FROM problem_category WHERE category_id = $1")
                .bind(category_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(Error::Database)?;

        sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if !affected.is_empty() {
            let fallback_id = ensure_uncategorized_tx(&mut tx).await?;

            sqlx::query(
                r#"
                INSERT INTO problem_category (id, problem_id, category_id)
                SELECT gen_random_uuid(), p.id, $1
                FROM problem p
                WHERE p.id = ANY($2)
                  AND NOT EXISTS (
                      SELECT 1 FROM problem_category pc WHERE pc.problem_id = p.id
                  )
                ON CONFLICT (problem_id, category_id) DO NOTHING
                "#,
            )
            .bind(fallback_id)
            .bind(&affected)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(())
    }

    /// Attach a tag to every problem matching the given LeetCode ids.
    /// Problems already carrying the tag are skipped, so added_count can
    /// be lower than total_found. Ids with no matching problem only show
    /// up as the total_found shortfall.
    async fn bulk_add_by_leetcode_ids(
        &self,
        slug: &str,
        leetcode_ids: &[i32],
    ) -> Result<BulkAddOutcome> {
        if leetcode_ids.is_empty() {
            return Err(Error::InvalidInput("No LeetCode ids provided".to_string()));
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let category_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM category WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let category_id = match category_id {
            Some(id) => id,
            None => return Err(Error::CategoryNotFound(slug.to_string())),
        };

        let total_found: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM problem WHERE leetcode_id = ANY($1)")
                .bind(leetcode_ids)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;

        let result = sqlx::query(
            r#"
            INSERT INTO problem_category (id, problem_id, category_id)
            SELECT gen_random_uuid(), p.id, $1
            FROM problem p
            WHERE p.leetcode_id = ANY($2)
            ON CONFLICT (problem_id, category_id) DO NOTHING
            "#,
        )
        .bind(category_id)
        .bind(leetcode_ids)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        if !is_uncategorized(slug) {
            sqlx::query(
                "DELETE FROM problem_category pc
                 USING category c, problem p
                 WHERE pc.category_id = c.id
                   AND pc.problem_id = p.id
                   AND c.slug = $1
                   AND p.leetcode_id = ANY($2)",
            )
            .bind(UNCATEGORIZED_SLUG)
            .bind(leetcode_ids)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        Ok(BulkAddOutcome {
            added_count: result.rows_affected() as i64,
            total_found,
        })
    }
}

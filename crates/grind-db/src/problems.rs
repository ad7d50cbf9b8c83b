//! Problem repository implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use grind_core::{
    defaults, AdjacentProblems, Error, LearningStatus, ListProblemsRequest, NeighborRef,
    NewProblem, Problem, ProblemDetail, ProblemPage, ProblemRepository, ProblemSummary, Result,
};

/// Append tag and status predicates to a query that already has a WHERE
/// clause, numbering bind parameters from `param_idx`.
///
/// The tag predicate matches problems linked to the category with the
/// bound slug. A slug that matches no category matches no problems.
fn add_problem_filters(query: &mut String, param_idx: &mut usize, has_tag: bool, has_status: bool) {
    if has_tag {
        query.push_str(&format!(
            "AND EXISTS (SELECT 1 FROM problem_category pc \
             JOIN category c ON c.id = pc.category_id \
             WHERE pc.problem_id = p.id AND c.slug = ${}) ",
            param_idx
        ));
        *param_idx += 1;
    }
    if has_status {
        query.push_str(&format!("AND p.learning_status = ${} ", param_idx));
        *param_idx += 1;
    }
}

fn map_row_to_summary(row: PgRow) -> ProblemSummary {
    ProblemSummary {
        id: row.get("id"),
        leetcode_id: row.get("leetcode_id"),
        slug: row.get("slug"),
        title: row.get("title"),
        difficulty: row
            .get::<String, _>("difficulty")
            .parse()
            .unwrap_or_default(),
        learning_status: row
            .get::<String, _>("learning_status")
            .parse()
            .unwrap_or_default(),
        created_at_utc: row.get("created_at_utc"),
    }
}

fn map_row_to_problem(row: &PgRow) -> Problem {
    Problem {
        id: row.get("id"),
        leetcode_id: row.get("leetcode_id"),
        slug: row.get("slug"),
        title: row.get("title"),
        description: row.get("description"),
        difficulty: row
            .get::<String, _>("difficulty")
            .parse()
            .unwrap_or_default(),
        content: row.get("content"),
        solution: row.get("solution"),
        learning_status: row
            .get::<String, _>("learning_status")
            .parse()
            .unwrap_or_default(),
        created_at_utc: row.get("created_at_utc"),
    }
}

fn map_row_to_neighbor(row: &PgRow) -> NeighborRef {
    NeighborRef {
        leetcode_id: row.get("leetcode_id"),
        slug: row.get("slug"),
        title: row.get("title"),
    }
}

/// PostgreSQL implementation of ProblemRepository.
pub struct PgProblemRepository {
    pool: Pool<Postgres>,
}

impl PgProblemRepository {
    /// Create a new PgProblemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProblemRepository for PgProblemRepository {
    async fn upsert(&self, problem: NewProblem) -> Result<Uuid> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO problem (id, leetcode_id, slug, title, description, difficulty, content)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                difficulty = EXCLUDED.difficulty,
                content = EXCLUDED.content
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(problem.leetcode_id)
        .bind(&problem.slug)
        .bind(&problem.title)
        .bind(&problem.description)
        .bind(problem.difficulty.to_string())
        .bind(&problem.content)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<ProblemDetail>> {
        let row = sqlx::query(
            r#"
            SELECT
                id, leetcode_id, slug, title, description, difficulty,
                content, solution, learning_status, created_at_utc
            FROM problem
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };
        let problem = map_row_to_problem(&row);

        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT c.name
            FROM category c
            JOIN problem_category pc ON pc.category_id = c.id
            WHERE pc.problem_id = $1
            ORDER BY c.name
            "#,
        )
        .bind(problem.id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Some(ProblemDetail {
            problem,
            categories,
        }))
    }

    async fn list(&self, req: ListProblemsRequest) -> Result<ProblemPage> {
        let page = req.page.max(1);
        let page_size = req.page_size.clamp(1, defaults::PAGE_SIZE_MAX);
        let offset = (page - 1) * page_size;

        let has_tag = req.tag.is_some();
        let has_status = req.status.is_some();

        // Build count query
        let mut count_query = String::from("SELECT COUNT(*) FROM problem p WHERE TRUE ");
        let mut param_idx = 1;
        add_problem_filters(&mut count_query, &mut param_idx, has_tag, has_status);

        let total: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            if let Some(ref tag) = req.tag {
                q = q.bind(tag);
            }
            if let Some(status) = req.status {
                q = q.bind(status.to_string());
            }
            q.fetch_one(&self.pool).await.map_err(Error::Database)?
        };

        // Build page query, same filters and parameter order
        let mut list_query = String::from(
            "SELECT p.id, p.leetcode_id, p.slug, p.title, p.difficulty, \
             p.learning_status, p.created_at_utc \
             FROM problem p WHERE TRUE ",
        );
        param_idx = 1;
        add_problem_filters(&mut list_query, &mut param_idx, has_tag, has_status);
        list_query.push_str(&format!(
            "ORDER BY p.leetcode_id ASC LIMIT ${} OFFSET ${}",
            param_idx,
            param_idx + 1
        ));

        let rows = {
            let mut q = sqlx::query(&list_query);
            if let Some(ref tag) = req.tag {
                q = q.bind(tag);
            }
            if let Some(status) = req.status {
                q = q.bind(status.to_string());
            }
            q = q.bind(page_size).bind(offset);
            q.fetch_all(&self.pool).await.map_err(Error::Database)?
        };

        let problems = rows.into_iter().map(map_row_to_summary).collect();

        Ok(ProblemPage {
            problems,
            total,
            page,
            page_size,
        })
    }

    async fn adjacent(
        &self,
        leetcode_id: i32,
        tag: Option<&str>,
        status: Option<LearningStatus>,
    ) -> Result<AdjacentProblems> {
        let has_tag = tag.is_some();
        let has_status = status.is_some();

        let mut prev_query = String::from(
            "SELECT p.leetcode_id, p.slug, p.title FROM problem p WHERE p.leetcode_id < $1 ",
        );
        let mut param_idx = 2;
        add_problem_filters(&mut prev_query, &mut param_idx, has_tag, has_status);
        prev_query.push_str("ORDER BY p.leetcode_id DESC LIMIT 1");

        let mut next_query = String::from(
            "SELECT p.leetcode_id, p.slug, p.title FROM problem p WHERE p.leetcode_id > $1 ",
        );
        param_idx = 2;
        add_problem_filters(&mut next_query, &mut param_idx, has_tag, has_status);
        next_query.push_str("ORDER BY p.leetcode_id ASC LIMIT 1");

        let prev = {
            let mut q = sqlx::query(&prev_query).bind(leetcode_id);
            if let Some(tag) = tag {
                q = q.bind(tag);
            }
            if let Some(status) = status {
                q = q.bind(status.to_string());
            }
            q.fetch_optional(&self.pool).await.map_err(Error::Database)?
        };

        let next = {
            let mut q = sqlx::query(&next_query).bind(leetcode_id);
            if let Some(tag) = tag {
                q = q.bind(tag);
            }
            if let Some(status) = status {
                q = q.bind(status.to_string());
            }
            q.fetch_optional(&self.pool).await.map_err(Error::Database)?
        };

        Ok(AdjacentProblems {
            prev: prev.as_ref().map(map_row_to_neighbor),
            next: next.as_ref().map(map_row_to_neighbor),
        })
    }

    async fn update_content(
        &self,
        slug: &str,
        description: Option<&str>,
        solution: Option<&str>,
    ) -> Result<()> {
        if description.is_none() && solution.is_none() {
            return Err(Error::InvalidInput(
                "Nothing to update: provide a description or solution".to_string(),
            ));
        }

        let mut updates: Vec<String> = Vec::new();
        // $1 = slug, dynamic params start at $2
        let mut param_idx = 2;

        if description.is_some() {
            updates.push(format!("description = ${}", param_idx));
            param_idx += 1;
        }
        if solution.is_some() {
            updates.push(format!("solution = ${}", param_idx));
        }

        let query = format!("UPDATE problem SET {} WHERE slug = $1", updates.join(", "));

        let mut q = sqlx::query(&query).bind(slug);
        if let Some(description) = description {
            q = q.bind(description);
        }
        if let Some(solution) = solution {
            q = q.bind(solution);
        }
        let result = q.execute(&self.pool).await.map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ProblemNotFound(slug.to_string()));
        }
        Ok(())
    }

    async fn update_learning_status(&self, slug: &str, status: LearningStatus) -> Result<()> {
        let result = sqlx::query("UPDATE problem SET learning_status = $1 WHERE slug = $2")
            .bind(status.to_string())
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ProblemNotFound(slug.to_string()));
        }
        Ok(())
    }

    async fn search(&self, query: &str, limit: i64) -> Result<Vec<ProblemSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", crate::escape_like(query));

        let rows = sqlx::query(
            "SELECT p.id, p.leetcode_id, p.slug, p.title, p.difficulty, \
             p.learning_status, p.created_at_utc \
             FROM problem p \
             WHERE p.title ILIKE $1 \
                OR p.slug ILIKE $1 \
                OR CAST(p.leetcode_id AS TEXT) LIKE $1 \
             ORDER BY p.leetcode_id ASC \
             LIMIT $2",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_summary).collect())
    }
}

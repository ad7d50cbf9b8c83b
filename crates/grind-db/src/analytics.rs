//! Learning-status analytics queries.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use grind_core::{
    AnalyticsRepository, Error, LearningAnalytics, LearningStatus, Result, StatusBuckets,
};

/// Percentage of `count` over `total`, rounded to the nearest integer.
/// Zero when `total` is zero. Rounded values may not sum to 100.
fn percentage(count: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

/// PostgreSQL implementation of AnalyticsRepository.
pub struct PgAnalyticsRepository {
    pool: Pool<Postgres>,
}

impl PgAnalyticsRepository {
    /// Create a new PgAnalyticsRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    /// Count problems per learning status in one aggregate query,
    /// optionally restricted to a single tag.
    async fn learning_breakdown(&self, tag: Option<&str>) -> Result<LearningAnalytics> {
        let mut query =
            String::from("SELECT p.learning_status, COUNT(*) AS count FROM problem p WHERE 1=1 ");
        if tag.is_some() {
            query.push_str(
                "AND EXISTS (SELECT 1 FROM problem_category pc \
                 JOIN category c ON c.id = pc.category_id \
                 WHERE pc.problem_id = p.id AND c.slug = $1) ",
            );
        }
        query.push_str("GROUP BY p.learning_status");

        let mut q = sqlx::query(&query);
        if let Some(tag) = tag {
            q = q.bind(tag);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        // The CHECK constraint admits exactly three statuses, so each
        // bucket appears at most once in the grouped rows.
        let mut counts = StatusBuckets::default();
        for row in rows {
            let status: LearningStatus = row
                .get::<String, _>("learning_status")
                .parse()
                .unwrap_or_default();
            let count: i64 = row.get("count");
            match status {
                LearningStatus::Mastered => counts.mastered = count,
                LearningStatus::Learning => counts.learning = count,
                LearningStatus::ToDo => counts.to_do = count,
            }
        }

        let total = counts.mastered + counts.learning + counts.to_do;

        let percentages = StatusBuckets {
            mastered: percentage(counts.mastered, total),
            learning: percentage(counts.learning, total),
            to_do: percentage(counts.to_do, total),
        };

        Ok(LearningAnalytics {
            counts,
            percentages,
            total,
        })
    }
}

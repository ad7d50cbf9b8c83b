//! Integration tests for problem storage and updates.
//!
//! This test suite validates:
//! - Upsert inserts new problems and refreshes existing ones by slug
//! - Detail fetch returns the full problem with sorted category names
//! - Partial content updates (description, solution, or both)
//! - Learning status transitions
//!
//! **IMPORTANT**: These tests require a running PostgreSQL database.
//! They are ignored by default; run with `cargo test -- --ignored`.

use grind_db::test_fixtures::{TestDatabase, TestDataBuilder};
use grind_db::{Difficulty, Error, LearningStatus, NewProblem, ProblemRepository};

fn sample_problem() -> NewProblem {
    NewProblem {
        leetcode_id: 1,
        slug: "two-sum".to_string(),
        title: "Two Sum".to_string(),
        description: Some("Given an array of integers...".to_string()),
        difficulty: Difficulty::Easy,
        content: "var twoSum = function(nums, target) {};".to_string(),
    }
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_upsert_inserts_then_updates_by_slug() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let id = db.problems.upsert(sample_problem()).await.expect("insert");

    let again = db
        .problems
        .upsert(NewProblem {
            title: "Two Sum (revised)".to_string(),
            difficulty: Difficulty::Medium,
            content: "// updated".to_string(),
            ..sample_problem()
        })
        .await
        .expect("update");

    // Same row, refreshed fields
    assert_eq!(id, again);

    let detail = db
        .problems
        .get_by_slug("two-sum")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(detail.problem.title, "Two Sum (revised)");
    assert_eq!(detail.problem.difficulty, Difficulty::Medium);
    assert_eq!(detail.problem.content, "// updated");
    assert_eq!(detail.problem.leetcode_id, 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_new_problems_start_as_todo() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    db.problems.upsert(sample_problem()).await.expect("insert");

    let detail = db
        .problems
        .get_by_slug("two-sum")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(detail.problem.learning_status, LearningStatus::ToDo);
    assert!(detail.problem.solution.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_get_by_slug_returns_sorted_category_names() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_tagged_problem(1, "two-sum", &["Hash Table", "Array"])
        .await
        .build()
        .await;

    let detail = db
        .problems
        .get_by_slug("two-sum")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(detail.categories, vec!["Array", "Hash Table"]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_get_by_slug_missing_returns_none() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let detail = db.problems.get_by_slug("no-such-problem").await.expect("get");
    assert!(detail.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_update_content_partial_fields() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    db.problems.upsert(sample_problem()).await.expect("insert");

    // Solution only: description untouched
    db.problems
        .update_content("two-sum", None, Some("Use a hash map."))
        .await
        .expect("update solution");

    let detail = db
        .problems
        .get_by_slug("two-sum")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(detail.problem.solution.as_deref(), Some("Use a hash map."));
    assert_eq!(
        detail.problem.description.as_deref(),
        Some("Given an array of integers...")
    );

    // Both at once
    db.problems
        .update_content("two-sum", Some("New statement."), Some("New solution."))
        .await
        .expect("update both");

    let detail = db
        .problems
        .get_by_slug("two-sum")
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(detail.problem.description.as_deref(), Some("New statement."));
    assert_eq!(detail.problem.solution.as_deref(), Some("New solution."));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_update_content_requires_some_field() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    db.problems.upsert(sample_problem()).await.expect("insert");

    let err = db
        .problems
        .update_content("two-sum", None, None)
        .await
        .expect_err("nothing to update");
    assert!(matches!(err, Error::InvalidInput(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_updates_on_missing_problem_fail() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let err = db
        .problems
        .update_content("no-such-problem", Some("text"), None)
        .await
        .expect_err("missing problem");
    assert!(matches!(err, Error::ProblemNotFound(_)));

    let err = db
        .problems
        .update_learning_status("no-such-problem", LearningStatus::Learning)
        .await
        .expect_err("missing problem");
    assert!(matches!(err, Error::ProblemNotFound(_)));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_learning_status_transitions() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    db.problems.upsert(sample_problem()).await.expect("insert");

    for status in [
        LearningStatus::Learning,
        LearningStatus::Mastered,
        LearningStatus::ToDo,
    ] {
        db.problems
            .update_learning_status("two-sum", status)
            .await
            .expect("update status");

        let detail = db
            .problems
            .get_by_slug("two-sum")
            .await
            .expect("get")
            .expect("exists");
        assert_eq!(detail.problem.learning_status, status);
    }

    test_db.cleanup().await;
}

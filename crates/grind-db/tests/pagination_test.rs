//! Integration tests for problem listing, pagination, and navigation.
//!
//! This test suite validates:
//! - Listing is always ordered by ascending LeetCode id
//! - Page/page-size clamping and out-of-range pages
//! - Tag and status filters, alone and composed
//! - Prev/next navigation under the same filters as the listing
//! - Title search with LIKE wildcard escaping
//!
//! **IMPORTANT**: These tests require a running PostgreSQL database.
//! They are ignored by default; run with `cargo test -- --ignored`.

use grind_db::test_fixtures::{seed_problem_ladder, TestDatabase, TestDataBuilder};
use grind_db::{defaults, LearningStatus, ListProblemsRequest, ProblemRepository};

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_orders_by_leetcode_id() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    // Insert out of order
    TestDataBuilder::new(db)
        .with_problem(42, "answer", "Answer")
        .await
        .with_problem(7, "lucky", "Lucky")
        .await
        .with_problem(19, "prime", "Prime")
        .await
        .build()
        .await;

    let page = db
        .problems
        .list(ListProblemsRequest::default())
        .await
        .expect("list");

    let ids: Vec<i32> = page.problems.iter().map(|p| p.leetcode_id).collect();
    assert_eq!(ids, vec![7, 19, 42]);
    assert_eq!(page.total, 3);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_pagination_boundaries() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 25).await;

    let first = db
        .problems
        .list(ListProblemsRequest {
            page: 1,
            page_size: 10,
            ..Default::default()
        })
        .await
        .expect("page 1");
    assert_eq!(first.problems.len(), 10);
    assert_eq!(first.problems[0].leetcode_id, 1);
    assert_eq!(first.problems[9].leetcode_id, 10);
    assert_eq!(first.total, 25);

    let last = db
        .problems
        .list(ListProblemsRequest {
            page: 3,
            page_size: 10,
            ..Default::default()
        })
        .await
        .expect("page 3");
    assert_eq!(last.problems.len(), 5);
    assert_eq!(last.problems[0].leetcode_id, 21);
    assert_eq!(last.total, 25);

    // Past the end: empty page, total still reported
    let beyond = db
        .problems
        .list(ListProblemsRequest {
            page: 4,
            page_size: 10,
            ..Default::default()
        })
        .await
        .expect("page 4");
    assert!(beyond.problems.is_empty());
    assert_eq!(beyond.total, 25);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_clamps_page_and_page_size() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 3).await;

    let page = db
        .problems
        .list(ListProblemsRequest {
            page: 0,
            page_size: 100_000,
            ..Default::default()
        })
        .await
        .expect("list");

    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, defaults::PAGE_SIZE_MAX);
    assert_eq!(page.problems.len(), 3);

    let tiny = db
        .problems
        .list(ListProblemsRequest {
            page: -5,
            page_size: 0,
            ..Default::default()
        })
        .await
        .expect("list");

    assert_eq!(tiny.page, 1);
    assert_eq!(tiny.page_size, 1);
    assert_eq!(tiny.problems.len(), 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_filters_by_tag() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_tagged_problem(1, "two-sum", &["Array"])
        .await
        .with_tagged_problem(2, "valid-anagram", &["String"])
        .await
        .with_tagged_problem(3, "three-sum", &["Array", "Two Pointers"])
        .await
        .build()
        .await;

    let page = db
        .problems
        .list(ListProblemsRequest {
            tag: Some("array".to_string()),
            ..Default::default()
        })
        .await
        .expect("list");

    let ids: Vec<i32> = page.problems.iter().map(|p| p.leetcode_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(page.total, 2);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_nonexistent_tag_returns_empty() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 3).await;

    let page = db
        .problems
        .list(ListProblemsRequest {
            tag: Some("no-such-tag".to_string()),
            ..Default::default()
        })
        .await
        .expect("list");

    assert!(page.problems.is_empty());
    assert_eq!(page.total, 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_list_composes_tag_and_status_filters() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_tagged_problem(1, "two-sum", &["Array"])
        .await
        .with_tagged_problem(2, "three-sum", &["Array"])
        .await
        .with_tagged_problem(3, "valid-anagram", &["String"])
        .await
        .build()
        .await;

    db.problems
        .update_learning_status("two-sum", LearningStatus::Mastered)
        .await
        .expect("set status");
    db.problems
        .update_learning_status("valid-anagram", LearningStatus::Mastered)
        .await
        .expect("set status");

    let page = db
        .problems
        .list(ListProblemsRequest {
            tag: Some("array".to_string()),
            status: Some(LearningStatus::Mastered),
            ..Default::default()
        })
        .await
        .expect("list");

    let slugs: Vec<&str> = page.problems.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["two-sum"]);
    assert_eq!(page.total, 1);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_adjacent_middle_first_and_last() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 3).await;

    let middle = db.problems.adjacent(2, None, None).await.expect("adjacent");
    assert_eq!(middle.prev.as_ref().map(|n| n.leetcode_id), Some(1));
    assert_eq!(middle.next.as_ref().map(|n| n.leetcode_id), Some(3));

    let first = db.problems.adjacent(1, None, None).await.expect("adjacent");
    assert!(first.prev.is_none());
    assert_eq!(first.next.as_ref().map(|n| n.leetcode_id), Some(2));

    let last = db.problems.adjacent(3, None, None).await.expect("adjacent");
    assert_eq!(last.prev.as_ref().map(|n| n.leetcode_id), Some(2));
    assert!(last.next.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_adjacent_skips_gaps_in_ids() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_problem(5, "longest-palindrome", "Longest Palindrome")
        .await
        .with_problem(17, "letter-combinations", "Letter Combinations")
        .await
        .with_problem(100, "same-tree", "Same Tree")
        .await
        .build()
        .await;

    let nav = db
        .problems
        .adjacent(17, None, None)
        .await
        .expect("adjacent");
    assert_eq!(nav.prev.as_ref().map(|n| n.leetcode_id), Some(5));
    assert_eq!(nav.next.as_ref().map(|n| n.leetcode_id), Some(100));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_adjacent_respects_tag_filter() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_tagged_problem(1, "two-sum", &["Array"])
        .await
        .with_tagged_problem(2, "valid-anagram", &["String"])
        .await
        .with_tagged_problem(3, "three-sum", &["Array"])
        .await
        .build()
        .await;

    // Under the array filter, 2 is invisible: 1 and 3 are neighbors
    let nav = db
        .problems
        .adjacent(1, Some("array"), None)
        .await
        .expect("adjacent");
    assert!(nav.prev.is_none());
    assert_eq!(nav.next.as_ref().map(|n| n.leetcode_id), Some(3));

    let nav = db
        .problems
        .adjacent(3, Some("array"), None)
        .await
        .expect("adjacent");
    assert_eq!(nav.prev.as_ref().map(|n| n.leetcode_id), Some(1));
    assert!(nav.next.is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_adjacent_respects_status_filter() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 3).await;
    db.problems
        .update_learning_status("problem-1", LearningStatus::Mastered)
        .await
        .expect("set status");
    db.problems
        .update_learning_status("problem-3", LearningStatus::Mastered)
        .await
        .expect("set status");

    let nav = db
        .problems
        .adjacent(1, None, Some(LearningStatus::Mastered))
        .await
        .expect("adjacent");
    assert_eq!(nav.next.as_ref().map(|n| n.leetcode_id), Some(3));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_search_matches_title_case_insensitively() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_problem(1, "two-sum", "Two Sum")
        .await
        .with_problem(167, "two-sum-ii", "Two Sum II")
        .await
        .with_problem(242, "valid-anagram", "Valid Anagram")
        .await
        .build()
        .await;

    let hits = db.problems.search("two sum", 20).await.expect("search");
    let ids: Vec<i32> = hits.iter().map(|p| p.leetcode_id).collect();
    assert_eq!(ids, vec![1, 167]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_search_matches_slug_and_leetcode_id() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db)
        .with_problem(1, "two-sum", "Two Sum")
        .await
        .with_problem(121, "best-time-to-buy-and-sell-stock", "Best Time to Buy and Sell Stock")
        .await
        .build()
        .await;

    // Slug substring, not present in the title
    let hits = db.problems.search("sell-stock", 20).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].leetcode_id, 121);

    // Decimal id substring
    let hits = db.problems.search("121", 20).await.expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].slug, "best-time-to-buy-and-sell-stock");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_search_blank_query_matches_nothing() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 3).await;

    let hits = db.problems.search("   ", 20).await.expect("search");
    assert!(hits.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_search_escapes_like_wildcards() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 5).await;

    // A bare wildcard must not match every title
    let hits = db.problems.search("%", 20).await.expect("search");
    assert!(hits.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires a running Postgres (DATABASE_URL or localhost:15432)
async fn test_search_honors_limit() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    seed_problem_ladder(db, 10).await;

    let hits = db.problems.search("Problem", 3).await.expect("search");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].leetcode_id, 1);

    test_db.cleanup().await;
}

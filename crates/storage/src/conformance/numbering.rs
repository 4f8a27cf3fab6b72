use std::future::Future;

use super::{make_record, TestResult};
use crate::MatchLogStore;

pub(super) async fn run_numbering_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "numbering",
            "empty_store_starts_at_1",
            empty_store_starts_at_1(factory).await,
        ),
        TestResult::from_result(
            "numbering",
            "next_id_is_idempotent_without_append",
            next_id_is_idempotent_without_append(factory).await,
        ),
        TestResult::from_result(
            "numbering",
            "next_id_follows_append",
            next_id_follows_append(factory).await,
        ),
        TestResult::from_result(
            "numbering",
            "next_id_follows_highest_not_latest",
            next_id_follows_highest_not_latest(factory).await,
        ),
    ]
}

async fn empty_store_starts_at_1<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let next = s.next_match_id().await.map_err(|e| e.to_string())?;
    if next != 1 {
        return Err(format!("expected 1 on empty store, got {next}"));
    }
    Ok(())
}

async fn next_id_is_idempotent_without_append<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.append(make_record(1)).await.map_err(|e| e.to_string())?;
    let first = s.next_match_id().await.map_err(|e| e.to_string())?;
    let second = s.next_match_id().await.map_err(|e| e.to_string())?;
    if first != second {
        return Err(format!("next_match_id changed without append: {first} then {second}"));
    }
    Ok(())
}

async fn next_id_follows_append<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for expected in 1..=3u64 {
        let next = s.next_match_id().await.map_err(|e| e.to_string())?;
        if next != expected {
            return Err(format!("expected {expected}, got {next}"));
        }
        s.append(make_record(next)).await.map_err(|e| e.to_string())?;
    }
    let next = s.next_match_id().await.map_err(|e| e.to_string())?;
    if next != 4 {
        return Err(format!("expected 4 after appending 3, got {next}"));
    }
    Ok(())
}

/// Numbering resumes from the highest id, regardless of append order.
async fn next_id_follows_highest_not_latest<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.append(make_record(7)).await.map_err(|e| e.to_string())?;
    s.append(make_record(2)).await.map_err(|e| e.to_string())?;
    let next = s.next_match_id().await.map_err(|e| e.to_string())?;
    if next != 8 {
        return Err(format!("expected 8, got {next}"));
    }
    Ok(())
}

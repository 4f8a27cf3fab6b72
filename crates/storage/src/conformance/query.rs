use std::future::Future;

use super::{make_record, TestResult};
use crate::{MatchLogStore, StorageError};

pub(super) async fn run_query_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "query",
            "list_all_empty_store",
            list_all_empty_store(factory).await,
        ),
        TestResult::from_result(
            "query",
            "list_all_returns_every_record",
            list_all_returns_every_record(factory).await,
        ),
        TestResult::from_result(
            "query",
            "get_returns_appended_record",
            get_returns_appended_record(factory).await,
        ),
        TestResult::from_result(
            "query",
            "get_missing_returns_match_not_found",
            get_missing_returns_match_not_found(factory).await,
        ),
    ]
}

async fn list_all_empty_store<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let all = s.list_all().await.map_err(|e| e.to_string())?;
    if !all.is_empty() {
        return Err(format!("expected no records, got {}", all.len()));
    }
    Ok(())
}

/// Order is unspecified, so compare after sorting by match id.
async fn list_all_returns_every_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    for id in [3u64, 1, 2] {
        s.append(make_record(id)).await.map_err(|e| e.to_string())?;
    }
    let mut all = s.list_all().await.map_err(|e| e.to_string())?;
    all.sort_by_key(|r| r.match_id);
    let ids: Vec<u64> = all.iter().map(|r| r.match_id).collect();
    if ids != vec![1, 2, 3] {
        return Err(format!("expected ids [1, 2, 3], got {ids:?}"));
    }
    if all.iter().any(|r| *r != make_record(r.match_id)) {
        return Err("listed record differs from appended record".to_string());
    }
    Ok(())
}

async fn get_returns_appended_record<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.append(make_record(5)).await.map_err(|e| e.to_string())?;
    let rec = s.get(5).await.map_err(|e| e.to_string())?;
    if rec != make_record(5) {
        return Err(format!("unexpected record: {rec:?}"));
    }
    Ok(())
}

async fn get_missing_returns_match_not_found<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.get(42).await {
        Err(StorageError::MatchNotFound { match_id: 42 }) => Ok(()),
        Err(other) => Err(format!("expected MatchNotFound, got {other}")),
        Ok(rec) => Err(format!("expected MatchNotFound, got {rec:?}")),
    }
}

use std::future::Future;

use super::{make_record, TestResult};
use crate::{MatchLogStore, MatchRecord, StorageError};

pub(super) async fn run_append_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "append",
            "duplicate_append_returns_duplicate_match",
            duplicate_append_returns_duplicate_match(factory).await,
        ),
        TestResult::from_result(
            "append",
            "duplicate_append_keeps_original",
            duplicate_append_keeps_original(factory).await,
        ),
        TestResult::from_result(
            "append",
            "duplicate_append_does_not_advance_numbering",
            duplicate_append_does_not_advance_numbering(factory).await,
        ),
    ]
}

async fn duplicate_append_returns_duplicate_match<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.append(make_record(1)).await.map_err(|e| e.to_string())?;
    match s.append(make_record(1)).await {
        Err(StorageError::DuplicateMatch { match_id: 1 }) => Ok(()),
        Err(other) => Err(format!("expected DuplicateMatch {{ match_id: 1 }}, got {other}")),
        Ok(()) => Err("duplicate append succeeded".to_string()),
    }
}

async fn duplicate_append_keeps_original<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let original = make_record(1);
    s.append(original.clone()).await.map_err(|e| e.to_string())?;

    let replacement = MatchRecord::new(1, "replaced\n", "Player B", "2030-01-01T00:00:00Z");
    let _ = s.append(replacement).await;

    let stored = s.get(1).await.map_err(|e| e.to_string())?;
    if stored != original {
        return Err(format!("stored record was modified: {stored:?}"));
    }
    Ok(())
}

async fn duplicate_append_does_not_advance_numbering<S, F, Fut>(
    factory: &F,
) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    s.append(make_record(1)).await.map_err(|e| e.to_string())?;
    let _ = s.append(make_record(1)).await;
    let next = s.next_match_id().await.map_err(|e| e.to_string())?;
    if next != 2 {
        return Err(format!("expected 2, got {next}"));
    }
    Ok(())
}

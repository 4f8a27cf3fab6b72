use std::future::Future;
use std::sync::Arc;

use super::{make_record, TestResult};
use crate::{MatchLogStore, StorageError};

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_same_id_exactly_one_wins",
            concurrent_same_id_exactly_one_wins(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "concurrent_distinct_ids_all_succeed",
            concurrent_distinct_ids_all_succeed(factory).await,
        ),
    ]
}

/// N tasks race to append the same match id. Exactly one succeeds; the rest
/// must get DuplicateMatch.
async fn concurrent_same_id_exactly_one_wins<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for _ in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move { s.append(make_record(1)).await }));
    }

    let mut wins = 0;
    let mut duplicates = 0;
    for h in handles {
        match h.await.map_err(|e| format!("join: {e}"))? {
            Ok(()) => wins += 1,
            Err(StorageError::DuplicateMatch { .. }) => duplicates += 1,
            Err(other) => return Err(format!("unexpected error: {other}")),
        }
    }

    if wins != 1 || duplicates != N - 1 {
        return Err(format!(
            "expected 1 win and {} duplicates, got {wins} and {duplicates}",
            N - 1
        ));
    }
    Ok(())
}

async fn concurrent_distinct_ids_all_succeed<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: MatchLogStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);

    let mut handles = Vec::new();
    for i in 1..=N as u64 {
        let s = storage.clone();
        handles.push(tokio::spawn(async move { s.append(make_record(i)).await }));
    }
    for h in handles {
        h.await
            .map_err(|e| format!("join: {e}"))?
            .map_err(|e| e.to_string())?;
    }

    let all = storage.list_all().await.map_err(|e| e.to_string())?;
    if all.len() != N {
        return Err(format!("expected {N} records, got {}", all.len()));
    }
    let next = storage.next_match_id().await.map_err(|e| e.to_string())?;
    if next != N as u64 + 1 {
        return Err(format!("expected next id {}, got {next}", N + 1));
    }
    Ok(())
}

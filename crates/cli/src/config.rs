//! Service configuration: command-line values with environment fallbacks.
//!
//! Precedence for every setting is flag, then environment variable, then the
//! built-in default.

use std::path::PathBuf;
use std::time::Duration;

pub(crate) const DEFAULT_PLAYER_PORT: u16 = 8888;
pub(crate) const DEFAULT_TABLE_PORT: u16 = 8889;

/// Default think time before and after each responder call, in milliseconds.
pub(crate) const DEFAULT_THINK_MS: u64 = 1000;

const THINK_MS_ENV: &str = "PINGPONG_THINK_MS";
const TABLE_URL_ENV: &str = "PINGPONG_TABLE_URL";
const RESPONDER_TIMEOUT_ENV: &str = "PINGPONG_RESPONDER_TIMEOUT_MS";

/// Everything the player service needs to start.
#[derive(Debug, Clone)]
pub(crate) struct PlayerConfig {
    pub(crate) port: u16,
    /// Base URL of the table service, e.g. `http://127.0.0.1:8889`.
    pub(crate) table_url: String,
    /// JSON-lines store file. `None` keeps matches in memory only.
    pub(crate) store: Option<PathBuf>,
    /// Directory for hourly CSV journals. `None` disables journaling.
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) think_time: Duration,
    pub(crate) responder_timeout: Option<Duration>,
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<u64>().ok())
}

/// Think time: `--think-ms`, then `PINGPONG_THINK_MS`, then one second.
pub(crate) fn think_time(flag: Option<u64>) -> Duration {
    Duration::from_millis(
        flag.or_else(|| env_u64(THINK_MS_ENV))
            .unwrap_or(DEFAULT_THINK_MS),
    )
}

/// Table URL: `--table-url`, then `PINGPONG_TABLE_URL`, then localhost on
/// the given table port.
pub(crate) fn table_url(flag: Option<String>, table_port: u16) -> String {
    flag.or_else(|| {
        std::env::var(TABLE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
    })
    .unwrap_or_else(|| local_table_url(table_port))
}

/// URL of a table service started in this process on `table_port`.
pub(crate) fn local_table_url(table_port: u16) -> String {
    format!("http://127.0.0.1:{}", table_port)
}

/// Responder timeout from `PINGPONG_RESPONDER_TIMEOUT_MS`; unset or zero
/// means no timeout.
pub(crate) fn responder_timeout() -> Option<Duration> {
    env_u64(RESPONDER_TIMEOUT_ENV)
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}

/// `--no-journal` wins over `--log-dir`.
pub(crate) fn log_dir(dir: PathBuf, no_journal: bool) -> Option<PathBuf> {
    if no_journal {
        None
    } else {
        Some(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_default() {
        assert_eq!(think_time(Some(0)), Duration::ZERO);
        assert_eq!(think_time(Some(250)), Duration::from_millis(250));
    }

    #[test]
    fn explicit_table_url_is_kept() {
        assert_eq!(
            table_url(Some("http://table:9000".to_string()), 8889),
            "http://table:9000"
        );
    }

    #[test]
    fn local_table_url_targets_loopback_port() {
        assert_eq!(local_table_url(9100), "http://127.0.0.1:9100");
    }

    #[test]
    fn no_journal_disables_log_dir() {
        assert_eq!(log_dir(PathBuf::from("logs"), true), None);
        assert_eq!(
            log_dir(PathBuf::from("logs"), false),
            Some(PathBuf::from("logs"))
        );
    }
}

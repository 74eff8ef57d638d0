//! Retry classification for transient provider failures.
//!
//! Providers never retry on their own; the orchestrator consults these
//! helpers when retries are configured.

use crate::error::AnswerFailure;
use std::time::Duration;

/// Determine whether a provider failure is worth retrying.
///
/// Retryable: transport errors with no status (connection, timeout), rate
/// limits (429) and server errors (5xx). Missing credentials and malformed
/// responses are never retried.
pub fn is_retryable(failure: &AnswerFailure) -> bool {
    match failure {
        AnswerFailure::Unavailable { status_code, .. } => match status_code {
            Some(code) => *code == 429 || (500..=599).contains(code),
            None => true,
        },
        AnswerFailure::Unconfigured { .. } | AnswerFailure::MalformedResponse { .. } => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unavailable(status_code: Option<u16>) -> AnswerFailure {
        AnswerFailure::Unavailable {
            provider: "openai".to_string(),
            status_code,
            body: "error".to_string(),
        }
    }

    #[test]
    fn test_connection_failure_is_retryable() {
        assert!(is_retryable(&unavailable(None)));
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(is_retryable(&unavailable(Some(429))));
    }

    #[test]
    fn test_server_error_is_retryable() {
        assert!(is_retryable(&unavailable(Some(503))));
    }

    #[test]
    fn test_auth_error_not_retryable() {
        assert!(!is_retryable(&unavailable(Some(401))));
    }

    #[test]
    fn test_unconfigured_and_malformed_not_retryable() {
        assert!(!is_retryable(&AnswerFailure::Unconfigured {
            provider: "openai".to_string(),
            message: "no key".to_string(),
        }));
        assert!(!is_retryable(&AnswerFailure::MalformedResponse {
            provider: "openai".to_string(),
            raw: "{}".to_string(),
        }));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_duration(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_duration(2, 1000), Duration::from_millis(4000));
        assert_eq!(backoff_duration(3, 1000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
    }
}

use crate::{config::PollConfig, error::Result, models::is_truthy, relay::href::extract_href};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub const GENERIC_FAILURE_DETAIL: &str = "job_failed";

/// Bounded retry policy for job-status polling.
#[derive(Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub is_terminal_failure: fn(&str) -> bool,
    pub extract: fn(&Value) -> Option<String>,
}

impl fmt::Debug for PollPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::from(&PollConfig::default())
    }
}

impl From<&PollConfig> for PollPolicy {
    fn from(config: &PollConfig) -> Self {
        PollPolicy {
            max_attempts: config.max_attempts,
            interval: config.interval(),
            is_terminal_failure,
            extract: extract_href,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Resolved { href: String, attempts: u32 },
    Failed { detail: String, attempts: u32 },
    Exhausted { attempts: u32 },
}

/// `status` is expected lowercased.
pub fn is_terminal_failure(status: &str) -> bool {
    matches!(status, "failed" | "cancelled" | "canceled")
}

/// Lowercased `.status` of a job payload, empty when absent.
pub fn status_token(payload: &Value) -> String {
    match payload.get("status") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(status)) => status.to_lowercase(),
        Some(other) => other.to_string().to_lowercase(),
    }
}

/// Error detail of a failed job: `.result.error`, then `.error`, then a generic label.
pub fn failure_detail(payload: &Value) -> String {
    let candidates = [
        payload.get("result").and_then(|result| result.get("error")),
        payload.get("error"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(detail) => detail.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| GENERIC_FAILURE_DETAIL.to_string())
}

/// Calls `fetch` until the policy extracts an href, sees a terminal failure, or runs out of
/// attempts. Attempts are strictly sequential with `interval` between them. Errors from
/// `fetch` abort the loop.
pub async fn poll_until_terminal<F, Fut>(policy: &PollPolicy, mut fetch: F) -> Result<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    for attempt in 1..=policy.max_attempts {
        let payload = fetch().await?;

        if let Some(href) = (policy.extract)(&payload) {
            return Ok(PollOutcome::Resolved {
                href,
                attempts: attempt,
            });
        }

        let status = status_token(&payload);
        if (policy.is_terminal_failure)(&status) {
            return Ok(PollOutcome::Failed {
                detail: failure_detail(&payload),
                attempts: attempt,
            });
        }

        log::debug!(
            "Job not ready (status: {:?}), attempt {}/{}",
            status,
            attempt,
            policy.max_attempts
        );

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Ok(PollOutcome::Exhausted {
        attempts: policy.max_attempts,
    })
}

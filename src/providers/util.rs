use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How often and how patiently a failed request is repeated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// A single attempt with no retries.
    pub fn once() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn attempts(&self) -> usize {
        self.retries + 1
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up.
///
/// Returns the error of the last attempt.
pub async fn with_retry<F, Fut, T, E>(policy: RetryPolicy, mut operation: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                let err = err.into();
                if attempt >= policy.attempts() {
                    return Err(err);
                }
                warn!(
                    attempt,
                    attempts = policy.attempts(),
                    error = %err,
                    "Request failed, retrying"
                );
                attempt += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

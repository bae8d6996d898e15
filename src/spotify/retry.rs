use std::time::Duration;

use serde_json::Value;

use crate::{
    spotify::client::{ApiError, SpotifyApi},
    warning,
};

/// Rate-limit retry strategy.
///
/// Pure data: deciding the delay and whether another attempt is allowed has
/// no side effects, so it can be checked without a network or a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries until the provider stops answering 429.
    pub max_retries: Option<u32>,
    /// Used when the response carries no usable `Retry-After`.
    pub default_delay: Duration,
    /// Added on top of every delay.
    pub margin: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: Some(5),
            default_delay: Duration::from_secs(1),
            margin: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry_after: Option<u64>) -> Duration {
        retry_after
            .map(Duration::from_secs)
            .unwrap_or(self.default_delay)
            + self.margin
    }

    /// Whether retry number `retry` (1-based) may be issued.
    pub fn allows(&self, retry: u32) -> bool {
        self.max_retries.is_none_or(|max| retry <= max)
    }
}

/// Source of delays. Production sleeps on the tokio timer; tests record.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// GETs `url`, sleeping and retrying while the provider answers 429.
///
/// Every other outcome, success or error, is returned as-is.
pub async fn get_with_retry<C, S>(
    api: &C,
    sleeper: &S,
    policy: &RetryPolicy,
    url: &str,
) -> Result<Value, ApiError>
where
    C: SpotifyApi,
    S: Sleeper,
{
    let mut retries = 0;
    loop {
        match api.get_json(url).await {
            Err(ApiError::RateLimited { retry_after }) => {
                retries += 1;
                if !policy.allows(retries) {
                    return Err(ApiError::RetriesExhausted {
                        attempts: retries - 1,
                    });
                }

                let delay = policy.delay_for(retry_after);
                warning!(
                    "Rate limited by Spotify, retrying in {:.1}s",
                    delay.as_secs_f64()
                );
                sleeper.sleep(delay).await;
            }
            other => return other,
        }
    }
}

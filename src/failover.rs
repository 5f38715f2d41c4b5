//! Retry logic with exponential backoff for inference calls

use std::future::Future;
use std::time::Duration;
use log::{debug, warn};

/// Retry policy for failed requests
#[derive(Debug, Clone)]
pub struct RetryPolicy
{   pub max_attempts: usize
  , pub backoff_multiplier: f32
  , pub initial_backoff: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_attempts: usize
    , backoff_multiplier: f32
    , initial_backoff_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_attempts
          , backoff_multiplier
          , initial_backoff: Duration::from_millis(
              initial_backoff_ms
            )
        }
    }

    /// Calculate backoff duration for attempt number (0-based)
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        let multiplier
          = self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(
          (self.initial_backoff.as_millis() as f32
            * multiplier) as u64
        )
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(3, 2.0, 1000)
    }
}

impl From<&crate::config::RetryConfig> for RetryPolicy
{   fn from(c: &crate::config::RetryConfig) -> Self
    {   RetryPolicy::new(
          c.max_attempts
        , c.backoff_multiplier
        , c.initial_backoff_ms
        )
    }
}

/// Run `op` until it succeeds or `max_attempts` is reached.
/// Every error is retried; the last one is returned unchanged.
///
/// `op` receives the 0-based attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
  policy: &RetryPolicy
, mut op: F
) -> Result<T, crate::error::Error>
where F: FnMut(usize) -> Fut
    , Fut: Future<Output = Result<T, crate::error::Error>>
{   let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop
    { match op(attempt).await
      {   Ok(value) => return Ok(value)
        , Err(e) if attempt + 1 >= attempts => {
            debug!("Giving up after {} attempts: {}", attempts, e);
            return Err(e);
          }
        , Err(e) => {
            let delay = policy.backoff_for_attempt(attempt);
            warn!(
              "Attempt {} failed ({}), retrying in {:?}",
              attempt + 1, e, delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
          }
      }
    }
}

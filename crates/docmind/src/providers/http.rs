//! Shared HTTP plumbing for the hosted providers

use reqwest::{Client, Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Build a client with a request timeout
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Client for streamed bodies: each read is bounded, the whole body is not
pub(crate) fn build_streaming_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeout_secs))
        .read_timeout(Duration::from_secs(timeout_secs))
        .pool_max_idle_per_host(5)
        .build()
        .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Backoff doubling stops here (500ms * 2^6 = 32s)
const MAX_BACKOFF_EXPONENT: u32 = 6;

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(500 * 2u64.pow(attempt.min(MAX_BACKOFF_EXPONENT)))
}

/// Retry a request with exponential backoff.
///
/// Only errors for which [`Error::is_retryable`] holds are retried, so rate
/// limits and bad credentials fail fast.
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, label: &str, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries && e.is_retryable() => {
                let delay = backoff(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}, retrying in {:?}",
                    label,
                    attempt + 1,
                    max_retries + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Turn a non-success response into the provider's error variant.
///
/// 429 becomes [`Error::RateLimited`] and 401/403 become [`Error::Config`].
/// Other 4xx answers become [`Error::Rejected`], which is never retried;
/// 5xx answers go through `make_error`.
pub(crate) async fn check_status(
    response: Response,
    provider: &str,
    make_error: fn(String) -> Error,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::rate_limited(provider));
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Config(format!(
            "{} rejected the credentials (HTTP {}): {}",
            provider, status, body
        )));
    }

    if status.is_client_error() {
        return Err(Error::Rejected {
            provider: provider.to_string(),
            status: status.as_u16(),
            message: body,
        });
    }

    Err(make_error(format!("{} returned HTTP {}: {}", provider, status, body)))
}

use crate::errors::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;

/// Awaits one network step (connecting and receiving headers, or reading the next
/// body chunk) for at most `limit`.
///
/// The limit applies to each step, not to the whole transfer, so a body that keeps
/// arriving never times out however long it takes in total.
pub(crate) async fn within<T, F>(limit: Duration, url: &str, step: F) -> AppResult<T>
where
    F: Future<Output = Result<T, reqwest::Error>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Timeout(format!(
            "no data from {url} within {} ms",
            limit.as_millis()
        ))),
    }
}

/// Reads the whole body, allowing `limit` between consecutive chunks.
pub(crate) async fn read_text(
    mut response: reqwest::Response,
    limit: Duration,
    url: &str,
) -> AppResult<String> {
    let mut body = Vec::new();
    while let Some(chunk) = within(limit, url, response.chunk()).await? {
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn elapsed_step_is_a_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, reqwest::Error>(())
        };

        let result = within(Duration::from_millis(50), "http://example.com/a.pdf", slow).await;

        match result {
            Err(e @ AppError::Timeout(_)) => {
                assert!(e.is_timeout());
                assert!(e.to_string().contains("http://example.com/a.pdf"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn finished_step_passes_through() {
        let quick = async { Ok::<_, reqwest::Error>(7) };
        assert_eq!(
            within(Duration::from_secs(1), "http://example.com", quick)
                .await
                .unwrap(),
            7
        );
    }
}

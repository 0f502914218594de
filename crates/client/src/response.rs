use std::future::Future;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;

/// Parses a response body as JSON, keeping non-JSON text as a string.
///
/// An empty body parses to `null`.
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Reads a terminal response. Non-2xx statuses become [`UploadError::Status`].
pub(crate) async fn read_response(resp: reqwest::Response) -> Result<(u16, Value), UploadError> {
    let status = resp.status();
    let text = resp.text().await.map_err(UploadError::from_reqwest)?;
    let body = parse_body(&text);

    if status.is_success() {
        Ok((status.as_u16(), body))
    } else {
        Err(UploadError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Runs `fut` until it completes or `cancel` fires.
///
/// Dropping the future on cancellation drops the in-flight request with it.
pub(crate) async fn with_cancellation<F>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<F::Output, UploadError>
where
    F: Future,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(UploadError::Aborted),
            out = fut => Ok(out),
        },
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn parse_json_body() {
        assert_eq!(parse_body(r#"{"id": 7}"#), json!({"id": 7}));
        assert_eq!(parse_body("\"ref-1\""), json!("ref-1"));
    }

    #[test]
    fn parse_text_body() {
        assert_eq!(parse_body("ref-1"), json!("ref-1"));
        assert_eq!(parse_body("<html>oops</html>"), json!("<html>oops</html>"));
    }

    #[test]
    fn parse_empty_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
    }

    #[tokio::test]
    async fn cancellation_wins_over_pending_future() {
        let token = CancellationToken::new();
        let t = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            t.cancel();
        });

        let res = with_cancellation(Some(&token), std::future::pending::<()>()).await;
        assert!(matches!(res, Err(UploadError::Aborted)));
    }

    #[tokio::test]
    async fn completes_without_token() {
        let res = with_cancellation(None, async { 5 }).await;
        assert_eq!(res.unwrap(), 5);
    }

    #[tokio::test]
    async fn already_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let res = with_cancellation(Some(&token), async { 5 }).await;
        assert!(matches!(res, Err(UploadError::Aborted)));
    }
}

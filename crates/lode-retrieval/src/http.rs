//! Response status checks for the retrieval client.

use crate::error::TransportError;

/// Fallback when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Pass successful responses through; map 429 to
/// [`TransportError::RateLimited`] and any other non-success status to
/// [`TransportError::Api`] with the response body as message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(TransportError::RateLimited {
            retry_after_secs: retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        return Err(TransportError::Api {
            status,
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

fn retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_after() {
        let err = check_response(response(429, Some("30"), "")).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::RateLimited {
                retry_after_secs: 30
            }
        ));
    }

    #[tokio::test]
    async fn rate_limit_falls_back_without_header() {
        let err = check_response(response(429, Some("soon"), "")).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::RateLimited {
                retry_after_secs: 60
            }
        ));
    }

    #[tokio::test]
    async fn server_error_keeps_body() {
        let err = check_response(response(503, None, "upstream busy"))
            .await
            .unwrap_err();
        match err {
            TransportError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream busy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(response(200, None, "{}")).await.is_ok());
    }
}

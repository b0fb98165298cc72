use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};

use super::types::CheckResult;

/// HTTP prober with a bounded per-request timeout.
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(Duration::from_secs(timeout_seconds)).build()?;

        Ok(Self { client })
    }

    /// One GET request; transport failures surface as errors.
    async fn probe(&self, url: &str) -> Result<(u64, u16)> {
        let start = Instant::now();

        let response =
            self.client.get(url).send().await.map_err(|e| anyhow!("HTTP request failed: {e}"))?;

        let latency = start.elapsed().as_millis() as u64;
        Ok((latency, response.status().as_u16()))
    }

    /// Probe `url` and compare the status code against `expected_status`.
    ///
    /// Every transport failure (refused connection, DNS error, timeout,
    /// malformed response) collapses into a failed result; the pass flag
    /// alone cannot tell a wrong status from an unreachable endpoint.
    pub async fn check(&self, url: &str, expected_status: u16) -> CheckResult {
        let result = CheckResult::new(url, expected_status);

        match self.probe(url).await {
            Ok((latency_ms, status)) if status == expected_status => {
                result.pass(latency_ms, status)
            }
            Ok((latency_ms, status)) => result.fail_status(latency_ms, status),
            Err(e) => result.fail_error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn server_answering(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/probe"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn matching_status_passes() {
        let server = server_answering(405).await;
        let checker = HttpChecker::new(5).unwrap();

        let result = checker.check(&format!("{}/probe", server.uri()), 405).await;

        assert!(result.passed);
        assert_eq!(result.status_code, Some(405));
        assert!(result.latency_ms.is_some());
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn unexpected_status_fails() {
        let server = server_answering(200).await;
        let checker = HttpChecker::new(5).unwrap();

        let result = checker.check(&format!("{}/probe", server.uri()), 405).await;

        assert!(!result.passed);
        assert_eq!(result.status_code, Some(200));
    }

    #[tokio::test]
    async fn refused_connection_collapses_into_a_failure() {
        let checker = HttpChecker::new(5).unwrap();

        let result = checker.check("http://127.0.0.1:1/probe", 200).await;

        assert!(!result.passed);
        assert!(result.status_code.is_none());
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn timeout_collapses_into_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/probe"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        let checker = HttpChecker::new(1).unwrap();

        let result = checker.check(&format!("{}/probe", server.uri()), 200).await;

        assert!(!result.passed);
        assert!(result.status_code.is_none());
        assert!(result.error_message.is_some());
    }
}

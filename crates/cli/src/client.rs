//! Lab API HTTP client

use async_trait::async_trait;
use labconsole_common::{Attempt, Error, LogChunk, Result, TestRunSnapshot};
use labconsole_tailer::{AttemptSource, LogFetcher};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Client for the lab REST API
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("labconsole/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn test_run_url(&self, job_id: &str) -> String {
        format!("{}/test_runs/{}", self.base_url, urlencoding::encode(job_id))
    }

    fn output_url(&self, job_id: &str) -> String {
        format!("{}/output", self.test_run_url(job_id))
    }

    /// Get a test run and its attempts
    pub async fn get_test_run(&self, job_id: &str) -> Result<TestRunSnapshot> {
        let url = self.test_run_url(job_id);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                kind: "test run".to_string(),
                id: job_id.to_string(),
            });
        }
        let response = response.error_for_status().map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    Error::fetch(e.to_string())
}

/// Query parameters of an output request.
fn output_query(attempt_id: &str, path: &str, offset: Option<u64>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("attempt_id", attempt_id.to_string()),
        ("path", path.to_string()),
    ];
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
    query
}

#[async_trait]
impl LogFetcher for HttpClient {
    async fn fetch(
        &self,
        job_id: &str,
        attempt_id: &str,
        path: &str,
        offset: Option<u64>,
    ) -> Result<LogChunk> {
        let url = self.output_url(job_id);
        debug!("GET {} attempt={} path={} offset={:?}", url, attempt_id, path, offset);

        let response = self
            .http
            .get(&url)
            .query(&output_query(attempt_id, path, offset))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(transport_error)?;
        response.json().await.map_err(transport_error)
    }
}

#[async_trait]
impl AttemptSource for HttpClient {
    async fn attempts(&self, job_id: &str) -> Result<Vec<Attempt>> {
        Ok(self.get_test_run(job_id).await?.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new("https://lab.example.com/api/v1/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = client();
        assert_eq!(
            client.test_run_url("run-42"),
            "https://lab.example.com/api/v1/test_runs/run-42"
        );
        assert_eq!(
            client.output_url("run/42"),
            "https://lab.example.com/api/v1/test_runs/run%2F42/output"
        );
    }

    #[test]
    fn test_output_query_without_offset() {
        let query = output_query("att-1", "tmp/stdout.txt", None);
        assert_eq!(
            query,
            vec![
                ("attempt_id", "att-1".to_string()),
                ("path", "tmp/stdout.txt".to_string()),
            ]
        );
    }

    #[test]
    fn test_output_query_with_offset() {
        let query = output_query("att-1", "logs/host_log.txt", Some(9));
        assert_eq!(query.last(), Some(&("offset", "9".to_string())));
    }
}

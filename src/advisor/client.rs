use std::time::Duration;

use reqwest::Client;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{advisor::errors::ClientError, config::Config, models::ClusterScore};

/// HTTP client for the global advisor score endpoint.
///
/// Connections are pooled and reused across scoring calls. Establishing a
/// connection is bounded separately from the per-request timeout, since
/// "cannot connect" and "connected but slow" are configured independently
/// but both spend the same retry budget.
pub struct ScoreClient {
    base_url: String,
    http: Client,
    retry: u32,
    backoff: Duration,
}

impl ScoreClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(ScoreClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            retry: config.retry,
            backoff: config.backoff,
        })
    }

    /// Fetches the score for a single cluster, optionally biased toward an
    /// affinity target.
    ///
    /// Transport errors and non-success statuses are retried up to the
    /// configured budget, waiting out the backoff between attempts unless
    /// `cancel` fires first. A body that fails to parse is permanent: a
    /// stateless endpoint would return the same payload again.
    pub async fn get_score(
        &self,
        cancel: &CancellationToken,
        cluster_name: &str,
        target_cluster: Option<&str>,
    ) -> Result<ClusterScore, ClientError> {
        let mut url = format!(
            "{}/api/advisor/score?cluster={}",
            self.base_url, cluster_name
        );
        if let Some(target) = target_cluster {
            url = format!("{}&target={}", url, target);
        }

        let mut last_err = ClientError::Transport("no attempts made".to_string());
        for attempt in 0..=self.retry {
            match self.attempt(&url).await {
                Ok(score) => return Ok(score),
                Err(err) if err.is_retryable() => {
                    tracing::debug!(cluster=%cluster_name, attempt, error=%err, "Score attempt failed");
                    last_err = err;
                }
                Err(err) => return Err(err),
            }

            // back off before the next attempt, bailing out as soon as the
            // caller gives up
            if attempt < self.retry {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = sleep(self.backoff) => {}
                }
            }
        }

        Err(last_err)
    }

    async fn attempt(&self, url: &str) -> Result<ClusterScore, ClientError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ClientError::Response {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn test_config(base_url: String) -> Config {
        Config {
            base_url,
            retry: 1,
            backoff: Duration::from_millis(10),
            ..Default::default()
        }
    }

    async fn start_failing_server(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/advisor/score"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_success_parses_score() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/advisor/score"))
            .and(query_param("cluster", "member1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"healthScore": 72.5, "reason": "healthy"}"#),
            )
            .mount(&server)
            .await;

        let client = ScoreClient::new(&test_config(server.uri())).unwrap();
        let score = client
            .get_score(&CancellationToken::new(), "member1", None)
            .await
            .unwrap();

        assert_eq!(score.health_score, 72.5);
        assert_eq!(score.reason, "healthy");
    }

    #[tokio::test]
    async fn test_target_appended_to_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/advisor/score"))
            .and(query_param("cluster", "member1"))
            .and(query_param("target", "member2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"healthScore": 90.0}"#),
            )
            .mount(&server)
            .await;

        let client = ScoreClient::new(&test_config(server.uri())).unwrap();
        let score = client
            .get_score(&CancellationToken::new(), "member1", Some("member2"))
            .await
            .unwrap();

        assert_eq!(score.health_score, 90.0);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_counts_attempts() {
        let server = start_failing_server(500).await;

        let client = ScoreClient::new(&test_config(server.uri())).unwrap();
        let started = Instant::now();
        let err = client
            .get_score(&CancellationToken::new(), "member1", None)
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, ClientError::Response { status: 500, .. }));
        // retry=1 means exactly two attempts with one backoff between them
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_transport_error_retried() {
        // an unpooled server actually stops listening when dropped; the
        // pooled `MockServer::start()` keeps the port alive and answers 404
        let server = MockServer::builder().start().await;
        let uri = server.uri();
        // nothing listens here after the server is dropped
        drop(server);

        let client = ScoreClient::new(&test_config(uri)).unwrap();
        let err = client
            .get_score(&CancellationToken::new(), "member1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/advisor/score"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a score"))
            .mount(&server)
            .await;

        let client = ScoreClient::new(&test_config(server.uri())).unwrap();
        let err = client
            .get_score(&CancellationToken::new(), "member1", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Decode(_)));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_backoff() {
        let server = start_failing_server(503).await;

        let mut config = test_config(server.uri());
        config.backoff = Duration::from_secs(5);
        let client = ScoreClient::new(&config).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = client.get_score(&cancel, "member1", None).await.unwrap_err();

        assert!(matches!(err, ClientError::Cancelled));
        // returned as soon as the token fired, not after the full backoff
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}

//! Where the rate sheet comes from.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::error::FetchError;

/// Retrieves the raw rate sheet document.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short description used in logs (usually the URL).
    fn describe(&self) -> &str;

    /// Downloads the current document.
    async fn fetch_document(&self) -> Result<String, FetchError>;
}

/// Rate sheet served over HTTP.
///
/// Holds one pooled client for the lifetime of the process; every request
/// is bounded by the timeout given at construction.
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    url: String,
}

impl HttpRateSource {
    /// Creates a source for `url` with a per-request `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kur/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    fn describe(&self) -> &str {
        &self.url
    }

    async fn fetch_document(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "Requesting rate sheet");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one connection: reads the request, then writes `reply` if any.
    /// Without a reply the connection is held open and never answered.
    async fn one_shot_server(reply: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0_u8; 1024];
            let _ = socket.read(&mut buf).await;
            match reply {
                Some(reply) => {
                    socket.write_all(reply.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                }
                None => tokio::time::sleep(Duration::from_secs(30)).await,
            }
        });

        format!("http://{addr}/today.xml")
    }

    #[test]
    fn test_describe_is_url() {
        let source =
            HttpRateSource::new("https://example.invalid/today.xml", Duration::from_secs(5))
                .unwrap();
        assert_eq!(source.describe(), "https://example.invalid/today.xml");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 1 on loopback refuses connections.
        let source = HttpRateSource::new("http://127.0.0.1:1/today.xml", Duration::from_secs(2))
            .unwrap();

        let err = source.fetch_document().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let url = one_shot_server(Some(
            "HTTP/1.1 200 OK\r\ncontent-type: application/xml\r\ncontent-length: 14\r\nconnection: close\r\n\r\n<Tarih_Date/>\n",
        ))
        .await;
        let source = HttpRateSource::new(url, Duration::from_secs(5)).unwrap();

        let body = source.fetch_document().await.unwrap();
        assert_eq!(body, "<Tarih_Date/>\n");
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let url = one_shot_server(Some(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        ))
        .await;
        let source = HttpRateSource::new(url, Duration::from_secs(5)).unwrap();

        let err = source.fetch_document().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_silent_server_hits_timeout() {
        let url = one_shot_server(None).await;
        let source = HttpRateSource::new(url, Duration::from_millis(200)).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), source.fetch_document())
            .await
            .expect("request should give up on its own timeout");
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
    }
}

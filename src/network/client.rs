//! Default HTTP(S) transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::submission::{CancelScope, Method};
use crate::utils::error::NetworkError;
use crate::utils::Result;

use super::{NavigationRequest, Response, Transport};

/// HTTP transport backed by a pooled reqwest client
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("Formix/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: NavigationRequest, scope: CancelScope) -> Result<Response> {
        match request.url.scheme() {
            "http" | "https" => {}
            other => return Err(NetworkError::UnsupportedScheme(other.to_string()).into()),
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.clone());
        if let Some(mime) = &request.mime {
            builder = builder.header(CONTENT_TYPE, mime);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let send = async {
            let response = builder
                .send()
                .await
                .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

            let status = response.status().as_u16();
            let mime = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("text/html")
                .to_string();
            let url = response.url().to_string();
            let body = response
                .bytes()
                .await
                .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?
                .to_vec();

            Ok::<Response, NetworkError>(Response { url, status, mime, body })
        };

        tokio::select! {
            _ = scope.cancelled() => Err(NetworkError::Cancelled.into()),
            result = send => result.map_err(Into::into),
        }
    }
}

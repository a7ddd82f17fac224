use anyhow::Result;
use std::collections::HashMap;

/// Methods the relay issues against Twitch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

/// Status and body of a finished request
#[derive(Debug, Clone)]
pub struct SimpleHttpResponse {
    status_code: u16,
    body: String,
}

impl SimpleHttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status_code: status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status_code
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Outbound HTTP seam, swapped for a recording mock in tests
///
/// Query parameters are ordered pairs so repeated keys (`id=1&id=2`)
/// survive. Requests never carry a body: POST parameters travel in the
/// query string like Twitch's token endpoint expects.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(&str, &str)],
        headers: HashMap<String, String>,
    ) -> Result<SimpleHttpResponse>;

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HashMap<String, String>,
    ) -> Result<SimpleHttpResponse> {
        self.send(HttpMethod::GET, url, query, headers).await
    }

    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        headers: HashMap<String, String>,
    ) -> Result<SimpleHttpResponse> {
        self.send(HttpMethod::POST, url, query, headers).await
    }
}

/// `HttpClient` backed by a shared reqwest connection pool
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        method: HttpMethod,
        url: &str,
        query: &[(&str, &str)],
        headers: HashMap<String, String>,
    ) -> Result<SimpleHttpResponse> {
        let request = match method {
            HttpMethod::GET => self.client.get(url),
            HttpMethod::POST => self.client.post(url),
        };
        let request = headers
            .into_iter()
            .fold(request.query(query), |request, (key, value)| {
                request.header(key, value)
            });

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(SimpleHttpResponse::new(status, body))
    }
}

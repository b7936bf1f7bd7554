//! The HTTP seam between virtual users and the network.
use serde_json::Value;
use stroll_core::Method;
use thiserror::Error;
use url::Url;

/// Status of a completed HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
}

impl Response {
    /// 2xx and 3xx count as success.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not build request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// Anything able to issue a single HTTP call on behalf of a virtual user.
///
/// Implement [`HttpClient`] (the `Send` variant) to plug a custom transport into a
/// [`Run`](crate::Run). Errors are recorded against the run, never retried.
#[trait_variant::make(HttpClient: Send)]
pub trait LocalHttpClient {
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Response, ClientError>;
}

/// Default [`HttpClient`], backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpClient for ReqwestClient {
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Response, ClientError> {
        let mut request = self.client.request(reqwest_method(method), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let res = request.send().await?;
        let status = res.status().as_u16();
        // Drain the body so the connection can go back to the pool.
        res.bytes().await?;

        Ok(Response { status })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

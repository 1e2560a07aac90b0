//! Nutrition service client
//!
//! Both endpoints take a JSON body via POST. There are no retries and no
//! request timeout: a call that never completes leaves the caller's state as
//! it was.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    parse_search_items, CalculationRequest, CalculationResult, FoodItem, SearchPayloadError,
    SearchRequest,
};

/// Base URL of the public nutrition service
pub const DEFAULT_API_URL: &str = "https://www.nutritionall.xyz/api";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service responded with HTTP {0}")]
    Status(u16),

    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No results returned from the API.")]
    MalformedItems,
}

impl ApiError {
    /// The service answered, but the search body had no usable `items` list.
    ///
    /// This is the one failure the user is told about; everything else is
    /// logged and the previous state stays on screen.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, ApiError::MalformedItems)
    }
}

impl From<SearchPayloadError> for ApiError {
    fn from(err: SearchPayloadError) -> Self {
        match err {
            SearchPayloadError::MissingItems => ApiError::MalformedItems,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// The two remote operations the client depends on
#[async_trait]
pub trait NutritionApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<FoodItem>>;

    async fn calculate(&self, request: &CalculationRequest) -> ApiResult<CalculationResult>;
}

/// reqwest-backed implementation
#[derive(Clone)]
pub struct HttpNutritionApi {
    client: Client,
    base_url: String,
}

impl HttpNutritionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Reply> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "service answered with an error status");
        }
        Ok(Reply { status, body })
    }
}

/// Status and raw body of one service call
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

impl Reply {
    /// Any JSON body goes through the `items` check, whatever the status, so
    /// an error page from the service still reaches the user as a notice.
    /// Only a non-JSON error body is reported as a bare status.
    fn into_search_items(self) -> ApiResult<Vec<FoodItem>> {
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(value) => Ok(parse_search_items(value)?),
            Err(_) if !self.status.is_success() => Err(ApiError::Status(self.status.as_u16())),
            Err(e) => Err(ApiError::Decode(e)),
        }
    }

    fn into_calculation(self) -> ApiResult<CalculationResult> {
        if !self.status.is_success() {
            return Err(ApiError::Status(self.status.as_u16()));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

impl Default for HttpNutritionApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl NutritionApi for HttpNutritionApi {
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<FoodItem>> {
        self.post("search", request).await?.into_search_items()
    }

    async fn calculate(&self, request: &CalculationRequest) -> ApiResult<CalculationResult> {
        self.post("calculate", request).await?.into_calculation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let api = HttpNutritionApi::new("http://localhost:8080/api/");
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.endpoint("search"), "http://localhost:8080/api/search");

        let api = HttpNutritionApi::default();
        assert_eq!(api.endpoint("calculate"), "https://www.nutritionall.xyz/api/calculate");
    }

    #[test]
    fn test_payload_error_mapping() {
        let err: ApiError = SearchPayloadError::MissingItems.into();
        assert!(err.is_malformed_payload());
        assert_eq!(err.to_string(), "No results returned from the API.");
        assert!(!ApiError::Status(502).is_malformed_payload());
    }

    fn reply(status: u16, body: &str) -> Reply {
        Reply {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_search_error_status_with_json_body_is_a_notice() {
        let err = reply(500, r#"{"error": "search backend down"}"#)
            .into_search_items()
            .unwrap_err();
        assert!(err.is_malformed_payload());
    }

    #[test]
    fn test_search_error_status_with_html_body_is_a_status() {
        let err = reply(502, "<html>Bad Gateway</html>").into_search_items().unwrap_err();
        assert!(matches!(err, ApiError::Status(502)));
    }

    #[test]
    fn test_search_success_with_garbage_body_is_a_decode_error() {
        let err = reply(200, "not json").into_search_items().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_calculation_error_status_ignores_body() {
        let err = reply(500, r#"{"error": "boom"}"#).into_calculation().unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
    }

    /// Serve a single canned HTTP response on a local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Drain the request so closing the socket does not reset it
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    #[tokio::test]
    async fn test_search_500_with_json_error_raises_notice() {
        let base = serve_once("500 Internal Server Error", r#"{"error":"search backend down"}"#).await;
        let api = HttpNutritionApi::new(base);

        let err = api.search(&SearchRequest::for_query("oat")).await.unwrap_err();
        assert!(err.is_malformed_payload());
    }

    #[tokio::test]
    async fn test_search_reads_items_over_http() {
        let base = serve_once(
            "200 OK",
            r#"{"items":[{"id":1,"description":"Oats","energy_kcal":389},{"id":2,"description":null}]}"#,
        )
        .await;
        let api = HttpNutritionApi::new(base);

        let items = api.search(&SearchRequest::for_query("oat")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].energy_kcal, 389.0);
        assert_eq!(items[1].description, "");
    }
}

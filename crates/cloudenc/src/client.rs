//! HTTP client for the remote encoding API.
//!
//! One `CloudencClient` is constructed at process start and passed to
//! whichever component needs it; it owns a shared connection pool and
//! attaches authentication headers to every request.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::models::common::{ErrorEnvelope, ResponseEnvelope};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudenc.io/v1/";
const API_KEY_HEADER: &str = "X-Api-Key";
const TENANT_ORG_HEADER: &str = "X-Tenant-Org-Id";

#[derive(Debug, Clone)]
pub struct CloudencClient {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl CloudencClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> CloudencClientBuilder {
        CloudencClientBuilder {
            api_key: api_key.into(),
            tenant_org_id: None,
            base_url: None,
            http: None,
        }
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidBaseUrl(format!("{}{path}", self.base_url)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).headers(self.headers.clone())
    }

    /// POST a resource description; returns the stored resource (with its
    /// server-assigned id) unwrapped from the response envelope.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(path, "POST");
        let response = self
            .request(Method::POST, self.url(path)?)
            .json(body)
            .send()
            .await?;
        Self::unwrap_result(response).await
    }

    /// POST without a body, discarding any result payload. Used for start
    /// and stop calls whose response carries nothing the caller needs.
    pub(crate) async fn post_action(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "POST (action)");
        let response = self.request(Method::POST, self.url(path)?).send().await?;
        Self::unwrap_empty(response).await
    }

    /// POST with a body, discarding any result payload.
    pub(crate) async fn post_action_with<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(path, "POST (action)");
        let response = self
            .request(Method::POST, self.url(path)?)
            .json(body)
            .send()
            .await?;
        Self::unwrap_empty(response).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.request(Method::GET, self.url(path)?).send().await?;
        Self::unwrap_result(response).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!(path, "GET");
        let response = self
            .request(Method::GET, self.url(path)?)
            .query(query)
            .send()
            .await?;
        Self::unwrap_result(response).await
    }

    async fn unwrap_result<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;
        let envelope: ResponseEnvelope<T> = response.json().await?;
        envelope.data.result.ok_or(ApiError::MissingData {
            field: "data.result",
        })
    }

    async fn unwrap_empty(response: Response) -> Result<(), ApiError> {
        Self::check_status(response).await?;
        Ok(())
    }

    /// Map non-success responses to `ApiError::Api` when the service sent a
    /// structured error body, falling back to the transport error.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status_error = response.error_for_status_ref().err();
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => Err(ApiError::api(envelope.data.code, envelope.data.message)),
            // The early return guarantees a status error here; the decode
            // error only stands in if reqwest ever stops producing one.
            Err(decode_error) => Err(ApiError::from(status_error.unwrap_or(decode_error))),
        }
    }
}

pub struct CloudencClientBuilder {
    api_key: String,
    tenant_org_id: Option<String>,
    base_url: Option<String>,
    http: Option<Client>,
}

impl CloudencClientBuilder {
    /// Organisation to perform the encodings in, for multi-tenant accounts.
    pub fn tenant_org_id(mut self, tenant_org_id: impl Into<String>) -> Self {
        self.tenant_org_id = Some(tenant_org_id.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use a pre-configured `reqwest::Client` (proxies, timeouts).
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<CloudencClient, ApiError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        // A base URL without a trailing slash would drop its last path
        // segment on join().
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|_| ApiError::InvalidBaseUrl(normalized.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&self.api_key).map_err(|_| ApiError::InvalidHeader("api key"))?,
        );
        if let Some(org) = &self.tenant_org_id {
            headers.insert(
                TENANT_ORG_HEADER,
                HeaderValue::from_str(org).map_err(|_| ApiError::InvalidHeader("tenant org id"))?,
            );
        }

        Ok(CloudencClient {
            http: self.http.unwrap_or_default(),
            base_url,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = CloudencClient::builder("key")
            .base_url("https://api.example.com/v1")
            .build()
            .unwrap();
        assert_eq!(
            client.url("encoding/encodings").unwrap().as_str(),
            "https://api.example.com/v1/encoding/encodings"
        );
    }

    #[test]
    fn leading_slash_in_path_is_tolerated() {
        let client = CloudencClient::new("key").unwrap();
        assert_eq!(
            client.url("/encoding/inputs/http").unwrap().as_str(),
            format!("{DEFAULT_BASE_URL}encoding/inputs/http")
        );
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn successful_response_passes_through_check_status() {
        let checked = CloudencClient::check_status(response(200, "{}")).await;
        assert!(checked.is_ok());
    }

    #[tokio::test]
    async fn structured_error_body_maps_to_api_error() {
        let err = CloudencClient::check_status(response(
            409,
            r#"{"data":{"code":8004,"message":"Queue limit exceeded"}}"#,
        ))
        .await
        .unwrap_err();

        assert!(err.is_queue_limit_exceeded());
    }

    #[tokio::test]
    async fn unstructured_error_body_falls_back_to_the_status_error() {
        let err = CloudencClient::check_status(response(500, "Internal Server Error"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Http { .. }));
    }
}

use std::time::Duration;

use feed_logging::{feed_debug, feed_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::{decode_photos, FailureKind, NetworkError, Photo, PhotosEndpoint};

const ACCEPT_VERSION: &str = "accept-version";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// Access key sent as `Authorization: Client-ID <key>`.
    pub access_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            access_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Source of photo records for a given endpoint.
#[async_trait::async_trait]
pub trait PhotoService: Send + Sync {
    async fn fetch_photos(&self, endpoint: &PhotosEndpoint) -> Result<Vec<Photo>, NetworkError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPhotoService {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestPhotoService {
    pub fn new(settings: ApiSettings) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(default_headers(&settings)?)
            .build()
            .map_err(|err| NetworkError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn fetch_body(&self, endpoint: &PhotosEndpoint) -> Result<Vec<u8>, NetworkError> {
        let url = endpoint.url(&self.settings.base_url)?;
        feed_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !is_json(ct) {
                return Err(NetworkError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    format!("unsupported content type {ct}"),
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    fn too_large(&self, actual: Option<u64>) -> NetworkError {
        NetworkError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl PhotoService for ReqwestPhotoService {
    async fn fetch_photos(&self, endpoint: &PhotosEndpoint) -> Result<Vec<Photo>, NetworkError> {
        let result = match self.fetch_body(endpoint).await {
            Ok(bytes) => decode_photos(&bytes),
            Err(err) => Err(err),
        };
        match &result {
            Ok(photos) => feed_debug!(
                "order_by={} returned {} photos",
                endpoint.order_by(),
                photos.len()
            ),
            Err(err) => feed_warn!(
                "order_by={} failed ({}): {}",
                endpoint.order_by(),
                err.kind,
                err.message
            ),
        }
        result
    }
}

fn default_headers(settings: &ApiSettings) -> Result<HeaderMap, NetworkError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(ACCEPT_VERSION),
        HeaderValue::from_static("v1"),
    );
    if let Some(key) = settings.access_key.as_deref() {
        let mut value = HeaderValue::from_str(&format!("Client-ID {key}"))
            .map_err(|err| NetworkError::new(FailureKind::Network, err.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn is_json(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    ct.eq_ignore_ascii_case("application/json") || ct.to_ascii_lowercase().ends_with("+json")
}

fn map_reqwest_error(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        return NetworkError::new(FailureKind::Timeout, err.to_string());
    }
    NetworkError::new(FailureKind::Network, err.to_string())
}

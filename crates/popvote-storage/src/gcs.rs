use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use popvote_config::GcsConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{Generation, Object, ObjectStore, Result, StorageError};

const DEFAULT_BASE_URL: &str = "https://storage.googleapis.com";

/// Generation header set by GCS on media downloads
const GENERATION_HEADER: &str = "x-goog-generation";

/// Percent-encoding set for object names in URL paths
///
/// Everything outside the unreserved characters is encoded, slashes
/// included: `votes/images/a.png` becomes a single path segment.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Google Cloud Storage client over the JSON API
pub struct GcsStore {
    client: Client,
    bucket: String,
    base_url: String,
    access_token: Option<SecretString>,
}

impl GcsStore {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build
    pub fn new(config: &GcsConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build storage HTTP client: {e}"))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket,
            utf8_percent_encode(name, OBJECT_NAME)
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket)
    }

    fn list_url(&self) -> String {
        format!("{}/storage/v1/b/{}/o", self.base_url, self.bucket)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    async fn upload(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        generation: Option<Generation>,
    ) -> Result<()> {
        let mut query: Vec<(&str, String)> = vec![
            ("uploadType", "media".to_string()),
            ("name", name.to_string()),
        ];
        if let Some(generation) = generation {
            query.push(("ifGenerationMatch", generation.to_string()));
        }

        let response = self
            .authorize(self.client.post(self.upload_url()))
            .query(&query)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Connection(format!("upload of '{name}' failed: {e}")))?;

        let status = response.status();

        if status == reqwest::StatusCode::PRECONDITION_FAILED {
            return Err(StorageError::PreconditionFailed(name.to_string()));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            tracing::error!(object = %name, status = %status, "storage upload error");
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// One page of an object listing
#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ListEntry>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ListEntry {
    name: String,
}

#[async_trait::async_trait]
impl ObjectStore for GcsStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self
            .authorize(self.client.get(self.object_url(name)))
            .send()
            .await
            .map_err(|e| StorageError::Connection(format!("metadata fetch for '{name}' failed: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => {
                let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
                Err(StorageError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn get(&self, name: &str) -> Result<Option<Object>> {
        let response = self
            .authorize(self.client.get(self.object_url(name)))
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| StorageError::Connection(format!("download of '{name}' failed: {e}")))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generation = response
            .headers()
            .get(GENERATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<Generation>().ok())
            .ok_or_else(|| StorageError::MissingGeneration(name.to_string()))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = response
            .bytes()
            .await
            .map_err(|e| StorageError::Connection(format!("reading body of '{name}' failed: {e}")))?
            .to_vec();

        Ok(Some(Object {
            data,
            content_type,
            generation,
        }))
    }

    async fn put(&self, name: &str, data: Vec<u8>, content_type: &str) -> Result<()> {
        self.upload(name, data, content_type, None).await
    }

    async fn put_if_generation(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
        generation: Generation,
    ) -> Result<()> {
        self.upload(name, data, content_type, Some(generation)).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("prefix", prefix.to_string())];
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .authorize(self.client.get(self.list_url()))
                .query(&query)
                .send()
                .await
                .map_err(|e| StorageError::Connection(format!("listing '{prefix}' failed: {e}")))?;

            let status = response.status();

            if !status.is_success() {
                let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
                return Err(StorageError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| StorageError::Connection(format!("parsing listing of '{prefix}' failed: {e}")))?;

            names.extend(page.items.into_iter().map(|entry| entry.name));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }
}

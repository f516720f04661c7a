use super::types::UploadResponse;
use super::ImageHostService;
use crate::models::{EncodedPayload, HostedImageUrl, DEFAULT_IMGBB_BASE_URL};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

const UPLOAD_PATH: &str = "/1/upload";

pub struct ImgbbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ImgbbClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_IMGBB_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ImageHostService for ImgbbClient {
    async fn upload(&self, payload: &EncodedPayload) -> Result<HostedImageUrl> {
        let url = format!("{}{}", self.base_url, UPLOAD_PATH);
        tracing::debug!("Uploading image to imgbb ({} base64 chars)", payload.len());

        let response = self
            .client
            .post(&url)
            .form(&[("key", self.api_key.as_str()), ("image", payload.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to imgbb: {}", e);
                Error::Upload(format!("Failed to reach imgbb: {}", e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("imgbb API error (status {}): {}", status, error_text);
            return Err(Error::Upload(format!(
                "Failed to upload image to imgbb (status {})",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read imgbb response: {}", e);
            Error::Upload(format!("Failed to read imgbb response: {}", e))
        })?;
        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse imgbb response: {}\nBody: {}", e, body);
            Error::Upload(format!("Failed to parse imgbb response: {}", e))
        })?;

        let hosted = HostedImageUrl::new(parsed.data.url)?;
        tracing::info!("Image hosted at {}", hosted);
        Ok(hosted)
    }
}

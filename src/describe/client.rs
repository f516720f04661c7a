use super::stream::{collect_description, records};
use super::types::RunRequest;
use super::DescriptionService;
use crate::models::{
    Description, HostedImageUrl, DEFAULT_WORDWARE_APP_ID, DEFAULT_WORDWARE_BASE_URL,
};
use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::{Client, StatusCode};

/// Client for a released Wordware app that turns an image URL into alt text.
pub struct WordwareClient {
    client: Client,
    api_key: String,
    app_id: String,
    base_url: String,
}

impl WordwareClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            app_id: DEFAULT_WORDWARE_APP_ID.to_string(),
            base_url: DEFAULT_WORDWARE_BASE_URL.to_string(),
        }
    }

    pub fn with_app_id(mut self, app_id: String) -> Self {
        self.app_id = app_id;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn run_url(&self) -> String {
        format!("{}/api/released-app/{}/run", self.base_url, self.app_id)
    }
}

#[async_trait]
impl DescriptionService for WordwareClient {
    async fn describe(&self, image_url: &HostedImageUrl) -> Result<Description> {
        tracing::debug!("Requesting alt text from Wordware app {}", self.app_id);

        let response = self
            .client
            .post(self.run_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&RunRequest::for_image(image_url.as_str()))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Wordware: {}", e);
                Error::Generation(format!("Failed to reach Wordware: {}", e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Wordware API error (status {}): {}", status, error_text);
            return Err(Error::Generation(format!(
                "Wordware API returned status {}",
                status
            )));
        }

        let body = response.bytes_stream().map_err(std::io::Error::other);
        let description = collect_description(records(body)).await?;

        tracing::info!(
            "Generated alt text ({} chars): {}",
            description.as_str().len(),
            description
        );
        Ok(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_APP_ID: &str = "test-app";
    const RUN_PATH: &str = "/api/released-app/test-app/run";

    fn make_client(server: &MockServer, api_key: &str) -> WordwareClient {
        WordwareClient::new(api_key.to_string())
            .with_app_id(TEST_APP_ID.to_string())
            .with_base_url(server.uri())
    }

    fn image_url() -> HostedImageUrl {
        HostedImageUrl::new("http://x/y.png").unwrap()
    }

    fn ndjson(lines: &[&str]) -> String {
        let mut body = lines.join("\n");
        body.push('\n');
        body
    }

    #[tokio::test]
    async fn test_describe_concatenates_streamed_chunks() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RUN_PATH))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(serde_json::json!({
                "inputs": {"image": {"type": "image", "image_url": "http://x/y.png"}},
                "version": "^1.0"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(ndjson(&[
                r#"{"type":"chunk","value":{"type":"generation","state":"start"}}"#,
                r#"{"value":{"type":"chunk","value":"A cat"}}"#,
                r#"{"value":{"type":"chunk","value":" sitting."}}"#,
                r#"{"value":{"type":"generation","state":"done"}}"#,
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key");

        let description = client.describe(&image_url()).await.unwrap();
        assert_eq!(description.as_str(), "A cat sitting.");
    }

    #[tokio::test]
    async fn test_describe_without_chunks_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RUN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(ndjson(&[
                r#"{"value":{"type":"generation","state":"start"}}"#,
                r#"{"value":{"type":"outputs","values":{}}}"#,
            ])))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key");

        let err = client.describe(&image_url()).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[tokio::test]
    async fn test_describe_non_200_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RUN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = make_client(&server, "bad-key");

        let err = client.describe(&image_url()).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[tokio::test]
    async fn test_describe_malformed_record_is_generation_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RUN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(ndjson(&[
                r#"{"value":{"type":"chunk","value":"A cat"}}"#,
                r#"{"value":{"type":"chunk","#,
            ])))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key");

        let err = client.describe(&image_url()).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_run_url_uses_app_id() {
        let client = WordwareClient::new("k".to_string())
            .with_app_id("abc".to_string())
            .with_base_url("https://example.test/".to_string());

        assert_eq!(
            client.run_url(),
            "https://example.test/api/released-app/abc/run"
        );
    }

    #[tokio::test]
    async fn test_describe_unreachable_service_is_generation_error() {
        let client = WordwareClient::new("test-key".to_string())
            .with_app_id(TEST_APP_ID.to_string())
            .with_base_url("http://127.0.0.1:1".to_string());

        let err = client.describe(&image_url()).await.unwrap_err();

        assert!(matches!(err, Error::Generation(_)));
        assert!(err
            .to_string()
            .starts_with("Description generation failed: Failed to reach Wordware"));
    }
}

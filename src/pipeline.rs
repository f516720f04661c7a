//! Pipeline orchestration: encode, upload to the image host, generate alt text.

use crate::describe::{DescriptionService, MockDescriber, WordwareClient};
use crate::hosting::{ImageHostService, ImgbbClient, MockImageHost};
use crate::image::{ImageEncoder, UploadedImage};
use crate::models::{Config, Description};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

/// Step of the pipeline a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Encode,
    Upload,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Encode => "encode",
            Stage::Upload => "upload",
            Stage::Generate => "generate",
        };
        f.write_str(label)
    }
}

/// A pipeline run that stopped early.
#[derive(Debug, thiserror::Error)]
#[error("pipeline stopped at {stage} stage: {source}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineFailure {
    fn at(stage: Stage) -> impl FnOnce(Error) -> Self {
        move |source| {
            error!("Pipeline stopped at {} stage: {}", stage, source);
            Self { stage, source }
        }
    }
}

/// Coordinates the encoder and the two remote services for one upload.
pub struct Pipeline {
    encoder: ImageEncoder,
    host: Box<dyn ImageHostService>,
    describer: Box<dyn DescriptionService>,
}

/// Injectable service bundle used to construct [`Pipeline`] in tests/harnesses.
pub struct PipelineServices {
    pub host: Box<dyn ImageHostService>,
    pub describer: Box<dyn DescriptionService>,
}

impl Pipeline {
    pub fn with_services(services: PipelineServices) -> Self {
        Self {
            encoder: ImageEncoder::new(),
            host: services.host,
            describer: services.describer,
        }
    }

    /// Build a pipeline from configuration, sharing one HTTP connection pool.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.dry_run {
            info!("DRY_RUN enabled, using in-memory image host and describer");
            return Ok(Self::with_services(PipelineServices {
                host: Box::new(MockImageHost::new()),
                describer: Box::new(MockDescriber::new()),
            }));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!(
            "Image host: {} | Describer: {} (app {})",
            config.imgbb_base_url, config.wordware_base_url, config.wordware_app_id
        );

        Ok(Self::with_services(PipelineServices {
            host: Box::new(
                ImgbbClient::new_with_client(config.imgbb_api_key.clone(), http_client.clone())
                    .with_base_url(config.imgbb_base_url.clone()),
            ),
            describer: Box::new(
                WordwareClient::new_with_client(config.wordware_api_key.clone(), http_client)
                    .with_app_id(config.wordware_app_id.clone())
                    .with_base_url(config.wordware_base_url.clone()),
            ),
        }))
    }

    /// Run encode, upload and generate in order, stopping at the first failure.
    pub async fn run(
        &self,
        upload: Arc<UploadedImage>,
    ) -> std::result::Result<Description, PipelineFailure> {
        let span = tracing::info_span!("pipeline", run_id = %Uuid::new_v4());

        async move {
            let (width, height) = upload.dimensions();
            info!(
                "Processing {} ({}x{})",
                upload.file_name().unwrap_or("upload"),
                width,
                height
            );

            let payload = self
                .encoder
                .encode(upload)
                .await
                .map_err(PipelineFailure::at(Stage::Encode))?;

            let hosted = self
                .host
                .upload(&payload)
                .await
                .map_err(PipelineFailure::at(Stage::Upload))?;
            drop(payload);

            let description = self
                .describer
                .describe(&hosted)
                .await
                .map_err(PipelineFailure::at(Stage::Generate))?;

            info!("Alt text generation complete");
            Ok(description)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::test_images;

    fn upload() -> Arc<UploadedImage> {
        Arc::new(
            UploadedImage::decode(Some("photo.jpg".to_string()), test_images::jpeg(12, 9))
                .unwrap(),
        )
    }

    fn build(host: MockImageHost, describer: MockDescriber) -> Pipeline {
        Pipeline::with_services(PipelineServices {
            host: Box::new(host),
            describer: Box::new(describer),
        })
    }

    #[tokio::test]
    async fn test_run_passes_hosted_url_to_describer() {
        let host = MockImageHost::new().with_url_response("http://x/y.png".to_string());
        let describer = MockDescriber::new()
            .with_description_response("Red bicycle leaning against a wall.".to_string());
        let host_spy = host.clone();
        let describer_spy = describer.clone();

        let description = build(host, describer).run(upload()).await.unwrap();

        assert_eq!(description.as_str(), "Red bicycle leaning against a wall.");
        assert_eq!(describer_spy.get_requested_urls(), vec!["http://x/y.png"]);

        let uploads = host_spy.get_uploads();
        assert_eq!(uploads.len(), 1);
        assert!(!uploads[0].is_empty());
    }

    #[tokio::test]
    async fn test_upload_failure_skips_describer() {
        let host = MockImageHost::new().with_failure(true);
        let describer = MockDescriber::new();
        let describer_spy = describer.clone();

        let failure = build(host, describer).run(upload()).await.unwrap_err();

        assert_eq!(failure.stage, Stage::Upload);
        assert!(matches!(failure.source, Error::Upload(_)));
        assert_eq!(describer_spy.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_is_reported_at_generate_stage() {
        let failure = build(MockImageHost::new(), MockDescriber::new().with_failure(true))
            .run(upload())
            .await
            .unwrap_err();

        assert_eq!(failure.stage, Stage::Generate);
        assert_eq!(
            failure.to_string(),
            "pipeline stopped at generate stage: Description generation failed: \
             Wordware API returned status 500 Internal Server Error"
        );
    }

    #[test]
    fn test_from_config_dry_run_builds_mocks() {
        let config = Config {
            dry_run: true,
            ..Config::default()
        };
        assert!(Pipeline::from_config(&config).is_ok());
    }

    #[test]
    fn test_from_config_builds_real_clients() {
        assert!(Pipeline::from_config(&Config::default()).is_ok());
    }
}

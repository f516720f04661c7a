//! Single-session view state.
//!
//! `Idle -> ImageLoaded -> Processing -> ImageLoaded`. Only one pipeline run
//! may be in flight; a new image cannot replace one that is being processed.

use crate::image::UploadedImage;
use crate::models::Description;
use crate::pipeline::{PipelineFailure, Stage};
use crate::{Error, Result};
use std::sync::Arc;

/// Result of the last pipeline run for the loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Description),
    Failure { stage: Stage, message: String },
}

impl From<std::result::Result<Description, PipelineFailure>> for Outcome {
    fn from(result: std::result::Result<Description, PipelineFailure>) -> Self {
        match result {
            Ok(description) => Outcome::Success(description),
            Err(failure) => Outcome::Failure {
                stage: failure.stage,
                message: failure.source.to_string(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub enum ViewState {
    #[default]
    Idle,
    ImageLoaded {
        image: Arc<UploadedImage>,
        outcome: Option<Outcome>,
    },
    Processing {
        image: Arc<UploadedImage>,
    },
}

#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    revision: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Bumped on every image change; used to bust the preview cache.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn image(&self) -> Option<&Arc<UploadedImage>> {
        match &self.state {
            ViewState::Idle => None,
            ViewState::ImageLoaded { image, .. } | ViewState::Processing { image } => Some(image),
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, ViewState::Processing { .. })
    }

    /// Select a new image, discarding any previous result.
    pub fn load_image(&mut self, image: UploadedImage) -> Result<()> {
        if self.is_processing() {
            return Err(Error::Busy);
        }
        self.state = ViewState::ImageLoaded {
            image: Arc::new(image),
            outcome: None,
        };
        self.revision += 1;
        Ok(())
    }

    /// Start a run for the loaded image.
    pub fn begin(&mut self) -> Result<Arc<UploadedImage>> {
        let image = match &self.state {
            ViewState::Idle => return Err(Error::NoImage),
            ViewState::Processing { .. } => return Err(Error::Busy),
            ViewState::ImageLoaded { image, .. } => Arc::clone(image),
        };
        self.state = ViewState::Processing {
            image: Arc::clone(&image),
        };
        Ok(image)
    }

    /// Record the outcome of the in-flight run.
    pub fn finish(&mut self, outcome: Outcome) -> Result<()> {
        let image = match &self.state {
            ViewState::Processing { image } => Arc::clone(image),
            _ => {
                return Err(Error::Invariant(
                    "finish called without a run in flight".to_string(),
                ))
            }
        };
        self.state = ViewState::ImageLoaded {
            image,
            outcome: Some(outcome),
        };
        Ok(())
    }
}

//! Alt text generation
//!
//! Sends a hosted image URL to a released Wordware app and assembles the
//! streamed JSON-lines response into a single description.

pub mod client;
pub mod mock;
pub mod stream;
pub mod types;

pub use client::WordwareClient;
pub use mock::MockDescriber;

use crate::models::{Description, HostedImageUrl};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DescriptionService: Send + Sync {
    async fn describe(&self, image_url: &HostedImageUrl) -> Result<Description>;
}

//! Image hosting integration
//!
//! Uploads base64-encoded images to imgbb so the description service can
//! fetch them from a public URL.

pub mod client;
pub mod mock;
pub mod types;

pub use client::ImgbbClient;
pub use mock::MockImageHost;

use crate::models::{EncodedPayload, HostedImageUrl};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageHostService: Send + Sync {
    async fn upload(&self, payload: &EncodedPayload) -> Result<HostedImageUrl>;
}

//! imgbb response payloads.

use serde::Deserialize;

/// Top-level upload response. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub data: UploadData,
}

#[derive(Debug, Deserialize)]
pub struct UploadData {
    pub url: String,
}

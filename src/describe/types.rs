//! Wordware request/response payloads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const APP_VERSION: &str = "^1.0";
pub const CHUNK_RECORD_TYPE: &str = "chunk";

/// Request body for a released-app run.
#[derive(Debug, Serialize)]
pub struct RunRequest<'a> {
    pub inputs: RunInputs<'a>,
    pub version: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RunInputs<'a> {
    pub image: ImageInput<'a>,
}

#[derive(Debug, Serialize)]
pub struct ImageInput<'a> {
    #[serde(rename = "type")]
    pub input_type: &'a str,
    pub image_url: &'a str,
}

impl<'a> RunRequest<'a> {
    pub fn for_image(image_url: &'a str) -> Self {
        Self {
            inputs: RunInputs {
                image: ImageInput {
                    input_type: "image",
                    image_url,
                },
            },
            version: APP_VERSION,
        }
    }
}

/// One line of the streamed run output.
///
/// Records carry many event shapes; only `{"value": {"type": "chunk", ...}}`
/// contributes text, so the payload is kept loosely typed.
#[derive(Debug, Deserialize)]
pub struct StreamRecord {
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl StreamRecord {
    /// Text fragment of a chunk record, `None` for every other record.
    pub fn chunk_text(&self) -> Result<Option<&str>> {
        let Some(value) = self.value.as_ref().and_then(|v| v.as_object()) else {
            return Ok(None);
        };
        if value.get("type").and_then(|t| t.as_str()) != Some(CHUNK_RECORD_TYPE) {
            return Ok(None);
        }

        value
            .get("value")
            .and_then(|v| v.as_str())
            .map(Some)
            .ok_or_else(|| {
                Error::Generation("Chunk record is missing its text value".to_string())
            })
    }
}

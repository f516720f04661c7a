use super::ImageHostService;
use crate::models::{EncodedPayload, HostedImageUrl};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockImageHost {
    url_responses: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
    uploads: Arc<Mutex<Vec<EncodedPayload>>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self {
            url_responses: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
            uploads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_url_response(self, url: String) -> Self {
        self.url_responses.lock().unwrap().push(url);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_uploads(&self) -> Vec<EncodedPayload> {
        self.uploads.lock().unwrap().clone()
    }
}

impl Default for MockImageHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageHostService for MockImageHost {
    async fn upload(&self, payload: &EncodedPayload) -> Result<HostedImageUrl> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.uploads.lock().unwrap().push(payload.clone());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Upload(
                "Failed to upload image to imgbb (status 400 Bad Request)".to_string(),
            ));
        }

        let responses = self.url_responses.lock().unwrap();
        if responses.is_empty() {
            HostedImageUrl::new(format!("https://i.ibb.co/mock/{}.png", *count))
        } else {
            let index = (*count - 1) % responses.len();
            HostedImageUrl::new(responses[index].clone())
        }
    }
}

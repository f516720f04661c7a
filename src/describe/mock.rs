use super::DescriptionService;
use crate::models::{Description, HostedImageUrl};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockDescriber {
    description_responses: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
    requested_urls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockDescriber {
    pub fn new() -> Self {
        Self {
            description_responses: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
            requested_urls: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    pub fn with_description_response(self, description: String) -> Self {
        self.description_responses.lock().unwrap().push(description);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    /// Sleep this long before answering, to simulate a slow service.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn get_requested_urls(&self) -> Vec<String> {
        self.requested_urls.lock().unwrap().clone()
    }
}

impl Default for MockDescriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DescriptionService for MockDescriber {
    async fn describe(&self, image_url: &HostedImageUrl) -> Result<Description> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.requested_urls
            .lock()
            .unwrap()
            .push(image_url.as_str().to_string());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Generation(
                "Wordware API returned status 500 Internal Server Error".to_string(),
            ));
        }

        let responses = self.description_responses.lock().unwrap();
        if responses.is_empty() {
            Description::new(format!("A placeholder description of {}", image_url))
        } else {
            let index = (*count - 1) % responses.len();
            Description::new(responses[index].clone())
        }
    }
}

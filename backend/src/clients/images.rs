//! Image generation via the DeepAI text2img API

use crate::clients::ApiResponseError;
use crate::config::ImageConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// DeepAI text2img response
#[derive(Debug, Deserialize)]
struct Text2ImgResponse {
    output_url: String,
}

/// DeepAI image generation client
#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl ImageClient {
    pub fn new(config: &ImageConfig) -> Self {
        // Image generation is slow; allow a generous timeout.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Whether the client has credentials to call the API
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate an image from a text prompt, returning its URL
    pub async fn generate_image(&self, prompt: &str) -> Result<String, ApiResponseError> {
        debug!("Generating image for prompt '{}'", prompt.get(..40).unwrap_or(prompt));

        let mut request = self
            .http
            .post(format!("{}/api/text2img", self.api_url))
            .form(&[("text", prompt)]);
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiResponseError::Status(response.status()));
        }

        let parsed: Text2ImgResponse = response.json().await.map_err(ApiResponseError::Parse)?;
        Ok(parsed.output_url)
    }
}

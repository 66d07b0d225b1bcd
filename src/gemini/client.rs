use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::{Error, Result, config::GeminiConfig, credential::Credential};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!(
            "Calling generateContent on model {} with {} content blocks",
            model,
            request.contents.len()
        );

        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", credential.expose())])
            .json(request)
            .send()
            .await
            // The URL carries the key in its query string
            .map_err(|e| Error::Network(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::generation(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.without_url()))?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&body)?;

        debug!(
            "Model {} returned {} candidates",
            model,
            parsed.candidates.len()
        );

        Ok(parsed)
    }
}

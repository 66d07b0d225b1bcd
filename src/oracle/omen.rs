use super::prompts::omen_prompt;
use crate::{
    Result,
    credential::Credential,
    gemini::{GenerateContentRequest, GenerativeClient},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Shown when the model answers without any text.
pub const FALLBACK_OMEN: &str = "The cosmic patterns remain silent today...";

pub struct OmenGenerator {
    client: Arc<dyn GenerativeClient>,
    model: String,
}

impl OmenGenerator {
    pub fn new(client: Arc<dyn GenerativeClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Turns a trimmed, non-empty seed into a micro-omen.
    ///
    /// HTTP and transport failures propagate. A response that simply lacks
    /// text yields [`FALLBACK_OMEN`].
    pub async fn generate(&self, seed: &str, credential: &Credential) -> Result<String> {
        debug!("Generating micro-omen for seed: {}", seed);

        let request = GenerateContentRequest::prompt(omen_prompt(seed));
        let response = self
            .client
            .generate_content(&self.model, credential, &request)
            .await?;

        match response.first_text() {
            Some(text) => {
                info!("Generated omen: {}", text);
                Ok(text.to_string())
            }
            None => {
                info!("Omen response carried no text, using fallback");
                Ok(FALLBACK_OMEN.to_string())
            }
        }
    }
}

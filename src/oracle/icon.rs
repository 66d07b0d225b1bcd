use super::prompts::icon_prompt;
use crate::{
    credential::Credential,
    gemini::{GenerateContentRequest, GenerativeClient, Modality},
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::{debug, warn};

const DEFAULT_MIME_TYPE: &str = "image/png";

/// A displayable `data:` URI holding a base64 image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(String);

impl Icon {
    pub fn from_base64(mime_type: Option<&str>, data: &str) -> Self {
        let mime_type = mime_type
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE);
        Self(format!("data:{mime_type};base64,{data}"))
    }

    pub fn data_uri(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct IconGenerator {
    client: Arc<dyn GenerativeClient>,
    model: String,
}

impl IconGenerator {
    pub fn new(client: Arc<dyn GenerativeClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Best effort: every failure is logged and reported as `None`, the same
    /// as a response that simply has no image in it.
    pub async fn generate(&self, omen: &str, credential: &Credential) -> Option<Icon> {
        let request = GenerateContentRequest::prompt(icon_prompt(omen))
            .with_modalities(vec![Modality::Image, Modality::Text]);

        let response = match self
            .client
            .generate_content(&self.model, credential, &request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Icon generation failed, continuing with text omen only: {}", e);
                return None;
            }
        };

        match response.first_inline_data() {
            Some(inline) => {
                debug!("Generated symbolic icon ({} base64 bytes)", inline.data.len());
                Some(Icon::from_base64(inline.mime_type.as_deref(), &inline.data))
            }
            None => {
                debug!("Icon response carried no inline image");
                None
            }
        }
    }
}

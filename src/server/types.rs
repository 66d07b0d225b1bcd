use crate::{
    divination::{DivinationOutcome, SessionState},
    notify::Notice,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DivineRequest {
    #[serde(default)]
    pub seed: String,
}

#[derive(Debug, Serialize)]
pub struct DivineResponse {
    #[serde(flatten)]
    pub outcome: DivinationOutcome,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialRequest {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub saved: bool,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: SessionState,
    pub has_credential: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedForm {
    #[serde(default)]
    pub seed: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialForm {
    #[serde(default)]
    pub api_key: String,
}

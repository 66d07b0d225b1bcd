use super::storage::KeyValueStorage;
use std::{fmt, sync::Arc};
use tracing::{info, warn};

/// Storage key the API key lives under.
pub const CREDENTIAL_KEY: &str = "gemini-api-key";

/// An API access token. Never empty, never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trims `value`; `None` if nothing is left.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Owns the single persisted credential.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The persisted credential, if one was ever saved.
    pub async fn load(&self) -> Option<Credential> {
        match self.storage.get(CREDENTIAL_KEY).await {
            Ok(value) => value.and_then(Credential::new),
            Err(e) => {
                warn!("Failed to read credential: {}", e);
                None
            }
        }
    }

    /// Persists the trimmed `value`. Returns false without touching storage
    /// when nothing is left after trimming.
    pub async fn save(&self, value: &str) -> bool {
        let Some(credential) = Credential::new(value) else {
            return false;
        };

        if let Err(e) = self.storage.set(CREDENTIAL_KEY, credential.expose()).await {
            warn!("Failed to persist credential: {}", e);
        } else {
            info!("Credential saved");
        }
        true
    }
}

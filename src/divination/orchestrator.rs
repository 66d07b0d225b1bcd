use super::fsm::{DivinationEvent, DivinationStateMachine};
use crate::{
    Result,
    config::GeminiConfig,
    credential::CredentialStore,
    gemini::GenerativeClient,
    notify::{Notice, Notifier},
    oracle::{Icon, IconGenerator, OmenGenerator},
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{Instrument, error, info, info_span};

pub const MISSING_CREDENTIAL_NOTICE: &str = "Please provide your Google API key first";
pub const MISSING_SEED_NOTICE: &str = "Please provide a seed of serendipity";
pub const DISRUPTED_NOTICE: &str =
    "The cosmic energies are disrupted. Please check your API key and try again.";
pub const SPOKEN_NOTICE: &str = "The patterns have spoken...";
pub const CREDENTIAL_SAVED_NOTICE: &str = "API key saved securely";

/// What the presentation layer renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub seed: String,
    pub omen: Option<String>,
    pub icon: Option<Icon>,
    pub is_loading: bool,
    pub show_credential_form: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DivinationOutcome {
    Completed { omen: String, icon: Option<Icon> },
    MissingCredential,
    MissingSeed,
    Failed,
}

pub struct Diviner {
    credentials: CredentialStore,
    omens: OmenGenerator,
    icons: IconGenerator,
    notifier: Arc<dyn Notifier>,
    session: Mutex<SessionState>,
}

impl Diviner {
    pub fn new(
        config: &GeminiConfig,
        client: Arc<dyn GenerativeClient>,
        credentials: CredentialStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        info!(
            "Initializing diviner with text model {} and image model {}",
            config.text_model, config.image_model
        );

        Self {
            credentials,
            omens: OmenGenerator::new(client.clone(), config.text_model.clone()),
            icons: IconGenerator::new(client, config.image_model.clone()),
            notifier,
            session: Mutex::new(SessionState::default()),
        }
    }

    pub fn session(&self) -> SessionState {
        self.lock_session().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_session().is_loading
    }

    pub async fn has_credential(&self) -> bool {
        self.credentials.load().await.is_some()
    }

    pub fn show_credential_form(&self) {
        self.lock_session().show_credential_form = true;
    }

    /// Saves the trimmed key, closes the form and confirms to the user.
    /// Blank input changes nothing.
    pub async fn save_credential(&self, value: &str) -> bool {
        if !self.credentials.save(value).await {
            return false;
        }

        self.lock_session().show_credential_form = false;
        self.notifier.notify(Notice::success(CREDENTIAL_SAVED_NOTICE));
        true
    }

    /// Runs one seed → omen → icon divination.
    ///
    /// Guard failures and a failed omen call are reported through the
    /// outcome and the notifier. `Err` means the flow itself misbehaved.
    pub async fn divine(&self, seed: &str) -> Result<DivinationOutcome> {
        let mut fsm = DivinationStateMachine::new(seed.trim());
        let span = info_span!("divination", id = %fsm.context.id);

        self.run(&mut fsm, seed).instrument(span).await
    }

    async fn run(
        &self,
        fsm: &mut DivinationStateMachine,
        raw_seed: &str,
    ) -> Result<DivinationOutcome> {
        fsm.transition(DivinationEvent::Submit)?;
        self.lock_session().seed = raw_seed.to_string();

        let Some(credential) = self.credentials.load().await else {
            self.lock_session().show_credential_form = true;
            self.notifier.notify(Notice::error(MISSING_CREDENTIAL_NOTICE));
            fsm.transition(DivinationEvent::GuardFailed)?;
            return Ok(DivinationOutcome::MissingCredential);
        };

        if fsm.context.seed.is_empty() {
            self.notifier.notify(Notice::error(MISSING_SEED_NOTICE));
            fsm.transition(DivinationEvent::GuardFailed)?;
            return Ok(DivinationOutcome::MissingSeed);
        }

        fsm.transition(DivinationEvent::GuardsPassed)?;
        {
            let mut session = self.lock_session();
            session.omen = None;
            session.icon = None;
            session.is_loading = true;
        }

        let omen = match self.omens.generate(&fsm.context.seed, &credential).await {
            Ok(omen) => omen,
            Err(e) => {
                error!("Divination error: {}", e);
                fsm.context.set_error(e.to_string());
                self.lock_session().is_loading = false;
                fsm.transition(DivinationEvent::OmenFailed)?;
                self.notifier.notify(Notice::error(DISRUPTED_NOTICE));
                return Ok(DivinationOutcome::Failed);
            }
        };

        fsm.context.omen = Some(omen.clone());
        self.lock_session().omen = Some(omen.clone());
        fsm.transition(DivinationEvent::OmenReceived)?;

        let icon = self.icons.generate(&omen, &credential).await;
        fsm.context.icon = icon.clone();
        {
            let mut session = self.lock_session();
            session.icon = icon.clone();
            session.is_loading = false;
        }
        fsm.transition(DivinationEvent::IconSettled)?;
        self.notifier.notify(Notice::success(SPOKEN_NOTICE));

        Ok(DivinationOutcome::Completed { omen, icon })
    }

    fn lock_session(&self) -> MutexGuard<'_, SessionState> {
        // Session state stays usable even if a holder panicked
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

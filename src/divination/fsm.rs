use crate::{Error, Result, oracle::Icon};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DivinationState {
    Idle,
    Validating,
    AwaitingOmen,
    AwaitingIcon,
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivinationEvent {
    Submit,
    GuardsPassed,
    GuardFailed,
    OmenReceived,
    OmenFailed,
    IconSettled,
}

/// Data gathered while a single divination runs.
#[derive(Debug, Clone)]
pub struct DivinationContext {
    pub id: Uuid,
    pub seed: String,
    pub omen: Option<String>,
    pub icon: Option<Icon>,
    pub last_error: Option<String>,
}

impl DivinationContext {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            seed: seed.into(),
            omen: None,
            icon: None,
            last_error: None,
        }
    }

    pub fn set_error(&mut self, error: String) {
        self.last_error = Some(error);
    }
}

pub struct DivinationStateMachine {
    state: DivinationState,
    pub context: DivinationContext,
}

impl DivinationStateMachine {
    pub fn new(seed: impl Into<String>) -> Self {
        let context = DivinationContext::new(seed);
        debug!("Creating divination FSM {}", context.id);
        Self {
            state: DivinationState::Idle,
            context,
        }
    }

    pub fn current_state(&self) -> DivinationState {
        self.state
    }

    pub fn transition(&mut self, event: DivinationEvent) -> Result<()> {
        let old_state = self.state;

        let new_state = match (old_state, event) {
            (DivinationState::Idle, DivinationEvent::Submit) => DivinationState::Validating,
            (DivinationState::Validating, DivinationEvent::GuardsPassed) => {
                DivinationState::AwaitingOmen
            }
            (DivinationState::Validating, DivinationEvent::GuardFailed) => DivinationState::Error,
            (DivinationState::AwaitingOmen, DivinationEvent::OmenReceived) => {
                DivinationState::AwaitingIcon
            }
            (DivinationState::AwaitingOmen, DivinationEvent::OmenFailed) => DivinationState::Error,
            // The icon step swallows its own failures, so it can only settle
            (DivinationState::AwaitingIcon, DivinationEvent::IconSettled) => DivinationState::Done,
            _ => {
                warn!(
                    "Invalid divination transition from {:?} with event {:?}",
                    old_state, event
                );
                return Err(Error::fsm(format!(
                    "Invalid transition from {:?} with event {:?}",
                    old_state, event
                )));
            }
        };

        info!(
            "Divination {} state transition: {:?} -> {:?} (event: {:?})",
            self.context.id, old_state, new_state, event
        );

        self.state = new_state;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, DivinationState::Done | DivinationState::Error)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.context.last_error.as_deref()
    }
}

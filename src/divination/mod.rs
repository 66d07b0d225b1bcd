pub mod fsm;
mod orchestrator;

pub use fsm::{DivinationContext, DivinationEvent, DivinationState, DivinationStateMachine};
pub use orchestrator::{
    CREDENTIAL_SAVED_NOTICE, DISRUPTED_NOTICE, DivinationOutcome, Diviner, MISSING_CREDENTIAL_NOTICE,
    MISSING_SEED_NOTICE, SPOKEN_NOTICE, SessionState,
};

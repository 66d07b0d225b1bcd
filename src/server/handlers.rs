use super::{
    page::{PageView, render_page},
    types::{
        CredentialForm, CredentialRequest, CredentialResponse, DivineRequest, DivineResponse,
        ErrorResponse, SeedForm, SessionResponse,
    },
};
use crate::{divination::Diviner, notify::NoticeQueue};
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub diviner: Arc<Diviner>,
    pub notices: NoticeQueue,
    /// Held for the whole divination; a busy trigger refuses new submissions.
    pub trigger: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(diviner: Arc<Diviner>, notices: NoticeQueue) -> Self {
        Self {
            diviner,
            notices,
            trigger: Arc::new(Mutex::new(())),
        }
    }

    async fn page_view(&self) -> PageView {
        PageView {
            session: self.diviner.session(),
            has_credential: self.diviner.has_credential().await,
            notices: self.notices.drain(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        session: state.diviner.session(),
        has_credential: state.diviner.has_credential().await,
    })
}

pub async fn divine(
    State(state): State<AppState>,
    Json(request): Json<DivineRequest>,
) -> Result<Json<DivineResponse>, ApiError> {
    let Ok(_trigger) = state.trigger.try_lock() else {
        warn!("Rejected divination: another one is in flight");
        return Err(api_error(
            StatusCode::CONFLICT,
            "A divination is already in progress",
        ));
    };

    info!("Received divination request");
    match state.diviner.divine(&request.seed).await {
        Ok(outcome) => Ok(Json(DivineResponse {
            outcome,
            notices: state.notices.drain(),
        })),
        Err(e) => {
            error!("Divination flow failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Processing error: {}", e),
            ))
        }
    }
}

pub async fn save_credential(
    State(state): State<AppState>,
    Json(request): Json<CredentialRequest>,
) -> Json<CredentialResponse> {
    let saved = state.diviner.save_credential(&request.api_key).await;
    Json(CredentialResponse {
        saved,
        notices: state.notices.drain(),
    })
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.page_view().await))
}

pub async fn open_credential_form(State(state): State<AppState>) -> Html<String> {
    state.diviner.show_credential_form();
    Html(render_page(&state.page_view().await))
}

pub async fn divine_form(
    State(state): State<AppState>,
    Form(form): Form<SeedForm>,
) -> Html<String> {
    // The page shows the loading state while another divination runs
    if let Ok(_trigger) = state.trigger.try_lock() {
        if let Err(e) = state.diviner.divine(&form.seed).await {
            error!("Divination flow failed: {}", e);
        }
    } else {
        warn!("Ignored form submission while a divination is in flight");
    }

    Html(render_page(&state.page_view().await))
}

pub async fn save_credential_form(
    State(state): State<AppState>,
    Form(form): Form<CredentialForm>,
) -> Html<String> {
    state.diviner.save_credential(&form.api_key).await;
    Html(render_page(&state.page_view().await))
}

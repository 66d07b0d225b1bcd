use async_trait::async_trait;
use pocket_diviner::{
    Error, Result,
    credential::Credential,
    gemini::{GenerateContentRequest, GenerateContentResponse, GenerativeClient, Part},
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One canned answer for a model.
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(GenerateContentResponse),
    Status(u16, &'static str),
    Transport(&'static str),
}

impl Scripted {
    pub fn text(text: &str) -> Self {
        Self::Respond(GenerateContentResponse::from_parts(vec![Part::text(text)]))
    }

    pub fn image(data: &str) -> Self {
        Self::Respond(GenerateContentResponse::from_parts(vec![
            Part::text("A sigil for you"),
            Part::image("image/png", data),
        ]))
    }

    pub fn empty() -> Self {
        Self::Respond(GenerateContentResponse::default())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub key: String,
    pub request: GenerateContentRequest,
}

/// Mock Gemini client answering from per-model scripts
#[derive(Debug, Default, Clone)]
pub struct MockGenerativeClient {
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, model: &str, answer: Scripted) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(model.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, model: &str) -> usize {
        self.calls().iter().filter(|call| call.model == model).count()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            key: credential.expose().to_string(),
            request: request.clone(),
        });

        let answer = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(|queue| queue.pop_front());

        match answer {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Status(status, text)) => Err(Error::generation(status, text)),
            Some(Scripted::Transport(message)) => Err(Error::internal(message)),
            None => Err(Error::internal(format!("No scripted answer for {model}"))),
        }
    }
}

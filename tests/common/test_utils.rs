use super::mocks::MockGenerativeClient;
use pocket_diviner::{
    config::GeminiConfig,
    credential::{CredentialStore, LocalStorage},
    divination::Diviner,
    notify::{Notice, NoticeLevel, NoticeQueue},
};
use std::sync::Arc;

pub const TEXT_MODEL: &str = "text-model";
pub const IMAGE_MODEL: &str = "image-model";
pub const TEST_KEY: &str = "test-api-key";

pub fn test_gemini_config() -> GeminiConfig {
    GeminiConfig {
        base_url: "http://localhost:0/v1beta".to_string(),
        text_model: TEXT_MODEL.to_string(),
        image_model: IMAGE_MODEL.to_string(),
    }
}

/// A diviner wired to the mock client and in-memory storage.
pub struct TestDiviner {
    pub diviner: Arc<Diviner>,
    pub notices: NoticeQueue,
    pub credentials: CredentialStore,
    pub client: MockGenerativeClient,
}

pub fn create_test_diviner(client: MockGenerativeClient) -> TestDiviner {
    let credentials = CredentialStore::new(Arc::new(LocalStorage::in_memory()));
    let notices = NoticeQueue::new();
    let diviner = Diviner::new(
        &test_gemini_config(),
        Arc::new(client.clone()),
        credentials.clone(),
        Arc::new(notices.clone()),
    );

    TestDiviner {
        diviner: Arc::new(diviner),
        notices,
        credentials,
        client,
    }
}

/// Same as [`create_test_diviner`] with [`TEST_KEY`] already stored.
pub async fn create_keyed_diviner(client: MockGenerativeClient) -> TestDiviner {
    let test = create_test_diviner(client);
    assert!(test.credentials.save(TEST_KEY).await);
    test
}

pub fn count_level(notices: &[Notice], level: NoticeLevel) -> usize {
    notices.iter().filter(|notice| notice.level == level).count()
}

mod storage;
mod store;

pub use storage::{KeyValueStorage, LocalStorage};
pub use store::{CREDENTIAL_KEY, Credential, CredentialStore};

pub mod config;
pub mod credential;
pub mod divination;
pub mod error;
pub mod gemini;
pub mod notify;
pub mod oracle;
pub mod server;

pub use error::{Error, Result};

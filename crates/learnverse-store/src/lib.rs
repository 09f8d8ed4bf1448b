//! learnverse-store - Persistent credential store for the LearnVerse client.

mod file;
mod memory;
mod store;

pub use file::{CREDENTIALS_FILE, FileCredentialBackend};
pub use memory::MemoryCredentialBackend;
pub use store::CredentialStore;

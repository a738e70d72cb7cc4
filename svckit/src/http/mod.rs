pub mod client;
pub mod generation;
pub mod session;

pub use client::ApiClient;
pub use generation::{RequestGeneration, Ticket};
pub use session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Session, StoredCredentials,
};

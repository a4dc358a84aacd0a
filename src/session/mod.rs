pub mod store;
pub mod token;
pub mod types;

pub use store::{InMemorySessionStore, SessionStore};
pub use token::{SessionSigner, SessionToken};
pub use types::{ClientId, SessionState};

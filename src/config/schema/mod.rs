mod conversation;
mod core;
mod engine;
mod gateway;
mod limits;
mod session;

pub use conversation::ConversationConfig;
pub use core::Config;
pub use engine::EngineConfig;
pub use gateway::GatewayConfig;
pub use limits::{AdmissionKeySource, LimitsConfig};
pub use session::SessionConfig;

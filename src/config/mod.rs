pub mod schema;

pub use schema::{
    AdmissionKeySource, Config, ConversationConfig, EngineConfig, GatewayConfig, LimitsConfig,
    SessionConfig,
};

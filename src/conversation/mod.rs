pub mod message;
pub mod normalize;
pub mod orchestrator;
pub mod window;

pub use message::{Message, MessageRole, SystemDirective, Transcript};
pub use normalize::normalize;
pub use orchestrator::{ConversationOrchestrator, TurnStage};
pub use window::build_window;

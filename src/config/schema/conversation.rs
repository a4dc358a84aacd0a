use serde::{Deserialize, Serialize};

const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful and friendly health and wellness assistant named Metabolical.

**Your Core Instructions:**
1.  **First Response Only:** In your very first response to a user, introduce yourself briefly.
2.  **Be Direct:** For all subsequent responses, get straight to the point. DO NOT re-introduce yourself.
3.  **Stay Focused:** Only discuss health, nutrition, metabolism, and exercise.
4.  **Safety First:** Never diagnose medical conditions or give medical advice. Always recommend consulting a healthcare professional.
5.  **Use History:** Use conversation history for context.
";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Directive prepended to every window, never stored in transcripts
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Most recent transcript messages submitted per turn
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Sentences kept from a generated reply
    #[serde(default = "default_max_sentences")]
    pub max_sentences: usize,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn default_history_limit() -> usize {
    8
}

fn default_max_sentences() -> usize {
    4
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            history_limit: default_history_limit(),
            max_sentences: default_max_sentences(),
        }
    }
}

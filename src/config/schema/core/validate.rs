use super::Config;
use crate::error::ConfigError;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.to_string()));

        if self.conversation.history_limit == 0 {
            return invalid("conversation.history_limit must be at least 1");
        }
        if self.conversation.max_sentences == 0 {
            return invalid("conversation.max_sentences must be at least 1");
        }
        if self.limits.max_message_chars == 0 {
            return invalid("limits.max_message_chars must be at least 1");
        }
        if self.limits.rate_limit_max_requests == 0 {
            return invalid("limits.rate_limit_max_requests must be at least 1");
        }
        if self.limits.rate_limit_window_secs == 0 {
            return invalid("limits.rate_limit_window_secs must be at least 1");
        }
        if self.engine.workers == 0 {
            return invalid("engine.workers must be at least 1");
        }
        if !self.engine.temperature.is_finite() || !(0.0..=2.0).contains(&self.engine.temperature)
        {
            return invalid("engine.temperature must be within 0.0..=2.0");
        }
        if !self.engine.top_p.is_finite() || !(0.0..=1.0).contains(&self.engine.top_p) {
            return invalid("engine.top_p must be within 0.0..=1.0");
        }
        if self.session.lifetime_secs == 0 {
            return invalid("session.lifetime_secs must be at least 1");
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return invalid("session.cookie_name must be non-empty [A-Za-z0-9_-]");
        }
        if self
            .session
            .secret
            .as_deref()
            .is_some_and(|secret| secret.trim().is_empty())
        {
            return invalid("session.secret must not be blank when set");
        }
        Ok(())
    }
}

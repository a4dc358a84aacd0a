use crate::conversation::Transcript;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const CLIENT_ID_BYTES: usize = 16;

/// Opaque identity of one client session, bound to a signed cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut buf = [0u8; CLIENT_ID_BYTES];
        rand::rng().fill_bytes(&mut buf);
        Self(hex::encode(buf))
    }

    /// Accepts only the lowercase-hex form produced by [`ClientId::generate`].
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == CLIENT_ID_BYTES * 2
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `issued_at + lifetime`, or `None` when that overflows (never expires).
pub(crate) fn expiry_of(issued_at: DateTime<Utc>, lifetime: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(lifetime)
        .ok()
        .and_then(|delta| issued_at.checked_add_signed(delta))
}

/// Server-held state of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub transcript: Transcript,
    pub issued_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(issued_at: DateTime<Utc>) -> Self {
        Self {
            transcript: Transcript::new(),
            issued_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        expiry_of(self.issued_at, lifetime).is_some_and(|expires| now >= expires)
    }
}

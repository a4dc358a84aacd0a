//! Signed session tokens carried in the session cookie.
//!
//! Format: `<client_id>.<issued_at_unix>.<hex hmac-sha256>`, where the MAC
//! covers `<client_id>.<issued_at_unix>`. The server keeps no token table;
//! a token is valid iff its signature verifies and its absolute lifetime has
//! not elapsed.

use super::types::{ClientId, expiry_of};
use crate::config::SessionConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub client_id: ClientId,
    pub issued_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_expired(&self, now: DateTime<Utc>, lifetime: Duration) -> bool {
        expiry_of(self.issued_at, lifetime).is_some_and(|expires| now >= expires)
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>, lifetime: Duration) -> Duration {
        match expiry_of(self.issued_at, lifetime) {
            Some(expires) => (expires - now).to_std().unwrap_or(Duration::ZERO),
            None => lifetime,
        }
    }
}

/// Holds the HMAC key; wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionSigner {
    key: [u8; 32],
}

impl SessionSigner {
    /// Derive the signing key from an operator-provided secret.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Fresh random key; tokens do not survive a restart.
    pub fn random() -> Self {
        use rand::RngCore;
        let mut key = [0u8; 32];
        rand::rng().fill_bytes(&mut key);
        Self { key }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        if let Some(secret) = config.secret.as_deref() {
            Self::from_secret(secret)
        } else {
            tracing::warn!(
                "no session secret configured; using a random per-process key (sessions reset on restart)"
            );
            Self::random()
        }
    }

    pub fn issue(&self, now: DateTime<Utc>) -> SessionToken {
        // Second precision, matching the encoded form.
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        SessionToken {
            client_id: ClientId::generate(),
            issued_at,
        }
    }

    pub fn encode(&self, token: &SessionToken) -> Result<String> {
        let payload = format!("{}.{}", token.client_id, token.issued_at.timestamp());
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify and parse a token. Returns `None` for anything malformed or
    /// not signed by this key; expiry is checked separately.
    pub fn decode(&self, raw: &str) -> Option<SessionToken> {
        let (payload, signature) = raw.rsplit_once('.')?;
        let (client_id, issued_at) = payload.split_once('.')?;

        let client_id = ClientId::parse(client_id)?;
        let issued_at = DateTime::from_timestamp(issued_at.parse::<i64>().ok()?, 0)?;
        let expected = hex::decode(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&expected).ok()?;

        Some(SessionToken {
            client_id,
            issued_at,
        })
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).context("initialise session HMAC")
    }
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

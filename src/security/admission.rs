use crate::config::LimitsConfig;
use crate::error::AdmissionError;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Tracked clients before an admission decision sweeps idle logs.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionPolicy {
    pub max_requests: usize,
    pub window: Duration,
}

impl AdmissionPolicy {
    pub fn from_config(limits: &LimitsConfig) -> Self {
        Self {
            max_requests: limits.rate_limit_max_requests,
            window: Duration::from_secs(limits.rate_limit_window_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admit,
    Reject,
}

/// Ordered request timestamps for one client.
pub type RequestLog = VecDeque<Instant>;

/// Fixed-window admission over one client's log.
///
/// Purges entries at least `window` old, rejects when the remaining count
/// has reached the budget, and otherwise records `now`. A rejected attempt
/// is not recorded.
pub fn admit(log: &mut RequestLog, now: Instant, policy: &AdmissionPolicy) -> Decision {
    log.retain(|seen| now.saturating_duration_since(*seen) < policy.window);
    if log.len() >= policy.max_requests {
        return Decision::Reject;
    }
    log.push_back(now);
    Decision::Admit
}

#[derive(Debug)]
struct ClientLogs {
    by_client: HashMap<String, RequestLog>,
    /// Size at which the next inline sweep runs. Doubles past the survivors
    /// of each sweep so a map full of live clients is not rescanned per call.
    sweep_at: usize,
}

impl ClientLogs {
    fn sweep(&mut self, now: Instant, window: Duration) -> usize {
        let before = self.by_client.len();
        self.by_client.retain(|_, log| {
            log.retain(|seen| now.saturating_duration_since(*seen) < window);
            !log.is_empty()
        });
        self.sweep_at = SWEEP_THRESHOLD.max(self.by_client.len() * 2);
        before - self.by_client.len()
    }
}

/// Per-client request logs behind a single lock, so purge, count and append
/// happen as one step for every decision.
#[derive(Debug)]
pub struct AdmissionController {
    policy: AdmissionPolicy,
    logs: Mutex<ClientLogs>,
}

impl AdmissionController {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            logs: Mutex::new(ClientLogs {
                by_client: HashMap::new(),
                sweep_at: SWEEP_THRESHOLD,
            }),
        }
    }

    pub fn check(&self, client_key: &str) -> Result<(), AdmissionError> {
        match self.decide_at(client_key, Instant::now()) {
            Decision::Admit => Ok(()),
            Decision::Reject => Err(AdmissionError::RateLimited {
                max_requests: self.policy.max_requests,
                window_secs: self.policy.window.as_secs(),
            }),
        }
    }

    pub fn decide_at(&self, client_key: &str, now: Instant) -> Decision {
        let mut logs = self
            .logs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if logs.by_client.len() >= logs.sweep_at {
            let forgotten = logs.sweep(now, self.policy.window);
            tracing::debug!(forgotten, "admission log reached sweep threshold");
        }
        let log = logs.by_client.entry(client_key.to_string()).or_default();
        admit(log, now, &self.policy)
    }

    /// Drop expired entries everywhere and forget clients with empty logs.
    /// Returns the number of clients forgotten.
    pub fn sweep(&self, now: Instant) -> usize {
        self.logs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .sweep(now, self.policy.window)
    }

    pub fn logged_requests(&self, client_key: &str) -> usize {
        self.logs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .by_client
            .get(client_key)
            .map_or(0, VecDeque::len)
    }

    pub fn tracked_clients(&self) -> usize {
        self.logs
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .by_client
            .len()
    }
}

//! A scripted generation client for tests.

use crate::client::{GenerationClient, GenerationRequest};
use crate::errors::GenerationError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A scripted reply.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Reject { status: u16, reason: String },
}

#[derive(Debug, Default)]
struct ScriptedState {
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
    queue: Mutex<VecDeque<Reply>>,
    rules: Mutex<Vec<(String, Reply)>>,
    fallback: Mutex<Option<Reply>>,
    unavailable_budget: AtomicUsize,
}

/// Generation client that replays configured replies and records every
/// request it sees.
///
/// Reply resolution order per call: a pending unavailability from
/// [`ScriptedClient::fail_times`], then the first prompt-substring rule,
/// then the one-shot queue, then the fallback. With nothing configured the
/// client rejects, so a misconfigured test fails on its first call instead
/// of retrying.
///
/// Clones share state, so a test can hand the executor one handle and
/// assert on another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedClient {
    inner: Arc<ScriptedState>,
}

impl ScriptedClient {
    /// Creates a client with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback reply returned when nothing else matches.
    #[must_use]
    pub fn respond_with(self, text: impl Into<String>) -> Self {
        *self.inner.fallback.lock() = Some(Reply::Text(text.into()));
        self
    }

    /// Queues a one-shot reply consumed before the fallback.
    #[must_use]
    pub fn respond_once(self, text: impl Into<String>) -> Self {
        self.inner
            .queue
            .lock()
            .push_back(Reply::Text(text.into()));
        self
    }

    /// Replies with `text` whenever the prompt contains `needle`.
    ///
    /// Rules win over the queue and fallback, which makes per-record
    /// scripting possible in concurrent batch tests.
    #[must_use]
    pub fn respond_matching(self, needle: impl Into<String>, text: impl Into<String>) -> Self {
        self.inner
            .rules
            .lock()
            .push((needle.into(), Reply::Text(text.into())));
        self
    }

    /// Makes every unmatched call fail with a service rejection.
    #[must_use]
    pub fn reject_with(self, status: u16, reason: impl Into<String>) -> Self {
        *self.inner.fallback.lock() = Some(Reply::Reject {
            status,
            reason: reason.into(),
        });
        self
    }

    /// Makes the next `count` calls fail as unavailable before any reply
    /// resolution.
    #[must_use]
    pub fn fail_times(self, count: usize) -> Self {
        self.inner.unavailable_budget.store(count, Ordering::SeqCst);
        self
    }

    /// Total calls received.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Prompts in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.inner
            .requests
            .lock()
            .iter()
            .map(|request| request.prompt.clone())
            .collect()
    }

    /// Model names in call order.
    #[must_use]
    pub fn models(&self) -> Vec<String> {
        self.inner
            .requests
            .lock()
            .iter()
            .map(|request| request.model.clone())
            .collect()
    }

    /// Full requests in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.inner.requests.lock().clone()
    }

    fn resolve(&self, prompt: &str) -> Option<Reply> {
        {
            let rules = self.inner.rules.lock();
            if let Some((_, reply)) = rules.iter().find(|(needle, _)| prompt.contains(needle)) {
                return Some(reply.clone());
            }
        }
        if let Some(reply) = self.inner.queue.lock().pop_front() {
            return Some(reply);
        }
        self.inner.fallback.lock().clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.requests.lock().push(request.clone());

        let budget = &self.inner.unavailable_budget;
        if budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| {
                remaining.checked_sub(1)
            })
            .is_ok()
        {
            return Err(GenerationError::unavailable("scripted outage"));
        }

        match self.resolve(&request.prompt) {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Reject { status, reason }) => {
                Err(GenerationError::rejected_with_status(status, reason))
            }
            None => Err(GenerationError::rejected("no scripted reply remaining")),
        }
    }
}

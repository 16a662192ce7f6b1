//! Request-scoped context passed explicitly into the transaction executor

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Correlation id and optional deadline for one unit of work
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: String,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Fresh context with a random correlation id and no deadline
    pub fn new() -> Self {
        Self::with_correlation_id(Uuid::new_v4().to_string())
    }

    pub fn with_correlation_id(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            deadline: None,
        }
    }

    /// Deadline `timeout` from now. Keeps an earlier deadline if one is set.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

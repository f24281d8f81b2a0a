//! Per-run resolver bookkeeping, owned by the coordinator

use std::collections::{HashSet, VecDeque};

use crate::error::ModuleError;
use crate::reference::{ModuleReference, normalize_url};
use crate::resolver::CloneResult;

/// State of one resolution run. Created fresh by every run and consumed
/// when the run ends.
#[derive(Debug, Default)]
pub(crate) struct ResolverState {
    /// Normalized references of processed modules, failed ones included,
    /// plus the canonical URLs of successful ones.
    pub(crate) cloned: HashSet<String>,
    /// Normalized references ever enqueued; nothing here is dispatched twice.
    pub(crate) scheduled: HashSet<String>,
    /// Successful results in completion order.
    pub(crate) installed: Vec<CloneResult>,
    pub(crate) failures: Vec<ModuleError>,
    pending: VecDeque<ModuleReference>,
}

impl ResolverState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `raw` unless it is blank, already completed or already
    /// scheduled. Returns whether it was queued.
    pub(crate) fn enqueue(&mut self, raw: &str) -> bool {
        let Some(reference) = ModuleReference::new(raw) else {
            return false;
        };
        let key = reference.as_str();
        if self.cloned.contains(key) || self.scheduled.contains(key) {
            return false;
        }
        self.scheduled.insert(key.to_string());
        self.pending.push_back(reference);
        true
    }

    /// Next reference to dispatch, FIFO. References completed under another
    /// spelling since they were queued are skipped.
    pub(crate) fn next_pending(&mut self) -> Option<ModuleReference> {
        while let Some(reference) = self.pending.pop_front() {
            if self.cloned.contains(reference.as_str()) {
                tracing::debug!(reference = %reference, "Already cloned, skipping");
                continue;
            }
            return Some(reference);
        }
        None
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Record a completed module and queue its requirements.
    pub(crate) fn record_success(&mut self, reference: &ModuleReference, result: CloneResult) {
        self.cloned.insert(reference.as_str().to_string());
        if let Some(canonical) = normalize_url(&result.canonical_url) {
            self.cloned.insert(canonical);
        }
        let requirements = result.requirements.clone();
        self.installed.push(result);

        for requirement in &requirements {
            if self.enqueue(requirement) {
                tracing::debug!(requires = %requirement.trim(), by = %reference, "Queued requirement");
            }
        }
    }

    /// Record a failed module. It counts as processed and is not retried
    /// within the run.
    pub(crate) fn record_failure(&mut self, reference: &ModuleReference, error: ModuleError) {
        self.cloned.insert(reference.as_str().to_string());
        tracing::error!(reference = %error.reference(), kind = %error.kind(), "{}", error);
        self.failures.push(error);
    }
}

//! Dependency resolver and bounded fetch orchestration
//!
//! A single coordinator owns all resolver state. It hands references to at
//! most `max_workers` blocking fetch tasks, waits for any of them to finish,
//! folds the results back in (queueing newly discovered requirements), and
//! repeats until nothing is pending or in flight.
//!
//! ```text
//!   seeds ─▶ pending ─▶ [ worker × max_workers ] ─▶ installed / failures
//!               ▲                  │
//!               └── requirements ──┘
//! ```

mod scheduler;
mod state;
mod task;

use std::any::Any;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use boot_meta::ModuleTypeRegistry;
use serde::Serialize;
use tokio::task::JoinError;

use crate::error::ModuleError;
use crate::source::ModuleSources;
use crate::{Error, Result};

pub use scheduler::BoundedScheduler;

use state::ResolverState;
use task::{FetchContext, fetch_module};

/// A module that was resolved, whether or not it was cloned this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneResult {
    pub canonical_url: String,
    pub destination: PathBuf,
    /// Requirements declared by the module's manifest.
    pub requirements: Vec<String>,
    /// Registered singular type name.
    pub module_type: String,
    /// Directory name under the type's destination root.
    pub name: String,
    /// `false` when the destination already existed and nothing was fetched.
    pub materialized: bool,
}

/// Outcome of one resolution run.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Successful modules in completion order.
    pub installed: Vec<CloneResult>,
    /// Normalized references of every processed module, failed ones
    /// included, plus the canonical URLs of the successful ones.
    pub cloned: HashSet<String>,
    pub failures: Vec<ModuleError>,
}

impl Resolution {
    /// Number of modules whose content was fetched this run.
    pub fn materialized_count(&self) -> usize {
        self.installed.iter().filter(|r| r.materialized).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves seed references into a materialized module tree.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<ModuleTypeRegistry>,
    sources: ModuleSources,
    max_workers: usize,
}

impl Resolver {
    /// Fails with [`Error::InvalidWorkerCount`] when `max_workers` is zero.
    pub fn new(
        registry: Arc<ModuleTypeRegistry>,
        sources: ModuleSources,
        max_workers: usize,
    ) -> Result<Self> {
        if max_workers == 0 {
            return Err(Error::InvalidWorkerCount { count: max_workers });
        }
        Ok(Self {
            registry,
            sources,
            max_workers,
        })
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Resolve `seeds` and everything they transitively require.
    ///
    /// Per-module failures are collected in the returned [`Resolution`];
    /// nothing a single module does can abort the run. Must be called from
    /// within a tokio runtime.
    pub async fn resolve<I, S>(&self, seeds: I) -> Resolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = ResolverState::new();
        for seed in seeds {
            state.enqueue(seed.as_ref());
        }
        tracing::info!(seeds = state.scheduled.len(), max_workers = self.max_workers, "Resolving modules");

        let ctx = FetchContext {
            registry: Arc::clone(&self.registry),
            sources: self.sources.clone(),
        };
        let mut scheduler = BoundedScheduler::new(self.max_workers);

        loop {
            while scheduler.has_capacity() {
                let Some(reference) = state.next_pending() else {
                    break;
                };
                tracing::debug!(reference = %reference, in_flight = scheduler.in_flight(), "Dispatching fetch");
                let ctx = ctx.clone();
                let task_reference = reference.clone();
                scheduler.spawn_blocking(reference, move || fetch_module(&ctx, &task_reference));
            }

            // Dispatch drains pending whenever a slot is free, so an idle
            // scheduler means the graph is exhausted.
            if scheduler.is_idle() {
                debug_assert!(!state.has_pending());
                break;
            }

            for (reference, outcome) in scheduler.wait_any().await {
                match outcome {
                    Ok(Ok(result)) => state.record_success(&reference, result),
                    Ok(Err(err)) => state.record_failure(&reference, err),
                    Err(join_err) => {
                        let err = ModuleError::Task {
                            reference: reference.to_string(),
                            message: join_message(join_err),
                        };
                        state.record_failure(&reference, err);
                    }
                }
            }
        }

        tracing::info!(
            installed = state.installed.len(),
            failed = state.failures.len(),
            "Resolution finished"
        );
        Resolution {
            installed: state.installed,
            cloned: state.cloned,
            failures: state.failures,
        }
    }
}

fn join_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    match panic_message(payload.as_ref()) {
        Some(message) => format!("panicked: {message}"),
        None => "panicked".to_string(),
    }
}

/// Text of a panic payload, when it carries one.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}

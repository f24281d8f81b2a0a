//! Bounded pool of blocking tasks with a wait-for-any primitive

use std::collections::HashMap;

use tokio::task::{self, JoinError, JoinSet};

/// Runs at most `capacity` blocking closures at once, each tagged with a key.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct BoundedScheduler<K, T> {
    capacity: usize,
    tasks: JoinSet<T>,
    keys: HashMap<task::Id, K>,
}

impl<K, T> BoundedScheduler<K, T>
where
    T: Send + 'static,
{
    /// `capacity` is clamped to at least one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tasks: JoinSet::new(),
            keys: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.tasks.len() < self.capacity
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Start `f` on the blocking pool.
    ///
    /// Callers check [`has_capacity`](Self::has_capacity) first.
    pub fn spawn_blocking<F>(&mut self, key: K, f: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        debug_assert!(self.has_capacity(), "scheduler over capacity");
        let handle = self.tasks.spawn_blocking(f);
        self.keys.insert(handle.id(), key);
    }

    /// Wait until at least one task finishes, then return it together with
    /// every other task that has already finished.
    ///
    /// A panicking task comes back as `Err`. Returns an empty list when
    /// nothing is in flight.
    pub async fn wait_any(&mut self) -> Vec<(K, Result<T, JoinError>)> {
        let mut done = Vec::new();
        let Some(first) = self.tasks.join_next_with_id().await else {
            return done;
        };
        self.collect(first, &mut done);
        while let Some(next) = self.tasks.try_join_next_with_id() {
            self.collect(next, &mut done);
        }
        done
    }

    fn collect(
        &mut self,
        joined: Result<(task::Id, T), JoinError>,
        done: &mut Vec<(K, Result<T, JoinError>)>,
    ) {
        let (id, outcome) = match joined {
            Ok((id, value)) => (id, Ok(value)),
            Err(err) => (err.id(), Err(err)),
        };
        match self.keys.remove(&id) {
            Some(key) => done.push((key, outcome)),
            None => tracing::error!(task = %id, "Finished task has no key"),
        }
    }
}

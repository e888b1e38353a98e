// src/health/registry.rs
use super::periodic::PeriodicChecker;
use super::result::{panicked, CheckResult, Checker};
use super::status::{CheckStatus, Status};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("check already exists: {0}")]
    DuplicateCheck(String),
}

/// A named collection of checks.
///
/// Most processes use the shared [`default_registry`]; tests build their own
/// so they don't see each other's checks.
#[derive(Default)]
pub struct Registry {
    checks: RwLock<HashMap<String, Entry>>,
}

#[derive(Clone)]
struct Entry {
    checker: Arc<dyn Checker>,
    // One permit: a timed evaluation holds it on its blocking-pool thread.
    in_flight: Arc<Semaphore>,
}

impl Entry {
    fn new(checker: Arc<dyn Checker>) -> Self {
        Self {
            checker,
            in_flight: Arc::new(Semaphore::new(1)),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `checker` with `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Duplicate names are a wiring
    /// bug and must stop startup.
    pub fn register(&self, name: impl Into<String>, checker: impl Checker + 'static) {
        if let Err(e) = self.try_register(name, checker) {
            panic!("{}", e);
        }
    }

    /// Like [`register`](Self::register) but hands the duplicate back as an
    /// error for init code that aborts on its own.
    pub fn try_register(
        &self,
        name: impl Into<String>,
        checker: impl Checker + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut checks = self.checks.write();
        if checks.contains_key(&name) {
            return Err(RegistryError::DuplicateCheck(name));
        }

        info!("Registered health check: {}", name);
        checks.insert(name, Entry::new(Arc::new(checker)));
        Ok(())
    }

    pub fn register_func<F>(&self, name: impl Into<String>, check: F)
    where
        F: Fn() -> CheckResult + Send + Sync + 'static,
    {
        self.register(name, check);
    }

    /// Registers `checker` behind a [`PeriodicChecker`]. Must be called from
    /// within a tokio runtime.
    pub fn register_periodic(
        &self,
        name: impl Into<String>,
        period: Duration,
        checker: impl Checker + 'static,
    ) {
        self.register(name, PeriodicChecker::new(checker, period));
    }

    pub fn register_periodic_func<F>(&self, name: impl Into<String>, period: Duration, check: F)
    where
        F: Fn() -> CheckResult + Send + Sync + 'static,
    {
        self.register_periodic(name, period, check);
    }

    /// Evaluates every check in turn and returns a fresh snapshot.
    ///
    /// A slow check delays the whole snapshot. A panicking check is reported
    /// as failed instead of unwinding into the caller.
    pub fn check_status(&self) -> Status {
        let checks = self.checks.read();
        checks
            .iter()
            .map(|(name, entry)| {
                let result = evaluate(name, entry.checker.as_ref());
                (name.clone(), CheckStatus::from(result))
            })
            .collect()
    }

    /// Evaluates every check concurrently on the blocking pool, giving each
    /// at most `timeout`. Checks that overrun are reported as failed; their
    /// evaluation is left to finish in the background, and until it does the
    /// check keeps reporting the timeout without starting another one.
    pub async fn check_status_with_timeout(&self, timeout: Duration) -> Status {
        let entries: Vec<(String, Entry)> = self
            .checks
            .read()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();

        let evaluations = entries.into_iter().map(|(name, entry)| async move {
            let result = evaluate_with_timeout(&name, entry, timeout).await;
            (name, CheckStatus::from(result))
        });

        futures::future::join_all(evaluations)
            .await
            .into_iter()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checks.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.checks.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.checks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.read().is_empty()
    }
}

fn evaluate(name: &str, checker: &dyn Checker) -> CheckResult {
    match panic::catch_unwind(AssertUnwindSafe(|| checker.check())) {
        Ok(result) => result,
        Err(payload) => {
            let result = panicked(payload);
            warn!("Health check {} failed: {}", name, result.message);
            result
        }
    }
}

async fn evaluate_with_timeout(name: &str, entry: Entry, timeout: Duration) -> CheckResult {
    let deadline = Instant::now() + timeout;
    let timed_out = || {
        warn!("Health check {} timed out after {:?}", name, timeout);
        CheckResult::unhealthy(format!("check timed out after {}ms", timeout.as_millis()))
    };

    // Wait for an earlier evaluation of this check rather than stacking another
    // blocking task behind it.
    let permit = match timeout_at(deadline, entry.in_flight.acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(e)) => return CheckResult::unhealthy(format!("check did not complete: {}", e)),
        Err(_) => return timed_out(),
    };

    let task = tokio::task::spawn_blocking({
        let name = name.to_string();
        let checker = entry.checker;
        move || {
            let result = evaluate(&name, checker.as_ref());
            drop(permit);
            result
        }
    });

    match timeout_at(deadline, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => CheckResult::unhealthy(format!("check did not complete: {}", e)),
        Err(_) => timed_out(),
    }
}

static DEFAULT_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// The process-wide registry, built on first use.
pub fn default_registry() -> &'static Arc<Registry> {
    DEFAULT_REGISTRY.get_or_init(|| Arc::new(Registry::new()))
}

/// Registers `checker` in the default registry. Panics on a duplicate name.
pub fn register(name: impl Into<String>, checker: impl Checker + 'static) {
    default_registry().register(name, checker);
}

pub fn register_func<F>(name: impl Into<String>, check: F)
where
    F: Fn() -> CheckResult + Send + Sync + 'static,
{
    default_registry().register_func(name, check);
}

pub fn register_periodic_func<F>(name: impl Into<String>, period: Duration, check: F)
where
    F: Fn() -> CheckResult + Send + Sync + 'static,
{
    default_registry().register_periodic_func(name, period, check);
}

/// Snapshot of the default registry.
pub fn check_status() -> Status {
    default_registry().check_status()
}

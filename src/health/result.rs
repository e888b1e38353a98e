// src/health/result.rs
use std::any::Any;
use std::fmt::Display;

/// Outcome of a single health evaluation.
///
/// Failure is carried as data: a check never returns an error to the
/// registry, it returns a `CheckResult` whose `error` is set. The default
/// value is the empty, healthy result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub error: Option<String>,
    pub message: String,
}

impl CheckResult {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: message.into(),
        }
    }

    /// A failed result whose error and message are both `message`.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            error: Some(message.clone()),
            message,
        }
    }

    pub fn from_error(error: impl Display, message: impl Into<String>) -> Self {
        Self {
            error: Some(error.to_string()),
            message: message.into(),
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

impl<E: Display> From<Result<(), E>> for CheckResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::default(),
            Err(e) => Self::unhealthy(e.to_string()),
        }
    }
}

/// Converts a caught panic payload into a failed result.
pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> CheckResult {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    CheckResult::unhealthy(format!("check panicked: {}", reason))
}

/// Anything that can report its health on demand.
///
/// Implementations may block (network, disk) but must be safe to call from
/// several requesters at once.
pub trait Checker: Send + Sync {
    fn check(&self) -> CheckResult;
}

impl<F> Checker for F
where
    F: Fn() -> CheckResult + Send + Sync,
{
    fn check(&self) -> CheckResult {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_result_is_healthy_and_empty() {
        let result = CheckResult::default();
        assert!(!result.failed());
        assert_eq!(result.message, "");
    }

    #[test]
    fn unhealthy_sets_error_and_message() {
        let result = CheckResult::unhealthy("disk full");
        assert!(result.failed());
        assert_eq!(result.error.as_deref(), Some("disk full"));
        assert_eq!(result.message, "disk full");
    }

    #[test]
    fn converts_from_std_result() {
        let ok: CheckResult = Ok::<(), String>(()).into();
        assert!(!ok.failed());

        let err: CheckResult = Err::<(), _>("connection refused").into();
        assert!(err.failed());
        assert_eq!(err.message, "connection refused");
    }

    #[test]
    fn closures_are_checkers() {
        let check = || CheckResult::healthy("ok");
        assert_eq!(check.check(), CheckResult::healthy("ok"));
    }

    #[test]
    fn panic_payloads_become_messages() {
        let result = panicked(Box::new("boom"));
        assert_eq!(result.message, "check panicked: boom");

        let result = panicked(Box::new(String::from("bad state")));
        assert_eq!(result.message, "check panicked: bad state");

        let result = panicked(Box::new(42u8));
        assert_eq!(result.message, "check panicked: unknown panic");
    }
}

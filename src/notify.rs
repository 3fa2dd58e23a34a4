use crate::errors::AppError;
use tracing::{info, warn};

/// Sink for user-facing outcome messages. Fire and forget.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_success(&self, message: &str) {
        info!(target: "notify", "{message}");
    }

    fn notify_error(&self, message: &str) {
        warn!(target: "notify", "{message}");
    }
}

/// Store operations that report their outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Restore,
}

impl Operation {
    fn verb(self) -> (&'static str, &'static str) {
        match self {
            Operation::Create => ("created", "create"),
            Operation::Update => ("updated", "update"),
            Operation::Delete => ("deleted", "delete"),
            Operation::Restore => ("restored", "restore"),
        }
    }

    pub fn success_message(self) -> String {
        format!("Alarm {} successfully", self.verb().0)
    }

    pub fn failure_message(self) -> String {
        format!("Failed to {} alarm", self.verb().1)
    }
}

/// Reports `result` through `notifier` and hands it back unchanged.
pub fn report<T>(
    notifier: &dyn Notifier,
    operation: Operation,
    result: Result<T, AppError>,
) -> Result<T, AppError> {
    match &result {
        Ok(_) => notifier.notify_success(&operation.success_message()),
        Err(err) => notifier.notify_error(&format!("{}: {}", operation.failure_message(), err.message)),
    }
    result
}

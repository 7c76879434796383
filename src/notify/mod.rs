//! Notification sink for user-visible success/failure signals.
//!
//! The stores never render anything themselves; every message a user should
//! see goes through a [`Notifier`]. Presentation is the implementation's
//! problem.

use tracing::{error, info};

/// Default display position, matching the web client's toast placement
pub const DEFAULT_POSITION: &str = "top-right";

/// Default display duration in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Presentation hints passed along with every notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyOptions {
    pub position: &'static str,
    pub timeout_ms: u64,
}

impl Default for NotifyOptions {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, options: NotifyOptions);

    fn success(&self, message: &str) {
        self.notify(message, Severity::Success, NotifyOptions::default());
    }

    fn error(&self, message: &str) {
        self.notify(message, Severity::Error, NotifyOptions::default());
    }
}

/// Notifier for interactive CLI use: prints to stdout/stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity, _options: NotifyOptions) {
        match severity {
            Severity::Success => println!("[OK] {}", message),
            Severity::Error => eprintln!("[!!] {}", message),
        }
    }
}

/// Notifier for non-interactive use: routes messages into the log stream.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity, _options: NotifyOptions) {
        match severity {
            Severity::Success => info!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}

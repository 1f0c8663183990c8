//! Desktop notifications.
//!
//! Notifications are delivered through `notify-send`, invoked with an
//! argument vector so the message text is never interpreted by a shell.

use std::path::PathBuf;
use std::process::Command;

use crate::types::{ScriptError, ScriptResult};

/// Notification priority, as understood by `notify-send -u`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

/// A single desktop notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub urgency: Urgency,
    pub message: String,
}

impl Notification {
    pub fn new(urgency: Urgency, message: impl Into<String>) -> Self {
        Self {
            urgency,
            message: message.into(),
        }
    }
}

/// Something that can put a notification in front of the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> ScriptResult<()>;
}

/// Delivers notifications by running `notify-send`.
#[derive(Debug, Clone)]
pub struct NotifySend {
    program: PathBuf,
}

impl NotifySend {
    pub const PROGRAM: &'static str = "notify-send";

    /// Locate `notify-send` on `PATH`.
    pub fn find() -> Option<Self> {
        which::which(Self::PROGRAM).ok().map(Self::with_program)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the invocation for `notification` without running it.
    pub fn command(&self, notification: &Notification) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-u")
            .arg(notification.urgency.as_str())
            .arg(&notification.message);
        cmd
    }
}

impl Notifier for NotifySend {
    fn notify(&self, notification: &Notification) -> ScriptResult<()> {
        tracing::debug!(
            "{} -u {} {:?}",
            self.program.display(),
            notification.urgency.as_str(),
            notification.message
        );

        let status = self.command(notification).status().map_err(|e| {
            ScriptError::Notify(format!("failed to run {}: {e}", self.program.display()))
        })?;

        if !status.success() {
            tracing::warn!("{} exited with {status}", self.program.display());
        }
        Ok(())
    }
}

/// Emits notifications as log events instead of desktop popups.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> ScriptResult<()> {
        match notification.urgency {
            Urgency::Critical => tracing::error!("{}", notification.message),
            Urgency::Normal => tracing::info!("{}", notification.message),
            Urgency::Low => tracing::debug!("{}", notification.message),
        }
        Ok(())
    }
}

/// Pick `notify-send` when it is installed, falling back to the log.
pub fn detect() -> Box<dyn Notifier> {
    match NotifySend::find() {
        Some(notify_send) => Box::new(notify_send),
        None => {
            tracing::warn!(
                "{} not found on PATH, notifications go to the log",
                NotifySend::PROGRAM
            );
            Box::new(LogNotifier)
        }
    }
}

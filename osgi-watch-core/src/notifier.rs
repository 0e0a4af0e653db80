//! Desktop notifications.

use std::path::PathBuf;
use std::process::Stdio;

use crate::tool::Invocation;

pub const NOTIFICATION_TITLE: &str = "osgi-watch";
pub const NOTIFICATION_TIMEOUT_SECS: u64 = 8;

/// Sends a fire-and-forget message to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifies through `notify-send` on Linux and `osascript` on macOS.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    enabled: bool,
    icon: Option<PathBuf>,
}

impl DesktopNotifier {
    pub fn new(enabled: bool, icon: Option<PathBuf>) -> Self {
        Self { enabled, icon }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The command that shows `message`, or `None` on platforms without a
    /// supported notification command.
    pub fn invocation(&self, message: &str) -> Option<Invocation> {
        let cwd = std::env::temp_dir();
        if cfg!(target_os = "macos") {
            let script = format!(
                "display notification {:?} with title {:?}",
                message, NOTIFICATION_TITLE
            );
            Some(Invocation::new("osascript", cwd).arg("-e").arg(script))
        } else if cfg!(unix) {
            let mut invocation = Invocation::new("notify-send", cwd)
                .arg("--expire-time")
                .arg((NOTIFICATION_TIMEOUT_SECS * 1000).to_string());
            if let Some(ref icon) = self.icon {
                invocation = invocation
                    .arg("--icon")
                    .arg(icon.display().to_string());
            }
            Some(invocation.arg(NOTIFICATION_TITLE).arg(message))
        } else {
            None
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str) {
        if !self.enabled {
            return;
        }
        let Some(invocation) = self.invocation(message) else {
            tracing::debug!("Desktop notifications are not supported on this platform");
            return;
        };

        let spawned = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                // Reap the process without making the caller wait on it.
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
            }
            Err(e) => tracing::debug!("Unable to send notification: {}", e),
        }
    }
}

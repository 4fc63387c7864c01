//! Folder selection for discovery requests.

use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Asks the user which folder to scan.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// Returns `None` when nothing was selected (cancelled, closed, failed).
    async fn select_folder(&self, title: &str) -> Option<PathBuf>;
}

/// A folder decided up front, e.g. from a command-line argument.
#[derive(Debug, Clone, Default)]
pub struct FixedFolder(pub Option<PathBuf>);

#[async_trait]
impl FolderPicker for FixedFolder {
    async fn select_folder(&self, _title: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// A native directory-only dialog, shown through whichever dialog utility is
/// installed.
#[derive(Debug, Clone)]
pub enum DialogPicker {
    Zenity(PathBuf),
    Kdialog(PathBuf),
}
impl DialogPicker {
    pub fn discover() -> Result<Self> {
        if let Ok(path) = which::which("zenity") {
            return Ok(Self::Zenity(path));
        }
        if let Ok(path) = which::which("kdialog") {
            return Ok(Self::Kdialog(path));
        }
        tracing::info!("Neither zenity nor kdialog found in PATH");
        exn::bail!(ErrorKind::PickerNotFound);
    }

    fn command(&self, title: &str) -> Command {
        match self {
            Self::Zenity(path) => {
                let mut command = Command::new(path);
                command.args(["--file-selection", "--directory"]).arg(format!("--title={title}"));
                command
            },
            Self::Kdialog(path) => {
                let mut command = Command::new(path);
                command.arg("--title").arg(title).arg("--getexistingdirectory");
                command
            },
        }
    }
}

#[async_trait]
impl FolderPicker for DialogPicker {
    async fn select_folder(&self, title: &str) -> Option<PathBuf> {
        let output = match self.command(title).stdin(Stdio::null()).stderr(Stdio::null()).output().await {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(error = %err, "Unable to show folder dialog");
                return None;
            },
        };
        // Both utilities exit non-zero when the dialog is cancelled.
        if !output.status.success() {
            tracing::debug!(status = %output.status, "Folder dialog cancelled");
            return None;
        }
        let selected = String::from_utf8_lossy(&output.stdout);
        let selected = selected.trim_end_matches(['\n', '\r']);
        (!selected.is_empty()).then(|| PathBuf::from(selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_folder() {
        let picker = FixedFolder(Some(PathBuf::from("/library")));
        assert_eq!(picker.select_folder("ignored").await, Some(PathBuf::from("/library")));
        assert_eq!(FixedFolder::default().select_folder("ignored").await, None);
    }

    #[test]
    fn test_dialog_commands() {
        let zenity = DialogPicker::Zenity(PathBuf::from("/usr/bin/zenity")).command("Pick one");
        let args: Vec<_> = zenity.as_std().get_args().collect();
        assert_eq!(args, ["--file-selection", "--directory", "--title=Pick one"]);

        let kdialog = DialogPicker::Kdialog(PathBuf::from("/usr/bin/kdialog")).command("Pick one");
        let args: Vec<_> = kdialog.as_std().get_args().collect();
        assert_eq!(args, ["--title", "Pick one", "--getexistingdirectory"]);
    }
}

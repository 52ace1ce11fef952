//! Audit logging
//!
//! Appends one line per user action to a flat file:
//! `[<timestamp>] - <client-address> - <message>`.

use chrono::{DateTime, Local};
use log::{error, info};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::client::Client;

/// C `asctime` layout, e.g. `Sun Oct 18 20:45:00 2026`
const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Append-only audit trail of user actions
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records an action by `client`. Write failures are logged, not returned.
    pub async fn record(&self, client: &Client, message: &str) {
        info!("[{}] {}", client.addr_label(), message);

        let line = format_line(Local::now(), &client.addr_label(), message);
        if let Err(e) = self.append(&line).await {
            error!("Failed to write audit log {}: {}", self.path.display(), e);
        }
    }

    async fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

fn format_line(timestamp: DateTime<Local>, addr: &str, message: &str) -> String {
    format!(
        "[{}] - {} - {}\n",
        timestamp.format(TIMESTAMP_FORMAT),
        addr,
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn line_format() {
        let timestamp = Local.with_ymd_and_hms(2026, 10, 4, 9, 5, 7).unwrap();
        assert_eq!(
            format_line(timestamp, "127.0.0.1", "User \"bob\" made dir \"a\""),
            "[Sun Oct  4 09:05:07 2026] - 127.0.0.1 - User \"bob\" made dir \"a\"\n"
        );
    }

    #[tokio::test]
    async fn appends_lines() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::new(dir.path().join("cloud.log"));
        let client = Client::new(Identity::user("bob"), Some("192.168.1.2:5555".parse().unwrap()));

        audit.record(&client, "first").await;
        audit.record(&client, "second").await;

        let content = fs::read_to_string(audit.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] - 192.168.1.2 - first"));
        assert!(lines[1].ends_with(" - second"));
    }

    #[tokio::test]
    async fn unwritable_log_does_not_panic() {
        let dir = TempDir::new().unwrap();
        let audit = AuditLog::new(dir.path().join("missing").join("cloud.log"));
        audit.record(&Client::default(), "ignored").await;
        assert!(!audit.path().exists());
    }
}

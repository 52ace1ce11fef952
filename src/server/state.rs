//! Shared application state
//!
//! Built once from the configuration and cloned (cheaply) into every request.

use std::path::Path;
use std::sync::Arc;

use crate::auth::{Identity, SudoerList};
use crate::client::Client;
use crate::config::ServerConfig;
use crate::error::CloudServerError;
use crate::lists::JsonList;
use crate::middleware::AuditLog;
use crate::storage::FolderEnumerator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub folders: Arc<FolderEnumerator>,
    pub hidden: Arc<JsonList>,
    pub ignored: Arc<JsonList>,
    pub audit: Arc<AuditLog>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let ignored = JsonList::new(&config.ignored_path, "ignored");
        let hidden = JsonList::new(&config.hidden_path, "hidden");
        let sudoers = SudoerList::new(&config.sudoers_path);
        let folders = FolderEnumerator::new(&config.cloud_path, ignored.clone(), sudoers);
        let audit = AuditLog::new(&config.log_path);

        Self {
            config: Arc::new(config),
            folders: Arc::new(folders),
            hidden: Arc::new(hidden),
            ignored: Arc::new(ignored),
            audit: Arc::new(audit),
        }
    }

    pub fn cloud_path(&self) -> &Path {
        &self.config.cloud_path
    }

    /// Folder choices for `identity`, walked fresh on the blocking pool.
    pub async fn list_folders(&self, identity: &Identity) -> Result<Vec<String>, CloudServerError> {
        let folders = Arc::clone(&self.folders);
        let identity = identity.clone();
        run_blocking(move || folders.list_folders(&identity)).await
    }

    /// Appends an audit line for an action by `client`.
    pub async fn record(&self, client: &Client, message: &str) {
        self.audit.record(client, message).await;
    }
}

/// Runs `task` against a JSON list on the blocking pool.
pub async fn with_list<T, F>(list: &Arc<JsonList>, task: F) -> Result<T, CloudServerError>
where
    F: FnOnce(&JsonList) -> T + Send + 'static,
    T: Send + 'static,
{
    let list = Arc::clone(list);
    run_blocking(move || task(&list)).await
}

/// Runs blocking filesystem work off the async executor.
pub async fn run_blocking<T, F>(task: F) -> Result<T, CloudServerError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await?)
}

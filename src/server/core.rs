use axum::Router;
use log::{error, info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::protocol::build_router;
use crate::server::state::AppState;

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Prepares the storage root and binds the HTTP listener.
    pub async fn new(config: ServerConfig) -> io::Result<Self> {
        if let Err(e) = std::fs::create_dir_all(&config.cloud_path) {
            warn!("Failed to create storage root directory: {}", e);
        } else {
            info!("Storage root directory: {}", config.cloud_path.display());
        }

        let socket = config.listen_socket();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e);
            }
        };

        Ok(Self {
            listener,
            state: AppState::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serves requests until the listener fails.
    pub async fn start(self) -> io::Result<()> {
        info!(
            "Starting RAX Cloud on {} (upload limit {} MB)",
            self.local_addr()?,
            self.state.config.max_upload_size_mb
        );

        let app = self.router();
        axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}

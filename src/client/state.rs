//! Module `client`
//!
//! Defines the `Client` struct: the caller of a single request, carrying its
//! identity and connection address. Built fresh per request, never stored.

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::auth::Identity;

/// Represents the caller of one HTTP request.
#[derive(Debug, Clone, Default)]
pub struct Client {
    identity: Identity,
    client_addr: Option<SocketAddr>,
}

impl Client {
    pub fn new(identity: Identity, client_addr: Option<SocketAddr>) -> Self {
        Self {
            identity,
            client_addr,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn client_addr(&self) -> Option<SocketAddr> {
        self.client_addr
    }

    /// Address as written to the audit log
    pub fn addr_label(&self) -> String {
        match self.client_addr {
            Some(addr) => addr.ip().to_string(),
            None => "unknown".to_string(),
        }
    }
}

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Missing when served without connect info
        let client_addr = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|ConnectInfo(addr)| addr);
        let identity = Identity::from_parts(parts).await;

        Ok(Self::new(identity, client_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_address_and_identity() {
        let addr: SocketAddr = "10.0.0.7:41000".parse().unwrap();
        let mut request = Request::builder()
            .uri("/")
            .header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .body(())
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));
        let (mut parts, _) = request.into_parts();

        let client = Client::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(client.identity().username(), Some("alice"));
        assert_eq!(client.client_addr(), Some(addr));
        assert_eq!(client.addr_label(), "10.0.0.7");
    }

    #[tokio::test]
    async fn missing_connect_info_is_unknown() {
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();

        let client = Client::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(client.identity().is_anonymous());
        assert_eq!(client.addr_label(), "unknown");
    }
}

//! Caller identity
//!
//! Identity is the basic-auth username, if any. Password checking belongs to
//! whatever sits in front of the server; here only the name matters.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Basic};
use std::fmt;

/// Who is making a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    username: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self { username: None }
    }

    pub fn user(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_none()
    }

    /// Reads the `Authorization: Basic` header; missing or malformed credentials
    /// give the anonymous identity.
    pub async fn from_parts(parts: &mut Parts) -> Self {
        match TypedHeader::<Authorization<Basic>>::from_request_parts(parts, &()).await {
            Ok(TypedHeader(auth)) => Self::user(auth.username()),
            Err(_) => Self::anonymous(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.username {
            Some(name) => write!(f, "{:?}", name),
            None => write!(f, "anonymous"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn identity_for(header: Option<&str>) -> Identity {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Identity::from_parts(&mut parts).await
    }

    #[tokio::test]
    async fn reads_basic_auth_username() {
        // alice:secret
        let identity = identity_for(Some("Basic YWxpY2U6c2VjcmV0")).await;
        assert_eq!(identity.username(), Some("alice"));
        assert_eq!(identity.to_string(), "\"alice\"");
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        let identity = identity_for(None).await;
        assert!(identity.is_anonymous());
        assert_eq!(identity.to_string(), "anonymous");
    }

    #[tokio::test]
    async fn malformed_header_is_anonymous() {
        assert!(identity_for(Some("Bearer abc")).await.is_anonymous());
        assert!(identity_for(Some("Basic !!!")).await.is_anonymous());
    }
}

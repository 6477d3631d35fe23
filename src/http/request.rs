//! Read-only request view handed to filters.
//!
//! # Responsibilities
//! - Expose method, URI, headers and remote address without ownership
//! - Resolve the declared host (request-target authority, then Host header)
//!
//! # Design Decisions
//! - Borrowed from the serving layer's request; filters never mutate it
//! - Remote address comes from axum's `ConnectInfo` extension when present

use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, Uri},
};

/// What a filter may look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub remote_addr: Option<SocketAddr>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
            remote_addr: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        }
    }

    /// Host the client addressed.
    ///
    /// An absolute-form target (or the HTTP/2 `:authority`) wins over the
    /// `Host` header. A `Host` value that is not visible ASCII yields `None`
    /// even when an authority is present.
    pub fn declared_host(&self) -> Option<&'a str> {
        let host_header = self.headers.get(header::HOST);
        if host_header.is_some_and(|value| value.to_str().is_err()) {
            return None;
        }

        self.uri
            .authority()
            .map(|authority| {
                let raw = authority.as_str();
                raw.rsplit_once('@').map_or(raw, |(_, host)| host)
            })
            .or_else(|| host_header.and_then(|value| value.to_str().ok()))
    }

    /// Header value as text, empty when absent or not visible ASCII.
    pub fn header_str(&self, name: impl header::AsHeaderName) -> &'a str {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &'a str {
        self.uri.path()
    }
}

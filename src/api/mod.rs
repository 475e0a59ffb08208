//! Request Gateway
//!
//! Frontend bindings to the REST backend. Stores only see the
//! [`RequestGateway`] seam; [`HttpGateway`] is the browser implementation.

mod fetch;
mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use fetch::FetchTransport;
pub use http::{HttpGateway, OutgoingRequest, RawResponse, Transport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed request, tagged by what went wrong
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestFailure {
    /// No response: offline, CORS, aborted or timed out
    #[error("network error: {reason}")]
    Network { reason: String },
    #[error("unauthorized")]
    Unauthorized { payload: Value },
    /// 4xx: validation or business-rule rejection
    #[error("request rejected with status {status}")]
    ClientError { status: u16, payload: Value },
    #[error("server error with status {status}")]
    ServerError { status: u16, payload: Value },
    /// Body could not be encoded or decoded
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl RequestFailure {
    /// Response body carried by the failure, if the server answered
    pub fn payload(&self) -> Option<&Value> {
        match self {
            RequestFailure::Unauthorized { payload }
            | RequestFailure::ClientError { payload, .. }
            | RequestFailure::ServerError { payload, .. } => Some(payload),
            RequestFailure::Network { .. } | RequestFailure::Serialization { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RequestFailure::Unauthorized { .. } => Some(401),
            RequestFailure::ClientError { status, .. } | RequestFailure::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn serialization(err: serde_json::Error) -> Self {
        RequestFailure::Serialization { reason: err.to_string() }
    }
}

/// Performs one request against the backend
///
/// Futures are not `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait RequestGateway: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, RequestFailure>;
}

// ========================
// Typed helpers
// ========================

pub async fn get<T: DeserializeOwned>(gateway: &dyn RequestGateway, path: &str) -> Result<T, RequestFailure> {
    let value = gateway.request(Method::Get, path, None).await?;
    decode(value)
}

pub async fn post<B, T>(gateway: &dyn RequestGateway, path: &str, body: &B) -> Result<T, RequestFailure>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = encode(body)?;
    let value = gateway.request(Method::Post, path, Some(body)).await?;
    decode(value)
}

pub async fn put<B, T>(gateway: &dyn RequestGateway, path: &str, body: &B) -> Result<T, RequestFailure>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = encode(body)?;
    let value = gateway.request(Method::Put, path, Some(body)).await?;
    decode(value)
}

pub async fn delete(gateway: &dyn RequestGateway, path: &str) -> Result<(), RequestFailure> {
    gateway.request(Method::Delete, path, None).await.map(|_| ())
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, RequestFailure> {
    serde_json::to_value(body).map_err(RequestFailure::serialization)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RequestFailure> {
    serde_json::from_value(value).map_err(RequestFailure::serialization)
}

//! HTTP Gateway
//!
//! Builds requests from the injected config and session, sends them through a
//! [`Transport`], and classifies the response.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Method, RequestFailure, RequestGateway};
use crate::config::GatewayConfig;
use crate::session::Session;

/// A fully prepared request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl OutgoingRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a response that arrived
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Failed(String),
}

/// Sends a prepared request and returns whatever came back
#[async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError>;
}

pub struct HttpGateway<T> {
    config: GatewayConfig,
    session: Session,
    transport: T,
}

impl<T: Transport> HttpGateway<T> {
    pub fn new(config: GatewayConfig, session: Session, transport: T) -> Self {
        Self { config, session, transport }
    }

    fn prepare(&self, method: Method, path: &str, body: Option<Value>) -> Result<OutgoingRequest, RequestFailure> {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(token) = self.session.token() {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }
        let body = body
            .map(|value| serde_json::to_string(&value))
            .transpose()
            .map_err(|e| RequestFailure::Serialization { reason: e.to_string() })?;
        Ok(OutgoingRequest {
            method,
            url: self.config.url(path),
            headers,
            body,
            timeout: self.config.timeout,
        })
    }
}

#[async_trait(?Send)]
impl<T: Transport> RequestGateway for HttpGateway<T> {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, RequestFailure> {
        let request = self.prepare(method, path, body)?;
        log::debug!("{} {} (credential: {})", method, request.url, request.header("Authorization").is_some());

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| RequestFailure::Network { reason: e.to_string() })
            .inspect_err(|failure| log::warn!("{} {} failed: {}", method, path, failure))?;

        let result = classify(response.status, &response.body);
        match &result {
            Ok(_) => log::debug!("{} {} -> {}", method, path, response.status),
            Err(failure @ RequestFailure::Unauthorized { .. }) => {
                log::warn!("{} {} -> {}", method, path, failure);
                self.session.invalidate();
            }
            Err(failure) => log::warn!("{} {} -> {}", method, path, failure),
        }
        result
    }
}

/// Map a status and raw body to the request outcome
///
/// Success bodies must be JSON (or empty). Error bodies that are not JSON are
/// kept as a string payload.
pub fn classify(status: u16, body: &str) -> Result<Value, RequestFailure> {
    if (200..300).contains(&status) {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|e| RequestFailure::Serialization { reason: e.to_string() });
    }

    let payload = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    };
    match status {
        401 => Err(RequestFailure::Unauthorized { payload }),
        500.. => Err(RequestFailure::ServerError { status, payload }),
        _ => Err(RequestFailure::ClientError { status, payload }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::session::memory::MemoryStorage;

    /// Replays scripted responses and records what was sent
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        sent: Mutex<Vec<OutgoingRequest>>,
    }

    impl ScriptedTransport {
        fn respond(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(RawResponse { status, body: body.to_string() }));
            self
        }

        fn fail(self, error: TransportError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }
    }

    #[async_trait(?Send)]
    impl Transport for Arc<ScriptedTransport> {
        async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
            self.sent.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Failed("no response scripted".to_string())))
        }
    }

    fn gateway(token: Option<&str>, transport: ScriptedTransport) -> (HttpGateway<Arc<ScriptedTransport>>, Session, Arc<ScriptedTransport>) {
        let storage = match token {
            Some(token) => MemoryStorage::with_token(token),
            None => MemoryStorage::default(),
        };
        let session = Session::restore(Arc::new(storage));
        let transport = Arc::new(transport);
        let gateway = HttpGateway::new(GatewayConfig::default(), session, transport.clone());
        (gateway, session, transport)
    }

    #[tokio::test]
    async fn test_attaches_bearer_when_signed_in() {
        let (gateway, _, transport) = gateway(Some("abc"), ScriptedTransport::default().respond(200, "[]"));
        let value = gateway.request(Method::Get, "/api/todos", None).await.unwrap();
        assert_eq!(value, json!([]));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].url, "http://localhost:8080/api/todos");
        assert_eq!(sent[0].header("authorization"), Some("Bearer abc"));
        assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
        assert_eq!(sent[0].timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_no_credential_is_not_an_error() {
        let (gateway, _, transport) = gateway(None, ScriptedTransport::default().respond(200, "{}"));
        assert!(gateway.request(Method::Get, "/api/debts/summary", None).await.is_ok());
        assert_eq!(transport.sent.lock().unwrap()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_body_is_serialized() {
        let (gateway, _, transport) = gateway(None, ScriptedTransport::default().respond(201, r#"{"id":1}"#));
        gateway.request(Method::Post, "/api/todos", Some(json!({"title": "x"}))).await.unwrap();
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"title":"x"}"#));
    }

    #[tokio::test]
    async fn test_unauthorized_invalidates_session_once() {
        let (gateway, session, _) = gateway(Some("stale"), ScriptedTransport::default().respond(401, r#"{"error":"expired"}"#));
        let result = gateway.request(Method::Get, "/api/transactions", None).await;

        assert_eq!(result, Err(RequestFailure::Unauthorized { payload: json!({"error": "expired"}) }));
        assert_eq!(session.token(), None);
        assert_eq!(session.invalidations(), 1);
    }

    #[tokio::test]
    async fn test_other_failures_keep_session() {
        let (gateway, session, _) = gateway(Some("abc"), ScriptedTransport::default().respond(500, "boom"));
        let result = gateway.request(Method::Get, "/api/debts", None).await;
        assert_eq!(result, Err(RequestFailure::ServerError { status: 500, payload: json!("boom") }));
        assert_eq!(session.token(), Some("abc".to_string()));
        assert_eq!(session.invalidations(), 0);
    }

    #[tokio::test]
    async fn test_transport_timeout_is_network_error() {
        let timeout = TransportError::Timeout(Duration::from_secs(10));
        let (gateway, _, _) = gateway(None, ScriptedTransport::default().fail(timeout));
        let result = gateway.request(Method::Get, "/api/todos", None).await;
        assert!(matches!(result, Err(RequestFailure::Network { reason }) if reason.contains("timed out")));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(204, ""), Ok(Value::Null));
        assert_eq!(classify(200, r#"{"a":1}"#), Ok(json!({"a": 1})));
        assert!(matches!(classify(200, "<html>"), Err(RequestFailure::Serialization { .. })));
        assert_eq!(
            classify(422, r#"{"errors":{"title":"required"}}"#),
            Err(RequestFailure::ClientError { status: 422, payload: json!({"errors": {"title": "required"}}) })
        );
        assert_eq!(classify(404, ""), Err(RequestFailure::ClientError { status: 404, payload: Value::Null }));
        assert_eq!(classify(503, ""), Err(RequestFailure::ServerError { status: 503, payload: Value::Null }));
        assert_eq!(classify(401, ""), Err(RequestFailure::Unauthorized { payload: Value::Null }));
    }
}

//! Scripted gateway for store tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{Method, RequestFailure, RequestGateway};

type Outcome = Result<Value, RequestFailure>;

enum Reply {
    Ready(Outcome),
    /// Held until the test sends the outcome
    Gated(oneshot::Receiver<Outcome>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Replies per `(method, path)` in FIFO order; unscripted requests fail as network errors
#[derive(Default)]
pub struct MockGateway {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn ok(&self, method: Method, path: &str, value: Value) {
        self.push(method, path, Reply::Ready(Ok(value)));
    }

    pub fn fail(&self, method: Method, path: &str, failure: RequestFailure) {
        self.push(method, path, Reply::Ready(Err(failure)));
    }

    pub fn gate(&self, method: Method, path: &str) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.push(method, path, Reply::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }
}

#[async_trait(?Send)]
impl RequestGateway for MockGateway {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, RequestFailure> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Ready(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(RequestFailure::Network { reason: "gate dropped".to_string() })
            }),
            None => Err(RequestFailure::Network {
                reason: format!("unscripted {} {}", method, path),
            }),
        }
    }
}

pub fn client_error(status: u16, payload: Value) -> RequestFailure {
    RequestFailure::ClientError { status, payload }
}

pub fn server_error() -> RequestFailure {
    RequestFailure::ServerError { status: 500, payload: Value::Null }
}

//! Browser Transport
//!
//! `gloo-net` requests with an `AbortController` wired to a timer, so a
//! request that outlives the configured timeout fails as a network error.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use web_sys::AbortController;

use super::{Method, OutgoingRequest, RawResponse, Transport, TransportError};

pub struct FetchTransport;

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        let controller = AbortController::new()
            .map_err(|err| TransportError::Failed(format!("abort controller: {:?}", err)))?;
        let signal = controller.signal();

        let mut outgoing = builder(request.method, &request.url).abort_signal(Some(&signal));
        for (name, value) in &request.headers {
            outgoing = outgoing.header(name, value);
        }
        let outgoing = match request.body {
            Some(body) => outgoing.body(body),
            None => outgoing.build(),
        }
        .map_err(|err| TransportError::Failed(err.to_string()))?;

        let millis = u32::try_from(request.timeout.as_millis()).unwrap_or(u32::MAX);
        let timer = Timeout::new(millis, move || controller.abort());
        let sent = outgoing.send().await;
        // Dropping the timer cancels it
        drop(timer);

        let response = match sent {
            Ok(response) => response,
            Err(_) if signal.aborted() => return Err(TransportError::Timeout(request.timeout)),
            Err(err) => return Err(TransportError::Failed(err.to_string())),
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::Failed(err.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

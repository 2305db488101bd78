use futures_util::StreamExt;
use reqwest::{Client, Method};

use crate::args::HttpMethod;

use super::dispatch::TransportError;
use super::request::RequestDescriptor;

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

const fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

/// Sends the request and drains the response so the status reflects a complete exchange.
pub(super) async fn execute_request(
    client: &Client,
    request: &RequestDescriptor,
) -> Result<u16, TransportError> {
    let mut builder = client.request(reqwest_method(request.method), request.url.clone());
    if let Some(payload) = request.payload.as_ref() {
        builder = builder.body(payload.clone());
    }
    let response = builder.send().await?;
    let status = response.status().as_u16();
    drain_response_body(response).await?;
    Ok(status)
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

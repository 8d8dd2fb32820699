//! Client
//!
//! Async HTTP client for a running SquirrelStore server. Used by the CLI
//! binary and the end-to-end tests.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use bytes::Bytes;
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::error::{Result, SquirrelError};
use crate::repository::SquirrelRecord;
use crate::router::COLLECTION_PATH;

/// Largest response body the client accepts (16 MB)
const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// A persistent HTTP/1.1 connection to the server
pub struct Client {
    sender: SendRequest<Body>,

    /// Value for the `Host` header
    host: String,
}

impl Client {
    /// Connect to `addr` (host:port)
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| SquirrelError::Network(format!("failed to connect to {}: {}", addr, e)))?;
        stream.set_nodelay(true)?;

        let (sender, connection) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(http_error)?;

        // Drives the connection until either side closes it
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!("Client connection closed: {}", e);
            }
        });

        Ok(Self {
            sender,
            host: addr.to_string(),
        })
    }

    /// Build a request against this server with an optional form body
    pub fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
    ) -> Result<Request<Body>> {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::HOST, &self.host);

        let request = match form {
            Some(pairs) => {
                let body = serde_urlencoded::to_string(pairs)
                    .map_err(|e| SquirrelError::Validation(e.to_string()))?;
                builder
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
            }
            None => builder.body(Body::empty()),
        };

        request.map_err(|e| SquirrelError::Network(format!("invalid request: {}", e)))
    }

    /// Send a request and collect the whole response
    pub async fn send(&mut self, request: Request<Body>) -> Result<Response<Bytes>> {
        self.sender.ready().await.map_err(http_error)?;

        let response = self.sender.send_request(request).await.map_err(http_error)?;
        let (parts, body) = response.into_parts();
        let body = to_bytes(Body::new(body), MAX_RESPONSE_SIZE)
            .await
            .map_err(|e| SquirrelError::Network(format!("failed to read response: {}", e)))?;

        Ok(Response::from_parts(parts, body))
    }

    // =========================================================================
    // Squirrel Operations
    // =========================================================================

    /// GET /squirrels
    pub async fn list(&mut self) -> Result<Vec<SquirrelRecord>> {
        let request = self.request(Method::GET, COLLECTION_PATH, None)?;
        let response = expect_status(self.send(request).await?, StatusCode::OK, None)?;
        Ok(serde_json::from_slice(response.body())?)
    }

    /// GET /squirrels/{id}
    pub async fn get(&mut self, id: u64) -> Result<SquirrelRecord> {
        let request = self.request(Method::GET, &item_path(id), None)?;
        let response = expect_status(self.send(request).await?, StatusCode::OK, Some(id))?;
        Ok(serde_json::from_slice(response.body())?)
    }

    /// POST /squirrels
    pub async fn create(&mut self, name: &str, size: &str) -> Result<SquirrelRecord> {
        let request = self.request(
            Method::POST,
            COLLECTION_PATH,
            Some(&[("name", name), ("size", size)][..]),
        )?;
        let response = expect_status(self.send(request).await?, StatusCode::CREATED, None)?;
        Ok(serde_json::from_slice(response.body())?)
    }

    /// PUT /squirrels/{id}
    pub async fn replace(&mut self, id: u64, name: &str, size: &str) -> Result<()> {
        let request = self.request(
            Method::PUT,
            &item_path(id),
            Some(&[("name", name), ("size", size)][..]),
        )?;
        expect_status(self.send(request).await?, StatusCode::NO_CONTENT, Some(id))?;
        Ok(())
    }

    /// DELETE /squirrels/{id}
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        let request = self.request(Method::DELETE, &item_path(id), None)?;
        expect_status(self.send(request).await?, StatusCode::NO_CONTENT, Some(id))?;
        Ok(())
    }
}

fn item_path(id: u64) -> String {
    format!("{}/{}", COLLECTION_PATH, id)
}

fn http_error(e: hyper::Error) -> SquirrelError {
    SquirrelError::Network(format!("HTTP error: {}", e))
}

/// Map an unexpected status back onto the error it reports
fn expect_status(
    response: Response<Bytes>,
    expected: StatusCode,
    id: Option<u64>,
) -> Result<Response<Bytes>> {
    if response.status() == expected {
        return Ok(response);
    }

    let text = String::from_utf8_lossy(response.body()).into_owned();

    Err(match (response.status(), id) {
        (StatusCode::NOT_FOUND, Some(id)) => SquirrelError::NotFound(id),
        (StatusCode::BAD_REQUEST, _) => SquirrelError::Validation(text),
        (StatusCode::PAYLOAD_TOO_LARGE, _) => SquirrelError::PayloadTooLarge(text),
        (status, _) => {
            SquirrelError::Network(format!("unexpected response {}: {}", status, text))
        }
    })
}

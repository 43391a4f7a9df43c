use std::sync::Mutex;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::types::ClientError;

use super::super::api::{RpcRequest, RpcResponse};

pub const SESSION_HEADER: &str = "X-Transmission-Session-Id";

/// JSON-RPC transport holding the CSRF session id Transmission hands out.
pub struct RpcTransport {
    http: Client,
    url: String,
    credentials: Option<(String, String)>,
    session_id: Mutex<Option<String>>,
}

impl RpcTransport {
    pub fn new(
        url: impl Into<String>,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
            credentials,
            session_id: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs one RPC call. A 409 answer carries a fresh session id; the
    /// request is repeated once with it.
    pub async fn call<A, T>(&self, method: &str, arguments: A) -> Result<T, ClientError>
    where
        A: Serialize,
        T: DeserializeOwned + Default,
    {
        let request = RpcRequest { method, arguments };
        let mut response = self.send(&request).await?;

        if response.status() == StatusCode::CONFLICT {
            let session_id = response
                .headers()
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string())
                .ok_or_else(|| {
                    ClientError::Rpc(format!("{method} returned 409 without a session id"))
                })?;
            debug!(method, "Negotiated new Transmission session id");
            self.store_session_id(session_id);
            response = self.send(&request).await?;
        }

        if !response.status().is_success() {
            return Err(ClientError::Rpc(format!(
                "{} returned {}",
                method,
                response.status()
            )));
        }

        let envelope: RpcResponse<T> = response.json().await?;
        if envelope.result != "success" {
            return Err(ClientError::Rpc(format!("{method}: {}", envelope.result)));
        }
        Ok(envelope.arguments.unwrap_or_default())
    }

    async fn send<A: Serialize>(&self, request: &RpcRequest<'_, A>) -> Result<Response, ClientError> {
        let mut builder = self.http.post(&self.url).json(request);
        if let Some((user, password)) = &self.credentials {
            builder = builder.basic_auth(user, Some(password));
        }
        if let Some(session_id) = self.current_session_id() {
            builder = builder.header(SESSION_HEADER, session_id);
        }
        Ok(builder.send().await?)
    }

    fn current_session_id(&self) -> Option<String> {
        self.session_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store_session_id(&self, id: String) {
        *self
            .session_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(id);
    }
}

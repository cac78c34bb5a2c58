//! Docker Engine API adapter.
//!
//! Speaks HTTP/1.1 to the engine's unix socket. Each call opens its own
//! connection, so one `DockerEngine` can be shared by any number of
//! concurrent requests without locking.

use crate::client::{EngineClient, ServiceCreateOptions};
use crate::error::EngineError;
use async_trait::async_trait;
use bytes::Bytes;
use flotilla_core::config::EngineConfig;
use flotilla_core::spec::EngineServiceSpec;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderValue, Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use std::path::PathBuf;
use tokio::net::UnixStream;
use tracing::{debug, info, warn};

const REGISTRY_AUTH: &str = "X-Registry-Auth";

/// Bytes escaped when a caller value becomes a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

pub struct DockerEngine {
    socket: PathBuf,
    api_version: String,
    user_agent: HeaderValue,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Warnings", default)]
    warnings: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl DockerEngine {
    /// Build a client without contacting the engine.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| EngineError::Request(e.into()))?;
        Ok(Self {
            socket: config.socket.clone(),
            api_version: config.api_version.clone(),
            user_agent,
        })
    }

    /// Build a client and check the engine answers a ping.
    pub async fn connect(config: &EngineConfig) -> Result<Self, EngineError> {
        let engine = Self::new(config)?;
        engine.ping().await?;
        info!(
            socket = %engine.socket.display(),
            api_version = %engine.api_version,
            "Connected to engine"
        );
        Ok(engine)
    }

    fn request(&self, method: Method, endpoint: &str) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(format!("/v{}{}", self.api_version, endpoint))
            .header(HOST, "docker")
            .header(USER_AGENT, self.user_agent.clone())
    }

    async fn send(&self, request: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes), EngineError> {
        let stream = UnixStream::connect(&self.socket)
            .await
            .map_err(|source| EngineError::Connect {
                path: self.socket.display().to_string(),
                source,
            })?;

        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream)).await?;
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "Engine connection closed with error");
            }
        });

        let response = sender.send_request(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();
        Ok((status, body))
    }
}

#[async_trait]
impl EngineClient for DockerEngine {
    async fn service_create(
        &self,
        spec: &EngineServiceSpec,
        options: &ServiceCreateOptions,
    ) -> Result<String, EngineError> {
        let body = serde_json::to_vec(spec)?;
        let mut builder = self
            .request(Method::POST, "/services/create")
            .header(CONTENT_TYPE, "application/json");
        if let Some(auth) = &options.registry_auth {
            builder = builder.header(REGISTRY_AUTH, auth.as_str());
        }
        let request = builder.body(Full::new(Bytes::from(body)))?;

        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let created: CreateResponse = serde_json::from_slice(&body)
            .map_err(|e| EngineError::InvalidResponse(format!("service create: {e}")))?;
        for warning in created.warnings.unwrap_or_default() {
            warn!(service = %spec.annotations.name, warning = %warning, "Engine warning");
        }
        Ok(created.id)
    }

    async fn service_remove(&self, ident: &str) -> Result<(), EngineError> {
        let segment = utf8_percent_encode(ident, PATH_SEGMENT);
        let request = self
            .request(Method::DELETE, &format!("/services/{segment}"))
            .body(Full::new(Bytes::new()))?;

        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), EngineError> {
        let request = self
            .request(Method::GET, "/_ping")
            .body(Full::new(Bytes::new()))?;

        let (status, body) = self.send(request).await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(())
    }
}

/// Decode the engine's `{"message": ...}` error body, falling back to raw text.
fn api_error(status: StatusCode, body: &[u8]) -> EngineError {
    let message = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                status.canonical_reason().unwrap_or("engine error").to_string()
            } else {
                text
            }
        }
    };
    EngineError::Api {
        status: status.as_u16(),
        message,
    }
}

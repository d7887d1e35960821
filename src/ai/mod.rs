pub mod models;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::is_placeholder;
use models::{GenerateContentRequest, GenerateContentResponse, PredictRequest, PredictResponse};

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com";
const TEXT_MODEL: &str = "gemini-1.5-flash-latest:generateContent";
const IMAGE_MODEL: &str = "imagen-3.0-generate-002:predict";

/// Which upstream a failure came from; picks the wording users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Text,
    Image,
    Inspiration,
}

/// Failure of a single outbound call. `Display` is for logs, users get
/// [`BridgeError::user_message`].
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("API key is not configured")]
    NotConfigured,
    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("response body is not JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("transport failure: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for BridgeError {
    fn from(e: reqwest::Error) -> Self {
        // the request URL carries the API key
        BridgeError::Transport(e.without_url())
    }
}

impl BridgeError {
    pub fn user_message(&self, service: Service) -> String {
        match (service, self) {
            (Service::Text, BridgeError::NotConfigured) => {
                "Error: Gemini API Key is not configured. Please contact the bot owner.".to_string()
            }
            (Service::Image, BridgeError::NotConfigured) => {
                "Error: API Key is not configured.".to_string()
            }
            (Service::Text, BridgeError::Status { status, .. }) => format!(
                "Sorry, I couldn't get a response from the AI. (Error: {})",
                status.as_u16()
            ),
            (Service::Image, BridgeError::Status { status, .. }) => format!(
                "Sorry, I couldn't generate an image. (Error: {})",
                status.as_u16()
            ),
            (Service::Text, BridgeError::UnexpectedShape(_) | BridgeError::Decode(_)) => {
                "The AI returned an unusual response. Please try again.".to_string()
            }
            (Service::Image, BridgeError::UnexpectedShape(_) | BridgeError::Decode(_)) => {
                "The AI generated an invalid image response.".to_string()
            }
            (Service::Text, BridgeError::Transport(_) | BridgeError::Malformed(_)) => {
                "An error occurred while trying to contact the AI service.".to_string()
            }
            (Service::Image, BridgeError::Transport(_) | BridgeError::Malformed(_)) => {
                "An error occurred while trying to contact the image generation service."
                    .to_string()
            }
            (Service::Inspiration, BridgeError::Transport(_) | BridgeError::Malformed(_)) => {
                "An error occurred while contacting InspiroBot.".to_string()
            }
            (Service::Inspiration, _) => {
                "Sorry, I couldn't get inspiration from InspiroBot right now.".to_string()
            }
        }
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self {
            client,
            api_key,
            base_url: GOOGLE_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !is_placeholder(&self.api_key)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}", self.base_url.trim_end_matches('/'), model)
    }

    /// One POST to the text model, returning the first candidate's first text part.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, BridgeError> {
        if !self.is_configured() {
            return Err(BridgeError::NotConfigured);
        }

        debug!("Sending text request to Gemini API ({} chars)", prompt.len());

        let response = self
            .client
            .post(self.endpoint(TEXT_MODEL))
            .query(&[("key", &self.api_key)])
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("Gemini API request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("Gemini API failed to read body: {}", e))?;
        interpret_text(status, &body)
    }

    /// One POST to the image model, returning the decoded image bytes.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, BridgeError> {
        if !self.is_configured() {
            return Err(BridgeError::NotConfigured);
        }

        debug!("Sending image request to Imagen API ({} chars)", prompt.len());

        let response = self
            .client
            .post(self.endpoint(IMAGE_MODEL))
            .query(&[("key", &self.api_key)])
            .json(&PredictRequest::new(prompt))
            .send()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("Imagen API request failed: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("Imagen API failed to read body: {}", e))?;
        interpret_image(status, &body)
    }
}

fn check_status(api: &str, status: StatusCode, body: &str) -> Result<Value, BridgeError> {
    if status != StatusCode::OK {
        error!("{} API error: {} - {}", api, status.as_u16(), body);
        return Err(BridgeError::Status {
            status,
            body: body.to_string(),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        error!("{} API returned a non-JSON body: {}", api, e);
        BridgeError::Malformed(e)
    })
}

pub fn interpret_text(status: StatusCode, body: &str) -> Result<String, BridgeError> {
    let payload = check_status("Gemini", status, body)?;

    serde_json::from_value::<GenerateContentResponse>(payload.clone())
        .ok()
        .and_then(GenerateContentResponse::into_first_text)
        .ok_or_else(|| {
            warn!("Gemini API returned unexpected data: {}", payload);
            BridgeError::UnexpectedShape(payload.to_string())
        })
}

pub fn interpret_image(status: StatusCode, body: &str) -> Result<Vec<u8>, BridgeError> {
    let payload = check_status("Imagen", status, body)?;

    let encoded = serde_json::from_value::<PredictResponse>(payload.clone())
        .ok()
        .and_then(PredictResponse::into_first_payload)
        .ok_or_else(|| {
            warn!("Imagen API returned unexpected data: {}", payload);
            BridgeError::UnexpectedShape(payload.to_string())
        })?;

    STANDARD.decode(encoded.trim()).map_err(|e| {
        warn!("Imagen API returned an undecodable image: {}", e);
        BridgeError::Decode(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    const TEXT_OK: &str =
        r#"{"candidates":[{"content":{"parts":[{"text":"Roses are red"}],"role":"model"}}]}"#;

    #[test]
    fn well_formed_text_body_yields_nested_text() {
        assert_eq!(interpret_text(StatusCode::OK, TEXT_OK).unwrap(), "Roses are red");
    }

    #[test]
    fn missing_candidates_is_an_unusual_response() {
        let err = interpret_text(StatusCode::OK, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnexpectedShape(_)));
        assert_eq!(
            err.user_message(Service::Text),
            "The AI returned an unusual response. Please try again."
        );
    }

    #[test]
    fn error_statuses_are_reported_with_their_code() {
        for code in [404u16, 500] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = interpret_text(status, "boom").unwrap_err();
            assert!(err.user_message(Service::Text).contains(&code.to_string()));

            let err = interpret_image(status, "boom").unwrap_err();
            assert!(err.user_message(Service::Image).contains(&code.to_string()));
        }
    }

    #[test]
    fn non_json_body_reads_as_unreachable() {
        let err = interpret_text(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, BridgeError::Malformed(_)));
        assert_eq!(
            err.user_message(Service::Text),
            "An error occurred while trying to contact the AI service."
        );
    }

    #[test]
    fn image_payload_round_trips() {
        let bytes: Vec<u8> = (0..=255u8).chain([0x89, b'P', b'N', b'G']).collect();
        let body = json!({ "predictions": [{ "bytesBase64Encoded": STANDARD.encode(&bytes) }] });

        let decoded = interpret_image(StatusCode::OK, &body.to_string()).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn bad_image_payloads_are_invalid_responses() {
        for body in [
            json!({ "predictions": [] }),
            json!({ "predictions": [{ "mimeType": "image/png" }] }),
            json!({ "predictions": [{ "bytesBase64Encoded": "!!not base64!!" }] }),
        ] {
            let err = interpret_image(StatusCode::OK, &body.to_string()).unwrap_err();
            assert_eq!(
                err.user_message(Service::Image),
                "The AI generated an invalid image response."
            );
        }
    }

    #[test]
    fn user_messages_never_echo_upstream_bodies() {
        let err = BridgeError::Status {
            status: StatusCode::FORBIDDEN,
            body: "API key AIzaSecret is invalid".to_string(),
        };
        assert!(!err.user_message(Service::Text).contains("AIzaSecret"));
    }

    struct Stub {
        base_url: String,
        hits: Arc<AtomicUsize>,
    }

    async fn serve(status: AxumStatus, body: Value) -> Stub {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/v1beta/models/:model",
            post(move |Query(query): Query<HashMap<String, String>>| {
                let counter = counter.clone();
                let body = body.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(query.get("key").map(String::as_str), Some("AIzaTestKey"));
                    (status, Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Stub {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    fn client(key: &str, stub: &Stub) -> GeminiClient {
        GeminiClient::new(Client::new(), key.to_string()).with_base_url(&stub.base_url)
    }

    #[tokio::test]
    async fn text_call_hits_endpoint_once() {
        let stub = serve(AxumStatus::OK, serde_json::from_str(TEXT_OK).unwrap()).await;

        let text = client("AIzaTestKey", &stub).generate_text("poem").await.unwrap();
        assert_eq!(text, "Roses are red");
        assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn placeholder_key_skips_the_request() {
        let stub = serve(AxumStatus::OK, serde_json::from_str(TEXT_OK).unwrap()).await;

        for key in ["", "YOUR_GEMINI_API_KEY"] {
            let err = client(key, &stub).generate_text("poem").await.unwrap_err();
            assert_eq!(
                err.user_message(Service::Text),
                "Error: Gemini API Key is not configured. Please contact the bot owner."
            );
            let err = client(key, &stub).generate_image("a cat").await.unwrap_err();
            assert!(matches!(err, BridgeError::NotConfigured));
        }
        assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_failure_status_surfaces_code() {
        let stub = serve(AxumStatus::INTERNAL_SERVER_ERROR, json!({ "error": "nope" })).await;

        let err = client("AIzaTestKey", &stub).generate_text("poem").await.unwrap_err();
        assert_eq!(
            err.user_message(Service::Text),
            "Sorry, I couldn't get a response from the AI. (Error: 500)"
        );
        assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn image_call_decodes_payload() {
        let stub = serve(
            AxumStatus::OK,
            json!({ "predictions": [{ "bytesBase64Encoded": STANDARD.encode(b"PNGDATA") }] }),
        )
        .await;

        let bytes = client("AIzaTestKey", &stub).generate_image("a cat").await.unwrap();
        assert_eq!(bytes, b"PNGDATA");
        assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
    }

    /// Answers every connection with a header promising more body than it sends.
    async fn serve_truncated() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                tokio::spawn(async move {
                    let mut request = [0u8; 4096];
                    let _ = socket.read(&mut request).await;
                    let _ = socket
                        .write_all(
                            b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                              content-length: 500\r\nconnection: close\r\n\r\n{\"candi",
                        )
                        .await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn cut_off_body_is_a_transport_error() {
        let gemini = GeminiClient::new(Client::new(), "AIzaTestKey".to_string())
            .with_base_url(serve_truncated().await);

        let err = gemini.generate_text("poem").await.unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(
            err.user_message(Service::Text),
            "An error occurred while trying to contact the AI service."
        );

        let err = gemini.generate_image("a cat").await.unwrap_err();
        assert!(matches!(err, BridgeError::Transport(_)));
        assert_eq!(
            err.user_message(Service::Image),
            "An error occurred while trying to contact the image generation service."
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gemini = GeminiClient::new(Client::new(), "AIzaTestKey".to_string())
            .with_base_url(format!("http://{addr}"));
        let err = gemini.generate_text("poem").await.unwrap_err();

        assert!(matches!(err, BridgeError::Transport(_)));
        assert!(!err.to_string().contains("AIzaTestKey"));
    }
}

use chrono::Utc;
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::ai::BridgeError;

pub const INSPIROBOT_BASE: &str = "https://inspirobot.me";

/// Client for inspirobot.me, which answers with a bare image URL.
pub struct InspiroBot {
    client: Client,
    base_url: String,
}

impl InspiroBot {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: INSPIROBOT_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn generate(&self) -> Result<String, BridgeError> {
        let url = format!("{}/api", self.base_url.trim_end_matches('/'));
        let stamp = Utc::now().timestamp().to_string();
        debug!("Requesting image from InspiroBot (t={})", stamp);

        let response = self
            .client
            .get(url)
            .query(&[("generate", "true"), ("t", stamp.as_str())])
            .send()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("Inspirobot Error: {}", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(BridgeError::from)
            .inspect_err(|e| error!("InspiroBot failed to read body: {}", e))?;
        if status != StatusCode::OK {
            error!("InspiroBot returned {}: {}", status.as_u16(), body);
            return Err(BridgeError::Status { status, body });
        }

        let image_url = body.trim();
        if image_url.is_empty() {
            return Err(BridgeError::UnexpectedShape(body));
        }
        Ok(image_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Service;
    use axum::extract::Query;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    async fn serve(status: AxumStatus, body: &'static str) -> String {
        let app = Router::new().route(
            "/api",
            get(move |Query(query): Query<HashMap<String, String>>| async move {
                assert_eq!(query.get("generate").map(String::as_str), Some("true"));
                assert!(query.get("t").is_some_and(|t| t.parse::<i64>().is_ok()));
                (status, body)
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn returns_trimmed_image_url() {
        let base = serve(AxumStatus::OK, "https://generated.inspirobot.me/a/xyz.jpg\n").await;

        let url = InspiroBot::new(Client::new()).with_base_url(base).generate().await.unwrap();
        assert_eq!(url, "https://generated.inspirobot.me/a/xyz.jpg");
    }

    #[tokio::test]
    async fn failure_status_gets_the_apology() {
        let base = serve(AxumStatus::SERVICE_UNAVAILABLE, "down").await;

        let err = InspiroBot::new(Client::new()).with_base_url(base).generate().await.unwrap_err();
        assert_eq!(
            err.user_message(Service::Inspiration),
            "Sorry, I couldn't get inspiration from InspiroBot right now."
        );
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::extractor::{EntityExtractor, ExtractionError};
use crate::models::EntitySpan;

/// HTTP client for a remote named-entity-recognition service
///
/// Sends `{"text", "model"}` and expects a document with an `ents` array of
/// `{text, label}` objects, the shape spaCy-style model servers return.
pub struct RemoteNerExtractor {
    endpoint: String,
    model: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct NerDocument {
    #[serde(alias = "entities")]
    ents: Vec<NerEntity>,
}

#[derive(Debug, Deserialize)]
struct NerEntity {
    text: String,
    #[serde(alias = "label_")]
    label: String,
}

impl RemoteNerExtractor {
    /// Create a new remote extractor
    pub fn new(
        endpoint: impl Into<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            model,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EntityExtractor for RemoteNerExtractor {
    async fn extract_entities(&self, text: &str) -> Result<Vec<EntitySpan>, ExtractionError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = NerRequest {
            text,
            model: self.model.as_deref(),
        };

        tracing::debug!("Requesting entities from: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("NER service returned {}: {}", status, body);
            return Err(ExtractionError::ApiError(format!(
                "NER service returned {}",
                status
            )));
        }

        let document: NerDocument = response
            .json()
            .await
            .map_err(|e| {
                ExtractionError::InvalidResponse(format!("Failed to parse entities: {}", e))
            })?;

        Ok(document
            .ents
            .into_iter()
            .map(|e| EntitySpan::new(e.text, e.label))
            .collect())
    }

    fn name(&self) -> &str {
        "remote-ner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(url: String) -> RemoteNerExtractor {
        RemoteNerExtractor::new(url, Some("tech-ner".to_string()), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_parses_entities() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ents")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "text": "Python and Kafka at Acme",
                "model": "tech-ner",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ents": [
                    {"text": "Python", "label": "TECH", "start": 0, "end": 6},
                    {"text": "Kafka", "label": "TECH", "start": 11, "end": 16},
                    {"text": "Acme", "label": "ORG", "start": 20, "end": 24}
                ]}"#,
            )
            .create_async()
            .await;

        let spans = extractor(format!("{}/ents", server.url()))
            .extract_entities("Python and Kafka at Acme")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            spans,
            vec![
                EntitySpan::new("Python", "TECH"),
                EntitySpan::new("Kafka", "TECH"),
                EntitySpan::new("Acme", "ORG"),
            ]
        );
    }

    #[tokio::test]
    async fn test_accepts_entities_alias() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"entities": [{"text": "Rust", "label_": "TECH"}]}"#)
            .create_async()
            .await;

        let spans = extractor(format!("{}/ents", server.url()))
            .extract_entities("Rust")
            .await
            .unwrap();

        assert_eq!(spans, vec![EntitySpan::new("Rust", "TECH")]);
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ents")
            .with_status(503)
            .with_body("model loading")
            .create_async()
            .await;

        let err = extractor(format!("{}/ents", server.url()))
            .extract_entities("Rust")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::ApiError(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/ents")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tokens": []}"#)
            .create_async()
            .await;

        let err = extractor(format!("{}/ents", server.url()))
            .extract_entities("Rust")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_text_skips_request() {
        let server = mockito::Server::new_async().await;
        let spans = extractor(format!("{}/ents", server.url()))
            .extract_entities("")
            .await
            .unwrap();
        assert!(spans.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        let err = extractor("http://127.0.0.1:9/ents".to_string())
            .extract_entities("Rust")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::RequestError(_)));
    }
}

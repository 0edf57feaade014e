//! Hugging Face inference endpoint classifier

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{Classification, TextClassifier};
use crate::config::ServicesConfig;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<Classification>>),
    Flat(Vec<Classification>),
}

impl InferenceResponse {
    fn into_top(self) -> Option<Classification> {
        let candidates = match self {
            Self::Nested(outer) => outer.into_iter().flatten().collect::<Vec<_>>(),
            Self::Flat(flat) => flat,
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// `POST {endpoint}/{model}` with `{"inputs": text}`
#[derive(Debug, Clone)]
pub struct HfClassifier {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HfClassifier {
    pub fn from_config(services: &ServicesConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Classifier(e.to_string()))?;
        Ok(Self {
            client,
            url: format!(
                "{}/{}",
                services.classifier_endpoint.trim_end_matches('/'),
                services.classifier_model
            ),
            token: std::env::var(&services.classifier_token_env).ok(),
        })
    }
}

#[async_trait]
impl TextClassifier for HfClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "inputs": text }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Error::Classifier(format!("HTTP {}", response.status())));
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| Error::Classifier(e.to_string()))?;
        body.into_top()
            .ok_or_else(|| Error::Classifier("empty classification".to_string()))
    }
}

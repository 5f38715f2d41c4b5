//! Ollama inference client and availability check

use serde::Deserialize;
use std::time::Duration;
use log::{debug, trace, error, info, warn};

// ===== Wire Types =====

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTagsResponse
{   #[serde(default)]
    pub models: Vec<OllamaModel>
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel
{   pub name: String
  , #[serde(default)]
    pub size: Option<u64>
}

// ===== Ollama Client =====

/// Client for a locally hosted Ollama server
#[derive(Debug, Clone)]
pub struct OllamaClient
{   base_url: String
  , timeout: Duration
  , probe_timeout: Duration
  , http_client: reqwest::Client
}

impl OllamaClient
{   pub fn new(
      base_url: impl Into<String>
    , timeout: Duration
    , probe_timeout: Duration
    ) -> Self
    {   let base_url = base_url.into()
          .trim_end_matches('/')
          .to_string();
        debug!("Creating OllamaClient for {}", base_url);
        OllamaClient
        {   base_url
          , timeout
          , probe_timeout
          , http_client: reqwest::Client::new()
        }
    }

    pub fn from_config(config: &crate::config::AppConfig) -> Self
    {   OllamaClient::new(
          config.ollama.base_url.clone()
        , config.inference_timeout()
        , config.probe_timeout()
        )
    }

    pub fn base_url(&self) -> &str
    {   &self.base_url
    }

    /// List installed models via `GET /api/tags`
    pub async fn list_models(
      &self
    ) -> Result<Vec<String>, crate::error::Error>
    {   debug!("Handling list_models");

        let response = self.http_client
          .get(format!("{}/api/tags", self.base_url))
          .timeout(self.probe_timeout)
          .send()
          .await
          .map_err(|e| {
            error!("Failed to reach Ollama: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Tags response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("Failed to list models: {}", error_text);
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        let tags: OllamaTagsResponse
          = response.json().await.map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        let model_names: Vec<String>
          = tags.models
            .iter()
            .map(|m| m.name.clone())
            .collect();

        debug!("Retrieved {} models", model_names.len());
        Ok(model_names)
    }
}

#[async_trait::async_trait]
impl crate::AvailabilityProbe for OllamaClient
{   async fn probe(&self) -> bool
    {   match self.list_models().await
        {   Ok(models) => {
              info!("Available models: {:?}", models);
              true
            }
          , Err(e) => {
              warn!("Error checking Ollama: {}", e);
              false
            }
        }
    }
}

#[async_trait::async_trait]
impl crate::InferenceClient for OllamaClient
{   async fn send_generate(
      &self
    , request: &crate::GenerateRequest
    ) -> Result<crate::GenerateReply, crate::error::Error>
    {   debug!("Handling send_generate for: {}", request.model);
        trace!("Ollama request: {:?}", request);

        let response = self.http_client
          .post(format!("{}/api/generate", self.base_url))
          .timeout(self.timeout)
          .json(request)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status().as_u16();
        trace!("Ollama response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read Ollama body: {}", e);
          crate::error::Error::from(e)
        })?;

        Ok(crate::GenerateReply
        {   status
          , body
        })
    }
}

//! Chat request pipeline: probe, validate, enrich, infer, respond

use std::sync::Arc;
use log::{debug, trace, error, info};

use crate::failover::{retry_with_backoff, RetryPolicy};
use crate::providers::serpapi::{video_query, wants_videos};

/// System instruction sent with every prompt
pub const SYSTEM_PROMPT: &str
  = "Anda adalah asisten AI berbahasa Indonesia. \
     Berikan jawaban yang jelas dan informatif.";

/// Fixed per-process settings of the pipeline
#[derive(Debug, Clone)]
pub struct ChatSettings
{   pub model: String
  , pub system_prompt: String
  , pub retry: RetryPolicy
  , pub augment_prompt: bool
}

impl Default for ChatSettings
{   fn default() -> Self
    {   ChatSettings
        {   model: "llama3".to_string()
          , system_prompt: SYSTEM_PROMPT.to_string()
          , retry: RetryPolicy::default()
          , augment_prompt: false
        }
    }
}

impl From<&crate::config::AppConfig> for ChatSettings
{   fn from(config: &crate::config::AppConfig) -> Self
    {   ChatSettings
        {   model: config.ollama.model.clone()
          , system_prompt: SYSTEM_PROMPT.to_string()
          , retry: RetryPolicy::from(&config.retry)
          , augment_prompt: config.augment_prompt
        }
    }
}

/// Search handles; both come from the same provider key
#[derive(Clone)]
pub struct SearchHandles
{   pub web: Arc<dyn crate::WebSearch>
  , pub video: Arc<dyn crate::VideoSearch>
}

/// What the enrich step produced
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment
{   pub context: crate::SearchContext
  , pub videos: Vec<crate::VideoResult>
}

/// Runs one chat request: probe, validate, enrich, infer, respond
pub struct ChatOrchestrator
{   settings: ChatSettings
  , probe: Arc<dyn crate::AvailabilityProbe>
  , inference: Arc<dyn crate::InferenceClient>
  , search: Option<SearchHandles>
}

impl ChatOrchestrator
{   /// Orchestrator without search; see `with_search`
    pub fn new(
      settings: ChatSettings
    , probe: Arc<dyn crate::AvailabilityProbe>
    , inference: Arc<dyn crate::InferenceClient>
    ) -> Self
    {   debug!("Creating ChatOrchestrator for model: {}", settings.model);
        ChatOrchestrator
        {   settings
          , probe
          , inference
          , search: None
        }
    }

    pub fn with_search(
      mut self
    , web: Arc<dyn crate::WebSearch>
    , video: Arc<dyn crate::VideoSearch>
    ) -> Self
    {   self.search = Some(SearchHandles { web, video });
        self
    }

    pub fn settings(&self) -> &ChatSettings
    {   &self.settings
    }

    pub fn search_enabled(&self) -> bool
    {   self.search.is_some()
    }

    /// Handle one chat request end to end
    pub async fn handle(
      &self
    , request: crate::ChatRequest
    ) -> Result<crate::ChatResponse, crate::error::Error>
    {   let result = self.run(request).await;
        if let Err(e) = &result
        {   error!(
              "Chat request failed ({}): {}",
              e.status_code(), e
            );
        }
        result
    }

    async fn run(
      &self
    , request: crate::ChatRequest
    ) -> Result<crate::ChatResponse, crate::error::Error>
    {   // Probe
        if !self.probe.probe().await
        {   return Err(crate::error::Error::ServiceUnavailable);
        }

        // Validate
        let message = request.text()
          .ok_or(crate::error::Error::MissingMessage)?;
        debug!("Handling chat message ({} chars)", message.len());

        // Enrich
        let enrichment = self.enrich(message).await;
        trace!("Search context: {:?}", enrichment.context);

        // Infer
        let payload = self.build_payload(message, &enrichment.context);
        let reply = self.infer(&payload).await?;

        // Respond
        info!(
          "Answered chat message with {} video(s)",
          enrichment.videos.len()
        );
        Ok(crate::ChatResponse
        {   reply
          , videos: enrichment.videos
        })
    }

    /// Gather search context and videos; never fails
    pub async fn enrich(&self, message: &str) -> Enrichment
    {   let Some(search) = &self.search
        else
        {   return Enrichment
            {   context: crate::SearchContext::NotConfigured
              , videos: vec![]
            };
        };

        let context = search.web.search(message).await;

        let videos = if wants_videos(message)
        {   debug!("Message asks for a tutorial, searching videos");
            search.video
              .search_videos(&video_query(message))
              .await
        } else
        {   vec![]
        };

        Enrichment { context, videos }
    }

    /// The prompt is the raw message unless augmentation is on
    pub fn build_prompt(
      &self
    , message: &str
    , context: &crate::SearchContext
    ) -> String
    {   if self.settings.augment_prompt
        {   format!("{}{}", message, context.to_prompt_text())
        } else
        {   message.to_string()
        }
    }

    pub fn build_payload(
      &self
    , message: &str
    , context: &crate::SearchContext
    ) -> crate::GenerateRequest
    {   crate::GenerateRequest
        {   model: self.settings.model.clone()
          , prompt: self.build_prompt(message, context)
          , system: self.settings.system_prompt.clone()
          , stream: false
        }
    }

    /// Send with retries on transport failures, then interpret
    async fn infer(
      &self
    , payload: &crate::GenerateRequest
    ) -> Result<String, crate::error::Error>
    {   let inference: &dyn crate::InferenceClient = self.inference.as_ref();
        let reply = retry_with_backoff(&self.settings.retry, move |attempt| {
          trace!("Generate attempt {}", attempt + 1);
          inference.send_generate(payload)
        }).await?;

        if reply.status != 200
        {   error!("Ollama error response: {}", reply.body);
        }
        reply.into_text()
    }
}

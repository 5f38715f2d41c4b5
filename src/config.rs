//! Configuration for the inference service, search and retries

use serde::{Deserialize, Serialize};
use std::time::Duration;
use log::debug;

/// Inference (Ollama) service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig
{   /// API base URL, without trailing `/api/...`
    pub base_url: String
  , /// Model every prompt is sent to
    pub model: String
  , /// Per-attempt timeout for generate calls in seconds
    pub timeout_secs: u64
  , /// Timeout for the availability probe in seconds
    pub probe_timeout_secs: u64
}

impl Default for OllamaConfig
{   fn default() -> Self
    {   OllamaConfig
        {   base_url: "http://localhost:11434".to_string()
          , model: "llama3".to_string()
          , timeout_secs: 60
          , probe_timeout_secs: 5
        }
    }
}

/// Search provider (SerpApi) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig
{   /// API key; `None` disables web and video search
    #[serde(skip_serializing)]
    pub api_key: Option<String>
  , /// Search endpoint
    pub base_url: String
}

impl Default for SearchConfig
{   fn default() -> Self
    {   SearchConfig
        {   api_key: None
          , base_url: "https://serpapi.com/search".to_string()
        }
    }
}

/// Retry configuration for inference calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig
{   /// Total attempts including the first one
    pub max_attempts: usize
  , /// Backoff multiplier for retries
    pub backoff_multiplier: f32
  , /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64
}

impl Default for RetryConfig
{   fn default() -> Self
    {   RetryConfig
        {   max_attempts: 3
          , backoff_multiplier: 2.0
          , initial_backoff_ms: 1000
        }
    }
}

/// asisten configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig
{   /// Address the HTTP server binds to
    pub bind_addr: String
  , pub ollama: OllamaConfig
  , pub search: SearchConfig
  , pub retry: RetryConfig
  , /// Append search context to the prompt sent to the model
    pub augment_prompt: bool
}

impl Default for AppConfig
{   fn default() -> Self
    {   AppConfig
        {   bind_addr: "127.0.0.1:5000".to_string()
          , ollama: OllamaConfig::default()
          , search: SearchConfig::default()
          , retry: RetryConfig::default()
          , augment_prompt: false
        }
    }
}

impl AppConfig
{   /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   match dotenvy::dotenv()
        {   Ok(path) => debug!("Loaded environment from {}", path.display())
          , Err(e) => debug!("No .env file loaded: {}", e)
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep defaults
    pub fn from_lookup<F>(lookup: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   let mut config = AppConfig::default();

        if let Some(v) = lookup("BIND_ADDR")
        {   config.bind_addr = v;
        }
        if let Some(v) = lookup("OLLAMA_BASE_URL")
        {   config.ollama.base_url
              = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("OLLAMA_MODEL")
        {   config.ollama.model = v;
        }
        if let Some(v) = lookup("OLLAMA_TIMEOUT_SECS")
        {   config.ollama.timeout_secs
              = parse_var("OLLAMA_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("OLLAMA_PROBE_TIMEOUT_SECS")
        {   config.ollama.probe_timeout_secs
              = parse_var("OLLAMA_PROBE_TIMEOUT_SECS", &v)?;
        }
        config.search.api_key = lookup("SERPAPI_KEY")
          .filter(|k| !k.trim().is_empty());
        if let Some(v) = lookup("SERPAPI_BASE_URL")
        {   config.search.base_url = v;
        }
        if let Some(v) = lookup("RETRY_MAX_ATTEMPTS")
        {   config.retry.max_attempts
              = parse_var("RETRY_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("RETRY_INITIAL_BACKOFF_MS")
        {   config.retry.initial_backoff_ms
              = parse_var("RETRY_INITIAL_BACKOFF_MS", &v)?;
        }
        if let Some(v) = lookup("RETRY_BACKOFF_MULTIPLIER")
        {   config.retry.backoff_multiplier
              = parse_var("RETRY_BACKOFF_MULTIPLIER", &v)?;
        }
        if let Some(v) = lookup("AUGMENT_PROMPT")
        {   config.augment_prompt = parse_bool("AUGMENT_PROMPT", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.retry.max_attempts == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "RETRY_MAX_ATTEMPTS must be at least 1".to_string()
            ));
        }
        if self.retry.backoff_multiplier < 1.0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "RETRY_BACKOFF_MULTIPLIER must be >= 1.0".to_string()
            ));
        }
        if self.ollama.timeout_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "OLLAMA_TIMEOUT_SECS must be positive".to_string()
            ));
        }
        Ok(())
    }

    pub fn search_enabled(&self) -> bool
    {   self.search.api_key.is_some()
    }

    pub fn inference_timeout(&self) -> Duration
    {   Duration::from_secs(self.ollama.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration
    {   Duration::from_secs(self.ollama.probe_timeout_secs)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str)
  -> Result<T, crate::error::Error>
{   raw.trim().parse::<T>().map_err(|_| {
      crate::error::Error::InvalidConfiguration(
        format!("{} has invalid value '{}'", key, raw)
      )
    })
}

fn parse_bool(key: &str, raw: &str)
  -> Result<bool, crate::error::Error>
{   match raw.trim().to_ascii_lowercase().as_str()
    {   "1" | "true" | "yes" | "on" => Ok(true)
      , "0" | "false" | "no" | "off" | "" => Ok(false)
      , _ => Err(crate::error::Error::InvalidConfiguration(
          format!("{} has invalid value '{}'", key, raw)
        ))
    }
}

//! SerpApi web and video search

use serde_json::Value;
use log::{debug, trace, error, warn};

/// Web results kept per request
pub const MAX_SNIPPETS: usize = 3;
/// Video results kept per request
pub const MAX_VIDEOS: usize = 3;

/// Words that mark a message as asking to be taught something
pub const TUTORIAL_KEYWORDS: [&str; 7] = [
  "cara", "belajar", "jelaskan", "tutorial"
, "panduan", "kursus", "mengajar"
];

/// Prefix for the rewritten video query
const VIDEO_QUERY_PREFIX: &str = "tutorial terbaik";

/// True when the message should also be searched on YouTube
pub fn wants_videos(message: &str) -> bool
{   let lowered = message.to_lowercase();
    TUTORIAL_KEYWORDS.iter().any(|k| lowered.contains(k))
}

pub fn video_query(message: &str) -> String
{   format!("{} {}", VIDEO_QUERY_PREFIX, message)
}

// ===== Extraction =====

/// Pull up to three snippets out of a web search response.
/// Prefers a string `snippet`, falls back to joined highlighted
/// words; results with neither are skipped.
pub fn extract_snippets(results: &Value) -> Vec<String>
{   let Some(organic) = results
      .get("organic_results")
      .and_then(Value::as_array)
    else
    {   return vec![];
    };

    organic.iter()
      .take(MAX_SNIPPETS)
      .filter_map(|result| {
        if let Some(snippet) = result.get("snippet").and_then(Value::as_str)
        {   if !snippet.trim().is_empty()
            {   return Some(snippet.to_string());
            }
        }
        result.get("snippet_highlighted_words")
          .and_then(Value::as_array)
          .map(|words| {
            words.iter()
              .filter_map(Value::as_str)
              .collect::<Vec<_>>()
              .join(" ")
          })
          .filter(|joined| !joined.trim().is_empty())
      })
      .collect()
}

/// Turn a snippet list into the tagged context
pub fn context_from_snippets(snippets: Vec<String>) -> crate::SearchContext
{   if snippets.is_empty()
    {   crate::SearchContext::NoResults
    } else
    {   crate::SearchContext::Snippets(snippets)
    }
}

/// Pull up to three video records out of a video search response.
/// Missing fields become empty strings.
pub fn extract_videos(results: &Value) -> Vec<crate::VideoResult>
{   let Some(videos) = results
      .get("video_results")
      .and_then(Value::as_array)
    else
    {   return vec![];
    };

    videos.iter()
      .take(MAX_VIDEOS)
      .map(|video| crate::VideoResult
      {   title: field(video, "title")
        , link: field(video, "link")
        , thumbnail_url: video.get("thumbnail")
            .map(|t| field(t, "static"))
            .unwrap_or_default()
        , duration: field(video, "duration")
        , views: field(video, "views")
        , description: field(video, "description")
      })
      .collect()
}

fn field(value: &Value, key: &str) -> String
{   value.get(key).map(text_of).unwrap_or_default()
}

/// Strings as-is, numbers and booleans printed, anything else empty
fn text_of(value: &Value) -> String
{   match value
    {   Value::String(s) => s.clone()
      , Value::Number(n) => n.to_string()
      , Value::Bool(b) => b.to_string()
      , _ => String::new()
    }
}

// ===== SerpApi Client =====

/// Client for the SerpApi search endpoint
#[derive(Debug, Clone)]
pub struct SerpApiClient
{   api_key: String
  , base_url: String
  , http_client: reqwest::Client
}

impl SerpApiClient
{   pub fn new(
      api_key: impl Into<String>
    , base_url: impl Into<String>
    ) -> Self
    {   debug!("Creating SerpApiClient");
        SerpApiClient
        {   api_key: api_key.into()
          , base_url: base_url.into()
          , http_client: reqwest::Client::new()
        }
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &crate::config::AppConfig) -> Option<Self>
    {   config.search.api_key.as_ref().map(|key| {
          SerpApiClient::new(key.clone(), config.search.base_url.clone())
        })
    }

    /// Raw search call; `params` are added to `api_key`
    pub async fn query(
      &self
    , params: &[(&str, String)]
    ) -> Result<Value, crate::error::Error>
    {   let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("api_key", self.api_key.clone()));

        let response = self.http_client
          .get(&self.base_url)
          .query(&query)
          .send()
          .await
          .map_err(|e| {
            error!("Search HTTP error: {}", e);
            crate::error::Error::from(e)
          })?;

        let status = response.status();
        trace!("Search response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            return Err(crate::error::Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        response.json::<Value>().await.map_err(|e| {
          crate::error::Error::ParseError(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl crate::WebSearch for SerpApiClient
{   async fn search(&self, query: &str) -> crate::SearchContext
    {   debug!("Web search for: {}", query);
        match self.query(&[("q", query.to_string())]).await
        {   Ok(results) => context_from_snippets(extract_snippets(&results))
          , Err(e) => {
              warn!("Error during search: {}", e);
              crate::SearchContext::Failed
            }
        }
    }
}

#[async_trait::async_trait]
impl crate::VideoSearch for SerpApiClient
{   async fn search_videos(&self, query: &str) -> Vec<crate::VideoResult>
    {   debug!("Video search for: {}", query);
        let params = [
          ("engine", "youtube".to_string())
        , ("q", query.to_string())
        , ("num", MAX_VIDEOS.to_string())
        ];
        match self.query(&params).await
        {   Ok(results) => extract_videos(&results)
          , Err(e) => {
              warn!("Error during video search: {}", e);
              vec![]
            }
        }
    }
}

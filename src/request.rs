//! Request and response types shared by the chat pipeline

use serde::{Deserialize, Serialize};

/// Incoming chat request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest
{   #[serde(default)]
    pub message: Option<String>
}

impl ChatRequest
{   pub fn new(message: impl Into<String>) -> Self
    {   ChatRequest
        {   message: Some(message.into())
        }
    }

    /// The message if it has any non-whitespace content
    pub fn text(&self) -> Option<&str>
    {   self.message.as_deref()
          .filter(|m| !m.trim().is_empty())
    }
}

/// Successful chat reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse
{   pub reply: String
  , pub videos: Vec<VideoResult>
}

/// Body sent alongside a non-200 status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse
{   pub error: String
}

/// A video suggestion taken from the search provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoResult
{   pub title: String
  , pub link: String
  , #[serde(rename = "thumbnail")]
    pub thumbnail_url: String
  , pub duration: String
  , pub views: String
  , pub description: String
}

/// Payload for the inference service's generate endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest
{   pub model: String
  , pub prompt: String
  , pub system: String
  , pub stream: bool
}

/// Raw generate reply; interpreted by the caller so that only
/// transport failures go through the retry loop
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateReply
{   pub status: u16
  , pub body: String
}

#[derive(Debug, Deserialize)]
struct GenerateBody
{   #[serde(default)]
    response: Option<String>
}

impl GenerateReply
{   pub fn ok(body: impl Into<String>) -> Self
    {   GenerateReply
        {   status: 200
          , body: body.into()
        }
    }

    /// Extract the model's answer
    pub fn into_text(self) -> Result<String, crate::error::Error>
    {   if self.status != 200
        {   return Err(crate::error::Error::ApiError
            {   status: self.status
              , body: self.body
            });
        }

        let parsed: GenerateBody = serde_json::from_str(&self.body)
          .map_err(|e| crate::error::Error::ParseError(e.to_string()))?;

        match parsed.response
        {   Some(text) if !text.trim().is_empty() => Ok(text)
          , _ => Err(crate::error::Error::EmptyResponse)
        }
    }
}

/// Outcome of the web search step, rendered into prompt text
#[derive(Debug, Clone, PartialEq)]
pub enum SearchContext
{   Snippets(Vec<String>)
  , NoResults
  , Failed
  , NotConfigured
}

impl SearchContext
{   /// Text appended to the prompt when augmentation is enabled
    pub fn to_prompt_text(&self) -> String
    {   match self
        {   SearchContext::Snippets(snippets) => {
              format!("\n\nHasil Pencarian:\n{}", snippets.join("\n---\n"))
            }
          , SearchContext::NoResults => {
              "\n\nTidak ditemukan hasil pencarian yang relevan.".to_string()
            }
          , SearchContext::Failed => {
              "\n\nTidak dapat melakukan pencarian.".to_string()
            }
          , SearchContext::NotConfigured => {
              "\n\nFungsi pencarian tidak dikonfigurasi \
               (SERPAPI_KEY tidak ditemukan).".to_string()
            }
        }
    }
}

use std::fmt;

/// Custom error type for asisten operations
/// Implements Clone so fakes and retries can hand it around
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Inference service did not answer the availability probe
    ServiceUnavailable
  , /// Chat request carried no usable message
    MissingMessage
  , /// Transport-level HTTP failure (connect, reset, ...)
    HttpError(String)
  , /// Upstream answered with a non-success status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Failed to parse an upstream response body
    ParseError(String)
  , /// Upstream answered but the reply text was blank
    EmptyResponse
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl Error
{   /// HTTP status the chat endpoint answers with for this error
    pub fn status_code(&self) -> u16
    {   match self
        {   Error::ServiceUnavailable => 503
          , Error::MissingMessage => 400
          , Error::Timeout => 504
          , _ => 500
        }
    }

    /// Localized message shown to the end user.
    /// Deliberately generic; the Display text carries the detail.
    pub fn user_message(&self) -> &'static str
    {   match self
        {   Error::ServiceUnavailable => {
              "Ollama tidak aktif atau model tidak tersedia. \
               Pastikan Ollama berjalan dengan perintah 'ollama run llama2'"
            }
          , Error::MissingMessage => "Pesan tidak diberikan"
          , Error::ApiError { .. } => {
              "Model AI tidak dapat memproses permintaan"
            }
          , Error::ParseError(_) => "Format respons tidak valid"
          , Error::EmptyResponse => "Tidak ada jawaban dari AI"
          , Error::Timeout => "Waktu habis, silakan coba lagi"
          , Error::HttpError(_)
          | Error::InvalidConfiguration(_)
          | Error::Other(_) => "Terjadi kesalahan sistem"
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::ServiceUnavailable => {
              write!(f, "Inference service unavailable")
            }
          , Error::MissingMessage => {
              write!(f, "Request has no message")
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, body } => {
              write!(f, "API error: HTTP {}: {}", status, body)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::EmptyResponse => {
              write!(f, "API response contained no text")
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

//! asisten: chat backend over a local Ollama model with web and
//! video search context

pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod failover;
pub mod client;
pub mod server;

/*

asisten: a small chat backend. One POST /chat endpoint takes a
message, looks it up on the web (and on YouTube for "how do I"
style questions), asks a local Ollama model, and returns the reply
together with any video suggestions.

asisten/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and the seams between parts
│   ├── main.rs         # Binary: config, logging, serve
│   ├── error.rs        # Error kinds, status codes, user messages
│   ├── config.rs       # Environment-driven configuration
│   ├── client.rs       # ChatOrchestrator: the request pipeline
│   ├── server.rs       # axum router and error responses
│   ├── request.rs      # Request/response/payload types
│   ├── failover.rs     # Retry policy with exponential backoff
│   └── providers/
│       ├── mod.rs
│       ├── ollama.rs   # Inference client + availability probe
│       └── serpapi.rs  # Web and video search
└── tests/

*/

pub use client::ChatOrchestrator;
pub use config::AppConfig;
pub use error::Error;
pub use request::{
  ChatRequest, ChatResponse, ErrorResponse, GenerateReply
, GenerateRequest, SearchContext, VideoResult
};

// ===== ASISTEN SEAMS =====
// The orchestrator only talks to these traits; every outbound
// service can be swapped for a fake.

/// Checks whether the inference service is reachable
#[async_trait::async_trait]
pub trait AvailabilityProbe: Send + Sync
{   /// `true` only when the service answered with a 2xx status.
    /// Failures are logged, never returned.
    async fn probe(&self) -> bool;
}

/// Sends one generate call to the inference service
#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync
{   /// Transport failures are `Err`; any HTTP answer is `Ok`
    async fn send_generate(
      &self
    , request: &GenerateRequest
    ) -> Result<GenerateReply, Error>;
}

/// Web search that never fails the request
#[async_trait::async_trait]
pub trait WebSearch: Send + Sync
{   async fn search(&self, query: &str) -> SearchContext;
}

/// Video search that never fails the request
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync
{   /// At most three results, in provider order
    async fn search_videos(&self, query: &str) -> Vec<VideoResult>;
}

//! Outbound service clients

pub mod ollama;
pub mod serpapi;

// Re-export for convenience
pub use ollama::OllamaClient;
pub use serpapi::SerpApiClient;

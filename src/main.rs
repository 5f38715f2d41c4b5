use std::sync::Arc;

use asisten::providers::{OllamaClient, SerpApiClient};
use asisten::client::{ChatOrchestrator, ChatSettings};
use asisten::AvailabilityProbe;
use log::{error, info, warn};

#[tokio::main]
async fn main()
{   let config = match asisten::AppConfig::from_env()
    {   Ok(config) => config
      , Err(e) => {
          // Logging is not up yet
          eprintln!("ERROR: {}", e);
          std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run(config).await
    {   error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: asisten::AppConfig)
  -> Result<(), asisten::Error>
{   info!(
      "Starting asisten: model={} ollama={} search={}",
      config.ollama.model,
      config.ollama.base_url,
      config.search_enabled()
    );

    let ollama = Arc::new(OllamaClient::from_config(&config));
    let mut orchestrator = ChatOrchestrator::new(
      ChatSettings::from(&config)
    , ollama.clone()
    , ollama.clone()
    );

    match SerpApiClient::from_config(&config)
    {   Some(serpapi) => {
          let serpapi = Arc::new(serpapi);
          orchestrator = orchestrator.with_search(serpapi.clone(), serpapi);
        }
      , None => {
          warn!("SERPAPI_KEY not found; web and video search disabled");
        }
    }

    // Advisory only
    if !ollama.probe().await
    {   warn!("Ollama is not running or the model is unavailable");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
      .await
      .map_err(|e| asisten::Error::Other(
        format!("Failed to bind {}: {}", config.bind_addr, e)
      ))?;

    asisten::server::serve(listener, Arc::new(orchestrator))
      .await
      .map_err(|e| asisten::Error::Other(e.to_string()))
}

use std::collections::HashMap;
use std::time::Duration;

use asisten::client::ChatSettings;
use asisten::{AppConfig, Error};
use tokio_test::{assert_err, assert_ok};

fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, Error>
{   let env: HashMap<String, String> = pairs.iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    AppConfig::from_lookup(|k| env.get(k).cloned())
}

#[test]
fn test_defaults()
{   let config = assert_ok!(load(&[]));
    assert_eq!(config.ollama.base_url, "http://localhost:11434");
    assert_eq!(config.ollama.model, "llama3");
    assert_eq!(config.inference_timeout(), Duration::from_secs(60));
    assert_eq!(config.bind_addr, "127.0.0.1:5000");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.initial_backoff_ms, 1000);
    assert!(!config.search_enabled());
    assert!(!config.augment_prompt);
}

#[test]
fn test_overrides()
{   let config = assert_ok!(load(&[
      ("OLLAMA_BASE_URL", "http://gpu-box:11434/")
    , ("OLLAMA_MODEL", "qwen2.5")
    , ("OLLAMA_TIMEOUT_SECS", "90")
    , ("SERPAPI_KEY", "abc")
    , ("RETRY_MAX_ATTEMPTS", "5")
    , ("AUGMENT_PROMPT", "true")
    ]));
    assert_eq!(config.ollama.base_url, "http://gpu-box:11434");
    assert_eq!(config.ollama.model, "qwen2.5");
    assert_eq!(config.inference_timeout(), Duration::from_secs(90));
    assert!(config.search_enabled());

    let settings = ChatSettings::from(&config);
    assert_eq!(settings.model, "qwen2.5");
    assert_eq!(settings.retry.max_attempts, 5);
    assert!(settings.augment_prompt);
}

#[test]
fn test_blank_search_key_disables_search()
{   let config = assert_ok!(load(&[("SERPAPI_KEY", "   ")]));
    assert!(!config.search_enabled());
}

#[test]
fn test_api_key_is_not_serialized()
{   let config = assert_ok!(load(&[("SERPAPI_KEY", "rahasia")]));
    let dumped = serde_json::to_string(&config).unwrap();
    assert!(!dumped.contains("rahasia"));
}

#[test]
fn test_invalid_values_are_rejected()
{   let err = assert_err!(load(&[("OLLAMA_TIMEOUT_SECS", "soon")]));
    assert!(matches!(err, Error::InvalidConfiguration(ref m) if m.contains("OLLAMA_TIMEOUT_SECS")));

    assert_err!(load(&[("AUGMENT_PROMPT", "maybe")]));
    assert_err!(load(&[("RETRY_MAX_ATTEMPTS", "0")]));
    assert_err!(load(&[("RETRY_BACKOFF_MULTIPLIER", "0.5")]));
}

#[test]
fn test_error_status_codes()
{   assert_eq!(Error::ServiceUnavailable.status_code(), 503);
    assert_eq!(Error::MissingMessage.status_code(), 400);
    assert_eq!(Error::Timeout.status_code(), 504);
    assert_eq!(Error::EmptyResponse.status_code(), 500);
    assert_eq!(Error::Other("boom".into()).status_code(), 500);
    assert_eq!(Error::from("boom"), Error::Other("boom".to_string()));
}

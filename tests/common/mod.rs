#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use asisten::{Error, GenerateReply, GenerateRequest, SearchContext, VideoResult};
use axum::extract::{Json, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

// ===== Seam Fakes =====

pub struct FakeProbe
{   pub up: bool
  , pub calls: AtomicUsize
}

impl FakeProbe
{   pub fn new(up: bool) -> Arc<Self>
    {   Arc::new(FakeProbe { up, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl asisten::AvailabilityProbe for FakeProbe
{   async fn probe(&self) -> bool
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        self.up
    }
}

/// Plays back scripted results, then repeats `fallback`
pub struct FakeInference
{   pub script: Mutex<VecDeque<Result<GenerateReply, Error>>>
  , pub fallback: Result<GenerateReply, Error>
  , pub calls: AtomicUsize
  , pub last_request: Mutex<Option<GenerateRequest>>
}

impl FakeInference
{   pub fn always(result: Result<GenerateReply, Error>) -> Arc<Self>
    {   FakeInference::scripted(vec![], result)
    }

    pub fn scripted(
      script: Vec<Result<GenerateReply, Error>>
    , fallback: Result<GenerateReply, Error>
    ) -> Arc<Self>
    {   Arc::new(FakeInference
        {   script: Mutex::new(script.into())
          , fallback
          , calls: AtomicUsize::new(0)
          , last_request: Mutex::new(None)
        })
    }

    pub fn calls(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerateRequest>
    {   self.last_request.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl asisten::InferenceClient for FakeInference
{   async fn send_generate(
      &self
    , request: &GenerateRequest
    ) -> Result<GenerateReply, Error>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.script.lock().unwrap()
          .pop_front()
          .unwrap_or_else(|| self.fallback.clone())
    }
}

pub struct FakeWebSearch
{   pub context: SearchContext
  , pub calls: AtomicUsize
}

impl FakeWebSearch
{   pub fn new(context: SearchContext) -> Arc<Self>
    {   Arc::new(FakeWebSearch { context, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl asisten::WebSearch for FakeWebSearch
{   async fn search(&self, _query: &str) -> SearchContext
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        self.context.clone()
    }
}

pub struct FakeVideoSearch
{   pub videos: Vec<VideoResult>
  , pub queries: Mutex<Vec<String>>
}

impl FakeVideoSearch
{   pub fn new(videos: Vec<VideoResult>) -> Arc<Self>
    {   Arc::new(FakeVideoSearch { videos, queries: Mutex::new(vec![]) })
    }

    pub fn calls(&self) -> usize
    {   self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String>
    {   self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl asisten::VideoSearch for FakeVideoSearch
{   async fn search_videos(&self, query: &str) -> Vec<VideoResult>
    {   self.queries.lock().unwrap().push(query.to_string());
        self.videos.clone()
    }
}

pub fn video(title: &str) -> VideoResult
{   VideoResult
    {   title: title.to_string()
      , link: format!("https://www.youtube.com/watch?v={}", title)
      , ..VideoResult::default()
    }
}

// ===== Fake Upstream Servers =====

/// Serve `app` on an ephemeral port, return its base URL
pub async fn spawn(app: Router) -> String
{   let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
      .await
      .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Ollama stand-in; `generate` answers with `status` and raw `body`.
/// Every generate payload is recorded in `seen`.
pub fn fake_ollama(
  status: StatusCode
, body: &str
, seen: Arc<Mutex<Vec<Value>>>
) -> Router
{   let body = body.to_string();
    Router::new()
      .route("/api/tags", get(|| async {
        Json(json!({ "models": [{ "name": "llama3:latest", "size": 1 }] }))
      }))
      .route("/api/generate", post(move |Json(payload): Json<Value>| {
        let body = body.clone();
        let seen = seen.clone();
        async move {
          seen.lock().unwrap().push(payload);
          (status, body)
        }
      }))
}

/// SerpApi stand-in: web results by default, videos for
/// `engine=youtube`. Every query string is recorded in `seen`.
pub fn fake_serpapi(seen: Arc<Mutex<Vec<HashMap<String, String>>>>) -> Router
{   Router::new()
      .route("/search", get(move |Query(params): Query<HashMap<String, String>>| {
        let seen = seen.clone();
        async move {
          let youtube = params.get("engine").map(String::as_str) == Some("youtube");
          seen.lock().unwrap().push(params);
          if youtube
          {   Json(json!({
                "video_results": [
                  { "title": "Python untuk Pemula", "link": "https://youtu.be/a"
                  , "thumbnail": { "static": "https://i.ytimg.com/a.jpg" }
                  , "duration": "10:01", "views": 1200, "description": "Dasar" }
                , { "title": "Belajar Python", "link": "https://youtu.be/b" }
                , { "title": "Python OOP", "link": "https://youtu.be/c" }
                , { "title": "Python Lanjutan", "link": "https://youtu.be/d" }
                ]
              }))
          } else
          {   Json(json!({
                "organic_results": [
                  { "snippet": "Python adalah bahasa pemrograman." }
                , { "snippet_highlighted_words": ["belajar", "python"] }
                ]
              }))
          }
        }
      }))
}

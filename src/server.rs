//! HTTP surface: `POST /chat`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use log::{debug, info};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::client::ChatOrchestrator;

/// Build the router with permissive CORS for the browser frontend
pub fn router(orchestrator: Arc<ChatOrchestrator>) -> Router
{   Router::new()
      .route("/chat", post(chat))
      .layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_headers(Any)
          .allow_methods(Any)
      )
      .with_state(orchestrator)
}

/// Serve on an already bound listener until the process stops
pub async fn serve(
  listener: TcpListener
, orchestrator: Arc<ChatOrchestrator>
) -> std::io::Result<()>
{   if let Ok(addr) = listener.local_addr()
    {   info!("HTTP listening on http://{}", addr);
    }
    axum::serve(listener, router(orchestrator).into_make_service()).await
}

async fn chat(
  State(orchestrator): State<Arc<ChatOrchestrator>>
, body: Result<Json<crate::ChatRequest>, JsonRejection>
) -> Response
{   // An unreadable body is handled like a missing message,
    // after the availability probe
    let request = match body
    {   Ok(Json(request)) => request
      , Err(rejection) => {
          debug!("Unreadable chat body: {}", rejection.body_text());
          crate::ChatRequest::default()
        }
    };

    match orchestrator.handle(request).await
    {   Ok(response) => Json(response).into_response()
      , Err(e) => e.into_response()
    }
}

impl IntoResponse for crate::error::Error
{   fn into_response(self) -> Response
    {   let status = StatusCode::from_u16(self.status_code())
          .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = crate::ErrorResponse
        {   error: self.user_message().to_string()
        };
        (status, Json(body)).into_response()
    }
}

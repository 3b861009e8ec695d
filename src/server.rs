//! HTTP front for the local search engine.

use std::{net::SocketAddr, sync::Arc};

use axum::{
   Json, Router,
   extract::{Query, State},
   http::StatusCode,
   routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
   Result,
   gateway::{SEARCH_PATH, SUGGESTIONS_PATH},
   search::SearchEngine,
   sync::CatalogLoader,
   types::{SearchOptions, SearchResponse},
};

pub const REBUILD_PATH: &str = "/api/search/rebuild";

pub struct AppState {
   pub engine:           SearchEngine,
   pub loader:           Option<Arc<CatalogLoader>>,
   pub suggestion_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
   pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildResponse {
   pub message: String,
   pub entries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
   pub status:     String,
   pub entries:    usize,
   pub generation: u64,
}

pub fn router(state: AppState) -> Router {
   Router::new()
      .route("/health", get(handle_health))
      .route(SEARCH_PATH, post(handle_search))
      .route(SUGGESTIONS_PATH, get(handle_suggestions))
      .route(REBUILD_PATH, post(handle_rebuild))
      .with_state(Arc::new(state))
}

pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
   let listener = tokio::net::TcpListener::bind(addr).await?;
   tracing::info!(addr = %listener.local_addr()?, "search service listening");
   axum::serve(listener, router(state)).await?;
   Ok(())
}

pub async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
   let snapshot = state.engine.index().snapshot();
   Json(HealthResponse {
      status:     "ok".to_string(),
      entries:    snapshot.len(),
      generation: snapshot.number(),
   })
}

pub async fn handle_search(
   State(state): State<Arc<AppState>>,
   Json(options): Json<SearchOptions>,
) -> Json<SearchResponse> {
   if options.query.trim().is_empty() {
      return Json(SearchResponse::empty(options.query));
   }
   Json(state.engine.search(&options))
}

pub async fn handle_suggestions(
   State(state): State<Arc<AppState>>,
   Query(params): Query<SuggestionParams>,
) -> Json<Vec<String>> {
   let partial = params.q.unwrap_or_default();
   Json(state.engine.suggest(&partial, state.suggestion_limit))
}

pub async fn handle_rebuild(
   State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RebuildResponse>) {
   let Some(loader) = state.loader.clone() else {
      return (
         StatusCode::CONFLICT,
         Json(RebuildResponse { message: "no catalog manifest configured".into(), entries: 0 }),
      );
   };

   let index = Arc::clone(state.engine.index());
   let outcome = tokio::task::spawn_blocking(move || loader.rebuild(&index)).await;

   match outcome {
      Ok(Ok(report)) => (
         StatusCode::OK,
         Json(RebuildResponse { message: "Search index rebuilt".into(), entries: report.entries }),
      ),
      Ok(Err(e)) => {
         tracing::error!(error = %e, "index rebuild failed");
         let entries = state.engine.index().snapshot().len();
         (StatusCode::INTERNAL_SERVER_ERROR, Json(RebuildResponse { message: e.to_string(), entries }))
      },
      Err(e) => {
         tracing::error!(error = %e, "index rebuild task panicked");
         let entries = state.engine.index().snapshot().len();
         (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RebuildResponse { message: "index rebuild aborted".into(), entries }),
         )
      },
   }
}

use crate::{
    recipes::{Recipe, RecipeCreate},
    retrieval::{IngredientSearch, RetrievalError, RetrievalService, ScoredRecipe},
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    service: Arc<RetrievalService>,
}

async fn start_app(service: Arc<RetrievalService>, listen_addr: &str) {
    let shared_state = Arc::new(SharedState { service });

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    let app = Router::new()
        .route("/api/recipes", post(create))
        .route("/api/recipes/search-ingredients", get(search_ingredients))
        .route("/api/recipes/search-semantic", get(search_semantic))
        .route("/api/recipes/history", get(history))
        .route("/api/recipes/total", get(total))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await.unwrap();
    log::info!("listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

pub fn start_daemon(service: Arc<RetrievalService>, listen_addr: String) {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(async { start_app(service, &listen_addr).await });
}

// Wraps RetrievalError so axum can turn it into a response.
#[derive(Debug)]
struct HttpError(RetrievalError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            RetrievalError::Validation(_) => (
                axum::http::StatusCode::BAD_REQUEST,
                json!({"error": self.0.to_string()}).to_string(),
            ),
            RetrievalError::NoQueryEmbedding => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
            RetrievalError::Embedding(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
            RetrievalError::Store(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": self.0.to_string()}).to_string(),
                )
            }
        }
        .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<RetrievalError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Serialize)]
struct CreateResponse {
    message: String,
    recipe: Recipe,
}

async fn create(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<RecipeCreate>,
) -> Result<axum::Json<CreateResponse>, HttpError> {
    log::debug!("payload: {payload:?}");

    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        let recipe = service.create(payload).map_err(HttpError)?;

        Ok(CreateResponse {
            message: "Recipe added successfully!".to_string(),
            recipe,
        }
        .into())
    })
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    results: Vec<Recipe>,
    count: usize,
}

async fn search_ingredients(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<IngredientSearch>,
) -> Result<axum::Json<SearchResponse>, HttpError> {
    log::debug!("params: {params:?}");

    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        let results = service.search_ingredients(params).map_err(HttpError)?;
        let count = results.len();

        Ok(SearchResponse { results, count }.into())
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SemanticParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct SemanticResponse {
    results: Vec<ScoredRecipe>,
    count: usize,
}

async fn search_semantic(
    State(state): State<Arc<SharedState>>,
    Query(params): Query<SemanticParams>,
) -> Result<axum::Json<SemanticResponse>, HttpError> {
    log::debug!("params: {params:?}");

    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        let results = service.search_semantic(&params.q).map_err(HttpError)?;
        let count = results.len();

        Ok(SemanticResponse { results, count }.into())
    })
}

async fn history(
    State(state): State<Arc<SharedState>>,
) -> Result<axum::Json<Vec<Recipe>>, HttpError> {
    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        service.recent().map(Into::into).map_err(Into::into)
    })
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TotalResponse {
    pub total: usize,
}

async fn total(
    State(state): State<Arc<SharedState>>,
) -> Result<axum::Json<TotalResponse>, HttpError> {
    let service = state.service.clone();

    tokio::task::block_in_place(move || {
        service
            .total()
            .map(|total| TotalResponse { total }.into())
            .map_err(Into::into)
    })
}

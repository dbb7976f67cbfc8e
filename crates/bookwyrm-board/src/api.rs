//! HTTP API for the board node.
//!
//! Read endpoints expose the session's board state and the computed
//! leaderboard; mutation endpoints map one-to-one onto the gateway and
//! are guarded by the allowlist check. The caller's email comes from the
//! `x-board-email` header, falling back to the node's ambient
//! [`Identity`] (a kiosk signed in as its operator, for instance).

use crate::identity::{Authorizer, Identity};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use bookwyrm_levels::{progress_to_next, remaining_books, resolve_level, Level};
use bookwyrm_rank::Participant;
use bookwyrm_store::StoreError;
use bookwyrm_sync::{Error as SyncError, Session, Settings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Email header carrying the caller identity.
const CALLER_HEADER: &str = "x-board-email";

#[derive(Clone)]
struct ApiState {
    session: Arc<Session>,
    authorizer: Authorizer,
    identity: Arc<dyn Identity>,
}

/// Build the API router.
pub fn build_router(
    session: Arc<Session>,
    authorizer: Authorizer,
    identity: Arc<dyn Identity>,
) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        // Board state + leaderboard
        .route("/api/v1/board", get(get_board))
        .route("/api/v1/leaderboard", get(get_leaderboard))
        // Participants
        .route("/api/v1/participants", post(add_participant))
        .route("/api/v1/participants/:id", patch(update_participant))
        .route("/api/v1/participants/:id", delete(remove_participant))
        .route("/api/v1/reset", post(reset_all))
        // Settings
        .route("/api/v1/settings/levels", put(update_levels))
        .route("/api/v1/settings/stage-images", put(update_stage_images))
        .route("/api/v1/settings/podium", put(set_podium))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(ApiState {
            session,
            authorizer,
            identity,
        })
}

async fn health() -> &'static str {
    "OK"
}

// --- Read endpoints ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardResponse {
    demo_mode: bool,
    data_loading: bool,
    list_ready: bool,
    participant_count: usize,
    settings: Settings,
}

async fn get_board(State(state): State<ApiState>) -> Json<BoardResponse> {
    let board = state.session.snapshot();
    Json(BoardResponse {
        demo_mode: board.demo_mode(),
        data_loading: board.data_loading,
        list_ready: board.list_ready,
        participant_count: board.participants.len(),
        settings: board.settings,
    })
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    search: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedParticipant {
    id: String,
    name: String,
    avatar_seed: String,
    book_count: u32,
    score: i64,
    level_id: u32,
    level_title: String,
    progress_to_next: f64,
    remaining_books: u32,
    accessories: Vec<String>,
    badges: Vec<String>,
}

impl RankedParticipant {
    fn derive(participant: &Participant, levels: &[Level]) -> Self {
        let level = resolve_level(participant.book_count, levels);
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            avatar_seed: participant.avatar_seed.clone(),
            book_count: participant.book_count,
            score: participant.score(),
            level_id: level.id,
            level_title: level.title.clone(),
            progress_to_next: progress_to_next(participant.book_count, levels),
            remaining_books: remaining_books(participant.book_count, levels),
            accessories: participant.accessories.clone(),
            badges: participant.badges.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardResponse {
    show_podium: bool,
    top3: Vec<RankedParticipant>,
    roster: Vec<RankedParticipant>,
}

async fn get_leaderboard(
    State(state): State<ApiState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<LeaderboardResponse> {
    let board = state.session.snapshot();
    let leaderboard = board.leaderboard(&query.search);
    let levels = &board.settings.levels;
    Json(LeaderboardResponse {
        show_podium: board.settings.show_podium,
        top3: leaderboard
            .top3
            .iter()
            .map(|p| RankedParticipant::derive(p, levels))
            .collect(),
        roster: leaderboard
            .roster
            .iter()
            .map(|p| RankedParticipant::derive(p, levels))
            .collect(),
    })
}

// --- Mutation endpoints ---

#[derive(Debug, Deserialize)]
struct AddParticipantRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct AddParticipantResponse {
    id: String,
}

async fn add_participant(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<AddParticipantRequest>,
) -> Result<(StatusCode, Json<AddParticipantResponse>), StatusCode> {
    require_privileged(&state, &headers).await?;
    let id = state
        .session
        .gateway()
        .add_participant(&req.name)
        .await
        .map_err(status_for)?;
    Ok((StatusCode::CREATED, Json(AddParticipantResponse { id })))
}

async fn update_participant(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<Map<String, Value>>,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .update_participant(&id, patch)
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_participant(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .remove_participant(&id)
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_all(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .reset_all()
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_levels(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(levels): Json<Vec<Level>>,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .update_levels(levels)
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_stage_images(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(images): Json<BTreeMap<u32, String>>,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .update_stage_images(images)
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct PodiumRequest {
    show: bool,
}

async fn set_podium(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(req): Json<PodiumRequest>,
) -> Result<StatusCode, StatusCode> {
    require_privileged(&state, &headers).await?;
    state
        .session
        .gateway()
        .set_podium_visible(req.show)
        .await
        .map_err(status_for)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_privileged(state: &ApiState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let email = match headers.get(CALLER_HEADER).and_then(|value| value.to_str().ok()) {
        Some(header) => Some(header.to_string()),
        None => state.identity.current_email().await,
    };
    if state.authorizer.is_privileged(email.as_deref()).await {
        Ok(())
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

fn status_for(err: SyncError) -> StatusCode {
    match err {
        SyncError::DemoMode => StatusCode::CONFLICT,
        SyncError::EmptyLevelTable => StatusCode::UNPROCESSABLE_ENTITY,
        SyncError::Payload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SyncError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        SyncError::Store(StoreError::PermissionDenied(_)) => StatusCode::FORBIDDEN,
        SyncError::Store(_) => StatusCode::BAD_GATEWAY,
    }
}

//! HTTP routes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use futures_util::Stream;
use realmhost_domain::{SlotOptions, WorldId, WorldType};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::identity::{AdminAccess, PlayerIdentity};
use super::responses::{ServersResponse, SlotResponse, WorldResponse};
use crate::app::App;
use crate::infrastructure::app_settings::AppSettings;
use crate::infrastructure::ports::{RepoError, SettingsRepo};
use crate::use_cases::{LifecycleError, StateError, WorldError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/worlds", get(list_worlds).post(create_world))
        .route("/worlds/{id}", get(get_world).post(update_world).delete(delete_world))
        .route("/worlds/{id}/open", put(open_world))
        .route("/worlds/{id}/close", put(close_world))
        .route(
            "/worlds/{id}/slot/{slot_number}",
            post(configure_slot).put(activate_slot),
        )
        .route("/worlds/{id}/state", get(get_world_state))
        .route("/worlds/{id}/join", get(join_world))
        .route("/subscriptions/{id}", get(get_subscription))
        .route("/mco/available", get(mco_available))
        .route("/mco/client/outdated", get(mco_client_outdated))
        .route("/mco/tos/agreed", get(mco_tos_agreed))
        .route("/mco/v1/news", get(mco_news))
        .route("/invites/pending", get(pending_invites))
        .route("/invites/count/pending", get(pending_invites_count))
        .route("/activities/liveplayerlist", get(live_player_list))
        .route("/activities/{id}", get(world_activity))
        .route("/notifications", get(notifications))
        .route("/regions/ping/stat", get(ping_regions))
        .route("/ops/{id}", get(get_ops))
        .route("/upload/{id}/{slot_number}", put(upload_world))
        .route(
            "/admin/configuration",
            get(get_configuration).post(update_configuration),
        )
        .route("/admin/servers", get(get_all_servers))
        .route("/admin/servers/{id}/logs", get(stream_server_logs))
        .route("/admin/servers/{id}/command", post(run_server_command))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Worlds
// =============================================================================

async fn list_worlds(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
) -> Result<Json<ServersResponse>, ApiError> {
    let views = app
        .use_cases
        .worlds
        .list_for_player(&identity.uuid, &identity.name, &identity.version)
        .await?;

    let servers = views
        .iter()
        .map(|view| WorldResponse::from_view(view, &identity.version))
        .collect();
    Ok(Json(ServersResponse { servers }))
}

async fn get_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<WorldResponse>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    let view = app
        .use_cases
        .worlds
        .get_view(world_id, &identity.version)
        .await?;
    let slots = app.use_cases.worlds.list_slots(world_id).await?;

    let mut response = WorldResponse::from_view(&view, &identity.version);
    response.slots = Some(slots.iter().map(SlotResponse::from).collect());
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct WorldCreateRequest {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Motd")]
    motd: Option<String>,
    #[serde(rename = "WorldType", default)]
    world_type: WorldType,
}

async fn create_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Json(request): Json<WorldCreateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = app
        .use_cases
        .worlds
        .create(
            &identity.name,
            &identity.uuid,
            request.name,
            request.motd,
            request.world_type,
        )
        .await?;
    Ok(Json(json!({ "id": id })))
}

#[derive(Debug, Deserialize)]
struct UpdateWorldConfigurationRequest {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Motd")]
    motd: Option<String>,
    #[serde(rename = "WorldType")]
    world_type: Option<WorldType>,
}

async fn update_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorldConfigurationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    app.use_cases
        .worlds
        .update_configuration(world_id, request.name, request.motd, request.world_type)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn open_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    app.use_cases.worlds.open(world_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
struct CloseWorldQuery {
    #[serde(default)]
    force: bool,
}

async fn close_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<CloseWorldQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    let force = query.force;
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    app.use_cases.worlds.close(world_id, force).await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete_world(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    app.use_cases.worlds.delete(world_id).await?;
    Ok(Json(json!({ "success": true })))
}

async fn get_world_state(
    State(app): State<Arc<App>>,
    _identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = app.use_cases.state.execute(WorldId::from_uuid(id)).await?;
    Ok(Json(json!({ "state": state })))
}

async fn join_world(
    State(app): State<Arc<App>>,
    _identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.get(world_id).await?;
    // No container means the world is closed; that surfaces as a 404.
    let port = app.use_cases.lifecycle.port(world_id).await?;
    let settings = app
        .repositories
        .settings
        .get()
        .await?
        .unwrap_or_default();
    Ok(Json(json!({
        "address": format!("{}:{}", settings.default_server_address, port)
    })))
}

// =============================================================================
// Slots
// =============================================================================

#[derive(Debug, Deserialize)]
struct SlotOptionsRequest {
    #[serde(rename = "SlotName", default)]
    slot_name: String,
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Difficulty", default)]
    difficulty: realmhost_domain::Difficulty,
    #[serde(rename = "GameMode", default)]
    game_mode: realmhost_domain::GameMode,
    #[serde(rename = "ForceGameMode", default)]
    force_game_mode: bool,
    #[serde(rename = "SpawnProtection", default)]
    spawn_protection: u32,
    #[serde(rename = "Hardcore", default)]
    hardcore: bool,
}

impl From<SlotOptionsRequest> for SlotOptions {
    fn from(request: SlotOptionsRequest) -> Self {
        Self {
            slot_name: request.slot_name,
            version: request.version,
            difficulty: request.difficulty,
            game_mode: request.game_mode,
            force_game_mode: request.force_game_mode,
            spawn_protection: request.spawn_protection,
            hardcore: request.hardcore,
        }
    }
}

async fn configure_slot(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path((id, slot_number)): Path<(Uuid, u8)>,
    Json(request): Json<SlotOptionsRequest>,
) -> Result<Json<SlotResponse>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    let slot = app
        .use_cases
        .worlds
        .configure_slot(world_id, slot_number, request.into())
        .await?;
    Ok(Json(SlotResponse::from(&slot)))
}

async fn activate_slot(
    State(app): State<Arc<App>>,
    identity: PlayerIdentity,
    Path((id, slot_number)): Path<(Uuid, u8)>,
) -> Result<Json<SlotResponse>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    app.use_cases.worlds.ensure_owner(world_id, &identity.uuid).await?;
    let slot = app
        .use_cases
        .worlds
        .activate_slot(world_id, slot_number)
        .await?;
    Ok(Json(SlotResponse::from(&slot)))
}

// =============================================================================
// Subscriptions
// =============================================================================

async fn get_subscription(
    State(app): State<Arc<App>>,
    _identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    let info = match app.use_cases.worlds.get(world_id).await {
        Ok(world) => app.use_cases.subscriptions.describe(&world),
        // Unknown worlds report the default grant, matching the client's
        // expectations during first contact.
        Err(WorldError::NotFound) => {
            return Ok(Json(json!({ "subscriptionType": "NORMAL", "daysLeft": 30 })))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Json(serde_json::to_value(info).map_err(|e| ApiError::Internal(e.to_string()))?))
}

// =============================================================================
// Client handshake + stub surface
// =============================================================================

async fn mco_available(_identity: PlayerIdentity) -> Json<bool> {
    Json(true)
}

async fn mco_client_outdated(_identity: PlayerIdentity) -> Json<bool> {
    Json(false)
}

async fn mco_tos_agreed(_identity: PlayerIdentity) -> Json<bool> {
    Json(true)
}

async fn mco_news(
    State(app): State<Arc<App>>,
    _identity: PlayerIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let settings = app
        .repositories
        .settings
        .get()
        .await?
        .unwrap_or_default();
    Ok(Json(json!({ "newsLink": settings.news_link })))
}

async fn pending_invites(_identity: PlayerIdentity) -> Json<serde_json::Value> {
    Json(json!({ "invites": [] }))
}

async fn pending_invites_count(_identity: PlayerIdentity) -> Json<serde_json::Value> {
    Json(json!({ "count": 0 }))
}

async fn live_player_list(_identity: PlayerIdentity) -> Json<serde_json::Value> {
    Json(json!({ "online": [] }))
}

async fn world_activity(
    _identity: PlayerIdentity,
    Path(_id): Path<Uuid>,
) -> Json<serde_json::Value> {
    Json(json!({
        "playerActivityDto": { "profileUuid": "", "joinTime": 0, "leaveTime": 0 }
    }))
}

async fn notifications(_identity: PlayerIdentity) -> Json<serde_json::Value> {
    Json(json!({ "notifications": [] }))
}

async fn ping_regions(_identity: PlayerIdentity) -> Json<serde_json::Value> {
    Json(json!({ "regions": [] }))
}

async fn get_ops(
    State(app): State<Arc<App>>,
    _identity: PlayerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let players = app
        .repositories
        .player
        .list_for_world(WorldId::from_uuid(id))
        .await?;
    let ops: Vec<String> = players
        .into_iter()
        .filter(|player| player.operator)
        .map(|player| player.name)
        .collect();
    Ok(Json(json!({ "ops": ops })))
}

async fn upload_world(
    _identity: PlayerIdentity,
    Path((_id, _slot_number)): Path<(Uuid, u8)>,
) -> Json<serde_json::Value> {
    Json(json!({ "uploadUrl": "" }))
}

// =============================================================================
// Admin
// =============================================================================

async fn get_configuration(
    State(app): State<Arc<App>>,
    _admin: AdminAccess,
) -> Result<Json<AppSettings>, ApiError> {
    let settings = app
        .repositories
        .settings
        .get()
        .await?
        .unwrap_or_default();
    Ok(Json(settings))
}

async fn update_configuration(
    State(app): State<Arc<App>>,
    _admin: AdminAccess,
    Json(updates): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut settings = app
        .repositories
        .settings
        .get()
        .await?
        .unwrap_or_default();
    for (key, value) in &updates {
        settings
            .apply(key, value)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }
    app.repositories.settings.save(&settings).await?;
    Ok(Json(json!({ "success": true })))
}

async fn get_all_servers(
    State(app): State<Arc<App>>,
    _admin: AdminAccess,
) -> Result<Json<serde_json::Value>, ApiError> {
    let worlds = app.use_cases.worlds.list_all().await?;
    let servers: Vec<serde_json::Value> = worlds
        .iter()
        .map(|world| {
            json!({
                "id": world.id,
                "owner": world.owner,
                "ownerUUID": world.owner_uuid,
                "name": world.name,
                "motd": world.motd,
            })
        })
        .collect();
    Ok(Json(json!({ "servers": servers })))
}

#[derive(Debug, Deserialize)]
struct ServerCommandRequest {
    command: String,
}

async fn run_server_command(
    State(app): State<Arc<App>>,
    _admin: AdminAccess,
    Path(id): Path<Uuid>,
    Json(request): Json<ServerCommandRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let output = app
        .use_cases
        .lifecycle
        .exec(WorldId::from_uuid(id), &request.command)
        .await?;
    Ok(Json(json!({ "output": output })))
}

async fn stream_server_logs(
    State(app): State<Arc<App>>,
    _admin: AdminAccess,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let world_id = WorldId::from_uuid(id);

    // Surface absence as a 404 up front; the stream task below only reports
    // errors into the log.
    if !app.use_cases.lifecycle.is_running(world_id).await? {
        return Err(ApiError::NotFound);
    }

    let (tx, rx) = tokio::sync::mpsc::channel::<String>(64);
    let cancel = CancellationToken::new();
    // Dropped together with the SSE body on client disconnect, which cancels
    // the pump task and tears the runtime stream down.
    let guard = cancel.clone().drop_guard();

    let lifecycle = app.use_cases.lifecycle.clone();
    tokio::spawn(async move {
        let result = lifecycle
            .stream_logs(world_id, cancel, move |line| {
                // A slow consumer drops lines rather than stalling the pump.
                let _ = tx.try_send(line);
            })
            .await;
        if let Err(e) = result {
            tracing::warn!(world_id = %world_id, error = %e, "log stream ended with error");
        }
    });

    let stream = futures_util::stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let line = rx.recv().await?;
        Some((
            Ok::<_, Infallible>(Event::default().data(line)),
            (rx, guard),
        ))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Unauthorized(msg) => {
                (axum::http::StatusCode::UNAUTHORIZED, msg).into_response()
            }
            ApiError::Forbidden(msg) => (axum::http::StatusCode::FORBIDDEN, msg).into_response(),
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<WorldError> for ApiError {
    fn from(e: WorldError) -> Self {
        match e {
            WorldError::NotFound | WorldError::SlotNotFound => ApiError::NotFound,
            WorldError::NoActiveSlot => ApiError::BadRequest("No active slot".to_string()),
            WorldError::NotOwner => ApiError::Forbidden("You don't own this world".to_string()),
            WorldError::Version(e) => ApiError::BadRequest(e.to_string()),
            WorldError::Lifecycle(e) => e.into(),
            WorldError::Repo(e) => e.into(),
        }
    }
}

impl From<StateError> for ApiError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::WorldNotFound => ApiError::NotFound,
            StateError::Repo(e) => e.into(),
            StateError::Lifecycle(e) => e.into(),
        }
    }
}

impl From<LifecycleError> for ApiError {
    fn from(e: LifecycleError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}

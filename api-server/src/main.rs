use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer};
use heart_maze::{Difficulty, Direction, GameSession, HintOutcome, MoveOutcome, Position, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use uuid::Uuid;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const BIND_ADDRESS_ENV: &str = "HEART_MAZE_BIND";
const JSON_LIMIT: usize = 64 * 1024;

/// Live games kept before the least useful one is evicted
const MAX_SESSIONS: usize = 1024;

struct StoredSession {
    session: GameSession,
    last_used: Instant,
}

/// Live games, keyed by the id handed out on creation
///
/// Holds at most `capacity` games. Creating one more evicts a won game if
/// there is any, otherwise the one untouched for longest.
struct SessionStore {
    sessions: Mutex<HashMap<Uuid, StoredSession>>,
    capacity: usize,
}

impl SessionStore {
    fn new(capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, StoredSession>>, HttpResponse> {
        self.sessions.lock().map_err(|_| {
            tracing::error!("Session store lock poisoned");
            error_response(HttpResponse::InternalServerError(), "Session store unavailable")
        })
    }

    fn insert(&self, session: GameSession) -> Result<Uuid, HttpResponse> {
        let mut sessions = self.lock()?;

        while sessions.len() >= self.capacity {
            let evicted = sessions
                .iter()
                .min_by_key(|(_, stored)| (!stored.session.is_won(), stored.last_used))
                .map(|(id, _)| *id);
            match evicted {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::info!("Evicted session {} ({} live)", id, sessions.len());
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(
            id,
            StoredSession {
                session,
                last_used: Instant::now(),
            },
        );
        Ok(id)
    }

    /// Run `f` against one stored session, mapping a missing id or a
    /// poisoned store to the matching error response
    fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut GameSession) -> R) -> Result<R, HttpResponse> {
        let mut sessions = self.lock()?;
        match sessions.get_mut(&id) {
            Some(stored) => {
                stored.last_used = Instant::now();
                Ok(f(&mut stored.session))
            }
            None => Err(unknown_session(id)),
        }
    }

    fn remove(&self, id: Uuid) -> Result<(), HttpResponse> {
        match self.lock()?.remove(&id) {
            Some(_) => Ok(()),
            None => Err(unknown_session(id)),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

// Request/Response types

#[derive(Debug, Deserialize)]
struct NewGameRequest {
    #[serde(default)]
    difficulty: Difficulty,
    seed: Option<u32>,
}

#[derive(Debug, Serialize)]
struct NewGameResponse {
    success: bool,
    session_id: Uuid,
    session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    success: bool,
    session: SessionSnapshot,
}

#[derive(Debug, Deserialize)]
struct MoveRequest {
    direction: Direction,
}

#[derive(Debug, Serialize)]
struct MoveResponse {
    success: bool,
    outcome: MoveOutcome,
    session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
struct HintResponse {
    success: bool,
    /// shown | exhausted | unavailable | gameover
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trail: Option<Vec<Position>>,
    session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn error_response(mut builder: actix_web::HttpResponseBuilder, error: impl Into<String>) -> HttpResponse {
    builder.json(ErrorResponse {
        success: false,
        error: error.into(),
    })
}

fn unknown_session(id: Uuid) -> HttpResponse {
    error_response(HttpResponse::NotFound(), format!("Unknown session: {}", id))
}

/// Body extractor settings; malformed bodies get the same JSON error shape as handler errors
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().limit(JSON_LIMIT).error_handler(|err, _req| {
        tracing::warn!("Rejected request body: {}", err);
        let response = error_response(HttpResponse::BadRequest(), err.to_string());
        InternalError::from_response(err, response).into()
    })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        tracing::warn!("Rejected request path: {}", err);
        let response = error_response(HttpResponse::BadRequest(), err.to_string());
        InternalError::from_response(err, response).into()
    })
}

// API Handlers

/// POST /api/new-game
/// Start a game on a difficulty preset, with a random seed unless one is given
async fn new_game(store: web::Data<SessionStore>, req: web::Json<NewGameRequest>) -> HttpResponse {
    tracing::info!(
        "Received new-game request: difficulty={}, seed={:?}",
        req.difficulty,
        req.seed
    );

    let created = match req.seed {
        Some(seed) => GameSession::new(req.difficulty, seed),
        None => GameSession::new_random(req.difficulty),
    };

    let session = match created {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to create session: {}", e);
            return error_response(HttpResponse::BadRequest(), e.to_string());
        }
    };

    let snapshot = session.snapshot();
    let session_id = match store.insert(session) {
        Ok(id) => id,
        Err(response) => return response,
    };

    tracing::info!("Created session {} (seed {})", session_id, snapshot.seed);
    HttpResponse::Ok().json(NewGameResponse {
        success: true,
        session_id,
        session: snapshot,
    })
}

/// GET /api/sessions/{id}
async fn get_session(store: web::Data<SessionStore>, id: web::Path<Uuid>) -> HttpResponse {
    match store.with_session(*id, |session| session.snapshot()) {
        Ok(session) => HttpResponse::Ok().json(SessionResponse { success: true, session }),
        Err(response) => response,
    }
}

/// POST /api/sessions/{id}/move
/// Attempt one step; walls and the heart boundary are enforced here
async fn move_player(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
    req: web::Json<MoveRequest>,
) -> HttpResponse {
    let id = *id;
    let result = store.with_session(id, |session| {
        let outcome = session.try_move(req.direction);
        (outcome, session.snapshot())
    });

    match result {
        Ok((outcome, session)) => {
            tracing::info!("Session {}: move {} -> {:?}", id, req.direction, outcome);
            HttpResponse::Ok().json(MoveResponse {
                success: true,
                outcome,
                session,
            })
        }
        Err(response) => response,
    }
}

/// POST /api/sessions/{id}/hint
/// Spend one hint and return the next cells of the route
async fn request_hint(store: web::Data<SessionStore>, id: web::Path<Uuid>) -> HttpResponse {
    let id = *id;
    let result = store.with_session(id, |session| {
        let outcome = session.request_hint();
        (outcome, session.snapshot())
    });

    match result {
        Ok((outcome, session)) => {
            let (label, trail) = match outcome {
                HintOutcome::Shown(trail) => ("shown", Some(trail)),
                HintOutcome::Exhausted => ("exhausted", None),
                HintOutcome::Unavailable => ("unavailable", None),
                HintOutcome::GameOver => ("gameover", None),
            };
            tracing::info!("Session {}: hint {} ({} left)", id, label, session.hints_left);
            HttpResponse::Ok().json(HintResponse {
                success: true,
                outcome: label,
                trail,
                session,
            })
        }
        Err(response) => response,
    }
}

/// DELETE /api/sessions/{id}
/// Drop a finished or abandoned game
async fn delete_session(store: web::Data<SessionStore>, id: web::Path<Uuid>) -> HttpResponse {
    let id = *id;
    match store.remove(id) {
        Ok(()) => {
            tracing::info!("Deleted session {}", id);
            HttpResponse::Ok().json(serde_json::json!({ "success": true }))
        }
        Err(response) => response,
    }
}

/// GET /health
/// Health check endpoint
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "heart-maze-api"
    }))
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .route("/health", web::get().to(health))
        .route("/api/new-game", web::post().to(new_game))
        .route("/api/sessions/{id}", web::get().to(get_session))
        .route("/api/sessions/{id}", web::delete().to(delete_session))
        .route("/api/sessions/{id}/move", web::post().to(move_player))
        .route("/api/sessions/{id}/hint", web::post().to(request_hint));
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Heart Maze API Server");

    let bind_address = std::env::var(BIND_ADDRESS_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    tracing::info!("Binding to {}", bind_address);

    let store = web::Data::new(SessionStore::default());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(store.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}

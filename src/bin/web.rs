//! Single binary web server: REST API over the bracket engine, static front-end from /static.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, STATIC_DIR (default "static"),
//! INACTIVITY_TIMEOUT_HOURS (default 12).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_manager_web::{
    add_participants, bracket_layout, create_tournament, export_csv, export_json, import_csv,
    import_json, import_text, record_match_result, remove_participant, render_layout_text,
    reset_tournament, GameMatch, InsertParticipant, InsertTournament, ParticipantId,
    Tournament, TournamentError, TournamentId, TournamentSettings, TournamentStore,
};
use serde::Deserialize;
use std::time::Duration;

type AppState = Data<TournamentStore>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddParticipantsBody {
    participants: Vec<InsertParticipant>,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ImportFormat {
    Csv,
    Json,
    Text,
}

#[derive(Deserialize)]
struct ImportQuery {
    format: ImportFormat,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id.
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Path segments: tournament id and export format (json, csv, layout, text).
#[derive(Deserialize)]
struct ExportPath {
    id: TournamentId,
    format: String,
}

/// Map a tournament error to a status: 404 for unknown ids, 500 for a corrupted
/// bracket or store, 400 for everything the caller can fix.
fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::TournamentNotFound(_) | TournamentError::ParticipantNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        ref e if e.is_internal() => {
            log::error!("Refusing to persist: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond(result: Result<Tournament, TournamentError>) -> HttpResponse {
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// File-name friendly tournament name ("Spring Open" -> "Spring-Open").
fn file_stem(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-manager-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// All tournaments, most recent first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match state.list() {
        Ok(all) => HttpResponse::Ok().json(all),
        Err(e) => error_response(e),
    }
}

/// Create a tournament and its bracket from the submitted roster.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<InsertTournament>) -> HttpResponse {
    let tournament = match create_tournament(body.into_inner()) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    match state.insert(tournament.clone()) {
        Ok(()) => HttpResponse::Ok().json(tournament),
        Err(e) => error_response(e),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.get(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.delete(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(e),
    }
}

/// Add participants; the bracket is regenerated and all results are lost.
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participants(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantsBody>,
) -> HttpResponse {
    let participants = body.into_inner().participants;
    respond(state.update(path.id, |t| add_participants(t, participants)))
}

/// Remove a participant; the bracket is regenerated.
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_remove_participant(
    state: AppState,
    path: Path<TournamentParticipantPath>,
) -> HttpResponse {
    let participant_id = path.participant_id;
    respond(state.update(path.id, |t| remove_participant(t, participant_id)))
}

/// Submit an edited match (winner, result type, scores). Winners propagate toward the final.
#[put("/api/tournaments/{id}/matches")]
async fn api_update_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<GameMatch>,
) -> HttpResponse {
    let edited = body.into_inner();
    respond(state.update(path.id, |t| record_match_result(t, edited)))
}

/// Clear every result, keeping the first-round draw.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.update(path.id, |t| {
        reset_tournament(t);
        Ok(())
    }))
}

#[put("/api/tournaments/{id}/settings")]
async fn api_update_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    let settings = body.into_inner();
    respond(state.update(path.id, |t| {
        t.update_settings(settings);
        Ok(())
    }))
}

/// Parse a participant list (raw request body) without creating anything.
#[post("/api/import")]
async fn api_import(query: Query<ImportQuery>, body: String) -> HttpResponse {
    let parsed = match query.format {
        ImportFormat::Csv => import_csv(&body),
        ImportFormat::Json => import_json(&body),
        ImportFormat::Text => import_text(&body),
    };
    match parsed {
        Ok(participants) => HttpResponse::Ok().json(participants),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[get("/api/tournaments/{id}/export/{format}")]
async fn api_export(state: AppState, path: Path<ExportPath>) -> HttpResponse {
    let t = match state.get(path.id) {
        Ok(t) => t,
        Err(e) => return error_response(e),
    };
    let stem = file_stem(&t.name);
    match path.format.as_str() {
        "json" => match export_json(&t) {
            Ok(body) => HttpResponse::Ok()
                .content_type("application/json")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}-tournament.json\"", stem),
                ))
                .body(body),
            Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        },
        "csv" => match export_csv(&t) {
            Ok(body) => HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}-participants.csv\"", stem),
                ))
                .body(body),
            Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
        },
        "layout" => HttpResponse::Ok().json(bracket_layout(&t)),
        "text" => HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(render_layout_text(&t)),
        other => HttpResponse::NotFound()
            .json(serde_json::json!({ "error": format!("Unknown export format: {}", other) })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let inactivity_hours: u64 = std::env::var("INACTIVITY_TIMEOUT_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let inactivity_timeout = Duration::from_secs(inactivity_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TournamentStore::new());

    // Background task: every 30 minutes, remove tournaments nobody has touched recently
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            if let Err(e) = state_cleanup.remove_inactive(inactivity_timeout) {
                log::error!("Cleanup failed: {}", e);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_participants)
            .service(api_remove_participant)
            .service(api_update_match)
            .service(api_reset_tournament)
            .service(api_update_settings)
            .service(api_import)
            .service(api_export)
            .service(Files::new("/static", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await
}

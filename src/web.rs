use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use actix_files::Files;
use log::info;
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};
use crate::client::GenerationClient;
use crate::config::ViewerConfig;
use crate::display::render_page;
use crate::error::ViewerError;
use crate::filter::FilterTarget;
use crate::form::{FormAction, CSV_FILE_NAME, JSON_FILE_NAME};
use crate::session::ViewerSession;

// One editor session per server process
pub struct AppState {
    pub session: Mutex<ViewerSession>,
    pub client: GenerationClient,
}

impl AppState {
    pub fn new(client: GenerationClient) -> Self {
        AppState {
            session: Mutex::new(ViewerSession::new()),
            client,
        }
    }
}

#[derive(Deserialize)]
pub struct FilterRequest {
    target: FilterTarget,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    query: String,
}

fn lock_session(state: &AppState) -> Result<MutexGuard<'_, ViewerSession>> {
    state
        .session
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Session state is unavailable"))
}

fn error_response(err: &ViewerError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "message": err.to_string()});
    match err {
        ViewerError::GenerationInFlight | ViewerError::NoSchedule => {
            HttpResponse::Conflict().json(body)
        }
        ViewerError::Transport(_) | ViewerError::Application(_) => {
            HttpResponse::BadGateway().json(body)
        }
        ViewerError::Io(_) | ViewerError::Csv(_) | ViewerError::Json(_) => {
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn attachment(content_type: &str, file_name: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(body)
}

// Page
async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = lock_session(&state)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&session.view())))
}

async fn get_form(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = lock_session(&state)?;
    Ok(HttpResponse::Ok().json(session.form()))
}

async fn form_action(
    action: web::Json<FormAction>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut session = lock_session(&state)?;
    match session.apply(action.into_inner()) {
        Ok(created) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "created": created,
            "form": session.form(),
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

// Sends the current form to the generator; the lock is not held while waiting.
async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    let request = {
        let mut session = lock_session(&state)?;
        match session.begin_generation() {
            Ok(request) => request,
            Err(e) => return Ok(error_response(&e)),
        }
    };

    // The request runs in its own task so the session is settled even if this
    // handler is dropped when the caller disconnects
    let task_state = state.clone();
    let task = actix_web::rt::spawn(async move {
        let outcome = task_state.client.generate(&request).await;
        let failure = outcome.as_ref().err().map(error_response);
        let mut session = lock_session(&task_state)?;
        session.finish_generation(outcome);
        Ok::<_, actix_web::Error>(match failure {
            Some(response) => response,
            None => HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "view": session.view(),
            })),
        })
    });

    task.await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = lock_session(&state)?;
    Ok(HttpResponse::Ok().json(session.view()))
}

async fn select_filter(
    req: web::Json<FilterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut session = lock_session(&state)?;
    session.select_target(req.into_inner().target);
    Ok(HttpResponse::Ok().json(session.view()))
}

async fn update_search(
    req: web::Json<SearchRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut session = lock_session(&state)?;
    session.update_search(&req.query);
    Ok(HttpResponse::Ok().json(session.view()))
}

async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = lock_session(&state)?;
    match session.export_csv() {
        Ok(csv) => Ok(attachment("text/csv; charset=utf-8", CSV_FILE_NAME, csv)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn export_json(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = lock_session(&state)?;
    match session.save_json() {
        Ok(json) => Ok(attachment("application/json", JSON_FILE_NAME, json)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn import_json(body: String, state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut session = lock_session(&state)?;
    match session.load_json(&body) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "form": session.form(),
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Registers every route except static files
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/form", web::get().to(get_form))
        .route("/api/form/action", web::post().to(form_action))
        .route("/api/generate", web::post().to(generate))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/filter", web::post().to(select_filter))
        .route("/api/search", web::post().to(update_search))
        .route("/export/schedule.csv", web::get().to(export_csv))
        .route("/export/schedule_data.json", web::get().to(export_json))
        .route("/import", web::post().to(import_json));
}

pub async fn start_server(config: ViewerConfig) -> std::io::Result<()> {
    let client = GenerationClient::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    info!("Forwarding generation requests to {}", client.url());
    let app_state = web::Data::new(AppState::new(client));
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", static_dir.clone()))
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}

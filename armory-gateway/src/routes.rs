//! Axum route handlers for the Armory gateway API.

use armory_core::{
    BindProtocol, Cryptor, Payload, PayloadId, ReverseProtocol, ShellMode, MIN_PASSWORD_LEN,
};
use armory_veil::GeneratorOptions;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{auth, auth::AuthenticatedUser, error::GatewayError, rc, state::AppState};

// ── Request / response types ──────────────────────────────────────────────────

/// Creation form fields. Either address field may be present; only the one
/// matching the shell mode is read.
#[derive(Debug, Deserialize)]
pub struct CreateShellForm {
    pub lhost: Option<String>,
    pub rhost: Option<String>,
    pub lport: Option<String>,
    pub protocol: Option<String>,
    pub cryptor: Option<String>,
}

/// Context for rendering a creation form: the mode's protocol whitelist, the
/// shared cryptor whitelist, and any validation errors to show.
#[derive(Debug, Serialize)]
pub struct ShellFormView {
    pub errors: Vec<String>,
    pub protocols: Vec<&'static str>,
    pub cryptors: Vec<&'static str>,
}

impl ShellFormView {
    fn for_mode(mode: ShellMode, errors: Vec<String>) -> Self {
        let protocols = match mode {
            ShellMode::Reverse => ReverseProtocol::ALL.iter().map(|p| p.as_str()).collect(),
            ShellMode::Bind => BindProtocol::ALL.iter().map(|p| p.as_str()).collect(),
        };
        Self {
            errors,
            protocols,
            cryptors: Cryptor::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UuidQuery {
    pub uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub old_password: Option<String>,
    pub pass1: Option<String>,
    pub pass2: Option<String>,
}

/// Settings view: an empty error list means the last operation succeeded.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub errors: Vec<String>,
}

// ── Router ────────────────────────────────────────────────────────────────────

/// Build the application router with the given state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(auth::login))
        .route("/create/{mode}", get(create_form).post(create_shell))
        .route("/history", get(history))
        .route("/download/{kind}", get(download))
        .route("/delete", post(delete_payload))
        .route("/settings", get(settings_form).post(change_password))
        .route("/health", get(health))
        .route("/404", get(not_found_page))
        .fallback(not_found_page)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

/// Generic not-found page; also the router fallback. Deliberately carries no
/// detail about what was missing.
pub async fn not_found_page() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not found"})),
    )
}

/// `GET /create/{mode}` — render the creation form context for the mode.
/// Unknown mode segments redirect to the generic not-found route.
pub async fn create_form(Path(mode): Path<String>, _user: AuthenticatedUser) -> Response {
    match ShellMode::from_segment(&mode) {
        Some(mode) => Json(ShellFormView::for_mode(mode, Vec::new())).into_response(),
        None => Redirect::to("/404").into_response(),
    }
}

/// `POST /create/{mode}` — validate the form, persist the record, run the
/// generator, and redirect to the record's history view.
///
/// Validation failure re-renders the form context with the single failing
/// message and persists nothing. A generator failure still redirects: the
/// record stays in history marked failed, with the reason attached.
pub async fn create_shell(
    State(state): State<AppState>,
    Path(mode): Path<String>,
    user: AuthenticatedUser,
    Form(form): Form<CreateShellForm>,
) -> Response {
    let Some(mode) = ShellMode::from_segment(&mode) else {
        return Redirect::to("/404").into_response();
    };

    let lport = form.lport.as_deref().unwrap_or("");
    let protocol = form.protocol.as_deref().unwrap_or("");
    let cryptor = form.cryptor.as_deref().unwrap_or("");
    let result = match mode {
        ShellMode::Reverse => Payload::reverse(
            user.id(),
            form.lhost.as_deref().unwrap_or(""),
            lport,
            protocol,
            cryptor,
        ),
        ShellMode::Bind => Payload::bind(
            user.id(),
            form.rhost.as_deref().unwrap_or(""),
            lport,
            protocol,
            cryptor,
        ),
    };
    let payload = match result {
        Ok(payload) => payload,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ShellFormView::for_mode(mode, vec![error.to_string()])),
            )
                .into_response();
        }
    };

    let label = payload.label();
    let options = GeneratorOptions::for_payload(&payload);
    let id = state.payloads.insert(payload);
    tracing::info!(payload = %id, %label, "payload record created");

    match state.generator.generate(&options).await {
        Ok(artifact) => state.payloads.attach_artifact(id, artifact.file_path),
        Err(error) => {
            tracing::error!(payload = %id, error = %error, "payload generation failed");
            state.payloads.mark_failed(id, error.to_string());
        }
    }

    Redirect::to(&format!("/history?uuid={id}")).into_response()
}

/// `GET /history[?uuid=]` — the caller's chronological payload history, or a
/// single owned record.
///
/// # Errors
/// Returns [`GatewayError::NotFound`] for a malformed, unknown, or foreign
/// uuid — indistinguishably.
pub async fn history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UuidQuery>,
) -> Result<Response, GatewayError> {
    match query.uuid.as_deref() {
        Some(raw) => {
            let id = parse_payload_id(raw).ok_or(GatewayError::NotFound)?;
            let payload = state
                .payloads
                .get_owned(id, user.id())
                .ok_or(GatewayError::NotFound)?;
            Ok(Json(payload).into_response())
        }
        None => Ok(Json(state.payloads.history(user.id())).into_response()),
    }
}

/// `GET /download/{kind}?uuid=` — stream a generated artifact back to its
/// owner. `exe` is the compiled executable, `rc` the companion resource
/// script. Unknown kinds redirect to the generic not-found route.
///
/// # Errors
/// Returns [`GatewayError::NotFound`] for a malformed, unknown, or foreign
/// uuid, or when the executable has not been generated.
pub async fn download(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    user: AuthenticatedUser,
    Query(query): Query<UuidQuery>,
) -> Result<Response, GatewayError> {
    let raw_uuid = query.uuid.as_deref().unwrap_or("");
    match kind.as_str() {
        "exe" => download_exe(&state, user, raw_uuid).await,
        "rc" => download_rc(&state, user, raw_uuid),
        _ => Ok(Redirect::to("/404").into_response()),
    }
}

/// `POST /delete?uuid=` — ownership-checked, idempotent delete. A missing,
/// malformed, or foreign uuid changes nothing; the caller always lands back
/// on the history view.
pub async fn delete_payload(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UuidQuery>,
) -> Redirect {
    if let Some(id) = query.uuid.as_deref().and_then(parse_payload_id) {
        state.payloads.remove_owned(id, user.id());
    }
    Redirect::to("/history")
}

/// `GET /settings` — the settings view with no errors.
pub async fn settings_form(_user: AuthenticatedUser) -> Json<SettingsView> {
    Json(SettingsView { errors: Vec::new() })
}

/// `POST /settings` — change the caller's password.
///
/// Checks run in a fixed order and the first failure wins: all fields
/// present, both new values at least [`MIN_PASSWORD_LEN`] characters, new
/// values equal, old password correct. Exactly one error message is reported
/// at a time; success returns an empty error list.
///
/// # Errors
/// Returns [`GatewayError::Unauthorized`] if the session's user no longer
/// exists, or a hashing failure propagated as
/// [`GatewayError::Validation`].
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Form(form): Form<SettingsForm>,
) -> Result<Response, GatewayError> {
    let (Some(old), Some(pass1), Some(pass2)) = (form.old_password, form.pass1, form.pass2)
    else {
        return Ok(settings_error("Fill in all the forms"));
    };
    if pass1.chars().count() < MIN_PASSWORD_LEN || pass2.chars().count() < MIN_PASSWORD_LEN {
        return Ok(settings_error("New password too short (min. 12)"));
    }
    if pass1 != pass2 {
        return Ok(settings_error("New passwords do not match"));
    }
    let current = state.users.get(user.id()).ok_or(GatewayError::Unauthorized)?;
    if !current.validate_password(&old) {
        return Ok(settings_error("Old password incorrect"));
    }
    state.users.update_password(user.id(), &pass1)?;
    tracing::info!(user = %current.username, "password changed");
    Ok(Json(SettingsView { errors: Vec::new() }).into_response())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_payload_id(raw: &str) -> Option<PayloadId> {
    raw.parse::<Uuid>().ok().map(PayloadId::from)
}

fn settings_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(SettingsView { errors: vec![message.to_owned()] }),
    )
        .into_response()
}

async fn download_exe(
    state: &AppState,
    user: AuthenticatedUser,
    raw_uuid: &str,
) -> Result<Response, GatewayError> {
    let id = parse_payload_id(raw_uuid).ok_or(GatewayError::NotFound)?;
    let payload = state
        .payloads
        .get_owned(id, user.id())
        .ok_or(GatewayError::NotFound)?;
    let file_path = payload.file_path.clone().ok_or(GatewayError::NotFound)?;
    // Whole-file buffering; artifacts are small executables.
    let data = tokio::fs::read(&file_path)
        .await
        .map_err(|_| GatewayError::NotFound)?;
    let name = payload.file_name().unwrap_or("payload.exe").to_owned();
    Ok(attachment_response("application/x-msdos-program", &name, data))
}

fn download_rc(
    state: &AppState,
    user: AuthenticatedUser,
    raw_uuid: &str,
) -> Result<Response, GatewayError> {
    let id = parse_payload_id(raw_uuid).ok_or(GatewayError::NotFound)?;
    let payload = state
        .payloads
        .get_owned(id, user.id())
        .ok_or(GatewayError::NotFound)?;
    let script = rc::resource_script(&payload);
    Ok(attachment_response(
        "text/plain",
        &payload.rc_file_name(),
        script.into_bytes(),
    ))
}

/// Build an attachment response with explicit length and a sanitized file
/// name. Newlines are stripped from the name so it cannot smuggle header
/// lines.
fn attachment_response(content_type: &'static str, file_name: &str, data: Vec<u8>) -> Response {
    let sanitized = file_name.replace(['\r', '\n'], "");
    let disposition = HeaderValue::from_str(&format!("attachment; filename={sanitized}"))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(data.len()));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    (StatusCode::OK, headers, data).into_response()
}

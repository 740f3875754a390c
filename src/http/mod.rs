//! HTTP surface — axum routes wiring the wizard to sessions and rendering.
//!
//! Route map:
//! - `GET /`            entry: reset the profile (auth flag survives), go to step 1
//! - `GET|POST /login`  access-code gate (only active when a code is configured)
//! - `GET|POST /step/{n}` view / submit a wizard step
//! - `GET /summary`     recompute and render the summary
//! - `POST /suggest/{field}` streamed suggestion (SSE)
//! - `GET /health`      liveness probe
//!
//! The auth gate is a middleware layer; step handlers assume the request has
//! already passed it.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::WizardError;
use crate::store::{SessionState, SessionStore};
use crate::suggest::{SuggestionEvent, SuggestionField};
use crate::view::ViewRenderer;
use crate::wizard::{view as wizard_view, StepOutcome, WizardMachine, WizardStep};

const SESSION_COOKIE: &str = "sid";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub machine: Arc<WizardMachine>,
    pub renderer: Arc<dyn ViewRenderer>,
    pub config: Arc<AppConfig>,
}

/// Build the Axum router.
pub fn app_routes(state: AppState) -> Router {
    let gated = Router::new()
        .route("/", get(entry))
        .route("/step/{n}", get(view_step).post(submit_step))
        .route("/summary", get(view_summary))
        .route("/suggest/{field}", post(stream_suggestion))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(gated)
        .route("/login", get(view_login).post(submit_login))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Sessions ────────────────────────────────────────────────────────────

fn cookie_session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// A loaded (or freshly minted) session.
struct Session {
    id: String,
    state: SessionState,
    /// A new id was generated; the response must set the cookie.
    is_new: bool,
}

async fn load_session(app: &AppState, headers: &HeaderMap) -> Session {
    if let Some(id) = cookie_session_id(headers) {
        let state = match app.store.get(&id).await {
            Ok(found) => found.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Session load failed, starting fresh");
                SessionState::default()
            }
        };
        return Session {
            id,
            state,
            is_new: false,
        };
    }
    Session {
        id: Uuid::new_v4().to_string(),
        state: SessionState::default(),
        is_new: true,
    }
}

async fn save_session(app: &AppState, session: &Session) {
    if let Err(e) = app.store.put(&session.id, session.state.clone()).await {
        warn!(error = %e, session_id = %session.id, "Session save failed");
    }
}

fn with_cookie(session: &Session, response: Response) -> Response {
    if !session.is_new {
        return response;
    }
    let mut response = response;
    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        session.id
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

// ── Auth gate ───────────────────────────────────────────────────────────

/// Redirects unauthenticated sessions to /login when an access code is
/// configured. With no code configured the gate is a no-op.
async fn require_auth(
    State(app): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if app.config.access_code.is_none() {
        return next.run(request).await;
    }
    let authenticated = match cookie_session_id(request.headers()) {
        Some(id) => app
            .store
            .get(&id)
            .await
            .ok()
            .flatten()
            .map(|s| s.authenticated)
            .unwrap_or(false),
        None => false,
    };
    if authenticated {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "breakeven-planner"
    }))
}

/// Entry point: always starts fresh. Clears the in-progress profile
/// (deliberately — returning to the root discards work) while keeping the
/// session's auth flag, then sends the user to step 1.
async fn entry(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let mut session = load_session(&app, &headers).await;
    session.state.reset_profile();
    save_session(&app, &session).await;
    info!(session_id = %session.id, "Wizard entry — profile reset");
    with_cookie(&session, Redirect::to("/step/1").into_response())
}

async fn view_login(State(app): State<AppState>) -> Response {
    render_login(&app, None)
}

async fn submit_login(
    State(app): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let Some(expected) = app.config.access_code.as_deref() else {
        // No gate configured; nothing to log in to.
        return Redirect::to("/").into_response();
    };
    let submitted = form.get("access_code").map(String::as_str).unwrap_or("");
    if submitted != expected {
        warn!("Login attempt with wrong access code");
        return render_login(&app, Some("Invalid access code"));
    }

    let mut session = load_session(&app, &headers).await;
    session.state.authenticated = true;
    save_session(&app, &session).await;
    info!(session_id = %session.id, "Session authenticated");
    with_cookie(&session, Redirect::to("/").into_response())
}

fn render_login(app: &AppState, error: Option<&str>) -> Response {
    let context = serde_json::json!({ "view": "login", "error": error });
    Html(app.renderer.render("login", &context)).into_response()
}

/// GET a step: guard the prerequisite chain, then render. Never mutates the
/// profile.
async fn view_step(
    State(app): State<AppState>,
    Path(n): Path<u8>,
    headers: HeaderMap,
) -> Response {
    let Some(step) = WizardStep::from_index(n) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let session = load_session(&app, &headers).await;

    if let Some(target) = app.machine.guard(step, &session.state.profile) {
        return with_cookie(&session, Redirect::to(&route_for(target)).into_response());
    }

    let context = wizard_view::step_view(step, &session.state.profile, None);
    let body = app.renderer.render(&step.to_string(), &context);
    with_cookie(&session, Html(body).into_response())
}

/// POST a step: either a value submission (validate, store, advance) or a
/// suggestion request (cache, stay put).
async fn submit_step(
    State(app): State<AppState>,
    Path(n): Path<u8>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let Some(step) = WizardStep::from_index(n) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let mut session = load_session(&app, &headers).await;

    let outcome = match app
        .machine
        .handle_submit(step, &form, &mut session.state.profile)
        .await
    {
        Ok(outcome) => outcome,
        Err(WizardError::InvalidField(field)) => {
            warn!(field = %field, step = %step, "Suggestion request named an unknown field");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("Invalid field specified: {field}") })),
            )
                .into_response();
        }
    };

    let response = match outcome {
        StepOutcome::Redirect(target) => Redirect::to(&route_for(target)).into_response(),
        StepOutcome::Advance(next) => {
            save_session(&app, &session).await;
            Redirect::to(&route_for(next)).into_response()
        }
        StepOutcome::Invalid { message, .. } => {
            // No state change — re-render the same step with the error.
            let context = wizard_view::step_view(step, &session.state.profile, Some(&message));
            Html(app.renderer.render(&step.to_string(), &context)).into_response()
        }
        StepOutcome::Suggestion { suggestion, .. } => {
            // The suggestion cache changed; persist it, then answer
            // API-style without a page transition.
            save_session(&app, &session).await;
            Json(serde_json::json!({
                "suggestion": suggestion.text,
                "amount": suggestion.amount,
            }))
            .into_response()
        }
    };
    with_cookie(&session, response)
}

/// GET the summary: recompute metrics and chart from the stored profile.
async fn view_summary(State(app): State<AppState>, headers: HeaderMap) -> Response {
    let session = load_session(&app, &headers).await;

    if let Some(target) = app.machine.guard(WizardStep::Summary, &session.state.profile) {
        return with_cookie(&session, Redirect::to(&route_for(target)).into_response());
    }

    let context = wizard_view::summary_view(&session.state.profile, &app.config);
    let body = app.renderer.render("summary", &context);
    with_cookie(&session, Html(body).into_response())
}

/// POST /suggest/{field}: stream a suggestion as server-sent events.
///
/// Chunks arrive as `{"type":"chunk","content":…}` events; the final event is
/// `{"type":"done","suggestion":…}` carrying the parsed amount. The cached
/// suggestion is persisted when the stream completes.
async fn stream_suggestion(
    State(app): State<AppState>,
    Path(field): Path<String>,
    headers: HeaderMap,
) -> Response {
    let field: SuggestionField = match field.parse() {
        Ok(f) => f,
        Err(WizardError::InvalidField(f)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("Invalid field specified: {f}") })),
            )
                .into_response();
        }
    };

    let session = load_session(&app, &headers).await;
    let rx = app
        .machine
        .engine()
        .suggest_stream(field, &session.state.profile)
        .await;

    let store = Arc::clone(&app.store);
    let session_id = session.id.clone();
    let events = ReceiverStream::new(rx).then(move |event| {
        let store = Arc::clone(&store);
        let session_id = session_id.clone();
        async move {
            if let SuggestionEvent::Done { suggestion } = &event {
                // Persist the completed suggestion into the session cache,
                // establishing the session record if the stream was the
                // client's first touch.
                let mut state = store
                    .get(&session_id)
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or_default();
                state
                    .profile
                    .cache_suggestion(field.as_str(), &suggestion.text);
                if let Err(e) = store.put(&session_id, state).await {
                    warn!(error = %e, "Failed to persist streamed suggestion");
                }
            }
            let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
            Ok::<_, Infallible>(Event::default().data(data))
        }
    });

    let response = Sse::new(events).keep_alive(KeepAlive::default()).into_response();
    with_cookie(&session, response)
}

/// Route path for a wizard step.
fn route_for(step: WizardStep) -> String {
    match step {
        WizardStep::Summary => "/summary".to_string(),
        other => format!("/step/{}", other.index()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_parsing_finds_sid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sid=abc-123; other=x"),
        );
        assert_eq!(cookie_session_id(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn cookie_parsing_handles_absence() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookie_session_id(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie_session_id(&headers), None);
    }

    #[test]
    fn step_routes() {
        assert_eq!(route_for(WizardStep::Step1), "/step/1");
        assert_eq!(route_for(WizardStep::Step6), "/step/6");
        assert_eq!(route_for(WizardStep::Summary), "/summary");
    }
}

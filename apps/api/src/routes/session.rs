use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::form::Control;
use crate::models::document::{Section, TemplateId};
use crate::models::template::{template_catalog, TemplateCard};
use crate::preview::HighlightChange;
use crate::session::SessionSnapshot;
use crate::state::AppState;
use crate::wizard::StepChange;

#[derive(Deserialize)]
pub struct LoadQuery {
    pub new: Option<String>,
}

#[derive(Deserialize)]
pub struct ValueBody {
    pub value: String,
}

#[derive(Deserialize)]
pub struct TemplateBody {
    pub template: String,
}

#[derive(Deserialize)]
pub struct FocusBody {
    pub control: String,
    pub index: Option<usize>,
}

#[derive(Serialize)]
pub struct EntryAddedResponse {
    pub index: usize,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

#[derive(Serialize)]
pub struct NavigationResponse {
    pub change: Option<StepChange>,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

#[derive(Serialize)]
pub struct FocusResponse {
    pub change: Option<HighlightChange>,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

fn parse_section(raw: &str) -> Result<Section, AppError> {
    Section::from_str(raw).map_err(AppError::Validation)
}

/// GET /api/v1/session?new=true
///
/// Only the literal `true` starts a new document.
pub async fn handle_load_session(
    State(state): State<AppState>,
    Query(params): Query<LoadQuery>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let new_document = params.new.as_deref() == Some("true");
    let mut session = state.session.lock().await;
    session.flush().await?;
    session.load(new_document).await?;
    Ok(Json(session.snapshot()))
}

/// GET /api/v1/session/preview
pub async fn handle_preview(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    Html(session.preview().html.clone())
}

/// PUT /api/v1/session/fields/:control
pub async fn handle_edit_field(
    State(state): State<AppState>,
    Path(control): Path<String>,
    Json(body): Json<ValueBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let control = Control::resolve(&control, None)?;
    let mut session = state.session.lock().await;
    session.edit(&control, body.value)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/session/entries/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<EntryAddedResponse>, AppError> {
    let section = parse_section(&section)?;
    let mut session = state.session.lock().await;
    let index = session.add_entry(section);
    Ok(Json(EntryAddedResponse {
        index,
        snapshot: session.snapshot(),
    }))
}

/// PUT /api/v1/session/entries/:section/:index/:field
pub async fn handle_edit_entry(
    State(state): State<AppState>,
    Path((section, index, field)): Path<(String, usize, String)>,
    Json(body): Json<ValueBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let control = Control::entry(parse_section(&section)?, index, &field)?;
    let mut session = state.session.lock().await;
    session.edit(&control, body.value)?;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/session/entries/:section/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let section = parse_section(&section)?;
    let mut session = state.session.lock().await;
    session.remove_entry(section, index).await?;
    Ok(Json(session.snapshot()))
}

/// PUT /api/v1/session/template
pub async fn handle_select_template(
    State(state): State<AppState>,
    Json(body): Json<TemplateBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let template = TemplateId::from_str(&body.template).map_err(AppError::Validation)?;
    let mut session = state.session.lock().await;
    session.select_template(template).await?;
    Ok(Json(session.snapshot()))
}

/// GET /api/v1/templates
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateCard>> {
    let session = state.session.lock().await;
    Json(template_catalog(session.template()))
}

/// POST /api/v1/session/wizard/next
pub async fn handle_next_step(State(state): State<AppState>) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    let change = session.next_step();
    Json(NavigationResponse {
        change,
        snapshot: session.snapshot(),
    })
}

/// POST /api/v1/session/wizard/previous
pub async fn handle_previous_step(State(state): State<AppState>) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    let change = session.previous_step();
    Json(NavigationResponse {
        change,
        snapshot: session.snapshot(),
    })
}

/// POST /api/v1/session/wizard/steps/:step
///
/// A rejected jump is not an error: `change` is null and the wizard is unchanged.
pub async fn handle_jump_to_step(
    State(state): State<AppState>,
    Path(step): Path<usize>,
) -> Json<NavigationResponse> {
    let mut session = state.session.lock().await;
    let change = session.jump_to_step(step);
    Json(NavigationResponse {
        change,
        snapshot: session.snapshot(),
    })
}

/// POST /api/v1/session/focus
pub async fn handle_focus(
    State(state): State<AppState>,
    Json(body): Json<FocusBody>,
) -> Result<Json<FocusResponse>, AppError> {
    let control = Control::resolve(&body.control, body.index)?;
    let mut session = state.session.lock().await;
    let change = session.focus(&control);
    Ok(Json(FocusResponse {
        change,
        snapshot: session.snapshot(),
    }))
}

/// POST /api/v1/session/blur
pub async fn handle_blur(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.blur();
    Json(session.snapshot())
}

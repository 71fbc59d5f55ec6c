//! Handlers for the perk resource.
//!
//! Each handler maps one request to at most one store call. Create and
//! update run the validators from `perks_core::perk` first and never touch
//! the store when validation fails.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use perks_core::error::CoreError;
use perks_core::perk::{validate_new_perk, validate_perk_changes};
use perks_core::types::DbId;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::query::PerkTitleParams;
use crate::response::{AckResponse, PerkListResponse, PerkResponse};
use crate::state::AppState;

const ENTITY: &str = "Perk";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a path segment into a perk id. Ids are positive integers.
pub fn parse_perk_id(raw: &str) -> AppResult<DbId> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid perk id '{raw}'")))
}

/// Unwrap a JSON body that must be an object.
fn json_object(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Map<String, Value>> {
    let Json(body) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// Unwrap the `?title=` parameters, reporting a malformed query string as 400.
fn title_params(
    query: Result<Query<PerkTitleParams>, QueryRejection>,
) -> AppResult<PerkTitleParams> {
    let Query(params) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(params)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

/// Exact-title lookup shared by `list_perks` and `search_perks`.
async fn perks_titled(state: &AppState, title: Option<&str>) -> AppResult<impl IntoResponse> {
    let title = title.filter(|t| !t.is_empty()).ok_or_else(|| {
        AppError::BadRequest("title query parameter is required".to_string())
    })?;

    let perks = state.perks.find_by_title(title).await?;

    Ok(Json(PerkListResponse { perks }))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/perks
///
/// List every perk, newest first. When a `title` query key is present this
/// behaves like [`search_perks`].
pub async fn list_perks(
    State(state): State<AppState>,
    query: Result<Query<PerkTitleParams>, QueryRejection>,
) -> AppResult<axum::response::Response> {
    let params = title_params(query)?;
    if params.title.is_some() {
        return Ok(perks_titled(&state, params.title.as_deref())
            .await?
            .into_response());
    }

    let perks = state.perks.find_all().await?;

    Ok(Json(PerkListResponse { perks }).into_response())
}

/// GET /api/v1/perks/search?title=
///
/// Perks whose title matches exactly, newest first. An empty list is a
/// normal result, not a 404.
pub async fn search_perks(
    State(state): State<AppState>,
    query: Result<Query<PerkTitleParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let params = title_params(query)?;
    perks_titled(&state, params.title.as_deref()).await
}

/// GET /api/v1/perks/{id}
pub async fn get_perk(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_perk_id(&raw_id)?;

    let perk = state.perks.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

    Ok(Json(PerkResponse { perk }))
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// POST /api/v1/perks
///
/// Validate (fail-fast, defaults applied) and insert. A duplicate
/// `(title, merchant)` pair yields 409.
pub async fn create_perk(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let input = json_object(payload)?;
    let new_perk = validate_new_perk(&input)?;

    let perk = state.perks.insert(&new_perk).await?;

    tracing::info!(
        perk_id = perk.id,
        title = %perk.title,
        category = %perk.category,
        "Perk created"
    );

    Ok((StatusCode::CREATED, Json(PerkResponse { perk })))
}

/// PUT / PATCH /api/v1/perks/{id}
///
/// Only whitelisted fields may be sent; every field violation is reported
/// together. Returns the record as stored after the update.
pub async fn update_perk(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = parse_perk_id(&raw_id)?;
    let input = json_object(payload)?;
    let changes = validate_perk_changes(&input)?;

    let perk = state
        .perks
        .update_by_id(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(perk_id = id, title = %perk.title, "Perk updated");

    Ok(Json(PerkResponse { perk }))
}

/// DELETE /api/v1/perks/{id}
pub async fn delete_perk(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_perk_id(&raw_id)?;

    if !state.perks.delete_by_id(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(perk_id = id, "Perk deleted");

    Ok(Json(AckResponse::ok()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_perk_id_accepts_positive_integers() {
        assert_eq!(parse_perk_id("1").unwrap(), 1);
        assert_eq!(parse_perk_id("9007199254740993").unwrap(), 9_007_199_254_740_993);
    }

    #[test]
    fn parse_perk_id_rejects_malformed_values() {
        for raw in ["", "0", "-4", "abc", "12abc", "1.5", "64b7f0c2e4b0a1a2b3c4d5e6"] {
            assert_matches!(
                parse_perk_id(raw),
                Err(AppError::BadRequest(msg)) if msg.contains("Invalid perk id")
            );
        }
    }
}

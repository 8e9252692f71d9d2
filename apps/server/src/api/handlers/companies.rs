//! Company CRUD handlers.

use crate::{models::CompanyPayload, state::AppState, Error, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// Ids that do not parse can never match a stored record.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| Error::company_not_found(raw))
}

fn json_payload(
    state: &AppState,
    payload: std::result::Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<CompanyPayload> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(Error::PayloadTooLarge {
                limit: state.config.server.max_request_body_size,
            })
        }
        Err(rejection) => Err(Error::validation("body", rejection.body_text())),
    }
}

pub async fn list_companies(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListCompaniesQuery>, QueryRejection>,
) -> Result<Response> {
    let Query(query) =
        query.map_err(|rejection| Error::validation("query", rejection.body_text()))?;

    let params = state
        .company_service
        .list_params(query.page, query.limit, query.search)?;
    let page = state.company_service.list(params).await?;

    Ok((StatusCode::OK, Json(page)).into_response())
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let company = state.company_service.get(parse_id(&id)?).await?;
    Ok((StatusCode::OK, Json(company)).into_response())
}

pub async fn create_company(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<Response> {
    let company = state
        .company_service
        .create(json_payload(&state, payload)?)
        .await?;
    Ok((StatusCode::CREATED, Json(company)).into_response())
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CompanyPayload>, JsonRejection>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let company = state
        .company_service
        .update(id, json_payload(&state, payload)?)
        .await?;
    Ok((StatusCode::OK, Json(company)).into_response())
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    state.company_service.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

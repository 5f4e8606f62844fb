// src/handlers/units.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::units::{Unit, UnitCatalogEntry, UnitFamily},
};

// ---
// Payload: Convert
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertPayload {
    #[schema(example = 5)]
    pub value: Decimal,

    #[schema(example = "Kilo")]
    pub from: Unit,

    #[schema(example = "Libra")]
    pub to: Unit,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub value: Decimal,
    pub from: Unit,
    pub to: Unit,
    pub result: Decimal,
}

// GET /api/units
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Units",
    responses(
        (status = 200, description = "Catálogo de unidades com família e fator", body = [UnitCatalogEntry])
    )
)]
pub async fn list_units(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.units_service.catalog())
}

// GET /api/units/families
#[utoipa::path(
    get,
    path = "/api/units/families",
    tag = "Units",
    responses(
        (status = 200, description = "Famílias de unidades", body = [UnitFamily])
    )
)]
pub async fn list_families(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.units_service.families())
}

// GET /api/units/{unit}/breakdown
#[utoipa::path(
    get,
    path = "/api/units/{unit}/breakdown",
    tag = "Units",
    responses(
        (status = 200, description = "Unidades de inventário em que a unidade de compra quebra", body = [Unit]),
        (status = 422, description = "Unidade desconhecida")
    ),
    params(
        ("unit" = String, Path, description = "Unidade de compra (rótulo, ex.: Caja)")
    )
)]
pub async fn breakdown(
    State(app_state): State<AppState>,
    Path(unit): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let unit = Unit::from_label(&unit).ok_or(AppError::UnknownUnit(unit))?;
    Ok(Json(app_state.units_service.breakdown(unit)))
}

// POST /api/units/convert
#[utoipa::path(
    post,
    path = "/api/units/convert",
    tag = "Units",
    request_body = ConvertPayload,
    responses(
        (status = 200, description = "Valor convertido", body = ConvertResponse),
        (status = 422, description = "Famílias incompatíveis ou unidade discreta")
    )
)]
pub async fn convert(
    State(app_state): State<AppState>,
    Json(payload): Json<ConvertPayload>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state
        .units_service
        .convert(payload.value, payload.from, payload.to)?;

    Ok(Json(ConvertResponse {
        value: payload.value,
        from: payload.from,
        to: payload.to,
        result,
    }))
}

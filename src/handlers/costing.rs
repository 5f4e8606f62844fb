// src/handlers/costing.rs

use axum::{extract::State, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::costing::{
        validate_not_negative, CostSnapshot, RecipeCostInput, YieldData, YieldMetrics,
    },
};

// ---
// Payload: Yield (rendimento de matéria-prima)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YieldPayload {
    pub yield_data: YieldData,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = 10)]
    pub purchase_price: Decimal,

    // Quantas unidades vêm na compra; menor que 1 é tratado como 1
    #[serde(default)]
    #[schema(example = 1)]
    pub purchase_quantity: Decimal,

    #[serde(default)]
    pub conversion_factor: Option<Decimal>,
}

// ---
// Payload: Cost Percent (% custo/preço)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostPercentPayload {
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 30)]
    pub total_cost: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = 100)]
    pub sale_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    #[schema(example = 16)]
    pub tax_percent: Decimal,

    #[serde(default)]
    pub net_of_tax: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostPercentResponse {
    pub percent: Decimal,
}

// POST /api/costing/recipe
#[utoipa::path(
    post,
    path = "/api/costing/recipe",
    tag = "Costing",
    request_body = RecipeCostInput,
    responses(
        (status = 200, description = "Snapshot de custo da receita", body = CostSnapshot),
        (status = 422, description = "Receita contém a si mesma como ingrediente")
    )
)]
pub async fn recipe_snapshot(
    State(app_state): State<AppState>,
    Json(payload): Json<RecipeCostInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let snapshot = app_state.costing_service.recipe_snapshot(&payload)?;

    tracing::info!(
        "Costeo do produto {}: total {}",
        payload.product_id,
        snapshot.total_cost
    );
    Ok(Json(snapshot))
}

// POST /api/costing/yield
#[utoipa::path(
    post,
    path = "/api/costing/yield",
    tag = "Costing",
    request_body = YieldPayload,
    responses(
        (status = 200, description = "Rendimento, merma e preços neto/procesado", body = YieldMetrics)
    )
)]
pub async fn yield_metrics(
    State(app_state): State<AppState>,
    Json(payload): Json<YieldPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let metrics = app_state.costing_service.yield_metrics(
        payload.yield_data,
        payload.purchase_price,
        payload.purchase_quantity,
        payload.conversion_factor,
    );
    Ok(Json(metrics))
}

// POST /api/costing/cost-percent
#[utoipa::path(
    post,
    path = "/api/costing/cost-percent",
    tag = "Costing",
    request_body = CostPercentPayload,
    responses(
        (status = 200, description = "% custo/preço (bruto ou sem IVA)", body = CostPercentResponse)
    )
)]
pub async fn cost_percent(
    State(app_state): State<AppState>,
    Json(payload): Json<CostPercentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let percent = app_state.costing_service.cost_to_price_percent(
        payload.total_cost,
        payload.sale_price,
        payload.tax_percent,
        payload.net_of_tax,
    );
    Ok(Json(CostPercentResponse { percent }))
}

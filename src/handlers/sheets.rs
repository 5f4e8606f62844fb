// src/handlers/sheets.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::i18n::Locale,
    models::costing::TechnicalSheetRequest,
};

// POST /api/sheets/technical
//
// Gera a ficha técnica em PDF. O idioma dos rótulos segue o Accept-Language
// do cliente (es/en).
#[utoipa::path(
    post,
    path = "/api/sheets/technical",
    tag = "Sheets",
    request_body = TechnicalSheetRequest,
    responses(
        (status = 200, description = "Ficha técnica em PDF", content_type = "application/pdf"),
        (status = 422, description = "Receita contém a si mesma como ingrediente"),
        (status = 500, description = "Fonte do PDF ausente")
    )
)]
pub async fn technical_sheet(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<TechnicalSheetRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pdf_bytes = app_state
        .sheet_service
        .technical_sheet(&payload, &locale.0)?;

    tracing::info!(
        "Ficha técnica gerada para '{}' ({} bytes)",
        payload.product.name,
        pdf_bytes.len()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"ficha-{}.pdf\"", payload.product.name),
            ),
        ],
        pdf_bytes,
    ))
}

// src/handlers/products.rs

use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::product::{Product, ProductInput},
};

// POST /api/products/normalize
//
// Aplica as regras de construção por variante (matéria-prima / prato /
// sub-receita) e devolve o produto pronto para o serviço de produtos
// externo persistir. Nada é gravado aqui.
#[utoipa::path(
    post,
    path = "/api/products/normalize",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 200, description = "Produto com os invariantes da variante aplicados", body = Product),
        (status = 400, description = "Peso final fora de (0, 1] com rendimento ativo"),
        (status = 422, description = "Quebra compra → inventário não admissível")
    )
)]
pub async fn normalize(
    State(_app_state): State<AppState>,
    Json(payload): Json<ProductInput>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = Product::normalize(payload)?;

    tracing::info!(
        "Produto {} normalizado como {:?}",
        product.product_id,
        product.kind
    );
    Ok(Json(product))
}

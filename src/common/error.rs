// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::models::units::Unit;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Os erros de regra de negócio (conversão, rendimento) NUNCA são fatais:
// viram 4xx com mensagem legível e o chamador decide se bloqueia o save.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Conversão entre famílias incompatíveis ou envolvendo unidade discreta
    #[error("Conversão inválida: {from} → {to}")]
    InvalidConversion { from: Unit, to: Unit },

    #[error("Unidade desconhecida: {0}")]
    UnknownUnit(String),

    // pesoFinal fora de (0, 1] para matéria-prima com rendimento ativo
    #[error("Peso final fora do intervalo (0, 1]: {0}")]
    InvalidYieldRange(Decimal),

    // Quebra compra → inventário não prevista na hierarquia
    #[error("Unidade de compra {purchase} não quebra em {inventory}")]
    IncompatibleBreakdown { purchase: Unit, inventory: Unit },

    // Receita referenciando a si mesma como ingrediente
    #[error("A receita {product_id} não pode conter a si mesma")]
    SelfReference { product_id: i64 },

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao montar o PDF: {0}")]
    PdfError(String),

    // Variante genérica para qualquer outro erro inesperado.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidConversion { .. }
            | AppError::UnknownUnit(_)
            | AppError::IncompatibleBreakdown { .. }
            | AppError::SelfReference { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }

            AppError::InvalidYieldRange(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            // Erros do pipeline de PDF e qualquer coisa inesperada viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

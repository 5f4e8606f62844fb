// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Extrator de idioma a partir do Accept-Language. A ficha técnica é bilíngue
// (es/en) com espanhol como idioma principal dos dados; a ficha técnica sai
// no idioma pedido pelo cliente.
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let default_lang = "es".to_string();

        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first()
                    // "es-MX" -> "es"; "en" -> "en"
                    .map(|tag| tag.split('-').next().unwrap_or(tag).to_string())
            })
            .unwrap_or(default_lang);

        Ok(Locale(lang))
    }
}

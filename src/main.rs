//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().expect("Falha ao inicializar o estado da aplicação.");

    // Catálogo de unidades e hierarquia de compra
    let unit_routes = Router::new()
        .route("/", get(handlers::units::list_units))
        .route("/families", get(handlers::units::list_families))
        .route("/{unit}/breakdown", get(handlers::units::breakdown))
        .route("/convert", post(handlers::units::convert));

    // Motor de costeo (cálculo puro, nada é persistido)
    let costing_routes = Router::new()
        .route("/recipe", post(handlers::costing::recipe_snapshot))
        .route("/yield", post(handlers::costing::yield_metrics))
        .route("/cost-percent", post(handlers::costing::cost_percent));

    let product_routes = Router::new()
        .route("/normalize", post(handlers::products::normalize));

    let sheet_routes = Router::new()
        .route("/technical", post(handlers::sheets::technical_sheet));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/units", unit_routes)
        .nest("/api/costing", costing_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sheets", sheet_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state.clone());

    // Inicia o servidor
    let listener = TcpListener::bind(&app_state.bind_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

// src/config.rs

use std::env;

use crate::services::{CostingService, SheetService, UnitsService};

#[derive(Clone)]
pub struct AppState {
    pub bind_addr: String,
    pub units_service: UnitsService,
    pub costing_service: CostingService,
    pub sheet_service: SheetService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar,
    // a aplicação não deve iniciar.
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let bind_addr = format!("{host}:{port}");

        // Pasta com a fonte Roboto usada na ficha técnica
        let font_dir = env::var("SHEET_FONT_DIR").unwrap_or_else(|_| "./fonts".to_string());

        // --- Monta o gráfico de dependências ---
        let units_service = UnitsService::new();
        let costing_service = CostingService::new();
        let sheet_service = SheetService::new(font_dir, costing_service.clone());

        Ok(Self {
            bind_addr,
            units_service,
            costing_service,
            sheet_service,
        })
    }
}

// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Units ---
        handlers::units::list_units,
        handlers::units::list_families,
        handlers::units::breakdown,
        handlers::units::convert,

        // --- Costing ---
        handlers::costing::recipe_snapshot,
        handlers::costing::yield_metrics,
        handlers::costing::cost_percent,

        // --- Products ---
        handlers::products::normalize,

        // --- Sheets ---
        handlers::sheets::technical_sheet,
    ),
    components(
        schemas(
            // --- Units ---
            models::units::Unit,
            models::units::UnitFamily,
            models::units::UnitCatalogEntry,

            // --- Costing ---
            models::costing::RecipeLineItem,
            models::costing::YieldData,
            models::costing::YieldMetrics,
            models::costing::RecipeCostInput,
            models::costing::CategorySubtotal,
            models::costing::CostSnapshot,
            models::costing::SheetProductHeader,
            models::costing::TechnicalSheetRequest,

            // --- Products ---
            models::product::ProductKind,
            models::product::ProductInput,
            models::product::Product,

            // --- Payloads ---
            handlers::units::ConvertPayload,
            handlers::units::ConvertResponse,
            handlers::costing::YieldPayload,
            handlers::costing::CostPercentPayload,
            handlers::costing::CostPercentResponse,
        )
    ),
    tags(
        (name = "Units", description = "Catálogo e conversão de unidades de medida"),
        (name = "Costing", description = "Motor de costeo: rendimento, agregação e % custo/preço"),
        (name = "Products", description = "Normalização de produtos por variante"),
        (name = "Sheets", description = "Ficha técnica em PDF")
    )
)]
pub struct ApiDoc;

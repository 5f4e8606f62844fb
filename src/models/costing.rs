// src/models/costing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// Quantidades e custos nunca são negativos; zero é estado normal de
// formulário pela metade.
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// --- 1. Item de Kit (ingrediente de uma receita) ---
// Uma aresta (produto pai, produto filho, quantidade) com o custo unitário do
// filho DESNORMALIZADO no momento do vínculo. O custo NÃO é recalculado a
// partir da sub-árvore do filho: mudou o preço da matéria-prima, o pai só
// enxerga depois de um novo salvamento explícito.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLineItem {
    pub child_product_id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,
    // Snapshot do custo unitário do filho no momento do vínculo
    #[validate(custom(function = "validate_not_negative"))]
    pub unit_cost: Decimal,
    // Módulo de recetário usado para agrupar as linhas na ficha
    #[serde(default)]
    pub recipe_category: Option<String>,
    // Rótulo de apresentação de inventário do filho
    #[serde(default)]
    pub inventory_presentation: Option<String>,
}

impl RecipeLineItem {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_cost
    }
}

// --- 2. Dados de Rendimento ---
// Peso inicial (bruto) e peso final (aproveitável) de uma matéria-prima, ou o
// rendimento de uma sub-receita.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YieldData {
    pub initial_weight: Decimal,
    pub final_weight: Decimal,
}

impl YieldData {
    // "Sem rendimento": os dois pesos valem 1, ou seja, nenhuma perda de
    // processo. É o que o cadastro força quando o toggle está desligado.
    pub const NO_LOSS: YieldData = YieldData {
        initial_weight: Decimal::ONE,
        final_weight: Decimal::ONE,
    };
}

// --- 3. Métricas de Rendimento ---
// Resultado puro do cálculo de rendimento/merma/preço neto de uma
// matéria-prima (§ painel da aba Costeo).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YieldMetrics {
    // (pesoFinal / pesoInicial) × 100 — "% Rendimiento"
    pub yield_percent: Decimal,
    // 100 − rendimento — "% Merma"
    pub waste_percent: Decimal,
    // Preço de compra escalado pelo que sobra depois do processamento
    pub net_unit_price: Decimal,
    // net_unit_price convertido para a unidade de receita
    pub processed_unit_price: Decimal,
}

// --- 4. Entrada completa do costeo de uma receita ---
// Tudo já buscado pelo chamador (serviços de produtos e de kits são
// colaboradores externos): o motor não faz nenhuma chamada de rede.
#[derive(Debug, Clone, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCostInput {
    pub product_id: i64,

    #[validate(nested)]
    pub line_items: Vec<RecipeLineItem>,

    // Rendimento da receita; ausente = sem perda de processo
    #[serde(default)]
    pub yield_data: Option<YieldData>,

    // Fator compra → receita ("ConversionSimple"); ausente = 1
    #[serde(default)]
    pub conversion_factor: Option<Decimal>,

    // Preço de venda (0 para sub-receitas)
    #[serde(default)]
    pub sale_price: Decimal,

    // IVA em pontos percentuais
    #[serde(default)]
    pub tax_percent: Decimal,

    // Meta de "% Costo Ideal" do prato, se houver
    #[serde(default)]
    pub ideal_cost_percent: Option<Decimal>,
}

// --- 5. Subtotal por Módulo de Recetário ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySubtotal {
    pub recipe_category: String,
    pub subtotal: Decimal,
}

// --- 6. Ficha Técnica ---
// Cabeçalho do produto como o chamador o conhece (rótulos já resolvidos);
// o serviço não consulta catálogo nenhum.
#[derive(Debug, Clone, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetProductHeader {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub purchase_presentation: Option<String>,
    #[serde(default)]
    pub inventory_presentation: Option<String>,
    #[serde(default)]
    pub recipe_category: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub tax_percent: Decimal,
    // Quantas unidades de inventário vêm na unidade de compra
    #[serde(default)]
    pub purchase_quantity: Option<Decimal>,
    pub kind: crate::models::product::ProductKind,
}

#[derive(Debug, Clone, Deserialize, validator::Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSheetRequest {
    #[validate(nested)]
    pub product: SheetProductHeader,

    #[validate(nested)]
    pub costing: RecipeCostInput,

    // Passos de preparação, já ordenados
    #[serde(default)]
    pub instructions: Vec<String>,
}

// --- 7. Snapshot de Custo ---
// Resultado derivado e NÃO persistido de rodar o motor sobre uma receita.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostSnapshot {
    // Σ quantidade × custo unitário
    pub total_cost: Decimal,
    // (total / pesoFinal) × fator de conversão — custo por unidade de receita
    pub cost_per_unit: Decimal,
    pub yield_percent: Decimal,
    pub waste_percent: Decimal,
    // (total / preço de venda) × 100
    pub cost_percent_gross: Decimal,
    // (total / preço sem IVA) × 100
    pub cost_percent_net: Decimal,
    // Custo real acima do "% Costo Ideal" do prato
    pub exceeds_ideal: bool,
    pub category_subtotals: Vec<CategorySubtotal>,
    pub computed_at: DateTime<Utc>,
}

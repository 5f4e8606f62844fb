// src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::costing::YieldData;
use crate::models::units::Unit;

// Módulo de recetário reservado para sub-receitas
const SUB_RECIPE_MODULE_ID: i64 = 1;

// --- 1. Tipo de Produto ---
// 0 = Matéria-Prima (folha, tem rendimento, não tem filhos)
// 1 = Prato (tem filhos, preço de venda e % de custo ideal)
// 2 = Sub-Receita (tem filhos, rendimento próprio, SEM preço de venda)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductKind {
    RawMaterial,
    Dish,
    SubRecipe,
}

impl ProductKind {
    // Código numérico usado pelo esquema legado (IdTipoProducto)
    pub fn legacy_code(&self) -> u8 {
        match self {
            ProductKind::RawMaterial => 0,
            ProductKind::Dish => 1,
            ProductKind::SubRecipe => 2,
        }
    }
}

// --- 2. Cadastro bruto ---
// O que o front manda antes de salvar. As regras por variante são aplicadas
// em `Product::normalize`, nunca espalhadas pelos handlers.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub product_id: i64,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Tomate Bola")]
    pub name: String,

    #[serde(default)]
    pub code: Option<String>,

    pub kind: ProductKind,

    #[schema(example = "Kilo")]
    pub purchase_unit: Unit,

    // Unidade em que a receita consome o produto; ausente = unidade de compra
    #[serde(default)]
    pub recipe_unit: Option<Unit>,

    // Unidade em que o inventário guarda o produto
    #[serde(default)]
    pub inventory_unit: Option<Unit>,

    #[serde(default)]
    pub price: Decimal,

    // IVA em pontos percentuais (16 = 16%)
    #[serde(default)]
    pub tax_percent: Decimal,

    // Fator de conversão compra → receita ("ConversionSimple")
    #[serde(default)]
    pub conversion_factor: Option<Decimal>,

    // Quantas unidades de inventário vêm numa unidade de compra
    #[serde(default)]
    pub purchase_quantity: Decimal,

    #[serde(default)]
    pub has_yield: bool,

    #[serde(default)]
    pub yield_data: Option<YieldData>,

    #[serde(default)]
    pub recipe_category_id: Option<i64>,

    // Só para pratos
    #[serde(default)]
    pub menu_section_id: Option<i64>,

    #[serde(default)]
    pub ideal_cost_percent: Option<Decimal>,
}

// --- 3. Produto normalizado ---
// Mesmos campos, mas com os invariantes de cada variante já aplicados. É o
// que o chamador persiste no serviço de produtos externo.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub kind: ProductKind,
    pub purchase_unit: Unit,
    pub recipe_unit: Unit,
    pub inventory_unit: Option<Unit>,
    pub price: Decimal,
    pub tax_percent: Decimal,
    pub conversion_factor: Decimal,
    pub purchase_quantity: Decimal,
    pub has_yield: bool,
    pub yield_data: YieldData,
    pub recipe_category_id: Option<i64>,
    pub menu_section_id: Option<i64>,
    pub ideal_cost_percent: Option<Decimal>,
}

impl Product {
    // Aplica as regras de construção por variante:
    //  - Matéria-prima: pesoFinal em (0, 1] quando há rendimento; toggle
    //    desligado força os dois pesos em 1; quebra compra → inventário
    //    precisa ser admissível pela hierarquia.
    //  - Prato: preço/IVA/custo ideal passam direto.
    //  - Sub-receita: preço e IVA SEMPRE zerados, apresentação de
    //    receita/inventário cai na própria unidade, módulo de recetário fixo.
    pub fn normalize(input: ProductInput) -> Result<Product, AppError> {
        let yield_data = if input.has_yield {
            input.yield_data.unwrap_or(YieldData::NO_LOSS)
        } else {
            // Toggle desligado vence qualquer valor não salvo
            YieldData::NO_LOSS
        };

        if input.kind == ProductKind::RawMaterial && input.has_yield {
            let peso_final = yield_data.final_weight;
            if peso_final <= Decimal::ZERO || peso_final > Decimal::ONE {
                return Err(AppError::InvalidYieldRange(peso_final));
            }
        }

        if let Some(inventory_unit) = input.inventory_unit {
            if !input.purchase_unit.can_break_into(inventory_unit) {
                return Err(AppError::IncompatibleBreakdown {
                    purchase: input.purchase_unit,
                    inventory: inventory_unit,
                });
            }
        }

        let (price, tax_percent) = match input.kind {
            // Sub-receita não vende: custo só sobe na árvore
            ProductKind::SubRecipe => (Decimal::ZERO, Decimal::ZERO),
            _ => (input.price, input.tax_percent),
        };

        // Apresentação de receita ausente cai na apresentação de compra
        let recipe_unit = input.recipe_unit.unwrap_or(input.purchase_unit);

        let inventory_unit = match input.kind {
            ProductKind::SubRecipe => Some(input.inventory_unit.unwrap_or(input.purchase_unit)),
            _ => input.inventory_unit,
        };

        let recipe_category_id = match input.kind {
            ProductKind::SubRecipe => Some(SUB_RECIPE_MODULE_ID),
            _ => input.recipe_category_id,
        };

        let (menu_section_id, ideal_cost_percent) = match input.kind {
            ProductKind::Dish => (input.menu_section_id, input.ideal_cost_percent),
            _ => (None, None),
        };

        Ok(Product {
            product_id: input.product_id,
            name: input.name,
            code: input.code,
            kind: input.kind,
            purchase_unit: input.purchase_unit,
            recipe_unit,
            inventory_unit,
            price,
            tax_percent,
            conversion_factor: input.conversion_factor.unwrap_or(Decimal::ONE),
            purchase_quantity: input.purchase_quantity,
            has_yield: input.has_yield,
            yield_data,
            recipe_category_id,
            menu_section_id,
            ideal_cost_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input(kind: ProductKind) -> ProductInput {
        ProductInput {
            product_id: 42,
            name: "Salsa Base".to_string(),
            code: Some("SB-001".to_string()),
            kind,
            purchase_unit: Unit::Kilo,
            recipe_unit: None,
            inventory_unit: None,
            price: Decimal::new(120, 0),
            tax_percent: Decimal::new(16, 0),
            conversion_factor: Some(Decimal::ONE),
            purchase_quantity: Decimal::ONE,
            has_yield: true,
            yield_data: Some(YieldData {
                initial_weight: Decimal::ONE,
                final_weight: Decimal::new(8, 1), // 0.8
            }),
            recipe_category_id: Some(3),
            menu_section_id: Some(7),
            ideal_cost_percent: Some(Decimal::new(35, 0)),
        }
    }

    #[test]
    fn sub_recipe_forces_price_and_tax_to_zero() {
        let product = Product::normalize(base_input(ProductKind::SubRecipe)).unwrap();
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.tax_percent, Decimal::ZERO);
        assert_eq!(product.recipe_category_id, Some(SUB_RECIPE_MODULE_ID));
        // Apresentações caem na unidade do próprio produto
        assert_eq!(product.recipe_unit, Unit::Kilo);
        assert_eq!(product.inventory_unit, Some(Unit::Kilo));
    }

    #[test]
    fn dish_keeps_sale_fields() {
        let product = Product::normalize(base_input(ProductKind::Dish)).unwrap();
        assert_eq!(product.price, Decimal::new(120, 0));
        assert_eq!(product.tax_percent, Decimal::new(16, 0));
        assert_eq!(product.ideal_cost_percent, Some(Decimal::new(35, 0)));
        assert_eq!(product.menu_section_id, Some(7));
    }

    #[test]
    fn raw_material_rejects_final_weight_above_one() {
        let mut input = base_input(ProductKind::RawMaterial);
        input.yield_data = Some(YieldData {
            initial_weight: Decimal::ONE,
            final_weight: Decimal::new(15, 1), // 1.5
        });
        let err = Product::normalize(input).unwrap_err();
        assert!(matches!(err, AppError::InvalidYieldRange(_)));
    }

    #[test]
    fn raw_material_rejects_zero_final_weight() {
        let mut input = base_input(ProductKind::RawMaterial);
        input.yield_data = Some(YieldData {
            initial_weight: Decimal::ONE,
            final_weight: Decimal::ZERO,
        });
        let err = Product::normalize(input).unwrap_err();
        assert!(matches!(err, AppError::InvalidYieldRange(_)));
    }

    #[test]
    fn disabled_yield_forces_both_weights_to_one() {
        let mut input = base_input(ProductKind::RawMaterial);
        input.has_yield = false;
        // Valores não salvos perdem para o toggle
        input.yield_data = Some(YieldData {
            initial_weight: Decimal::new(5, 0),
            final_weight: Decimal::new(3, 0),
        });
        let product = Product::normalize(input).unwrap();
        assert_eq!(product.yield_data.initial_weight, Decimal::ONE);
        assert_eq!(product.yield_data.final_weight, Decimal::ONE);
    }

    #[test]
    fn incompatible_breakdown_is_rejected() {
        let mut input = base_input(ProductKind::RawMaterial);
        input.purchase_unit = Unit::Caja;
        input.inventory_unit = Some(Unit::Galon);
        let err = Product::normalize(input).unwrap_err();
        assert!(matches!(err, AppError::IncompatibleBreakdown { .. }));
    }

    #[test]
    fn container_to_piece_breakdown_is_accepted() {
        let mut input = base_input(ProductKind::RawMaterial);
        input.purchase_unit = Unit::Caja;
        input.inventory_unit = Some(Unit::Pieza);
        assert!(Product::normalize(input).is_ok());
    }
}

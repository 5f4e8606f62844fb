// src/services/costing_service.rs

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::costing::{
        CategorySubtotal, CostSnapshot, RecipeCostInput, RecipeLineItem, YieldData, YieldMetrics,
    },
};

// Rótulo usado quando o filho não tem módulo de recetário atribuído
const UNCATEGORIZED: &str = "Sin Módulo de Recetario";

fn hundred() -> Decimal {
    Decimal::new(100, 0)
}

// Motor de costeo. Aritmética pura e síncrona em Decimal; todo denominador
// que pode legitimamente ser zero (formulário pela metade) curto-circuita
// para zero em vez de estourar.
#[derive(Clone)]
pub struct CostingService;

impl CostingService {
    pub fn new() -> Self {
        Self
    }

    // Rendimento, merma e preços neto/procesado de uma matéria-prima.
    //
    //   rendimento = pesoFinal / pesoInicial × 100
    //   merma      = 100 − rendimento
    //   P/U neto   = (preço de compra / max(qtd de compra, 1)) × pesoFinal
    //   procesado  = P/U neto / fator de conversão (ausente = 1)
    pub fn yield_metrics(
        &self,
        yield_data: YieldData,
        purchase_price: Decimal,
        purchase_qty: Decimal,
        conversion_factor: Option<Decimal>,
    ) -> YieldMetrics {
        let (yield_percent, waste_percent) = Self::yield_and_waste(yield_data);

        let divisor = purchase_qty.max(Decimal::ONE);
        let net_unit_price = purchase_price / divisor * yield_data.final_weight;

        let factor = conversion_factor.unwrap_or(Decimal::ONE);
        let processed_unit_price = if factor.is_zero() {
            Decimal::ZERO
        } else {
            net_unit_price / factor
        };

        YieldMetrics {
            yield_percent,
            waste_percent,
            net_unit_price,
            processed_unit_price,
        }
    }

    fn yield_and_waste(yield_data: YieldData) -> (Decimal, Decimal) {
        if yield_data.initial_weight > Decimal::ZERO {
            let yield_percent = yield_data.final_weight / yield_data.initial_weight * hundred();
            (yield_percent, hundred() - yield_percent)
        } else {
            // pesoInicial zerado é estado normal de formulário, não erro
            (Decimal::ZERO, Decimal::ZERO)
        }
    }

    // Σ quantidade × custo unitário. Os custos são snapshots do momento do
    // vínculo: alterar o preço de um neto NÃO se propaga sozinho, cada
    // ancestral precisa ser salvo de novo.
    pub fn total_cost(&self, line_items: &[RecipeLineItem]) -> Decimal {
        line_items.iter().map(RecipeLineItem::line_total).sum()
    }

    // Custo por unidade de receita, ajustado pelo rendimento:
    // (total / pesoFinal) × fator. pesoFinal zerado devolve 0.
    pub fn cost_per_unit(
        &self,
        total_cost: Decimal,
        final_weight: Decimal,
        conversion_factor: Decimal,
    ) -> Decimal {
        if final_weight <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        total_cost / final_weight * conversion_factor
    }

    // % custo/preço. Bruto: sobre o preço cheio. Neto: sobre o preço sem IVA.
    // Preço (ou preço neto) zerado devolve 0 — só exibição, nunca bloqueio.
    pub fn cost_to_price_percent(
        &self,
        total_cost: Decimal,
        sale_price: Decimal,
        tax_percent: Decimal,
        net_of_tax: bool,
    ) -> Decimal {
        let denominator = if net_of_tax {
            sale_price - sale_price * tax_percent / hundred()
        } else {
            sale_price
        };

        if denominator <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        total_cost / denominator * hundred()
    }

    // Monta o snapshot completo de uma receita: total, custo por unidade,
    // rendimento, % custo com e sem IVA, subtotais por módulo de recetário e
    // o alerta de custo ideal estourado.
    pub fn recipe_snapshot(&self, input: &RecipeCostInput) -> Result<CostSnapshot, AppError> {
        // Uma receita não pode ser ingrediente de si mesma
        if input
            .line_items
            .iter()
            .any(|item| item.child_product_id == input.product_id)
        {
            return Err(AppError::SelfReference { product_id: input.product_id });
        }

        let total_cost = self.total_cost(&input.line_items);

        let yield_data = input.yield_data.unwrap_or(YieldData::NO_LOSS);
        let conversion_factor = input.conversion_factor.unwrap_or(Decimal::ONE);
        let cost_per_unit =
            self.cost_per_unit(total_cost, yield_data.final_weight, conversion_factor);

        let (yield_percent, waste_percent) = Self::yield_and_waste(yield_data);

        let cost_percent_gross =
            self.cost_to_price_percent(total_cost, input.sale_price, input.tax_percent, false);
        let cost_percent_net =
            self.cost_to_price_percent(total_cost, input.sale_price, input.tax_percent, true);

        let exceeds_ideal = match input.ideal_cost_percent {
            Some(ideal) => cost_percent_gross > ideal,
            None => false,
        };

        // Agrupamento estável por módulo de recetário
        let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();
        for item in &input.line_items {
            let category = item
                .recipe_category
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            *by_category.entry(category).or_insert(Decimal::ZERO) += item.line_total();
        }
        let category_subtotals = by_category
            .into_iter()
            .map(|(recipe_category, subtotal)| CategorySubtotal { recipe_category, subtotal })
            .collect();

        Ok(CostSnapshot {
            total_cost,
            cost_per_unit,
            yield_percent,
            waste_percent,
            cost_percent_gross,
            cost_percent_net,
            exceeds_ideal,
            category_subtotals,
            computed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc() -> CostingService {
        CostingService::new()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(child_id: i64, quantity: &str, unit_cost: &str, category: Option<&str>) -> RecipeLineItem {
        RecipeLineItem {
            child_product_id: child_id,
            code: None,
            name: None,
            quantity: dec(quantity),
            unit_cost: dec(unit_cost),
            recipe_category: category.map(str::to_string),
            inventory_presentation: None,
        }
    }

    #[test]
    fn total_cost_sums_weighted_lines() {
        let items = vec![item(1, "2", "3", None), item(2, "1", "5", None)];
        assert_eq!(svc().total_cost(&items), dec("11"));
    }

    #[test]
    fn yield_metrics_basic_vector() {
        let metrics = svc().yield_metrics(
            YieldData { initial_weight: Decimal::ONE, final_weight: dec("0.8") },
            dec("10"),
            Decimal::ONE,
            None,
        );
        assert_eq!(metrics.yield_percent, dec("80"));
        assert_eq!(metrics.waste_percent, dec("20"));
        assert_eq!(metrics.net_unit_price, dec("8"));
        // Fator ausente = 1, então procesado == neto
        assert_eq!(metrics.processed_unit_price, dec("8"));
    }

    #[test]
    fn yield_metrics_survive_zero_initial_weight() {
        let metrics = svc().yield_metrics(
            YieldData { initial_weight: Decimal::ZERO, final_weight: Decimal::ZERO },
            dec("10"),
            Decimal::ONE,
            None,
        );
        assert_eq!(metrics.yield_percent, Decimal::ZERO);
        assert_eq!(metrics.waste_percent, Decimal::ZERO);
    }

    #[test]
    fn net_unit_price_clamps_purchase_qty_to_one() {
        // Quantidade de compra 0 (formulário pela metade) não divide por zero
        let metrics = svc().yield_metrics(
            YieldData { initial_weight: Decimal::ONE, final_weight: dec("0.5") },
            dec("20"),
            Decimal::ZERO,
            None,
        );
        assert_eq!(metrics.net_unit_price, dec("10"));
    }

    #[test]
    fn explicit_zero_conversion_factor_guards_to_zero() {
        let metrics = svc().yield_metrics(
            YieldData::NO_LOSS,
            dec("10"),
            Decimal::ONE,
            Some(Decimal::ZERO),
        );
        assert_eq!(metrics.processed_unit_price, Decimal::ZERO);
    }

    #[test]
    fn cost_per_unit_is_yield_adjusted() {
        // (11 / 0.5) × 2 = 44
        assert_eq!(svc().cost_per_unit(dec("11"), dec("0.5"), dec("2")), dec("44"));
        assert_eq!(svc().cost_per_unit(dec("11"), Decimal::ZERO, dec("2")), Decimal::ZERO);
    }

    #[test]
    fn cost_percent_gross_and_net() {
        let s = svc();
        assert_eq!(
            s.cost_to_price_percent(dec("30"), dec("100"), dec("16"), false),
            dec("30"),
        );
        // 30 / (100 − 16) × 100 ≈ 35.71
        let net = s.cost_to_price_percent(dec("30"), dec("100"), dec("16"), true);
        assert_eq!(net.round_dp(2), dec("35.71"));
    }

    #[test]
    fn zero_sale_price_yields_zero_percent() {
        let s = svc();
        assert_eq!(
            s.cost_to_price_percent(dec("30"), Decimal::ZERO, dec("16"), false),
            Decimal::ZERO,
        );
        // IVA de 100% zera o preço neto
        assert_eq!(
            s.cost_to_price_percent(dec("30"), dec("50"), dec("100"), true),
            Decimal::ZERO,
        );
    }

    fn sample_input() -> RecipeCostInput {
        RecipeCostInput {
            product_id: 99,
            line_items: vec![
                item(1, "2", "3", Some("Salsas")),
                item(2, "1", "5", Some("Proteínas")),
                item(3, "4", "0.25", None),
            ],
            yield_data: Some(YieldData {
                initial_weight: Decimal::ONE,
                final_weight: dec("0.8"),
            }),
            conversion_factor: Some(Decimal::ONE),
            sale_price: dec("100"),
            tax_percent: dec("16"),
            ideal_cost_percent: Some(dec("10")),
        }
    }

    #[test]
    fn snapshot_subtotals_sum_to_total() {
        let snapshot = svc().recipe_snapshot(&sample_input()).unwrap();
        assert_eq!(snapshot.total_cost, dec("12"));
        let sum: Decimal = snapshot.category_subtotals.iter().map(|c| c.subtotal).sum();
        assert_eq!(sum, snapshot.total_cost);
        // Linha sem módulo cai no rótulo padrão
        assert!(snapshot
            .category_subtotals
            .iter()
            .any(|c| c.recipe_category == UNCATEGORIZED));
    }

    #[test]
    fn snapshot_flags_cost_above_ideal_target() {
        let snapshot = svc().recipe_snapshot(&sample_input()).unwrap();
        // 12% de custo real contra meta de 10%
        assert!(snapshot.exceeds_ideal);

        let mut relaxed = sample_input();
        relaxed.ideal_cost_percent = Some(dec("40"));
        assert!(!svc().recipe_snapshot(&relaxed).unwrap().exceeds_ideal);

        let mut no_target = sample_input();
        no_target.ideal_cost_percent = None;
        assert!(!svc().recipe_snapshot(&no_target).unwrap().exceeds_ideal);
    }

    #[test]
    fn snapshot_rejects_self_reference() {
        let mut input = sample_input();
        input.line_items.push(item(99, "1", "1", None));
        let err = svc().recipe_snapshot(&input).unwrap_err();
        assert!(matches!(err, AppError::SelfReference { product_id: 99 }));
    }

    #[test]
    fn snapshot_is_deterministic_for_identical_inputs() {
        let a = svc().recipe_snapshot(&sample_input()).unwrap();
        let b = svc().recipe_snapshot(&sample_input()).unwrap();
        assert_eq!(a.total_cost, b.total_cost);
        assert_eq!(a.cost_per_unit, b.cost_per_unit);
        assert_eq!(a.cost_percent_gross, b.cost_percent_gross);
        assert_eq!(a.cost_percent_net, b.cost_percent_net);
    }

    #[test]
    fn snapshot_uses_attach_time_costs_only() {
        // O custo da linha é o snapshot desnormalizado; um preço "atual"
        // diferente do filho não entra no cálculo a menos que o chamador
        // reescreva a linha (re-salvar o ancestral).
        let stale = sample_input();
        let snapshot = svc().recipe_snapshot(&stale).unwrap();

        let mut resaved = sample_input();
        resaved.line_items[0].unit_cost = dec("30"); // re-salvou com preço novo
        let resnapshot = svc().recipe_snapshot(&resaved).unwrap();

        assert_eq!(snapshot.total_cost, dec("12"));
        assert_eq!(resnapshot.total_cost, dec("66"));
    }

    #[test]
    fn sub_recipe_snapshot_has_zero_price_ratios() {
        // Sub-receita: preço forçado a 0, os percentuais guardam em 0
        let mut input = sample_input();
        input.sale_price = Decimal::ZERO;
        input.tax_percent = Decimal::ZERO;
        input.ideal_cost_percent = None;
        let snapshot = svc().recipe_snapshot(&input).unwrap();
        assert_eq!(snapshot.cost_percent_gross, Decimal::ZERO);
        assert_eq!(snapshot.cost_percent_net, Decimal::ZERO);
        // Mas o custo por unidade continua fluindo para cima:
        // (12 / 0.8) × 1 = 15
        assert_eq!(snapshot.cost_per_unit, dec("15"));
    }
}

// src/services/sheet_service.rs

use genpdf::{elements, style, Element};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::costing::{TechnicalSheetRequest, YieldData},
    models::product::ProductKind,
    services::costing_service::CostingService,
};

// Rótulos da ficha por idioma (es/en; espanhol é o idioma
// principal dos dados).
struct SheetLabels {
    title: &'static str,
    category: &'static str,
    purchase_unit: &'static str,
    inventory_unit: &'static str,
    recipe_module: &'static str,
    price: &'static str,
    tax_amount: &'static str,
    cost_price_gross: &'static str,
    cost_price_net: &'static str,
    initial_weight: &'static str,
    final_weight: &'static str,
    yield_pct: &'static str,
    waste_pct: &'static str,
    net_purchase_price: &'static str,
    processed_price: &'static str,
    cost_per_unit: &'static str,
    total_cost: &'static str,
    ingredients: &'static str,
    code: &'static str,
    product: &'static str,
    quantity: &'static str,
    unit_cost: &'static str,
    line_total: &'static str,
    presentation: &'static str,
    instructions: &'static str,
    uncategorized: &'static str,
}

impl SheetLabels {
    fn for_locale(locale: &str) -> &'static SheetLabels {
        const EN: SheetLabels = SheetLabels {
            title: "TECHNICAL SHEET",
            category: "Category",
            purchase_unit: "Purchase Unit",
            inventory_unit: "Inventory Unit",
            recipe_module: "Recipe Module",
            price: "Price",
            tax_amount: "Tax",
            cost_price_gross: "% Cost/Price (with tax)",
            cost_price_net: "% Net Cost/Price (w/o tax)",
            initial_weight: "Initial Weight",
            final_weight: "Final Weight",
            yield_pct: "% Yield",
            waste_pct: "% Waste",
            net_purchase_price: "Net Purchase P/U",
            processed_price: "Processed Price",
            cost_per_unit: "Cost per Unit",
            total_cost: "Total Cost",
            ingredients: "Ingredients",
            code: "Code",
            product: "Product",
            quantity: "Qty",
            unit_cost: "Unit Cost",
            line_total: "Total",
            presentation: "Presentation",
            instructions: "Preparation Instructions",
            uncategorized: "No Recipe Module",
        };
        const ES: SheetLabels = SheetLabels {
            title: "FICHA TÉCNICA",
            category: "Categoría",
            purchase_unit: "Unidad de Compra",
            inventory_unit: "Unidad de Inventario",
            recipe_module: "Módulo de Recetario",
            price: "Precio",
            tax_amount: "IVA",
            cost_price_gross: "% Costo/Precio con IVA",
            cost_price_net: "% Costo Neto/Precio (Sin IVA)",
            initial_weight: "Peso Inicial",
            final_weight: "Peso Final",
            yield_pct: "% Rendimiento",
            waste_pct: "% Merma",
            net_purchase_price: "P/U Compra Neto",
            processed_price: "Precio Procesado",
            cost_per_unit: "Formula Costo/Unidad",
            total_cost: "Costo Total",
            ingredients: "Ingredientes",
            code: "Código",
            product: "Producto",
            quantity: "Cantidad",
            unit_cost: "Costo",
            line_total: "Total",
            presentation: "Presentación",
            instructions: "Instrucciones de Preparación",
            uncategorized: "Sin Módulo de Recetario",
        };
        match locale {
            "en" => &EN,
            _ => &ES,
        }
    }
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

// Gera a ficha técnica de um produto: cabeçalho, caixas de custo/preço,
// painel de rendimento, tabela de ingredientes por módulo e instruções.
#[derive(Clone)]
pub struct SheetService {
    font_dir: String,
    costing: CostingService,
}

impl SheetService {
    pub fn new(font_dir: String, costing: CostingService) -> Self {
        Self { font_dir, costing }
    }

    pub fn technical_sheet(
        &self,
        request: &TechnicalSheetRequest,
        locale: &str,
    ) -> Result<Vec<u8>, AppError> {
        let labels = SheetLabels::for_locale(locale);

        // 1. Roda o motor (inclui o guard de auto-referência)
        let snapshot = self.costing.recipe_snapshot(&request.costing)?;
        let yield_data = request.costing.yield_data.unwrap_or(YieldData::NO_LOSS);
        let metrics = self.costing.yield_metrics(
            yield_data,
            request.product.price,
            request.product.purchase_quantity.unwrap_or(Decimal::ONE),
            request.costing.conversion_factor,
        );

        // 2. Configura o PDF
        let font_family = genpdf::fonts::from_files(&self.font_dir, "Roboto", None)
            .map_err(|_| {
                AppError::FontNotFound(format!("Fonte não encontrada na pasta {}", self.font_dir))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Ficha Técnica - {}", request.product.name));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        doc.push(
            elements::Paragraph::new(labels.title)
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(request.product.name.clone())
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        let small = style::Style::new().with_font_size(10);
        if let Some(category) = &request.product.category {
            doc.push(
                elements::Paragraph::new(format!("{}: {}", labels.category, category))
                    .styled(small),
            );
        }
        if let Some(presentation) = &request.product.purchase_presentation {
            doc.push(
                elements::Paragraph::new(format!("{}: {}", labels.purchase_unit, presentation))
                    .styled(small),
            );
        }
        if let Some(presentation) = &request.product.inventory_presentation {
            doc.push(
                elements::Paragraph::new(format!("{}: {}", labels.inventory_unit, presentation))
                    .styled(small),
            );
        }
        if let Some(module) = &request.product.recipe_category {
            doc.push(
                elements::Paragraph::new(format!("{}: {}", labels.recipe_module, module))
                    .styled(small),
            );
        }

        doc.push(elements::Break::new(1));

        // --- CAIXAS DE CUSTO/PREÇO (só para pratos, que têm preço de venda) ---
        if request.product.kind == ProductKind::Dish {
            let tax_amount =
                request.product.price * request.product.tax_percent / Decimal::new(100, 0);
            doc.push(elements::Paragraph::new(format!(
                "{}: {}   {}: {} = {}",
                labels.price,
                money(request.product.price),
                labels.tax_amount,
                percent(request.product.tax_percent),
                money(tax_amount),
            )));
            doc.push(elements::Paragraph::new(format!(
                "{}: {}   {}: {}",
                labels.cost_price_gross,
                percent(snapshot.cost_percent_gross),
                labels.cost_price_net,
                percent(snapshot.cost_percent_net),
            )));
            doc.push(elements::Break::new(1));
        }

        // --- PAINEL DE RENDIMENTO ---
        doc.push(elements::Paragraph::new(format!(
            "{}: {:.3}   {}: {:.3}   {}: {}   {}: {}",
            labels.initial_weight,
            yield_data.initial_weight,
            labels.final_weight,
            yield_data.final_weight,
            labels.yield_pct,
            percent(snapshot.yield_percent),
            labels.waste_pct,
            percent(snapshot.waste_percent),
        )));
        doc.push(elements::Paragraph::new(format!(
            "{}: {}   {}: {}   {}: {}",
            labels.net_purchase_price,
            money(metrics.net_unit_price),
            labels.processed_price,
            money(metrics.processed_unit_price),
            labels.cost_per_unit,
            money(snapshot.cost_per_unit),
        )));

        doc.push(elements::Break::new(1.5));

        // --- TABELA DE INGREDIENTES ---
        doc.push(
            elements::Paragraph::new(labels.ingredients)
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        doc.push(elements::Break::new(0.5));

        // Pesos das colunas: Código (2), Produto (4), Apresentação (2),
        // Qtd (1), Custo (2), Total (2)
        let mut table = elements::TableLayout::new(vec![2, 4, 2, 1, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new(labels.code).styled(style_bold))
            .element(elements::Paragraph::new(labels.product).styled(style_bold))
            .element(elements::Paragraph::new(labels.presentation).styled(style_bold))
            .element(elements::Paragraph::new(labels.quantity).styled(style_bold))
            .element(elements::Paragraph::new(labels.unit_cost).styled(style_bold))
            .element(elements::Paragraph::new(labels.line_total).styled(style_bold))
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        // Linhas agrupadas por módulo de recetario, como na tela de costeo
        let mut items: Vec<_> = request.costing.line_items.iter().collect();
        items.sort_by(|a, b| a.recipe_category.cmp(&b.recipe_category));

        let mut current_category: Option<String> = None;
        for item in items {
            let category = item
                .recipe_category
                .clone()
                .unwrap_or_else(|| labels.uncategorized.to_string());
            if current_category.as_deref() != Some(category.as_str()) {
                table
                    .row()
                    .element(
                        elements::Paragraph::new(category.clone())
                            .styled(style::Style::new().bold().with_font_size(9)),
                    )
                    .element(elements::Paragraph::new(""))
                    .element(elements::Paragraph::new(""))
                    .element(elements::Paragraph::new(""))
                    .element(elements::Paragraph::new(""))
                    .element(elements::Paragraph::new(""))
                    .push()
                    .map_err(|e| AppError::PdfError(e.to_string()))?;
                current_category = Some(category);
            }

            table
                .row()
                .element(elements::Paragraph::new(item.code.clone().unwrap_or_default()))
                .element(elements::Paragraph::new(item.name.clone().unwrap_or_default()))
                .element(elements::Paragraph::new(
                    item.inventory_presentation.clone().unwrap_or_default(),
                ))
                .element(elements::Paragraph::new(format!("{:.3}", item.quantity)))
                .element(elements::Paragraph::new(money(item.unit_cost)))
                .element(elements::Paragraph::new(money(item.line_total())))
                .push()
                .map_err(|e| AppError::PdfError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));

        let mut total_paragraph = elements::Paragraph::new(format!(
            "{}: {}",
            labels.total_cost,
            money(snapshot.total_cost)
        ));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        // --- INSTRUÇÕES DE PREPARAÇÃO ---
        if !request.instructions.is_empty() {
            doc.push(elements::Break::new(1.5));
            doc.push(
                elements::Paragraph::new(labels.instructions)
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            for (idx, step) in request.instructions.iter().enumerate() {
                doc.push(elements::Paragraph::new(format!("{}. {}", idx + 1, step)));
            }
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::PdfError(e.to_string()))?;

        Ok(buffer)
    }
}

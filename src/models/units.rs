// src/models/units.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- 1. Famílias de Unidades ---
// Conversão numérica só existe DENTRO de uma família (peso ou volume).
// Unidades discretas (peça, caixa...) nunca convertem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UnitFamily {
    Weight,
    Volume,
    Discrete,
}

// --- 2. Unidades de Medida ---
// Os rótulos no JSON são os mesmos que o front já grava no banco
// ("Kilo", "Onza Fluida", ...), então nada muda do lado do cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Unit {
    // Peso (base: Kilo)
    Kilo,
    Gramo,
    Libra,
    Onza,
    Tonelada,
    Arroba,
    // Volume (base: Litro)
    Litro,
    Mililitro,
    Galon,
    #[serde(rename = "Onza Fluida")]
    OnzaFluida,
    Taza,
    Cuarto,
    Pinta,
    Garrafon,
    // Discretas (sem fator de conversão)
    Pieza,
    Caja,
    Saco,
    Bolsa,
    Paquete,
}

impl Unit {
    pub const ALL: [Unit; 19] = [
        Unit::Kilo,
        Unit::Gramo,
        Unit::Libra,
        Unit::Onza,
        Unit::Tonelada,
        Unit::Arroba,
        Unit::Litro,
        Unit::Mililitro,
        Unit::Galon,
        Unit::OnzaFluida,
        Unit::Taza,
        Unit::Cuarto,
        Unit::Pinta,
        Unit::Garrafon,
        Unit::Pieza,
        Unit::Caja,
        Unit::Saco,
        Unit::Bolsa,
        Unit::Paquete,
    ];

    pub fn family(&self) -> UnitFamily {
        match self {
            Unit::Kilo | Unit::Gramo | Unit::Libra | Unit::Onza | Unit::Tonelada | Unit::Arroba => {
                UnitFamily::Weight
            }
            Unit::Litro
            | Unit::Mililitro
            | Unit::Galon
            | Unit::OnzaFluida
            | Unit::Taza
            | Unit::Cuarto
            | Unit::Pinta
            | Unit::Garrafon => UnitFamily::Volume,
            Unit::Pieza | Unit::Caja | Unit::Saco | Unit::Bolsa | Unit::Paquete => {
                UnitFamily::Discrete
            }
        }
    }

    // Fator em relação à unidade base da família (Kilo / Litro).
    // `None` para unidades discretas: elas não participam de conversão.
    pub fn base_factor(&self) -> Option<Decimal> {
        let factor = match self {
            // Peso
            Unit::Kilo => Decimal::ONE,
            Unit::Gramo => Decimal::new(1, 3),        // 0.001
            Unit::Libra => Decimal::new(453_592, 6),  // 0.453592
            Unit::Onza => Decimal::new(283_495, 7),   // 0.0283495
            Unit::Tonelada => Decimal::new(1_000, 0),
            Unit::Arroba => Decimal::new(113_398, 4), // 11.3398
            // Volume
            Unit::Litro => Decimal::ONE,
            Unit::Mililitro => Decimal::new(1, 3),        // 0.001
            Unit::Galon => Decimal::new(378_541, 5),      // 3.78541
            Unit::OnzaFluida => Decimal::new(295_735, 7), // 0.0295735
            Unit::Taza => Decimal::new(236_588, 6),       // 0.236588
            Unit::Cuarto => Decimal::new(946_353, 6),     // 0.946353
            Unit::Pinta => Decimal::new(473_176, 6),      // 0.473176
            Unit::Garrafon => Decimal::new(19, 0),
            // Discretas
            Unit::Pieza | Unit::Caja | Unit::Saco | Unit::Bolsa | Unit::Paquete => return None,
        };
        Some(factor)
    }

    // --- 3. Hierarquia de Compra ---
    // Em quais unidades de inventário uma unidade de COMPRA pode ser quebrada.
    // Contêineres (caixa, saco...) abrem em unidades finas; uma unidade de
    // medida só "quebra" dentro da própria família. Isso restringe o cadastro,
    // nunca entra no cálculo numérico.
    pub fn allowed_inventory_units(&self) -> &'static [Unit] {
        const CONTAINER_BREAKDOWN: [Unit; 6] = [
            Unit::Pieza,
            Unit::Kilo,
            Unit::Gramo,
            Unit::Litro,
            Unit::Mililitro,
            Unit::Paquete,
        ];
        const WEIGHT_UNITS: [Unit; 6] = [
            Unit::Kilo,
            Unit::Gramo,
            Unit::Libra,
            Unit::Onza,
            Unit::Tonelada,
            Unit::Arroba,
        ];
        const VOLUME_UNITS: [Unit; 8] = [
            Unit::Litro,
            Unit::Mililitro,
            Unit::Galon,
            Unit::OnzaFluida,
            Unit::Taza,
            Unit::Cuarto,
            Unit::Pinta,
            Unit::Garrafon,
        ];
        const PIECE_ONLY: [Unit; 1] = [Unit::Pieza];

        match self {
            Unit::Caja | Unit::Saco | Unit::Bolsa | Unit::Paquete => &CONTAINER_BREAKDOWN,
            Unit::Pieza => &PIECE_ONLY,
            u if u.family() == UnitFamily::Weight => &WEIGHT_UNITS,
            _ => &VOLUME_UNITS,
        }
    }

    pub fn can_break_into(&self, inventory_unit: Unit) -> bool {
        self.allowed_inventory_units().contains(&inventory_unit)
    }

    // Rótulo vindo de path/query, onde o serde não ajuda
    pub fn from_label(label: &str) -> Option<Unit> {
        Unit::ALL.iter().copied().find(|u| u.label() == label)
    }

    // Rótulo igual ao do wire (e ao que o banco legado guarda)
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Kilo => "Kilo",
            Unit::Gramo => "Gramo",
            Unit::Libra => "Libra",
            Unit::Onza => "Onza",
            Unit::Tonelada => "Tonelada",
            Unit::Arroba => "Arroba",
            Unit::Litro => "Litro",
            Unit::Mililitro => "Mililitro",
            Unit::Galon => "Galon",
            Unit::OnzaFluida => "Onza Fluida",
            Unit::Taza => "Taza",
            Unit::Cuarto => "Cuarto",
            Unit::Pinta => "Pinta",
            Unit::Garrafon => "Garrafon",
            Unit::Pieza => "Pieza",
            Unit::Caja => "Caja",
            Unit::Saco => "Saco",
            Unit::Bolsa => "Bolsa",
            Unit::Paquete => "Paquete",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// --- 4. Entrada do catálogo (resposta do GET /api/units) ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitCatalogEntry {
    pub unit: Unit,
    pub family: UnitFamily,
    // Ausente para unidades discretas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_factor: Option<Decimal>,
}

impl UnitCatalogEntry {
    pub fn catalog() -> Vec<UnitCatalogEntry> {
        Unit::ALL
            .iter()
            .map(|&unit| UnitCatalogEntry {
                unit,
                family: unit.family(),
                base_factor: unit.base_factor(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_units_have_factor_one() {
        assert_eq!(Unit::Kilo.base_factor(), Some(Decimal::ONE));
        assert_eq!(Unit::Litro.base_factor(), Some(Decimal::ONE));
    }

    #[test]
    fn discrete_units_have_no_factor() {
        for unit in [Unit::Pieza, Unit::Caja, Unit::Saco, Unit::Bolsa, Unit::Paquete] {
            assert_eq!(unit.base_factor(), None);
            assert_eq!(unit.family(), UnitFamily::Discrete);
        }
    }

    #[test]
    fn every_measurement_unit_has_factor() {
        for unit in Unit::ALL {
            if unit.family() != UnitFamily::Discrete {
                assert!(unit.base_factor().is_some(), "{unit:?} sem fator");
            }
        }
    }

    #[test]
    fn container_breaks_into_fine_units() {
        assert!(Unit::Caja.can_break_into(Unit::Pieza));
        assert!(Unit::Caja.can_break_into(Unit::Kilo));
        assert!(Unit::Saco.can_break_into(Unit::Gramo));
        // Galão não é unidade de quebra de caixa
        assert!(!Unit::Caja.can_break_into(Unit::Galon));
    }

    #[test]
    fn measurement_unit_breaks_only_within_family() {
        assert!(Unit::Kilo.can_break_into(Unit::Gramo));
        assert!(!Unit::Kilo.can_break_into(Unit::Litro));
        assert!(Unit::Galon.can_break_into(Unit::Mililitro));
        assert!(!Unit::Galon.can_break_into(Unit::Pieza));
    }

    #[test]
    fn from_label_resolves_known_units_only() {
        assert_eq!(Unit::from_label("Onza Fluida"), Some(Unit::OnzaFluida));
        assert_eq!(Unit::from_label("Caja"), Some(Unit::Caja));
        assert_eq!(Unit::from_label("Fanega"), None);
    }

    #[test]
    fn spanish_wire_labels_round_trip() {
        let json = serde_json::to_string(&Unit::OnzaFluida).unwrap();
        assert_eq!(json, "\"Onza Fluida\"");
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Unit::OnzaFluida);
    }
}

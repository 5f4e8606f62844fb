// src/services/units_service.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::units::{Unit, UnitCatalogEntry, UnitFamily},
};

// Motor de conversão de unidades. Sem estado: a tabela de fatores é estática
// e a conversão sempre passa pela unidade base da família (Kilo / Litro).
#[derive(Clone)]
pub struct UnitsService;

impl UnitsService {
    pub fn new() -> Self {
        Self
    }

    // result = valor × fator[from] / fator[to]
    //
    // Conversão sem sentido é erro explícito, nunca 0: um 0 "quieto"
    // entra em fórmula de custo sem ninguém perceber.
    pub fn convert(&self, value: Decimal, from: Unit, to: Unit) -> Result<Decimal, AppError> {
        if from.family() == UnitFamily::Discrete || to.family() == UnitFamily::Discrete {
            return Err(AppError::InvalidConversion { from, to });
        }
        if from.family() != to.family() {
            return Err(AppError::InvalidConversion { from, to });
        }

        // Famílias iguais e não discretas garantem fator presente
        let from_factor = from
            .base_factor()
            .ok_or(AppError::InvalidConversion { from, to })?;
        let to_factor = to
            .base_factor()
            .ok_or(AppError::InvalidConversion { from, to })?;

        let base_value = value * from_factor;
        Ok(base_value / to_factor)
    }

    pub fn catalog(&self) -> Vec<UnitCatalogEntry> {
        UnitCatalogEntry::catalog()
    }

    pub fn families(&self) -> Vec<UnitFamily> {
        vec![UnitFamily::Weight, UnitFamily::Volume, UnitFamily::Discrete]
    }

    pub fn breakdown(&self, purchase_unit: Unit) -> Vec<Unit> {
        purchase_unit.allowed_inventory_units().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc() -> UnitsService {
        UnitsService::new()
    }

    fn assert_close(a: Decimal, b: Decimal) {
        let eps: Decimal = "0.000000001".parse().unwrap();
        assert!((a - b).abs() < eps, "esperado {b}, obtido {a}");
    }

    #[test]
    fn kilo_to_gram_multiplies_by_thousand() {
        let result = svc().convert(Decimal::new(5, 0), Unit::Kilo, Unit::Gramo).unwrap();
        assert_eq!(result, Decimal::new(5_000, 0));
    }

    #[test]
    fn gallon_to_liter_uses_exact_factor() {
        let result = svc().convert(Decimal::ONE, Unit::Galon, Unit::Litro).unwrap();
        assert_eq!(result, "3.78541".parse::<Decimal>().unwrap());
    }

    #[test]
    fn garrafon_holds_nineteen_liters() {
        let result = svc().convert(Decimal::ONE, Unit::Garrafon, Unit::Litro).unwrap();
        assert_eq!(result, Decimal::new(19, 0));
    }

    #[test]
    fn weight_round_trip_within_tolerance() {
        let s = svc();
        let pounds = s.convert(Decimal::new(5, 0), Unit::Kilo, Unit::Libra).unwrap();
        let back = s.convert(pounds, Unit::Libra, Unit::Kilo).unwrap();
        assert_close(back, Decimal::new(5, 0));
    }

    #[test]
    fn volume_round_trip_within_tolerance() {
        let s = svc();
        let cups = s.convert(Decimal::new(2, 0), Unit::Litro, Unit::Taza).unwrap();
        let back = s.convert(cups, Unit::Taza, Unit::Litro).unwrap();
        assert_close(back, Decimal::new(2, 0));
    }

    #[test]
    fn round_trip_holds_across_whole_families() {
        let s = svc();
        let weight = [
            Unit::Kilo,
            Unit::Gramo,
            Unit::Libra,
            Unit::Onza,
            Unit::Tonelada,
            Unit::Arroba,
        ];
        let volume = [
            Unit::Litro,
            Unit::Mililitro,
            Unit::Galon,
            Unit::OnzaFluida,
            Unit::Taza,
            Unit::Cuarto,
            Unit::Pinta,
            Unit::Garrafon,
        ];
        let x = "7.25".parse::<Decimal>().unwrap();
        for family in [&weight[..], &volume[..]] {
            for &u in family {
                for &v in family {
                    let there = s.convert(x, u, v).unwrap();
                    let back = s.convert(there, v, u).unwrap();
                    assert_close(back, x);
                }
            }
        }
    }

    #[test]
    fn cross_family_conversion_is_rejected() {
        // Nunca devolver um número errado em silêncio
        let err = svc().convert(Decimal::ONE, Unit::Kilo, Unit::Litro).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidConversion { from: Unit::Kilo, to: Unit::Litro }
        ));
    }

    #[test]
    fn discrete_units_never_convert() {
        let s = svc();
        assert!(s.convert(Decimal::ONE, Unit::Caja, Unit::Pieza).is_err());
        assert!(s.convert(Decimal::ONE, Unit::Pieza, Unit::Kilo).is_err());
        assert!(s.convert(Decimal::ONE, Unit::Kilo, Unit::Paquete).is_err());
    }
}

use crate::guidelines::Guidelines;
use crate::models::{FieldType, HumusType, SoilClass, SoilSample, SoilType};
use crate::utils::{round_to_nearest, scan_thresholds, scan_thresholds_left};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

/// Conversion divisor from P2O5 to element form, the form the guideline
/// thresholds are tabulated in.
fn p2o5_to_p() -> Decimal {
    Decimal::new(2291, 3)
}

/// Conversion divisor from K2O to element form.
fn k2o_to_k() -> Decimal {
    Decimal::new(1205, 3)
}

/// One soil sample evaluated against a target field type: content
/// classes and the per-nutrient reductions the soil reserve grants.
#[derive(Debug, Clone)]
pub struct Soil {
    pub year: i32,
    pub field_type: FieldType,
    pub soil_type: SoilType,
    pub humus: HumusType,
    pub ph: Option<Decimal>,
    pub p2o5: Option<Decimal>,
    pub k2o: Option<Decimal>,
    pub mg: Option<Decimal>,
    guidelines: Arc<Guidelines>,
}

/// Wrap the newest sample taken in or before `year`, if any.
pub fn create_soil(
    samples: &[SoilSample],
    field_type: FieldType,
    year: i32,
    guidelines: &Arc<Guidelines>,
) -> Option<Soil> {
    samples
        .iter()
        .filter(|sample| sample.year <= year)
        .max_by_key(|sample| sample.year)
        .map(|sample| Soil::new(sample, field_type, guidelines.clone()))
}

impl Soil {
    pub fn new(sample: &SoilSample, field_type: FieldType, guidelines: Arc<Guidelines>) -> Self {
        Self {
            year: sample.year,
            field_type,
            soil_type: sample.soil_type,
            humus: sample.humus,
            ph: sample.ph,
            p2o5: sample.p2o5,
            k2o: sample.k2o,
            mg: sample.mg,
            guidelines,
        }
    }

    /// Baseline N delivery of the soil reserve for the field type.
    pub fn reduction_n(&self) -> Decimal {
        self.guidelines.soil_reduction_n(self.field_type)
    }

    pub fn reduction_p2o5(&self) -> Decimal {
        let Some(p2o5) = self.p2o5 else {
            return Decimal::ZERO;
        };
        let value = round_to_nearest(p2o5 / p2o5_to_p(), 1);
        let Some(table) = self.guidelines.p2o5_reductions(self.field_type) else {
            warn!(field_type = %self.field_type, "no p2o5 reduction table");
            return Decimal::ZERO;
        };
        reduction_at(&table.values, &table.reductions, value)
    }

    pub fn reduction_k2o(&self) -> Decimal {
        let Some(k2o) = self.k2o else {
            return Decimal::ZERO;
        };
        let value = round_to_nearest(k2o / k2o_to_k(), 1);
        let Some(table) =
            self.guidelines
                .k2o_reductions(self.field_type, self.soil_type, self.humus)
        else {
            warn!(soil_type = %self.soil_type, "no k2o reduction table");
            return Decimal::ZERO;
        };
        reduction_at(&table.values, &table.reductions, value)
    }

    pub fn reduction_mg(&self) -> Decimal {
        let Some(mg) = self.mg else {
            return Decimal::ZERO;
        };
        let value = round_to_nearest(mg, 1);
        let Some(table) =
            self.guidelines
                .mg_reductions(self.field_type, self.soil_type, self.humus)
        else {
            warn!(soil_type = %self.soil_type, "no mg reduction table");
            return Decimal::ZERO;
        };
        reduction_at(&table.values, &table.reductions, value)
    }

    /// S delivery from mineralization, a function of the crop's S demand
    /// band, the humus class and the total supplied N.
    pub fn reduction_s(&self, s_demand: Decimal, n_total: Decimal) -> Decimal {
        let table = self.guidelines.s_reductions();
        let Some(demand_band) = scan_thresholds(&table.limits.demand, s_demand) else {
            return Decimal::ZERO;
        };
        let humus_part = table
            .humus
            .get(&self.humus)
            .and_then(|row| row.get(demand_band))
            .copied()
            .unwrap_or_else(|| {
                warn!(humus = %self.humus, "no sulfur band for humus class");
                Decimal::ZERO
            });
        let n_part = scan_thresholds(&table.limits.n_total, n_total)
            .and_then(|band| table.limits.n_total.get(band))
            .and_then(|bound| table.n_total.get(&bound.to_string()))
            .and_then(|row| row.get(demand_band))
            .copied()
            .unwrap_or_default();
        humus_part + n_part
    }

    /// Lime requirement from the pH deficit, negative as it consumes the
    /// balance. In preservation mode the requirement at the optimal pH is
    /// used instead of the measured one.
    pub fn reduction_cao(&self, preservation: bool) -> Decimal {
        let value = if preservation {
            self.optimal_ph()
        } else {
            match self.ph {
                Some(ph) => ph,
                None => return Decimal::ZERO,
            }
        };
        let Some(table) = self.guidelines.cao_reductions(self.field_type) else {
            warn!(field_type = %self.field_type, "no cao reduction table");
            return Decimal::ZERO;
        };
        let Some(index) = scan_thresholds_left(&table.ph_values, round_to_nearest(value, 1))
        else {
            return Decimal::ZERO;
        };
        let Some(requirement) = table.requirement_for(self.soil_type, self.humus) else {
            warn!(soil_type = %self.soil_type, "no cao requirement row");
            return Decimal::ZERO;
        };
        match requirement.get(index).or_else(|| requirement.last()) {
            Some(value) => -(*value * Decimal::ONE_HUNDRED / Decimal::from(4)),
            None => Decimal::ZERO,
        }
    }

    pub fn class_p2o5(&self) -> Option<SoilClass> {
        let value = round_to_nearest(self.p2o5? / p2o5_to_p(), 1);
        class_at(self.guidelines.p2o5_classes(self.field_type)?, value)
    }

    pub fn class_k2o(&self) -> Option<SoilClass> {
        let value = round_to_nearest(self.k2o? / k2o_to_k(), 1);
        class_at(
            self.guidelines
                .k2o_classes(self.field_type, self.soil_type, self.humus)?,
            value,
        )
    }

    pub fn class_mg(&self) -> Option<SoilClass> {
        let value = round_to_nearest(self.mg?, 1);
        class_at(
            self.guidelines
                .mg_classes(self.field_type, self.soil_type, self.humus)?,
            value,
        )
    }

    pub fn class_ph(&self) -> Option<SoilClass> {
        class_at(
            self.guidelines
                .ph_classes(self.field_type, self.soil_type, self.humus)?,
            self.ph?,
        )
    }

    /// Lower bound of pH class C, the maintenance target.
    pub fn optimal_ph(&self) -> Decimal {
        self.guidelines
            .ph_classes(self.field_type, self.soil_type, self.humus)
            .and_then(|thresholds| thresholds.get(2))
            .copied()
            .unwrap_or_default()
    }
}

/// Signed reduction for the band the value falls into; values below the
/// first threshold use the first band.
fn reduction_at(values: &[Decimal], reductions: &[Decimal], value: Decimal) -> Decimal {
    let index = scan_thresholds(values, value).unwrap_or(0);
    reductions.get(index).copied().unwrap_or_default()
}

fn class_at(thresholds: &[Decimal], value: Decimal) -> Option<SoilClass> {
    let index = scan_thresholds(thresholds, value).unwrap_or(0);
    Some(SoilClass::from_index(index))
}

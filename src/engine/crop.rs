use super::balance::Balance;
use crate::guidelines::Guidelines;
use crate::models::{self, CropClass, CropType, NminType};
use rust_decimal::Decimal;
use std::sync::Arc;

/// A crop descriptor bound to the guideline tables; computes primary and
/// by-product nutrient demands from yield and protein.
#[derive(Debug, Clone)]
pub struct Crop {
    record: models::Crop,
    guidelines: Arc<Guidelines>,
}

impl Crop {
    pub fn new(record: &models::Crop, guidelines: Arc<Guidelines>) -> Self {
        Self {
            record: record.clone(),
            guidelines,
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn crop_type(&self) -> CropType {
        self.record.crop_type
    }

    pub fn feedable(&self) -> bool {
        self.record.feedable
    }

    pub fn nmin_depth(&self) -> NminType {
        self.record.nmin_depth
    }

    pub fn target_protein(&self) -> Decimal {
        self.record.target_protein
    }

    pub fn is_class(&self, crop_class: CropClass) -> bool {
        self.record.crop_class == crop_class
    }

    /// Nutrient demand of the primary product at the given yield and
    /// protein level.
    pub fn demand_crop(&self, crop_yield: Decimal, crop_protein: Decimal) -> Balance {
        Balance::with(
            "",
            self.demand_n(crop_yield, crop_protein),
            self.record.p2o5 * crop_yield,
            self.record.k2o * crop_yield,
            self.record.mgo * crop_yield,
            self.s_demand(),
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    /// Nutrient demand of the by-product (e.g. straw) at the given
    /// primary yield.
    pub fn demand_byproduct(&self, crop_yield: Decimal) -> Balance {
        let byp = |nutrient: Decimal| self.record.byp_ratio * nutrient * crop_yield;
        Balance::with(
            "",
            Decimal::ZERO,
            byp(self.record.byp_p2o5),
            byp(self.record.byp_k2o),
            byp(self.record.byp_mgo),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    /// Sulfur demand by crop name, zero when the crop is not tabulated.
    pub fn s_demand(&self) -> Decimal {
        self.guidelines.sulfur_need(&self.record.name)
    }

    /// Variable-yield correction: the demand slope differs for yields
    /// above and below the target.
    fn demand_n(&self, crop_yield: Decimal, crop_protein: Decimal) -> Decimal {
        let slope = if crop_yield >= self.record.target_yield {
            self.record.pos_yield
        } else {
            self.record.neg_yield
        };
        self.record.target_demand
            + slope * (crop_yield - self.record.target_yield)
            + self.record.var_protein * (crop_protein - self.record.target_protein)
    }
}

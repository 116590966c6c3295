use super::balance::Balance;
use super::crop::Crop;
use crate::guidelines::{Guidelines, LegumeDelivery};
use crate::models::{
    self, CropClass, CropType, CultivationType, DemandType, LegumeType, NminType, ResidueType,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

/// Fixed N demand of a catch crop, kg/ha.
const CATCH_CROP_N_DEMAND: i64 = 60;

/// Per-base-nutrient demand options of the field the cultivation grows
/// on.
#[derive(Debug, Clone, Copy)]
pub struct DemandOptions {
    pub p2o5: DemandType,
    pub k2o: DemandType,
    pub mgo: DemandType,
}

impl Default for DemandOptions {
    fn default() -> Self {
        Self {
            p2o5: DemandType::Removal,
            k2o: DemandType::Removal,
            mgo: DemandType::Removal,
        }
    }
}

/// A crop grown on a field in one rotation role. Main, second and catch
/// crops are closed variants dispatched on `cultivation_type`.
#[derive(Debug, Clone)]
pub struct Cultivation {
    pub cultivation_type: CultivationType,
    pub crop: Crop,
    pub crop_yield: Decimal,
    pub crop_protein: Decimal,
    pub residues: ResidueType,
    pub legume_rate: LegumeType,
    nmin_30: Decimal,
    nmin_60: Decimal,
    nmin_90: Decimal,
    guidelines: Arc<Guidelines>,
}

impl Cultivation {
    pub fn new(record: &models::Cultivation, crop: Crop, guidelines: Arc<Guidelines>) -> Self {
        Self {
            cultivation_type: record.cultivation_type,
            crop_protein: record.crop_protein.unwrap_or_else(|| crop.target_protein()),
            crop,
            crop_yield: record.crop_yield,
            residues: record.residues,
            legume_rate: record.legume_rate,
            nmin_30: Decimal::from(record.nmin_30),
            nmin_60: Decimal::from(record.nmin_60),
            nmin_90: Decimal::from(record.nmin_90),
            guidelines,
        }
    }

    pub fn crop_class(&self) -> CropClass {
        CropClass::from(self.cultivation_type)
    }

    pub fn is_class(&self, cultivation_type: CultivationType) -> bool {
        self.cultivation_type == cultivation_type
    }

    /// Nutrient demand of the cultivated crop, negated for the balance
    /// direction by default. Catch crops have a fixed N demand and no
    /// other needs.
    pub fn demand(&self, options: DemandOptions, negative: bool) -> Balance {
        if self.cultivation_type == CultivationType::CatchCrop {
            let n = Decimal::from(CATCH_CROP_N_DEMAND);
            let mut demand = Balance::new("Crop demand");
            demand.n = if negative { -n } else { n };
            return demand;
        }

        let crop_demand = self.crop.demand_crop(self.crop_yield, self.crop_protein);
        let mut byproduct = self.crop.demand_byproduct(self.crop_yield);
        let removed = self.residues == ResidueType::MainRemoved;
        if !removed && options.p2o5 == DemandType::Removal {
            byproduct.p2o5 = Decimal::ZERO;
        }
        if !removed && options.k2o == DemandType::Removal {
            byproduct.k2o = Decimal::ZERO;
        }
        if !removed && options.mgo == DemandType::Removal {
            byproduct.mgo = Decimal::ZERO;
        }

        let demand = Balance::new("Crop demand");
        if negative {
            demand - (crop_demand + byproduct)
        } else {
            demand + (crop_demand + byproduct)
        }
    }

    /// Delayed N supply this crop grants its successor. Catch crops key
    /// on their residue handling.
    pub fn pre_crop_effect(&self) -> Decimal {
        if self.cultivation_type == CultivationType::CatchCrop {
            self.guidelines
                .catch_crop_effect(self.crop.crop_type(), self.residues)
        } else {
            self.guidelines.pre_crop_effect(self.crop.crop_type())
        }
    }

    /// N fixed by legumes in the stand; only forage crops qualify.
    pub fn legume_delivery(&self) -> Decimal {
        if !self.crop.feedable() {
            return Decimal::ZERO;
        }
        let crop_type = self.crop.crop_type();
        match crop_type {
            CropType::PermanentGrassland => {
                match self.guidelines.legume_delivery(crop_type) {
                    Some(LegumeDelivery::ByRate(by_rate)) => {
                        by_rate.get(&self.legume_rate).copied().unwrap_or_else(|| {
                            warn!(legume_rate = ?self.legume_rate, "no grassland legume band");
                            Decimal::ZERO
                        })
                    }
                    _ => Decimal::ZERO,
                }
            }
            CropType::AlfalfaGrass | CropType::CloverGrass => {
                let rate = match self.legume_rate.main_crop_rate() {
                    Some(rate) => rate,
                    None => {
                        warn!(
                            crop = %self.crop.name(),
                            legume_rate = ?self.legume_rate,
                            "legume rate not valid for a legume-grass stand"
                        );
                        Decimal::ZERO
                    }
                };
                match self.guidelines.legume_delivery(crop_type) {
                    Some(LegumeDelivery::Flat(value)) => *value * rate,
                    _ => Decimal::ZERO,
                }
            }
            CropType::Alfalfa | CropType::Clover => {
                match self.guidelines.legume_delivery(crop_type) {
                    Some(LegumeDelivery::Flat(value)) => *value,
                    _ => Decimal::ZERO,
                }
            }
            _ => Decimal::ZERO,
        }
    }

    /// Mineral soil nitrogen credited against a main crop's demand.
    /// Forage crops receive none; the deepest layer counts half.
    pub fn reduction_nmin(&self) -> Decimal {
        if !self.cultivation_type.is_main() || self.crop.feedable() {
            return Decimal::ZERO;
        }
        match self.crop.nmin_depth() {
            NminType::Nmin0 => Decimal::ZERO,
            NminType::Nmin30 => self.nmin_30,
            NminType::Nmin60 => self.nmin_30 + self.nmin_60,
            NminType::Nmin90 => self.nmin_30 + self.nmin_60 + self.nmin_90 / Decimal::TWO,
        }
    }

    /// Crop-level N reduction: Nmin and legume delivery for main crops,
    /// legume delivery alone for second crops.
    pub fn reduction(&self) -> Decimal {
        match self.cultivation_type {
            CultivationType::MainCrop | CultivationType::SecondMainCrop => {
                self.reduction_nmin() + self.legume_delivery()
            }
            CultivationType::SecondCrop => self.legume_delivery(),
            CultivationType::CatchCrop => Decimal::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::crop::test_support::*;
    use crate::guidelines::test_support::{dec, test_guidelines};

    fn build(
        crop_record: &models::Crop,
        cultivation_type: CultivationType,
        crop_yield: &str,
    ) -> Cultivation {
        let guidelines = test_guidelines();
        let record = cultivation_record(crop_record, cultivation_type, crop_yield);
        Cultivation::new(
            &record,
            Crop::new(crop_record, guidelines.clone()),
            guidelines,
        )
    }

    #[test]
    fn nmin_reduction_per_depth() {
        let mut record = winter_barley();
        let guidelines = test_guidelines();
        for (depth, expected) in [
            (NminType::Nmin0, dec("0")),
            (NminType::Nmin30, dec("20")),
            (NminType::Nmin60, dec("30")),
            (NminType::Nmin90, dec("38")),
        ] {
            record.nmin_depth = depth;
            let cultivation_record =
                cultivation_record(&record, CultivationType::MainCrop, "70").with_nmin(20, 10, 16);
            let cultivation = Cultivation::new(
                &cultivation_record,
                Crop::new(&record, guidelines.clone()),
                guidelines.clone(),
            );
            assert_eq!(cultivation.reduction_nmin(), expected);
        }
    }

    #[test]
    fn feedable_crops_get_no_nmin_reduction() {
        let mut record = field_grass();
        record.nmin_depth = NminType::Nmin90;
        let cultivation_record =
            cultivation_record(&record, CultivationType::MainCrop, "100").with_nmin(20, 10, 16);
        let guidelines = test_guidelines();
        let cultivation = Cultivation::new(
            &cultivation_record,
            Crop::new(&record, guidelines.clone()),
            guidelines,
        );
        assert_eq!(cultivation.reduction_nmin(), Decimal::ZERO);
    }

    #[test]
    fn second_crops_get_no_nmin_reduction() {
        let mut record = winter_barley();
        record.crop_class = CropClass::SecondCrop;
        let cultivation_record =
            cultivation_record(&record, CultivationType::SecondCrop, "70").with_nmin(20, 10, 16);
        let guidelines = test_guidelines();
        let cultivation = Cultivation::new(
            &cultivation_record,
            Crop::new(&record, guidelines.clone()),
            guidelines,
        );
        assert_eq!(cultivation.reduction_nmin(), Decimal::ZERO);
    }

    #[test]
    fn catch_crop_demand_is_fixed() {
        let cultivation = build(&catch_mustard_mix(), CultivationType::CatchCrop, "0");
        let demand = cultivation.demand(DemandOptions::default(), true);
        assert_eq!(demand.n, dec("-60"));
        assert!(demand.p2o5.is_zero());
        assert!(demand.s.is_zero());
        let positive = cultivation.demand(DemandOptions::default(), false);
        assert_eq!(positive.n, dec("60"));
    }

    #[test]
    fn removed_residues_add_byproduct_demand() {
        let mut cultivation = build(&winter_barley(), CultivationType::MainCrop, "70");
        cultivation.residues = ResidueType::MainRemoved;
        let demand = cultivation.demand(DemandOptions::default(), true);
        // primary 0.8 * 70 = 56, straw 0.8 * 0.5 * 70 = 28
        assert_eq!(demand.p2o5, dec("-84.0"));

        cultivation.residues = ResidueType::MainStayed;
        let without = cultivation.demand(DemandOptions::default(), true);
        assert_eq!(without.p2o5, dec("-56.0"));
    }

    #[test]
    fn demand_option_pulls_byproduct_per_nutrient() {
        let mut cultivation = build(&winter_barley(), CultivationType::MainCrop, "70");
        cultivation.residues = ResidueType::MainStayed;
        let options = DemandOptions {
            p2o5: DemandType::Demand,
            k2o: DemandType::Removal,
            mgo: DemandType::Removal,
        };
        let demand = cultivation.demand(options, true);
        assert_eq!(demand.p2o5, dec("-84.0"));
        // k2o stays removal-only: 0.6 * 70
        assert_eq!(demand.k2o, dec("-42.0"));
    }

    #[test]
    fn catch_crop_effect_depends_on_residues() {
        let mut cultivation = build(&catch_mustard_mix(), CultivationType::CatchCrop, "0");
        cultivation.residues = ResidueType::CatchFrozen;
        assert_eq!(cultivation.pre_crop_effect(), dec("10"));
        cultivation.residues = ResidueType::CatchNotFrozenSpring;
        assert_eq!(cultivation.pre_crop_effect(), dec("40"));
    }

    #[test]
    fn legume_delivery_requires_feedable() {
        let cultivation = build(&winter_barley(), CultivationType::MainCrop, "70");
        assert_eq!(cultivation.legume_delivery(), Decimal::ZERO);
    }

    #[test]
    fn grassland_legume_delivery_by_band() {
        let mut record = field_grass();
        record.crop_type = CropType::PermanentGrassland;
        let mut cultivation = build(&record, CultivationType::MainCrop, "100");
        cultivation.legume_rate = LegumeType::GrassLess10;
        assert_eq!(cultivation.legume_delivery(), dec("20"));
    }

    #[test]
    fn legume_grass_scales_with_share() {
        let mut record = field_grass();
        record.crop_type = CropType::AlfalfaGrass;
        let mut cultivation = build(&record, CultivationType::MainCrop, "100");
        cultivation.legume_rate = LegumeType::MainCrop30;
        // 30 * 30/10
        assert_eq!(cultivation.legume_delivery(), dec("90"));
        cultivation.legume_rate = LegumeType::GrassLess10;
        assert_eq!(cultivation.legume_delivery(), Decimal::ZERO);
    }
}

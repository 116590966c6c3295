use super::balance::Balance;
use super::crop::Crop;
use super::fertilizer::Fertilizer;
use crate::models::{self, CropClass, CultivationType, CutTiming, FieldType, MeasureType};
use rust_decimal::Decimal;

/// One application event: a fertilizer amount applied to a cultivation
/// under a measure.
#[derive(Debug, Clone)]
pub struct Fertilization {
    pub amount: Decimal,
    pub measure: MeasureType,
    pub month: Option<u32>,
    pub cut_timing: Option<CutTiming>,
    pub cultivation_type: CultivationType,
    pub fertilizer: Fertilizer,
    crop: Crop,
}

impl Fertilization {
    pub fn new(
        record: &models::Fertilization,
        fertilizer: Fertilizer,
        crop: Crop,
        cultivation_type: CultivationType,
    ) -> Self {
        Self {
            amount: record.amount,
            measure: record.measure,
            month: record.month,
            cut_timing: record.cut_timing,
            cultivation_type,
            fertilizer,
            crop,
        }
    }

    /// Total organic N of this application, restricted by the optional
    /// measure and cultivation filters. The cultivation filter compares
    /// at crop-class granularity, so both main-crop roles match each
    /// other. Mineral applications contribute nothing.
    pub fn n_total(
        &self,
        measure: Option<MeasureType>,
        cultivation: Option<CultivationType>,
        netto: bool,
    ) -> Decimal {
        if !self.fertilizer.is_organic() {
            return Decimal::ZERO;
        }
        if measure.is_some_and(|m| m != self.measure) {
            return Decimal::ZERO;
        }
        if cultivation.is_some_and(|c| CropClass::from(c) != CropClass::from(self.cultivation_type))
        {
            return Decimal::ZERO;
        }
        self.amount * self.fertilizer.n_total(netto)
    }

    /// Supplied nutrients of this application on the given field type.
    /// The N component carries the plant-available share; ammonium is
    /// not booked separately.
    pub fn nutrients(&self, field_type: FieldType) -> Balance {
        Balance::with(
            self.fertilizer.name.clone(),
            self.amount * self.n_verf(field_type),
            self.amount * self.fertilizer.p2o5,
            self.amount * self.fertilizer.k2o,
            self.amount * self.fertilizer.mgo,
            self.amount * self.fertilizer.s,
            self.amount * self.fertilizer.cao,
            Decimal::ZERO,
        )
    }

    /// Available-N routing: forage crops are credited at the grassland
    /// rate whatever the field type, and organic N on a catch crop is
    /// not credited to the main crop at all.
    fn n_verf(&self, field_type: FieldType) -> Decimal {
        if self.fertilizer.is_organic() && self.cultivation_type == CultivationType::CatchCrop {
            return Decimal::ZERO;
        }
        let field_type = if self.crop.feedable() {
            FieldType::Grassland
        } else {
            field_type
        };
        self.fertilizer.n_verf(field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::crop::test_support::*;
    use crate::engine::fertilizer::test_support::*;
    use crate::guidelines::test_support::{dec, test_guidelines};

    fn build(
        crop_record: &models::Crop,
        fertilizer_record: &models::Fertilizer,
        measure: MeasureType,
        amount: &str,
        cultivation_type: CultivationType,
    ) -> Fertilization {
        let guidelines = test_guidelines();
        let record = models::Fertilization::new(1, 1, 1, measure, dec(amount));
        Fertilization::new(
            &record,
            Fertilizer::new(fertilizer_record, guidelines.clone()),
            Crop::new(crop_record, guidelines),
            cultivation_type,
        )
    }

    #[test]
    fn organic_n_total_respects_filters() {
        let fertilization = build(
            &winter_barley(),
            &digestate(),
            MeasureType::OrgFall,
            "0.4",
            CultivationType::MainCrop,
        );
        assert_eq!(fertilization.n_total(None, None, false), dec("40.0"));
        assert_eq!(fertilization.n_total(None, None, true), dec("20.0"));
        assert_eq!(
            fertilization.n_total(Some(MeasureType::OrgFall), None, false),
            dec("40.0")
        );
        assert_eq!(
            fertilization.n_total(Some(MeasureType::OrgSpring), None, false),
            Decimal::ZERO
        );
        // second main crop matches the main-crop class filter
        assert_eq!(
            fertilization.n_total(None, Some(CultivationType::SecondMainCrop), false),
            dec("40.0")
        );
        assert_eq!(
            fertilization.n_total(None, Some(CultivationType::CatchCrop), false),
            Decimal::ZERO
        );
    }

    #[test]
    fn mineral_contributes_no_organic_n() {
        let fertilization = build(
            &winter_barley(),
            &calcium_ammonium_nitrate(),
            MeasureType::FirstNFert,
            "2",
            CultivationType::MainCrop,
        );
        assert_eq!(fertilization.n_total(None, None, false), Decimal::ZERO);
    }

    #[test]
    fn nutrients_scale_linearly_with_amount() {
        let single = build(
            &winter_barley(),
            &digestate(),
            MeasureType::OrgSpring,
            "1",
            CultivationType::MainCrop,
        );
        let triple = build(
            &winter_barley(),
            &digestate(),
            MeasureType::OrgSpring,
            "3",
            CultivationType::MainCrop,
        );
        let scaled = single.nutrients(FieldType::Cropland) * dec("3");
        assert_eq!(triple.nutrients(FieldType::Cropland).n, scaled.n);
        assert_eq!(triple.nutrients(FieldType::Cropland).k2o, scaled.k2o);
        assert_eq!(
            triple.n_total(None, None, true),
            single.n_total(None, None, true) * dec("3")
        );
    }

    #[test]
    fn nutrients_use_available_n() {
        let fertilization = build(
            &winter_barley(),
            &digestate(),
            MeasureType::OrgSpring,
            "1",
            CultivationType::MainCrop,
        );
        let nutrients = fertilization.nutrients(FieldType::Cropland);
        assert_eq!(nutrients.title, "Gärrest");
        assert_eq!(nutrients.n, dec("76.0"));
        assert_eq!(nutrients.p2o5, dec("30"));
        assert_eq!(nutrients.nh4, Decimal::ZERO);
    }

    #[test]
    fn feedable_recipient_routes_to_grassland_rate() {
        let fertilization = build(
            &field_grass(),
            &digestate(),
            MeasureType::OrgSpring,
            "1",
            CultivationType::MainCrop,
        );
        // grassland factor 0.5: (100 - 40) * 0.5 + 40
        assert_eq!(
            fertilization.nutrients(FieldType::Cropland).n,
            dec("70.0")
        );
    }

    #[test]
    fn organic_on_catch_crop_carries_no_n() {
        let fertilization = build(
            &catch_mustard_mix(),
            &digestate(),
            MeasureType::OrgFall,
            "1",
            CultivationType::CatchCrop,
        );
        let nutrients = fertilization.nutrients(FieldType::Cropland);
        assert_eq!(nutrients.n, Decimal::ZERO);
        assert_eq!(nutrients.p2o5, dec("30"));
    }
}

use crate::guidelines::Guidelines;
use crate::models::{self, FertClass, FertType, FieldType};
use rust_decimal::Decimal;
use std::sync::Arc;

/// A fertilizer bound to the guideline tables. Organic and mineral
/// fertilizers are closed variants dispatched on `fert_class`: they
/// differ in available-N accounting and lime starvation.
#[derive(Debug, Clone)]
pub struct Fertilizer {
    pub name: String,
    pub fert_class: FertClass,
    pub fert_type: FertType,
    pub n: Decimal,
    pub p2o5: Decimal,
    pub k2o: Decimal,
    pub mgo: Decimal,
    pub s: Decimal,
    pub cao: Decimal,
    pub nh4: Decimal,
    guidelines: Arc<Guidelines>,
}

impl Fertilizer {
    pub fn new(record: &models::Fertilizer, guidelines: Arc<Guidelines>) -> Self {
        Self {
            name: record.name.clone(),
            fert_class: record.fert_class,
            fert_type: record.fert_type,
            n: record.n,
            p2o5: record.p2o5,
            k2o: record.k2o,
            mgo: record.mgo,
            s: record.s,
            cao: record.cao,
            nh4: record.nh4,
            guidelines,
        }
    }

    pub fn is_organic(&self) -> bool {
        self.fert_class == FertClass::Organic
    }

    pub fn is_mineral(&self) -> bool {
        self.fert_class == FertClass::Mineral
    }

    pub fn is_lime(&self) -> bool {
        self.fert_type == FertType::Lime
    }

    pub fn is_class(&self, fert_class: FertClass) -> bool {
        self.fert_class == fert_class
    }

    /// Total N content per unit. Netto applies the storage loss of the
    /// organic fertilizer type; mineral fertilizers lose nothing.
    pub fn n_total(&self, netto: bool) -> Decimal {
        if !self.is_organic() || !netto {
            return self.n;
        }
        self.n * (Decimal::ONE - self.storage_loss())
    }

    /// Plant-available N per unit for the given field type. For organic
    /// fertilizer the non-ammonium share is discounted by the field-type
    /// factor; fallow and exchanged land earn no legal credit. Mineral
    /// fertilizer is modelled with its ammonium share.
    pub fn n_verf(&self, field_type: FieldType) -> Decimal {
        if self.is_mineral() {
            return self.nh4;
        }
        let factor = match field_type {
            FieldType::Cropland => self.org_factor(|f| f.cropland_factor),
            FieldType::Grassland => self.org_factor(|f| f.grassland_factor),
            _ => return Decimal::ZERO,
        };
        (self.n_total(false) - self.nh4) * factor + self.nh4
    }

    /// Signed acidification effect per unit on the given field type,
    /// after Sluijsmans: `CaO + 1.4 MgO + 0.6 K2O - 0.4 P2O5 - 0.7 SO3
    /// - n x N`. Organic fertilizers are weighted with their type's lime
    /// factor.
    pub fn lime_starvation(&self, field_type: FieldType) -> Decimal {
        let n_factor = match field_type {
            FieldType::Grassland => Decimal::new(8, 1),
            _ => Decimal::ONE,
        };
        let starvation = self.cao + Decimal::new(14, 1) * self.mgo
            + Decimal::new(6, 1) * self.k2o
            - Decimal::new(4, 1) * self.p2o5
            - Decimal::new(7, 1) * self.s * Decimal::new(400, 3) // conversion from SO3
            - n_factor * self.n;
        if self.is_organic() {
            starvation * self.org_factor(|f| f.lime_factor)
        } else {
            starvation
        }
    }

    fn storage_loss(&self) -> Decimal {
        self.org_factor(|f| f.storage_loss)
    }

    fn org_factor(&self, select: impl Fn(&crate::guidelines::OrgFactor) -> Decimal) -> Decimal {
        self.guidelines
            .org_factor(self.fert_type)
            .map(select)
            .unwrap_or_default()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::guidelines::test_support::{dec, test_guidelines};

    #[test]
    fn organic_n_total_with_storage_loss() {
        let fertilizer = Fertilizer::new(&digestate(), test_guidelines());
        assert_eq!(fertilizer.n_total(false), dec("100"));
        assert_eq!(fertilizer.n_total(true), dec("50"));
    }

    #[test]
    fn organic_available_n_per_field_type() {
        let fertilizer = Fertilizer::new(&digestate(), test_guidelines());
        // (100 - 40) * factor + 40
        assert_eq!(fertilizer.n_verf(FieldType::Cropland), dec("76.0"));
        assert_eq!(fertilizer.n_verf(FieldType::Grassland), dec("70.0"));
        assert_eq!(fertilizer.n_verf(FieldType::FallowCropland), Decimal::ZERO);
        assert_eq!(fertilizer.n_verf(FieldType::ExchangedLand), Decimal::ZERO);
    }

    #[test]
    fn mineral_n_accounting() {
        let fertilizer = Fertilizer::new(&calcium_ammonium_nitrate(), test_guidelines());
        assert_eq!(fertilizer.n_total(true), dec("27"));
        assert_eq!(fertilizer.n_total(false), dec("27"));
        assert_eq!(fertilizer.n_verf(FieldType::Cropland), dec("13.5"));
    }

    #[test]
    fn classification_predicates() {
        let guidelines = test_guidelines();
        let organic = Fertilizer::new(&digestate(), guidelines.clone());
        assert!(organic.is_organic() && !organic.is_mineral() && !organic.is_lime());
        let mut record = models::Fertilizer::new(1, "Kalk", 2024, FertType::Lime);
        record.cao = dec("50");
        let lime = Fertilizer::new(&record, guidelines);
        assert!(lime.is_lime() && lime.is_mineral());
        assert!(lime.is_class(FertClass::Mineral));
    }

    #[test]
    fn lime_starvation_weighs_composition() {
        let record = models::Fertilizer::new(1, "NPK 15-15-15", 2024, FertType::NPK)
            .with_contents(
                dec("15"),
                dec("15"),
                dec("15"),
                dec("0"),
                dec("0"),
                dec("0"),
                dec("7"),
            );
        let fertilizer = Fertilizer::new(&record, test_guidelines());
        // 0.6*15 - 0.4*15 - 15 = -12 on cropland
        assert_eq!(fertilizer.lime_starvation(FieldType::Cropland), dec("-12.0"));
        // grassland discounts the N term: 3 - 0.8*15 = -9
        assert_eq!(
            fertilizer.lime_starvation(FieldType::Grassland),
            dec("-9.0")
        );
    }
}

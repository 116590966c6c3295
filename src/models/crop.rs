use super::types::{CropClass, CropType, FieldType, NminType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Static crop descriptor. Nutrient compositions are kg per dt of yield;
/// `name` is unique per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    /// Usage class the crop can be grown on.
    pub field_type: FieldType,
    pub crop_class: CropClass,
    /// Agronomic group, the key for the preceding-crop effect.
    pub crop_type: CropType,
    /// Subtype label, e.g. "Wintergerste" for "W.-Gerste".
    pub kind: String,
    /// Forage crops; they receive no Nmin reduction and organic
    /// fertilizer is credited at the grassland rate.
    pub feedable: bool,
    /// Whether the crop leaves usable residues.
    pub residue: bool,
    pub nmin_depth: NminType,
    /// Nitrogen demand at target yield, kg/ha.
    pub target_demand: Decimal,
    pub target_yield: Decimal,
    /// Demand change per dt when the yield delta is positive.
    pub pos_yield: Decimal,
    /// Demand change per dt when the yield delta is negative.
    pub neg_yield: Decimal,
    pub target_protein: Decimal,
    /// Demand change per percentage point of protein delta.
    pub var_protein: Decimal,
    pub n: Decimal,
    pub p2o5: Decimal,
    pub k2o: Decimal,
    pub mgo: Decimal,
    /// By-product name, e.g. straw; empty when the crop has none.
    pub byproduct: Option<String>,
    /// By-product mass per dt of primary yield.
    pub byp_ratio: Decimal,
    pub byp_n: Decimal,
    pub byp_p2o5: Decimal,
    pub byp_k2o: Decimal,
    pub byp_mgo: Decimal,
}

impl Crop {
    pub fn new(
        user_id: i64,
        name: &str,
        field_type: FieldType,
        crop_class: CropClass,
        crop_type: CropType,
    ) -> Self {
        Self {
            id: None,
            user_id,
            name: name.to_string(),
            field_type,
            crop_class,
            crop_type,
            kind: name.to_string(),
            feedable: false,
            residue: false,
            nmin_depth: NminType::Nmin0,
            target_demand: Decimal::ZERO,
            target_yield: Decimal::ZERO,
            pos_yield: Decimal::ZERO,
            neg_yield: Decimal::ZERO,
            target_protein: Decimal::ZERO,
            var_protein: Decimal::ZERO,
            n: Decimal::ZERO,
            p2o5: Decimal::ZERO,
            k2o: Decimal::ZERO,
            mgo: Decimal::ZERO,
            byproduct: None,
            byp_ratio: Decimal::ZERO,
            byp_n: Decimal::ZERO,
            byp_p2o5: Decimal::ZERO,
            byp_k2o: Decimal::ZERO,
            byp_mgo: Decimal::ZERO,
        }
    }
}

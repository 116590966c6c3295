use super::types::{DemandType, FieldType, NutrientType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parcel restricted to one planning year, the unit all cultivations,
/// fertilizations and modifiers hang off. `(parcel, sub_suffix, year)` is
/// unique per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: Option<i64>,
    pub parcel_id: i64,
    #[serde(default)]
    pub sub_suffix: i64,
    pub year: i32,
    pub area: Decimal,
    pub red_region: bool,
    pub field_type: FieldType,
    pub demand_p2o5: DemandType,
    pub demand_k2o: DemandType,
    pub demand_mgo: DemandType,
}

impl Field {
    pub fn new(parcel_id: i64, year: i32, area: Decimal, field_type: FieldType) -> Self {
        Self {
            id: None,
            parcel_id,
            sub_suffix: 0,
            year,
            area,
            red_region: false,
            field_type,
            demand_p2o5: DemandType::Removal,
            demand_k2o: DemandType::Removal,
            demand_mgo: DemandType::Removal,
        }
    }

    pub fn with_sub_suffix(mut self, sub_suffix: i64) -> Self {
        self.sub_suffix = sub_suffix;
        self
    }

    pub fn with_red_region(mut self, red_region: bool) -> Self {
        self.red_region = red_region;
        self
    }

    pub fn with_demand_options(
        mut self,
        p2o5: DemandType,
        k2o: DemandType,
        mgo: DemandType,
    ) -> Self {
        self.demand_p2o5 = p2o5;
        self.demand_k2o = k2o;
        self.demand_mgo = mgo;
        self
    }
}

/// A free-form per-field adjustment on one nutrient axis, in kg/ha.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    pub id: Option<i64>,
    pub field_id: i64,
    pub description: String,
    pub modification: NutrientType,
    pub amount: i64,
}

impl Modifier {
    /// Largest adjustment accepted on a single axis.
    pub const MAX_AMOUNT: i64 = 1000;

    pub fn new(field_id: i64, description: &str, modification: NutrientType, amount: i64) -> Self {
        Self {
            id: None,
            field_id,
            description: description.to_string(),
            modification,
            amount,
        }
    }
}

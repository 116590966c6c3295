use super::types::{HumusType, SoilType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A soil analysis of one parcel in one year; `(parcel, year)` is unique.
/// Measured values may be missing individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoilSample {
    pub id: Option<i64>,
    pub parcel_id: i64,
    pub year: i32,
    pub ph: Option<Decimal>,
    pub p2o5: Option<Decimal>,
    pub k2o: Option<Decimal>,
    pub mg: Option<Decimal>,
    pub soil_type: SoilType,
    pub humus: HumusType,
}

impl SoilSample {
    pub fn new(parcel_id: i64, year: i32, soil_type: SoilType, humus: HumusType) -> Self {
        Self {
            id: None,
            parcel_id,
            year,
            ph: None,
            p2o5: None,
            k2o: None,
            mg: None,
            soil_type,
            humus,
        }
    }

    pub fn with_values(
        mut self,
        ph: Option<Decimal>,
        p2o5: Option<Decimal>,
        k2o: Option<Decimal>,
        mg: Option<Decimal>,
    ) -> Self {
        self.ph = ph;
        self.p2o5 = p2o5;
        self.k2o = k2o;
        self.mg = mg;
        self
    }
}

use super::types::{FertClass, FertType, UnitType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fertilizer descriptor with nutrient contents per unit. Organic
/// fertilizers are unique per `(owner, name, year)`; mineral fertilizers
/// per `(owner, name)` with the year ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fertilizer {
    pub id: Option<i64>,
    pub user_id: i64,
    pub name: String,
    pub year: i32,
    pub fert_class: FertClass,
    pub fert_type: FertType,
    pub unit: UnitType,
    pub price: Decimal,
    /// Whether the fertilizer is offered in selection lists.
    pub active: bool,
    pub n: Decimal,
    pub p2o5: Decimal,
    pub k2o: Decimal,
    pub mgo: Decimal,
    pub s: Decimal,
    pub cao: Decimal,
    pub nh4: Decimal,
}

impl Fertilizer {
    pub fn new(user_id: i64, name: &str, year: i32, fert_type: FertType) -> Self {
        Self {
            id: None,
            user_id,
            name: name.to_string(),
            year,
            fert_class: fert_type.fert_class(),
            fert_type,
            unit: UnitType::Dt,
            price: Decimal::ZERO,
            active: true,
            n: Decimal::ZERO,
            p2o5: Decimal::ZERO,
            k2o: Decimal::ZERO,
            mgo: Decimal::ZERO,
            s: Decimal::ZERO,
            cao: Decimal::ZERO,
            nh4: Decimal::ZERO,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_contents(
        mut self,
        n: Decimal,
        p2o5: Decimal,
        k2o: Decimal,
        mgo: Decimal,
        s: Decimal,
        cao: Decimal,
        nh4: Decimal,
    ) -> Self {
        self.n = n;
        self.p2o5 = p2o5;
        self.k2o = k2o;
        self.mgo = mgo;
        self.s = s;
        self.cao = cao;
        self.nh4 = nh4;
        self
    }
}

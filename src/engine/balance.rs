use crate::models::NutrientType;
use rust_decimal::Decimal;
use serde::Serialize;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

/// Named nutrient 7-tuple with componentwise algebra. Balances are value
/// objects; arithmetic keeps the title of the left operand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Balance {
    pub title: String,
    pub n: Decimal,
    pub p2o5: Decimal,
    pub k2o: Decimal,
    pub mgo: Decimal,
    pub s: Decimal,
    pub cao: Decimal,
    pub nh4: Decimal,
}

impl Balance {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with(
        title: impl Into<String>,
        n: Decimal,
        p2o5: Decimal,
        k2o: Decimal,
        mgo: Decimal,
        s: Decimal,
        cao: Decimal,
        nh4: Decimal,
    ) -> Self {
        Self {
            title: title.into(),
            n,
            p2o5,
            k2o,
            mgo,
            s,
            cao,
            nh4,
        }
    }

    /// A balance with exactly one nutrient set, used for per-field
    /// modifiers.
    pub fn modifier(name: impl Into<String>, nutrient: NutrientType, amount: Decimal) -> Self {
        let mut balance = Balance::new(name);
        balance.set(nutrient, amount);
        balance
    }

    pub fn get(&self, nutrient: NutrientType) -> Decimal {
        match nutrient {
            NutrientType::N => self.n,
            NutrientType::P2o5 => self.p2o5,
            NutrientType::K2o => self.k2o,
            NutrientType::Mgo => self.mgo,
            NutrientType::S => self.s,
            NutrientType::Cao => self.cao,
            NutrientType::Nh4 => self.nh4,
        }
    }

    pub fn set(&mut self, nutrient: NutrientType, value: Decimal) {
        match nutrient {
            NutrientType::N => self.n = value,
            NutrientType::P2o5 => self.p2o5 = value,
            NutrientType::K2o => self.k2o = value,
            NutrientType::Mgo => self.mgo = value,
            NutrientType::S => self.s = value,
            NutrientType::Cao => self.cao = value,
            NutrientType::Nh4 => self.nh4 = value,
        }
    }

    /// In-place componentwise addition, keeping the title.
    pub fn add(&mut self, other: &Balance) {
        self.n += other.n;
        self.p2o5 += other.p2o5;
        self.k2o += other.k2o;
        self.mgo += other.mgo;
        self.s += other.s;
        self.cao += other.cao;
        self.nh4 += other.nh4;
    }

    pub fn is_empty(&self) -> bool {
        self.n + self.p2o5 + self.k2o + self.mgo + self.s + self.cao + self.nh4 == Decimal::ZERO
    }
}

impl Add for Balance {
    type Output = Balance;

    fn add(self, other: Balance) -> Balance {
        Balance {
            title: self.title,
            n: self.n + other.n,
            p2o5: self.p2o5 + other.p2o5,
            k2o: self.k2o + other.k2o,
            mgo: self.mgo + other.mgo,
            s: self.s + other.s,
            cao: self.cao + other.cao,
            nh4: self.nh4 + other.nh4,
        }
    }
}

impl Sub for Balance {
    type Output = Balance;

    fn sub(self, other: Balance) -> Balance {
        Balance {
            title: self.title,
            n: self.n - other.n,
            p2o5: self.p2o5 - other.p2o5,
            k2o: self.k2o - other.k2o,
            mgo: self.mgo - other.mgo,
            s: self.s - other.s,
            cao: self.cao - other.cao,
            nh4: self.nh4 - other.nh4,
        }
    }
}

impl Add<Decimal> for Balance {
    type Output = Balance;

    /// Uniform offset on all seven nutrients.
    fn add(self, offset: Decimal) -> Balance {
        Balance {
            title: self.title,
            n: self.n + offset,
            p2o5: self.p2o5 + offset,
            k2o: self.k2o + offset,
            mgo: self.mgo + offset,
            s: self.s + offset,
            cao: self.cao + offset,
            nh4: self.nh4 + offset,
        }
    }
}

impl Sub<Decimal> for Balance {
    type Output = Balance;

    fn sub(self, offset: Decimal) -> Balance {
        self + (-offset)
    }
}

impl Mul<Decimal> for Balance {
    type Output = Balance;

    fn mul(self, factor: Decimal) -> Balance {
        Balance {
            title: self.title,
            n: self.n * factor,
            p2o5: self.p2o5 * factor,
            k2o: self.k2o * factor,
            mgo: self.mgo * factor,
            s: self.s * factor,
            cao: self.cao * factor,
            nh4: self.nh4 * factor,
        }
    }
}

impl Sum for Balance {
    fn sum<I: Iterator<Item = Balance>>(iter: I) -> Balance {
        iter.fold(Balance::default(), |mut acc, balance| {
            if acc.title.is_empty() {
                acc.title = balance.title.clone();
            }
            Balance::add(&mut acc, &balance);
            acc
        })
    }
}

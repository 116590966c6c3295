use super::types::{CutTiming, MeasureType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One application event: a fertilizer applied to a cultivation under a
/// measure. Mineral measures are unique per cultivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fertilization {
    pub id: Option<i64>,
    pub field_id: i64,
    pub cultivation_id: i64,
    pub fertilizer_id: i64,
    pub measure: MeasureType,
    /// Amount per ha in the fertilizer's unit.
    pub amount: Decimal,
    pub month: Option<u32>,
    pub cut_timing: Option<CutTiming>,
}

impl Fertilization {
    pub fn new(
        field_id: i64,
        cultivation_id: i64,
        fertilizer_id: i64,
        measure: MeasureType,
        amount: Decimal,
    ) -> Self {
        Self {
            id: None,
            field_id,
            cultivation_id,
            fertilizer_id,
            measure,
            amount,
            month: None,
            cut_timing: None,
        }
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_cut_timing(mut self, cut_timing: CutTiming) -> Self {
        self.cut_timing = Some(cut_timing);
        self
    }
}

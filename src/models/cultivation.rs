use super::types::{CultivationType, LegumeType, ResidueType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A crop grown on a field in one rotation role; `(field,
/// cultivation_type)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cultivation {
    pub id: Option<i64>,
    pub field_id: i64,
    pub cultivation_type: CultivationType,
    pub crop_id: i64,
    /// Estimated yield in dt/ha.
    pub crop_yield: Decimal,
    /// Estimated protein in %; falls back to the crop's target protein.
    pub crop_protein: Option<Decimal>,
    pub residues: ResidueType,
    pub legume_rate: LegumeType,
    /// Measured mineral nitrogen per depth layer, kg/ha.
    pub nmin_30: i64,
    pub nmin_60: i64,
    pub nmin_90: i64,
}

impl Cultivation {
    pub fn new(
        field_id: i64,
        cultivation_type: CultivationType,
        crop_id: i64,
        crop_yield: Decimal,
    ) -> Self {
        Self {
            id: None,
            field_id,
            cultivation_type,
            crop_id,
            crop_yield,
            crop_protein: None,
            residues: ResidueType::None,
            legume_rate: LegumeType::None,
            nmin_30: 0,
            nmin_60: 0,
            nmin_90: 0,
        }
    }

    pub fn with_residues(mut self, residues: ResidueType) -> Self {
        self.residues = residues;
        self
    }

    pub fn with_legume_rate(mut self, legume_rate: LegumeType) -> Self {
        self.legume_rate = legume_rate;
        self
    }

    pub fn with_nmin(mut self, nmin_30: i64, nmin_60: i64, nmin_90: i64) -> Self {
        self.nmin_30 = nmin_30;
        self.nmin_60 = nmin_60;
        self.nmin_90 = nmin_90;
        self
    }
}

//! Read-only guideline tables: nutrient-class thresholds, reduction
//! tables, preceding-crop effects, legume deliveries, sulfur demand and
//! organic effectiveness factors.
//!
//! Tables are plain JSON files under a `guidelines/` directory, one file
//! per table, keyed by enum member names. They are loaded once per
//! process and shared immutably; a missing key never fails a
//! calculation, it contributes zero (logged at `warn`).

use crate::error::{FertiplanError, Result};
use crate::models::{CropType, FertType, FieldType, HumusType, LegumeType, ResidueType, SoilType};
use crate::utils::load_json;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Ascending measured-value thresholds with the signed reduction for
/// each band, ready to be added to a balance.
#[derive(Debug, Clone, Deserialize)]
pub struct ReductionTable {
    pub values: Vec<Decimal>,
    pub reductions: Vec<Decimal>,
}

/// Lime requirement per pH step, in dt CaO/ha for a four-year window.
#[derive(Debug, Clone, Deserialize)]
pub struct CaoTable {
    pub ph_values: Vec<Decimal>,
    pub requirement: HashMap<SoilType, HashMap<HumusType, Vec<Decimal>>>,
}

impl CaoTable {
    pub fn requirement_for(&self, soil_type: SoilType, humus: HumusType) -> Option<&[Decimal]> {
        self.requirement
            .get(&soil_type)
            .and_then(|by_humus| by_humus.get(&humus))
            .map(|v| v.as_slice())
    }
}

/// Effectiveness factors of an organic fertilizer type.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgFactor {
    pub storage_loss: Decimal,
    pub cropland_factor: Decimal,
    pub grassland_factor: Decimal,
    pub lime_factor: Decimal,
}

/// Preceding-crop effect: flat per crop type, by residue handling for
/// catch-crop types.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PreCropEffect {
    Flat(Decimal),
    ByResidue(HashMap<ResidueType, Decimal>),
}

/// Legume nitrogen delivery: flat per crop group, by legume share for
/// permanent grassland.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LegumeDelivery {
    Flat(Decimal),
    ByRate(HashMap<LegumeType, Decimal>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SulfurLimits {
    pub demand: Vec<Decimal>,
    pub n_total: Vec<Decimal>,
}

/// Sulfur reduction bands: a base row per humus type and an extra row
/// per total-N band, both indexed by the crop's S-demand band.
#[derive(Debug, Clone, Deserialize)]
pub struct SulfurTable {
    pub limits: SulfurLimits,
    pub humus: HashMap<HumusType, Vec<Decimal>>,
    pub n_total: HashMap<String, Vec<Decimal>>,
}

/// Baseline nutrient delivery of the soil itself.
#[derive(Debug, Clone, Deserialize)]
pub struct SoilReserve {
    pub n: Decimal,
}

type NestedTable<T> = HashMap<FieldType, HashMap<SoilType, HashMap<HumusType, T>>>;

/// Every guideline table, loaded once and shared immutably.
#[derive(Debug, Clone)]
pub struct Guidelines {
    p2o5_reductions: HashMap<FieldType, ReductionTable>,
    k2o_reductions: NestedTable<ReductionTable>,
    mg_reductions: NestedTable<ReductionTable>,
    cao_reductions: HashMap<FieldType, CaoTable>,
    s_reductions: SulfurTable,
    soil_reductions: HashMap<FieldType, SoilReserve>,
    p2o5_classes: HashMap<FieldType, Vec<Decimal>>,
    k2o_classes: NestedTable<Vec<Decimal>>,
    mg_classes: NestedTable<Vec<Decimal>>,
    ph_classes: NestedTable<Vec<Decimal>>,
    org_factor: HashMap<FertType, OrgFactor>,
    pre_crop_effect: HashMap<CropType, PreCropEffect>,
    legume_delivery: HashMap<CropType, LegumeDelivery>,
    sulfur_needs: HashMap<String, Decimal>,
}

impl Guidelines {
    /// Load every table from `dir`, one JSON file per table.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            p2o5_reductions: table(dir, "p2o5_reductions")?,
            k2o_reductions: table(dir, "k2o_reductions")?,
            mg_reductions: table(dir, "mg_reductions")?,
            cao_reductions: table(dir, "cao_reductions")?,
            s_reductions: table(dir, "s_reductions")?,
            soil_reductions: table(dir, "soil_reductions")?,
            p2o5_classes: table(dir, "p2o5_classes")?,
            k2o_classes: table(dir, "k2o_classes")?,
            mg_classes: table(dir, "mg_classes")?,
            ph_classes: table(dir, "ph_classes")?,
            org_factor: table(dir, "org_factor")?,
            pre_crop_effect: table(dir, "pre_crop_effect")?,
            legume_delivery: table(dir, "legume_delivery")?,
            sulfur_needs: table(dir, "sulfur_needs")?,
        })
    }

    pub fn p2o5_reductions(&self, field_type: FieldType) -> Option<&ReductionTable> {
        self.p2o5_reductions.get(&field_type)
    }

    pub fn k2o_reductions(
        &self,
        field_type: FieldType,
        soil_type: SoilType,
        humus: HumusType,
    ) -> Option<&ReductionTable> {
        nested(&self.k2o_reductions, field_type, soil_type, humus)
    }

    pub fn mg_reductions(
        &self,
        field_type: FieldType,
        soil_type: SoilType,
        humus: HumusType,
    ) -> Option<&ReductionTable> {
        nested(&self.mg_reductions, field_type, soil_type, humus)
    }

    pub fn cao_reductions(&self, field_type: FieldType) -> Option<&CaoTable> {
        self.cao_reductions.get(&field_type)
    }

    pub fn s_reductions(&self) -> &SulfurTable {
        &self.s_reductions
    }

    /// Baseline N reduction from the soil reserve; grassland delivers
    /// 10 kg N/ha, cropland none.
    pub fn soil_reduction_n(&self, field_type: FieldType) -> Decimal {
        match self.soil_reductions.get(&field_type) {
            Some(reserve) => reserve.n,
            None => {
                warn!(field_type = %field_type, "no soil reserve entry, using zero");
                Decimal::ZERO
            }
        }
    }

    pub fn p2o5_classes(&self, field_type: FieldType) -> Option<&[Decimal]> {
        self.p2o5_classes.get(&field_type).map(|v| v.as_slice())
    }

    pub fn k2o_classes(
        &self,
        field_type: FieldType,
        soil_type: SoilType,
        humus: HumusType,
    ) -> Option<&[Decimal]> {
        nested(&self.k2o_classes, field_type, soil_type, humus).map(|v| v.as_slice())
    }

    pub fn mg_classes(
        &self,
        field_type: FieldType,
        soil_type: SoilType,
        humus: HumusType,
    ) -> Option<&[Decimal]> {
        nested(&self.mg_classes, field_type, soil_type, humus).map(|v| v.as_slice())
    }

    pub fn ph_classes(
        &self,
        field_type: FieldType,
        soil_type: SoilType,
        humus: HumusType,
    ) -> Option<&[Decimal]> {
        nested(&self.ph_classes, field_type, soil_type, humus).map(|v| v.as_slice())
    }

    pub fn org_factor(&self, fert_type: FertType) -> Option<&OrgFactor> {
        let factor = self.org_factor.get(&fert_type);
        if factor.is_none() {
            warn!(fert_type = ?fert_type, "no effectiveness factors for fertilizer type");
        }
        factor
    }

    /// Preceding-crop N effect of a main or second crop.
    pub fn pre_crop_effect(&self, crop_type: CropType) -> Decimal {
        match self.pre_crop_effect.get(&crop_type) {
            Some(PreCropEffect::Flat(value)) => *value,
            Some(PreCropEffect::ByResidue(_)) => {
                warn!(crop_type = ?crop_type, "residue-keyed effect used without residues");
                Decimal::ZERO
            }
            None => {
                warn!(crop_type = ?crop_type, "no preceding-crop effect entry, using zero");
                Decimal::ZERO
            }
        }
    }

    /// Preceding-crop N effect of a catch crop, keyed by its residue
    /// handling.
    pub fn catch_crop_effect(&self, crop_type: CropType, residues: ResidueType) -> Decimal {
        match self.pre_crop_effect.get(&crop_type) {
            Some(PreCropEffect::ByResidue(by_residue)) => {
                by_residue.get(&residues).copied().unwrap_or_else(|| {
                    warn!(crop_type = ?crop_type, residues = ?residues, "no catch-crop effect entry");
                    Decimal::ZERO
                })
            }
            Some(PreCropEffect::Flat(value)) => *value,
            None => {
                warn!(crop_type = ?crop_type, "no preceding-crop effect entry, using zero");
                Decimal::ZERO
            }
        }
    }

    pub fn legume_delivery(&self, crop_type: CropType) -> Option<&LegumeDelivery> {
        self.legume_delivery.get(&crop_type)
    }

    /// Sulfur demand of a crop by name, zero when the crop is not listed.
    pub fn sulfur_need(&self, crop_name: &str) -> Decimal {
        self.sulfur_needs.get(crop_name).copied().unwrap_or_default()
    }
}

fn table<T: serde::de::DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(format!("{name}.json"));
    info!(table = name, "caching guideline table");
    load_json(&path).map_err(|e| {
        FertiplanError::Guidelines(format!("{}: {e}", path.display()))
    })
}

fn nested<T>(
    table: &NestedTable<T>,
    field_type: FieldType,
    soil_type: SoilType,
    humus: HumusType,
) -> Option<&T> {
    table
        .get(&field_type)
        .and_then(|by_soil| by_soil.get(&soil_type))
        .and_then(|by_humus| by_humus.get(&humus))
}

static SHARED: OnceLock<Arc<Guidelines>> = OnceLock::new();

/// Process-wide guideline cache. The first successful load wins; later
/// calls return the cached tables regardless of `dir`.
pub fn shared(dir: &Path) -> Result<Arc<Guidelines>> {
    if let Some(guidelines) = SHARED.get() {
        return Ok(guidelines.clone());
    }
    let guidelines = Arc::new(Guidelines::load(dir)?);
    Ok(SHARED.get_or_init(|| guidelines).clone())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn decs(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|v| dec(v)).collect()
    }

    fn reduction_table(values: &[&str], reductions: &[&str]) -> ReductionTable {
        ReductionTable {
            values: decs(values),
            reductions: decs(reductions),
        }
    }

    fn sand_less4<T>(value: T) -> HashMap<SoilType, HashMap<HumusType, T>> {
        HashMap::from([(
            SoilType::Sand,
            HashMap::from([(HumusType::Less4, value)]),
        )])
    }

    /// Compact fixture covering cropland and grassland on sand with
    /// low humus, with the values the engine tests assert against.
    pub(crate) fn test_guidelines() -> Arc<Guidelines> {
        let p2o5_reduction = reduction_table(
            &["0", "3", "5", "9", "16"],
            &["-20", "-10", "0", "20", "40"],
        );
        let k2o_reduction = reduction_table(
            &["0", "4", "8", "13", "20"],
            &["-30", "-15", "0", "25", "50"],
        );
        let mg_reduction = reduction_table(
            &["0", "3", "5", "9", "14"],
            &["-15", "-10", "0", "10", "20"],
        );
        let cao_table = CaoTable {
            ph_values: decs(&["4.0", "4.5", "5.0", "5.5", "6.0", "6.5", "7.0"]),
            requirement: sand_less4(decs(&["60", "45", "30", "18", "8", "0", "0"])),
        };

        Arc::new(Guidelines {
            p2o5_reductions: HashMap::from([
                (FieldType::Cropland, p2o5_reduction.clone()),
                (FieldType::Grassland, p2o5_reduction),
            ]),
            k2o_reductions: HashMap::from([
                (FieldType::Cropland, sand_less4(k2o_reduction.clone())),
                (FieldType::Grassland, sand_less4(k2o_reduction)),
            ]),
            mg_reductions: HashMap::from([
                (FieldType::Cropland, sand_less4(mg_reduction.clone())),
                (FieldType::Grassland, sand_less4(mg_reduction)),
            ]),
            cao_reductions: HashMap::from([
                (FieldType::Cropland, cao_table.clone()),
                (FieldType::Grassland, cao_table),
            ]),
            s_reductions: SulfurTable {
                limits: SulfurLimits {
                    demand: decs(&["0", "20", "30"]),
                    n_total: decs(&["0", "40", "80", "120", "160"]),
                },
                humus: HashMap::from([
                    (HumusType::Less4, decs(&["0", "5", "10"])),
                    (HumusType::Less15, decs(&["0", "10", "20"])),
                ]),
                n_total: HashMap::from([
                    ("0".to_string(), decs(&["0", "0", "0"])),
                    ("40".to_string(), decs(&["0", "5", "5"])),
                    ("80".to_string(), decs(&["5", "10", "10"])),
                    ("120".to_string(), decs(&["5", "10", "15"])),
                    ("160".to_string(), decs(&["10", "15", "20"])),
                ]),
            },
            soil_reductions: HashMap::from([
                (FieldType::Grassland, SoilReserve { n: dec("10") }),
                (FieldType::Cropland, SoilReserve { n: dec("0") }),
            ]),
            p2o5_classes: HashMap::from([
                (FieldType::Cropland, decs(&["0", "3", "5", "9", "16"])),
                (FieldType::Grassland, decs(&["0", "2", "4", "8", "14"])),
            ]),
            k2o_classes: HashMap::from([
                (FieldType::Cropland, sand_less4(decs(&["0", "4", "8", "13", "20"]))),
                (FieldType::Grassland, sand_less4(decs(&["0", "4", "8", "13", "20"]))),
            ]),
            mg_classes: HashMap::from([
                (FieldType::Cropland, sand_less4(decs(&["0", "3", "5", "9", "14"]))),
                (FieldType::Grassland, sand_less4(decs(&["0", "3", "5", "9", "14"]))),
            ]),
            ph_classes: HashMap::from([
                (
                    FieldType::Cropland,
                    sand_less4(decs(&["4.0", "4.8", "5.4", "6.0", "6.6"])),
                ),
                (
                    FieldType::Grassland,
                    sand_less4(decs(&["4.0", "4.6", "5.1", "5.7", "6.3"])),
                ),
            ]),
            org_factor: HashMap::from([
                (
                    FertType::OrgDigestate,
                    OrgFactor {
                        storage_loss: dec("0.5"),
                        cropland_factor: dec("0.6"),
                        grassland_factor: dec("0.5"),
                        lime_factor: dec("1.0"),
                    },
                ),
                (
                    FertType::OrgManure,
                    OrgFactor {
                        storage_loss: dec("0.3"),
                        cropland_factor: dec("0.5"),
                        grassland_factor: dec("0.45"),
                        lime_factor: dec("1.2"),
                    },
                ),
            ]),
            pre_crop_effect: HashMap::from([
                (CropType::FieldGrass, PreCropEffect::Flat(dec("10"))),
                (CropType::Grain, PreCropEffect::Flat(dec("0"))),
                (CropType::Canola, PreCropEffect::Flat(dec("10"))),
                (CropType::SugarBeets, PreCropEffect::Flat(dec("10"))),
                (
                    CropType::CatchLegume,
                    PreCropEffect::ByResidue(HashMap::from([
                        (ResidueType::CatchFrozen, dec("10")),
                        (ResidueType::CatchNotFrozenFall, dec("10")),
                        (ResidueType::CatchNotFrozenSpring, dec("40")),
                        (ResidueType::CatchUsed, dec("10")),
                    ])),
                ),
                (
                    CropType::CatchNonLegume,
                    PreCropEffect::ByResidue(HashMap::from([
                        (ResidueType::CatchFrozen, dec("0")),
                        (ResidueType::CatchNotFrozenFall, dec("0")),
                        (ResidueType::CatchNotFrozenSpring, dec("10")),
                        (ResidueType::CatchUsed, dec("0")),
                    ])),
                ),
            ]),
            legume_delivery: HashMap::from([
                (
                    CropType::PermanentGrassland,
                    LegumeDelivery::ByRate(HashMap::from([
                        (LegumeType::GrassLess5, dec("10")),
                        (LegumeType::GrassLess10, dec("20")),
                        (LegumeType::GrassLess20, dec("40")),
                        (LegumeType::GrassGreater20, dec("60")),
                    ])),
                ),
                (CropType::AlfalfaGrass, LegumeDelivery::Flat(dec("30"))),
                (CropType::CloverGrass, LegumeDelivery::Flat(dec("20"))),
                (CropType::Alfalfa, LegumeDelivery::Flat(dec("360"))),
                (CropType::Clover, LegumeDelivery::Flat(dec("310"))),
            ]),
            sulfur_needs: HashMap::from([
                ("Ackergras 3 Schnitte".to_string(), dec("20")),
                ("W.-Raps".to_string(), dec("40")),
            ]),
        })
    }
}

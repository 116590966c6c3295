use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Usage class of a field in one planning year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Grassland,
    Cropland,
    ExchangedLand,
    FallowGrassland,
    FallowCropland,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Grassland => "Grassland",
            FieldType::Cropland => "Cropland",
            FieldType::ExchangedLand => "Exchanged land",
            FieldType::FallowGrassland => "Fallow grassland",
            FieldType::FallowCropland => "Fallow cropland",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "grassland" => Some(FieldType::Grassland),
            "cropland" => Some(FieldType::Cropland),
            "exchanged_land" => Some(FieldType::ExchangedLand),
            "fallow_grassland" => Some(FieldType::FallowGrassland),
            "fallow_cropland" => Some(FieldType::FallowCropland),
            _ => None,
        }
    }

    /// Field types that take part in demand/reduction calculations.
    pub fn is_productive(&self) -> bool {
        matches!(self, FieldType::Grassland | FieldType::Cropland)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Soil composition of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Sand,
    LightLoamySand,
    StrongLoamySand,
    SandyToSiltyLoam,
    ClayeyLoamToClay,
    Moor,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sand => "Sand",
            SoilType::LightLoamySand => "Light loamy sand",
            SoilType::StrongLoamySand => "Strong loamy sand",
            SoilType::SandyToSiltyLoam => "Sandy to silty loam",
            SoilType::ClayeyLoamToClay => "Clayey loam to clay",
            SoilType::Moor => "Moor",
        }
    }

    pub fn all() -> &'static [SoilType] {
        &[
            SoilType::Sand,
            SoilType::LightLoamySand,
            SoilType::StrongLoamySand,
            SoilType::SandyToSiltyLoam,
            SoilType::ClayeyLoamToClay,
            SoilType::Moor,
        ]
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Humus content band of a soil sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HumusType {
    #[serde(rename = "less_4")]
    Less4,
    #[serde(rename = "less_8")]
    Less8,
    #[serde(rename = "less_15")]
    Less15,
    #[serde(rename = "less_30")]
    Less30,
    #[serde(rename = "more_30")]
    More30,
}

impl HumusType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HumusType::Less4 => "< 4%",
            HumusType::Less8 => "4% to < 8%",
            HumusType::Less15 => "8% to < 15%",
            HumusType::Less30 => "15% to < 30%",
            HumusType::More30 => ">= 30%",
        }
    }

    pub fn all() -> &'static [HumusType] {
        &[
            HumusType::Less4,
            HumusType::Less8,
            HumusType::Less15,
            HumusType::Less30,
            HumusType::More30,
        ]
    }
}

impl std::fmt::Display for HumusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Agronomic crop group, the key for the preceding-crop effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropType {
    // main crops
    RotatingFallowWithLegume,
    RotatingFallow,
    PermanentFallow,
    PermanentGrassland,
    Alfalfa,
    AlfalfaGrass,
    Clover,
    CloverGrass,
    SugarBeets,
    Canola,
    LegumeGrain,
    Cabbage,
    FieldGrass,
    Grain,
    Corn,
    Potato,
    Vegetable,
    // catch crops
    CatchNonLegume,
    CatchLegume,
    CatchOther,
}

impl CropType {
    pub fn is_catch_crop(&self) -> bool {
        matches!(
            self,
            CropType::CatchNonLegume | CropType::CatchLegume | CropType::CatchOther
        )
    }
}

/// Storage-level crop classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropClass {
    MainCrop,
    SecondCrop,
    CatchCrop,
}

impl From<CultivationType> for CropClass {
    fn from(cultivation_type: CultivationType) -> Self {
        match cultivation_type {
            CultivationType::MainCrop | CultivationType::SecondMainCrop => CropClass::MainCrop,
            CultivationType::SecondCrop => CropClass::SecondCrop,
            CultivationType::CatchCrop => CropClass::CatchCrop,
        }
    }
}

/// Role of a cultivation in the crop rotation of one field-year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CultivationType {
    MainCrop,
    SecondMainCrop,
    SecondCrop,
    CatchCrop,
}

impl CultivationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CultivationType::MainCrop => "Main crop",
            CultivationType::SecondMainCrop => "Second main crop",
            CultivationType::SecondCrop => "Second crop",
            CultivationType::CatchCrop => "Catch crop",
        }
    }

    pub fn all() -> &'static [CultivationType] {
        &[
            CultivationType::MainCrop,
            CultivationType::SecondMainCrop,
            CultivationType::SecondCrop,
            CultivationType::CatchCrop,
        ]
    }

    pub fn is_main(&self) -> bool {
        matches!(
            self,
            CultivationType::MainCrop | CultivationType::SecondMainCrop
        )
    }
}

impl std::fmt::Display for CultivationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cut timing for mowable crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutTiming {
    FirstCut,
    SecondCut,
    ThirdCut,
    FourthCut,
    NonMowable,
}

/// Residue handling of a cultivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidueType {
    // main crops
    MainStayed,
    MainRemoved,
    MainNoResidues,
    // catch crops
    CatchFrozen,
    CatchNotFrozenFall,
    CatchNotFrozenSpring,
    CatchUsed,
    None,
}

impl ResidueType {
    /// Residue choices that are valid for the given cultivation role.
    pub fn for_cultivation(cultivation_type: CultivationType) -> &'static [ResidueType] {
        match cultivation_type {
            CultivationType::MainCrop | CultivationType::SecondMainCrop => &[
                ResidueType::MainStayed,
                ResidueType::MainRemoved,
                ResidueType::MainNoResidues,
                ResidueType::None,
            ],
            CultivationType::CatchCrop => &[
                ResidueType::CatchFrozen,
                ResidueType::CatchNotFrozenFall,
                ResidueType::CatchNotFrozenSpring,
                ResidueType::CatchUsed,
                ResidueType::None,
            ],
            CultivationType::SecondCrop => &[
                ResidueType::MainStayed,
                ResidueType::MainRemoved,
                ResidueType::MainNoResidues,
                ResidueType::CatchFrozen,
                ResidueType::CatchNotFrozenFall,
                ResidueType::CatchNotFrozenSpring,
                ResidueType::CatchUsed,
                ResidueType::None,
            ],
        }
    }
}

/// Share of legumes in a cultivated crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegumeType {
    // grassland
    #[serde(rename = "grass_less_5")]
    GrassLess5,
    #[serde(rename = "grass_less_10")]
    GrassLess10,
    #[serde(rename = "grass_less_20")]
    GrassLess20,
    #[serde(rename = "grass_greater_20")]
    GrassGreater20,
    // cropland
    #[serde(rename = "main_crop_0")]
    MainCrop0,
    #[serde(rename = "main_crop_10")]
    MainCrop10,
    #[serde(rename = "main_crop_20")]
    MainCrop20,
    #[serde(rename = "main_crop_30")]
    MainCrop30,
    #[serde(rename = "main_crop_40")]
    MainCrop40,
    #[serde(rename = "main_crop_50")]
    MainCrop50,
    #[serde(rename = "main_crop_60")]
    MainCrop60,
    #[serde(rename = "main_crop_70")]
    MainCrop70,
    #[serde(rename = "main_crop_80")]
    MainCrop80,
    #[serde(rename = "main_crop_90")]
    MainCrop90,
    #[serde(rename = "main_crop_100")]
    MainCrop100,
    // catch crops
    #[serde(rename = "catch_25")]
    Catch25,
    #[serde(rename = "catch_50")]
    Catch50,
    #[serde(rename = "catch_75")]
    Catch75,
    #[serde(rename = "none")]
    None,
}

impl LegumeType {
    /// Legume-share choices that are valid for the given cultivation role.
    pub fn for_cultivation(cultivation_type: CultivationType) -> &'static [LegumeType] {
        match cultivation_type {
            CultivationType::MainCrop | CultivationType::SecondMainCrop => &[
                LegumeType::GrassLess5,
                LegumeType::GrassLess10,
                LegumeType::GrassLess20,
                LegumeType::GrassGreater20,
                LegumeType::MainCrop0,
                LegumeType::MainCrop10,
                LegumeType::MainCrop20,
                LegumeType::MainCrop30,
                LegumeType::MainCrop40,
                LegumeType::MainCrop50,
                LegumeType::MainCrop60,
                LegumeType::MainCrop70,
                LegumeType::MainCrop80,
                LegumeType::MainCrop90,
                LegumeType::MainCrop100,
                LegumeType::None,
            ],
            CultivationType::CatchCrop => &[
                LegumeType::Catch25,
                LegumeType::Catch50,
                LegumeType::Catch75,
                LegumeType::None,
            ],
            CultivationType::SecondCrop => LegumeType::all(),
        }
    }

    pub fn all() -> &'static [LegumeType] {
        &[
            LegumeType::GrassLess5,
            LegumeType::GrassLess10,
            LegumeType::GrassLess20,
            LegumeType::GrassGreater20,
            LegumeType::MainCrop0,
            LegumeType::MainCrop10,
            LegumeType::MainCrop20,
            LegumeType::MainCrop30,
            LegumeType::MainCrop40,
            LegumeType::MainCrop50,
            LegumeType::MainCrop60,
            LegumeType::MainCrop70,
            LegumeType::MainCrop80,
            LegumeType::MainCrop90,
            LegumeType::MainCrop100,
            LegumeType::Catch25,
            LegumeType::Catch50,
            LegumeType::Catch75,
            LegumeType::None,
        ]
    }

    /// Scaling factor for crops whose legume delivery grows linearly with
    /// the legume share: `main_crop_NN` maps to `NN / 10`.
    pub fn main_crop_rate(&self) -> Option<Decimal> {
        let share = match self {
            LegumeType::MainCrop0 => 0,
            LegumeType::MainCrop10 => 10,
            LegumeType::MainCrop20 => 20,
            LegumeType::MainCrop30 => 30,
            LegumeType::MainCrop40 => 40,
            LegumeType::MainCrop50 => 50,
            LegumeType::MainCrop60 => 60,
            LegumeType::MainCrop70 => 70,
            LegumeType::MainCrop80 => 80,
            LegumeType::MainCrop90 => 90,
            LegumeType::MainCrop100 => 100,
            _ => return Option::None,
        };
        Some(Decimal::from(share) / Decimal::TEN)
    }
}

/// Basic fertilizer classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertClass {
    Organic,
    Mineral,
}

/// Fertilizer subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FertType {
    // organic
    OrgDigestate,
    OrgSlurry,
    OrgManure,
    OrgDryManure,
    OrgCompost,
    // mineral
    K,
    N,
    #[serde(rename = "n_k")]
    NK,
    #[serde(rename = "n_p")]
    NP,
    #[serde(rename = "n_s")]
    NS,
    #[serde(rename = "n_p_k")]
    NPK,
    #[serde(rename = "n_p_k_s")]
    NPKS,
    P,
    #[serde(rename = "p_k")]
    PK,
    Lime,
    Misc,
    Auxiliary,
}

impl FertType {
    pub fn is_organic(&self) -> bool {
        matches!(
            self,
            FertType::OrgDigestate
                | FertType::OrgSlurry
                | FertType::OrgManure
                | FertType::OrgDryManure
                | FertType::OrgCompost
        )
    }

    pub fn is_mineral(&self) -> bool {
        !self.is_organic()
    }

    pub fn fert_class(&self) -> FertClass {
        if self.is_organic() {
            FertClass::Organic
        } else {
            FertClass::Mineral
        }
    }
}

/// Fertilization event type. The declaration order is the total order
/// used to sort fertilization lists: fall, spring, N doses, base doses,
/// liming, misc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureType {
    OrgFall,
    OrgSpring,
    FirstNFert,
    FirstFirstNFert,
    FirstSecondNFert,
    SecondNFert,
    ThirdNFert,
    FourthNFert,
    FirstBaseFert,
    SecondBaseFert,
    ThirdBaseFert,
    FourthBaseFert,
    LimeFert,
    MiscFert,
}

impl MeasureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureType::OrgFall => "Fall",
            MeasureType::OrgSpring => "Spring",
            MeasureType::FirstNFert => "1. N dose",
            MeasureType::FirstFirstNFert => "1.1 N dose",
            MeasureType::FirstSecondNFert => "1.2 N dose",
            MeasureType::SecondNFert => "2. N dose",
            MeasureType::ThirdNFert => "3. N dose",
            MeasureType::FourthNFert => "4. N dose",
            MeasureType::FirstBaseFert => "1. base dose",
            MeasureType::SecondBaseFert => "2. base dose",
            MeasureType::ThirdBaseFert => "3. base dose",
            MeasureType::FourthBaseFert => "4. base dose",
            MeasureType::LimeFert => "Liming",
            MeasureType::MiscFert => "Misc",
        }
    }

    pub fn all() -> &'static [MeasureType] {
        &[
            MeasureType::OrgFall,
            MeasureType::OrgSpring,
            MeasureType::FirstNFert,
            MeasureType::FirstFirstNFert,
            MeasureType::FirstSecondNFert,
            MeasureType::SecondNFert,
            MeasureType::ThirdNFert,
            MeasureType::FourthNFert,
            MeasureType::FirstBaseFert,
            MeasureType::SecondBaseFert,
            MeasureType::ThirdBaseFert,
            MeasureType::FourthBaseFert,
            MeasureType::LimeFert,
            MeasureType::MiscFert,
        ]
    }

    /// Organic measures can only be used with organic fertilizers and
    /// vice versa.
    pub fn is_organic(&self) -> bool {
        matches!(self, MeasureType::OrgFall | MeasureType::OrgSpring)
    }

    pub fn is_mineral(&self) -> bool {
        !self.is_organic()
    }

    /// Total-order comparator for fertilization lists.
    pub fn sorting(a: &MeasureType, b: &MeasureType) -> std::cmp::Ordering {
        a.cmp(b)
    }
}

impl std::fmt::Display for MeasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth down to which a crop takes up mineralized soil nitrogen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NminType {
    #[serde(rename = "nmin_0")]
    Nmin0,
    #[serde(rename = "nmin_30")]
    Nmin30,
    #[serde(rename = "nmin_60")]
    Nmin60,
    #[serde(rename = "nmin_90")]
    Nmin90,
}

impl NminType {
    pub fn from_depth(depth: u32) -> Option<Self> {
        match depth {
            0 => Some(NminType::Nmin0),
            30 => Some(NminType::Nmin30),
            60 => Some(NminType::Nmin60),
            90 => Some(NminType::Nmin90),
            _ => None,
        }
    }
}

/// Measurement unit of a fertilizer or crop amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Dt,
    To,
    Cbm,
}

/// Whether base-nutrient demand follows removal or soil demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandType {
    Removal,
    Demand,
}

/// The seven nutrient axes of a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientType {
    N,
    P2o5,
    K2o,
    Mgo,
    S,
    Cao,
    Nh4,
}

impl NutrientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientType::N => "N",
            NutrientType::P2o5 => "P2O5",
            NutrientType::K2o => "K2O",
            NutrientType::Mgo => "MgO",
            NutrientType::S => "S",
            NutrientType::Cao => "CaO",
            NutrientType::Nh4 => "NH4-N",
        }
    }
}

impl std::fmt::Display for NutrientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Nutrient saturation class of a soil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoilClass {
    A,
    B,
    C,
    D,
    E,
}

impl SoilClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilClass::A => "A",
            SoilClass::B => "B",
            SoilClass::C => "C",
            SoilClass::D => "D",
            SoilClass::E => "E",
        }
    }

    /// Class for a threshold-table index, clamped to `E`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => SoilClass::A,
            1 => SoilClass::B,
            2 => SoilClass::C,
            3 => SoilClass::D,
            _ => SoilClass::E,
        }
    }
}

impl std::fmt::Display for SoilClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_class_from_cultivation_type() {
        assert_eq!(
            CropClass::from(CultivationType::MainCrop),
            CropClass::MainCrop
        );
        assert_eq!(
            CropClass::from(CultivationType::SecondMainCrop),
            CropClass::MainCrop
        );
        assert_eq!(
            CropClass::from(CultivationType::SecondCrop),
            CropClass::SecondCrop
        );
        assert_eq!(
            CropClass::from(CultivationType::CatchCrop),
            CropClass::CatchCrop
        );
    }

    #[test]
    fn measure_sort_order_runs_fall_to_misc() {
        let mut measures = vec![
            MeasureType::MiscFert,
            MeasureType::FirstBaseFert,
            MeasureType::OrgSpring,
            MeasureType::SecondNFert,
            MeasureType::OrgFall,
            MeasureType::LimeFert,
        ];
        measures.sort_by(MeasureType::sorting);
        assert_eq!(
            measures,
            vec![
                MeasureType::OrgFall,
                MeasureType::OrgSpring,
                MeasureType::SecondNFert,
                MeasureType::FirstBaseFert,
                MeasureType::LimeFert,
                MeasureType::MiscFert,
            ]
        );
    }

    #[test]
    fn legume_main_crop_rate_scales_by_share() {
        assert_eq!(
            LegumeType::MainCrop50.main_crop_rate(),
            Some(Decimal::from(5))
        );
        assert_eq!(
            LegumeType::MainCrop0.main_crop_rate(),
            Some(Decimal::ZERO)
        );
        assert_eq!(LegumeType::GrassLess10.main_crop_rate(), None);
    }

    #[test]
    fn residue_groups_follow_cultivation_role() {
        assert!(ResidueType::for_cultivation(CultivationType::MainCrop)
            .contains(&ResidueType::MainRemoved));
        assert!(!ResidueType::for_cultivation(CultivationType::MainCrop)
            .contains(&ResidueType::CatchFrozen));
        assert!(ResidueType::for_cultivation(CultivationType::CatchCrop)
            .contains(&ResidueType::CatchNotFrozenSpring));
    }

    #[test]
    fn enum_names_serialize_canonically() {
        assert_eq!(
            serde_json::to_string(&FieldType::FallowCropland).unwrap(),
            "\"fallow_cropland\""
        );
        assert_eq!(
            serde_json::to_string(&HumusType::Less4).unwrap(),
            "\"less_4\""
        );
        assert_eq!(serde_json::to_string(&FertType::NPKS).unwrap(), "\"n_p_k_s\"");
        assert_eq!(
            serde_json::to_string(&MeasureType::FirstFirstNFert).unwrap(),
            "\"first_first_n_fert\""
        );
        assert_eq!(
            serde_json::to_string(&LegumeType::MainCrop40).unwrap(),
            "\"main_crop_40\""
        );
        assert_eq!(
            serde_json::to_string(&NutrientType::P2o5).unwrap(),
            "\"p2o5\""
        );
    }
}

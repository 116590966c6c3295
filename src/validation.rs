//! Validation contract for the form/UI collaborator: per entity type a
//! pure function checking a candidate against the store's current state.
//! Violations come back as per-field messages, never as panics; the
//! caller decides how to render them.

use crate::engine::{load_field, FallCheck};
use crate::guidelines::Guidelines;
use crate::models::{
    Crop, CropClass, Cultivation, FertClass, Fertilization, Fertilizer, Field, LegumeType,
    Modifier, Parcel, ResidueType, SoilSample,
};
use crate::store::PlanStore;
use crate::utils::round_to_nearest;
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Collected outcome of one validation run.
#[derive(Debug, Default)]
pub struct Validation {
    pub errors: Vec<FieldError>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn error_on(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// Two records are the same row when both carry the same id; a candidate
/// without id never matches (new entry).
fn same_row(candidate: Option<i64>, existing: Option<i64>) -> bool {
    candidate.is_some() && candidate == existing
}

pub fn validate_parcel<S: PlanStore + ?Sized>(store: &S, candidate: &Parcel) -> Validation {
    let mut validation = Validation::default();
    let duplicate = store.parcels_of(candidate.user_id).iter().any(|p| {
        p.prefix == candidate.prefix
            && p.suffix == candidate.suffix
            && !same_row(candidate.id, p.id)
    });
    if duplicate {
        let message = format!(
            "parcel with prefix {} and suffix {} already exists",
            candidate.prefix, candidate.suffix
        );
        validation.reject("prefix", message.clone());
        validation.reject("suffix", message);
    }
    validation
}

pub fn validate_field<S: PlanStore + ?Sized>(
    store: &S,
    user_id: i64,
    candidate: &Field,
) -> Validation {
    let mut validation = Validation::default();
    match store.parcel(candidate.parcel_id) {
        Some(parcel) if parcel.user_id != user_id => {
            validation.reject("parcel_id", "parcel belongs to another owner");
        }
        Some(_) => {}
        None => validation.reject("parcel_id", "unknown parcel"),
    }
    if candidate.area <= Decimal::ZERO {
        validation.reject("area", "area must be positive");
    }
    let duplicate = store
        .find_field(candidate.parcel_id, candidate.sub_suffix, candidate.year)
        .is_some_and(|existing| !same_row(candidate.id, existing.id));
    if duplicate {
        validation.reject(
            "year",
            format!("field in {} already exists", candidate.year),
        );
    }
    validation
}

pub fn validate_soil_sample<S: PlanStore + ?Sized>(
    store: &S,
    user_id: i64,
    candidate: &SoilSample,
) -> Validation {
    let mut validation = Validation::default();
    match store.parcel(candidate.parcel_id) {
        Some(parcel) if parcel.user_id != user_id => {
            validation.reject("parcel_id", "parcel belongs to another owner");
        }
        Some(_) => {}
        None => validation.reject("parcel_id", "unknown parcel"),
    }
    let duplicate = store.soil_samples_of(candidate.parcel_id).iter().any(|s| {
        s.year == candidate.year && !same_row(candidate.id, s.id)
    });
    if duplicate {
        validation.reject(
            "year",
            format!("soil sample for {} already exists", candidate.year),
        );
    }
    for (field, value) in [
        ("ph", candidate.ph),
        ("p2o5", candidate.p2o5),
        ("k2o", candidate.k2o),
        ("mg", candidate.mg),
    ] {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            validation.reject(field, "measured value cannot be negative");
        }
    }
    validation
}

pub fn validate_crop<S: PlanStore + ?Sized>(store: &S, candidate: &Crop) -> Validation {
    let mut validation = Validation::default();
    let duplicate = store
        .crops_of(candidate.user_id)
        .iter()
        .any(|c| c.name == candidate.name && !same_row(candidate.id, c.id));
    if duplicate {
        validation.reject("name", format!("{} already exists", candidate.name));
    }
    if candidate.target_yield < Decimal::ZERO {
        validation.reject("target_yield", "target yield cannot be negative");
    }
    validation
}

pub fn validate_cultivation<S: PlanStore + ?Sized>(
    store: &S,
    user_id: i64,
    candidate: &Cultivation,
) -> Validation {
    let mut validation = Validation::default();
    let field = store.field(candidate.field_id);
    match &field {
        Some(field) => match store.parcel(field.parcel_id) {
            Some(parcel) if parcel.user_id != user_id => {
                validation.reject("field_id", "field belongs to another owner");
            }
            Some(_) => {}
            None => validation.reject("field_id", "field has no parcel"),
        },
        None => validation.reject("field_id", "unknown field"),
    }
    match store.crop(candidate.crop_id) {
        Some(crop) => {
            if crop.user_id != user_id {
                validation.reject("crop_id", "crop belongs to another owner");
            }
            if crop.crop_class != CropClass::from(candidate.cultivation_type) {
                validation.reject(
                    "crop_id",
                    format!(
                        "{} cannot be grown as {}",
                        crop.name, candidate.cultivation_type
                    ),
                );
            }
        }
        None => validation.reject("crop_id", "unknown crop"),
    }
    let duplicate = store.cultivations_of(candidate.field_id).iter().any(|c| {
        c.cultivation_type == candidate.cultivation_type && !same_row(candidate.id, c.id)
    });
    if duplicate {
        validation.reject(
            "cultivation_type",
            format!("{} already exists", candidate.cultivation_type),
        );
    }
    if !ResidueType::for_cultivation(candidate.cultivation_type).contains(&candidate.residues) {
        validation.reject("residues", "residue handling not valid for this role");
    }
    if !LegumeType::for_cultivation(candidate.cultivation_type).contains(&candidate.legume_rate) {
        validation.reject("legume_rate", "legume share not valid for this role");
    }
    if candidate.crop_yield < Decimal::ZERO {
        validation.reject("crop_yield", "yield cannot be negative");
    }
    if candidate.nmin_30 < 0 || candidate.nmin_60 < 0 || candidate.nmin_90 < 0 {
        validation.reject("nmin", "Nmin values cannot be negative");
    }
    validation
}

pub fn validate_fertilizer<S: PlanStore + ?Sized>(store: &S, candidate: &Fertilizer) -> Validation {
    let mut validation = Validation::default();
    let duplicate = store.fertilizers_of(candidate.user_id).iter().any(|f| {
        f.name == candidate.name
            && (candidate.fert_class == FertClass::Mineral || f.year == candidate.year)
            && !same_row(candidate.id, f.id)
    });
    if duplicate {
        match candidate.fert_class {
            FertClass::Organic => {
                let message = format!(
                    "{} already exists in {}",
                    candidate.name, candidate.year
                );
                validation.reject("name", message.clone());
                validation.reject("year", message);
            }
            FertClass::Mineral => {
                validation.reject("name", format!("{} already exists", candidate.name));
            }
        }
    }
    if candidate.fert_type.fert_class() != candidate.fert_class {
        validation.reject("fert_type", "type does not match the fertilizer class");
    }
    if candidate.nh4 > candidate.n {
        validation.reject("nh4", "ammonium share exceeds total N");
    }
    validation
}

pub fn validate_modifier(candidate: &Modifier) -> Validation {
    let mut validation = Validation::default();
    if candidate.amount.abs() > Modifier::MAX_AMOUNT {
        validation.reject(
            "amount",
            format!("adjustment is limited to {} kg/ha", Modifier::MAX_AMOUNT),
        );
    }
    validation
}

/// Validate a new or edited fertilization, including the autumn
/// organic-fertilization limit. The check runs against the pre-mutation
/// view of the field; for an edit the stored amount makes the suggested
/// maximum additive.
pub fn validate_fertilization<S: PlanStore + ?Sized>(
    store: &S,
    guidelines: &Arc<Guidelines>,
    user_id: i64,
    candidate: &Fertilization,
) -> Validation {
    let mut validation = Validation::default();
    if candidate.amount <= Decimal::ZERO {
        validation.reject("amount", "amount must be positive");
    }

    let field = store.field(candidate.field_id);
    match &field {
        Some(field) => match store.parcel(field.parcel_id) {
            Some(parcel) if parcel.user_id != user_id => {
                validation.reject("field_id", "field belongs to another owner");
            }
            Some(_) => {}
            None => validation.reject("field_id", "field has no parcel"),
        },
        None => validation.reject("field_id", "unknown field"),
    }

    let cultivation = store.cultivation(candidate.cultivation_id);
    match &cultivation {
        Some(cultivation) if cultivation.field_id != candidate.field_id => {
            validation.reject("cultivation_id", "cultivation grows on another field");
        }
        Some(_) => {}
        None => validation.reject("cultivation_id", "unknown cultivation"),
    }

    let fertilizer = store.fertilizer(candidate.fertilizer_id);
    match &fertilizer {
        Some(fertilizer) => {
            if fertilizer.user_id != user_id {
                validation.reject("fertilizer_id", "fertilizer belongs to another owner");
            }
            if candidate.measure.is_organic() != (fertilizer.fert_class == FertClass::Organic) {
                validation.reject(
                    "measure",
                    format!(
                        "{} is not valid for a {:?} fertilizer",
                        candidate.measure, fertilizer.fert_class
                    ),
                );
            }
            if fertilizer.fert_class == FertClass::Mineral {
                let duplicate = store
                    .fertilizations_of(candidate.field_id)
                    .iter()
                    .any(|f| {
                        f.cultivation_id == candidate.cultivation_id
                            && f.measure == candidate.measure
                            && !same_row(candidate.id, f.id)
                    });
                if duplicate {
                    validation.reject(
                        "measure",
                        format!("{} for mineral fertilization already exists", candidate.measure),
                    );
                }
            }
        }
        None => validation.reject("fertilizer_id", "unknown fertilizer"),
    }

    if !validation.is_ok() {
        return validation;
    }

    // autumn limit, evaluated on the frozen pre-mutation snapshot
    let (Some(field), Some(cultivation), Some(fertilizer)) = (field, cultivation, fertilizer)
    else {
        return validation;
    };
    let prior_amount = candidate
        .id
        .and_then(|id| store.fertilization(id))
        .map(|stored| stored.amount);
    if let Some(snapshot) = load_field(
        store,
        guidelines,
        field.parcel_id,
        field.sub_suffix,
        field.year,
    ) {
        let engine_fertilizer =
            crate::engine::Fertilizer::new(&fertilizer, guidelines.clone());
        let check = snapshot.check_fall_fertilization(
            candidate.measure,
            &engine_fertilizer,
            candidate.amount,
            cultivation.cultivation_type,
            prior_amount,
        );
        if let FallCheck::Rejected { max_amount } = check {
            validation.reject(
                "amount",
                format!(
                    "exceeds the autumn organic fertilization limit, at most {} possible",
                    round_to_nearest(max_amount, 0)
                ),
            );
        }
    }
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guidelines::test_support::{dec, test_guidelines};
    use crate::models::{CropType, CultivationType, FertType, FieldType, MeasureType};
    use crate::store::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        field_id: i64,
        cultivation_id: i64,
        slurry_id: i64,
    }

    fn fixture() -> Fixture {
        let mut store = MemoryStore::new();
        let parcel_id = store.insert_parcel(Parcel::new(1, 1, 0, "Am Hof")).unwrap();
        let field_id = store
            .insert_field(Field::new(
                parcel_id,
                2024,
                dec("3.5"),
                FieldType::Cropland,
            ))
            .unwrap();
        let crop_id = store
            .insert_crop(Crop::new(
                1,
                "W.-Gerste",
                FieldType::Cropland,
                CropClass::MainCrop,
                CropType::Grain,
            ))
            .unwrap();
        let cultivation_id = store
            .insert_cultivation(
                Cultivation::new(field_id, CultivationType::MainCrop, crop_id, dec("70"))
                    .with_residues(ResidueType::MainStayed),
            )
            .unwrap();
        let slurry_id = store
            .insert_fertilizer(
                Fertilizer::new(1, "Gülle", 2024, FertType::OrgSlurry).with_contents(
                    dec("1"),
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    Decimal::ZERO,
                    dec("0.5"),
                ),
            )
            .unwrap();
        Fixture {
            store,
            field_id,
            cultivation_id,
            slurry_id,
        }
    }

    #[test]
    fn duplicate_parcel_reports_both_fields() {
        let fixture = fixture();
        let validation = validate_parcel(&fixture.store, &Parcel::new(1, 1, 0, "Kopie"));
        assert!(!validation.is_ok());
        assert!(validation.error_on("prefix").is_some());
        assert!(validation.error_on("suffix").is_some());
    }

    #[test]
    fn field_rejects_other_owner_and_duplicate_year() {
        let fixture = fixture();
        let mut candidate = Field::new(1, 2024, dec("2"), FieldType::Cropland);
        assert!(validate_field(&fixture.store, 2, &candidate)
            .error_on("parcel_id")
            .is_some());
        assert!(validate_field(&fixture.store, 1, &candidate)
            .error_on("year")
            .is_some());
        candidate.year = 2025;
        candidate.area = Decimal::ZERO;
        let validation = validate_field(&fixture.store, 1, &candidate);
        assert!(validation.error_on("area").is_some());
        assert!(validation.error_on("year").is_none());
    }

    #[test]
    fn cultivation_role_constraints() {
        let fixture = fixture();
        let crop_id = 3; // W.-Gerste, a main crop
        let mut candidate =
            Cultivation::new(fixture.field_id, CultivationType::MainCrop, crop_id, dec("70"));
        // duplicate role on the field
        assert!(validate_cultivation(&fixture.store, 1, &candidate)
            .error_on("cultivation_type")
            .is_some());
        candidate.cultivation_type = CultivationType::CatchCrop;
        let validation = validate_cultivation(&fixture.store, 1, &candidate);
        // a main crop cannot be grown as catch crop
        assert!(validation.error_on("crop_id").is_some());
        candidate.cultivation_type = CultivationType::SecondMainCrop;
        candidate.residues = ResidueType::CatchFrozen;
        assert!(validate_cultivation(&fixture.store, 1, &candidate)
            .error_on("residues")
            .is_some());
    }

    #[test]
    fn fertilizer_uniqueness_by_class() {
        let fixture = fixture();
        let organic = Fertilizer::new(1, "Gülle", 2024, FertType::OrgSlurry);
        assert!(!validate_fertilizer(&fixture.store, &organic).is_ok());
        let other_year = Fertilizer::new(1, "Gülle", 2025, FertType::OrgSlurry);
        assert!(validate_fertilizer(&fixture.store, &other_year).is_ok());
        let mut bad = Fertilizer::new(1, "KAS", 2024, FertType::N);
        bad.n = dec("10");
        bad.nh4 = dec("12");
        assert!(validate_fertilizer(&fixture.store, &bad)
            .error_on("nh4")
            .is_some());
    }

    #[test]
    fn modifier_amount_is_bounded() {
        use crate::models::NutrientType;
        let inside = Modifier::new(1, "ok", NutrientType::N, -1000);
        assert!(validate_modifier(&inside).is_ok());
        let outside = Modifier::new(1, "too much", NutrientType::N, 1001);
        assert!(!validate_modifier(&outside).is_ok());
    }

    #[test]
    fn fertilization_measure_must_match_class() {
        let fixture = fixture();
        let candidate = Fertilization::new(
            fixture.field_id,
            fixture.cultivation_id,
            fixture.slurry_id,
            MeasureType::FirstNFert,
            dec("10"),
        );
        let validation = validate_fertilization(
            &fixture.store,
            &test_guidelines(),
            1,
            &candidate,
        );
        assert!(validation.error_on("measure").is_some());
    }

    #[test]
    fn autumn_limit_rejects_with_suggestion() {
        let mut fixture = fixture();
        // existing fall load: n = 50, nh4 = 25
        fixture
            .store
            .insert_fertilization(Fertilization::new(
                fixture.field_id,
                fixture.cultivation_id,
                fixture.slurry_id,
                MeasureType::OrgFall,
                dec("50"),
            ))
            .unwrap();
        let candidate = Fertilization::new(
            fixture.field_id,
            fixture.cultivation_id,
            fixture.slurry_id,
            MeasureType::OrgFall,
            dec("20"),
        );
        let validation = validate_fertilization(
            &fixture.store,
            &test_guidelines(),
            1,
            &candidate,
        );
        let error = validation.error_on("amount").expect("autumn rejection");
        // headroom: min((60-50)/1, (30-25)/0.5) = 10
        assert!(error.message.contains("at most 10"), "{}", error.message);
    }

    #[test]
    fn autumn_limit_accepts_within_bounds() {
        let fixture = fixture();
        let candidate = Fertilization::new(
            fixture.field_id,
            fixture.cultivation_id,
            fixture.slurry_id,
            MeasureType::OrgFall,
            dec("40"),
        );
        assert!(validate_fertilization(
            &fixture.store,
            &test_guidelines(),
            1,
            &candidate,
        )
        .is_ok());
    }
}
